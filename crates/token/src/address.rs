//! Address validation and display helpers.

use alloy_primitives::Address;

/// Parse a user-entered address.
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase input is accepted
/// as is; input containing upper-case letters must carry a valid EIP-55
/// checksum.
pub fn parse_address(input: &str) -> Option<Address> {
    let hex = input.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    if hex.bytes().any(|b| b.is_ascii_uppercase()) {
        Address::parse_checksummed(input, None).ok()
    } else {
        input.parse().ok()
    }
}

/// Whether `input` passes [`parse_address`].
pub fn is_address(input: &str) -> bool {
    parse_address(input).is_some()
}

/// Shorten an address for display: `0xf39F...2266`.
pub fn shorten_address(address: Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const HARDHAT_0: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[test]
    fn test_checksummed_address() {
        assert_eq!(
            parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            Some(HARDHAT_0)
        );
    }

    #[test]
    fn test_lowercase_address() {
        assert_eq!(
            parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            Some(HARDHAT_0)
        );
    }

    #[test]
    fn test_bad_checksum_rejected() {
        assert!(!is_address("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_malformed_addresses_rejected() {
        assert!(!is_address(""));
        assert!(!is_address("0x123"));
        assert!(!is_address("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(!is_address("0xg39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(!is_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226600"));
        assert!(!is_address(" 0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(shorten_address(HARDHAT_0), "0xf39F...2266");
    }
}
