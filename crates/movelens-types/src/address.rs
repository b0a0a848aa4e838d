//! Address normalization utilities.
//!
//! Sui addresses are 32-byte values that show up in several spellings:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//!
//! Graph node ids are keyed on the normalized full form so that the same
//! package reached through different spellings merges into one node.

/// Normalize an address to lowercase with 0x prefix and full 64 hex characters.
///
/// # Examples
///
/// ```
/// use movelens_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert_eq!(
///     normalize_address("ABC"),
///     "0x0000000000000000000000000000000000000000000000000000000000000abc"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let hex = addr.strip_prefix("0x").unwrap_or(addr).to_lowercase();
    if hex.len() < 64 {
        format!("0x{:0>64}", hex)
    } else {
        format!("0x{}", hex)
    }
}

/// Shortened display form: strips leading zeros back down to "0x2"-style.
pub fn short_address(addr: &str) -> String {
    let hex = addr.strip_prefix("0x").unwrap_or(addr).trim_start_matches('0');
    if hex.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", hex.to_lowercase())
    }
}

/// Check if an address is a framework address (0x1, 0x2, 0x3).
///
/// Framework packages ship with the chain; constants holding them are not
/// treated as suspicious hardcoded addresses.
pub fn is_framework_address(addr: &str) -> bool {
    matches!(
        normalize_address(addr).as_str(),
        "0x0000000000000000000000000000000000000000000000000000000000000001"
            | "0x0000000000000000000000000000000000000000000000000000000000000002"
            | "0x0000000000000000000000000000000000000000000000000000000000000003"
    )
}

/// Check whether a string has the shape of a full 32-byte object id
/// (0x followed by exactly 64 hex characters).
pub fn looks_like_object_id(s: &str) -> bool {
    let Some(hex) = s.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xABC"),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
        assert_eq!(
            normalize_address("2"),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn test_short_address_round_trips() {
        assert_eq!(short_address(&normalize_address("0x2")), "0x2");
        assert_eq!(short_address("0x0"), "0x0");
    }

    #[test]
    fn test_is_framework_address() {
        assert!(is_framework_address("0x2"));
        assert!(is_framework_address(
            "0x0000000000000000000000000000000000000000000000000000000000000003"
        ));
        assert!(!is_framework_address("0xdee9"));
    }

    #[test]
    fn test_looks_like_object_id() {
        assert!(looks_like_object_id(
            "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf"
        ));
        assert!(!looks_like_object_id("0x2"));
        assert!(!looks_like_object_id(
            "5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf"
        ));
    }
}
