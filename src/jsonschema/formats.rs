//! Values of the `format` keyword emitted by the converter

/// Base64 encoded data
pub const BYTE: &str = "byte";
/// Double precision floating point
pub const DOUBLE: &str = "double";
/// RFC 3339 date-time
pub const DATE_TIME: &str = "date-time";
/// RFC 3339 full-date
pub const DATE: &str = "date";
/// E-mail address
pub const EMAIL: &str = "email";
/// Single precision floating point
pub const FLOAT: &str = "float";
/// Host name
pub const HOSTNAME: &str = "hostname";
/// Signed 32 bit integer
pub const INT32: &str = "int32";
/// IPv4 address
pub const IPV4: &str = "ipv4";
/// IPv6 address
pub const IPV6: &str = "ipv6";
/// Absolute URI
pub const URI: &str = "uri";
/// URI reference
pub const URIREF: &str = "uriref";

/// Every known format, in table order
pub const ALL: [&str; 12] = [
    BYTE, DOUBLE, DATE_TIME, DATE, EMAIL, FLOAT, HOSTNAME, INT32, IPV4, IPV6, URI, URIREF,
];

/// Check whether a format name is one the converter emits
pub fn is_known(format: &str) -> bool {
    ALL.contains(&format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_formats() {
        assert!(is_known("date-time"));
        assert!(is_known(INT32));
        assert!(!is_known("time"));
    }
}
