//! Naming helpers
//!
//! XML name checks plus the naming conventions the converter relies on:
//! namespace URIs turned into subschema path segments, the `ListOf` wrapper
//! convention and the `Name_X_YYY` message file naming scheme.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix that marks a repeatable wrapper element or type
pub const LIST_OF_PREFIX: &str = "ListOf";

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$")
        .unwrap()
});

static URI_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:(//)?").unwrap());

static MESSAGE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<title>.+?)_(?P<major>\d+)_(?P<minor>\d+)$").unwrap());

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::value(format!("Invalid NCName: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Strip the scheme from a namespace URI, leaving a `/` separated path
///
/// `http://www.xsd2jsonschema.org/example/` becomes
/// `www.xsd2jsonschema.org/example`; `urn:a:b` becomes `a/b`.
pub fn safe_namespace(namespace: &str) -> String {
    let is_urn = namespace
        .get(..4)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("urn:"));
    let stripped = URI_SCHEME.replace(namespace.trim(), "");
    let path = if is_urn {
        stripped.replace(':', "/")
    } else {
        stripped.into_owned()
    };
    path.trim_matches('/').to_string()
}

/// Subschema segments for a target namespace
///
/// The first segment (usually the host) is dropped when there is more
/// than one.
pub fn namespace_segments(namespace: &str) -> Vec<String> {
    let safe = safe_namespace(namespace);
    let mut segments: Vec<String> = safe
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.len() > 1 {
        segments.remove(0);
    }
    segments
}

/// Escape one JSON Pointer reference token (`~` and `/`)
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// True for names following the `ListOf<X>` wrapper convention
pub fn is_list_of(name: &str) -> bool {
    name.starts_with(LIST_OF_PREFIX)
}

/// Lower the first character (attribute property names)
pub fn lower_case_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a message file name into its title and version
///
/// `Financing_1_000` (with or without a `.xsd` extension) yields
/// `("Financing", Some("1.000"))`.
pub fn parse_message_name(name: &str) -> (String, Option<String>) {
    let stem = std::path::Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    match MESSAGE_VERSION.captures(stem) {
        Some(caps) => (
            caps["title"].to_string(),
            Some(format!("{}.{}", &caps["major"], &caps["minor"])),
        ),
        None => (stem.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_pointer_token() {
        assert_eq!(escape_pointer_token("BusinessContent"), "BusinessContent");
        assert_eq!(escape_pointer_token("a~b/c"), "a~0b~1c");
        assert_eq!(escape_pointer_token("~1"), "~01");
    }

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("element"));
        assert!(is_valid_ncname("my-element"));
        assert!(is_valid_ncname("_Código"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("prefix:element"));
        assert!(!is_valid_ncname("1element"));
        assert!(validate_ncname("bad name").is_err());
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("element"), (None, "element"));
        assert_eq!(split_qname("xs:element"), (Some("xs"), "element"));
    }

    #[test]
    fn test_safe_namespace() {
        assert_eq!(
            safe_namespace("http://www.xsd2jsonschema.org/example"),
            "www.xsd2jsonschema.org/example"
        );
        assert_eq!(safe_namespace("https://totvs.com/msg/"), "totvs.com/msg");
        assert_eq!(safe_namespace("urn:totvs:messages"), "totvs/messages");
    }

    #[test]
    fn test_namespace_segments_drop_host() {
        assert_eq!(
            namespace_segments("http://www.xsd2jsonschema.org/example"),
            vec!["example".to_string()]
        );
        assert_eq!(
            namespace_segments("http://www.totvs.com"),
            vec!["www.totvs.com".to_string()]
        );
        assert!(namespace_segments("").is_empty());
    }

    #[test]
    fn test_list_of_convention() {
        assert!(is_list_of("ListOfContractParcelType"));
        assert!(!is_list_of("ContractList"));
    }

    #[test]
    fn test_lower_case_first_letter() {
        assert_eq!(lower_case_first_letter("Version"), "version");
        assert_eq!(lower_case_first_letter(""), "");
    }

    #[test]
    fn test_parse_message_name() {
        assert_eq!(
            parse_message_name("Financing_1_000"),
            ("Financing".to_string(), Some("1.000".to_string()))
        );
        assert_eq!(
            parse_message_name("CustomerVendor_2_004.xsd"),
            ("CustomerVendor".to_string(), Some("2.004".to_string()))
        );
        assert_eq!(parse_message_name("commons"), ("commons".to_string(), None));
    }
}
