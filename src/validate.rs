//! Input validators for hashes, node URIs and proof identifiers
//!
//! All checks run before any network I/O. Argument validators report every
//! offending value in a single `ClientError::InvalidArgument`.

use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use std::net::Ipv4Addr;

/// Maximum number of hashes (or handles) accepted per call
pub const MAX_HASHES: usize = 250;

/// Maximum number of explicit Gateway URIs accepted per submission
pub const MAX_URIS: usize = 5;

const ULID_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Check if value is an even-length hexadecimal string of at least one byte
pub fn is_hex(value: &str) -> bool {
    value.len() >= 2 && hex::decode(value).is_ok()
}

/// Check if value is a hyphenated version 1 UUID
pub fn is_valid_uuid(value: &str) -> bool {
    value.len() == 36
        && uuid::Uuid::parse_str(value)
            .map(|id| id.get_version_num() == 1)
            .unwrap_or(false)
}

/// Check if value is a ULID (26 Crockford base32 characters, any case)
pub fn is_valid_ulid(value: &str) -> bool {
    value.len() == 26
        && value
            .chars()
            .all(|c| ULID_ALPHABET.contains(c.to_ascii_uppercase()))
}

/// Check if value is a valid proof identifier (UUIDv1 or ULID)
pub fn is_valid_proof_id(value: &str) -> bool {
    is_valid_uuid(value) || is_valid_ulid(value)
}

/// Parse an `http(s)://<IPv4>[:port]` URI
///
/// Hostnames and `0.0.0.0` are rejected. The host must appear verbatim in
/// the input, so shorthand numeric forms such as `http://10.1` are refused.
fn parse_ipv4_uri(uri: &str) -> Option<Url> {
    let parsed = Url::parse(uri).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;
    let ip: Ipv4Addr = host.parse().ok()?;
    if ip.is_unspecified() || !uri.contains(host) {
        return None;
    }
    Some(parsed)
}

/// Check if value is a valid node URI: `http(s)://` followed by an IPv4 address
pub fn is_valid_uri(uri: &str) -> bool {
    parse_ipv4_uri(uri).is_some()
}

/// Check if value is a valid Gateway base URI
///
/// Same rules as [`is_valid_uri`], and the URI must not carry a path or
/// query since position paths are appended to it.
pub fn is_valid_gateway_uri(uri: &str) -> bool {
    parse_ipv4_uri(uri)
        .map(|u| (u.path() == "/" || u.path().is_empty()) && u.query().is_none())
        .unwrap_or(false)
}

/// Check if value is a valid Core URI
///
/// Without a DNS suffix Cores are addressed like Gateways (literal IPv4).
/// In strict discovery mode the host must be a DNS name ending in `dns_suffix`.
pub fn is_valid_core_uri(uri: &str, dns_suffix: Option<&str>) -> bool {
    let Some(suffix) = dns_suffix else {
        return is_valid_uri(uri);
    };

    let Ok(parsed) = Url::parse(uri) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let suffix = suffix.trim_start_matches('.');
    host.len() > suffix.len() + 1
        && host.ends_with(suffix)
        && host[..host.len() - suffix.len()].ends_with('.')
        && host.parse::<Ipv4Addr>().is_err()
}

/// Validate the hashes argument of a submission
pub fn validate_hashes_arg(hashes: &[String]) -> ClientResult<()> {
    validate_array_arg(hashes.len(), "hashes")?;

    let rejects: Vec<&str> = hashes
        .iter()
        .filter(|h| !is_hex(h))
        .map(String::as_str)
        .collect();
    if !rejects.is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "hashes arg contains invalid items : {}",
            rejects.join(", ")
        )));
    }
    Ok(())
}

/// Validate a non-empty, size-bounded list argument
pub fn validate_array_arg(len: usize, name: &str) -> ClientResult<()> {
    if len == 0 {
        return Err(ClientError::InvalidArgument(format!(
            "{name} arg must be a non-empty Array"
        )));
    }
    if len > MAX_HASHES {
        return Err(ClientError::InvalidArgument(format!(
            "{name} arg must be an Array with <= {MAX_HASHES} elements"
        )));
    }
    Ok(())
}

/// Validate and deduplicate explicit Gateway URIs
///
/// Returns the deduplicated list in first-seen order.
pub fn validate_uris_arg(uris: &[String]) -> ClientResult<Vec<String>> {
    if uris.len() > MAX_URIS {
        return Err(ClientError::InvalidArgument(format!(
            "uris arg must be an Array with <= {MAX_URIS} elements"
        )));
    }

    let mut unique: Vec<String> = Vec::with_capacity(uris.len());
    for uri in uris {
        if !unique.contains(uri) {
            unique.push(uri.clone());
        }
    }

    let bad: Vec<&str> = unique
        .iter()
        .filter(|u| !is_valid_uri(u))
        .map(String::as_str)
        .collect();
    if !bad.is_empty() {
        return Err(ClientError::InvalidArgument(format!(
            "uris arg contains invalid URIs : {}",
            bad.join(", ")
        )));
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex() {
        assert!(is_hex(&hex::encode(b"hello world")));
        assert!(is_hex("ABCDEF01"));
        assert!(!is_hex("foo bar"));
        assert!(!is_hex("a"));
        assert!(!is_hex("abc"));
        assert!(!is_hex(""));
    }

    #[test]
    fn test_is_valid_uuid() {
        assert!(is_valid_uuid("23d57c30-afe7-11e4-ab7d-12e3f512a338"));
        assert!(!is_valid_uuid("09bb1d8c-4965-4788-94f7-31b151eaba4e"));
        assert!(!is_valid_uuid("23d57c30afe711e4ab7d12e3f512a338"));
        assert!(!is_valid_uuid("not-a-uuid"));
    }

    #[test]
    fn test_is_valid_ulid() {
        assert!(is_valid_ulid("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(is_valid_ulid("01arz3ndektsv4rrffq69g5fav"));
        // I, L, O and U are not part of the Crockford alphabet
        assert!(!is_valid_ulid("01ARZ3NDEKTSV4RRFFQ69G5FAU"));
        assert!(!is_valid_ulid("01ARZ3NDEKTSV4RRFFQ69G5FA"));
    }

    #[test]
    fn test_is_valid_proof_id() {
        assert!(is_valid_proof_id("23d57c30-afe7-11e4-ab7d-12e3f512a338"));
        assert!(is_valid_proof_id("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(!is_valid_proof_id("09bb1d8c-4965-4788-94f7-31b151eaba4e"));
    }

    #[test]
    fn test_is_valid_uri() {
        for uri in ["http://123.45.64.2", "https://123.54.32.11", "http://127.0.0.1:8080"] {
            assert!(is_valid_uri(uri), "expected {uri} to be valid");
        }
        for uri in [
            "0.0.0.0",
            "http://0.0.0.0",
            "chainpoint.org",
            "http://chainpoint.org",
            "123.45.66.3",
            "ftp://123.45.66.3",
            "http://10.1",
        ] {
            assert!(!is_valid_uri(uri), "expected {uri} to be invalid");
        }
    }

    #[test]
    fn test_is_valid_gateway_uri() {
        assert!(is_valid_gateway_uri("http://3.17.155.208"));
        assert!(is_valid_gateway_uri("http://3.17.155.208/"));
        assert!(!is_valid_gateway_uri("http://3.17.155.208/calendar/1/data"));
        assert!(!is_valid_gateway_uri("http://3.17.155.208?x=1"));
        assert!(!is_valid_gateway_uri("http://gateway.example"));
    }

    #[test]
    fn test_is_valid_core_uri() {
        assert!(is_valid_core_uri("http://18.220.31.138", None));
        assert!(!is_valid_core_uri("http://a.chainpoint.org", None));

        let suffix = Some("chainpoint.org");
        assert!(is_valid_core_uri("http://a.chainpoint.org", suffix));
        assert!(is_valid_core_uri("https://core-1.chainpoint.org", suffix));
        assert!(!is_valid_core_uri("http://chainpoint.org", suffix));
        assert!(!is_valid_core_uri("http://evilchainpoint.org", suffix));
        assert!(!is_valid_core_uri("http://18.220.31.138", suffix));
        assert!(!is_valid_core_uri("ftp://a.chainpoint.org", suffix));
    }

    #[test]
    fn test_validate_hashes_arg() {
        assert!(validate_hashes_arg(&["abcd".to_string()]).is_ok());
        assert!(validate_hashes_arg(&[]).is_err());
        assert!(validate_hashes_arg(&vec!["ab".to_string(); MAX_HASHES + 1]).is_err());
        assert!(validate_hashes_arg(&vec!["ab".to_string(); MAX_HASHES]).is_ok());
    }

    #[test]
    fn test_validate_hashes_arg_lists_all_offenders() {
        let hashes = vec!["ab".to_string(), "xyz".to_string(), "a".to_string()];
        let err = validate_hashes_arg(&hashes).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains(", a"));
        assert!(!msg.contains("ab,"));
    }

    #[test]
    fn test_validate_uris_arg_dedupes() {
        let uris = vec![
            "http://1.2.3.4".to_string(),
            "http://5.6.7.8".to_string(),
            "http://1.2.3.4".to_string(),
        ];
        let unique = validate_uris_arg(&uris).unwrap();
        assert_eq!(unique, vec!["http://1.2.3.4", "http://5.6.7.8"]);
    }

    #[test]
    fn test_validate_uris_arg_rejects() {
        assert!(validate_uris_arg(&[]).unwrap().is_empty());
        assert!(validate_uris_arg(&vec!["http://1.2.3.4".to_string(); 6]).is_err());

        let uris = vec![
            "http://1.2.3.4".to_string(),
            "bad".to_string(),
            "http://x.org".to_string(),
        ];
        let msg = validate_uris_arg(&uris).unwrap_err().to_string();
        assert!(msg.contains("bad, http://x.org"));
    }
}
