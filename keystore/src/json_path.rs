//! Case-insensitive JSON object traversal. Keystore producers disagree on
//! the casing of the top-level `crypto`/`Crypto` key (go-ethereum uses
//! `crypto`, older geth/ethers.js variants used `Crypto`); this resolver
//! walks a `/`-separated path case-insensitively and rejects ambiguity
//! rather than silently picking a winner.

use serde_json::Value;

use crate::error::{KeystoreError, Result};

/// Result of a path lookup: `None` distinguishes "not present" from a
/// present-but-`null` value, which callers may want to treat differently.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let mut current = root;

    for segment in path.split('/') {
        let obj = match current.as_object() {
            Some(obj) => obj,
            None => return Ok(None),
        };

        let mut matched: Option<&Value> = None;
        let mut match_count = 0usize;

        for (key, value) in obj.iter() {
            if key.eq_ignore_ascii_case(segment) {
                match_count += 1;
                matched = Some(value);
            }
        }

        if match_count > 1 {
            return Err(KeystoreError::AmbiguousKey(segment.to_string()));
        }

        match matched {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }

    Ok(Some(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_case_insensitive() {
        let doc = json!({"Crypto": {"cipher": "aes-128-ctr"}});
        let cipher = resolve(&doc, "crypto/cipher").unwrap().unwrap();
        assert_eq!(cipher.as_str(), Some("aes-128-ctr"));
    }

    #[test]
    fn test_resolve_missing_is_none() {
        let doc = json!({"crypto": {}});
        assert!(resolve(&doc, "crypto/kdf").unwrap().is_none());
        assert!(resolve(&doc, "nope").unwrap().is_none());
    }

    #[test]
    fn test_resolve_ambiguous_rejected() {
        let doc = json!({"Crypto": {}, "crypto": {}});
        let err = resolve(&doc, "crypto").unwrap_err();
        assert!(matches!(err, KeystoreError::AmbiguousKey(ref k) if k == "crypto"));
    }

    #[test]
    fn test_resolve_ambiguity_at_any_level() {
        let doc = json!({"crypto": {"Cipher": "a", "cipher": "b"}});
        let err = resolve(&doc, "crypto/cipher").unwrap_err();
        assert!(matches!(err, KeystoreError::AmbiguousKey(_)));
    }

    #[test]
    fn test_resolve_multi_segment() {
        let doc = json!({"x-ethers": {"path": "m/44'/60'/0'/0/0"}});
        let path = resolve(&doc, "x-ethers/path").unwrap().unwrap();
        assert_eq!(path.as_str(), Some("m/44'/60'/0'/0/0"));
    }
}
