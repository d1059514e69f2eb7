//! Metadata translation
//!
//! Converts the backend's native entry metadata into the protocol's
//! header-keyed map and decides describability. The header contract is
//! exactly three keys; nothing else is synthesized.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use bk_core::EntryMeta;

/// Last-modified header key
pub const HEADER_LAST_MODIFIED: &str = "last-modified-date";

/// Content-length header key (decimal string, "0" when unknown)
pub const HEADER_CONTENT_LENGTH: &str = "content-length";

/// Content digest header key (base64 re-encoding of the hex MD5 digest)
pub const HEADER_CONTENT_MD5: &str = "content-md5";

/// Translate native metadata into the protocol header map.
///
/// A digest that fails to decode from hex drops the `content-md5` header
/// and nothing else; a missing checksum must not block the rest of the
/// metadata.
pub fn protocol_headers(meta: &EntryMeta) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if let Some(modified) = meta.last_modified {
        headers.insert(HEADER_LAST_MODIFIED.to_string(), modified.to_string());
    }

    headers.insert(
        HEADER_CONTENT_LENGTH.to_string(),
        meta.length.map_or_else(|| "0".to_string(), |l| l.to_string()),
    );

    if let Some(digest) = &meta.md5_hex {
        match hex::decode(digest) {
            Ok(raw) => {
                headers.insert(HEADER_CONTENT_MD5.to_string(), BASE64.encode(raw));
            }
            Err(error) => {
                tracing::debug!(%digest, %error, "digest is not valid hex; omitting content-md5");
            }
        }
    }

    headers
}

/// Whether the backend's metadata lookup actually found an object.
///
/// The backend does not raise a distinct not-found error for metadata
/// lookups; an entry with neither length nor digest is the designated
/// not-found signal.
pub fn is_describable(meta: &EntryMeta) -> bool {
    meta.length.is_some() || meta.md5_hex.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    #[test]
    fn test_headers_full_metadata() {
        let mut meta = EntryMeta::file("a/b.txt", 5);
        // md5("hello")
        meta.md5_hex = Some("5d41402abc4b2a76b9719d911017c592".into());
        meta.last_modified = Some(Timestamp::UNIX_EPOCH);

        let headers = protocol_headers(&meta);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[HEADER_CONTENT_LENGTH], "5");
        assert_eq!(headers[HEADER_CONTENT_MD5], "XUFAKrxLKna5cZ2REBfFkg==");
        assert!(headers.contains_key(HEADER_LAST_MODIFIED));
    }

    #[test]
    fn test_headers_unknown_length_is_zero() {
        let meta = EntryMeta::directory("a/b");
        let headers = protocol_headers(&meta);
        assert_eq!(headers[HEADER_CONTENT_LENGTH], "0");
    }

    #[test]
    fn test_headers_bad_digest_omits_md5() {
        let mut meta = EntryMeta::file("a/b.txt", 5);
        meta.md5_hex = Some("not hex at all".into());

        let headers = protocol_headers(&meta);
        assert!(!headers.contains_key(HEADER_CONTENT_MD5));
        // the rest of the metadata still comes through
        assert_eq!(headers[HEADER_CONTENT_LENGTH], "5");
    }

    #[test]
    fn test_headers_no_extra_keys() {
        let meta = EntryMeta::file("a/b.txt", 1);
        let headers = protocol_headers(&meta);
        assert!(
            headers
                .keys()
                .all(|k| k == HEADER_CONTENT_LENGTH
                    || k == HEADER_CONTENT_MD5
                    || k == HEADER_LAST_MODIFIED)
        );
    }

    #[test]
    fn test_is_describable() {
        assert!(is_describable(&EntryMeta::file("a", 0)));

        let mut digest_only = EntryMeta::default();
        digest_only.md5_hex = Some("00".into());
        assert!(is_describable(&digest_only));

        assert!(!is_describable(&EntryMeta::default()));
    }
}
