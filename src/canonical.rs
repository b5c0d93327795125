//! Canonicalization functionality for SAuthc1 signature generation.
//!
//! Every function here is a pure function of its inputs: no I/O, deterministic, and safe to call
//! concurrently. The verifying server recomputes these byte-for-byte, so any change to the
//! encoding rules or ordering breaks interoperability.

use {
    percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC},
    std::collections::BTreeMap,
};

/// Characters percent-encoded in canonical query names and values. This is the complement of the
/// `encodeURIComponent` unreserved set (ALPHA / DIGIT / `-_.!~*'()`), with `*` re-added so it
/// encodes as `%2A` per the SAuthc1 fixup rules. Hex digits are emitted upper-case.
const CANONICAL_QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters percent-encoded in canonical URI paths. Same as the query set, except `/` is never
/// escaped in a path.
const CANONICAL_PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'/');

/// Percent-decode `value`, then re-encode it with the canonical encode set. Malformed escapes
/// degrade to the Unicode replacement character rather than failing.
fn canonical_encode(value: &str, encode_set: &'static AsciiSet) -> String {
    let decoded = percent_decode_str(value).decode_utf8_lossy();
    utf8_percent_encode(&decoded, encode_set).to_string()
}

/// Return the canonical form of a URI path. The empty path canonicalizes to `/`; `/` itself is
/// never escaped.
pub fn canonical_uri_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        canonical_encode(path, CANONICAL_PATH_ENCODE_SET)
    }
}

/// Return the canonical form of a raw query string: parameters sorted lexicographically by raw
/// name, names and values percent-decoded then canonically re-encoded, pairs joined with `&`.
/// `None` or an empty query yields the empty string.
pub fn canonical_query_string(query: Option<&str>) -> String {
    let query = match query {
        None | Some("") => return String::new(),
        Some(q) => q,
    };

    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        })
        .collect();
    params.sort_by(|a, b| a.0.cmp(b.0));

    let canonical: Vec<String> = params
        .iter()
        .map(|(name, value)| {
            // Form encoding: a literal '+' in the raw query is a space.
            let name = name.replace('+', " ");
            let value = value.replace('+', " ");
            format!(
                "{}={}",
                canonical_encode(&name, CANONICAL_QUERY_ENCODE_SET),
                canonical_encode(&value, CANONICAL_QUERY_ENCODE_SET)
            )
        })
        .collect();
    canonical.join("&")
}

/// Return the canonical headers string: one `lowercased-name:value` line per header, sorted
/// case-sensitively by the original header name, with a trailing newline.
///
/// Header values are emitted as-is. Input contract: header names are unique modulo case; the
/// output for duplicate names differing only in case is unspecified.
pub fn canonical_headers_string(headers: &BTreeMap<String, String>) -> String {
    let lines: Vec<String> =
        headers.iter().map(|(name, value)| format!("{}:{}", name.to_lowercase(), value)).collect();
    format!("{}\n", lines.join("\n"))
}

/// Return the signed-headers list: sorted, lower-cased header names joined with `;`.
pub fn signed_headers_string(headers: &BTreeMap<String, String>) -> String {
    let names: Vec<String> = headers.keys().map(|name| name.to_lowercase()).collect();
    names.join(";")
}

#[cfg(test)]
mod tests {
    use {
        super::{canonical_headers_string, canonical_query_string, canonical_uri_path, signed_headers_string},
        std::collections::BTreeMap,
    };

    #[test_log::test]
    fn test_canonical_uri_path() {
        assert_eq!(canonical_uri_path(""), "/");
        assert_eq!(canonical_uri_path("/"), "/");
        assert_eq!(canonical_uri_path("/v1/applications/77JnfFiREjdfQH0SObMfjI/groups"),
            "/v1/applications/77JnfFiREjdfQH0SObMfjI/groups");
        // Slashes stay literal; spaces and reserved characters are escaped upper-case.
        assert_eq!(canonical_uri_path("/a b/c"), "/a%20b/c");
        assert_eq!(canonical_uri_path("/a%20b"), "/a%20b");
        // encodeURIComponent unreserved marks survive; '*' does not.
        assert_eq!(canonical_uri_path("/!'()~*"), "/!'()~%2A");
    }

    #[test_log::test]
    fn test_canonical_query_string_empty() {
        assert_eq!(canonical_query_string(None), "");
        assert_eq!(canonical_query_string(Some("")), "");
    }

    #[test_log::test]
    fn test_canonical_query_string_sorted() {
        assert_eq!(canonical_query_string(Some("q=group&limit=25&offset=25")), "limit=25&offset=25&q=group");
        // Input order never matters.
        assert_eq!(canonical_query_string(Some("offset=25&q=group&limit=25")), "limit=25&offset=25&q=group");
    }

    #[test_log::test]
    fn test_canonical_query_string_encoding() {
        assert_eq!(canonical_query_string(Some("a=b c")), "a=b%20c");
        assert_eq!(canonical_query_string(Some("a=b+c")), "a=b%20c");
        assert_eq!(canonical_query_string(Some("a=b%2Fc")), "a=b%2Fc");
        assert_eq!(canonical_query_string(Some("star=*")), "star=%2A");
        assert_eq!(canonical_query_string(Some("tilde=%7E")), "tilde=~");
        assert_eq!(canonical_query_string(Some("flag")), "flag=");
    }

    #[test_log::test]
    fn test_header_strings() {
        let mut headers = BTreeMap::new();
        headers.insert("Host".to_string(), "api.stormpath.com".to_string());
        headers.insert("X-Stormpath-Date".to_string(), "20130701T000000Z".to_string());
        assert_eq!(canonical_headers_string(&headers), "host:api.stormpath.com\nx-stormpath-date:20130701T000000Z\n");
        assert_eq!(signed_headers_string(&headers), "host;x-stormpath-date");
    }
}
