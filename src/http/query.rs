//! `key=value` pair splitting shared by the query string and form body parsers.

use memchr::memchr;
use std::collections::HashMap;

/// Splits `input` on `&`, then each segment on its first `=`.
///
/// Only segments that contain a `=` are kept; anything else (`flag`, empty
/// segments from `&&`) is silently dropped rather than reported. Duplicate keys
/// are last-wins. No percent-decoding is performed.
///
/// # Examples
/// ```
/// use corehttp::query::parse_pairs;
///
/// let params = parse_pairs("a=1&b=2&c&a=3");
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params["a"], "3");
/// assert_eq!(params["b"], "2");
/// assert!(params.get("c").is_none());
///
/// // Only the first `=` separates; an empty value is still a value
/// let params = parse_pairs("token=a=b&empty=");
/// assert_eq!(params["token"], "a=b");
/// assert_eq!(params["empty"], "");
/// ```
pub fn parse_pairs(input: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();
    let data = input.as_bytes();

    let mut start = 0;
    while start < data.len() {
        let end = memchr(b'&', &data[start..])
            .map(|pos| start + pos)
            .unwrap_or(data.len());

        if let Some(index) = memchr(b'=', &data[start..end]) {
            // Both separators are ASCII, so the slices stay on char boundaries
            let key = &input[start..start + index];
            let value = &input[start + index + 1..end];

            result.insert(key.to_owned(), value.to_owned());
        }

        start = end + 1;
    }

    result
}
