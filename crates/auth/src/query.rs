//! Query string normalization.
//!
//! A query reaches the signer either as an already-encoded string, which is
//! signed verbatim, or as a set of parameters that are encoded here. Encoding
//! keeps insertion order and percent-encodes everything outside the RFC 3986
//! unreserved set, so `{"a": "1", "b": "x y"}` becomes `a=1&b=x%20y`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unencoded in query keys and values (RFC 3986 unreserved).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Ordered query parameters with map-like insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an encoded query string (without the leading `?`).
    ///
    /// `+` decodes to a space and percent escapes are decoded. Pairs without
    /// `=` get an empty value. Repeated keys keep the last value.
    pub fn parse(raw: &str) -> Self {
        let mut params = Self::new();
        for part in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            params.insert(decode_component(key), decode_component(value));
        }
        params
    }

    /// Set `key` to `value`.
    ///
    /// An existing key keeps its position and takes the new value; a new key
    /// is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Get the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overlay `other` onto `self`; values from `other` win.
    pub fn merge(&mut self, other: QueryParams) {
        for (key, value) in other.pairs {
            self.insert(key, value);
        }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `key=value` pairs joined by `&`.
    ///
    /// An empty parameter set encodes to the empty string.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_ENCODE_SET),
                    utf8_percent_encode(v, QUERY_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Query component of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Already-encoded query string, used verbatim.
    Raw(String),
    /// Parameters to encode.
    Params(QueryParams),
}

impl Query {
    /// Encoded form of this query.
    pub fn encode(&self) -> String {
        match self {
            Self::Raw(raw) => raw.clone(),
            Self::Params(params) => params.encode(),
        }
    }

    /// Decoded parameters of this query.
    pub fn into_params(self) -> QueryParams {
        match self {
            Self::Raw(raw) => QueryParams::parse(&raw),
            Self::Params(params) => params,
        }
    }
}

impl From<QueryParams> for Query {
    fn from(params: QueryParams) -> Self {
        Self::Params(params)
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

/// Split a combined `path?query` on the first `?`.
pub fn split_path_query(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_preserves_order() {
        let params = QueryParams::from([("zebra", "1"), ("alpha", "2")]);
        assert_eq!(params.encode(), "zebra=1&alpha=2");
    }

    #[test]
    fn test_encode_percent_encodes_reserved() {
        let params = QueryParams::from([("q", "a b&c=d/é"), ("x~y", "1.0-_")]);
        assert_eq!(params.encode(), "q=a%20b%26c%3Dd%2F%C3%A9&x~y=1.0-_");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(QueryParams::new().encode(), "");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = QueryParams::from([("a", "1"), ("b", "2")]);
        params.insert("a", "3");
        params.insert("c", "4");
        assert_eq!(params.encode(), "a=3&b=2&c=4");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_parse_decodes() {
        let params = QueryParams::parse("market=LTC%2FBTC&note=a+b&flag");
        assert_eq!(params.get("market"), Some("LTC/BTC"));
        assert_eq!(params.get("note"), Some("a b"));
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn test_parse_repeated_key_keeps_last() {
        let params = QueryParams::parse("a=1&a=2");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("a"), Some("2"));
    }

    #[test]
    fn test_merge_explicit_wins() {
        let mut from_path = QueryParams::parse("aa=1&market=X");
        from_path.merge(QueryParams::from([("market", "LTCBTC"), ("limit", "100")]));
        assert_eq!(from_path.encode(), "aa=1&market=LTCBTC&limit=100");
    }

    #[test]
    fn test_split_path_query() {
        assert_eq!(split_path_query("/a/b"), ("/a/b", None));
        assert_eq!(split_path_query("/a?x=1"), ("/a", Some("x=1")));
        assert_eq!(split_path_query("/a?x=1?y"), ("/a", Some("x=1?y")));
        assert_eq!(split_path_query("/a?"), ("/a", Some("")));
    }

    #[test]
    fn test_raw_query_verbatim() {
        let query = Query::from("b=2&a=%41");
        assert_eq!(query.encode(), "b=2&a=%41");
    }
}
