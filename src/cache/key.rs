//! Cache Key Module
//!
//! Derives stable cache keys from a request path and its query parameters.

use std::fmt;

use reqwest::Url;

// Only used to borrow the url crate's form-urlencoding; never requested.
const KEY_BASE: &str = "http://cache.key";

// == Cache Key ==
/// Identity of a cached GET request: the path followed by its query pairs
/// sorted by name, then value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from an endpoint path and query pairs.
    ///
    /// Pairs are sorted so that parameter order never produces two keys for
    /// the same request. A request without parameters keys on its path.
    pub fn new<K, V>(path: &str, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = normalize_path(path);
        if params.is_empty() {
            return Self(path);
        }

        let mut pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        pairs.sort_unstable();

        Self(format!("{}?{}", path, encode_query(&pairs)))
    }

    /// Key for a path with no query parameters.
    pub fn path(path: &str) -> Self {
        Self(normalize_path(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is the endpoint `prefix` itself, one of its
    /// sub-paths, or a query on it. `/products-sale` is not under `/products`.
    pub fn is_under(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        match self.0.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn encode_query(pairs: &[(&str, &str)]) -> String {
    // KEY_BASE is a constant valid URL
    let mut url = Url::parse(KEY_BASE).expect("static base url");
    url.query_pairs_mut().extend_pairs(pairs.iter().copied());
    url.query().unwrap_or_default().to_string()
}
