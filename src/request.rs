//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;

use crate::method::Method;

/// An incoming HTTP request, as seen by a handler.
///
/// The body has already been collected into memory by the time a handler
/// runs; `body()` is plain bytes, parse them with whatever you like.
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: Option<String>,
        headers: HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path, query, headers, body, params }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header lookup by name (case-insensitive). Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a query-string value, percent-decoded.
    ///
    /// `?callback=cb&pretty` gives `query("callback") == Some("cb")` and
    /// `query("pretty") == Some("")`.
    pub fn query(&self, name: &str) -> Option<String> {
        let raw = self.query.as_deref()?;
        raw.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k) == name).then(|| percent_decode(v))
        })
    }
}

/// Decodes `%XX` escapes and `+`-as-space. Malformed escapes pass through.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                if let (Some(hi), Some(lo)) = (hi, lo) {
                    out.push((hi * 16 + lo) as u8);
                    i += 3;
                    continue;
                }
                out.push(b'%');
                i += 1;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(query: Option<&str>) -> Request {
        Request::new(
            Method::Get,
            "/jsonp".to_owned(),
            query.map(str::to_owned),
            HeaderMap::new(),
            Bytes::new(),
            HashMap::new(),
        )
    }

    #[test]
    fn query_lookup() {
        let r = req(Some("callback=cb&pretty"));
        assert_eq!(r.query("callback").as_deref(), Some("cb"));
        assert_eq!(r.query("pretty").as_deref(), Some(""));
        assert_eq!(r.query("missing"), None);
    }

    #[test]
    fn query_is_percent_decoded() {
        let r = req(Some("q=hello%20world&name=a+b"));
        assert_eq!(r.query("q").as_deref(), Some("hello world"));
        assert_eq!(r.query("name").as_deref(), Some("a b"));
    }

    #[test]
    fn no_query_string() {
        assert_eq!(req(None).query("callback"), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let r = Request::new(
            Method::Get,
            "/".to_owned(),
            None,
            headers,
            Bytes::new(),
            HashMap::new(),
        );
        assert_eq!(r.header("Content-Type"), Some("application/json"));
        assert_eq!(r.header("CONTENT-TYPE"), Some("application/json"));
    }
}
