//! Incoming HTTP request type.

use bytes::Bytes;
use http::Method;
use http_body_util::BodyExt;

/// An incoming HTTP request, decoded and fully buffered.
///
/// Handlers receive one of these per dispatch, together with the pattern's
/// captures. The body is collected before routing, so `body()` is plain
/// bytes — parse them with whatever you like; remux does not touch them.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        Self { method, path: path.into(), headers, body }
    }

    /// Decodes a hyper request, buffering the full body before dispatch.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
            .collect();
        Ok(Self::new(parts.method, parts.uri.path(), headers, body))
    }

    /// Shorthand for tests: a bodyless GET request for `path`.
    #[cfg(test)]
    pub(crate) fn get(path: &str) -> Self {
        Self::new(Method::GET, path, Vec::new(), Bytes::new())
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = Request::new(
            Method::GET,
            "/",
            vec![("Content-Type".to_owned(), "text/plain".to_owned())],
            Bytes::new(),
        );
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(req.header("x-missing"), None);
    }
}
