//! Owned request/response types carried through the pipeline.
//!
//! Bodies are owned byte buffers, so any stage can inspect them without
//! draining anything a later stage still needs to read.

use std::borrow::Cow;
use std::collections::HashMap;

/// An outbound HTTP request as seen by the interception pipeline.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Method name, compared case-insensitively.
    pub method: String,
    pub url: String,
    /// Single-valued header map; lookups are case-insensitive.
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", url).with_body(body)
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as text. Invalid UTF-8 is replaced rather than treated as a
    /// failure, so inspecting a body can never abort a request.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        self.body.as_deref().map(String::from_utf8_lossy)
    }
}

/// An inbound HTTP response, live or synthesized from cache.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// URL the response answers, kept for logging and cache synthesis.
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Protocol label, e.g. "HTTP/1.1".
    pub protocol: String,
}

impl HttpResponse {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HashMap::new(),
            body: Vec::new(),
            protocol: "HTTP/1.1".to_string(),
        }
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// True for the 2xx range, the only responses the cache stage stores.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request =
            HttpRequest::get("http://example.com").with_header("X-Cache-TTL", "60");
        assert_eq!(request.header("x-cache-ttl"), Some("60"));
        assert_eq!(request.header("X-CACHE-TTL"), Some("60"));
        assert_eq!(request.header("x-other"), None);
    }

    #[test]
    fn success_covers_only_2xx() {
        assert!(HttpResponse::new("http://example.com", 200).is_success());
        assert!(HttpResponse::new("http://example.com", 299).is_success());
        assert!(!HttpResponse::new("http://example.com", 199).is_success());
        assert!(!HttpResponse::new("http://example.com", 301).is_success());
        assert!(!HttpResponse::new("http://example.com", 404).is_success());
    }

    #[test]
    fn body_text_replaces_invalid_utf8() {
        let request =
            HttpRequest::post("http://example.com", vec![0xff, 0xfe, b'a']);
        let text = request.body_text().unwrap();
        assert!(text.ends_with('a'));
    }

    #[test]
    fn absent_body_has_no_text() {
        let request = HttpRequest::get("http://example.com");
        assert!(request.body_text().is_none());
    }
}
