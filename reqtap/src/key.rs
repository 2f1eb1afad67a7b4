//! Cache key derivation.

use crate::HttpRequest;

/// Derive the deterministic cache key for a request.
///
/// The key is the lowercase hex MD5 digest of the URL, with the body text
/// appended for POST and PATCH requests. The method itself is not part of
/// the digest, so a GET and a POST to the same URL with no body share a key.
/// Identical (method class, URL, body) triples always produce the same key.
pub fn derive_cache_key(request: &HttpRequest) -> String {
    let mut material = request.url.clone();
    if is_mutating(&request.method) {
        if let Some(body) = request.body_text() {
            material.push_str(&body);
        }
    }
    format!("{:x}", md5::compute(material.as_bytes()))
}

fn is_mutating(method: &str) -> bool {
    method.eq_ignore_ascii_case("POST") || method.eq_ignore_ascii_case("PATCH")
}
