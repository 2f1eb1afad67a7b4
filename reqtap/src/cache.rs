//! The caching interceptor.
//!
//! A request opts in by carrying [`CACHE_HEADER`]; its value is the desired
//! lifetime in minutes. Requests without the header never touch the store.
//! Hits short-circuit the rest of the pipeline with a synthesized response;
//! misses proceed, and a successful response body is stored on the way back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use derive_builder::Builder;
use reqtap_cache::{CacheError, SharedCacheStore};
use tracing::{debug, error, warn};

use crate::key::derive_cache_key;
use crate::policy::{parse_lifetime, DEFAULT_TTL_MINUTES};
use crate::{HttpRequest, HttpResponse, Interceptor, Next, PipelineError};

/// Request header that opts a single request into caching. Its value is the
/// desired lifetime in minutes.
pub const CACHE_HEADER: &str = "x-cache-ttl";

/// Marker header present only on responses served from cache.
pub const CACHE_HINT_HEADER: &str = "x-cache-hint";

/// Value carried by [`CACHE_HINT_HEADER`].
pub const CACHE_HINT_VALUE: &str = "from-cache";

/// Consecutive store failures after which the interceptor reports itself
/// degraded instead of silently dropping every write.
const DEGRADED_THRESHOLD: u32 = 8;

#[derive(Builder, Clone, Debug)]
#[builder(public, setter(into))]
pub struct CacheOptions {
    /// Header that opts a request into caching.
    #[builder(default = "CACHE_HEADER.to_string()")]
    pub header_name: String,
    /// Lifetime in minutes applied when the header value does not parse.
    #[builder(default = "DEFAULT_TTL_MINUTES")]
    pub default_ttl_minutes: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            header_name: CACHE_HEADER.to_string(),
            default_ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }
}

/// Opt-in caching stage for an interception pipeline.
pub struct CacheInterceptor {
    store: SharedCacheStore,
    options: CacheOptions,
    consecutive_failures: AtomicU32,
}

impl CacheInterceptor {
    pub fn new(store: SharedCacheStore) -> Self {
        Self::with_options(store, CacheOptions::default())
    }

    pub fn with_options(store: SharedCacheStore, options: CacheOptions) -> Self {
        Self {
            store,
            options,
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Remove a single cached entry, independent of any request.
    pub async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key).await
    }

    /// Drop every cached entry, e.g. from an administrative action.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.store.clear().await
    }

    /// True once the store has failed often enough in a row that writes are
    /// likely being discarded. The owner decides whether to swap the store;
    /// requests keep being served live either way.
    pub fn is_degraded(&self) -> bool {
        self.consecutive_failures.load(Ordering::Relaxed) >= DEGRADED_THRESHOLD
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(Some(value)) if !value.is_empty() => {
                self.note_success();
                Some(value)
            }
            Ok(_) => {
                self.note_success();
                None
            }
            Err(err) => {
                self.note_failure(&err);
                None
            }
        }
    }

    async fn store_response(
        &self,
        key: &str,
        header: &str,
        response: &HttpResponse,
    ) {
        let minutes = parse_lifetime(header, self.options.default_ttl_minutes);
        let ttl = Duration::from_secs(minutes.saturating_mul(60));
        let value = response.body_text().into_owned();
        match self.store.put(key, &value, ttl).await {
            Ok(()) => {
                self.note_success();
                debug!("cached response for key: {}", key);
            }
            Err(err) => self.note_failure(&err),
        }
    }

    fn note_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    fn note_failure(&self, err: &CacheError) {
        let failures =
            self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if !err.is_transient() || failures == DEGRADED_THRESHOLD {
            error!(
                "cache store failing persistently, writes are being dropped: {}",
                err
            );
        } else {
            warn!("cache store error, treating as miss: {}", err);
        }
    }
}

#[async_trait]
impl Interceptor for CacheInterceptor {
    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, PipelineError> {
        let header = match request.header(&self.options.header_name) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return next.proceed(request).await,
        };

        let key = derive_cache_key(&request);
        if let Some(cached) = self.lookup(&key).await {
            return Ok(synthesize_response(&request, &cached));
        }

        let response = next.proceed(request).await?;
        if response.is_success() {
            self.store_response(&key, &header, &response).await;
        }
        Ok(response)
    }
}

/// Build a response from a cached payload. Downstream consumers cannot tell
/// it from a live response except for the marker header.
fn synthesize_response(request: &HttpRequest, cached: &str) -> HttpResponse {
    HttpResponse {
        url: request.url.clone(),
        status: 200,
        headers: HashMap::from([
            (CACHE_HINT_HEADER.to_string(), CACHE_HINT_VALUE.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
        ]),
        body: cached.as_bytes().to_vec(),
        protocol: "HTTP/1.1".to_string(),
    }
}
