//! # reqtap - opt-in caching and logging interceptors for HTTP clients
//!
//! `reqtap` is a small interception pipeline that sits between a caller and
//! its HTTP transport. Any request can opt into response caching by carrying
//! a single header with the desired lifetime; everything else passes through
//! untouched. A companion logging stage records both request directions with
//! timing.
//!
//! ## Features
//!
//! - **Header-driven caching**: add the opt-in header to exactly the requests
//!   you want cached; its value is the lifetime in minutes.
//! - **Pluggable storage**: any [`reqtap_cache::CacheStore`] works behind the
//!   cache stage; in-memory and disk-backed (fjall) stores ship with it.
//! - **Deterministic keys**: requests map to stable MD5 keys derived from the
//!   URL, plus the body for POST/PATCH.
//! - **Synthesized hits**: cache hits short-circuit the transport and are
//!   marked with a hint header, otherwise indistinguishable from live
//!   responses.
//! - **Transparent logging**: the logging stage never disturbs bodies and
//!   reports elapsed time with sub-millisecond resolution.
//!
//! ## Modules
//!
//! - `http`: owned request/response types carried through the pipeline.
//! - `pipeline`: the ordered interceptor chain and its transport terminal.
//! - `cache`: the caching interceptor and response synthesis.
//! - `key` / `policy`: cache key derivation and TTL header parsing.
//! - `logger`: the request/response logging interceptor.
//! - `transport`: reqwest-backed transport and client configuration.

pub mod cache;
pub mod error;
pub mod http;
pub mod key;
pub mod logger;
pub mod pipeline;
pub mod policy;
pub mod transport;

pub use crate::cache::{
    CacheInterceptor, CacheOptions, CacheOptionsBuilder, CACHE_HEADER,
    CACHE_HINT_HEADER, CACHE_HINT_VALUE,
};
pub use crate::error::PipelineError;
pub use crate::http::{HttpRequest, HttpResponse};
pub use crate::key::derive_cache_key;
pub use crate::logger::LogInterceptor;
pub use crate::pipeline::{
    Interceptor, Next, Pipeline, PipelineBuilder, SharedTransport, Transport,
};
pub use crate::policy::{parse_lifetime, DEFAULT_TTL_MINUTES};
pub use crate::transport::{build_http_client, ClientParams, ReqwestTransport};

// re-export
pub use async_trait;
pub use reqtap_cache as store;
pub use reqwest;
pub use serde_yaml;
pub use tracing;
