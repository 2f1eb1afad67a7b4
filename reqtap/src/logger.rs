//! Request/response logging stage.
//!
//! Logs the outbound request before forwarding and the inbound response
//! after it returns, with elapsed wall-clock time. Bodies are owned buffers,
//! so logging them leaves nothing drained for later readers.

use std::borrow::Cow;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{HttpRequest, HttpResponse, Interceptor, Next, PipelineError};

const HTTP_LOG: &str = "http_log";

/// Pass-through stage that logs both request directions with timing.
#[derive(Debug, Default)]
pub struct LogInterceptor;

#[async_trait]
impl Interceptor for LogInterceptor {
    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, PipelineError> {
        log_request(&request);
        let started = Instant::now();
        let result = next.proceed(request).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
        match &result {
            Ok(response) => log_response(response, elapsed_ms),
            Err(err) => {
                warn!(target: HTTP_LOG, elapsed_ms, "request failed: {}", err)
            }
        }
        result
    }
}

fn log_request(request: &HttpRequest) {
    info!(
        target: HTTP_LOG,
        url = %request.url,
        headers = ?request.headers,
        body = %request.body_text().unwrap_or(Cow::Borrowed("")),
        "sending request"
    );
}

fn log_response(response: &HttpResponse, elapsed_ms: f64) {
    info!(
        target: HTTP_LOG,
        url = %response.url,
        status = response.status,
        headers = ?response.headers,
        body = %response.body_text(),
        elapsed_ms,
        "received response"
    );
}
