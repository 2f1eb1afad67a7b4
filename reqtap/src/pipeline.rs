//! The interception chain: an ordered list of stages in front of a transport.
//!
//! Each stage receives the request plus a [`Next`] handle covering the rest
//! of the chain, so it can short-circuit, pass through, or observe the
//! response on the way back up. Pipelines are built explicitly by their
//! owner; there is no process-wide registry of instances.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{HttpRequest, HttpResponse, PipelineError};

/// A single stage in the interception chain.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, PipelineError>;
}

/// Terminal stage that performs the actual network exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, PipelineError>;
}

pub type SharedTransport = Arc<dyn Transport + Send + Sync>;

/// The remainder of the chain, handed to each interceptor.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl Next<'_> {
    /// Forward the request to the next stage, or to the transport once the
    /// chain is exhausted.
    pub async fn proceed(
        self,
        request: HttpRequest,
    ) -> Result<HttpResponse, PipelineError> {
        match self.interceptors.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    interceptors: rest,
                    transport: self.transport,
                };
                stage.intercept(request, next).await
            }
            None => self.transport.execute(request).await,
        }
    }
}

/// Ordered interceptor chain ending in a transport.
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: SharedTransport,
}

impl Pipeline {
    pub fn builder(transport: SharedTransport) -> PipelineBuilder {
        PipelineBuilder {
            interceptors: Vec::new(),
            transport,
        }
    }

    /// Run a request through every stage in order.
    pub async fn execute(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, PipelineError> {
        let next = Next {
            interceptors: &self.interceptors,
            transport: self.transport.as_ref(),
        };
        next.proceed(request).await
    }
}

pub struct PipelineBuilder {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: SharedTransport,
}

impl PipelineBuilder {
    /// Append a stage. Stages run in the order they were added.
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a stage the caller keeps a handle to, e.g. to reach
    /// administrative operations later.
    pub fn with_shared(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            interceptors: self.interceptors,
            transport: self.transport,
        }
    }
}
