//! Middleware system for request/response processing

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use jive_core::RequestContext;
use jive_protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse};

use crate::{ServerError, ServerResult};

/// Middleware trait for processing requests and responses
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process request before routing
    async fn process_request(
        &self,
        request: &mut JsonRpcRequest,
        ctx: &mut RequestContext,
    ) -> ServerResult<()>;

    /// Process response after routing
    async fn process_response(
        &self,
        response: &mut JsonRpcResponse,
        ctx: &RequestContext,
    ) -> ServerResult<()>;

    /// Get middleware name
    fn name(&self) -> &str;

    /// Get middleware priority (lower numbers = higher priority)
    fn priority(&self) -> u32 {
        100
    }

    /// Check if middleware is enabled
    fn enabled(&self) -> bool {
        true
    }
}

/// Middleware stack for composing multiple middleware
pub struct MiddlewareStack {
    /// Ordered list of middleware
    middleware: Vec<Arc<dyn Middleware>>,
    /// Stack configuration
    config: StackConfig,
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("middleware_count", &self.middleware.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Middleware stack configuration
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Enable middleware metrics
    pub enable_metrics: bool,
    /// Enable middleware tracing
    pub enable_tracing: bool,
    /// Middleware timeout in milliseconds
    pub timeout_ms: u64,
    /// Enable error recovery
    pub enable_recovery: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            enable_tracing: true,
            timeout_ms: 5_000,
            enable_recovery: true,
        }
    }
}

impl MiddlewareStack {
    /// Create a new middleware stack
    #[must_use]
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
            config: StackConfig::default(),
        }
    }

    /// Create a stack with configuration
    #[must_use]
    pub fn with_config(config: StackConfig) -> Self {
        Self {
            middleware: Vec::new(),
            config,
        }
    }

    /// Add middleware to the stack
    pub fn add<M>(&mut self, middleware: M)
    where
        M: Middleware + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self.sort_by_priority();
    }

    /// Remove middleware by name
    pub fn remove(&mut self, name: &str) {
        self.middleware.retain(|m| m.name() != name);
    }

    /// Process request through all middleware
    pub async fn process_request(
        &self,
        mut request: JsonRpcRequest,
        mut ctx: RequestContext,
    ) -> ServerResult<(JsonRpcRequest, RequestContext)> {
        // Record a start timestamp for end-to-end latency
        let global_start = Instant::now();
        for middleware in &self.middleware {
            if !middleware.enabled() {
                continue;
            }

            let start = Instant::now();

            // Apply timeout if configured
            let result = if self.config.timeout_ms > 0 {
                tokio::time::timeout(
                    Duration::from_millis(self.config.timeout_ms),
                    middleware.process_request(&mut request, &mut ctx),
                )
                .await
            } else {
                Ok(middleware.process_request(&mut request, &mut ctx).await)
            };

            let duration = start.elapsed();

            if self.config.enable_tracing {
                tracing::debug!(
                    middleware = middleware.name(),
                    duration_ms = duration.as_millis(),
                    "Processed request through middleware"
                );
            }

            match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => {
                    if self.config.enable_recovery {
                        tracing::warn!(
                            middleware = middleware.name(),
                            error = %e,
                            "Middleware error, continuing with recovery"
                        );
                        continue;
                    }
                    return Err(ServerError::middleware(middleware.name(), e.to_string()));
                }
                Err(_) => {
                    let _error = format!(
                        "Middleware '{}' timed out after {}ms",
                        middleware.name(),
                        self.config.timeout_ms
                    );
                    if self.config.enable_recovery {
                        tracing::warn!(
                            middleware = middleware.name(),
                            "Middleware timeout, continuing"
                        );
                        continue;
                    }
                    return Err(ServerError::timeout("middleware", self.config.timeout_ms));
                }
            }
        }

        // Correlation/request identifiers
        let correlation_id = ctx
            .metadata
            .get("correlation_id")
            .and_then(|v| v.as_str())
            .map_or_else(
                || uuid::Uuid::new_v4().to_string(),
                std::string::ToString::to_string,
            );
        ctx = ctx.with_metadata("correlation_id", correlation_id);

        // Store precise start time and monotonic start in metadata
        let start_ns = start_ts();
        let request_id = ctx.request_id.clone();
        ctx = ctx.with_metadata("request_start_ns", start_ns);
        ctx = ctx.with_metadata("request_id", request_id);
        // Also include wall-clock duration so far (best-effort)
        ctx = ctx.with_metadata(
            "middleware_time_ms",
            global_start.elapsed().as_millis() as u64,
        );
        Ok((request, ctx))
    }

    /// Process response through all middleware (in reverse order)
    pub async fn process_response(
        &self,
        mut response: JsonRpcResponse,
        ctx: &RequestContext,
    ) -> ServerResult<JsonRpcResponse> {
        for middleware in self.middleware.iter().rev() {
            if !middleware.enabled() {
                continue;
            }

            let start = Instant::now();

            // Apply timeout if configured
            let result = if self.config.timeout_ms > 0 {
                tokio::time::timeout(
                    Duration::from_millis(self.config.timeout_ms),
                    middleware.process_response(&mut response, ctx),
                )
                .await
            } else {
                Ok(middleware.process_response(&mut response, ctx).await)
            };

            let duration = start.elapsed();

            if self.config.enable_tracing {
                tracing::debug!(
                    middleware = middleware.name(),
                    duration_ms = duration.as_millis(),
                    "Processed response through middleware"
                );
            }

            match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => {
                    if self.config.enable_recovery {
                        tracing::warn!(
                            middleware = middleware.name(),
                            error = %e,
                            "Middleware error in response processing, continuing"
                        );
                        continue;
                    }
                    return Err(ServerError::middleware(middleware.name(), e.to_string()));
                }
                Err(_) => {
                    if self.config.enable_recovery {
                        tracing::warn!(
                            middleware = middleware.name(),
                            "Middleware timeout in response processing, continuing"
                        );
                        continue;
                    }
                    return Err(ServerError::timeout("middleware", self.config.timeout_ms));
                }
            }
        }

        // Compute end-to-end latency if start_ns present
        if let Some(ns) = ctx
            .metadata
            .get("request_start_ns")
            .and_then(serde_json::Value::as_u64)
        {
            let end_ns = start_ts();
            let elapsed_ns = end_ns.saturating_sub(ns);
            let latency_ms = (elapsed_ns as f64) / 1_000_000.0;
            tracing::debug!(
                correlation_id = ctx.metadata.get("correlation_id").and_then(|v| v.as_str()),
                request_id = %ctx.request_id,
                latency_ms,
                "Request completed with latency"
            );
        }
        Ok(response)
    }

    /// Get middleware count
    #[must_use]
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Check if stack is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// List all middleware names
    #[must_use]
    pub fn list_middleware(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    fn sort_by_priority(&mut self) {
        self.middleware.sort_by_key(|m| m.priority());
    }
}

impl Default for MiddlewareStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging middleware for request/response logging
#[derive(Debug)]
pub struct LoggingMiddleware {
    /// Logging configuration
    config: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log request bodies
    pub log_request_body: bool,
    /// Log response bodies
    pub log_response_body: bool,
    /// Log timing information
    pub log_timing: bool,
    /// Maximum body size to log
    pub max_body_size: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_request_body: false,
            log_response_body: false,
            log_timing: true,
            max_body_size: 1024,
        }
    }
}

impl LoggingMiddleware {
    /// Create new logging middleware
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LoggingConfig::default(),
        }
    }

    /// Create with configuration
    #[must_use]
    pub const fn with_config(config: LoggingConfig) -> Self {
        Self { config }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn process_request(
        &self,
        request: &mut JsonRpcRequest,
        ctx: &mut RequestContext,
    ) -> ServerResult<()> {
        // RequestContext already tracks start_time internally
        let _start_time = ctx.start_time;

        if self.config.log_request_body {
            if let Ok(body) = serde_json::to_string(request) {
                if body.len() <= self.config.max_body_size {
                    tracing::info!(method = %request.method, body = %body, "Request received");
                } else {
                    tracing::info!(method = %request.method, body_size = body.len(), "Request received (body truncated)");
                }
            }
        } else {
            tracing::info!(method = %request.method, id = ?request.id, "Request received");
        }

        Ok(())
    }

    async fn process_response(
        &self,
        response: &mut JsonRpcResponse,
        ctx: &RequestContext,
    ) -> ServerResult<()> {
        if self.config.log_timing {
            // Calculate duration from start time
            let duration = ctx.start_time.elapsed();
            tracing::info!(
                id = ?response.id,
                has_error = response.error.is_some(),
                duration_ms = duration.as_millis(),
                "Request completed"
            );
        }

        if self.config.log_response_body
            && let Ok(body) = serde_json::to_string(response)
        {
            if body.len() <= self.config.max_body_size {
                tracing::debug!(id = ?response.id, body = %body, "Response sent");
            } else {
                tracing::debug!(id = ?response.id, body_size = body.len(), "Response sent (body truncated)");
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "logging"
    }

    fn priority(&self) -> u32 {
        1000 // Low priority - log everything
    }
}

/// Middleware layer for easier composition
pub type MiddlewareLayer = Arc<dyn Middleware>;

fn start_ts() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
