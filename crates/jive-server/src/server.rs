//! Core MCP server implementation

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    config::ServerConfig,
    error::ServerResult,
    handlers::{PromptHandler, ResourceHandler, ToolHandler},
    lifecycle::{HealthStatus, ServerLifecycle},
    metrics::ServerMetrics,
    middleware::MiddlewareStack,
    registry::HandlerRegistry,
    routing::RequestRouter,
};

use bytes::Bytes;
use tokio::time::{Duration, sleep};
use jive_core::RequestContext;
use jive_protocol::jsonrpc::{JsonRpcMessage, JsonRpcRequest, JsonRpcResponse};
use jive_transport::StdioTransport;
use jive_transport::core::{TransportError, TransportMessageMetadata};
use jive_transport::{Transport, TransportMessage};

/// Handle for triggering graceful server shutdown
///
/// Provides external control over server shutdown with support for:
/// - **Signal handling**: SIGTERM, SIGINT, custom signals
/// - **Container orchestration**: Kubernetes graceful termination
/// - **Health checks**: Coordinated shutdown with load balancers  
/// - **Multi-service coordination**: Synchronized shutdown sequences
/// - **Testing**: Controlled server lifecycle in tests
///
/// The handle is cloneable and thread-safe, allowing multiple components
/// to coordinate shutdown or check shutdown status.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    lifecycle: Arc<ServerLifecycle>,
}

impl ShutdownHandle {
    /// Trigger graceful server shutdown
    pub async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }

    /// Check if shutdown has been initiated
    pub async fn is_shutting_down(&self) -> bool {
        use crate::lifecycle::ServerState;
        matches!(
            self.lifecycle.state().await,
            ServerState::ShuttingDown | ServerState::Stopped
        )
    }
}

/// Main MCP server
pub struct McpServer {
    /// Server configuration
    config: ServerConfig,
    /// Handler registry
    registry: Arc<HandlerRegistry>,
    /// Request router
    router: Arc<RequestRouter>,
    /// Middleware stack
    #[allow(dead_code)]
    middleware: Arc<RwLock<MiddlewareStack>>,
    /// Server lifecycle
    lifecycle: Arc<ServerLifecycle>,
    /// Server metrics
    metrics: Arc<ServerMetrics>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("config", &self.config)
            .finish()
    }
}

impl McpServer {
    /// Create a new server
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(HandlerRegistry::new());
        let router = Arc::new(RequestRouter::new(Arc::clone(&registry)));
        let mut stack = MiddlewareStack::new();
        stack.add(crate::middleware::LoggingMiddleware::new());
        let middleware = Arc::new(RwLock::new(stack));
        let lifecycle = Arc::new(ServerLifecycle::new());
        let metrics = Arc::new(ServerMetrics::new());

        Self {
            config,
            registry,
            router,
            middleware,
            lifecycle,
            metrics,
        }
    }

    /// Get server configuration
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get handler registry
    #[must_use]
    pub const fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Get request router
    #[must_use]
    pub const fn router(&self) -> &Arc<RequestRouter> {
        &self.router
    }

    /// Get server lifecycle
    #[must_use]
    pub const fn lifecycle(&self) -> &Arc<ServerLifecycle> {
        &self.lifecycle
    }

    /// Get server metrics
    #[must_use]
    pub const fn metrics(&self) -> &Arc<ServerMetrics> {
        &self.metrics
    }

    /// Get a shutdown handle for graceful server termination
    ///
    /// This handle enables external control over server shutdown, essential for:
    /// - **Production deployments**: Graceful shutdown on SIGTERM/SIGINT
    /// - **Container orchestration**: Kubernetes graceful pod termination
    /// - **Load balancer integration**: Health check coordination
    /// - **Multi-component systems**: Coordinated shutdown sequences
    /// - **Maintenance operations**: Planned downtime and updates
    ///
    /// # Examples
    ///
    /// ## Basic shutdown coordination
    /// ```no_run
    /// # use jive_server::ServerBuilder;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let server = ServerBuilder::new().build();
    /// let shutdown_handle = server.shutdown_handle();
    ///
    /// // Coordinate with other services
    /// tokio::spawn(async move {
    ///     // Wait for external shutdown signal
    ///     tokio::signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    ///     println!("Shutdown signal received, terminating gracefully...");
    ///     shutdown_handle.shutdown().await;
    /// });
    ///
    /// // Server will gracefully shut down when signaled
    /// // server.run_stdio().await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// ## Container/Kubernetes deployment
    /// ```no_run
    /// # use jive_server::ServerBuilder;
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let server = ServerBuilder::new().build();
    /// let shutdown_handle = server.shutdown_handle();
    /// let shutdown_handle_clone = shutdown_handle.clone();
    ///
    /// // Handle multiple signal types with proper platform support
    /// tokio::spawn(async move {
    ///     #[cfg(unix)]
    ///     {
    ///         use tokio::signal::unix::{signal, SignalKind};
    ///         let mut sigterm = signal(SignalKind::terminate()).unwrap();
    ///         tokio::select! {
    ///             _ = tokio::signal::ctrl_c() => {
    ///                 println!("SIGINT received");
    ///             }
    ///             _ = sigterm.recv() => {
    ///                 println!("SIGTERM received");
    ///             }
    ///         }
    ///     }
    ///     #[cfg(not(unix))]
    ///     {
    ///         tokio::signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    ///         println!("SIGINT received");
    ///     }
    ///     shutdown_handle_clone.shutdown().await;
    /// });
    ///
    /// // Server handles graceful shutdown automatically
    /// // server.run_tcp("0.0.0.0:8080").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            lifecycle: self.lifecycle.clone(),
        }
    }

    /// Run the server with STDIO transport
    pub async fn run_stdio(self) -> ServerResult<()> {
        tracing::info!("Starting MCP server with STDIO transport");
        self.lifecycle.start().await;

        // Initialize STDIO transport
        let mut transport = StdioTransport::new();
        if let Err(e) = transport.connect().await {
            tracing::error!(error = %e, "Failed to connect stdio transport");
            self.lifecycle.shutdown().await;
            return Err(e.into());
        }

        self.run_with_transport(transport).await
    }

    /// Get health status
    pub async fn health(&self) -> HealthStatus {
        self.lifecycle.health().await
    }

    /// Run server with HTTP transport: `POST /mcp[/{namespace}]`, `GET /health`, `GET /tools`,
    /// sharing the same registry/router every other transport dispatches through.
    #[cfg(feature = "http")]
    pub async fn run_http<A: std::net::ToSocketAddrs + Send + std::fmt::Debug>(
        self,
        addr: A,
    ) -> ServerResult<()> {
        tracing::info!(?addr, "Starting MCP server with HTTP transport");
        self.lifecycle.start().await;
        let socket_addr = Self::resolve_socket_addr(addr)?;
        let app = self.into_http_router();

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| crate::ServerError::configuration(format!("failed to bind {socket_addr}: {e}")))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| crate::ServerError::configuration(format!("http server error: {e}")))?;

        tracing::info!("HTTP server shutdown complete");
        Ok(())
    }

    /// Run server with WebSocket transport: `/ws[/{namespace}]`, one JSON-RPC request/response
    /// round trip per text frame, through the same router HTTP and stdio use.
    #[cfg(feature = "websocket")]
    pub async fn run_websocket<A: std::net::ToSocketAddrs + Send + std::fmt::Debug>(
        self,
        addr: A,
    ) -> ServerResult<()> {
        tracing::info!(?addr, "Starting MCP server with WebSocket transport");
        self.lifecycle.start().await;
        let socket_addr = Self::resolve_socket_addr(addr)?;
        let app = self.into_http_router();

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| crate::ServerError::configuration(format!("failed to bind {socket_addr}: {e}")))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| crate::ServerError::configuration(format!("websocket server error: {e}")))?;

        tracing::info!("WebSocket server shutdown complete");
        Ok(())
    }

    #[cfg(any(feature = "http", feature = "websocket", feature = "tcp"))]
    fn resolve_socket_addr<A: std::net::ToSocketAddrs + std::fmt::Debug>(
        addr: A,
    ) -> ServerResult<std::net::SocketAddr> {
        addr.to_socket_addrs()
            .map_err(|e| crate::ServerError::configuration(format!("address resolution failed: {e}")))?
            .next()
            .ok_or_else(|| crate::ServerError::configuration(format!("no socket address resolved from {addr:?}")))
    }

    /// Build the shared axum [`axum::Router`] serving both HTTP and WebSocket traffic, with
    /// CORS and the HTTP backpressure cap applied per `config`.
    #[cfg(feature = "http")]
    fn into_http_router(self) -> axum::Router {
        use axum::routing::{get, post};

        let cors = http_api::cors_layer(&self.config.cors_origins);
        let concurrency_cap = self.config.concurrency.max_concurrent_requests.max(1);
        let state = Arc::new(self);

        let mut router = axum::Router::new()
            .route("/mcp", post(http_api::call_root))
            .route("/mcp/:namespace", post(http_api::call_namespaced))
            .route("/health", get(http_api::health));

        #[cfg(feature = "websocket")]
        {
            router = router
                .route("/ws", get(http_api::ws_root))
                .route("/ws/:namespace", get(http_api::ws_namespaced));
        }

        let backpressure = tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(|_: axum::BoxError| async {
                (
                    axum::http::StatusCode::SERVICE_UNAVAILABLE,
                    "too many concurrent requests",
                )
            }))
            .load_shed()
            .concurrency_limit(concurrency_cap);

        router
            .route("/tools", get(http_api::list_tools))
            .layer(backpressure)
            .layer(cors)
            .with_state(state)
    }

    /// Run server with TCP transport (progressive enhancement - runtime configuration)
    #[cfg(feature = "tcp")]
    pub async fn run_tcp<A: std::net::ToSocketAddrs + Send + std::fmt::Debug>(
        self,
        addr: A,
    ) -> ServerResult<()> {
        use jive_transport::TcpTransport;

        tracing::info!(?addr, "Starting MCP server with TCP transport");
        self.lifecycle.start().await;

        // Convert ToSocketAddrs to SocketAddr
        let socket_addr = match addr.to_socket_addrs() {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => addr,
                None => {
                    tracing::error!("No socket address resolved from provided address");
                    self.lifecycle.shutdown().await;
                    return Err(crate::ServerError::configuration("Invalid socket address"));
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve socket address");
                self.lifecycle.shutdown().await;
                return Err(crate::ServerError::configuration(format!(
                    "Address resolution failed: {e}"
                )));
            }
        };

        let mut transport = TcpTransport::new_server(socket_addr);
        if let Err(e) = transport.connect().await {
            tracing::error!(error = %e, "Failed to connect TCP transport");
            self.lifecycle.shutdown().await;
            return Err(e.into());
        }

        self.run_with_transport(transport).await
    }

    /// Run server with Unix socket transport (progressive enhancement - runtime configuration)
    #[cfg(all(feature = "unix", unix))]
    pub async fn run_unix<P: AsRef<std::path::Path>>(self, path: P) -> ServerResult<()> {
        use std::path::PathBuf;
        use jive_transport::UnixTransport;

        tracing::info!(path = ?path.as_ref(), "Starting MCP server with Unix socket transport");
        self.lifecycle.start().await;

        let socket_path = PathBuf::from(path.as_ref());
        let mut transport = UnixTransport::new_server(socket_path);
        if let Err(e) = transport.connect().await {
            tracing::error!(error = %e, "Failed to connect Unix socket transport");
            self.lifecycle.shutdown().await;
            return Err(e.into());
        }

        self.run_with_transport(transport).await
    }

    /// Generic transport runner (DRY principle)
    async fn run_with_transport<T: Transport>(&self, mut transport: T) -> ServerResult<()> {
        // Install signal handlers for graceful shutdown (Ctrl+C / SIGTERM)
        let lifecycle_for_sigint = self.lifecycle.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                return;
            }
            tracing::info!("Ctrl+C received, initiating shutdown");
            lifecycle_for_sigint.shutdown().await;
        });

        #[cfg(unix)]
        {
            let lifecycle_for_sigterm = self.lifecycle.clone();
            tokio::spawn(async move {
                use tokio::signal::unix::{SignalKind, signal};
                match signal(SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                        tracing::info!("SIGTERM received, initiating shutdown");
                        lifecycle_for_sigterm.shutdown().await;
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to install SIGTERM handler"),
                }
            });
        }

        // Shutdown signal
        let mut shutdown = self.lifecycle.shutdown_signal();

        // Main message processing loop
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
                res = transport.receive() => {
                    match res {
                        Ok(Some(message)) => {
                            if let Err(e) = self.handle_transport_message(&mut transport, message).await {
                                tracing::warn!(error = %e, "Failed to handle transport message");
                            }
                        }
                        Ok(None) => {
                            // No message available; sleep briefly to avoid busy loop
                            sleep(Duration::from_millis(5)).await;
                        }
                        Err(e) => {
                            match e {
                                TransportError::ReceiveFailed(msg) if msg.contains("disconnected") => {
                                    tracing::info!("Transport receive channel disconnected; shutting down");
                                    break;
                                }
                                _ => {
                                    tracing::error!(error = %e, "Transport receive failed");
                                    // Backoff on errors
                                    sleep(Duration::from_millis(50)).await;
                                }
                            }
                        }
                    }
                }
            }
        }

        // Disconnect transport
        if let Err(e) = transport.disconnect().await {
            tracing::warn!(error = %e, "Error while disconnecting transport");
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn error_response(error: &crate::ServerError) -> JsonRpcResponse {
    jive_protocol::jsonrpc::JsonRpcResponse {
        jsonrpc: jive_protocol::jsonrpc::JsonRpcVersion,
        id: None,
        result: None,
        error: Some(jive_protocol::jsonrpc::JsonRpcError {
            code: error.error_code(),
            message: error.to_string(),
            data: None,
        }),
    }
}

impl McpServer {
    /// Run one JSON-RPC request through the middleware stack and the shared router. Used by
    /// every transport (stdio, HTTP, WebSocket) so request handling is identical regardless of
    /// how the bytes arrived.
    async fn process_json_rpc(&self, req: JsonRpcRequest, ctx: RequestContext) -> JsonRpcResponse {
        let (req, ctx) = match self.middleware.read().await.process_request(req, ctx).await {
            Ok(tuple) => tuple,
            Err(e) => return error_response(&e),
        };

        let resp = self.router.route(req, ctx.clone()).await;

        match self.middleware.read().await.process_response(resp, &ctx).await {
            Ok(r) => r,
            Err(e) => error_response(&e),
        }
    }
}

impl McpServer {
    async fn handle_transport_message(
        &self,
        transport: &mut dyn Transport,
        message: TransportMessage,
    ) -> ServerResult<()> {
        // Convert bytes to str
        let json_str = match std::str::from_utf8(&message.payload) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in incoming message");
                return Ok(());
            }
        };

        // Parse JSON-RPC
        let parsed = serde_json::from_str::<JsonRpcMessage>(json_str);
        let response_json = match parsed {
            Ok(JsonRpcMessage::Request(req)) => {
                let ctx = RequestContext::new().with_metadata("transport", "stdio");
                let resp = self.process_json_rpc(req, ctx).await;
                serde_json::to_string(&resp).ok()
            }
            Ok(JsonRpcMessage::RequestBatch(batch)) => {
                // Convert batch to Vec<JsonRpcRequest>
                let requests: Vec<JsonRpcRequest> = batch.items;
                let ctx = RequestContext::new().with_metadata("transport", "stdio");
                // Process each request through middleware by reusing the routerâ€™s batch processing
                let responses = self.router.route_batch(requests, ctx).await;
                serde_json::to_string(&responses).ok()
            }
            Ok(JsonRpcMessage::Notification(_note)) => {
                // No response for notifications
                None
            }
            // Ignore responses from client (server-initiated only)
            Ok(
                JsonRpcMessage::Response(_)
                | JsonRpcMessage::ResponseBatch(_)
                | JsonRpcMessage::MessageBatch(_),
            ) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON-RPC message");
                None
            }
        };

        if let Some(resp_str) = response_json {
            let reply = TransportMessage::with_metadata(
                message.id,
                Bytes::from(resp_str),
                TransportMessageMetadata::with_content_type("application/json"),
            );
            if let Err(e) = transport.send(reply).await {
                tracing::warn!(error = %e, "Failed to send response over transport");
            }
        }

        Ok(())
    }
}

/// Server builder for convenient server construction
pub struct ServerBuilder {
    /// Server configuration
    config: ServerConfig,
    /// Registry builder
    registry: HandlerRegistry,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ServerBuilder {
    /// Create a new server builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            registry: HandlerRegistry::new(),
        }
    }

    /// Set server name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set server version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set server description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Add a tool handler
    pub fn tool<T>(self, name: impl Into<String>, handler: T) -> ServerResult<Self>
    where
        T: ToolHandler + 'static,
    {
        self.registry.register_tool(name, handler)?;
        Ok(self)
    }

    /// Add a prompt handler
    pub fn prompt<P>(self, name: impl Into<String>, handler: P) -> ServerResult<Self>
    where
        P: PromptHandler + 'static,
    {
        self.registry.register_prompt(name, handler)?;
        Ok(self)
    }

    /// Add a resource handler
    pub fn resource<R>(self, name: impl Into<String>, handler: R) -> ServerResult<Self>
    where
        R: ResourceHandler + 'static,
    {
        self.registry.register_resource(name, handler)?;
        Ok(self)
    }

    /// Register the closed eight-tool Jive surface against a shared dispatcher.
    pub fn jive_tools(self, dispatcher: Arc<crate::tools::ToolDispatcher>) -> ServerResult<Self> {
        let mut builder = self;
        for name in crate::tools::TOOL_NAMES {
            let handler = crate::tools::JiveToolHandler::new(Arc::clone(&dispatcher), name);
            builder = builder.tool(name, handler)?;
        }
        Ok(builder)
    }

    /// Build the server
    #[must_use]
    pub fn build(self) -> McpServer {
        let mut server = McpServer::new(self.config);
        server.registry = Arc::new(self.registry);
        let mut router = RequestRouter::new(Arc::clone(&server.registry));
        let _ = router.add_route(crate::routing::ShutdownRouteHandler::new(Arc::clone(
            &server.lifecycle,
        )));
        server.router = Arc::new(router);
        server
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
mod http_api {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::Json;
    use jive_core::RequestContext;
    use jive_protocol::jsonrpc::JsonRpcRequest;
    use serde_json::json;

    use super::McpServer;

    /// Build the CORS layer from `JIVE_CORS_ORIGINS`: `*` is permissive, anything else is
    /// parsed as a comma-separated allowlist of exact origins.
    pub(super) fn cors_layer(origins: &str) -> tower_http::cors::CorsLayer {
        use tower_http::cors::{AllowOrigin, CorsLayer};

        let layer = CorsLayer::new()
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers(tower_http::cors::Any);

        if origins.trim() == "*" {
            layer.allow_origin(tower_http::cors::Any)
        } else {
            let parsed: Vec<_> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            layer.allow_origin(AllowOrigin::list(parsed))
        }
    }

    fn namespace_context(namespace: Option<&str>, headers: &HeaderMap) -> RequestContext {
        let mut ctx = RequestContext::new().with_metadata("transport", "http");
        if let Some(ns) = namespace {
            ctx = ctx.with_metadata("path-namespace", ns);
        }
        if let Some(header_ns) = headers.get("x-namespace").and_then(|v| v.to_str().ok()) {
            ctx = ctx.with_metadata("x-namespace", header_ns);
        }
        ctx
    }

    pub(super) async fn call_root(
        State(server): State<Arc<McpServer>>,
        headers: HeaderMap,
        Json(request): Json<JsonRpcRequest>,
    ) -> impl IntoResponse {
        let ctx = namespace_context(None, &headers);
        Json(server.process_json_rpc(request, ctx).await)
    }

    pub(super) async fn call_namespaced(
        State(server): State<Arc<McpServer>>,
        Path(namespace): Path<String>,
        headers: HeaderMap,
        Json(request): Json<JsonRpcRequest>,
    ) -> impl IntoResponse {
        let ctx = namespace_context(Some(&namespace), &headers);
        Json(server.process_json_rpc(request, ctx).await)
    }

    pub(super) async fn health(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
        let status = server.health().await;
        (StatusCode::OK, Json(json!({ "status": format!("{status:?}") })))
    }

    pub(super) async fn list_tools(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
        let tools = server.registry.get_tool_definitions();
        Json(json!({ "tools": tools }))
    }

    #[cfg(feature = "websocket")]
    pub(super) async fn ws_root(
        State(server): State<Arc<McpServer>>,
        headers: HeaderMap,
        ws: axum::extract::ws::WebSocketUpgrade,
    ) -> impl IntoResponse {
        ws.on_upgrade(move |socket| handle_socket(socket, server, None, headers))
    }

    #[cfg(feature = "websocket")]
    pub(super) async fn ws_namespaced(
        State(server): State<Arc<McpServer>>,
        Path(namespace): Path<String>,
        headers: HeaderMap,
        ws: axum::extract::ws::WebSocketUpgrade,
    ) -> impl IntoResponse {
        ws.on_upgrade(move |socket| handle_socket(socket, server, Some(namespace), headers))
    }

    #[cfg(feature = "websocket")]
    async fn handle_socket(
        mut socket: axum::extract::ws::WebSocket,
        server: Arc<McpServer>,
        namespace: Option<String>,
        headers: HeaderMap,
    ) {
        use axum::extract::ws::Message;
        use futures::{SinkExt, StreamExt};

        let ctx_template = namespace_context(namespace.as_deref(), &headers);

        while let Some(Ok(msg)) = socket.next().await {
            let Message::Text(text) = msg else {
                if matches!(msg, Message::Close(_)) {
                    break;
                }
                continue;
            };

            let request: JsonRpcRequest = match serde_json::from_str(&text) {
                Ok(req) => req,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse JSON-RPC message over websocket");
                    continue;
                }
            };

            let response = server.process_json_rpc(request, ctx_template.clone()).await;
            let Ok(rendered) = serde_json::to_string(&response) else {
                continue;
            };
            if socket.send(Message::Text(rendered)).await.is_err() {
                break;
            }
        }
    }
}
