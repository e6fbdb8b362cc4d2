//! Server error types and handling

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Comprehensive server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Core errors
    #[error("Core error: {0}")]
    Core(#[from] jive_core::registry::RegistryError),

    /// Transport layer errors
    #[error("Transport error: {0}")]
    Transport(#[from] jive_transport::TransportError),

    /// Handler registration errors
    #[error("Handler error: {message}")]
    Handler {
        /// Error message
        message: String,
        /// Optional error context
        context: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
        /// Configuration key that caused the error
        key: Option<String>,
    },

    /// Authentication errors
    #[error("Authentication error: {message}")]
    Authentication {
        /// Error message
        message: String,
        /// Authentication method that failed
        method: Option<String>,
    },

    /// Authorization errors
    #[error("Authorization error: {message}")]
    Authorization {
        /// Error message
        message: String,
        /// Resource being accessed
        resource: Option<String>,
    },

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message
        message: String,
        /// Retry after seconds
        retry_after: Option<u64>,
    },

    /// Server lifecycle errors
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Server shutdown errors
    #[error("Shutdown error: {0}")]
    Shutdown(String),

    /// Middleware errors
    #[error("Middleware error: {name}: {message}")]
    Middleware {
        /// Middleware name
        name: String,
        /// Error message
        message: String,
    },

    /// Registry errors
    #[error("Registry error: {0}")]
    Registry(String),

    /// Routing errors
    #[error("Routing error: {message}")]
    Routing {
        /// Error message
        message: String,
        /// Request method that failed
        method: Option<String>,
    },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Resource exhaustion
    #[error("Resource exhausted: {resource}")]
    ResourceExhausted {
        /// Resource type
        resource: String,
        /// Current usage
        current: Option<usize>,
        /// Maximum allowed
        max: Option<usize>,
    },

    /// Tool arguments failed schema validation
    #[error("validation failed at {field}: {message}")]
    Validation {
        /// Dotted path of the offending field
        field: String,
        /// Human-readable description of the failure
        message: String,
    },

    /// `action` (or equivalent discriminator) was missing or not recognized by the tool
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// `tools/call` named a tool outside the closed catalog
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// A slug or key that must be unique within the namespace already exists
    #[error("duplicate slug or key: {0}")]
    DuplicateSlug(String),

    /// `add_dependency` would create a cycle; carries the discovered cycle path
    #[error("would create a cycle: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    /// The resolved namespace failed `[a-zA-Z0-9_-]{1,64}`
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// The backing store reported a transient failure
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ServerError {
    /// Create a new handler error
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
            context: None,
        }
    }

    /// Create a handler error with context
    pub fn handler_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: None,
        }
    }

    /// Create a configuration error with key
    pub fn configuration_with_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a new authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            method: None,
        }
    }

    /// Create an authentication error with method
    pub fn authentication_with_method(
        message: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self::Authentication {
            message: message.into(),
            method: Some(method.into()),
        }
    }

    /// Create a new authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
            resource: None,
        }
    }

    /// Create an authorization error with resource
    pub fn authorization_with_resource(
        message: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self::Authorization {
            message: message.into(),
            resource: Some(resource.into()),
        }
    }

    /// Create a new rate limit error
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create a rate limit error with retry after
    pub fn rate_limit_with_retry(message: impl Into<String>, retry_after: u64) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after: Some(retry_after),
        }
    }

    /// Create a new middleware error
    pub fn middleware(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Middleware {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new routing error
    pub fn routing(message: impl Into<String>) -> Self {
        Self::Routing {
            message: message.into(),
            method: None,
        }
    }

    /// Create a routing error with method
    pub fn routing_with_method(message: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Routing {
            message: message.into(),
            method: Some(method.into()),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a resource exhausted error
    pub fn resource_exhausted(resource: impl Into<String>) -> Self {
        Self::ResourceExhausted {
            resource: resource.into(),
            current: None,
            max: None,
        }
    }

    /// Create a resource exhausted error with usage info
    pub fn resource_exhausted_with_usage(
        resource: impl Into<String>,
        current: usize,
        max: usize,
    ) -> Self {
        Self::ResourceExhausted {
            resource: resource.into(),
            current: Some(current),
            max: Some(max),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ResourceExhausted { .. } | Self::RateLimit { .. }
        )
    }

    /// Check if this error should cause server shutdown
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Lifecycle(_) | Self::Shutdown(_) | Self::Internal(_)
        )
    }

    /// Get error code for JSON-RPC responses
    #[must_use]
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Core(_) => -32603,
            Self::NotFound { .. } => -32004,
            Self::Authentication { .. } => -32008,
            Self::Authorization { .. } => -32005,
            Self::RateLimit { .. } => -32009,
            Self::ResourceExhausted { .. } => -32010,
            Self::Timeout { .. } => -32603,
            Self::Handler { .. } => -32002,
            _ => -32603,
        }
    }

    /// Map this error onto the closed tool-response error-code taxonomy.
    #[must_use]
    pub const fn taxonomy_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidAction(_) => "INVALID_ACTION",
            Self::ToolNotFound(_) => "TOOL_NOT_FOUND",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateSlug(_) => "DUPLICATE_SLUG",
            Self::CycleDetected(_) => "CYCLE_DETECTED",
            Self::InvalidNamespace(_) => "INVALID_NAMESPACE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Timeout { .. } => "TIMEOUT",
            _ => "INTERNAL",
        }
    }

    /// Whether the dispatcher should retry this error internally (bounded, with backoff).
    #[must_use]
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<jive_store::StoreError> for ServerError {
    fn from(err: jive_store::StoreError) -> Self {
        match err {
            jive_store::StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            jive_store::StoreError::NotFound(msg) => Self::NotFound { resource: msg },
            jive_store::StoreError::ConstraintViolation(msg) => Self::DuplicateSlug(msg),
            jive_store::StoreError::InvalidArgument(msg) => {
                Self::Validation { field: "arguments".to_string(), message: msg }
            }
            jive_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<jive_search::SearchError> for ServerError {
    fn from(err: jive_search::SearchError) -> Self {
        match err {
            jive_search::SearchError::EmptyQuery => {
                Self::Validation { field: "query".to_string(), message: err.to_string() }
            }
            jive_search::SearchError::LimitOutOfRange(_) => {
                Self::Validation { field: "limit".to_string(), message: err.to_string() }
            }
            jive_search::SearchError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<jive_workitem::WorkItemError> for ServerError {
    fn from(err: jive_workitem::WorkItemError) -> Self {
        match err {
            jive_workitem::WorkItemError::NotFound(msg) => Self::NotFound { resource: msg },
            jive_workitem::WorkItemError::CycleDetected(path) => Self::CycleDetected(path),
            jive_workitem::WorkItemError::DanglingReference(msg) => Self::NotFound { resource: msg },
            jive_workitem::WorkItemError::InvalidInput(msg) => {
                Self::Validation { field: "arguments".to_string(), message: msg }
            }
            jive_workitem::WorkItemError::Store(store_err) => store_err.into(),
            jive_workitem::WorkItemError::Search(search_err) => search_err.into(),
        }
    }
}

impl From<jive_memory::MemoryError> for ServerError {
    fn from(err: jive_memory::MemoryError) -> Self {
        match err {
            jive_memory::MemoryError::NotFound(msg) => Self::NotFound { resource: msg },
            jive_memory::MemoryError::DuplicateSlug(msg) => Self::DuplicateSlug(msg),
            jive_memory::MemoryError::InvalidSlug(msg) => {
                Self::Validation { field: "unique_slug".to_string(), message: msg }
            }
            jive_memory::MemoryError::InvalidInput(msg) => {
                Self::Validation { field: "arguments".to_string(), message: msg }
            }
            jive_memory::MemoryError::Markdown(msg) => {
                Self::Validation { field: "document".to_string(), message: msg }
            }
            jive_memory::MemoryError::Store(store_err) => store_err.into(),
            jive_memory::MemoryError::Search(search_err) => search_err.into(),
        }
    }
}

/// Error recovery strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRecovery {
    /// Retry the operation
    Retry,
    /// Skip and continue
    Skip,
    /// Fail immediately
    Fail,
    /// Graceful degradation
    Degrade,
}

/// Error context for detailed error reporting
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Error category
    pub category: String,
    /// Operation being performed
    pub operation: String,
    /// Request ID if applicable
    pub request_id: Option<String>,
    /// Client ID if applicable
    pub client_id: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(category: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            operation: operation.into(),
            request_id: None,
            client_id: None,
            metadata: std::collections::HashMap::new(),
        }
    }

    /// Add request ID to context
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Add client ID to context
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Add metadata to context
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// Note: McpError conversion is handled by the MCP client crate
// since McpError wraps ServerError, not the other way around
