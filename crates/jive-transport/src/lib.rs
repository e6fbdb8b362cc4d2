//! # mcp-jive transport layer
//!
//! Three interchangeable MCP transports: line-delimited JSON-RPC over
//! stdio, JSON-RPC over HTTP POST, and JSON-RPC over WebSocket frames.
//! All three wrap the same `jive-protocol` dispatch code, so a request
//! produces identical results regardless of which one carried it.
//!
//! ## Module Organization
//!
//! ```text
//! jive-transport/
//! ├── core/             # Transport trait, TransportError, TransportMessage
//! ├── stdio/            # Line-delimited JSON-RPC over stdin/stdout
//! ├── axum_integration/ # HTTP POST /mcp(/{namespace}) + GET /health, /tools
//! ├── websocket/        # ws://.../ws(/{namespace})
//! └── metrics/          # Per-transport message/latency counters
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,  // Error documentation in progress
    clippy::cast_possible_truncation,  // Intentional in metrics code
    clippy::must_use_candidate,  // Too pedantic for library APIs
    clippy::return_self_not_must_use,  // Constructor methods don't need must_use
    clippy::struct_excessive_bools,  // Sometimes bools are the right design
    clippy::missing_panics_doc,  // Panic docs added where genuinely needed
    clippy::default_trait_access  // Default::default() is sometimes clearer
)]

pub mod core;

#[cfg(feature = "stdio")]
pub mod stdio;

// Tower service integration (shared by the axum HTTP/WS drivers)
pub mod tower;

#[cfg(feature = "http")]
pub mod axum_integration;

#[cfg(feature = "websocket")]
pub mod websocket;

pub mod config;
pub mod metrics;

// Re-export core transport traits and types
pub use core::{
    Transport, TransportCapabilities, TransportConfig, TransportError, TransportEvent,
    TransportMessage, TransportMetrics, TransportResult, TransportState, TransportType,
};

// Re-export transport implementations
#[cfg(feature = "stdio")]
pub use stdio::StdioTransport;

// Re-export Tower integration
pub use tower::{SessionInfo, SessionManager, TowerTransportAdapter};

// Re-export Axum integration
#[cfg(feature = "http")]
pub use axum_integration::{AxumMcpExt, McpAppState, McpServerConfig, McpService};

#[cfg(feature = "websocket")]
pub use websocket::WebSocketTransport;

// Re-export utilities
pub use config::TransportConfigBuilder;

/// Transport feature detection
#[derive(Debug)]
pub struct Features;

impl Features {
    /// Check if stdio transport is available
    #[must_use]
    pub const fn has_stdio() -> bool {
        cfg!(feature = "stdio")
    }

    /// Check if HTTP transport is available
    #[must_use]
    pub const fn has_http() -> bool {
        cfg!(feature = "http")
    }

    /// Check if WebSocket transport is available
    #[must_use]
    pub const fn has_websocket() -> bool {
        cfg!(feature = "websocket")
    }

    /// Get list of available transport types
    #[must_use]
    pub fn available_transports() -> Vec<TransportType> {
        let mut transports = Vec::new();

        if Self::has_stdio() {
            transports.push(TransportType::Stdio);
        }
        if Self::has_http() {
            transports.push(TransportType::Http);
        }
        if Self::has_websocket() {
            transports.push(TransportType::WebSocket);
        }

        transports
    }
}
