//! Namespace Resolver (C3): a purely functional lookup of the effective namespace for a
//! single request, consulting sources in a fixed priority order.

use jive_core::Namespace;

use crate::error::ServerError;

/// Every place a namespace value might come from for a single request, in priority order.
/// Earlier fields win; later ones are only consulted if all earlier ones are absent.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSources {
    /// The `{namespace}` path segment on `/mcp/{namespace}` or `/ws/{namespace}` (HTTP/WS only).
    pub path_segment: Option<String>,
    /// The `X-Namespace` HTTP header (HTTP/WS only).
    pub header: Option<String>,
    /// `params._meta.namespace` on the JSON-RPC request.
    pub meta_namespace: Option<String>,
    /// `arguments.namespace` on the tool call.
    pub argument_namespace: Option<String>,
}

/// Resolve the effective namespace for a request, falling back to `default_namespace` if none
/// of `sources` supplies one.
///
/// # Errors
///
/// Returns [`ServerError::InvalidNamespace`] if the first non-empty source fails
/// `[a-zA-Z0-9_-]{1,64}`.
pub fn resolve(sources: &NamespaceSources, default_namespace: &Namespace) -> Result<Namespace, ServerError> {
    let candidate = [
        sources.path_segment.as_deref(),
        sources.header.as_deref(),
        sources.meta_namespace.as_deref(),
        sources.argument_namespace.as_deref(),
    ]
    .into_iter()
    .find_map(|source| source.filter(|value| !value.is_empty()));

    match candidate {
        Some(raw) => Namespace::parse(raw).map_err(|e| ServerError::InvalidNamespace(e.to_string())),
        None => Ok(default_namespace.clone()),
    }
}
