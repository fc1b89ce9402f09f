//! Error types for the portal shell.
//!
//! The taxonomy follows the three failure classes the shell actually has:
//! configuration errors (authored route trees, fail fast), transport errors
//! (captured into workspace/view status, never propagated as faults), and
//! session-slot I/O errors.

use thiserror::Error;

/// ConfigError
///
/// Raised while validating the statically authored route/menu description.
/// These always indicate an authoring bug, so callers are expected to fail
/// fast at startup rather than skip the offending node.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A raw route node did not carry exactly one of
    /// {children, renderer, redirect} (a group may additionally carry a
    /// renderer as its landing page).
    #[error("malformed route node at '{path}': {reason}")]
    MalformedRouteNode { path: String, reason: String },

    /// A group node was authored with an empty child list.
    #[error("route group at '{path}' has no children")]
    EmptyGroup { path: String },

    /// The configured login entry point does not resolve against the route
    /// table, which would leave the session gate's redirect a dead end.
    #[error("login path '{path}' does not resolve to any route")]
    UnresolvedLoginPath { path: String },
}

/// TransportError
///
/// Failure surface of the `PortalApi` collaborator. The workspace cache
/// converts these into its `Error` status; it never re-raises them.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the portal API.
    #[error("unexpected status {status} from '{path}'")]
    Status { status: u16, path: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Simulated failure from the mock transport, used in tests.
    #[error("mock transport failure: {0}")]
    Mock(String),
}

/// SessionStoreError
///
/// I/O-level failure of the durable credential slot. Credential *absence* is
/// not an error (it is the normal unauthenticated signal); these only cover a
/// slot that could not be read or written at all.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session slot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session slot contents are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
