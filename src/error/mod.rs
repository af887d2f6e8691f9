//! Error types for the Meridian query client

use thiserror::Error;

/// Result type alias for query client operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Main error type for the query client
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Errors raised while assembling a predicate, target, or operator.
///
/// These are raised synchronously at build or encode time, before any
/// network call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("Cannot build a comparison against an empty list: non-reifiable type")]
    EmptyOperandList,

    #[error("Mixed-type array operand: expected {expected}, found {found}")]
    MixedOperandArray { expected: String, found: String },

    #[error("Operand kind not supported here: {0}")]
    UnsupportedOperand(String),

    #[error("Combined target requires at least one target")]
    EmptyTargetList,

    #[error("Combined targets must be named")]
    UnnamedCombinedTarget,

    #[error("Multi-vector rows must share one width: expected {expected}, found {found}")]
    RaggedMultiVector { expected: usize, found: usize },

    #[error("Manual weights require one weight per target: {targets} targets, {weights} weights")]
    ManualWeightMismatch { targets: usize, weights: usize },

    #[error("Group-by counts must be at least 1: max_groups={max_groups}, max_objects_per_group={max_objects_per_group}")]
    InvalidGroupBy {
        max_groups: u32,
        max_objects_per_group: u32,
    },

    #[error("Aggregate request declares no metrics")]
    EmptyAggregation,

    #[error("Query has no group-by clause; use search() for ungrouped results")]
    MissingGroupBy,

    #[error("Pagination page size must be at least 1")]
    InvalidPageSize,
}

/// Errors owned by the transport collaborator, propagated verbatim
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Token acquisition failed: {0}")]
    Token(String),
}

/// The server rejected a composed, well-formed request.
///
/// Carries the server's error payload verbatim; this layer never retries
/// or degrades an API failure into a partial success.
#[derive(Error, Debug)]
#[error("Server rejected request ({status}): {message}")]
pub struct ApiError {
    /// Server status code
    pub status: u16,

    /// Server error payload, verbatim
    pub message: String,
}

/// Unexpected response shape.
///
/// Strict for required fields on the active result path; permissive for
/// optional forward-compatible data (unknown vector type tags are
/// skipped, never fatal).
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Message encoding failed: {0}")]
    Encoding(String),

    #[error("Message decoding failed: {0}")]
    Decoding(String),

    #[error("Message too large: {size} bytes (max: {max_size} bytes)")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Missing required field in response: {0}")]
    MissingField(&'static str),

    #[error("Invalid object id {value:?}: {reason}")]
    InvalidId { value: String, reason: String },

    #[error("Malformed vector payload for {name:?}: {reason}")]
    MalformedVector { name: String, reason: String },

    #[error("Properties payload rejected by deserializer: {0}")]
    Properties(String),
}

impl From<::config::ConfigError> for QueryError {
    fn from(err: ::config::ConfigError) -> Self {
        QueryError::Config(err.to_string())
    }
}
