//! Decoder-specific error types

use serde_json::Value;

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decoder-specific error types
///
/// Every variant is fatal for the transaction being decoded; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The transaction lacks the `in`/`out` shape the decoder needs
    #[error("Malformed transaction: {reason}")]
    MalformedTransaction { reason: String, transaction: Value },

    /// The leading prefix token is not a registered protocol (or there is no
    /// data-carrier output to take it from)
    #[error(
        "Unrecognised transaction {}: leading token {:?} is not a registered protocol",
        .txid.as_deref().unwrap_or("<unknown>"),
        .token
    )]
    UnrecognizedProtocol {
        token: Option<String>,
        txid: Option<String>,
    },

    /// The pushdata runs past the fields the protocol's schema declares
    #[error("No schema field {relative_index} for protocol {protocol} (pushdata position {position})")]
    SchemaFieldMissing {
        protocol: String,
        relative_index: usize,
        position: usize,
    },
}
