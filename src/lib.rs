//! Bitcom OP_RETURN decoder
//!
//! Decodes B, MAP, METANET and AIP pushdata from bitdb-style indexed
//! transactions into one JSON object per protocol.

pub mod cli;
pub mod config;
pub mod decoder;
pub mod errors;
pub mod types;

pub use decoder::{BmapDecoder, DecodeError, DecodeResult, DecodedTransaction};
pub use types::{DataCarrierBuilder, Output, Transaction};
