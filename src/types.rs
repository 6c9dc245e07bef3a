//! Bitcom OP_RETURN decoder - type system
//!
//! - `transaction`: indexed transaction and output model, data-carrier detection
//! - `protocols`: protocol name <-> prefix token registry
//! - `schema`: per-protocol field schemas and value domains
//! - `builder`: render outputs in the indexer's positional cell convention

mod builder;
pub mod protocols;
pub mod schema;
mod transaction;

pub use builder::{spendable_output, DataCarrierBuilder, LONG_PUSHDATA_THRESHOLD};
pub use protocols::{ProtocolEntry, ProtocolRegistry};
pub use schema::{
    Encoding, EncodingSpec, FieldDescriptor, SchemaCatalog, SchemaField, DEFAULT_SCHEMA,
};
pub use transaction::{
    opcodes, Output, Transaction, INPUTS_KEY, OP_FALSE_MARKER, OUTPUTS_KEY, SPENDABLE_KEY,
};
