//! Bitcom OP_RETURN decoder
//!
//! Takes an indexed transaction and turns its data-carrier output into an object
//! keyed by protocol name:
//!
//! 1. find the data carrier and check its leading prefix token resolves
//! 2. bucket its positional cells into string/binary/hex stores (`pushdata`)
//! 3. walk the positions against the protocol schemas (`walker`)
//! 4. shape each protocol's fields and filter the outputs (`post_process`)
//!
//! Decoding is pure: no I/O and no state shared between calls. Each call works
//! on a private clone of the schema catalog, since ad-hoc protocols are
//! registered into it as they are met.

use crate::config::DecoderConfig;
use crate::types::{Output, ProtocolRegistry, SchemaCatalog, Transaction};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info_span};

pub mod error;
pub mod post_process;
pub mod pushdata;
pub mod walker;

pub use error::{DecodeError, DecodeResult};
pub use post_process::ProtocolRecord;
pub use pushdata::{PushdataStore, MAX_EMPTY_POSITIONS};
pub use walker::{DecodedField, FieldRecord, SchemaWalker};

/// A decoded transaction.
///
/// Serialises to the indexer's shape: passthrough metadata, `in`, one entry per
/// protocol and `out` holding only the spendable outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTransaction {
    pub metadata: Map<String, Value>,
    pub inputs: Value,
    pub protocols: ProtocolRecord,
    pub outputs: Vec<Output>,
}

impl DecodedTransaction {
    pub fn protocol(&self, name: &str) -> Option<&Map<String, Value>> {
        self.protocols.get(name)
    }

    /// Flatten into a single JSON object.
    ///
    /// Passthrough metadata and `in`/`out` take precedence over a protocol that
    /// happens to share their name.
    pub fn to_value(&self) -> Value {
        let mut object: Map<String, Value> = self
            .protocols
            .iter()
            .map(|(name, fields)| (name.clone(), Value::Object(fields.clone())))
            .collect();

        for (key, value) in &self.metadata {
            object.insert(key.clone(), value.clone());
        }
        object.insert(
            crate::types::INPUTS_KEY.to_string(),
            self.inputs.clone(),
        );
        object.insert(
            crate::types::OUTPUTS_KEY.to_string(),
            Value::Array(
                self.outputs
                    .iter()
                    .map(|output| Value::Object(output.cells().clone()))
                    .collect(),
            ),
        );

        Value::Object(object)
    }
}

impl Serialize for DecodedTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Decoder holding the protocol registry and the seed schema catalog
#[derive(Debug, Clone)]
pub struct BmapDecoder {
    registry: ProtocolRegistry,
    catalog: SchemaCatalog,
    legacy_quirks: bool,
}

impl Default for BmapDecoder {
    fn default() -> Self {
        Self::new(ProtocolRegistry::default(), SchemaCatalog::default())
    }
}

impl BmapDecoder {
    pub fn new(registry: ProtocolRegistry, catalog: SchemaCatalog) -> Self {
        Self {
            registry,
            catalog,
            legacy_quirks: true,
        }
    }

    /// Build from configuration: default tables plus any extra protocols,
    /// which decode with the default schema.
    pub fn from_config(config: &DecoderConfig) -> Self {
        let mut registry = ProtocolRegistry::default();
        let mut catalog = SchemaCatalog::default();

        for entry in &config.extra_protocols {
            if let Some(previous) = registry.prefix_for(&entry.name) {
                debug!(
                    "Extra protocol {} replaces prefix {} with {}",
                    entry.name, previous, entry.prefix
                );
            }
            registry.register(entry.name.as_str(), entry.prefix.as_str());
            if catalog.get(&entry.name).is_none() {
                catalog.register_adhoc(&entry.name);
            }
        }

        Self::new(registry, catalog).with_legacy_quirks(config.legacy_quirks)
    }

    /// Toggle the Bit.sv placeholder normalisation (on by default)
    pub fn with_legacy_quirks(mut self, enabled: bool) -> Self {
        self.legacy_quirks = enabled;
        self
    }

    pub fn registry(&self) -> &ProtocolRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn decode(&self, tx: &Transaction) -> DecodeResult<DecodedTransaction> {
        let span = info_span!("decode", txid = tx.txid().unwrap_or("<unknown>"));
        let _guard = span.enter();

        let unrecognised = |token: Option<&str>| DecodeError::UnrecognizedProtocol {
            token: token.map(str::to_string),
            txid: tx.txid().map(str::to_string),
        };

        let carrier = tx.data_carrier().ok_or_else(|| unrecognised(None))?;
        let token = carrier.prefix_token();
        let leading = token
            .and_then(|t| self.registry.resolve(t))
            .ok_or_else(|| unrecognised(token))?;
        debug!("Leading protocol {}", leading);

        let store = PushdataStore::classify(carrier);
        let empty = store.empty_positions();
        if empty > MAX_EMPTY_POSITIONS {
            return Err(DecodeError::MalformedTransaction {
                reason: format!(
                    "data carrier has {} empty pushdata positions below position {} (limit {})",
                    empty,
                    store.index_count(),
                    MAX_EMPTY_POSITIONS
                ),
                transaction: tx.to_value(),
            });
        }

        let mut catalog = self.catalog.clone();
        let fields = SchemaWalker::new(&self.registry, &mut catalog, &store).walk()?;

        let mut protocols = post_process::finalise_protocols(fields);
        if self.legacy_quirks {
            post_process::collapse_legacy_placeholder(&mut protocols);
        }

        let outputs = post_process::spendable_outputs(&tx.outputs);
        debug!(
            "Decoded {} protocol(s), {} spendable output(s)",
            protocols.len(),
            outputs.len()
        );

        Ok(DecodedTransaction {
            metadata: tx.metadata.clone(),
            inputs: tx.inputs.clone(),
            protocols,
            outputs,
        })
    }

    /// JSON in, JSON out
    pub fn decode_value(&self, value: Value) -> DecodeResult<Value> {
        let tx = Transaction::try_from(value)?;
        Ok(self.decode(&tx)?.to_value())
    }
}
