//! Schema walker
//!
//! Drives over the pushdata positions of one data carrier, switching protocol at
//! every prefix token and reading fields according to the active protocol's
//! schema. Sub-documents are separated by a `|` pushdata.
//!
//! The walker never fails on missing pushdata values (they decode as absent);
//! it fails only when the data runs past what a schema declares.

use super::pushdata::PushdataStore;
use super::{DecodeError, DecodeResult};
use crate::types::{
    Encoding, EncodingSpec, ProtocolRegistry, SchemaCatalog, SchemaField, OP_FALSE_MARKER,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Sub-document separator
pub const PIPE: &str = "|";

/// Name adopted when a protocol position has no string view at all
pub const UNNAMED_PROTOCOL: &str = "undefined";

/// One field read from the pushdata, before post-processing
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub name: String,
    /// `None` when the selected value store has nothing at this position
    pub value: Option<Value>,
}

/// Protocol name -> fields in pushdata order
pub type FieldRecord = BTreeMap<String, Vec<DecodedField>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    ExpectProtocolToken,
    /// `relative_index` is the 1-based schema slot of the next field
    ExpectField { relative_index: usize },
}

pub struct SchemaWalker<'a> {
    registry: &'a ProtocolRegistry,
    catalog: &'a mut SchemaCatalog,
    store: &'a PushdataStore,
    state: WalkState,
    protocol: String,
    /// Cursor into repeating groups, shared by every group in the walk and never reset
    round_index: usize,
    /// Position of each protocol's prefix token
    offsets: HashMap<String, usize>,
    record: FieldRecord,
}

impl<'a> SchemaWalker<'a> {
    pub fn new(
        registry: &'a ProtocolRegistry,
        catalog: &'a mut SchemaCatalog,
        store: &'a PushdataStore,
    ) -> Self {
        Self {
            registry,
            catalog,
            store,
            state: WalkState::ExpectProtocolToken,
            protocol: String::new(),
            round_index: 0,
            offsets: HashMap::new(),
            record: FieldRecord::new(),
        }
    }

    pub fn walk(mut self) -> DecodeResult<FieldRecord> {
        // An OP_FALSE rendered as a string push is not part of any sub-document
        let start = if self.store.string_at(1) == Some(OP_FALSE_MARKER) {
            1
        } else {
            0
        };

        for x in start..self.store.index_count() {
            self.step(x + 1)?;
        }

        Ok(self.record)
    }

    fn step(&mut self, position: usize) -> DecodeResult<()> {
        let store = self.store;
        let token = store.string_at(position);

        if self.state == WalkState::ExpectProtocolToken {
            self.enter_protocol(token, position);
        }

        if token == Some(PIPE) {
            debug!("Sub-document {} ends at position {}", self.protocol, position);
            self.state = WalkState::ExpectProtocolToken;
            return Ok(());
        }

        match self.state {
            WalkState::ExpectProtocolToken => {
                self.state = WalkState::ExpectField { relative_index: 1 };
            }
            WalkState::ExpectField { relative_index } => {
                let advance = self.read_field(relative_index, position)?;
                if advance {
                    self.state = WalkState::ExpectField {
                        relative_index: relative_index + 1,
                    };
                }
            }
        }

        Ok(())
    }

    fn enter_protocol(&mut self, token: Option<&str>, position: usize) {
        let name = match token.and_then(|t| self.registry.resolve(t)) {
            Some(name) => name.to_string(),
            None => {
                let name = token.unwrap_or(UNNAMED_PROTOCOL).to_string();
                debug!(
                    "Unregistered token {:?} at position {}, decoding as ad-hoc protocol",
                    name, position
                );
                self.catalog.register_adhoc(&name);
                name
            }
        };

        // A protocol seen twice keeps only its latest sub-document
        self.record.insert(name.clone(), Vec::new());
        self.offsets.insert(name.clone(), position);
        self.protocol = name;
    }

    /// Read the field at `position`; returns whether the schema slot advances
    fn read_field(&mut self, relative_index: usize, position: usize) -> DecodeResult<bool> {
        let missing = || DecodeError::SchemaFieldMissing {
            protocol: self.protocol.clone(),
            relative_index,
            position,
        };

        let (name, encoding, advance) = match self.catalog.field(&self.protocol, relative_index) {
            Some(SchemaField::Repeating(group)) if !group.is_empty() => {
                // Name and encoding come from consecutive slots of the group
                self.round_index %= group.len();
                let name = group[self.round_index].name.clone();
                self.round_index += 1;
                self.round_index %= group.len();
                let spec = &group[self.round_index].encoding;
                let encoding = self.resolve_encoding(spec, relative_index);
                self.round_index += 1;
                (name, encoding, false)
            }
            Some(SchemaField::Single(field)) => {
                let encoding = self.resolve_encoding(&field.encoding, relative_index);
                (field.name.clone(), encoding, true)
            }
            _ => return Err(missing()),
        };

        let value = self.store.get(encoding, position).cloned();
        trace!(
            "{}.{} <- {} pushdata at position {}",
            self.protocol,
            name,
            encoding,
            position
        );

        self.record
            .entry(self.protocol.clone())
            .or_default()
            .push(DecodedField { name, value });

        Ok(advance)
    }

    /// Dynamic fields read their domain from the encoding declared two slots
    /// past the field itself (B: `content` is declared by `encoding`).
    fn resolve_encoding(&self, spec: &EncodingSpec, relative_index: usize) -> Encoding {
        match spec {
            EncodingSpec::Fixed(encoding) => *encoding,
            EncodingSpec::Dynamic(candidates) => {
                let offset = self.offsets.get(&self.protocol).copied().unwrap_or(0);
                let declared = self
                    .store
                    .string_at(offset + 2 + relative_index)
                    .unwrap_or("");
                let encoding = Encoding::from_declared(declared);
                if !candidates.contains(&encoding) {
                    debug!(
                        "Declared encoding {:?} resolves to {} outside {:?} for {}",
                        declared, encoding, candidates, self.protocol
                    );
                }
                encoding
            }
        }
    }
}
