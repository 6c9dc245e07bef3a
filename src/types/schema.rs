//! Per-protocol field schemas
//!
//! A schema is the ordered list of fields a protocol pushes after its prefix token.
//! Fields are either single descriptors or a repeating group that is cycled through
//! for every remaining pushdata until the sub-document ends.

use super::protocols::constants::{AIP, B, MAP, METANET};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name the fallback schema is known by
pub const DEFAULT_SCHEMA: &str = "default";

/// Value domain a pushdata field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8 rendering (`s`/`ls` cells)
    String,
    /// Base64 rendering (`b`/`lb` cells)
    Binary,
    /// Hex rendering (`h`/`lh` cells)
    Hex,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::String => "string",
            Encoding::Binary => "binary",
            Encoding::Hex => "hex",
        }
    }

    /// Map a sibling field's declared character encoding onto a value domain.
    ///
    /// Declarations are compared lowercased with hyphens removed, so `UTF-8`,
    /// `utf8` and `Utf-8` agree. `text` and `gzip` are not character encodings
    /// but show up on-chain anyway. Anything unrecognised is read as binary.
    pub fn from_declared(declared: &str) -> Self {
        let normalised = declared.to_lowercase().replace('-', "");
        match normalised.as_str() {
            "utf8" | "text" => Encoding::String,
            "gzip" => Encoding::Binary,
            _ => Encoding::Binary,
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a field's encoding is determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingSpec {
    Fixed(Encoding),
    /// Resolved at decode time from an encoding declared by a sibling field;
    /// the list names the domains the field can take.
    Dynamic(Vec<Encoding>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub encoding: EncodingSpec,
}

impl FieldDescriptor {
    pub fn fixed(name: &str, encoding: Encoding) -> Self {
        Self {
            name: name.to_string(),
            encoding: EncodingSpec::Fixed(encoding),
        }
    }

    pub fn dynamic(name: &str, candidates: &[Encoding]) -> Self {
        Self {
            name: name.to_string(),
            encoding: EncodingSpec::Dynamic(candidates.to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaField {
    Single(FieldDescriptor),
    /// Consumed cyclically for every remaining pushdata in the sub-document
    Repeating(Vec<FieldDescriptor>),
}

impl SchemaField {
    /// Field names in declaration order (group members flattened)
    pub fn names(&self) -> Vec<&str> {
        match self {
            SchemaField::Single(field) => vec![field.name.as_str()],
            SchemaField::Repeating(group) => group.iter().map(|f| f.name.as_str()).collect(),
        }
    }
}

/// Protocol name -> schema.
///
/// Decoding registers ad-hoc protocols here, so each decode works on its own clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    schemas: HashMap<String, Vec<SchemaField>>,
    default: Vec<SchemaField>,
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        use Encoding::{Binary, String as Utf8};
        use SchemaField::{Repeating, Single};

        let mut schemas = HashMap::new();
        schemas.insert(
            B.to_string(),
            vec![
                Single(FieldDescriptor::dynamic("content", &[Utf8, Binary])),
                Single(FieldDescriptor::fixed("content-type", Utf8)),
                // Declares the character encoding of `content`
                Single(FieldDescriptor::fixed("encoding", Utf8)),
                Single(FieldDescriptor::fixed("filename", Utf8)),
            ],
        );
        schemas.insert(
            MAP.to_string(),
            vec![
                Single(FieldDescriptor::fixed("cmd", Utf8)),
                Repeating(vec![
                    FieldDescriptor::fixed("key", Utf8),
                    FieldDescriptor::fixed("val", Utf8),
                ]),
            ],
        );
        schemas.insert(
            METANET.to_string(),
            vec![
                Single(FieldDescriptor::fixed("address", Utf8)),
                Single(FieldDescriptor::fixed("parent", Utf8)),
                Single(FieldDescriptor::fixed("name", Utf8)),
                Repeating(vec![FieldDescriptor::fixed("kwd", Utf8)]),
            ],
        );
        schemas.insert(
            AIP.to_string(),
            vec![
                Single(FieldDescriptor::fixed("algorithm", Utf8)),
                Single(FieldDescriptor::fixed("address", Utf8)),
                Single(FieldDescriptor::fixed("signature", Binary)),
                Repeating(vec![FieldDescriptor::fixed("index", Binary)]),
            ],
        );

        Self {
            schemas,
            default: vec![Repeating(vec![FieldDescriptor::fixed("pushdata", Utf8)])],
        }
    }
}

impl SchemaCatalog {
    pub fn get(&self, protocol: &str) -> Option<&[SchemaField]> {
        if protocol == DEFAULT_SCHEMA {
            return Some(&self.default);
        }
        self.schemas.get(protocol).map(Vec::as_slice)
    }

    pub fn insert(&mut self, protocol: impl Into<String>, schema: Vec<SchemaField>) {
        self.schemas.insert(protocol.into(), schema);
    }

    /// Bind `protocol` to the default schema, replacing any earlier binding
    pub fn register_adhoc(&mut self, protocol: &str) {
        self.schemas
            .insert(protocol.to_string(), self.default.clone());
    }

    /// Descriptor for the `relative_index`-th field after the prefix token (1-based)
    pub fn field(&self, protocol: &str, relative_index: usize) -> Option<&SchemaField> {
        self.get(protocol)?.get(relative_index.checked_sub(1)?)
    }

    /// Registered protocol names, sorted
    pub fn protocols(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
