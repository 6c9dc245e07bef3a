//! Indexed transaction model
//!
//! The upstream indexer hands us a transaction as JSON: `in` and `out` arrays plus
//! whatever block/transaction metadata it tracks (`blk`, `tx`, `_id`, ...). Outputs
//! are flat objects of positional cells - opcodes as `b<N>: {"op": ..}`, pushdata as
//! `s<N>` (UTF-8), `b<N>` (base64), `h<N>` (hex) and their `l`-prefixed long variants.
//! Nothing here interprets pushdata; see `decoder::pushdata` for that.

use crate::decoder::{DecodeError, DecodeResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opcodes needed to spot a data-carrier output
pub mod opcodes {
    pub const OP_FALSE: u8 = 0x00;
    pub const OP_RETURN: u8 = 0x6a;
}

/// Wire key holding the transaction inputs
pub const INPUTS_KEY: &str = "in";
/// Wire key holding the transaction outputs
pub const OUTPUTS_KEY: &str = "out";
/// Output cell marking a spendable (value-bearing) output
pub const SPENDABLE_KEY: &str = "e";
/// `OP_FALSE` as some indexers render it in the first string cell
pub const OP_FALSE_MARKER: &str = "0";

/// A single transaction output as rendered by the indexer.
///
/// The cells are kept verbatim so spendable outputs can be passed through
/// in their original shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Output {
    cells: Map<String, Value>,
}

impl Output {
    pub fn new(cells: Map<String, Value>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &Map<String, Value> {
        &self.cells
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Opcode at script position `position`, if that cell is an opcode cell
    pub fn opcode(&self, position: usize) -> Option<u8> {
        self.cells
            .get(&format!("b{}", position))?
            .get("op")?
            .as_u64()
            .and_then(|op| u8::try_from(op).ok())
    }

    /// `OP_RETURN ...` or `OP_FALSE OP_RETURN ...`
    pub fn is_data_carrier(&self) -> bool {
        match self.opcode(0) {
            Some(opcodes::OP_RETURN) => true,
            Some(opcodes::OP_FALSE) => self.opcode(1) == Some(opcodes::OP_RETURN),
            _ => false,
        }
    }

    pub fn has_spendable_value(&self) -> bool {
        self.cells.contains_key(SPENDABLE_KEY)
    }

    /// Candidate protocol prefix: the first non-empty string pushdata among
    /// positions 1, 2 and 3.
    ///
    /// Carriers that start with `OP_FALSE` push the prefix one slot later, so
    /// scanning the first few positions avoids hard-coding an offset.
    ///
    /// This is not a plain first-non-empty scan: an `OP_FALSE` rendered as `"0"`
    /// in position 1 is skipped. A plain scan would return `"0"`, which never
    /// resolves, and the walker's skip of that same marker could not be reached.
    pub fn prefix_token(&self) -> Option<&str> {
        (1..=3).find_map(|position| {
            self.cells
                .get(&format!("s{}", position))
                .and_then(Value::as_str)
                .filter(|token| !token.is_empty())
                .filter(|token| !(position == 1 && *token == OP_FALSE_MARKER))
        })
    }
}

/// An indexed transaction: opaque inputs, typed outputs and passthrough metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub inputs: Value,
    pub outputs: Vec<Output>,
    /// Every top-level key other than `in` and `out`, untouched
    pub metadata: Map<String, Value>,
}

impl Transaction {
    pub fn from_json(json: &str) -> DecodeResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DecodeError::MalformedTransaction {
                reason: format!("invalid JSON: {}", e),
                transaction: Value::Null,
            })?;
        Self::try_from(value)
    }

    /// First output that carries data
    pub fn data_carrier(&self) -> Option<&Output> {
        self.outputs.iter().find(|output| output.is_data_carrier())
    }

    /// Back to the indexer's JSON shape
    pub fn to_value(&self) -> Value {
        let mut fields = self.metadata.clone();
        fields.insert(INPUTS_KEY.to_string(), self.inputs.clone());
        fields.insert(
            OUTPUTS_KEY.to_string(),
            Value::Array(
                self.outputs
                    .iter()
                    .map(|output| Value::Object(output.cells().clone()))
                    .collect(),
            ),
        );
        Value::Object(fields)
    }

    /// Transaction hash as tracked by the indexer (`tx.h`)
    pub fn txid(&self) -> Option<&str> {
        self.metadata.get("tx")?.get("h")?.as_str()
    }
}

impl TryFrom<Value> for Transaction {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(DecodeError::MalformedTransaction {
                reason: "transaction is not a JSON object".to_string(),
                transaction: value,
            });
        };

        for required in [INPUTS_KEY, OUTPUTS_KEY] {
            if !fields.contains_key(required) {
                return Err(DecodeError::MalformedTransaction {
                    reason: format!("missing `{}`", required),
                    transaction: Value::Object(fields),
                });
            }
        }

        let outputs = match fields.get(OUTPUTS_KEY) {
            Some(Value::Array(entries)) if entries.iter().all(Value::is_object) => entries
                .iter()
                .filter_map(|entry| entry.as_object().cloned())
                .map(Output::new)
                .collect(),
            _ => {
                return Err(DecodeError::MalformedTransaction {
                    reason: format!("`{}` must be an array of objects", OUTPUTS_KEY),
                    transaction: Value::Object(fields),
                })
            }
        };

        fields.remove(OUTPUTS_KEY);
        let inputs = fields.remove(INPUTS_KEY).unwrap_or(Value::Null);

        Ok(Self {
            inputs,
            outputs,
            metadata: fields,
        })
    }
}
