//! Render outputs in the indexer's positional cell convention
//!
//! Used to build fixtures and to re-create indexed outputs from raw pushdata. Every
//! push gets all three views (`s` UTF-8, `b` base64, `h` hex); pushes longer than
//! [`LONG_PUSHDATA_THRESHOLD`] bytes go into the `ls`/`lb`/`lh` cells instead.

use super::transaction::{opcodes, Output, SPENDABLE_KEY};
use base64::Engine;
use serde_json::{json, Map, Value};

/// Pushdata above this size is stored in the "long" cells
pub const LONG_PUSHDATA_THRESHOLD: usize = 512;

/// Builder for a data-carrier output
#[derive(Debug, Clone)]
pub struct DataCarrierBuilder {
    cells: Map<String, Value>,
    next_position: usize,
}

impl DataCarrierBuilder {
    /// `OP_RETURN <pushes...>`
    pub fn op_return() -> Self {
        let mut builder = Self {
            cells: Map::new(),
            next_position: 0,
        };
        builder.push_opcode(opcodes::OP_RETURN);
        builder
    }

    /// `OP_FALSE OP_RETURN <pushes...>`
    pub fn op_false_op_return() -> Self {
        let mut builder = Self {
            cells: Map::new(),
            next_position: 0,
        };
        builder.push_opcode(opcodes::OP_FALSE);
        builder.push_opcode(opcodes::OP_RETURN);
        builder
    }

    fn push_opcode(&mut self, op: u8) {
        self.cells
            .insert(format!("b{}", self.next_position), json!({ "op": op }));
        self.next_position += 1;
    }

    /// Append a pushdata rendered in all three views
    pub fn push(mut self, data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let position = self.next_position;
        let long = if data.len() > LONG_PUSHDATA_THRESHOLD {
            "l"
        } else {
            ""
        };

        self.cells.insert(
            format!("{}s{}", long, position),
            Value::String(String::from_utf8_lossy(data).into_owned()),
        );
        self.cells.insert(
            format!("{}b{}", long, position),
            Value::String(base64::engine::general_purpose::STANDARD.encode(data)),
        );
        self.cells.insert(
            format!("{}h{}", long, position),
            Value::String(hex::encode(data)),
        );

        self.next_position += 1;
        self
    }

    pub fn push_str(self, data: &str) -> Self {
        self.push(data.as_bytes())
    }

    /// Sub-document separator
    pub fn pipe(self) -> Self {
        self.push_str("|")
    }

    /// Append one extra cell verbatim (e.g. a single view of a push)
    pub fn cell(mut self, key: &str, value: Value) -> Self {
        self.cells.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Output {
        Output::new(self.cells)
    }
}

/// A plain value-bearing output (`e` cell with value, index and address)
pub fn spendable_output(satoshis: u64, index: u32, address: &str) -> Output {
    let mut cells = Map::new();
    cells.insert(
        SPENDABLE_KEY.to_string(),
        json!({ "v": satoshis, "i": index, "a": address }),
    );
    // P2PKH opcode skeleton: OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG
    cells.insert("b0".to_string(), json!({ "op": 0x76 }));
    cells.insert("b1".to_string(), json!({ "op": 0xa9 }));
    Output::new(cells)
}
