//! Common Test Utilities
//!
//! Shared fixtures and assertion helpers for the unit and integration suites.

#![allow(dead_code)]

/// Transaction fixtures in the indexer's JSON shape
pub mod fixtures {
    use bmap_decoder::types::protocols::constants::*;
    use bmap_decoder::types::{spendable_output, DataCarrierBuilder, Output};
    use serde_json::{json, Value};

    pub const TXID: &str = "4cf1b0c6a0e4a4b1a3d3c2e1f0b9a8c7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a1";
    pub const BLOCK_HEIGHT: u64 = 612345;

    /// Wrap outputs into a full indexed transaction with metadata
    pub fn transaction(outputs: Vec<Output>) -> Value {
        json!({
            "_id": "5d8e1f2a3b4c5d6e7f801234",
            "tx": {"h": TXID},
            "blk": {"i": BLOCK_HEIGHT, "t": 1575000000},
            "in": [{"i": 0, "e": {"h": "ab".repeat(32), "i": 1, "a": "1SenderAddress"}}],
            "out": outputs,
        })
    }

    /// Carrier plus one change output
    pub fn single_carrier_tx(carrier: Output) -> Value {
        transaction(vec![carrier, spendable_output(1234, 1, "1ChangeAddress")])
    }

    /// `B <content> <content-type> <encoding> <filename>`
    pub fn b_document(
        builder: DataCarrierBuilder,
        content: &[u8],
        content_type: &str,
        encoding: &str,
        filename: &str,
    ) -> DataCarrierBuilder {
        builder
            .push_str(B_PREFIX)
            .push(content)
            .push_str(content_type)
            .push_str(encoding)
            .push_str(filename)
    }

    /// `MAP SET <key> <value> ...`
    pub fn map_set(builder: DataCarrierBuilder, pairs: &[(&str, &str)]) -> DataCarrierBuilder {
        pairs.iter().fold(
            builder.push_str(MAP_PREFIX).push_str("SET"),
            |builder, (key, value)| builder.push_str(key).push_str(value),
        )
    }

    /// A typical social post: `B ... | MAP SET app ... type post | AIP ...`
    pub fn bmap_post_tx() -> Value {
        let builder = b_document(
            DataCarrierBuilder::op_return(),
            b"Hello from the chain",
            "text/markdown",
            "UTF-8",
            "post.md",
        )
        .pipe();
        let builder = map_set(builder, &[("app", "bmap-demo"), ("type", "post")])
            .pipe()
            .push_str(AIP_PREFIX)
            .push_str("BITCOIN_ECDSA")
            .push_str("1SignerAddress")
            .push([0x01, 0x02, 0x03]);

        single_carrier_tx(builder.build())
    }
}

/// Assertion helpers over decoded JSON
pub mod assertions {
    use serde_json::Value;

    /// Assert the decoded object holds `expected` under protocol `name`
    pub fn assert_protocol(decoded: &Value, name: &str, expected: Value) {
        assert_eq!(
            decoded.get(name),
            Some(&expected),
            "protocol {} mismatch in {}",
            name,
            decoded
        );
    }

    pub fn output_count(decoded: &Value) -> usize {
        decoded["out"].as_array().map(Vec::len).unwrap_or(0)
    }
}
