//! Pipe-separated sub-documents and ad-hoc protocols

use anyhow::Result;
use bmap_decoder::types::protocols::constants::*;
use bmap_decoder::types::DataCarrierBuilder;
use bmap_decoder::BmapDecoder;
use serde_json::json;

use crate::common::assertions::assert_protocol;
use crate::common::fixtures::{b_document, bmap_post_tx, map_set, single_carrier_tx};

#[test]
fn test_b_then_map() -> Result<()> {
    let builder = b_document(
        DataCarrierBuilder::op_return(),
        b"# title",
        "text/markdown",
        "utf-8",
        "readme.md",
    )
    .pipe();
    let carrier = map_set(builder, &[("app", "myapp")]).build();
    let decoded = BmapDecoder::default().decode_value(single_carrier_tx(carrier))?;

    assert_protocol(
        &decoded,
        B,
        json!({
            "content": "# title",
            "content-type": "text/markdown",
            "encoding": "utf-8",
            "filename": "readme.md",
        }),
    );
    assert_protocol(&decoded, MAP, json!({"cmd": "SET", "app": "myapp"}));
    Ok(())
}

#[test]
fn test_b_map_aip_post() -> Result<()> {
    let decoded = BmapDecoder::default().decode_value(bmap_post_tx())?;

    assert_eq!(decoded[B]["content"], json!("Hello from the chain"));
    assert_protocol(
        &decoded,
        MAP,
        json!({"cmd": "SET", "app": "bmap-demo", "type": "post"}),
    );
    assert_protocol(
        &decoded,
        AIP,
        json!({
            "algorithm": "BITCOIN_ECDSA",
            "address": "1SignerAddress",
            "signature": "AQID",
        }),
    );
    Ok(())
}

#[test]
fn test_adhoc_second_document() -> Result<()> {
    let carrier = DataCarrierBuilder::op_return()
        .push_str(METANET_PREFIX)
        .push_str("1NodeAddress")
        .push_str("parent-txid")
        .pipe()
        .push_str("T")
        .push_str("payload")
        .build();
    let decoded = BmapDecoder::default().decode_value(single_carrier_tx(carrier))?;

    assert_protocol(
        &decoded,
        METANET,
        json!({"address": "1NodeAddress", "parent": "parent-txid"}),
    );
    assert_protocol(&decoded, "T", json!({"pushdata": "payload"}));
    Ok(())
}

#[test]
fn test_metanet_keywords() -> Result<()> {
    let carrier = DataCarrierBuilder::op_return()
        .push_str(METANET_PREFIX)
        .push_str("1NodeAddress")
        .push_str("parent-txid")
        .push_str("docs")
        .push_str("rust")
        .push_str("bitcoin")
        .build();
    let decoded = BmapDecoder::default().decode_value(single_carrier_tx(carrier))?;

    // Repeated names collapse to the last value
    assert_protocol(
        &decoded,
        METANET,
        json!({
            "address": "1NodeAddress",
            "parent": "parent-txid",
            "name": "docs",
            "kwd": "bitcoin",
        }),
    );
    Ok(())
}
