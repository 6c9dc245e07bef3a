//! Bit.sv placeholder normalisation
//!
//! `OP_FALSE OP_RETURN <Bit.sv prefix>` has no string view at position 1, so the
//! walk opens an unnamed protocol holding the prefix as its only pushdata.

use anyhow::Result;
use bmap_decoder::config::DecoderConfig;
use bmap_decoder::types::protocols::constants::BITSV_PREFIX;
use bmap_decoder::types::DataCarrierBuilder;
use bmap_decoder::BmapDecoder;
use serde_json::json;

use crate::common::assertions::assert_protocol;
use crate::common::fixtures::single_carrier_tx;

fn bitsv_placeholder_tx() -> serde_json::Value {
    single_carrier_tx(
        DataCarrierBuilder::op_false_op_return()
            .push_str(BITSV_PREFIX)
            .build(),
    )
}

#[test]
fn test_placeholder_is_rekeyed() -> Result<()> {
    let decoded = BmapDecoder::default().decode_value(bitsv_placeholder_tx())?;

    assert_protocol(&decoded, BITSV_PREFIX, json!({}));
    assert!(decoded.get("undefined").is_none());
    Ok(())
}

#[test]
fn test_quirk_can_be_disabled() -> Result<()> {
    let config = DecoderConfig {
        legacy_quirks: false,
        ..DecoderConfig::default()
    };
    let decoded = BmapDecoder::from_config(&config).decode_value(bitsv_placeholder_tx())?;

    assert_protocol(&decoded, "undefined", json!({"pushdata": BITSV_PREFIX}));
    assert!(decoded.get(BITSV_PREFIX).is_none());
    Ok(())
}

#[test]
fn test_op_false_string_marker_is_skipped() -> Result<()> {
    // Indexers that render OP_FALSE as the string "0" in position 1
    let carrier = DataCarrierBuilder::op_return()
        .push_str("0")
        .push_str(bmap_decoder::types::protocols::constants::METANET_PREFIX)
        .push_str("1NodeAddress")
        .build();
    let decoded = BmapDecoder::default().decode_value(single_carrier_tx(carrier))?;

    assert_protocol(&decoded, "METANET", json!({"address": "1NodeAddress"}));
    assert!(decoded.get("undefined").is_none());
    Ok(())
}
