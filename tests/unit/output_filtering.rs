//! Only spendable, non-carrier outputs survive decoding

use anyhow::Result;
use bmap_decoder::types::protocols::constants::METANET_PREFIX;
use bmap_decoder::types::{spendable_output, DataCarrierBuilder, Output};
use bmap_decoder::BmapDecoder;
use serde_json::json;

use crate::common::assertions::output_count;
use crate::common::fixtures::transaction;

#[test]
fn test_keeps_spendable_outputs_in_order() -> Result<()> {
    let carrier = DataCarrierBuilder::op_return()
        .push_str(METANET_PREFIX)
        .push_str("1NodeAddress")
        // bitdb also gives carriers an `e` cell
        .cell("e", json!({"v": 0, "i": 0}))
        .build();
    let unvalued: Output = serde_json::from_value(json!({"b0": {"op": 0x76}, "i": 4}))?;

    let tx = transaction(vec![
        carrier,
        spendable_output(1000, 1, "1First"),
        spendable_output(2000, 2, "1Second"),
        spendable_output(3000, 3, "1Third"),
        unvalued,
    ]);
    let decoded = BmapDecoder::default().decode_value(tx)?;

    assert_eq!(output_count(&decoded), 3);
    let addresses: Vec<&str> = decoded["out"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|output| output["e"]["a"].as_str())
        .collect();
    assert_eq!(addresses, vec!["1First", "1Second", "1Third"]);
    Ok(())
}

#[test]
fn test_outputs_pass_through_verbatim() -> Result<()> {
    let change = spendable_output(546, 1, "1Change");
    let expected = serde_json::to_value(&change)?;
    let carrier = DataCarrierBuilder::op_return()
        .push_str(METANET_PREFIX)
        .push_str("1NodeAddress")
        .build();

    let decoded = BmapDecoder::default().decode_value(transaction(vec![carrier, change]))?;
    assert_eq!(decoded["out"], json!([expected]));
    Ok(())
}
