//! Pushdata classification
//!
//! Buckets a data-carrier output's positional cells into string, binary and hex
//! stores keyed by pushdata position. Values are not touched.
//!
//! The walker visits every position up to the highest one seen, so a single
//! stray key such as `s20000000` would make it grind through millions of empty
//! slots. [`PushdataStore::empty_positions`] lets the decoder refuse such carriers.

use crate::types::{Encoding, Output};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Positions without any cell tolerated below the highest position
pub const MAX_EMPTY_POSITIONS: usize = 256;

lazy_static! {
    /// `<view prefix><position>`, e.g. `s1`, `lb12`, `h3`
    static ref POSITIONAL_KEY: Regex =
        Regex::new(r"^(s|ls|b|lb|h|lh)(\d+)$").expect("positional key regex is valid");
}

/// Split a positional cell key into its value domain and position
pub fn parse_positional_key(key: &str) -> Option<(Encoding, usize)> {
    let captures = POSITIONAL_KEY.captures(key)?;
    let encoding = match &captures[1] {
        "s" | "ls" => Encoding::String,
        "b" | "lb" => Encoding::Binary,
        _ => Encoding::Hex,
    };
    let position = captures[2].parse().ok()?;
    Some((encoding, position))
}

/// The three value stores of one data-carrier output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushdataStore {
    string: BTreeMap<usize, Value>,
    binary: BTreeMap<usize, Value>,
    hex: BTreeMap<usize, Value>,
    /// Positions holding at least one view
    populated: BTreeSet<usize>,
    index_count: usize,
}

impl PushdataStore {
    pub fn classify(output: &Output) -> Self {
        let mut store = Self::default();

        for (key, value) in output.cells() {
            // `e`, `i`, `str` and friends are not pushdata
            let Some((encoding, position)) = parse_positional_key(key) else {
                continue;
            };

            let bucket = store.bucket_mut(encoding);
            if bucket.contains_key(&position) {
                trace!("Duplicate {} pushdata at position {} ignored", encoding, position);
            } else {
                bucket.insert(position, value.clone());
            }
            store.populated.insert(position);
            store.index_count = store.index_count.max(position);
        }

        store
    }

    fn bucket_mut(&mut self, encoding: Encoding) -> &mut BTreeMap<usize, Value> {
        match encoding {
            Encoding::String => &mut self.string,
            Encoding::Binary => &mut self.binary,
            Encoding::Hex => &mut self.hex,
        }
    }

    fn bucket(&self, encoding: Encoding) -> &BTreeMap<usize, Value> {
        match encoding {
            Encoding::String => &self.string,
            Encoding::Binary => &self.binary,
            Encoding::Hex => &self.hex,
        }
    }

    /// Value of `encoding` at pushdata `position` (1-based)
    pub fn get(&self, encoding: Encoding, position: usize) -> Option<&Value> {
        self.bucket(encoding).get(&position)
    }

    /// String view at `position`, when it is a JSON string
    pub fn string_at(&self, position: usize) -> Option<&str> {
        self.string.get(&position).and_then(Value::as_str)
    }

    /// Highest pushdata position seen
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Positions in `1..=index_count` that have no view at all
    pub fn empty_positions(&self) -> usize {
        let populated = self.populated.range(1..).count();
        self.index_count.saturating_sub(populated)
    }
}
