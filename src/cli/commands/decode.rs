use crate::config::AppConfig;
use crate::decoder::BmapDecoder;
use crate::errors::{AppError, AppResult};
use clap::Args;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

/// bitdb query responses split confirmed (`c`) and unconfirmed (`u`) transactions
const ENVELOPE_KEYS: [&str; 2] = ["c", "u"];

/// Decode indexed transactions read from a file or stdin
#[derive(Args)]
pub struct DecodeCommand {
    /// Input JSON file (reads stdin when omitted)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Pretty-print the decoded JSON (overrides output.pretty)
    #[arg(long)]
    pub pretty: bool,

    /// Log and skip transactions that fail to decode instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,
}

impl DecodeCommand {
    pub fn run(&self, config: &AppConfig) -> AppResult<()> {
        let raw = match &self.input {
            Some(path) => {
                info!("Reading transactions from {}", path.display());
                std::fs::read_to_string(path)?
            }
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let document: Value = serde_json::from_str(&raw)?;
        let decoder = BmapDecoder::from_config(&config.decoder);
        let decoded = decode_document(&decoder, document, self.skip_invalid)?;

        let rendered = if self.pretty || config.output.pretty {
            serde_json::to_string_pretty(&decoded)?
        } else {
            serde_json::to_string(&decoded)?
        };
        println!("{}", rendered);

        Ok(())
    }
}

/// Decode a JSON document keeping its shape: a single transaction, an array of
/// transactions, or a bitdb `{c: [...], u: [...]}` envelope.
pub fn decode_document(
    decoder: &BmapDecoder,
    document: Value,
    skip_invalid: bool,
) -> AppResult<Value> {
    match document {
        Value::Array(transactions) => Ok(Value::Array(decode_batch(
            decoder,
            transactions,
            skip_invalid,
        )?)),
        Value::Object(fields) if is_envelope(&fields) => {
            let mut decoded = Map::new();
            for (key, value) in fields {
                let Value::Array(transactions) = value else {
                    return Err(AppError::InvalidData(format!(
                        "envelope key `{}` must hold an array",
                        key
                    )));
                };
                decoded.insert(
                    key,
                    Value::Array(decode_batch(decoder, transactions, skip_invalid)?),
                );
            }
            Ok(Value::Object(decoded))
        }
        single => Ok(decoder.decode_value(single)?),
    }
}

fn is_envelope(fields: &Map<String, Value>) -> bool {
    !fields.is_empty() && fields.keys().all(|key| ENVELOPE_KEYS.contains(&key.as_str()))
}

fn decode_batch(
    decoder: &BmapDecoder,
    transactions: Vec<Value>,
    skip_invalid: bool,
) -> AppResult<Vec<Value>> {
    let total = transactions.len();
    let mut decoded = Vec::with_capacity(total);

    for (index, transaction) in transactions.into_iter().enumerate() {
        match decoder.decode_value(transaction) {
            Ok(value) => decoded.push(value),
            Err(e) if skip_invalid => warn!("Skipping transaction {}: {}", index, e),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Decoded {} of {} transaction(s)", decoded.len(), total);
    Ok(decoded)
}
