use crate::config::AppConfig;
use crate::decoder::BmapDecoder;
use crate::errors::AppResult;
use clap::Args;

/// List the protocols the decoder recognises
#[derive(Args)]
pub struct ProtocolsCommand {
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ProtocolsCommand {
    pub fn run(&self, config: &AppConfig) -> AppResult<()> {
        let decoder = BmapDecoder::from_config(&config.decoder);
        let rows = protocol_rows(&decoder);

        if self.json {
            let listing: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    serde_json::json!({
                        "name": row.name,
                        "prefix": row.prefix,
                        "fields": row.fields,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(());
        }

        println!("{:<10} {:<36} FIELDS", "PROTOCOL", "PREFIX");
        for row in &rows {
            let fields = if row.fields.is_empty() {
                "(no schema)".to_string()
            } else {
                row.fields.join(", ")
            };
            println!("{:<10} {:<36} {}", row.name, row.prefix, fields);
        }

        Ok(())
    }
}

/// One registered protocol with its schema field names in order
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolRow {
    pub name: String,
    pub prefix: String,
    pub fields: Vec<String>,
}

pub fn protocol_rows(decoder: &BmapDecoder) -> Vec<ProtocolRow> {
    decoder
        .registry()
        .entries()
        .iter()
        .map(|entry| ProtocolRow {
            name: entry.name.clone(),
            prefix: entry.prefix.clone(),
            fields: decoder
                .catalog()
                .get(&entry.name)
                .map(|schema| {
                    schema
                        .iter()
                        .flat_map(|field| field.names())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}
