use anyhow::{bail, Context, Result};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use log::info;
use orcfile::orc_file::writer_options;
use std::path::PathBuf;
use std::sync::Arc;

use super::config::load_settings;

/// Resolve writer options from settings and print the result as JSON
pub fn run(
    config: Option<PathBuf>,
    set: Vec<String>,
    columns: String,
    format_version: Option<String>,
) -> Result<()> {
    let settings = load_settings(config.as_deref(), &set)?;
    info!("Resolving writer options from {} settings", settings.len());

    let schema = parse_columns(&columns)?;
    let mut options = writer_options(&settings).schema(schema);
    if let Some(name) = format_version {
        options = options.version_name(&name);
    }

    let config = options.build().context("Invalid writer options")?;
    if let Some(e) = config.governor_degraded() {
        eprintln!("warning: no memory governor ({}), stripe sizes will not be adjusted", e);
    }

    println!("{}", serde_json::to_string_pretty(&config.summary())?);
    Ok(())
}

/// Parse `name:type` pairs into a schema. Types use the format's own names.
pub fn parse_columns(columns: &str) -> Result<SchemaRef> {
    let mut fields = Vec::new();
    for column in columns.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let Some((name, type_name)) = column.split_once(':') else {
            bail!("Column {:?} is missing a type, expected name:type", column);
        };
        let data_type = parse_type(type_name.trim())
            .with_context(|| format!("Column {:?}", name.trim()))?;
        fields.push(Field::new(name.trim(), data_type, true));
    }

    if fields.is_empty() {
        bail!("At least one column is required");
    }
    Ok(Arc::new(Schema::new(fields)))
}

fn parse_type(name: &str) -> Result<DataType> {
    Ok(match name.to_lowercase().as_str() {
        "boolean" => DataType::Boolean,
        "tinyint" => DataType::Int8,
        "smallint" => DataType::Int16,
        "int" => DataType::Int32,
        "bigint" => DataType::Int64,
        "float" => DataType::Float32,
        "double" => DataType::Float64,
        "string" => DataType::Utf8,
        "binary" => DataType::Binary,
        "date" => DataType::Date32,
        "timestamp" => DataType::Timestamp(TimeUnit::Nanosecond, None),
        other => bail!("Unknown column type {:?}", other),
    })
}
