use chrono::{DateTime, SecondsFormat, Utc};
use engine_logging::{engine_info, engine_warn};
use serde::Serialize;
use tablescrape_core::{Artifact, ExportFormat, Row};

use crate::filename::export_filename;
use crate::ExportError;

/// Context recorded in the JSON envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMeta {
    pub pages_scraped: u32,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata<'a> {
    total_rows: usize,
    pages_scraped: u32,
    scraped_at: String,
    source: &'a str,
}

#[derive(Serialize)]
struct Envelope<'a> {
    metadata: Metadata<'a>,
    data: &'a [Row],
}

#[derive(Debug, Clone)]
pub struct Exporter {
    file_prefix: String,
}

impl Exporter {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
        }
    }

    /// Serializes `rows`; an empty slice yields `Ok(None)` and a warning.
    pub fn export(
        &self,
        rows: &[Row],
        format: ExportFormat,
        meta: &ExportMeta,
    ) -> Result<Option<Artifact>, ExportError> {
        if rows.is_empty() {
            engine_warn!("No data to export");
            return Ok(None);
        }
        let content = match format {
            ExportFormat::Csv => to_csv(rows)?,
            ExportFormat::Json => to_json(rows, meta)?,
        };
        engine_info!(
            "{} exported: {} rows",
            format.extension().to_ascii_uppercase(),
            rows.len()
        );
        Ok(Some(Artifact {
            filename: export_filename(&self.file_prefix, format, meta.scraped_at),
            format,
            content,
        }))
    }
}

/// Every field quoted, quotes doubled, `\n` line endings; columns follow the
/// first row's key order.
pub fn to_csv(rows: &[Row]) -> Result<String, ExportError> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let header: Vec<&str> = first.keys().collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&header)?;
    for row in rows {
        writer.write_record(header.iter().map(|key| row.get(key).unwrap_or("")))?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn to_json(rows: &[Row], meta: &ExportMeta) -> Result<String, ExportError> {
    let envelope = Envelope {
        metadata: Metadata {
            total_rows: rows.len(),
            pages_scraped: meta.pages_scraped,
            scraped_at: meta.scraped_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: &meta.source,
        },
        data: rows,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}
