/// Output formatting for the navto CLI
///
/// - Text: one aligned line per result, for people
/// - JSON: single pretty-printed array, written once the search is done
/// - NDJSON: one result per line as soon as it arrives
use crate::materialize::NavigateToSearchResult;
use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Ndjson,
}

/// Flat record written by the JSON formats
#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    name: &'a str,
    kind: &'a str,
    match_kind: String,
    file_path: &'a str,
    start: u32,
    length: u32,
    project: &'a str,
    container: &'a str,
    glyph: Option<String>,
    is_stale: bool,
}

impl<'a> From<&'a NavigateToSearchResult> for ResultRecord<'a> {
    fn from(result: &'a NavigateToSearchResult) -> Self {
        let info = &result.item.declared_symbol_info;
        Self {
            name: &result.display_name,
            kind: result.kind.as_str(),
            match_kind: format!("{:?}", result.match_kind),
            file_path: &result.file_path,
            start: info.span.start,
            length: info.span.length,
            project: &result.project_label,
            container: &info.container_display_name,
            glyph: result.glyph.map(|glyph| glyph.to_string()),
            is_stale: result.is_stale(),
        }
    }
}

pub struct OutputWriter {
    format: OutputFormat,
    writer: Box<dyn Write + Send>,
    buffer: Vec<NavigateToSearchResult>,
}

impl OutputWriter {
    /// Writer on stdout
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, Box::new(io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            writer,
            buffer: Vec::new(),
        }
    }

    /// Accept one result; only NDJSON writes immediately
    pub fn write_result(&mut self, result: NavigateToSearchResult) -> Result<()> {
        match self.format {
            OutputFormat::Ndjson => {
                writeln!(self.writer, "{}", serde_json::to_string(&ResultRecord::from(&result))?)?;
                self.writer.flush()?;
            }
            OutputFormat::Text | OutputFormat::Json => self.buffer.push(result),
        }
        Ok(())
    }

    /// Sort buffered results into display order and write them out
    pub fn finish(mut self) -> Result<()> {
        let mut results = std::mem::take(&mut self.buffer);
        results.sort_by(|a, b| a.display_cmp(b));

        match self.format {
            OutputFormat::Json => {
                let records: Vec<ResultRecord<'_>> = results.iter().map(ResultRecord::from).collect();
                writeln!(self.writer, "{}", serde_json::to_string_pretty(&records)?)?;
            }
            OutputFormat::Text => {
                for result in &results {
                    writeln!(self.writer, "{}", format_text_line(result))?;
                }
            }
            OutputFormat::Ndjson => {}
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub fn format_text_line(result: &NavigateToSearchResult) -> String {
    let span = result.item.declared_symbol_info.span;
    format!(
        "{:<10} {:<32} {}:{}  [{}]{}",
        result.kind.as_str(),
        result.display_name,
        result.file_path,
        span.start,
        result.additional_information,
        if result.is_stale() { " (stale)" } else { "" }
    )
}
