//! Report Exporters
//!
//! Text output prints one line per function as soon as it is reported;
//! JSON output buffers the reports and writes a single array on `finish`.

use crate::domain::funcdef::{FunctionReport, TypeField};
use crate::ports::ReportSink;
use serde::{Deserialize, Serialize};
use std::io::{Result, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

pub struct TextExporter<W: Write> {
    out: W,
    field: TypeField,
}

impl<W: Write> TextExporter<W> {
    pub fn new(out: W, field: TypeField) -> Self {
        Self { out, field }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextExporter<W> {
    fn report(&mut self, report: &FunctionReport) -> Result<()> {
        writeln!(self.out, "{}", report.to_line(self.field))
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()
    }
}

pub struct JsonExporter<W: Write> {
    out: W,
    reports: Vec<FunctionReport>,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            reports: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonExporter<W> {
    fn report(&mut self, report: &FunctionReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &self.reports)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Keeps reports in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub reports: Vec<FunctionReport>,
}

impl ReportSink for CollectingSink {
    fn report(&mut self, report: &FunctionReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

/// Build the exporter for `format` writing to `out`.
pub fn exporter_for<'w, W: Write + 'w>(
    format: OutputFormat,
    field: TypeField,
    out: W,
) -> Box<dyn ReportSink + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextExporter::new(out, field)),
        OutputFormat::Json => Box::new(JsonExporter::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::Coord;

    fn report(name: &str, line: usize) -> FunctionReport {
        FunctionReport {
            name: name.to_string(),
            coord: Coord::new("m.c", line, Some(5)),
            declared_type: Some("int (void)".to_string()),
            initializer: None,
        }
    }

    #[test]
    fn test_text_exporter_writes_lines() {
        let mut exporter = TextExporter::new(Vec::new(), TypeField::Initializer);
        exporter.report(&report("foo", 3)).unwrap();
        exporter.report(&report("bar", 10)).unwrap();
        exporter.finish().unwrap();
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert_eq!(text, "foo at m.c:3:5 type None\nbar at m.c:10:5 type None\n");
    }

    #[test]
    fn test_json_exporter_writes_array_on_finish() {
        let mut exporter = JsonExporter::new(Vec::new());
        exporter.report(&report("foo", 3)).unwrap();
        assert!(exporter.out.is_empty());
        exporter.finish().unwrap();

        let value: serde_json::Value = serde_json::from_slice(&exporter.into_inner()).unwrap();
        assert_eq!(value[0]["name"], "foo");
        assert_eq!(value[0]["coord"]["line"], 3);
        assert_eq!(value[0]["declared_type"], "int (void)");
        assert!(value[0]["initializer"].is_null());
    }

    #[test]
    fn test_json_exporter_empty() {
        let mut exporter = JsonExporter::new(Vec::new());
        exporter.finish().unwrap();
        assert_eq!(String::from_utf8(exporter.into_inner()).unwrap(), "[]\n");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("dot"), None);
    }
}
