use crate::domain::ast::AstNode;
use crate::domain::funcdef::FunctionReport;
use std::path::Path;

pub mod report_exporter;

/// Turns a C source file into a generic tree.
pub trait SourceParser {
    fn parse(&self, path: &Path) -> anyhow::Result<AstNode>;
}

/// Receives function reports in walk order.
pub trait ReportSink {
    fn report(&mut self, report: &FunctionReport) -> std::io::Result<()>;

    /// Called once after the walk completed successfully.
    fn finish(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
