use crate::domain::ast::{AstNode, AstNodeKind};
use crate::domain::error::TraversalError;
use crate::domain::funcdef::{FuncDefHandler, FunctionReport};
use crate::domain::visitor::Dispatcher;
use crate::ports::{ReportSink, SourceParser};
use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::path::Path;

/// Parse one file and report its function definitions.
pub struct ScanUsecase<'a> {
    pub parser: &'a dyn SourceParser,
    pub main_file_only: bool,
}

impl<'a> ScanUsecase<'a> {
    pub fn new(parser: &'a dyn SourceParser) -> Self {
        Self {
            parser,
            main_file_only: false,
        }
    }

    /// Returns the number of functions reported.
    pub fn run(&self, path: &Path, sink: &mut dyn ReportSink) -> Result<usize> {
        check_input(path)?;
        let root = self.parser.parse(path)?;

        let only_file = self.main_file_only.then(|| path.display().to_string());
        let mut counting = CountingSink { inner: sink, count: 0 };
        scan_tree(&root, &mut counting, only_file)
            .with_context(|| format!("Failed while walking {}", path.display()))?;
        counting.finish().context("Failed to write report")?;

        log::info!("{}: {} function definitions", path.display(), counting.count);
        Ok(counting.count)
    }
}

/// Walk `root` once with the function-definition handler registered.
pub fn scan_tree(
    root: &AstNode,
    sink: &mut dyn ReportSink,
    only_file: Option<String>,
) -> Result<(), TraversalError> {
    let mut handler = FuncDefHandler::new(sink);
    if let Some(file) = only_file {
        handler = handler.only_in_file(file);
    }

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(AstNodeKind::FunctionDefinition, handler);
    dispatcher.traverse(root)
}

/// Fails early when the input cannot be read, before any preprocessing.
pub fn check_input(path: &Path) -> Result<()> {
    let meta = fs::metadata(path)
        .with_context(|| format!("Input file not found: {}", path.display()))?;
    if !meta.is_file() {
        bail!("Input is not a regular file: {}", path.display());
    }
    File::open(path).with_context(|| format!("Cannot read input file: {}", path.display()))?;
    Ok(())
}

struct CountingSink<'s> {
    inner: &'s mut dyn ReportSink,
    count: usize,
}

impl ReportSink for CountingSink<'_> {
    fn report(&mut self, report: &FunctionReport) -> std::io::Result<()> {
        self.inner.report(report)?;
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.inner.finish()
    }
}
