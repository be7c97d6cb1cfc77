//! Source Map
//!
//! Maps byte offsets in preprocessed text back to the original
//! `file:line:column`, following the line markers the preprocessor emits:
//!
//! ```text
//! # 12 "src/device.c" 2
//! #line 40 "gen.c"
//! ```
//!
//! Text before the first marker belongs to the file the map was built for.

use crate::domain::ast::Coord;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct LineStart {
    offset: usize,
    file: Arc<str>,
    line: usize,
}

#[derive(Debug, Clone)]
pub struct SourceMap {
    source: String,
    lines: Vec<LineStart>,
}

impl SourceMap {
    pub fn new(source: &str, default_file: &str) -> Self {
        let mut lines = Vec::new();
        let mut file: Arc<str> = Arc::from(default_file);
        let mut line = 1;
        let mut offset = 0;

        for text in source.split_inclusive('\n') {
            match parse_line_marker(text) {
                Some((marker_line, marker_file)) => {
                    if let Some(name) = marker_file {
                        if &*file != name {
                            file = Arc::from(name);
                        }
                    }
                    line = marker_line;
                }
                None => {
                    lines.push(LineStart {
                        offset,
                        file: file.clone(),
                        line,
                    });
                    line += 1;
                }
            }
            offset += text.len();
        }

        Self {
            source: source.to_string(),
            lines,
        }
    }

    /// Coordinate of the character starting at `offset`.
    pub fn coord(&self, offset: usize) -> Option<Coord> {
        let idx = self.lines.partition_point(|l| l.offset <= offset);
        let start = self.lines.get(idx.checked_sub(1)?)?;
        let prefix = self.source.get(start.offset..offset)?;
        if prefix.contains('\n') {
            // Offset sits on a marker line.
            return None;
        }
        Some(Coord::new(
            &*start.file,
            start.line,
            Some(prefix.chars().count() + 1),
        ))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Recognizes `# <line> "<file>" flags...` and `#line <line> ["<file>"]`.
fn parse_line_marker(text: &str) -> Option<(usize, Option<&str>)> {
    let rest = text.trim_start().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("line").unwrap_or(rest).trim_start();

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let line = rest[..digits_end].parse().ok()?;

    let after = rest[digits_end..].trim_start();
    let file = after
        .strip_prefix('"')
        .and_then(|s| s.find('"').map(|end| &s[..end]));
    Some((line, file))
}
