use crate::domain::ast::AstNode;
use crate::infrastructure::lowering::Lowering;
use crate::infrastructure::preprocessor::PreprocessorSettings;
use crate::infrastructure::source_map::SourceMap;
use crate::ports::SourceParser;
use anyhow::{anyhow, Context, Result};
use lang_c::driver::{self, Parse, SyntaxError};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// C parser backed by lang-c, optionally running the preprocessor first.
pub struct LangCParser {
    settings: PreprocessorSettings,
}

impl LangCParser {
    pub fn new(settings: PreprocessorSettings) -> Self {
        Self { settings }
    }

    fn run_driver(&self, path: &Path) -> Result<Parse> {
        let config = self.settings.to_config();
        let file = path.display().to_string();

        if !self.settings.enabled {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", file))?;
            return driver::parse_preprocessed(&config, source)
                .map_err(|e| syntax_error(&e, &file));
        }

        debug!("preprocessing: {} {}", self.settings.command_line(), file);
        match driver::parse(&config, path) {
            Ok(parse) => Ok(parse),
            Err(driver::Error::PreprocessorError(e)) => Err(anyhow!(e).context(format!(
                "Preprocessor failed: `{} {}`. Is `{}` installed?",
                self.settings.command_line(),
                file,
                config.cpp_command
            ))),
            Err(driver::Error::SyntaxError(e)) => Err(syntax_error(&e, &file)),
        }
    }
}

impl SourceParser for LangCParser {
    fn parse(&self, path: &Path) -> Result<AstNode> {
        let parse = self.run_driver(path)?;
        let file = path.display().to_string();
        debug!("parsed {} ({} bytes after preprocessing)", file, parse.source.len());

        let map = SourceMap::new(&parse.source, &file);
        let root = Lowering::new(&map).translation_unit(&parse.unit);
        info!(
            "{}: {} external declarations, {} nodes",
            file,
            parse.unit.0.len(),
            root.subtree_len()
        );
        Ok(root)
    }
}

/// Syntax error located in original-file coordinates.
fn syntax_error(e: &SyntaxError, file: &str) -> anyhow::Error {
    let location = SourceMap::new(&e.source, file)
        .coord(e.offset)
        .map(|c| c.to_string())
        .unwrap_or_else(|| format!("{}:{}:{}", file, e.line, e.column));
    let mut expected: Vec<&str> = e.expected.iter().copied().collect();
    expected.sort_unstable();
    anyhow!(
        "Syntax error at {}: expected one of {}",
        location,
        expected.join(", ")
    )
}
