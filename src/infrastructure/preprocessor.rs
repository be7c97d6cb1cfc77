/// Preprocessor settings.
///
/// Describes how the C preprocessor is invoked before parsing and turns
/// that description into a lang-c driver configuration. lang-c runs the
/// command itself: `<command> <options...> <file>`, reading stdout.

use lang_c::driver::{Config, Flavor};
use serde::Deserialize;
use std::path::PathBuf;

/// C dialect accepted by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CFlavor {
    /// C11 with GNU extensions (what glibc headers need).
    #[default]
    Gnu11,
    Std11,
    /// C11 with Clang extensions; also switches the default command to clang.
    Clang11,
}

impl CFlavor {
    pub fn from_str(s: &str) -> Option<CFlavor> {
        match s.to_lowercase().as_str() {
            "gnu11" | "gnu" => Some(CFlavor::Gnu11),
            "std11" | "c11" | "std" => Some(CFlavor::Std11),
            "clang11" | "clang" => Some(CFlavor::Clang11),
            _ => None,
        }
    }

    fn lang_c(self) -> Flavor {
        match self {
            CFlavor::Gnu11 => Flavor::GnuC11,
            CFlavor::Std11 => Flavor::StdC11,
            CFlavor::Clang11 => Flavor::ClangC11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreprocessorSettings {
    /// When false the input is parsed as already-preprocessed text.
    pub enabled: bool,
    /// Preprocessor program; `gcc` (or `clang` for the clang flavor) when unset.
    pub command: Option<String>,
    /// Extra arguments, passed before the include and define flags.
    pub args: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub defines: Vec<String>,
    pub flavor: CFlavor,
}

impl Default for PreprocessorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            args: Vec::new(),
            include_dirs: vec![PathBuf::from("inc")],
            defines: Vec::new(),
            flavor: CFlavor::default(),
        }
    }
}

impl PreprocessorSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// lang-c driver configuration for these settings.
    pub fn to_config(&self) -> Config {
        let mut config = match self.flavor {
            CFlavor::Clang11 => Config::with_clang(),
            _ => Config::with_gcc(),
        };
        config.flavor = self.flavor.lang_c();

        if let Some(command) = &self.command {
            config.cpp_command = command.clone();
        }
        config.cpp_options.extend(self.args.iter().cloned());
        config
            .cpp_options
            .extend(self.include_dirs.iter().map(|dir| format!("-I{}", dir.display())));
        config
            .cpp_options
            .extend(self.defines.iter().map(|def| format!("-D{}", def)));
        config
    }

    /// Human-readable command line, for logs and error messages.
    pub fn command_line(&self) -> String {
        let config = self.to_config();
        std::iter::once(config.cpp_command)
            .chain(config.cpp_options)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
