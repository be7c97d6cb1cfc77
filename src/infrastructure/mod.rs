// Infrastructure implementations for c-funcdefs: the lang-c adapter and the
// pieces it needs (preprocessor settings, source map, lowering, type text)
// plus the TOML config loader.

pub mod c_parser;
pub mod c_types;
pub mod config;
pub mod lowering;
pub mod preprocessor;
pub mod source_map;

pub use c_parser::LangCParser;
pub use config::FileConfig;
pub use preprocessor::{CFlavor, PreprocessorSettings};
