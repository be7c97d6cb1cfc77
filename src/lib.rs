// Main library entry point for c-funcdefs.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod ports;
