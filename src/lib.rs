// Education Finder - Core Library
// Loader and pure filter/render core shared by the CLI, TUI and web server

pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod page;
pub mod record;
pub mod render;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use config::DatasetArgs;
pub use error::LoadError;
pub use filter::{filter, Criteria};
pub use loader::{
    load_universities, parse_text, preview_lines, sniff_delimiter, strip_line_quotes,
    LinePreview, Loaded, Strategy, DEFAULT_ENCODING,
};
pub use page::{render_error_page, render_page};
pub use record::{Table, UniversityRecord, ALL, COLUMNS};
pub use render::{render, Card, Rendered, NO_RESULTS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
