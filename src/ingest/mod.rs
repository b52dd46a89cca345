pub mod extract;
pub mod filter;
pub mod language;
pub mod resolver;

pub use extract::{ExtractorRegistry, ReferenceExtractor, Specifier};
pub use filter::{is_excluded, normalize_path, select_snapshot, should_fetch_content};
pub use language::detect_language;
pub use resolver::resolve;
