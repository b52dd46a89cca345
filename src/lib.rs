// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_possible_truncation: File sizes and counts fit comfortably in the target types
// - cast_sign_loss: Database IDs and counts are never negative in our schema
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are limited to static pattern compilation
// - items_after_statements: Output structs are clearer near their usage
// - too_many_lines: The pipeline keeps each job step in one place
// - similar_names: Variable naming is contextually clear
// - option_if_let_else: if-let is often clearer
// - needless_pass_by_value: Sometimes clearer semantically
// - match_same_arms: Combined arms can reduce readability
// - module_name_repetitions: Names like JobStore read better than Store
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value,
    clippy::match_same_arms,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod ingest;
pub mod jobs;
pub mod models;
