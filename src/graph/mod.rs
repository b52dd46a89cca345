//! Graph construction over a snapshot: edges, roles, tree, and the
//! assembled artifact.

pub mod artifact;
pub mod edges;
pub mod roles;
pub mod tree;

pub use artifact::{digest, Analyzer};
pub use edges::build_edges;
pub use roles::RoleClassifier;
pub use tree::{build_tree, format_tree};
