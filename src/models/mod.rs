pub mod file;
pub mod graph;
pub mod job;

pub use file::FileRecord;
pub use graph::{Artifact, Edge, EdgeKind, Node, NodeKind, TreeNode, TreeNodeKind};
pub use job::{Job, JobStatus, JobView};
