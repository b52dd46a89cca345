use std::collections::HashSet;

use crate::error::Result;
use crate::graph::edges::build_edges;
use crate::graph::roles::RoleClassifier;
use crate::graph::tree::build_tree;
use crate::ingest::extract::ExtractorRegistry;
use crate::ingest::filter::normalize_path;
use crate::ingest::language::detect_language;
use crate::models::file::{file_name, FileRecord};
use crate::models::graph::{Artifact, Node, NodeKind};

/// Turns a snapshot into an [`Artifact`]. Pure and deterministic: the same
/// records always produce the same artifact, whatever their input order.
pub struct Analyzer {
    registry: ExtractorRegistry,
    classifier: RoleClassifier,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(ExtractorRegistry::new(), RoleClassifier::new())
    }

    #[must_use]
    pub fn with_parts(registry: ExtractorRegistry, classifier: RoleClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Build nodes, edges, tree and roles for a snapshot.
    ///
    /// Paths are canonicalized first (see [`normalize_path`]). Records are
    /// ordered by path; if a path repeats, the first record wins.
    #[must_use]
    pub fn analyze(&self, files: &[FileRecord]) -> Artifact {
        let mut seen = HashSet::new();
        let mut records: Vec<FileRecord> = files
            .iter()
            .filter_map(|f| {
                let path = normalize_path(&f.path);
                if path.is_empty() || !seen.insert(path.clone()) {
                    return None;
                }
                Some(FileRecord { path, ..f.clone() })
            })
            .collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let file_roles = self.classifier.classify_all(&records);
        let nodes = records
            .iter()
            .map(|f| Node {
                id: f.path.clone(),
                label: file_name(&f.path).to_string(),
                kind: NodeKind::File,
                language: detect_language(&f.path).map(String::from),
                role: file_roles.get(&f.path).cloned(),
                size: f.size,
            })
            .collect();
        let edges = build_edges(&self.registry, &records);
        let paths: Vec<&str> = records.iter().map(|f| f.path.as_str()).collect();
        let file_tree = build_tree(&paths);

        Artifact {
            nodes,
            edges,
            file_tree,
            file_roles,
        }
    }
}

/// Serialized artifact body and its SHA-256 hex digest.
pub fn digest(artifact: &Artifact) -> Result<(String, String)> {
    let body = serde_json::to_string(artifact)?;
    let hash = hash_bytes(body.as_bytes());
    Ok((body, hash))
}

/// Compute SHA-256 hash of a byte slice.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
