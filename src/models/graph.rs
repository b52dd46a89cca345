use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of a graph node. Snapshot analysis only produces `File` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
    External,
}

/// Kind of a dependency edge, derived from the syntax the reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Static import / include / module declaration.
    Import,
    /// Dynamic load (`require(...)`, `import(...)`, Ruby `require`).
    Require,
    /// Re-export (`export ... from "..."`).
    Export,
}

impl EdgeKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Require => "require",
            Self::Export => "export",
        }
    }
}

/// One file in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The file path.
    pub id: String,
    /// Last path segment.
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A resolved reference from one snapshot file to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// `"source→target"`.
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}→{target}"),
            source,
            target,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNodeKind {
    File,
    Dir,
}

/// A node of the hierarchical file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeNodeKind,
    /// Always empty for files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TreeNode {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == TreeNodeKind::Dir
    }

    /// Paths of all file leaves, depth-first in child order.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_dir() {
            for child in &self.children {
                child.collect_leaves(out);
            }
        } else {
            out.push(&self.path);
        }
    }
}

/// Output of one successful analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub file_tree: TreeNode,
    pub file_roles: BTreeMap<String, String>,
}
