use std::collections::BTreeMap;

use crate::ingest::language::detect_language;
use crate::models::graph::{TreeNode, TreeNodeKind};

/// Directory under construction.
#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, TreeNode>,
}

impl DirBuilder {
    fn finish(self, name: String, path: String) -> TreeNode {
        let mut children: Vec<TreeNode> = Vec::with_capacity(self.dirs.len() + self.files.len());
        for (child_name, dir) in self.dirs {
            let child_path = if path.is_empty() {
                child_name.clone()
            } else {
                format!("{path}/{child_name}")
            };
            children.push(dir.finish(child_name, child_path));
        }
        children.extend(self.files.into_values());
        TreeNode {
            name,
            path,
            kind: TreeNodeKind::Dir,
            children,
            language: None,
        }
    }
}

/// Build the file tree of a snapshot.
///
/// The root is an unnamed directory. Within a directory, subdirectories
/// come first, then files, each in name order. Empty path segments are
/// ignored; a path with no segments at all is skipped.
#[must_use]
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> TreeNode {
    let mut sorted: Vec<&str> = paths.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut root = DirBuilder::default();
    for path in sorted {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            tracing::debug!(path, "skipping path without segments");
            continue;
        };

        let mut current = &mut root;
        for dir in dirs {
            current = current.dirs.entry((*dir).to_string()).or_default();
        }
        current.files.insert(
            (*leaf).to_string(),
            TreeNode {
                name: (*leaf).to_string(),
                path: path.to_string(),
                kind: TreeNodeKind::File,
                children: Vec::new(),
                language: detect_language(path).map(String::from),
            },
        );
    }

    root.finish(String::new(), String::new())
}

/// Format a tree as indented text, one entry per line.
#[must_use]
pub fn format_tree(node: &TreeNode) -> String {
    let mut out = String::new();
    for child in &node.children {
        write_node(&mut out, child, 0);
    }
    out
}

fn write_node(out: &mut String, node: &TreeNode, indent: usize) {
    use std::fmt::Write;
    let prefix = "  ".repeat(indent);
    if node.is_dir() {
        let _ = writeln!(out, "{prefix}{}/", node.name);
        for child in &node.children {
            write_node(out, child, indent + 1);
        }
    } else {
        let _ = write!(out, "{prefix}{}", node.name);
        if let Some(lang) = &node.language {
            let _ = write!(out, "  [{lang}]");
        }
        out.push('\n');
    }
}
