use std::collections::HashSet;

use crate::ingest::extract::ExtractorRegistry;
use crate::ingest::resolver::resolve;
use crate::models::file::FileRecord;
use crate::models::graph::Edge;

/// Build the deduplicated edge set of a snapshot.
///
/// Files are visited in path order and specifiers in source order, so the
/// output order is deterministic. A specifier that resolves to nothing, or
/// to the file itself, produces no edge. When the same target is reached
/// twice from one source, the first specifier's kind is kept.
#[must_use]
pub fn build_edges(registry: &ExtractorRegistry, files: &[FileRecord]) -> Vec<Edge> {
    let known: HashSet<String> = files.iter().map(|f| f.path.clone()).collect();

    let mut ordered: Vec<&FileRecord> = files.iter().filter(|f| f.content.is_some()).collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut edges = Vec::new();

    for file in ordered {
        for spec in registry.extract(&file.path, file.content.as_deref()) {
            let Some(target) = resolve(&spec.raw, &file.path, &known) else {
                continue;
            };
            if target == file.path {
                continue;
            }
            if seen.insert((file.path.clone(), target.clone())) {
                edges.push(Edge::new(file.path.clone(), target, spec.kind));
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::EdgeKind;

    fn pairs(edges: &[Edge]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    #[test]
    fn resolves_and_dedups() {
        let files = vec![
            FileRecord::new("src/a.ts").with_content(
                "import b from './b';\nimport { x } from \"./b\";\nconst c = require('./c');\n",
            ),
            FileRecord::new("src/b.ts").with_content("export const b = 1;"),
            FileRecord::new("src/c.js").with_content(""),
        ];
        let edges = build_edges(&ExtractorRegistry::new(), &files);
        assert_eq!(pairs(&edges), vec![("src/a.ts", "src/b.ts"), ("src/a.ts", "src/c.js")]);
        assert_eq!(edges[0].kind, EdgeKind::Import);
        assert_eq!(edges[1].kind, EdgeKind::Require);
    }

    #[test]
    fn different_specifiers_to_same_target_yield_one_edge() {
        let files = vec![
            FileRecord::new("src/a.ts")
                .with_content("import x from './lib';\nimport y from './lib/index';\n"),
            FileRecord::new("src/lib/index.ts").with_content(""),
        ];
        let edges = build_edges(&ExtractorRegistry::new(), &files);
        assert_eq!(pairs(&edges), vec![("src/a.ts", "src/lib/index.ts")]);
    }

    #[test]
    fn self_references_are_skipped() {
        let files = vec![FileRecord::new("src/index.ts").with_content("export * from '.';\n")];
        assert!(build_edges(&ExtractorRegistry::new(), &files).is_empty());
    }

    #[test]
    fn files_without_content_have_no_outgoing_edges() {
        let files = vec![
            FileRecord::new("a.ts"),
            FileRecord::new("b.ts").with_content("import a from './a';"),
        ];
        let edges = build_edges(&ExtractorRegistry::new(), &files);
        assert_eq!(pairs(&edges), vec![("b.ts", "a.ts")]);
    }

    #[test]
    fn external_packages_produce_no_edges() {
        let files = vec![
            FileRecord::new("a.ts").with_content("import React from 'react';\nimport z from 'zod';"),
            FileRecord::new("react.ts").with_content(""),
        ];
        assert!(build_edges(&ExtractorRegistry::new(), &files).is_empty());
    }
}
