//! Go import declarations, single and grouped.

use regex::Regex;

use crate::ingest::extract::{ReferenceExtractor, Specifier};
use crate::models::graph::EdgeKind;

const SINGLE: &str = r#"(?m)^[ \t]*import[ \t]+(?:[\w.]+[ \t]+)?"([^"\n]+)""#;
const BLOCK: &str = r"(?s)\bimport\s*\(([^)]*)\)";
const BLOCK_LINE: &str = r#"(?m)^[ \t]*(?:[\w.]+[ \t]+)?"([^"\n]+)""#;

pub struct GoExtractor {
    single: Regex,
    block: Regex,
    block_line: Regex,
}

impl Default for GoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl GoExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            single: Regex::new(SINGLE).expect("go import pattern must compile"),
            block: Regex::new(BLOCK).expect("go import block pattern must compile"),
            block_line: Regex::new(BLOCK_LINE).expect("go import line pattern must compile"),
        }
    }
}

impl ReferenceExtractor for GoExtractor {
    fn extract(&self, source: &str, _path: &str) -> Vec<Specifier> {
        let mut hits: Vec<(usize, &str)> = Vec::new();
        for caps in self.single.captures_iter(source) {
            if let Some(m) = caps.get(1) {
                hits.push((m.start(), m.as_str()));
            }
        }
        for caps in self.block.captures_iter(source) {
            let Some(body) = caps.get(1) else { continue };
            for line in self.block_line.captures_iter(body.as_str()) {
                if let Some(m) = line.get(1) {
                    hits.push((body.start() + m.start(), m.as_str()));
                }
            }
        }
        hits.sort_by_key(|(offset, _)| *offset);
        hits.into_iter()
            .map(|(_, raw)| Specifier::new(raw, EdgeKind::Import))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_grouped_imports() {
        let source = r#"package main

import "fmt"
import str "strings"

import (
	"os"
	log "github.com/sirupsen/logrus"
	_ "./internal/plugins"
)
"#;
        let raws: Vec<String> = GoExtractor::new()
            .extract(source, "main.go")
            .into_iter()
            .map(|s| s.raw)
            .collect();
        assert_eq!(
            raws,
            vec![
                "fmt",
                "strings",
                "os",
                "github.com/sirupsen/logrus",
                "./internal/plugins"
            ]
        );
    }
}
