//! Library-level tests for the snapshot pipeline and the job lifecycle.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use repograph::error::{GraphError, Result};
use repograph::fetch::{LocalFetcher, RemoteEntry, SnapshotFetcher};
use repograph::graph::{digest, Analyzer};
use repograph::jobs::{analyze_repo, JobStore, Pipeline};
use repograph::models::{EdgeKind, FileRecord, JobStatus, NodeKind, TreeNodeKind};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_app")
}

/// In-memory repository keyed by path.
struct MemoryRepo {
    files: BTreeMap<String, String>,
}

impl MemoryRepo {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, c)| ((*p).to_string(), (*c).to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl SnapshotFetcher for MemoryRepo {
    async fn list_files(&self, repo: &str) -> Result<Vec<RemoteEntry>> {
        if repo == "unreachable" {
            return Err(GraphError::Fetch {
                repo: repo.to_string(),
                detail: "host unreachable".into(),
            });
        }
        Ok(self
            .files
            .keys()
            .map(|path| RemoteEntry {
                path: path.clone(),
                size: None,
            })
            .collect())
    }

    async fn fetch_content(&self, _repo: &str, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| GraphError::ContentFetch {
                path: path.to_string(),
                detail: "not found".into(),
            })
    }
}

fn chain_repo() -> MemoryRepo {
    MemoryRepo::new(&[
        ("a.ts", "import b from '@/b';\nimport { c } from '@/c';"),
        ("b.ts", "export * from '@/d';"),
        ("c.ts", "import _ from 'lodash';"),
        ("d.ts", "export const d = 1;"),
    ])
}

fn pipeline(repo: MemoryRepo) -> (TempDir, Pipeline) {
    let tmp = TempDir::new().unwrap();
    let store = JobStore::new(tmp.path().join("jobs.db"));
    (tmp, Pipeline::new(store, Arc::new(repo)))
}

#[test]
fn alias_imports_form_expected_edges() {
    let records = vec![
        FileRecord::new("a.ts").with_content("import b from '@/b';\nimport { c } from '@/c';"),
        FileRecord::new("b.ts").with_content("import { d } from '@/d';"),
        FileRecord::new("c.ts").with_content("import _ from 'lodash';"),
        FileRecord::new("d.ts"),
    ];
    let artifact = Analyzer::new().analyze(&records);

    assert_eq!(artifact.nodes.len(), 4);
    let pairs: Vec<(&str, &str)> = artifact
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a.ts", "b.ts"), ("a.ts", "c.ts"), ("b.ts", "d.ts")]);
    assert!(artifact.edges.iter().all(|e| e.kind == EdgeKind::Import));
    assert!(!artifact.edges.iter().any(|e| e.target.contains("lodash")));
}

#[test]
fn rerunning_yields_identical_json() {
    let records = vec![
        FileRecord::new("src/index.ts").with_content("export * from './a';\nimport './b';"),
        FileRecord::new("src/a.ts").with_content("const b = require('./b');"),
        FileRecord::new("src/b.ts"),
    ];
    let analyzer = Analyzer::new();
    let (first, hash_a) = digest(&analyzer.analyze(&records)).unwrap();
    let (second, hash_b) = digest(&analyzer.analyze(&records)).unwrap();
    assert_eq!(first, second);
    assert_eq!(hash_a, hash_b);
}

#[tokio::test]
async fn structural_properties_hold_on_fixture() {
    let fetcher: Arc<dyn SnapshotFetcher> = Arc::new(LocalFetcher::new());
    let repo = fixture_dir().to_string_lossy().to_string();
    let (artifact, stats) = analyze_repo(fetcher, Arc::new(Analyzer::new()), &repo, 500, 4)
        .await
        .unwrap();

    let ids: HashSet<&str> = artifact.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), artifact.nodes.len());
    assert_eq!(artifact.nodes.len(), stats.considered);
    assert!(artifact.nodes.iter().all(|n| n.kind == NodeKind::File));

    let mut pairs = HashSet::new();
    for edge in &artifact.edges {
        assert_ne!(edge.source, edge.target);
        assert!(ids.contains(edge.target.as_str()));
        assert!(pairs.insert((edge.source.as_str(), edge.target.as_str())));
    }

    assert_eq!(artifact.file_tree.kind, TreeNodeKind::Dir);
    let mut leaves = artifact.file_tree.leaf_paths();
    leaves.sort_unstable();
    let mut expected: Vec<&str> = ids.iter().copied().collect();
    expected.sort_unstable();
    assert_eq!(leaves, expected);

    assert_eq!(artifact.file_roles.len(), artifact.nodes.len());
    assert!(artifact.file_roles["app/page.tsx"].contains("Page"));
    assert!(artifact.file_roles["app/layout.tsx"].contains("Layout"));
    assert_eq!(artifact.file_roles["api/server.py"], "Module");
    assert_eq!(artifact.file_roles["app/globals.css"], "Stylesheet");
}

#[tokio::test]
async fn fixture_edges_cover_aliases_relatives_and_python() {
    let fetcher: Arc<dyn SnapshotFetcher> = Arc::new(LocalFetcher::new());
    let repo = fixture_dir().to_string_lossy().to_string();
    let (artifact, _) = analyze_repo(fetcher, Arc::new(Analyzer::new()), &repo, 500, 4)
        .await
        .unwrap();

    let ids: HashSet<&str> = artifact.edges.iter().map(|e| e.id.as_str()).collect();
    for expected in [
        "app/page.tsx→lib/db.ts",
        "app/page.tsx→components/Button.tsx",
        "app/layout.tsx→app/globals.css",
        "components/Button.tsx→lib/utils.ts",
        "api/server.py→api/models.py",
    ] {
        assert!(ids.contains(expected), "missing edge {expected}");
    }
    assert_eq!(artifact.edges.len(), 5);
}

#[tokio::test]
async fn job_completes_with_artifact() {
    let (_tmp, pipeline) = pipeline(chain_repo());
    let id = pipeline.store().submit("chain").unwrap().id;
    let report = pipeline.run(id).await.unwrap();
    assert_eq!(report.status, JobStatus::Completed);

    let view = pipeline.store().poll(id).unwrap();
    assert_eq!(view.status, JobStatus::Completed);
    assert!(view.error.is_none());
    let artifact = view.artifact.unwrap();
    assert_eq!(artifact.nodes.len(), 4);
    assert_eq!(artifact.edges.len(), 3);
    let export = artifact
        .edges
        .iter()
        .find(|e| e.source == "b.ts")
        .unwrap();
    assert_eq!(export.kind, EdgeKind::Export);
}

#[tokio::test]
async fn listing_failure_fails_job_without_artifact() {
    let (_tmp, pipeline) = pipeline(chain_repo());
    let id = pipeline.store().submit("unreachable").unwrap().id;
    let report = pipeline.run(id).await.unwrap();
    assert_eq!(report.status, JobStatus::Failed);

    let view = pipeline.store().poll(id).unwrap();
    assert_eq!(view.status, JobStatus::Failed);
    assert!(!view.error.unwrap_or_default().is_empty());
    assert!(view.artifact.is_none());
    assert!(pipeline.store().artifact_digest(id).unwrap().is_none());
}

#[tokio::test]
async fn same_snapshot_twice_stores_same_digest() {
    let (_tmp, pipeline) = pipeline(chain_repo());
    let first = pipeline.store().submit("chain").unwrap().id;
    let second = pipeline.store().submit("chain").unwrap().id;
    pipeline.run(first).await.unwrap();
    pipeline.run(second).await.unwrap();
    assert_eq!(
        pipeline.store().artifact_digest(first).unwrap(),
        pipeline.store().artifact_digest(second).unwrap()
    );
}

#[test]
fn concurrent_claims_have_one_winner() {
    let tmp = TempDir::new().unwrap();
    let store = JobStore::new(tmp.path().join("jobs.db"));
    let id = store.submit("contended").unwrap().id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || store.claim(id).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(store.poll(id).unwrap().status, JobStatus::Processing);
}

#[test]
fn claim_next_hands_out_each_job_once() {
    let tmp = TempDir::new().unwrap();
    let store = JobStore::new(tmp.path().join("jobs.db"));
    for n in 0..6 {
        store.submit(&format!("repo-{n}")).unwrap();
    }

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                let mut claimed = Vec::new();
                while let Some(job) = store.claim_next().unwrap() {
                    claimed.push(job.id);
                }
                claimed
            })
        })
        .collect();
    let mut all: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort_unstable();
    let before = all.len();
    all.dedup();
    assert_eq!(before, 6);
    assert_eq!(all.len(), 6);
}
