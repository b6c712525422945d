//! Structural audit of the cross-reference graphs.
//!
//! The corpus carries two undirected graphs: the **language** graph (edges
//! from `language_references`) and the **relevant** graph (edges from
//! `relevant_references`). A healthy corpus is a disjoint union of cliques
//! in each graph. The audit runs three passes and stops at the first error:
//!
//! 1. every hymn has a title and no reference points back at itself;
//! 2. the language graph is partitioned and each component validated;
//! 3. the same for the relevant graph.
//!
//! Component validation first strips any curated exception group the
//! component contains (see [`exceptions`]), then enforces per-type
//! frequency limits and forbidden type pairs.

pub mod components;
mod exceptions;

use anyhow::{Context, Result as AnyResult};
use tracing::{debug, info};

use crate::config::Config;
use crate::db;
use crate::error::{HymnalError, Result};
use crate::hymnal;
use crate::key::HymnType;
use crate::models::{Corpus, Hymn, ReferenceSet};

use exceptions::{LANGUAGE_EXCEPTIONS, RELEVANT_EXCEPTIONS};

pub use components::{partition, validate_component, Component};

/// Which reference set a pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graph {
    Language,
    Relevant,
}

impl Graph {
    pub fn label(self) -> &'static str {
        match self {
            Graph::Language => "language",
            Graph::Relevant => "relevant",
        }
    }

    pub fn references(self, hymn: &Hymn) -> &ReferenceSet {
        match self {
            Graph::Language => &hymn.language_references,
            Graph::Relevant => &hymn.relevant_references,
        }
    }

    fn exceptions(self) -> &'static [&'static [(HymnType, &'static str, &'static str)]] {
        match self {
            Graph::Language => LANGUAGE_EXCEPTIONS,
            Graph::Relevant => RELEVANT_EXCEPTIONS,
        }
    }

    /// How many members of `hymn_type` a component may hold before alternates.
    fn base_allowance(self, hymn_type: HymnType) -> usize {
        match (self, hymn_type) {
            (Graph::Language, HymnType::Chinese | HymnType::ChineseSupplement) => 2,
            _ => 1,
        }
    }

    /// Whether lettered numbers (`225b`) of `hymn_type` raise the allowance.
    fn counts_alternates(self, hymn_type: HymnType) -> bool {
        match self {
            Graph::Language => matches!(
                hymn_type,
                HymnType::ClassicHymn | HymnType::NewSong | HymnType::HowardHigashi
            ),
            Graph::Relevant => matches!(
                hymn_type,
                HymnType::ClassicHymn | HymnType::NewTune | HymnType::NewSong | HymnType::German
            ),
        }
    }
}

/// What a passing audit looked at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub hymns: usize,
    pub language_components: usize,
    pub relevant_components: usize,
}

/// Run every pass over `corpus`.
pub fn audit(corpus: &Corpus) -> Result<AuditReport> {
    audit_records(corpus)?;
    let language_components = audit_graph(corpus, Graph::Language)?;
    let relevant_components = audit_graph(corpus, Graph::Relevant)?;

    Ok(AuditReport {
        hymns: corpus.len(),
        language_components,
        relevant_components,
    })
}

/// Titles are present and neither reference set contains the hymn's own key.
pub fn audit_records(corpus: &Corpus) -> Result<()> {
    for (key, hymn) in corpus {
        if hymn.title.trim().is_empty() {
            return Err(HymnalError::EmptyTitle(key.to_string()));
        }
        for graph in [Graph::Language, Graph::Relevant] {
            if graph.references(hymn).iter().any(|r| &r.key == key) {
                return Err(HymnalError::SelfReference {
                    key: key.to_string(),
                    graph: graph.label(),
                });
            }
        }
    }
    Ok(())
}

fn audit_graph(corpus: &Corpus, graph: Graph) -> Result<usize> {
    let components = partition(corpus, graph)?;
    for component in &components {
        validate_component(component, graph)?;
    }
    debug!(
        graph = graph.label(),
        components = components.len(),
        "graph audit passed"
    );
    Ok(components.len())
}

/// `audit` command: check the primary store as it stands.
pub async fn run_audit(config: &Config) -> AnyResult<()> {
    let pool = db::connect(&config.db.hymnal, false).await?;
    let loaded = hymnal::load_corpus(&pool).await;
    pool.close().await;
    let corpus = loaded.context("Failed to load hymnal corpus")?;

    info!(hymns = corpus.len(), "auditing hymnal corpus");
    let report = audit(&corpus).context("Audit failed")?;

    println!("audit {}", config.db.hymnal.display());
    print_report(&report);
    println!("ok");
    Ok(())
}

pub(crate) fn print_report(report: &AuditReport) {
    println!("  hymns audited: {}", report.hymns);
    println!("  language components: {}", report.language_components);
    println!("  relevant components: {}", report.relevant_components);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{parse_path, HymnKey};
    use crate::merge::merge;
    use crate::models::{Reference, ENGLISH};

    fn hymn_with(language: &[&str], relevant: &[&str]) -> Hymn {
        let to_set = |paths: &[&str]| -> ReferenceSet {
            paths
                .iter()
                .map(|p| Reference::new("Link", parse_path(p).unwrap()))
                .collect()
        };
        let mut hymn = Hymn::new("Title");
        hymn.language_references = to_set(language);
        hymn.relevant_references = to_set(relevant);
        hymn
    }

    fn insert(corpus: &mut Corpus, path: &str, language: &[&str], relevant: &[&str]) {
        corpus.insert(parse_path(path).unwrap(), hymn_with(language, relevant));
    }

    fn healthy_corpus() -> Corpus {
        let mut corpus = Corpus::new();
        insert(&mut corpus, "h/43", &["ch/37", "ch/37?gb=1"], &["nt/43"]);
        insert(&mut corpus, "ch/37", &["h/43", "ch/37?gb=1"], &[]);
        insert(&mut corpus, "ch/37?gb=1", &["h/43", "ch/37"], &[]);
        insert(&mut corpus, "nt/43", &[], &["h/43"]);
        insert(&mut corpus, "h/1", &[], &[]);
        corpus
    }

    #[test]
    fn test_healthy_corpus_passes() {
        let report = audit(&healthy_corpus()).unwrap();
        assert_eq!(
            report,
            AuditReport {
                hymns: 5,
                language_components: 1,
                relevant_components: 1,
            }
        );
    }

    #[test]
    fn test_self_reference_fails() {
        let mut corpus = healthy_corpus();
        insert(&mut corpus, "h/2", &[], &["h/2"]);
        match audit(&corpus) {
            Err(HymnalError::SelfReference { key, graph }) => {
                assert_eq!(key, "h/2");
                assert_eq!(graph, "relevant");
            }
            other => panic!("expected SelfReference, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_title_fails() {
        let mut corpus = healthy_corpus();
        corpus.insert(HymnKey::new(HymnType::ClassicHymn, "5", None), Hymn::new(""));
        assert!(matches!(audit(&corpus), Err(HymnalError::EmptyTitle(_))));
    }

    #[test]
    fn test_singleton_component_is_dangling() {
        let mut corpus = healthy_corpus();
        // A two-key component whose target is not stored is still well formed.
        insert(&mut corpus, "h/7", &["ch/7"], &[]);
        assert!(audit(&corpus).is_ok());

        // A component that only names its own key is not.
        let mut lone = Corpus::new();
        insert(&mut lone, "h/8", &["h/8"], &[]);
        let components = partition(&lone, Graph::Language).unwrap();
        assert_eq!(components[0].len(), 1);
        assert!(matches!(
            validate_component(&components[0], Graph::Language),
            Err(HymnalError::DanglingComponent { .. })
        ));
    }

    #[test]
    fn test_relevant_incompatibility_fails() {
        let mut corpus = healthy_corpus();
        insert(&mut corpus, "h/10", &[], &["ns/10"]);
        insert(&mut corpus, "ns/10", &[], &["h/10"]);
        assert!(matches!(
            audit(&corpus),
            Err(HymnalError::TypeIncompatibility {
                graph: "relevant",
                ..
            })
        ));
    }

    #[test]
    fn test_merged_corpus_passes_audit() {
        let mut primary = healthy_corpus();
        insert(&mut primary, "h/100", &[], &[]);
        let mut russian = Corpus::new();
        let mut r = Hymn::new("Русский");
        r.language_references
            .insert(Reference::new(ENGLISH, parse_path("h/43").unwrap()));
        russian.insert(parse_path("R/1").unwrap(), r);

        let combined = merge(primary, &russian);
        let report = audit(&combined).unwrap();
        assert_eq!(report.hymns, 7);
        assert_eq!(report.language_components, 1);
    }
}
