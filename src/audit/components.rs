//! Component partitioning and per-component typing rules.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::exceptions::group_keys;
use super::Graph;
use crate::error::{HymnalError, Result};
use crate::key::{HymnKey, HymnType};
use crate::models::Corpus;

/// A group of keys that reference one another in one graph.
pub type Component = IndexSet<HymnKey>;

/// Numbers such as `225b`, `c333`, or `ns92f` mark a legitimate alternate of
/// the same hymn and raise that type's allowance by one.
static ALTERNATE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\D+\d+\D*|\D*\d+\D+)$").expect("alternate number pattern compiles")
});

const INCOMPATIBLE: [(HymnType, HymnType); 4] = [
    (HymnType::ClassicHymn, HymnType::NewSong),
    (HymnType::ClassicHymn, HymnType::ChildrenSong),
    (HymnType::ChildrenSong, HymnType::NewSong),
    (HymnType::Chinese, HymnType::ChineseSupplement),
];

/// Render a component as `[h/1, ch/1?gb=1]` for error messages.
pub fn format_keys<'a>(keys: impl IntoIterator<Item = &'a HymnKey>) -> String {
    let parts: Vec<String> = keys.into_iter().map(|k| k.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Group every referencing hymn into components, in corpus order.
///
/// A hymn whose targets touch no existing component starts a new one that
/// includes the hymn itself. A hymn whose targets touch exactly one component
/// adds only its targets to it (its own key is not added). Touching two or
/// more components means the graph is not a disjoint union of cliques.
pub fn partition(corpus: &Corpus, graph: Graph) -> Result<Vec<Component>> {
    let mut components: Vec<Component> = Vec::new();

    for (key, hymn) in corpus {
        let targets: Component = graph
            .references(hymn)
            .iter()
            .map(|r| r.key.clone())
            .collect();
        if targets.is_empty() {
            continue;
        }

        let hits: Vec<usize> = components
            .iter()
            .enumerate()
            .filter(|(_, component)| !component.is_disjoint(&targets))
            .map(|(i, _)| i)
            .collect();

        match hits.as_slice() {
            [] => {
                let mut component = targets;
                component.insert(key.clone());
                components.push(component);
            }
            [only] => components[*only].extend(targets),
            _ => {
                return Err(HymnalError::AmbiguousComponent {
                    graph: graph.label(),
                    keys: format_keys(&targets),
                })
            }
        }
    }

    Ok(components)
}

/// Check one component against the graph's exception groups and typing rules.
pub fn validate_component(component: &Component, graph: Graph) -> Result<()> {
    let mut remaining = component.clone();

    loop {
        if remaining.len() == 1 {
            return Err(HymnalError::DanglingComponent {
                graph: graph.label(),
                component: format_keys(&remaining),
            });
        }

        let exception = graph
            .exceptions()
            .iter()
            .map(|group| group_keys(*group))
            .find(|keys| keys.iter().all(|k| remaining.contains(k)));

        match exception {
            Some(keys) => {
                debug!(
                    graph = graph.label(),
                    exception = %format_keys(&keys),
                    "removing exception group"
                );
                for key in &keys {
                    remaining.shift_remove(key);
                }
            }
            None => break,
        }
    }

    check_frequencies(&remaining, graph)?;
    check_compatibility(&remaining, graph)
}

fn check_frequencies(component: &Component, graph: Graph) -> Result<()> {
    for hymn_type in HymnType::ALL {
        let of_type = || component.iter().filter(move |k| k.hymn_type == hymn_type);

        let mut allowed = graph.base_allowance(hymn_type);
        if graph.counts_alternates(hymn_type) {
            allowed += of_type()
                .filter(|k| ALTERNATE_NUMBER.is_match(&k.number))
                .count();
        }

        let actual = of_type().count();
        if actual > allowed {
            return Err(HymnalError::TypeFrequencyViolation {
                component: format_keys(component),
                hymn_type: hymn_type.to_string(),
                actual,
                allowed,
            });
        }
    }
    Ok(())
}

fn check_compatibility(component: &Component, graph: Graph) -> Result<()> {
    let present: IndexSet<HymnType> = component.iter().map(|k| k.hymn_type).collect();
    for (first, second) in INCOMPATIBLE {
        if present.contains(&first) && present.contains(&second) {
            return Err(HymnalError::TypeIncompatibility {
                graph: graph.label(),
                component: format_keys(component),
                first: first.to_string(),
                second: second.to_string(),
            });
        }
    }
    Ok(())
}
