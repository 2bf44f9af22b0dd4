use std::collections::BTreeSet;

use crate::catalog::ProjectRecord;

/// Current search text and selected tags. Reset on every launch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub selected_tags: BTreeSet<String>,
}

impl FilterState {
    pub fn is_identity(&self) -> bool {
        self.search_query.trim().is_empty() && self.selected_tags.is_empty()
    }

    /// Flips membership of `tag` and reports whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected_tags.remove(tag) {
            false
        } else {
            self.selected_tags.insert(tag.to_string());
            true
        }
    }
}

pub fn matches(project: &ProjectRecord, state: &FilterState) -> bool {
    matches_query(project, &state.search_query) && matches_tags(project, &state.selected_tags)
}

fn matches_query(project: &ProjectRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    contains_lowercase(&project.title, &needle)
        || contains_lowercase(&project.description, &needle)
        || project.tags.iter().any(|tag| contains_lowercase(tag, &needle))
}

fn matches_tags(project: &ProjectRecord, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || project.tags.iter().any(|tag| selected.contains(tag))
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Catalog positions that survive the filter, in catalog order.
pub fn filter_indices(catalog: &[ProjectRecord], state: &FilterState) -> Vec<usize> {
    catalog
        .iter()
        .enumerate()
        .filter_map(|(index, project)| matches(project, state).then_some(index))
        .collect()
}
