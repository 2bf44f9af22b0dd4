use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::catalog::ProjectRecord;
use crate::filter::FilterState;

/// Sorted, deduplicated union of every tag in the catalog.
pub fn collect_tags(catalog: &[ProjectRecord]) -> Vec<String> {
    let unique: BTreeSet<&str> = catalog
        .iter()
        .flat_map(|project| project.tags.iter().map(String::as_str))
        .collect();
    let mut tags: Vec<String> = unique.into_iter().map(str::to_string).collect();
    tags.sort_by(|left, right| compare_tags(left, right));
    tags
}

fn compare_tags(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagControl {
    pub tag: String,
    pub pressed: bool,
}

impl TagControl {
    pub fn aria_pressed(&self) -> &'static str {
        if self.pressed {
            "true"
        } else {
            "false"
        }
    }
}

/// One toggle control per catalog tag, plus the keyboard cursor over them.
#[derive(Clone, Debug, Default)]
pub struct TagFilters {
    controls: Vec<TagControl>,
    cursor: usize,
}

impl TagFilters {
    pub fn build(catalog: &[ProjectRecord]) -> Self {
        let controls = collect_tags(catalog)
            .into_iter()
            .map(|tag| TagControl {
                tag,
                pressed: false,
            })
            .collect();
        Self {
            controls,
            cursor: 0,
        }
    }

    pub fn controls(&self) -> &[TagControl] {
        &self.controls
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.controls.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.controls.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Flips the control at `index` and mirrors it into `state`.
    /// Returns `None` when no such control exists.
    pub fn toggle(&mut self, index: usize, state: &mut FilterState) -> Option<bool> {
        let control = self.controls.get_mut(index)?;
        control.pressed = state.toggle_tag(&control.tag);
        Some(control.pressed)
    }
}
