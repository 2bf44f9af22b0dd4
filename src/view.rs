//! View model for the project gallery.
//!
//! `render` shapes the filtered catalog into plain card descriptors; the
//! terminal layer in `ui` only draws what it is given here.

use crate::catalog::{ProjectRecord, PLACEHOLDER_LINK};
use crate::filter::{filter_indices, FilterState};

pub const EMPTY_MESSAGE: &str = "No projects match your filters.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Demo,
    Source,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            LinkKind::Demo => "Live",
            LinkKind::Source => "Code",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkView {
    pub kind: LinkKind,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub emoji: String,
    pub description: String,
    pub chips: Vec<String>,
    pub links: Vec<LinkView>,
}

impl CardView {
    pub fn link(&self, kind: LinkKind) -> Option<&LinkView> {
        self.links.iter().find(|link| link.kind == kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridView {
    Cards(Vec<CardView>),
    Empty { message: &'static str },
}

impl GridView {
    pub fn cards(&self) -> &[CardView] {
        match self {
            GridView::Cards(cards) => cards,
            GridView::Empty { .. } => &[],
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards().len()
    }
}

pub fn render(catalog: &[ProjectRecord], state: &FilterState) -> GridView {
    let cards: Vec<CardView> = filter_indices(catalog, state)
        .into_iter()
        .map(|index| build_card(&catalog[index]))
        .collect();
    if cards.is_empty() {
        GridView::Empty {
            message: EMPTY_MESSAGE,
        }
    } else {
        GridView::Cards(cards)
    }
}

fn build_card(project: &ProjectRecord) -> CardView {
    let mut links = Vec::new();
    if let Some(project_links) = project.links.as_ref() {
        if let Some(url) = real_url(project_links.demo.as_deref()) {
            links.push(LinkView {
                kind: LinkKind::Demo,
                url,
            });
        }
        if let Some(url) = real_url(project_links.source.as_deref()) {
            links.push(LinkView {
                kind: LinkKind::Source,
                url,
            });
        }
    }
    CardView {
        title: project.title.clone(),
        emoji: project.emoji_or_default().to_string(),
        description: project.description.clone(),
        chips: project.tags.clone(),
        links,
    }
}

fn real_url(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if is_placeholder_link(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn is_placeholder_link(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER_LINK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{builtin_catalog, ProjectLinks, DEFAULT_EMOJI};
    use pretty_assertions::assert_eq;

    fn titles(view: &GridView) -> Vec<&str> {
        view.cards().iter().map(|card| card.title.as_str()).collect()
    }

    fn query(value: &str) -> FilterState {
        FilterState {
            search_query: value.to_string(),
            ..FilterState::default()
        }
    }

    #[test]
    fn renders_filtered_subsequence_in_catalog_order() {
        let catalog = builtin_catalog();
        let view = render(&catalog, &query("a"));
        let expected: Vec<&str> = catalog
            .iter()
            .filter(|project| crate::filter::matches(project, &query("a")))
            .map(|project| project.title.as_str())
            .collect();
        assert_eq!(titles(&view), expected);
    }

    #[test]
    fn api_query_renders_single_card() {
        let view = render(&builtin_catalog(), &query("api"));
        assert_eq!(titles(&view), vec!["Task Manager API"]);
        let card = &view.cards()[0];
        assert_eq!(card.emoji, "🧩");
        assert_eq!(card.chips, vec!["Go", "PostgreSQL", "API"]);
        assert!(card.links.is_empty());
    }

    #[test]
    fn python_tag_renders_image_classifier() {
        let mut state = FilterState::default();
        state.toggle_tag("Python");
        let view = render(&builtin_catalog(), &state);
        assert_eq!(titles(&view), vec!["Image Classifier"]);
    }

    #[test]
    fn no_match_renders_placeholder() {
        let view = render(&builtin_catalog(), &query("zzz"));
        assert_eq!(
            view,
            GridView::Empty {
                message: EMPTY_MESSAGE
            }
        );
        assert_eq!(view.card_count(), 0);
    }

    #[test]
    fn render_is_idempotent() {
        let catalog = builtin_catalog();
        let state = query("e");
        assert_eq!(render(&catalog, &state), render(&catalog, &state));
    }

    #[test]
    fn only_real_links_are_shown() {
        let project = ProjectRecord {
            title: "Linked".to_string(),
            description: "d".to_string(),
            tags: vec![],
            emoji: None,
            links: Some(ProjectLinks {
                demo: Some(" # ".to_string()),
                source: Some("https://example.com/src".to_string()),
            }),
        };
        let view = render(&[project], &FilterState::default());
        let card = &view.cards()[0];
        assert_eq!(card.emoji, DEFAULT_EMOJI);
        assert_eq!(
            card.links,
            vec![LinkView {
                kind: LinkKind::Source,
                url: "https://example.com/src".to_string(),
            }]
        );
        assert!(card.link(LinkKind::Demo).is_none());
    }
}
