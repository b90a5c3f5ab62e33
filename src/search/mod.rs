//! Search pane: substring filter over the sidebar tree and hashtag listing.
//!
//! Nothing here is indexed or persisted; results are recomputed from the
//! already-fetched tree on every keystroke.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::dto::{FolderSummary, NoteSummary, SearchResponse, TreeResponse};

/// `#` followed by ASCII word characters or dashes.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(?-u:[\w-])+").expect("tag pattern must compile"));

/// All `#tag` tokens across `bodies`, de-duplicated and sorted. Tags end at
/// the first non-ASCII character.
pub fn extract_tags<'a>(bodies: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for body in bodies {
        for tag in TAG_PATTERN.find_iter(body) {
            tags.insert(tag.as_str().to_string());
        }
    }
    tags.into_iter().collect()
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Notes whose title or body contains `query`, and folders whose name does.
/// An empty query matches nothing.
pub fn search(tree: &TreeResponse, query: &str) -> SearchResponse {
    if query.is_empty() {
        return SearchResponse::default();
    }
    let needle = query.to_lowercase();

    let folders = tree
        .folders
        .iter()
        .filter(|folder| contains_ignore_case(&folder.name, &needle))
        .map(|folder| FolderSummary {
            id: folder.id,
            name: folder.name.clone(),
        })
        .collect();

    let notes = tree
        .all_notes()
        .filter(|note| {
            contains_ignore_case(&note.title, &needle) || contains_ignore_case(&note.content, &needle)
        })
        .map(|note| NoteSummary {
            id: note.id,
            title: note.title.clone(),
        })
        .collect();

    SearchResponse { folders, notes }
}

/// Client-side state of the search pane.
#[derive(Debug, Clone, Default)]
pub struct SearchPane {
    query: String,
}

impl SearchPane {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Clicking a tag searches for it.
    pub fn select_tag(&mut self, tag: &str) {
        self.query = tag.to_string();
    }

    pub fn results(&self, tree: &TreeResponse) -> SearchResponse {
        search(tree, &self.query)
    }

    /// Tags are only offered while nothing has been typed.
    pub fn visible_tags(&self, tree: &TreeResponse) -> Vec<String> {
        if self.query.is_empty() {
            extract_tags(tree.all_notes().map(|note| note.content.as_str()))
        } else {
            Vec::new()
        }
    }
}
