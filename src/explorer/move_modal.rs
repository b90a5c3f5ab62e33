//! "Move to folder" picker: a filterable, keyboard-driven list of targets.

use crate::{dto::FolderSummary, mutation::Mutation};

pub const ROOT_OPTION_NAME: &str = "Root ( / )";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOption {
    /// `None` is the synthetic root target.
    pub folder_id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    /// The modal stays open.
    Open,
    /// Closed without a selection.
    Dismissed,
    /// Closed after choosing a target.
    Committed(Mutation),
}

/// Root first, then `folders` in their given order, keeping only names that
/// contain `query` case-insensitively.
pub fn filter_options(folders: &[FolderSummary], query: &str) -> Vec<MoveOption> {
    let needle = query.to_lowercase();

    std::iter::once(MoveOption {
        folder_id: None,
        name: ROOT_OPTION_NAME.to_string(),
    })
    .chain(folders.iter().map(|folder| MoveOption {
        folder_id: Some(folder.id),
        name: folder.name.clone(),
    }))
    .filter(|option| option.name.to_lowercase().contains(&needle))
    .collect()
}

#[derive(Debug, Default)]
pub struct MoveModal {
    note: Option<(i64, String)>,
    folders: Vec<FolderSummary>,
    query: String,
    selected: usize,
}

impl MoveModal {
    /// Opens the picker for one note with a fresh query and selection.
    pub fn open(&mut self, note_id: i64, note_title: impl Into<String>, folders: Vec<FolderSummary>) {
        self.note = Some((note_id, note_title.into()));
        self.folders = folders;
        self.query.clear();
        self.selected = 0;
    }

    pub const fn is_open(&self) -> bool {
        self.note.is_some()
    }

    pub fn heading(&self) -> String {
        match &self.note {
            Some((_, title)) if !title.is_empty() => format!("Move \"{title}\" to..."),
            _ => "Move File to...".to_string(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
    }

    pub fn options(&self) -> Vec<MoveOption> {
        filter_options(&self.folders, &self.query)
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.options().len() {
            self.selected = index;
        }
    }

    pub fn click(&mut self, index: usize) -> ModalOutcome {
        self.commit(index)
    }

    pub fn key(&mut self, key: Key) -> ModalOutcome {
        if !self.is_open() {
            return ModalOutcome::Dismissed;
        }

        let len = self.options().len();
        match key {
            Key::Down if len > 0 => {
                self.selected = (self.selected + 1) % len;
                ModalOutcome::Open
            }
            Key::Up if len > 0 => {
                self.selected = (self.selected + len - 1) % len;
                ModalOutcome::Open
            }
            Key::Up | Key::Down => ModalOutcome::Open,
            Key::Enter => self.commit(self.selected),
            Key::Escape => {
                self.close();
                ModalOutcome::Dismissed
            }
        }
    }

    pub fn close(&mut self) {
        self.note = None;
    }

    fn commit(&mut self, index: usize) -> ModalOutcome {
        let Some((note_id, _)) = &self.note else {
            return ModalOutcome::Dismissed;
        };
        let Some(option) = self.options().into_iter().nth(index) else {
            return ModalOutcome::Open;
        };

        let mutation = Mutation::MoveNote {
            id: *note_id,
            folder_id: option.folder_id,
        };
        self.close();
        ModalOutcome::Committed(mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folders() -> Vec<FolderSummary> {
        ["Work", "Personal", "Woodshop"]
            .into_iter()
            .zip(1..)
            .map(|(name, id)| FolderSummary {
                id,
                name: name.to_string(),
            })
            .collect()
    }

    fn names(options: &[MoveOption]) -> Vec<&str> {
        options.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn filter_keeps_relative_order_and_skips_unmatched_root() {
        let options = filter_options(&folders(), "wo");

        assert_eq!(names(&options), vec!["Work", "Woodshop"]);
    }

    #[test]
    fn empty_query_lists_root_first() {
        let options = filter_options(&folders(), "");

        assert_eq!(names(&options), vec![ROOT_OPTION_NAME, "Work", "Personal", "Woodshop"]);
        assert_eq!(options[0].folder_id, None);
    }

    #[test]
    fn root_matches_its_own_name() {
        let options = filter_options(&folders(), "ROOT");

        assert_eq!(names(&options), vec![ROOT_OPTION_NAME]);
    }

    #[test]
    fn arrows_wrap_around() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());

        assert_eq!(modal.key(Key::Up), ModalOutcome::Open);
        assert_eq!(modal.selected(), 3);
        modal.key(Key::Down);
        assert_eq!(modal.selected(), 0);
        modal.key(Key::Down);
        assert_eq!(modal.selected(), 1);
    }

    #[test]
    fn typing_resets_selection() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());
        modal.key(Key::Down);
        modal.key(Key::Down);

        modal.set_query("wo");

        assert_eq!(modal.selected(), 0);
    }

    #[test]
    fn enter_commits_highlighted_option() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());
        modal.set_query("wo");
        modal.key(Key::Down);

        let outcome = modal.key(Key::Enter);

        assert_eq!(
            outcome,
            ModalOutcome::Committed(Mutation::MoveNote {
                id: 9,
                folder_id: Some(3)
            })
        );
        assert!(!modal.is_open());
    }

    #[test]
    fn hover_moves_the_highlight_enter_commits_it() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());

        modal.hover(2);

        assert_eq!(modal.selected(), 2);
        assert_eq!(
            modal.key(Key::Enter),
            ModalOutcome::Committed(Mutation::MoveNote {
                id: 9,
                folder_id: Some(2)
            })
        );
    }

    #[test]
    fn hover_past_the_list_is_ignored() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());
        modal.hover(1);

        modal.hover(4);

        assert_eq!(modal.selected(), 1);
        assert_eq!(
            modal.key(Key::Enter),
            ModalOutcome::Committed(Mutation::MoveNote {
                id: 9,
                folder_id: Some(1)
            })
        );
    }

    #[test]
    fn escape_closes_without_commit() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());

        assert_eq!(modal.key(Key::Escape), ModalOutcome::Dismissed);
        assert!(!modal.is_open());
    }

    #[test]
    fn enter_on_empty_list_keeps_modal_open() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());
        modal.set_query("zzz");

        assert!(modal.options().is_empty());
        assert_eq!(modal.key(Key::Down), ModalOutcome::Open);
        assert_eq!(modal.key(Key::Enter), ModalOutcome::Open);
        assert!(modal.is_open());
    }

    #[test]
    fn reopening_clears_previous_query() {
        let mut modal = MoveModal::default();
        modal.open(9, "Plan", folders());
        modal.set_query("wo");
        modal.close();

        modal.open(10, "", folders());

        assert_eq!(modal.query(), "");
        assert_eq!(modal.heading(), "Move File to...");
        assert_eq!(modal.click(0), ModalOutcome::Committed(Mutation::MoveNote {
            id: 10,
            folder_id: None
        }));
    }
}
