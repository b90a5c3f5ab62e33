//! File explorer: folder/note tree, sort toggle, context menu, and the
//! drag-and-drop and move-modal flows that feed the mutation layer.

pub mod dnd;
pub mod move_modal;

use std::{cmp::Ordering, collections::HashSet};

use crate::{
    dto::{FolderResponse, FolderSummary, NoteResponse, TreeResponse},
    mutation::Mutation,
};

use dnd::{DragAndDrop, DraggedNote, DropTarget};
use move_modal::{Key, ModalOutcome, MoveModal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Alphabetical comparison that ignores case first, like a locale collation.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Folder,
    Note,
}

impl ItemKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Note => "note",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub x: f32,
    pub y: f32,
    pub kind: ItemKind,
    pub id: i64,
    pub name: String,
}

/// One line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Folder {
        id: i64,
        name: String,
        expanded: bool,
        highlighted: bool,
    },
    Note {
        id: i64,
        title: String,
        nested: bool,
        /// The note is currently lifted by a drag.
        dimmed: bool,
    },
    /// Placeholder inside an expanded folder without notes.
    EmptyFolder,
    /// Shown when there are neither folders nor notes.
    NoFiles,
    RootDropZone {
        highlighted: bool,
    },
}

#[derive(Debug, Default)]
pub struct Explorer {
    expanded: HashSet<i64>,
    sort: SortOrder,
    context_menu: Option<ContextMenu>,
    drag: DragAndDrop,
    move_modal: MoveModal,
}

impl Explorer {
    pub const fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub const fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn toggle_folder(&mut self, id: i64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    fn order(&self, a: &str, b: &str) -> Ordering {
        match self.sort {
            SortOrder::Ascending => compare_names(a, b),
            SortOrder::Descending => compare_names(b, a),
        }
    }

    pub fn sorted_folders<'a>(&self, tree: &'a TreeResponse) -> Vec<&'a FolderResponse> {
        let mut folders: Vec<_> = tree.folders.iter().collect();
        folders.sort_by(|a, b| self.order(&a.name, &b.name));
        folders
    }

    pub fn sorted_notes<'a>(&self, notes: &'a [NoteResponse]) -> Vec<&'a NoteResponse> {
        let mut notes: Vec<_> = notes.iter().collect();
        notes.sort_by(|a, b| self.order(&a.title, &b.title));
        notes
    }

    /// Flattens the tree into what the sidebar draws, top to bottom.
    pub fn rows(&self, tree: &TreeResponse) -> Vec<Row> {
        let highlighted = self.drag.highlighted();
        let lifted = self.drag.overlay().map(|note| note.id);
        let note_row = |note: &NoteResponse, nested: bool| Row::Note {
            id: note.id,
            title: note.title.clone(),
            nested,
            dimmed: lifted == Some(note.id),
        };

        let mut rows = Vec::new();
        for folder in self.sorted_folders(tree) {
            let expanded = self.is_expanded(folder.id);
            rows.push(Row::Folder {
                id: folder.id,
                name: folder.name.clone(),
                expanded,
                highlighted: highlighted == Some(DropTarget::Folder(folder.id)),
            });
            if expanded {
                if folder.notes.is_empty() {
                    rows.push(Row::EmptyFolder);
                }
                rows.extend(
                    self.sorted_notes(&folder.notes)
                        .into_iter()
                        .map(|note| note_row(note, true)),
                );
            }
        }

        if tree.folders.is_empty() && tree.root_notes.is_empty() {
            rows.push(Row::NoFiles);
        }

        rows.extend(
            self.sorted_notes(&tree.root_notes)
                .into_iter()
                .map(|note| note_row(note, false)),
        );

        if self.drag.is_dragging() {
            rows.push(Row::RootDropZone {
                highlighted: highlighted == Some(DropTarget::Root),
            });
        }

        rows
    }

    pub const fn new_note() -> Mutation {
        Mutation::CreateNote { folder_id: None }
    }

    pub const fn new_folder() -> Mutation {
        Mutation::CreateFolder
    }

    // Drag and drop

    pub const fn drag(&self) -> &DragAndDrop {
        &self.drag
    }

    pub fn begin_drag(&mut self, note: &NoteResponse) {
        self.drag.start(DraggedNote {
            id: note.id,
            title: note.title.clone(),
            origin: note.folder_id,
        });
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.drag.hover(target);
    }

    pub fn end_drag(&mut self) -> Option<Mutation> {
        self.drag.release()
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // Context menu

    pub const fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn open_context_menu(&mut self, x: f32, y: f32, kind: ItemKind, id: i64, name: &str) {
        self.context_menu = Some(ContextMenu {
            x,
            y,
            kind,
            id,
            name: name.to_string(),
        });
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Applies a rename typed into the prompt. `None` means the prompt was
    /// cancelled; empty or unchanged names are ignored.
    pub fn rename(&mut self, new_name: Option<&str>) -> Option<Mutation> {
        let menu = self.context_menu.take()?;
        let new_name = new_name.filter(|name| !name.is_empty() && *name != menu.name)?;

        Some(match menu.kind {
            ItemKind::Folder => Mutation::RenameFolder {
                id: menu.id,
                name: new_name.to_string(),
            },
            ItemKind::Note => Mutation::UpdateNoteTitle {
                id: menu.id,
                title: new_name.to_string(),
            },
        })
    }

    /// Question to put in front of the user before deleting.
    pub fn delete_prompt(&self) -> Option<String> {
        self.context_menu.as_ref().map(|menu| {
            format!("Are you sure you want to delete this {}?", menu.kind.label())
        })
    }

    pub fn delete(&mut self, confirmed: bool) -> Option<Mutation> {
        let menu = self.context_menu.take()?;
        if !confirmed {
            return None;
        }

        Some(match menu.kind {
            ItemKind::Folder => Mutation::DeleteFolder { id: menu.id },
            ItemKind::Note => Mutation::DeleteNote { id: menu.id },
        })
    }

    /// "Move to..." on a note opens the picker; folders cannot be moved.
    pub fn move_to(&mut self, tree: &TreeResponse) {
        let Some(menu) = self.context_menu.take() else {
            return;
        };
        if menu.kind != ItemKind::Note {
            return;
        }

        let folders = tree
            .folders
            .iter()
            .map(|folder| FolderSummary {
                id: folder.id,
                name: folder.name.clone(),
            })
            .collect();
        self.move_modal.open(menu.id, menu.name, folders);
    }

    // Move modal

    pub const fn move_modal(&self) -> &MoveModal {
        &self.move_modal
    }

    pub fn move_modal_query(&mut self, query: &str) {
        self.move_modal.set_query(query);
    }

    pub fn move_modal_hover(&mut self, index: usize) {
        self.move_modal.hover(index);
    }

    pub fn move_modal_key(&mut self, key: Key) -> Option<Mutation> {
        match self.move_modal.key(key) {
            ModalOutcome::Committed(mutation) => Some(mutation),
            ModalOutcome::Open | ModalOutcome::Dismissed => None,
        }
    }

    pub fn move_modal_click(&mut self, index: usize) -> Option<Mutation> {
        match self.move_modal.click(index) {
            ModalOutcome::Committed(mutation) => Some(mutation),
            ModalOutcome::Open | ModalOutcome::Dismissed => None,
        }
    }

    pub fn close_move_modal(&mut self) {
        self.move_modal.close();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::feedback::{Feedback, dispatch};
    use crate::mutation::testing::RecordingSink;

    fn note(id: i64, title: &str, folder_id: Option<i64>) -> NoteResponse {
        NoteResponse {
            id,
            title: title.to_string(),
            content: String::new(),
            folder_id,
            created_at: Utc::now(),
        }
    }

    fn folder(id: i64, name: &str, notes: Vec<NoteResponse>) -> FolderResponse {
        FolderResponse {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            notes,
        }
    }

    fn tree() -> TreeResponse {
        TreeResponse {
            revision: 1,
            folders: vec![
                folder(1, "work", vec![note(10, "b-side", Some(1)), note(11, "A-side", Some(1))]),
                folder(2, "Archive", vec![]),
            ],
            root_notes: vec![note(20, "zebra", None), note(21, "apple", None)],
        }
    }

    #[test]
    fn rows_sort_ascending_by_default() {
        let mut explorer = Explorer::default();
        explorer.toggle_folder(1);

        let rows = explorer.rows(&tree());

        let labels: Vec<String> = rows
            .iter()
            .map(|row| match row {
                Row::Folder { name, .. } => name.clone(),
                Row::Note { title, .. } => title.clone(),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Archive", "work", "A-side", "b-side", "apple", "zebra"]
        );
    }

    #[test]
    fn toggling_sort_reverses_order() {
        let mut explorer = Explorer::default();
        explorer.toggle_sort();

        let tree = tree();
        let folders: Vec<&str> = explorer
            .sorted_folders(&tree)
            .iter()
            .map(|f| f.name.as_str())
            .collect();

        assert_eq!(explorer.sort_order(), SortOrder::Descending);
        assert_eq!(folders, vec!["work", "Archive"]);
    }

    #[test]
    fn expanded_empty_folder_shows_placeholder() {
        let mut explorer = Explorer::default();
        explorer.toggle_folder(2);

        let rows = explorer.rows(&tree());

        assert_eq!(rows[1], Row::EmptyFolder);
        explorer.toggle_folder(2);
        assert!(!explorer.is_expanded(2));
    }

    #[test]
    fn empty_tree_says_so() {
        let rows = Explorer::default().rows(&TreeResponse::default());

        assert_eq!(rows, vec![Row::NoFiles]);
    }

    #[test]
    fn dragging_shows_root_zone_and_dims_the_note() {
        let tree = tree();
        let mut explorer = Explorer::default();
        explorer.toggle_folder(1);

        explorer.begin_drag(&tree.folders[0].notes[0]);
        explorer.drag_over(Some(DropTarget::Root));
        let rows = explorer.rows(&tree);

        assert_eq!(rows.last(), Some(&Row::RootDropZone { highlighted: true }));
        assert!(rows.contains(&Row::Note {
            id: 10,
            title: "b-side".to_string(),
            nested: true,
            dimmed: true,
        }));
        assert_eq!(
            explorer.end_drag(),
            Some(Mutation::MoveNote {
                id: 10,
                folder_id: None
            })
        );
        assert!(!explorer.rows(&tree).iter().any(|r| matches!(r, Row::RootDropZone { .. })));
    }

    #[test]
    fn rename_ignores_unchanged_and_cancelled_prompts() {
        let mut explorer = Explorer::default();

        explorer.open_context_menu(0.0, 0.0, ItemKind::Folder, 1, "work");
        assert_eq!(explorer.rename(Some("work")), None);
        assert!(explorer.context_menu().is_none());

        explorer.open_context_menu(0.0, 0.0, ItemKind::Folder, 1, "work");
        assert_eq!(explorer.rename(None), None);

        explorer.open_context_menu(0.0, 0.0, ItemKind::Note, 20, "zebra");
        assert_eq!(
            explorer.rename(Some("Zebra facts")),
            Some(Mutation::UpdateNoteTitle {
                id: 20,
                title: "Zebra facts".to_string()
            })
        );
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut explorer = Explorer::default();

        explorer.open_context_menu(0.0, 0.0, ItemKind::Folder, 2, "Archive");
        assert_eq!(
            explorer.delete_prompt().as_deref(),
            Some("Are you sure you want to delete this folder?")
        );
        assert_eq!(explorer.delete(false), None);

        explorer.open_context_menu(0.0, 0.0, ItemKind::Folder, 2, "Archive");
        assert_eq!(explorer.delete(true), Some(Mutation::DeleteFolder { id: 2 }));
    }

    #[test]
    fn move_to_only_opens_for_notes() {
        let tree = tree();
        let mut explorer = Explorer::default();

        explorer.open_context_menu(0.0, 0.0, ItemKind::Folder, 1, "work");
        explorer.move_to(&tree);
        assert!(!explorer.move_modal().is_open());
        assert!(explorer.context_menu().is_none());

        explorer.open_context_menu(0.0, 0.0, ItemKind::Note, 21, "apple");
        explorer.move_to(&tree);
        assert!(explorer.move_modal().is_open());
        assert_eq!(explorer.move_modal().heading(), "Move \"apple\" to...");
    }

    #[tokio::test]
    async fn move_modal_selection_reaches_the_sink() {
        let tree = tree();
        let sink = RecordingSink::default();
        let mut feedback = Feedback::default();
        let mut explorer = Explorer::default();
        explorer.open_context_menu(0.0, 0.0, ItemKind::Note, 21, "apple");
        explorer.move_to(&tree);

        explorer.move_modal_query("arch");
        let mutation = explorer.move_modal_key(Key::Enter).unwrap();
        dispatch(&sink, mutation, &mut feedback).await;

        assert_eq!(
            sink.seen(),
            vec![Mutation::MoveNote {
                id: 21,
                folder_id: Some(2)
            }]
        );
        assert!(!explorer.move_modal().is_open());
        assert!(feedback.is_empty());
    }
}
