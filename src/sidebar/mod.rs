//! Sidebar controller: which pane is showing and whether the mobile overlay
//! is up. All of this is ephemeral view state.

use crate::{
    explorer::Explorer,
    mutation::{Applied, Mutation},
    search::SearchPane,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Explorer,
    Search,
    Favorites,
}

#[derive(Debug, Default)]
pub struct Sidebar {
    view: View,
    mobile_overlay_open: bool,
    pub explorer: Explorer,
    pub search: SearchPane,
}

impl Sidebar {
    pub const fn view(&self) -> View {
        self.view
    }

    /// Switches panes; on mobile this also dismisses the overlay.
    pub const fn select_view(&mut self, view: View) {
        self.view = view;
        self.mobile_overlay_open = false;
    }

    pub const fn is_mobile_overlay_open(&self) -> bool {
        self.mobile_overlay_open
    }

    pub const fn open_mobile_overlay(&mut self) {
        self.mobile_overlay_open = true;
    }

    pub const fn close_mobile_overlay(&mut self) {
        self.mobile_overlay_open = false;
    }

    pub const fn toggle_mobile_overlay(&mut self) {
        self.mobile_overlay_open = !self.mobile_overlay_open;
    }

    /// Following a note link closes the overlay so the editor is visible.
    pub fn navigate_to_note(&mut self, note_id: i64) -> String {
        self.mobile_overlay_open = false;
        format!("/notes/{note_id}")
    }

    /// Route to follow once `mutation` has landed. A freshly created note
    /// opens in the editor; nothing else navigates.
    pub fn after_mutation(&mut self, mutation: &Mutation, applied: Applied) -> Option<String> {
        match (mutation, applied) {
            (Mutation::CreateNote { .. }, Applied::Created(id)) => Some(self.navigate_to_note(id)),
            _ => None,
        }
    }
}
