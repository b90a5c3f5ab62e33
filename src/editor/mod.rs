//! Note editor: title and body bound to debounced saves.

mod debounce;

pub use debounce::Debouncer;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    feedback::Feedback,
    mutation::{Mutation, MutationSink},
};

pub const TITLE_SAVE_DELAY: Duration = Duration::from_millis(500);
pub const CONTENT_SAVE_DELAY: Duration = Duration::from_millis(1000);

fn saver<S, M>(
    sink: S,
    feedback: Arc<Mutex<Feedback>>,
    delay: Duration,
    to_mutation: M,
) -> Debouncer<String>
where
    S: MutationSink + Clone + Send + Sync + 'static,
    M: Fn(String) -> Mutation + Send + 'static,
{
    Debouncer::new(delay, move |value| {
        let sink = sink.clone();
        let feedback = feedback.clone();
        let mutation = to_mutation(value);
        async move {
            let name = mutation.name();
            if let Err(e) = sink.apply(mutation).await {
                tracing::warn!("{} failed: {}", name, e);
                if let Ok(mut feedback) = feedback.lock() {
                    feedback.push(e.client_message());
                }
            }
        }
    })
}

/// Editing session for one note. Title and body each have their own timer;
/// dropping the editor discards saves that have not fired yet.
pub struct NoteEditor {
    note_id: i64,
    title: String,
    content: String,
    title_saves: Debouncer<String>,
    content_saves: Debouncer<String>,
}

impl NoteEditor {
    pub fn open<S>(
        sink: S,
        feedback: Arc<Mutex<Feedback>>,
        note_id: i64,
        initial_title: &str,
        initial_content: &str,
    ) -> Self
    where
        S: MutationSink + Clone + Send + Sync + 'static,
    {
        let title_saves = saver(
            sink.clone(),
            feedback.clone(),
            TITLE_SAVE_DELAY,
            move |title| Mutation::UpdateNoteTitle { id: note_id, title },
        );
        let content_saves = saver(sink, feedback, CONTENT_SAVE_DELAY, move |content| {
            Mutation::UpdateNoteContent {
                id: note_id,
                content,
            }
        });

        Self {
            note_id,
            title: initial_title.to_string(),
            content: initial_content.to_string(),
            title_saves,
            content_saves,
        }
    }

    pub const fn note_id(&self) -> i64 {
        self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.title_saves.call(self.title.clone());
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.content_saves.call(self.content.clone());
    }
}
