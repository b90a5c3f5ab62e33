//! User-visible outcome of mutations issued from the views.

use std::collections::VecDeque;

use crate::mutation::{Applied, Mutation, MutationSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
}

/// Pending toasts, oldest first. Views drain it when they render.
#[derive(Debug, Default)]
pub struct Feedback {
    toasts: VecDeque<Toast>,
}

impl Feedback {
    pub fn push(&mut self, message: impl Into<String>) {
        self.toasts.push_back(Toast {
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }
}

/// Sends `mutation` and turns a failure into a toast.
pub async fn dispatch<S: MutationSink>(
    sink: &S,
    mutation: Mutation,
    feedback: &mut Feedback,
) -> Option<Applied> {
    let name = mutation.name();

    match sink.apply(mutation).await {
        Ok(applied) => Some(applied),
        Err(e) => {
            tracing::warn!("{} failed: {}", name, e);
            feedback.push(e.client_message());
            None
        }
    }
}
