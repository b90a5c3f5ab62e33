use std::{future::Future, time::Duration};

use tokio::sync::mpsc;

/// Runs `action` with the latest value once `delay` has passed without a
/// newer one. Each debouncer owns its own timer.
///
/// Dropping the debouncer discards a value that has not fired yet; an action
/// that is already running is left to finish.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, mut action: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    match tokio::time::timeout(delay, rx.recv()).await {
                        Ok(Some(newer)) => latest = newer,
                        Ok(None) => return,
                        Err(_) => {
                            action(latest).await;
                            break;
                        }
                    }
                }
            }
        });

        Self { tx }
    }

    /// Restarts the quiet period with `value` as the pending one.
    pub fn call(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::warn!("Debounce worker is gone, dropping update");
        }
    }
}
