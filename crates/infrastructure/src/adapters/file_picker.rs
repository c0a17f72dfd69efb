//! Non-interactive file picker.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use courier_application::ports::FilePicker;

/// File picker answering from a queue of preset paths.
///
/// Command-line runs have no dialog; each pick takes the next preset path
/// and an empty queue counts as a cancelled dialog.
#[derive(Debug, Default)]
pub struct PresetFilePicker {
    paths: Mutex<VecDeque<String>>,
}

impl PresetFilePicker {
    /// Creates a picker that answers with `paths` in order.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: Mutex::new(paths.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl FilePicker for PresetFilePicker {
    async fn pick_file(&self, title: &str) -> Option<String> {
        let picked = self
            .paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if picked.is_none() {
            tracing::warn!(title, "no file available for picker");
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_answers_in_order_then_cancels() {
        let picker = PresetFilePicker::new(["a.txt", "b.txt"]);
        assert_eq!(picker.pick_file("Open").await.as_deref(), Some("a.txt"));
        assert_eq!(picker.pick_file("Open").await.as_deref(), Some("b.txt"));
        assert_eq!(picker.pick_file("Open").await, None);
    }
}
