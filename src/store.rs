//! Editor state container: passage markup, question markup and a preview flag.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Plain snapshot of the editor state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub passage_html: String,
    pub questions_html: String,
    pub preview_mode: bool,
}

/// Which field a setter touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorChange {
    Passage,
    Questions,
    PreviewMode(bool),
}

/// Handle returned by [`EditorStore::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangeHandler = Arc<dyn Fn(&EditorChange, &EditorState) + Send + Sync>;

/// Owns the editor state and notifies listeners after every setter call.
///
/// Listeners run synchronously, in registration order, after the state was
/// updated, and are notified even when the assigned value equals the old one.
#[derive(Default)]
pub struct EditorStore {
    state: EditorState,
    listeners: Vec<(ListenerId, ChangeHandler)>,
    next_id: u64,
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passage_html(&self) -> &str {
        &self.state.passage_html
    }

    pub fn questions_html(&self) -> &str {
        &self.state.questions_html
    }

    pub fn preview_mode(&self) -> bool {
        self.state.preview_mode
    }

    pub fn state(&self) -> EditorState {
        self.state.clone()
    }

    pub fn set_passage(&mut self, html: impl Into<String>) {
        self.state.passage_html = html.into();
        self.notify(EditorChange::Passage);
    }

    pub fn set_questions(&mut self, html: impl Into<String>) {
        self.state.questions_html = html.into();
        self.notify(EditorChange::Questions);
    }

    /// `None` flips preview mode, `Some(v)` sets it
    pub fn toggle_preview(&mut self, value: Option<bool>) {
        self.state.preview_mode = value.unwrap_or(!self.state.preview_mode);
        self.notify(EditorChange::PreviewMode(self.state.preview_mode));
    }

    /// Register a change listener
    pub fn on_change<F>(&mut self, cb: F) -> ListenerId
    where
        F: Fn(&EditorChange, &EditorState) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Arc::new(cb)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&self, change: EditorChange) {
        for (_, cb) in &self.listeners {
            cb(&change, &self.state);
        }
    }
}
