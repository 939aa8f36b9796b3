//! Free-text notes.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CasebookError, Result};
use crate::types::{require_text, Note, NoteChanges};

#[derive(Debug, Clone, Default)]
pub struct Notebook {
    notes: Vec<Note>,
}

impl Notebook {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Notes in storage order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes, newest first.
    pub fn list(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes
    }

    pub fn get(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn add(&mut self, title: &str, content: &str) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            title: require_text("Title", title)?,
            content: require_text("Content", content)?,
            created_at: Utc::now(),
        };
        self.notes.push(note.clone());
        Ok(note)
    }

    pub fn edit(&mut self, id: Uuid, changes: NoteChanges) -> Result<Note> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CasebookError::NotFound(format!("note {}", id)))?;

        let title = match changes.title.as_deref() {
            Some(title) => require_text("Title", title)?,
            None => note.title.clone(),
        };
        let content = match changes.content.as_deref() {
            Some(content) => require_text("Content", content)?,
            None => note.content.clone(),
        };
        note.title = title;
        note.content = content;
        Ok(note.clone())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Note> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| CasebookError::NotFound(format!("note {}", id)))?;
        Ok(self.notes.remove(index))
    }
}
