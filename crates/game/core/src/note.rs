//! Player deathnotes.

use crate::config::GameConfig;
use crate::error::{ErrorKind, ErrorSeverity, GameError};

/// Free-text note revealed when its owner dies.
///
/// The note is editable only while its owner is alive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deathnote {
    content: String,
    changeable: bool,
}

impl Deathnote {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            changeable: true,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_changeable(&self) -> bool {
        self.changeable
    }

    pub fn set_changeable(&mut self, changeable: bool) {
        self.changeable = changeable;
    }

    /// Replaces the content. Length is measured in characters.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), NoteError> {
        if !self.changeable {
            return Err(NoteError::ModificationNotAllowed);
        }

        let content = content.into();
        let length = content.chars().count();
        if length > GameConfig::DEATHNOTE_MAX_LENGTH {
            return Err(NoteError::ContentTooLong {
                length,
                max: GameConfig::DEATHNOTE_MAX_LENGTH,
            });
        }

        self.content = content;
        Ok(())
    }
}

impl Default for Deathnote {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteError {
    #[error("this deathnote can no longer be changed")]
    ModificationNotAllowed,

    #[error("deathnote content is {length} characters, maximum is {max}")]
    ContentTooLong { length: usize, max: usize },
}

impl GameError for NoteError {
    fn kind(&self) -> ErrorKind {
        match self {
            NoteError::ModificationNotAllowed => ErrorKind::State,
            NoteError::ContentTooLong { .. } => ErrorKind::Validation,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            NoteError::ModificationNotAllowed => "NOTE_MODIFICATION_NOT_ALLOWED",
            NoteError::ContentTooLong { .. } => "NOTE_CONTENT_TOO_LONG",
        }
    }
}
