//! Modal dialog state.
//!
//! The UI shows at most one modal flow at a time. Holding the state as a
//! single `Option<Dialog>` makes that exclusivity a property of the type:
//! opening a dialog replaces whatever was open before.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CreateNoteMode {
    /// Start with an empty note.
    #[default]
    New,
    /// Move the editor's active block into the new note.
    CurrentBlock,
}

impl std::str::FromStr for CreateNoteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "currentBlock" | "current-block" => Ok(Self::CurrentBlock),
            other => Err(format!("Unknown create mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateNoteParams {
    pub mode: CreateNoteMode,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Dialog {
    NoteSelector,
    LanguageSelector,
    CreateNote(CreateNoteParams),
    EditNote,
}

impl Dialog {
    pub fn create_note(mode: Option<CreateNoteMode>, name_suggestion: Option<&str>) -> Self {
        Dialog::CreateNote(CreateNoteParams {
            mode: mode.unwrap_or_default(),
            name: name_suggestion.unwrap_or_default().to_string(),
        })
    }

    pub fn is_note_selector(&self) -> bool {
        matches!(self, Dialog::NoteSelector)
    }

    pub fn is_language_selector(&self) -> bool {
        matches!(self, Dialog::LanguageSelector)
    }

    pub fn is_create_note(&self) -> bool {
        matches!(self, Dialog::CreateNote(_))
    }

    pub fn is_edit_note(&self) -> bool {
        matches!(self, Dialog::EditNote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_note_defaults() {
        let dialog = Dialog::create_note(None, None);
        assert_eq!(
            dialog,
            Dialog::CreateNote(CreateNoteParams {
                mode: CreateNoteMode::New,
                name: String::new(),
            })
        );
        assert!(dialog.is_create_note());
        assert!(!dialog.is_note_selector());
        assert!(!dialog.is_language_selector());
        assert!(!dialog.is_edit_note());
    }

    #[test]
    fn create_note_keeps_suggestion() {
        let dialog = Dialog::create_note(Some(CreateNoteMode::CurrentBlock), Some("Ideas"));
        match dialog {
            Dialog::CreateNote(params) => {
                assert_eq!(params.mode, CreateNoteMode::CurrentBlock);
                assert_eq!(params.name, "Ideas");
            }
            other => panic!("Expected CreateNote, got {:?}", other),
        }
    }

    #[test]
    fn mode_parses_both_spellings() {
        assert_eq!("new".parse::<CreateNoteMode>().unwrap(), CreateNoteMode::New);
        assert_eq!(
            "currentBlock".parse::<CreateNoteMode>().unwrap(),
            CreateNoteMode::CurrentBlock
        );
        assert_eq!(
            "current-block".parse::<CreateNoteMode>().unwrap(),
            CreateNoteMode::CurrentBlock
        );
        assert!("other".parse::<CreateNoteMode>().is_err());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Dialog::create_note(None, Some("x"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "createNote", "mode": "new", "name": "x"})
        );
        let json = serde_json::to_value(Dialog::EditNote).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "editNote"}));
    }
}
