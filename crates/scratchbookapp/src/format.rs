//! # Note File Format
//!
//! A stored note is a compact JSON metadata object immediately followed by the
//! note content:
//!
//! ```text
//! {"formatVersion":"1.0.0","name":"Groceries"}
//! ∞∞∞text-a
//! milk
//! ∞∞∞markdown
//! # Plans
//! ```
//!
//! The content is a sequence of **blocks**. Each block starts with the
//! separator `\n∞∞∞` followed by a language token and an optional `-a` suffix
//! (language auto-detection enabled), then a newline and the block text.
//!
//! Files without a leading metadata object are treated as legacy content with
//! empty metadata. Unknown metadata keys are preserved across a parse and
//! serialize cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub const NOTE_FORMAT_VERSION: &str = "1.0.0";
pub const BLOCK_SEPARATOR: &str = "\n∞∞∞";
const AUTO_SUFFIX: &str = "-a";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFormatMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub language: String,
    pub auto_detect: bool,
    pub text: String,
}

impl Block {
    pub fn new(language: impl Into<String>, auto_detect: bool, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            auto_detect,
            text: text.into(),
        }
    }

    fn parse(raw: &str) -> Self {
        let (header, text) = raw.split_once('\n').unwrap_or((raw, ""));
        match header.strip_suffix(AUTO_SUFFIX) {
            Some(language) => Self::new(language, true, text),
            None => Self::new(header, false, text),
        }
    }

    pub fn render(&self) -> String {
        let suffix = if self.auto_detect { AUTO_SUFFIX } else { "" };
        format!("{}{}{}\n{}", BLOCK_SEPARATOR, self.language, suffix, self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteFormat {
    pub content: String,
    pub metadata: NoteFormatMetadata,
}

impl Default for NoteFormat {
    fn default() -> Self {
        Self {
            content: Self::empty_content(),
            metadata: NoteFormatMetadata::default(),
        }
    }
}

impl NoteFormat {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: NoteFormatMetadata {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }

    /// Content of a freshly created note: one empty auto-detected text block.
    pub fn empty_content() -> String {
        Block::new("text", true, "").render()
    }

    /// Only text starting with `{` carries a metadata header. The header ends
    /// where the JSON object ends, whatever the content looks like.
    pub fn parse(data: &str) -> Result<Self> {
        if !data.starts_with('{') {
            return Ok(Self {
                content: data.to_string(),
                metadata: NoteFormatMetadata::default(),
            });
        }

        let mut stream = serde_json::Deserializer::from_str(data).into_iter::<NoteFormatMetadata>();
        let metadata = stream.next().transpose()?.unwrap_or_default();
        let header_end = stream.byte_offset();

        Ok(Self {
            content: data[header_end..].to_string(),
            metadata,
        })
    }

    pub fn serialize(&self) -> Result<String> {
        let mut metadata = self.metadata.clone();
        metadata.format_version = Some(NOTE_FORMAT_VERSION.to_string());
        let head = serde_json::to_string(&metadata)?;
        Ok(format!("{}{}", head, self.content))
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = Some(name.into());
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.content
            .split(BLOCK_SEPARATOR)
            .skip(1)
            .map(Block::parse)
            .collect()
    }

    pub fn set_blocks(&mut self, blocks: &[Block]) {
        if blocks.is_empty() {
            self.content = Self::empty_content();
        } else {
            self.content = blocks.iter().map(Block::render).collect();
        }
    }

    /// Removes and returns the last block. A note never ends up without
    /// blocks: removing the only block leaves one empty text block behind.
    pub fn take_last_block(&mut self) -> Option<Block> {
        let mut blocks = self.blocks();
        let last = blocks.pop()?;
        self.set_blocks(&blocks);
        Some(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORED: &str = "{\"formatVersion\":\"1.0.0\",\"name\":\"Groceries\"}\n∞∞∞text-a\nmilk\n∞∞∞markdown\n# Plans";

    #[test]
    fn parses_metadata_and_content() {
        let note = NoteFormat::parse(STORED).unwrap();
        assert_eq!(note.name(), Some("Groceries"));
        assert_eq!(note.metadata.format_version.as_deref(), Some("1.0.0"));
        assert!(note.content.starts_with("\n∞∞∞text-a\n"));
    }

    #[test]
    fn serialize_writes_version_before_content() {
        let note = NoteFormat::new("Todo", NoteFormat::empty_content());
        let out = note.serialize().unwrap();
        assert_eq!(out, "{\"formatVersion\":\"1.0.0\",\"name\":\"Todo\"}\n∞∞∞text-a\n");
    }

    #[test]
    fn legacy_content_without_metadata() {
        let note = NoteFormat::parse("\n∞∞∞text-a\nold note").unwrap();
        assert_eq!(note.name(), None);
        assert_eq!(note.content, "\n∞∞∞text-a\nold note");

        let plain = NoteFormat::parse("just text").unwrap();
        assert_eq!(plain.content, "just text");
        assert!(plain.blocks().is_empty());
    }

    #[test]
    fn text_before_first_block_without_brace_is_legacy() {
        let note = NoteFormat::parse("hello\n∞∞∞text\nx").unwrap();
        assert_eq!(note.name(), None);
        assert_eq!(note.content, "hello\n∞∞∞text\nx");
        assert_eq!(note.blocks(), vec![Block::new("text", false, "x")]);
    }

    #[test]
    fn metadata_survives_content_without_blocks() {
        let stored = NoteFormat::new("Chores", "sweep the floor")
            .serialize()
            .unwrap();
        assert_eq!(stored, "{\"formatVersion\":\"1.0.0\",\"name\":\"Chores\"}sweep the floor");

        let note = NoteFormat::parse(&stored).unwrap();
        assert_eq!(note.name(), Some("Chores"));
        assert_eq!(note.content, "sweep the floor");
    }

    #[test]
    fn header_ends_at_closing_brace_even_if_content_has_braces() {
        let stored = NoteFormat::new("Code", "{\"not\":\"metadata\"}\n∞∞∞json\n{}")
            .serialize()
            .unwrap();
        let note = NoteFormat::parse(&stored).unwrap();
        assert_eq!(note.name(), Some("Code"));
        assert_eq!(note.content, "{\"not\":\"metadata\"}\n∞∞∞json\n{}");
    }

    #[test]
    fn invalid_metadata_is_a_serialization_error() {
        let result = NoteFormat::parse("{not json\n∞∞∞text\nx");
        assert!(matches!(
            result,
            Err(crate::error::LibraryError::Serialization(_))
        ));
    }

    #[test]
    fn unknown_metadata_keys_survive() {
        let stored = "{\"name\":\"A\",\"cursors\":[1,2]}\n∞∞∞text\nx";
        let note = NoteFormat::parse(stored).unwrap();
        let again = NoteFormat::parse(&note.serialize().unwrap()).unwrap();
        assert_eq!(again.metadata.extra.get("cursors"), Some(&serde_json::json!([1, 2])));
    }

    #[test]
    fn splits_blocks_with_languages() {
        let note = NoteFormat::parse(STORED).unwrap();
        let blocks = note.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Block::new("text", true, "milk"));
        assert_eq!(blocks[1], Block::new("markdown", false, "# Plans"));
    }

    #[test]
    fn take_last_block_keeps_the_rest() {
        let mut note = NoteFormat::parse(STORED).unwrap();
        let taken = note.take_last_block().unwrap();
        assert_eq!(taken.text, "# Plans");
        assert_eq!(note.content, "\n∞∞∞text-a\nmilk");
    }

    #[test]
    fn take_only_block_leaves_empty_block() {
        let mut note = NoteFormat::new("A", "\n∞∞∞python\nprint(1)");
        let taken = note.take_last_block().unwrap();
        assert_eq!(taken.language, "python");
        assert_eq!(note.content, NoteFormat::empty_content());
    }
}
