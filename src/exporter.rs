//! Open WebUI chat import format.

use eyre::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::io::Write;

/// One chat as Open WebUI's "Import Chats" expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chat {
    pub title: String,
    /// Every model seen in the conversation, `["unknown"]` when none.
    pub models: Vec<String>,
    pub create_time: Option<Value>,
    pub update_time: Option<Value>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    pub files: Vec<ChatFile>,
    pub timestamp: Option<Value>,
    /// Only set on assistant messages. Open WebUI reads both keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "modelName", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatFile {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub name: String,
    /// `data:<mime>;base64,...`
    pub url: String,
}

/// Write `chats` as a JSON array indented by four spaces. Non-ASCII text is
/// written as-is.
pub fn write_chats<W: Write>(writer: &mut W, chats: &[Chat]) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut *writer, formatter);
    chats
        .serialize(&mut ser)
        .wrap_err("Failed to serialize chats")?;
    writeln!(writer).wrap_err("Failed to write output")?;
    Ok(())
}
