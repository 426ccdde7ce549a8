//! ChatGPT conversation → Open WebUI chat conversion.
//!
//! Messages are emitted in the order their nodes appear in the export's
//! `mapping` object. The parent/child links of the original tree are not
//! followed, so edited or regenerated branches show up side by side.

use crate::exporter::{Chat, ChatFile, ChatMessage, FileKind};
use crate::images::{ImageIndex, encode_data_url};
use crate::importer::{AttachmentRef, Content, Conversation, Message, Part};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

pub const UNTITLED: &str = "Untitled Chat";
pub const UNKNOWN_MODEL: &str = "unknown";

/// A problem that cost an attachment but did not stop the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The image was found but could not be read.
    EncodeFailed { path: PathBuf, cause: String },
    /// No scanned image matches the attachment's pointer.
    UnresolvedAttachment { name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EncodeFailed { path, cause } => {
                write!(f, "could not encode {}: {}", path.display(), cause)
            }
            Warning::UnresolvedAttachment { name } => {
                write!(f, "could not find an image for {}", name)
            }
        }
    }
}

/// Warnings collected over a run.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of converting a whole export.
#[derive(Debug, Default)]
pub struct Conversion {
    pub chats: Vec<Chat>,
    pub diagnostics: Diagnostics,
}

/// Convert every conversation, preserving input order.
pub fn convert_export(conversations: &[Conversation], images: &ImageIndex) -> Conversion {
    let mut diagnostics = Diagnostics::default();
    let chats = conversations
        .iter()
        .map(|conv| convert_conversation(conv, images, &mut diagnostics))
        .collect();
    Conversion { chats, diagnostics }
}

pub fn convert_conversation(
    conv: &Conversation,
    images: &ImageIndex,
    diagnostics: &mut Diagnostics,
) -> Chat {
    let title = conv.title.as_deref().unwrap_or(UNTITLED);
    let _span = tracing::debug_span!("conversation", title).entered();

    let mut messages = Vec::new();
    let mut models = BTreeSet::new();

    for (node_id, node) in &conv.mapping {
        let Some(msg) = &node.message else {
            continue;
        };

        let model = msg.model_slug();
        if let Some(slug) = model {
            models.insert(slug.to_string());
        }

        match convert_message(msg, images, diagnostics) {
            Some(out) => messages.push(out),
            None => tracing::trace!(node = %node_id, "dropping empty message"),
        }
    }

    let models = if models.is_empty() {
        vec![UNKNOWN_MODEL.to_string()]
    } else {
        models.into_iter().collect()
    };

    Chat {
        title: title.to_string(),
        models,
        create_time: conv.create_time.clone(),
        update_time: conv.update_time.clone(),
        messages,
    }
}

/// Build the output message, or `None` when it has neither text nor files.
pub fn convert_message(
    msg: &Message,
    images: &ImageIndex,
    diagnostics: &mut Diagnostics,
) -> Option<ChatMessage> {
    let (content, files) = match &msg.content {
        Some(content) => render_content(content, images, diagnostics),
        None => (String::new(), Vec::new()),
    };

    if content.is_empty() && files.is_empty() {
        return None;
    }

    let role = msg.role();
    let model = msg
        .model_slug()
        .filter(|_| role == "assistant")
        .map(str::to_string);

    Some(ChatMessage {
        role: role.to_string(),
        content,
        files,
        timestamp: msg.create_time.clone(),
        model_name: model.clone(),
        model,
    })
}

fn render_content(
    content: &Content,
    images: &ImageIndex,
    diagnostics: &mut Diagnostics,
) -> (String, Vec<ChatFile>) {
    let Some(parts) = &content.parts else {
        return (String::new(), Vec::new());
    };

    match content.content_type.as_deref() {
        Some("text") => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect();
            (texts.join(" ").trim().to_string(), Vec::new())
        }
        Some("multimodal_text") => {
            let mut text = String::new();
            let mut files = Vec::new();
            for part in parts {
                match part {
                    Part::Text(t) => {
                        text.push(' ');
                        text.push_str(t);
                    }
                    Part::Attachment(att) => {
                        if let Some(file) = embed_attachment(att, images, diagnostics) {
                            files.push(file);
                        }
                    }
                    Part::Other => {}
                }
            }
            (text.trim().to_string(), files)
        }
        _ => (String::new(), Vec::new()),
    }
}

fn embed_attachment(
    att: &AttachmentRef,
    images: &ImageIndex,
    diagnostics: &mut Diagnostics,
) -> Option<ChatFile> {
    let name = att.basename();
    let Some(path) = images.resolve(&att.asset_pointer) else {
        diagnostics.warn(Warning::UnresolvedAttachment {
            name: name.to_string(),
        });
        return None;
    };

    match encode_data_url(path, att.mime_type.as_deref()) {
        Ok(url) => Some(ChatFile {
            kind: FileKind::Image,
            name: name.to_string(),
            url,
        }),
        Err(e) => {
            diagnostics.warn(Warning::EncodeFailed {
                path: path.to_path_buf(),
                cause: format!("{:#}", e),
            });
            None
        }
    }
}
