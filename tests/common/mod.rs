//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for an unzipped ChatGPT export directory
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn export_path(&self) -> PathBuf {
        self.temp_dir.path().join("conversations.json")
    }

    /// Add an image file under `subdir` ("" for the export root)
    pub fn with_image(self, subdir: &str, name: &str, bytes: &[u8]) -> Self {
        let dir = self.temp_dir.path().join(subdir);
        fs::create_dir_all(&dir).expect("Failed to create image dir");
        fs::write(dir.join(name), bytes).expect("Failed to write image");
        self
    }

    /// Write conversations.json
    pub fn with_conversations(self, conversations: &Value) -> Self {
        let content = serde_json::to_string_pretty(conversations).expect("Failed to serialize");
        fs::write(self.export_path(), content).expect("Failed to write conversations.json");
        self
    }

    pub fn with_raw_export(self, content: &str) -> Self {
        fs::write(self.export_path(), content).expect("Failed to write conversations.json");
        self
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn text_node(role: &str, parts: &[&str]) -> Value {
    json!({
        "message": {
            "author": {"role": role},
            "create_time": 1700000000.0,
            "content": {"content_type": "text", "parts": parts},
            "metadata": {}
        }
    })
}

pub fn assistant_node(text: &str, model: &str) -> Value {
    json!({
        "message": {
            "author": {"role": "assistant"},
            "create_time": 1700000010.5,
            "content": {"content_type": "text", "parts": [text]},
            "metadata": {"model_slug": model}
        }
    })
}

pub fn multimodal_node(role: &str, parts: Value) -> Value {
    json!({
        "message": {
            "author": {"role": role},
            "create_time": 1700000020.0,
            "content": {"content_type": "multimodal_text", "parts": parts},
            "metadata": {}
        }
    })
}

pub fn image_part(pointer: &str, mime: Option<&str>) -> Value {
    match mime {
        Some(m) => json!({"content_type": "image_asset_pointer", "asset_pointer": pointer, "mime_type": m}),
        None => json!({"content_type": "image_asset_pointer", "asset_pointer": pointer}),
    }
}
