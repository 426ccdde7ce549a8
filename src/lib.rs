//! # chatgpt-openwebui
//!
//! A CLI tool that converts a ChatGPT data export into a file that
//! [Open WebUI](https://openwebui.com) can import through *Settings → Chats → Import Chats*.
//!
//! ## What it does
//!
//! ChatGPT's "Export data" archive contains `conversations.json`, where every
//! conversation is a tree of message nodes, plus the uploaded and generated
//! images as loose `file-<ID>…` files. This tool flattens each conversation
//! into Open WebUI's message list, keeps the model names recorded for each
//! reply, and inlines every image it can find as a base64 `data:` URL.
//!
//! Messages are emitted in the order their nodes appear in the export; the
//! tree is not re-walked, so regenerated answers appear next to each other.
//!
//! Images that cannot be found or read are skipped with a warning. Only a
//! failure to read the export or to write the output aborts the run, and in
//! that case no output file is left behind.
//!
//! ## Usage
//!
//! ```sh
//! # Unzipped export in ./chatgpt-export, writes ./converted_openwebui.json
//! chatgpt-openwebui
//!
//! # Explicit paths and an extra image folder
//! chatgpt-openwebui ~/Downloads/export/conversations.json -o chats.json --images ~/Downloads/more
//! ```
//!
//! Defaults can be persisted in `~/.config/chatgpt-openwebui/config.toml`.
pub mod converter;
pub mod exporter;
pub mod images;
pub mod importer;
pub mod sequential;
pub mod utils;

pub use converter::{Conversion, Diagnostics, Warning, convert_export};
pub use images::ImageIndex;
pub use sequential::{RunSummary, execute};
pub use utils::ImportConfig;
