use crate::converter::{self, Warning};
use crate::images::ImageIndex;
use crate::utils::{self, ImportConfig};
use eyre::Result;

/// Counts reported once a run completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub conversations: usize,
    pub messages: usize,
    pub images_indexed: usize,
    pub images_embedded: usize,
    pub warnings: Vec<Warning>,
}

/// The main entry point for the conversion.
/// Indexes images, converts the export and writes the Open WebUI file.
pub fn execute(config: &ImportConfig) -> Result<RunSummary> {
    let images = ImageIndex::build(&config.image_folders);
    tracing::info!(count = images.len(), "indexed images");

    let conversations = utils::read_export(&config.export_path)?;
    tracing::info!(count = conversations.len(), "loaded conversations");

    let conversion = converter::convert_export(&conversations, &images);
    utils::write_output(&config.output_path, &conversion.chats)?;

    let messages = conversion.chats.iter().map(|c| c.messages.len()).sum();
    let images_embedded = conversion
        .chats
        .iter()
        .flat_map(|c| &c.messages)
        .map(|m| m.files.len())
        .sum();

    Ok(RunSummary {
        conversations: conversion.chats.len(),
        messages,
        images_indexed: images.len(),
        images_embedded,
        warnings: conversion.diagnostics.warnings().to_vec(),
    })
}
