use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Collection;
use crate::store::{DocumentStore, SlotBackend};
use chrono::{DateTime, Utc};

/// A complete backup, ready to be written wherever the user wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    /// Pretty-printed JSON of the whole document.
    pub contents: String,
}

/// `{prefix}-backup-2025-04-05-13-07-59.json`
pub fn artifact_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-backup-{}.json", prefix, at.format("%Y-%m-%d-%H-%M-%S"))
}

pub fn run<B: SlotBackend>(store: &mut DocumentStore<B>, prefix: &str) -> Result<CmdResult> {
    export_at(store, prefix, Utc::now())
}

/// Stamps `lastExport` with `at`, saves the stamp, then serializes the stamped
/// document. If the stamp cannot be saved nothing is exported.
pub fn export_at<B: SlotBackend>(
    store: &mut DocumentStore<B>,
    prefix: &str,
    at: DateTime<Utc>,
) -> Result<CmdResult> {
    store.set_last_export(at)?;
    let artifact = ExportArtifact {
        filename: artifact_filename(prefix, at),
        contents: serde_json::to_string_pretty(store.document())?,
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} records to {}",
        count_records(store),
        artifact.filename
    )));
    result.export = Some(artifact);
    Ok(result)
}

fn count_records<B: SlotBackend>(store: &DocumentStore<B>) -> usize {
    Collection::ALL
        .iter()
        .map(|c| store.document().len(*c))
        .sum()
}
