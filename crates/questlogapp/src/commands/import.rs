//! # Import
//!
//! Importing replaces the entire tracker, so it happens in two steps:
//!
//! 1. [`stage`] parses the text, checks that it looks like tracker data, and builds
//!    the document that would replace the current one. Nothing changes yet. The
//!    returned [`ImportPlan`] describes the consequence: what comes in, and what
//!    gets overwritten.
//! 2. [`apply`] takes the plan plus an [`OverwriteConsent`] and performs the
//!    replacement, saving it in the same step.
//!
//! A failure in either step leaves the current document and the saved slot as they
//! were.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackerError};
use crate::model::{Collection, Document};
use crate::reconcile::{looks_like_document, reconcile, ReconcileReport};
use crate::store::{DocumentStore, SlotBackend};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Proof that the user agreed to overwrite all current data.
#[derive(Debug)]
pub struct OverwriteConsent(());

impl OverwriteConsent {
    /// Consent given up front, e.g. with a `--yes` flag.
    pub fn granted() -> Self {
        OverwriteConsent(())
    }

    /// Consent from a single confirmation prompt.
    pub fn from_confirmation(confirmed: bool) -> Result<Self> {
        if confirmed {
            Ok(OverwriteConsent(()))
        } else {
            Err(TrackerError::ConsentRequired)
        }
    }
}

/// A parsed and reconciled import, waiting for consent.
#[derive(Debug)]
pub struct ImportPlan {
    document: Document,
    /// Repairs made while reading the import.
    pub report: ReconcileReport,
    /// Records per collection in the import.
    pub incoming: Vec<(Collection, usize)>,
    /// Records per collection that would be overwritten, as of staging.
    pub replaced: Vec<(Collection, usize)>,
}

impl ImportPlan {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn incoming_total(&self) -> usize {
        self.incoming.iter().map(|(_, n)| n).sum()
    }

    pub fn replaced_total(&self) -> usize {
        self.replaced.iter().map(|(_, n)| n).sum()
    }

    /// One line describing what applying the plan does.
    pub fn consequence(&self) -> String {
        format!(
            "Importing will OVERWRITE all current data ({} records) with {} imported records",
            self.replaced_total(),
            self.incoming_total()
        )
    }
}

fn counts(doc: &Document) -> Vec<(Collection, usize)> {
    Collection::ALL.iter().map(|c| (*c, doc.len(*c))).collect()
}

/// Rejects files that declare a type other than JSON. Files without an extension
/// are let through to the parser.
pub fn check_file_type(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        None => Ok(()),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        Some(ext) => Err(TrackerError::ImportFileType(format!(".{}", ext))),
    }
}

/// Parses and validates `text` without touching the store.
pub fn stage<B: SlotBackend>(store: &DocumentStore<B>, text: &str) -> Result<ImportPlan> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| TrackerError::ImportParse(e.to_string()))?;
    if !looks_like_document(&value) {
        return Err(TrackerError::ImportSchema);
    }
    let Value::Object(root) = value else {
        return Err(TrackerError::ImportSchema);
    };

    let (document, report) = reconcile(&root, store.ids());
    let plan = ImportPlan {
        incoming: counts(&document),
        replaced: counts(store.document()),
        document,
        report,
    };
    debug!(
        incoming = plan.incoming_total(),
        replaced = plan.replaced_total(),
        "staged import"
    );
    Ok(plan)
}

/// Replaces the whole document with the staged one and saves it.
///
/// The replaced count in the result is taken from the store at this point, so
/// edits made after staging are reflected in it.
pub fn apply<B: SlotBackend>(
    store: &mut DocumentStore<B>,
    plan: ImportPlan,
    _consent: OverwriteConsent,
) -> Result<CmdResult> {
    let incoming = plan.incoming_total();
    let replaced: usize = counts(store.document()).iter().map(|(_, n)| n).sum();
    store.replace(plan.document)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} records, replacing {}",
        incoming, replaced
    )));
    for message in report_messages(&plan.report) {
        result.add_message(message);
    }
    Ok(result)
}

fn report_messages(report: &ReconcileReport) -> Vec<CmdMessage> {
    let mut messages = Vec::new();
    if report.dropped_records > 0 {
        messages.push(CmdMessage::warning(format!(
            "Skipped {} records that were not valid",
            report.dropped_records
        )));
    }
    if report.duplicate_ids > 0 {
        messages.push(CmdMessage::warning(format!(
            "Skipped {} records with a repeated id",
            report.duplicate_ids
        )));
    }
    if report.assigned_ids > 0 {
        messages.push(CmdMessage::info(format!(
            "Gave new ids to {} records that had none",
            report.assigned_ids
        )));
    }
    if !report.defaulted_fields.is_empty() {
        messages.push(CmdMessage::warning(format!(
            "Reset unreadable values to defaults: {}",
            report.defaulted_fields.join(", ")
        )));
    }
    messages
}
