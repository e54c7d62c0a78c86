use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TrackerError};
use crate::store::{DocumentStore, SlotBackend};

/// Proof of two separate confirmations to delete everything.
#[derive(Debug)]
pub struct ClearConsent(());

impl ClearConsent {
    pub fn from_confirmations(first: bool, second: bool) -> Result<Self> {
        if first && second {
            Ok(ClearConsent(()))
        } else {
            Err(TrackerError::ConsentRequired)
        }
    }
}

/// Erases the saved slot, resets the tracker to empty defaults and saves that.
pub fn run<B: SlotBackend>(
    store: &mut DocumentStore<B>,
    _consent: ClearConsent,
) -> Result<CmdResult> {
    store.reset()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("All tracker data has been cleared"));
    Ok(result)
}
