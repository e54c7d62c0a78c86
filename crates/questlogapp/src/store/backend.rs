use crate::error::Result;

/// Raw access to the durable slot: one named place holding one serialized document.
///
/// This trait handles the "where" of storage (a file, memory), while
/// [`super::persistence::Persistence`] handles the "what" (parsing, defaults).
pub trait SlotBackend {
    /// Read the slot contents.
    /// Returns Ok(None) if the slot has never been written (or was erased).
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self) -> Result<Option<String>>;

    /// Replace the slot contents.
    /// MUST be atomic (e.g. write to tmp then rename) so a failed write leaves the
    /// previous contents in place.
    fn write(&self, contents: &str) -> Result<()>;

    /// Remove the slot. Erasing an absent slot is not an error.
    fn erase(&self) -> Result<()>;

    /// Where the slot lives, for messages. A real path for files, a virtual one otherwise.
    fn location(&self) -> String;
}

impl<B: SlotBackend + ?Sized> SlotBackend for &B {
    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<()> {
        (**self).write(contents)
    }

    fn erase(&self) -> Result<()> {
        (**self).erase()
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
