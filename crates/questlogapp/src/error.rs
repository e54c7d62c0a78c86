use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// A record's required text field is empty after trimming.
    #[error("{kind} {field} is required")]
    Validation {
        kind: &'static str,
        field: &'static str,
    },

    /// The durable slot holds something that is not a tracker document.
    #[error("Saved data in {slot} is corrupt: {reason}")]
    CorruptData { slot: String, reason: String },

    /// Writing to (or erasing) the durable slot failed.
    #[error("Could not save to {slot}: {source}")]
    Persistence {
        slot: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse the import file as JSON: {0}")]
    ImportParse(String),

    #[error("The import file does not look like tracker data")]
    ImportSchema,

    #[error("Invalid import file type: {0} (expected a .json file)")]
    ImportFileType(String),

    #[error("Another import is already waiting for confirmation")]
    ImportInFlight,

    #[error("This operation needs explicit confirmation")]
    ConsentRequired,

    #[error("{flag} cannot be toggled on {collection}")]
    UnsupportedFlag { collection: String, flag: String },

    #[error("No {collection} with id {id}")]
    NotFound { collection: &'static str, id: String },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
