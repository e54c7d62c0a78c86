use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use questlogapp::commands::list::{QuestStatus, QuestType};
use questlogapp::model::{Collection, Flag, Theme};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "questlog",
    bin_name = "questlog",
    version,
    disable_help_subcommand = true
)]
#[command(
    about = "Track quests, characters, inventory, locations and notes for your playthrough",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the saved tracker data
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Start from an empty tracker if the saved data is corrupt
    #[arg(long, global = true, help_heading = "Options")]
    pub reset_corrupt: bool,

    /// Output format for list and stats
    #[arg(long, global = true, value_enum, default_value_t, help_heading = "Options")]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the records of one collection
    #[command(alias = "ls", display_order = 1)]
    List {
        /// quests, characters, inventory, locations or notes
        collection: Collection,

        /// Only records containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Quests only: all, active or completed
        #[arg(long, default_value = "all")]
        status: QuestStatus,

        /// Quests only: all, main or side
        #[arg(long = "type", default_value = "all")]
        quest_type: QuestType,
    },

    /// Show the dashboard
    #[command(display_order = 2)]
    Stats,

    /// Add or edit quests
    #[command(display_order = 10)]
    Quest {
        #[command(subcommand)]
        action: QuestAction,
    },

    /// Add or edit characters
    #[command(display_order = 11)]
    Character {
        #[command(subcommand)]
        action: CharacterAction,
    },

    /// Add or edit inventory items
    #[command(display_order = 12)]
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Add or edit locations
    #[command(display_order = 13)]
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Add or edit notes
    #[command(display_order = 14)]
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Delete records by id
    #[command(alias = "rm", display_order = 20)]
    Delete {
        collection: Collection,

        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Flip a flag: main, completed, in-party, key-item or discovered
    #[command(display_order = 21)]
    Toggle {
        collection: Collection,
        id: String,
        flag: Flag,
    },

    /// Switch between the light and dark-future themes
    #[command(display_order = 22)]
    Theme { theme: Theme },

    /// Write a JSON backup of everything
    #[command(display_order = 30)]
    Export {
        /// Directory to write the backup into (default: current directory)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Replace everything with the contents of a JSON backup
    #[command(display_order = 31)]
    Import {
        file: PathBuf,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete all tracker data
    #[command(display_order = 32)]
    Clear {
        /// Answer a confirmation prompt up front; repeat to answer both
        #[arg(short, long, action = ArgAction::Count)]
        yes: u8,
    },
}

// Boolean fields take `--flag` (true) or `--flag false`, and stay unchanged when
// left out.
#[derive(Args, Debug, Default)]
pub struct QuestFields {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub giver: Option<String>,
    /// Part of the main story
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub main: Option<bool>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub completed: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum QuestAction {
    /// Add a quest
    Add {
        name: String,
        #[command(flatten)]
        fields: QuestFields,
    },
    /// Change fields of an existing quest
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: QuestFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct CharacterFields {
    #[arg(long)]
    pub notes: Option<String>,
    /// Currently in the party
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub party: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum CharacterAction {
    /// Add a character
    Add {
        name: String,
        #[command(flatten)]
        fields: CharacterFields,
    },
    /// Change fields of an existing character
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: CharacterFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct ItemFields {
    /// Whole number; anything unreadable counts as 0
    #[arg(long, allow_hyphen_values = true)]
    pub quantity: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub key_item: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// Add an inventory item
    Add {
        name: String,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Change fields of an existing item
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ItemFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct LocationFields {
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub discovered: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum LocationAction {
    /// Add a location
    Add {
        name: String,
        #[command(flatten)]
        fields: LocationFields,
    },
    /// Change fields of an existing location
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: LocationFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct NoteFields {
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Add a note
    Add {
        title: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Change fields of an existing note
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: NoteFields,
    },
}
