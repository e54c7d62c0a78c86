use super::render::{print_json, print_messages, print_records, print_stats};
use super::setup::{
    CharacterAction, CharacterFields, Cli, Commands, ItemAction, ItemFields, LocationAction,
    LocationFields, NoteAction, NoteFields, OutputFormat, QuestAction, QuestFields,
};
use anyhow::Context;
use clap::Parser;
use console::Term;
use questlogapp::commands::clear::ClearConsent;
use questlogapp::commands::import::OverwriteConsent;
use questlogapp::commands::list::ListFilter;
use questlogapp::commands::{CmdMessage, CmdResult};
use questlogapp::init::{initialize, TrackerContext};
use questlogapp::model::{Character, InventoryItem, Location, Note, Quest};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !Term::stdout().features().colors_supported() {
        colored::control::set_override(false);
    }

    let mut ctx = initialize(cli.data_dir.clone(), cli.reset_corrupt)?;
    debug!(data_dir = %ctx.data_dir.display(), "tracker ready");

    match cli.command {
        None | Some(Commands::Stats) => handle_stats(&ctx, cli.output),
        Some(Commands::List {
            collection,
            search,
            status,
            quest_type,
        }) => {
            let filter = ListFilter {
                search,
                status,
                quest_type,
            };
            let result = ctx.api.list(collection, &filter)?;
            match cli.output {
                OutputFormat::Json => print_json(&result.listed),
                OutputFormat::Text => {
                    print_records(&result.listed);
                    print_messages(&result.messages);
                    Ok(())
                }
            }
        }
        Some(Commands::Quest { action }) => handle_quest(&mut ctx, action),
        Some(Commands::Character { action }) => handle_character(&mut ctx, action),
        Some(Commands::Item { action }) => handle_item(&mut ctx, action),
        Some(Commands::Location { action }) => handle_location(&mut ctx, action),
        Some(Commands::Note { action }) => handle_note(&mut ctx, action),
        Some(Commands::Delete { collection, ids }) => {
            print_result(&ctx.api.delete(collection, ids.as_slice())?);
            Ok(())
        }
        Some(Commands::Toggle {
            collection,
            id,
            flag,
        }) => {
            print_result(&ctx.api.toggle(collection, &id, flag)?);
            Ok(())
        }
        Some(Commands::Theme { theme }) => {
            print_result(&ctx.api.set_theme(theme)?);
            Ok(())
        }
        Some(Commands::Export { out }) => handle_export(&mut ctx, out),
        Some(Commands::Import { file, yes }) => handle_import(&mut ctx, file, yes),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "questlog=debug,questlogapp=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_result(result: &CmdResult) {
    print_records(&result.affected);
    print_messages(&result.messages);
}

/// Asks a yes/no question on stderr. Anything but "y"/"yes" is a no, and so is
/// running without a terminal.
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let term = Term::stderr();
    if !term.is_term() {
        eprintln!("{} [y/N] (no terminal, answering no)", prompt);
        return Ok(false);
    }
    term.write_str(&format!("{} [y/N] ", prompt))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn handle_stats(ctx: &TrackerContext, output: OutputFormat) -> anyhow::Result<()> {
    let result = ctx.api.stats()?;
    let Some(stats) = result.stats else {
        return Ok(());
    };
    match output {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            print_stats(&stats);
            Ok(())
        }
    }
}

fn apply_quest_fields(quest: &mut Quest, fields: QuestFields) {
    if let Some(description) = fields.description {
        quest.description = description;
    }
    if let Some(location) = fields.location {
        quest.location = location;
    }
    if let Some(giver) = fields.giver {
        quest.giver = giver;
    }
    if let Some(main) = fields.main {
        quest.is_main = main;
    }
    if let Some(completed) = fields.completed {
        quest.is_completed = completed;
    }
}

fn handle_quest(ctx: &mut TrackerContext, action: QuestAction) -> anyhow::Result<()> {
    let result = match action {
        QuestAction::Add { name, fields } => {
            let mut quest = Quest::new(name);
            apply_quest_fields(&mut quest, fields);
            ctx.api.save(quest)?
        }
        QuestAction::Edit { id, name, fields } => ctx.api.edit(&id, |quest: &mut Quest| {
            if let Some(name) = name {
                quest.name = name;
            }
            apply_quest_fields(quest, fields);
        })?,
    };
    print_result(&result);
    Ok(())
}

fn apply_character_fields(character: &mut Character, fields: CharacterFields) {
    if let Some(notes) = fields.notes {
        character.notes = notes;
    }
    if let Some(party) = fields.party {
        character.is_in_party = party;
    }
}

fn handle_character(ctx: &mut TrackerContext, action: CharacterAction) -> anyhow::Result<()> {
    let result = match action {
        CharacterAction::Add { name, fields } => {
            let mut character = Character::new(name);
            apply_character_fields(&mut character, fields);
            ctx.api.save(character)?
        }
        CharacterAction::Edit { id, name, fields } => {
            ctx.api.edit(&id, |character: &mut Character| {
                if let Some(name) = name {
                    character.name = name;
                }
                apply_character_fields(character, fields);
            })?
        }
    };
    print_result(&result);
    Ok(())
}

fn apply_item_fields(item: &mut InventoryItem, fields: ItemFields) {
    if let Some(quantity) = fields.quantity {
        item.quantity = InventoryItem::parse_quantity(&quantity);
    }
    if let Some(kind) = fields.kind {
        item.kind = kind;
    }
    if let Some(description) = fields.description {
        item.description = description;
    }
    if let Some(key_item) = fields.key_item {
        item.is_key_item = key_item;
    }
}

fn handle_item(ctx: &mut TrackerContext, action: ItemAction) -> anyhow::Result<()> {
    let result = match action {
        ItemAction::Add { name, fields } => {
            let mut item = InventoryItem::new(name);
            apply_item_fields(&mut item, fields);
            ctx.api.save(item)?
        }
        ItemAction::Edit { id, name, fields } => {
            ctx.api.edit(&id, |item: &mut InventoryItem| {
                if let Some(name) = name {
                    item.name = name;
                }
                apply_item_fields(item, fields);
            })?
        }
    };
    print_result(&result);
    Ok(())
}

fn apply_location_fields(location: &mut Location, fields: LocationFields) {
    if let Some(region) = fields.region {
        location.region = region;
    }
    if let Some(notes) = fields.notes {
        location.notes = notes;
    }
    if let Some(discovered) = fields.discovered {
        location.is_discovered = discovered;
    }
}

fn handle_location(ctx: &mut TrackerContext, action: LocationAction) -> anyhow::Result<()> {
    let result = match action {
        LocationAction::Add { name, fields } => {
            let mut location = Location::new(name);
            apply_location_fields(&mut location, fields);
            ctx.api.save(location)?
        }
        LocationAction::Edit { id, name, fields } => {
            ctx.api.edit(&id, |location: &mut Location| {
                if let Some(name) = name {
                    location.name = name;
                }
                apply_location_fields(location, fields);
            })?
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_note(ctx: &mut TrackerContext, action: NoteAction) -> anyhow::Result<()> {
    let result = match action {
        NoteAction::Add { title, fields } => {
            let mut note = Note::new(title);
            if let Some(content) = fields.content {
                note.content = content;
            }
            ctx.api.save(note)?
        }
        NoteAction::Edit { id, title, fields } => ctx.api.edit(&id, |note: &mut Note| {
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(content) = fields.content {
                note.content = content;
            }
        })?,
    };
    print_result(&result);
    Ok(())
}

fn handle_export(ctx: &mut TrackerContext, out: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    // Must exist before the export stamps last_export.
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create export directory {}", dir.display()))?;

    let result = ctx.api.export()?;
    if let Some(artifact) = &result.export {
        let path = dir.join(&artifact.filename);
        fs::write(&path, &artifact.contents)
            .with_context(|| format!("Cannot write backup to {}", path.display()))?;
        print_messages(&result.messages);
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_import(ctx: &mut TrackerContext, file: PathBuf, yes: bool) -> anyhow::Result<()> {
    let plan = ctx.api.import_file(&file)?;
    print_messages(&[CmdMessage::warning(plan.consequence())]);

    let confirmed = yes || confirm("Continue?")?;
    let result = match OverwriteConsent::from_confirmation(confirmed) {
        Ok(consent) => ctx.api.apply_import(plan, consent)?,
        Err(_) => ctx.api.cancel_import(plan),
    };
    print_messages(&result.messages);
    Ok(())
}

const CLEAR_WARNING: &str =
    "DANGER! This deletes ALL quests, characters, items, locations and notes. Continue?";

fn handle_clear(ctx: &mut TrackerContext, yes: u8) -> anyhow::Result<()> {
    let first = yes >= 1 || confirm(CLEAR_WARNING)?;
    let second = first && (yes >= 2 || confirm("FINAL CONFIRMATION: Really delete everything?")?);

    match ClearConsent::from_confirmations(first, second) {
        Ok(consent) => print_messages(&ctx.api.clear_all(consent)?.messages),
        Err(_) => print_messages(&[CmdMessage::info("Nothing was deleted")]),
    }
    Ok(())
}
