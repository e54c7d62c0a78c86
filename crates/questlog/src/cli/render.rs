use chrono::{DateTime, Utc};
use colored::Colorize;
use questlogapp::commands::stats::Stats;
use questlogapp::commands::{CmdMessage, MessageLevel};
use questlogapp::model::AnyRecord;
use serde::Serialize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 14;
const DONE_MARKER: &str = "✓";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_records(records: &[AnyRecord]) {
    for record in records {
        let (headline, detail, badges) = record_columns(record);

        let id = format!("{:<width$}", record.id().as_str(), width = ID_WIDTH);
        let badges_width = badges.iter().map(|b| b.width() + 1).sum::<usize>();
        let available = LINE_WIDTH.saturating_sub(ID_WIDTH + 1 + badges_width);

        let head = truncate_to_width(&headline, available);
        let room = available.saturating_sub(head.width() + 2);
        let detail = if detail.is_empty() || room == 0 {
            String::new()
        } else {
            format!("  {}", truncate_to_width(&detail, room))
        };
        let padding = available.saturating_sub(head.width() + detail.width());

        let badges: Vec<String> = badges.iter().map(|b| b.cyan().to_string()).collect();

        println!(
            "{} {}{}{} {}",
            id.yellow(),
            head.bold(),
            detail.dimmed(),
            " ".repeat(padding),
            badges.join(" ")
        );
    }
}

/// Headline, secondary text and flag badges for one listing line.
fn record_columns(record: &AnyRecord) -> (String, String, Vec<&'static str>) {
    let mut badges = Vec::new();
    match record {
        AnyRecord::Quest(q) => {
            if q.is_main {
                badges.push("main");
            }
            if q.is_completed {
                badges.push(DONE_MARKER);
            }
            let detail = join_present(&[q.location.as_str(), q.giver.as_str()]);
            (q.name.clone(), detail, badges)
        }
        AnyRecord::Character(c) => {
            if c.is_in_party {
                badges.push("party");
            }
            (c.name.clone(), single_line(&c.notes), badges)
        }
        AnyRecord::Item(i) => {
            if i.is_key_item {
                badges.push("key");
            }
            let detail = join_present(&[i.kind.as_str(), i.description.as_str()]);
            (format!("{} x{}", i.name, i.quantity), detail, badges)
        }
        AnyRecord::Location(l) => {
            if l.is_discovered {
                badges.push("discovered");
            }
            (l.name.clone(), join_present(&[l.region.as_str(), l.notes.as_str()]), badges)
        }
        AnyRecord::Note(n) => (n.title.clone(), single_line(&n.content), badges),
    }
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| single_line(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

fn single_line(s: &str) -> String {
    s.trim().replace('\n', " ")
}

pub(super) fn print_stats(stats: &Stats) {
    let rows = [
        ("Active quests", stats.active_quests.to_string()),
        ("Total quests", stats.total_quests.to_string()),
        ("Characters", stats.characters.to_string()),
        ("Inventory items", stats.inventory_items.to_string()),
        (
            "Locations",
            format!(
                "{} ({} discovered)",
                stats.locations, stats.discovered_locations
            ),
        ),
        ("Notes", stats.notes.to_string()),
        ("Last export", format_last_export(stats.last_export)),
    ];
    for (label, value) in rows {
        println!("{}{}", format!("{:<18}", label).dimmed(), value.bold());
    }
}

fn format_last_export(at: Option<DateTime<Utc>>) -> String {
    match at {
        None => "Never".to_string(),
        Some(at) => format!("{} ({})", at.format("%Y-%m-%d %H:%M"), format_time_ago(at)),
    }
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlogapp::model::{InventoryItem, Note, Quest};

    #[test]
    fn test_truncate_short_text_is_untouched() {
        assert_eq!(truncate_to_width("Potion", 10), "Potion");
    }

    #[test]
    fn test_truncate_counts_display_width() {
        let out = truncate_to_width("東京の地図を探す", 7);
        assert!(out.ends_with('…'));
        assert!(out.width() <= 7);
    }

    #[test]
    fn test_quest_columns() {
        let mut quest = Quest::new("Find the Painter");
        quest.location = "Lumière".into();
        quest.is_main = true;
        quest.is_completed = true;
        let (headline, detail, badges) = record_columns(&quest.into());
        assert_eq!(headline, "Find the Painter");
        assert_eq!(detail, "Lumière");
        assert_eq!(badges, vec!["main", DONE_MARKER]);
    }

    #[test]
    fn test_item_headline_shows_quantity() {
        let mut item = InventoryItem::new("Chroma Catalyst");
        item.quantity = 12;
        item.kind = "Upgrade".into();
        let (headline, detail, badges) = record_columns(&item.into());
        assert_eq!(headline, "Chroma Catalyst x12");
        assert_eq!(detail, "Upgrade");
        assert!(badges.is_empty());
    }

    #[test]
    fn test_note_detail_is_single_line() {
        let mut note = Note::new("Boss order");
        note.content = "first\nsecond\n".into();
        let (_, detail, _) = record_columns(&note.into());
        assert_eq!(detail, "first second");
    }

    #[test]
    fn test_last_export_never() {
        assert_eq!(format_last_export(None), "Never");
    }
}
