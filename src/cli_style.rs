/*!
 * Terminal rendering for human-readable agent output
 *
 * Status lines and the identity/file tables printed by `inspect`.
 */

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};
use ota_core_manifest::{FileEntityCollection, UpdateIdentity};
use std::fmt::Display;

/// Severity of a one-line status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    fn icon(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Warning => "⚠",
            Tone::Error => "✗",
        }
    }

    fn paint<D: Display>(self, text: D) -> StyledObject<D> {
        match self {
            Tone::Success => style(text).green(),
            Tone::Warning => style(text).yellow(),
            Tone::Error => style(text).red().bold(),
        }
    }
}

/// Heading printed above the tables of one update
pub fn heading<D: Display>(text: D) -> StyledObject<D> {
    style(text).cyan().bold()
}

fn table_with(preset: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Key-value table for an update identity
pub fn identity_table(update_id: &UpdateIdentity) -> Table {
    let mut table = table_with(presets::UTF8_NO_BORDERS);

    for (key, value) in [
        ("Provider", update_id.provider()),
        ("Name", update_id.name()),
        ("Version", update_id.version()),
    ] {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value).add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// One row per declared file
pub fn files_table(files: &FileEntityCollection) -> Table {
    let mut table = table_with(presets::UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("File ID").add_attribute(Attribute::Bold),
        Cell::new("Target").add_attribute(Attribute::Bold),
        Cell::new("Size").add_attribute(Attribute::Bold),
        Cell::new("Hashes").add_attribute(Attribute::Bold),
        Cell::new("Download URI").add_attribute(Attribute::Bold),
    ]);

    for (index, file) in files.iter().enumerate() {
        let hashes = file
            .hashes()
            .iter()
            .map(|h| h.hash_type())
            .collect::<Vec<_>>()
            .join(", ");

        let uri = match file.download_uri() {
            Some(uri) => Cell::new(uri),
            None => Cell::new("(none)").fg(Color::Yellow),
        };

        table.add_row(vec![
            Cell::new(index),
            Cell::new(file.file_id()),
            Cell::new(file.target_filename()),
            Cell::new(format_bytes(file.size_in_bytes())),
            Cell::new(hashes),
            uri,
        ]);
    }

    table
}

/// Declared size in binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Rejection line on stderr, with an optional next step
pub fn print_error(message: &str, hint: Option<&str>) {
    let label = format!("{} Error:", Tone::Error.icon());
    eprintln!("{} {}", Tone::Error.paint(label), message);

    if let Some(hint) = hint {
        eprintln!("  {}", style(format!("→ {hint}")).dim());
    }
}

pub fn print_warning(message: &str) {
    eprintln!("{}", Tone::Warning.paint(format!("{} {message}", Tone::Warning.icon())));
}

pub fn print_success(message: &str) {
    println!("{}", Tone::Success.paint(format!("{} {message}", Tone::Success.icon())));
}
