//! Output formatting for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

/// Placeholder shown for a file no subtype claimed.
pub const NO_SUBTYPE: &str = "-";

/// Print a table with headers. Rows whose second column is the no-subtype
/// marker are dimmed.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let unmatched = row.get(1).is_some_and(|s| s == NO_SUBTYPE);
        let cells: Vec<Cell> = row
            .into_iter()
            .map(|text| {
                let cell = Cell::new(text);
                if unmatched {
                    cell.fg(Color::DarkGrey)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// "yes"/"no" for verdict lines
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
