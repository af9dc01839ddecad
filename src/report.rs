use colored::Colorize;

use crate::domain::{BatchTally, ProfileInfo};
use crate::table::{CanonicalTable, TableOutcome};

const RULE_WIDTH: usize = 60;

/// Plain-text grid of a results table, one line per row
pub fn render_table(table: &CanonicalTable) -> String {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(idx)?.as_deref())
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = vec![render_line(table.columns.iter().map(String::as_str), &widths)];
    for row in &table.rows {
        let cells = (0..widths.len()).map(|idx| row.get(idx).and_then(|c| c.as_deref()).unwrap_or("NaN"));
        lines.push(render_line(cells, &widths));
    }
    lines.join("\n")
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn print_banner(title: &str) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{}", title.bold());
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn print_table_outcome(term: &str, outcome: &TableOutcome) {
    print_banner(&format!("USCF Player Search Results for '{}':", term));
    match outcome {
        TableOutcome::Populated(table) => println!("{}", render_table(table)),
        TableOutcome::Diagnostic(report) => println!(
            "{} ({} rows, cells per row: {:?})",
            "Table found but no data extracted - structure issue".yellow(),
            report.row_count(),
            report.cell_counts()
        ),
        TableOutcome::NoRows => println!("{}", "No data extracted from the table after search.".yellow()),
    }
}

pub fn print_profile(profile: &ProfileInfo) {
    println!("Player ID: {}", profile.player_id);
    println!("Rating: {}", profile.rating);
    println!(
        "Expiration Date: {}",
        profile.expiration_date.as_deref().unwrap_or("unknown")
    );
}

pub fn print_record_success(profile: &ProfileInfo) {
    println!("  {} Retrieved Rating: {}", "✓".green(), profile.rating);
    println!(
        "  {} Expiration Date: {}",
        "✓".green(),
        profile.expiration_date.as_deref().unwrap_or("unknown")
    );
    println!("  {} Database updated successfully", "✓".green());
}

pub fn print_record_failure(reason: &str) {
    println!("  {} {}", "✗".red(), reason);
}

pub fn print_summary(title: &str, tally: &BatchTally, tournaments: Option<usize>) {
    println!("\n--- {} ---", title.bold());
    if let Some(count) = tournaments {
        println!("Total tournaments processed: {}", count);
    }
    println!("Players processed: {}", tally.total());
    println!("Successful updates: {}", tally.succeeded().to_string().green());
    println!("Failed updates: {}", tally.failed().to_string().red());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let table = CanonicalTable {
            columns: vec!["Name".into(), "State".into()],
            rows: vec![
                vec![Some("Aarush Chugh".into()), Some("CA".into())],
                vec![Some("Raj".into()), None],
            ],
        };

        let rendered = render_table(&table);
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "        Name  State");
        assert_eq!(lines[1], "Aarush Chugh     CA");
        assert_eq!(lines[2], "         Raj    NaN");
    }
}
