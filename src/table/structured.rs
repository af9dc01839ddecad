use scraper::{ElementRef, Html, Node, Selector};

use crate::errors::ScrapeError;

/// Rows and columns read out of an HTML table, before renaming.
///
/// Empty cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// True when there are no body rows or every body cell is empty
    pub fn is_all_empty(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Parse the first `<table>` in `html` into header and body rows.
///
/// The header comes from `<thead>`, or from a leading row made only of `<th>`
/// cells. Rows of nested tables are not mixed into the outer table.
pub fn parse_table(html: &str) -> Result<RawTable, ScrapeError> {
    let fragment = Html::parse_fragment(html);
    let table = first_table(&fragment)?;

    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for section in child_elements(table) {
        match section.value().name() {
            "thead" => {
                if let Some(row) = child_elements(section).find(|e| e.value().name() == "tr") {
                    headers = header_cells(row);
                }
            }
            "tbody" | "tfoot" => {
                for row in child_elements(section).filter(|e| e.value().name() == "tr") {
                    rows.push(row);
                }
            }
            "tr" => rows.push(section),
            _ => {}
        }
    }

    if headers.is_empty() {
        if let Some(first) = rows.first().copied() {
            if is_header_row(first) {
                headers = header_cells(first);
                rows.remove(0);
            }
        }
    }

    Ok(RawTable {
        headers,
        rows: rows.into_iter().map(body_cells).collect(),
    })
}

fn first_table(fragment: &Html) -> Result<ElementRef<'_>, ScrapeError> {
    let selector = Selector::parse("table")
        .map_err(|e| ScrapeError::ParseFailure(format!("table selector: {e}")))?;
    fragment
        .select(&selector)
        .next()
        .ok_or_else(|| ScrapeError::ParseFailure("HTML contains no <table>".to_string()))
}

fn child_elements(parent: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    parent.children().filter_map(ElementRef::wrap)
}

fn cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    child_elements(row).filter(|e| matches!(e.value().name(), "td" | "th"))
}

fn is_header_row(row: ElementRef<'_>) -> bool {
    let mut any = false;
    for cell in cells(row) {
        if cell.value().name() != "th" {
            return false;
        }
        any = true;
    }
    any
}

fn header_cells(row: ElementRef<'_>) -> Vec<String> {
    cells(row).map(|cell| cell_text(cell).unwrap_or_default()).collect()
}

fn body_cells(row: ElementRef<'_>) -> Vec<Option<String>> {
    cells(row).map(cell_text).collect()
}

/// Text content of a cell with `<br>` kept as a line break, trimmed
pub fn cell_text(cell: ElementRef<'_>) -> Option<String> {
    let mut text = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thead_and_tbody() {
        let table = parse_table(
            r#"<table class="table table-bordered">
                 <thead><tr><th>Name</th><th>ID</th></tr></thead>
                 <tbody>
                   <tr><td>Anna</td><td>101</td></tr>
                   <tr><td>Ben</td><td></td></tr>
                 </tbody>
               </table>"#,
        )
        .unwrap();

        assert_eq!(table.headers, vec!["Name", "ID"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec![Some("Anna".into()), Some("101".into())]);
        assert_eq!(table.rows[1][1], None);
        assert!(!table.is_all_empty());
    }

    #[test]
    fn test_header_row_without_thead() {
        let table = parse_table(
            "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
        )
        .unwrap();

        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec![Some("1".into()), Some("2".into())]]);
    }

    #[test]
    fn test_nested_table_rows_stay_inside_cell() {
        let table = parse_table(
            "<table><tbody><tr><td><table><tr><td>inner</td></tr></table></td><td>x</td></tr></tbody></table>",
        )
        .unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_br_becomes_line_break() {
        let table = parse_table("<table><tr><td>flag<br>Jane Doe</td></tr></table>").unwrap();
        assert_eq!(table.rows[0][0].as_deref(), Some("flag\nJane Doe"));
    }

    #[test]
    fn test_empty_cells_detected() {
        let table = parse_table(
            "<table><thead><tr><th>A</th></tr></thead><tbody><tr><td> </td></tr><tr><td></td></tr></tbody></table>",
        )
        .unwrap();
        assert!(table.is_all_empty());

        let table = parse_table("<table><thead><tr><th>A</th></tr></thead><tbody></tbody></table>").unwrap();
        assert!(table.rows.is_empty());
        assert!(table.is_all_empty());
    }

    #[test]
    fn test_missing_table() {
        let err = parse_table("<div>nothing here</div>").unwrap_err();
        assert!(matches!(err, ScrapeError::ParseFailure(_)));
    }
}
