use anyhow::{Context, Result};
use regex::Regex;

/// What the pattern-based pass could recover from a table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReport {
    /// Plain text of every `<td>` fragment, row by row
    pub rows: Vec<Vec<String>>,
}

impl FallbackReport {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_counts(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }
}

/// Regex splitter for tables whose markup defeats the structured pass
pub struct FallbackParser {
    tbody: Regex,
    row: Regex,
    cell: Regex,
    tag: Regex,
}

impl FallbackParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tbody: compile(r"(?is)<tbody[^>]*>(.*?)</tbody>")?,
            row: compile(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr>")?,
            cell: compile(r"(?is)<td(?:\s[^>]*)?>(.*?)</td>")?,
            tag: compile(r"<[^>]+>")?,
        })
    }

    /// `None` when the HTML has no `<tbody>` block at all
    pub fn parse(&self, html: &str) -> Option<FallbackReport> {
        let body = self.tbody.captures(html)?.get(1)?.as_str();

        let rows = self
            .row
            .captures_iter(body)
            .filter_map(|row| row.get(1))
            .map(|row| self.split_cells(row.as_str()))
            .collect();

        Some(FallbackReport { rows })
    }

    fn split_cells(&self, row_html: &str) -> Vec<String> {
        self.cell
            .captures_iter(row_html)
            .filter_map(|cell| cell.get(1))
            .map(|cell| self.strip_tags(cell.as_str()))
            .collect()
    }

    fn strip_tags(&self, fragment: &str) -> String {
        self.tag.replace_all(fragment, "").trim().to_string()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile pattern {}", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_cells() {
        let parser = FallbackParser::new().unwrap();
        let report = parser
            .parse(
                r#"<table><tbody>
                     <tr class="odd"><td><span class="fi"></span> <a href="/p/1">Anna</a></td><td>101</td></tr>
                     <tr><td>Ben</td></tr>
                     <tr></tr>
                   </tbody></table>"#,
            )
            .unwrap();

        assert_eq!(report.row_count(), 3);
        assert_eq!(report.cell_counts(), vec![2, 1, 0]);
        assert_eq!(report.rows[0], vec!["Anna", "101"]);
    }

    #[test]
    fn test_no_tbody() {
        let parser = FallbackParser::new().unwrap();
        assert!(parser.parse("<table><tr><td>x</td></tr></table>").is_none());
    }

    #[test]
    fn test_tbody_with_attributes() {
        let parser = FallbackParser::new().unwrap();
        let report = parser
            .parse(r#"<TBODY id="results"><TR><TD>1</TD></TR></TBODY>"#)
            .unwrap();
        assert_eq!(report.rows, vec![vec!["1".to_string()]]);
    }
}
