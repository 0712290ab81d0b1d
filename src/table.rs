//! Extraction of the first `<table>` in an HTML document into plain text cells.

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};

/// Header labels plus body rows, every cell as trimmed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the first header equal to any of `names` (case-insensitive).
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    }
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("invalid selector {css:?}: {err}"))
}

/// Parses the first table of `html`. Fails when the document has no table or the
/// table has no header row.
pub fn parse_first_table(html: &str) -> Result<RawTable> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| anyhow!("no table found in page"))?;
    parse_table(table)
}

fn parse_table(table: ElementRef<'_>) -> Result<RawTable> {
    let thead_row_sel = selector("thead > tr")?;
    let tbody_row_sel = selector("tbody > tr")?;
    let any_row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let cells_of = |row: ElementRef<'_>| -> Vec<String> {
        row.select(&cell_sel).map(cell_text).collect()
    };

    // Grouped pages carry an "over_header" row above the real labels; the last
    // header row holds the column names.
    let header_rows: Vec<ElementRef<'_>> = table.select(&thead_row_sel).collect();
    let (headers, rows) = if let Some(last) = header_rows.last() {
        let headers = cells_of(*last);
        let body: Vec<ElementRef<'_>> = table.select(&tbody_row_sel).collect();
        let rows: Vec<Vec<String>> = if body.is_empty() {
            table
                .select(&any_row_sel)
                .filter(|row| !header_rows.contains(row))
                .map(cells_of)
                .collect()
        } else {
            body.into_iter().map(cells_of).collect()
        };
        (headers, rows)
    } else {
        let mut all = table.select(&any_row_sel).map(cells_of);
        let headers = all.next().unwrap_or_default();
        (headers, all.collect())
    };

    if headers.is_empty() {
        return Err(anyhow!("table has no header row"));
    }

    Ok(RawTable {
        headers,
        rows: rows.into_iter().filter(|r| !r.is_empty()).collect(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let joined: String = cell.text().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::parse_first_table;

    #[test]
    fn reads_headers_from_last_thead_row() {
        let html = r#"
            <table>
              <thead>
                <tr class="over_header"><th colspan="2"></th><th>Shooting</th></tr>
                <tr><th>Rk</th><th>Player</th><th>FG%</th></tr>
              </thead>
              <tbody>
                <tr><th>1</th><td><a href="/p/a">Alpha  Guard</a></td><td>.512</td></tr>
              </tbody>
            </table>"#;
        let table = parse_first_table(html).expect("table parses");
        assert_eq!(table.headers, vec!["Rk", "Player", "FG%"]);
        assert_eq!(table.rows, vec![vec!["1", "Alpha Guard", ".512"]]);
        assert_eq!(table.column(&["player"]), Some(1));
    }

    #[test]
    fn body_rows_follow_a_grouped_thead() {
        let html = r#"
            <table>
              <thead>
                <tr><th colspan="2">Totals</th></tr>
                <tr><th>Player</th><th>PTS</th></tr>
              </thead>
              <tbody>
                <tr><td>A</td><td>20.1</td></tr>
                <tr></tr>
                <tr><td>B</td><td>9.4</td></tr>
              </tbody>
            </table>"#;
        let table = parse_first_table(html).expect("table parses");
        assert_eq!(table.headers, vec!["Player", "PTS"]);
        assert_eq!(table.rows, vec![vec!["A", "20.1"], vec!["B", "9.4"]]);
    }

    #[test]
    fn only_first_table_is_consumed() {
        let html = r#"
            <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
            <table><tr><th>B</th></tr><tr><td>2</td></tr></table>"#;
        let table = parse_first_table(html).expect("table parses");
        assert_eq!(table.headers, vec!["A"]);
        assert_eq!(table.rows, vec![vec!["1"]]);
    }

    #[test]
    fn page_without_table_is_an_error() {
        let err = parse_first_table("<html><body><p>Page not found</p></body></html>").unwrap_err();
        assert!(err.to_string().contains("no table"));
    }
}
