use crate::model::migrate::RawProject;

/// Parse CSV text into raw project records.
///
/// The header row maps columns onto record fields: names match
/// case-insensitively with whitespace stripped, so `Due Date`, `due date`
/// and `dueDate` all hit the due-date field. Unknown columns are ignored,
/// missing cells read as empty, and blank rows are skipped. Records come
/// back raw; the caller migrates them and decides what to do with failures.
pub fn parse_csv(text: &str) -> Vec<RawProject> {
    let mut rows = parse_rows(text);
    if rows.is_empty() {
        return Vec::new();
    }
    let headers: Vec<String> = rows.remove(0).iter().map(|h| normalize_header(h)).collect();

    rows.iter()
        .filter(|cells| !cells.iter().all(|c| c.trim().is_empty()))
        .map(|cells| row_to_raw(&headers, cells))
        .collect()
}

/// Split CSV text into rows of cells. Double-quoted cells keep embedded
/// commas and newlines; `""` inside a quoted cell is a literal quote.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut cell)),
                '\r' => {}
                '\n' => {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                _ => cell.push(c),
            }
        }
    }
    // Final row may have no trailing newline
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}

/// Lowercase with all whitespace stripped: `Due Date` → `duedate`
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn row_to_raw(headers: &[String], cells: &[String]) -> RawProject {
    let mut raw = RawProject::default();
    for (i, header) in headers.iter().enumerate() {
        let value = cells.get(i).map(String::as_str).unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }
        match header.as_str() {
            "name" => raw.name = Some(value.to_string()),
            "progress" => raw.progress = Some(value.to_string()),
            "category" => raw.category = Some(value.to_string()),
            "priority" => raw.priority = Some(value.to_string()),
            "duedate" => raw.due_date = Some(value.to_string()),
            "link" => raw.link = Some(value.to_string()),
            "description" => raw.description = Some(value.to_string()),
            "tags" => {
                let tags: Vec<String> = value
                    .split(';')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                raw.tags = Some(tags);
            }
            _ => {}
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_mapped_rows() {
        let csv = "\
Name,Progress,Category,Priority,Due Date,Link,Description,Tags
\"Alpha\",\"in progress\",\"Web App\",\"high\",\"2025-03-01\",\"https://alpha.dev\",\"first\",\"web;app\"
\"Beta\",\"blocked\",\"\",\"low\",\"\",\"\",\"\",\"\"
";
        let raws = parse_csv(csv);
        assert_eq!(raws.len(), 2);

        assert_eq!(raws[0].name.as_deref(), Some("Alpha"));
        assert_eq!(raws[0].progress.as_deref(), Some("in progress"));
        assert_eq!(raws[0].due_date.as_deref(), Some("2025-03-01"));
        assert_eq!(
            raws[0].tags,
            Some(vec!["web".to_string(), "app".to_string()])
        );

        assert_eq!(raws[1].name.as_deref(), Some("Beta"));
        // Empty cells stay absent so migration fills defaults
        assert!(raws[1].category.is_none());
        assert!(raws[1].due_date.is_none());
        assert!(raws[1].tags.is_none());
    }

    #[test]
    fn header_names_are_forgiving() {
        let csv = "NAME,due date,TaGs\nThing,2024-12-31,a;b\n";
        let raws = parse_csv(csv);
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].name.as_deref(), Some("Thing"));
        assert_eq!(raws[0].due_date.as_deref(), Some("2024-12-31"));
        assert_eq!(raws[0].tags, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let csv = "Name,Description\n\"One, two\",\"line one\nline two\"\n";
        let raws = parse_csv(csv);
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].name.as_deref(), Some("One, two"));
        assert_eq!(raws[0].description.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn doubled_quotes_are_literal() {
        let csv = "Name\n\"say \"\"hi\"\"\"\n";
        let raws = parse_csv(csv);
        assert_eq!(raws[0].name.as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn skips_blank_rows_and_unknown_columns() {
        let csv = "Name,Nonsense\nA,ignored\n\n  ,\nB,\n";
        let raws = parse_csv(csv);
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].name.as_deref(), Some("A"));
        assert_eq!(raws[1].name.as_deref(), Some("B"));
    }

    #[test]
    fn handles_missing_trailing_newline_and_crlf() {
        let csv = "Name,Progress\r\nA,blocked\r\nB,complete";
        let raws = parse_csv(csv);
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[1].name.as_deref(), Some("B"));
        assert_eq!(raws[1].progress.as_deref(), Some("complete"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("Name,Progress\n").is_empty());
    }
}
