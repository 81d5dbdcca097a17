use std::io::IsTerminal;

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value, table_options()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Terminal width from `COLUMNS`; color only on a TTY without `NO_COLOR`.
fn table_options() -> table::TableOptions {
    let stdout_is_tty = std::io::stdout().is_terminal();
    table::TableOptions {
        max_width: std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|_| stdout_is_tty),
        color: stdout_is_tty && std::env::var_os("NO_COLOR").is_none(),
    }
}

fn render_table<T: Serialize>(value: &T, options: table::TableOptions) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items, options)),
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect();
            Ok(table::render_table(&["key", "value"], &rows, options))
        }
        scalar => Ok(table::render_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options,
        )),
    }
}

/// Columns are the first object's keys (alphabetical, as `serde_json::Map` keeps them).
fn render_array_table(items: &[Value], options: table::TableOptions) -> String {
    let Some(first) = items.first() else {
        return String::from("(no rows)");
    };
    let Some(columns) = first.as_object().map(|m| m.keys().cloned().collect::<Vec<_>>()) else {
        let rows: Vec<Vec<String>> = items.iter().map(|v| vec![value_to_cell(v)]).collect();
        return table::render_table(&["value"], &rows, options);
    };

    let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|column| item.get(column).map_or_else(|| "-".to_string(), value_to_cell))
                .collect()
        })
        .collect();
    table::render_table(&headers, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.is_empty() => String::from("-"),
        Value::Array(items) => items.len().to_string(),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Row {
        hash: &'static str,
        action_done: bool,
        issue_url: Option<&'static str>,
    }

    const PLAIN: table::TableOptions = table::TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn json_render_is_valid_json() {
        let row = Row {
            hash: "abc",
            action_done: true,
            issue_url: None,
        };
        let out = render(&row, OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["hash"], "abc");
        assert_eq!(parsed["issue_url"], Value::Null);
    }

    #[test]
    fn raw_render_is_single_line() {
        let out = render(&vec![1, 2, 3], OutputFormat::Raw).unwrap();
        assert_eq!(out, "[1,2,3]");
    }

    #[test]
    fn array_table_has_one_column_per_key() {
        let rows = vec![
            Row {
                hash: "abc",
                action_done: false,
                issue_url: None,
            },
            Row {
                hash: "def",
                action_done: true,
                issue_url: Some("https://github.com/o/r/issues/1"),
            },
        ];
        let out = render_table(&rows, PLAIN).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("action_done"));
        assert!(lines[0].contains("hash"));
        assert!(lines[0].contains("issue_url"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("false"));
        assert!(lines[2].contains("abc"));
        assert!(lines[2].trim_end().ends_with('-'));
        assert!(lines[3].ends_with("https://github.com/o/r/issues/1"));
    }

    #[test]
    fn empty_array_table() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(render_table(&rows, PLAIN).unwrap(), "(no rows)");
    }

    #[test]
    fn nested_lists_render_as_counts() {
        assert_eq!(value_to_cell(&serde_json::json!([1, 2])), "2");
        assert_eq!(value_to_cell(&serde_json::json!([])), "-");
    }
}
