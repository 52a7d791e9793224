//! Text-level reformatters: JSON pretty-printing, pipe-table alignment and
//! whole-document Markdown cleanup.
//!
//! These work on plain `&str` and know nothing about selections; the
//! selection-aware wrappers live in [`crate::transform`].

use inkdown_common::error::{ParseError, ValidationError};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static HEADING_NO_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})([^#\s])").expect("heading pattern"));

static LIST_NO_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-*])([^\s*-].*)$").expect("list pattern"));

static EXTRA_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern"));

static SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("separator pattern"));

/// Re-serialize `text` as 2-space indented JSON, keeping key order.
///
/// `name` labels the source in the diagnostic on failure.
pub fn pretty_json(text: &str, name: &str) -> Result<String, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ParseError::json(e, name, text))?;
    serde_json::to_string_pretty(&value).map_err(|e| ParseError::json(e, name, text))
}

/// Align every pipe-table row in `text`.
///
/// Lines with fewer than three `|`-delimited segments pass through untouched.
/// Line endings are kept as they were, `\r\n` included.
pub fn align_table(text: &str) -> Result<String, ValidationError> {
    if !text.contains('|') {
        return Err(ValidationError::NoTableDelimiter);
    }

    let lines: Vec<(&str, &str)> = text
        .split('\n')
        .map(|line| match line.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (line, ""),
        })
        .collect();
    let rows: Vec<Option<Vec<Cell<'_>>>> = lines.iter().map(|(body, _)| parse_row(body)).collect();

    let columns = rows.iter().flatten().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![1usize; columns];
    for cells in rows.iter().flatten() {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.min_width());
        }
    }

    let out: Vec<String> = lines
        .iter()
        .zip(&rows)
        .map(|((body, ending), cells)| match cells {
            Some(cells) => render_row(cells, &widths) + *ending,
            None => format!("{body}{ending}"),
        })
        .collect();
    Ok(out.join("\n"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell<'a> {
    Text(&'a str),
    Separator { left: bool, right: bool },
}

impl Cell<'_> {
    fn min_width(&self) -> usize {
        match self {
            Cell::Text(text) => text.chars().count(),
            Cell::Separator { left, right } => 1 + *left as usize + *right as usize,
        }
    }
}

fn parse_row(line: &str) -> Option<Vec<Cell<'_>>> {
    let mut fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < 3 {
        return None;
    }
    if fields.first().is_some_and(|f| f.is_empty()) {
        fields.remove(0);
    }
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    // Only a row made entirely of dash cells is the header separator. A lone
    // `-` in a data row is content.
    let is_separator = fields.iter().any(|f| !f.is_empty())
        && fields
            .iter()
            .all(|f| f.is_empty() || SEPARATOR_CELL.is_match(f));

    let cells = fields
        .into_iter()
        .map(|field| {
            if is_separator && !field.is_empty() {
                Cell::Separator {
                    left: field.starts_with(':'),
                    right: field.len() > 1 && field.ends_with(':'),
                }
            } else {
                Cell::Text(field)
            }
        })
        .collect();
    Some(cells)
}

fn render_row(cells: &[Cell<'_>], widths: &[usize]) -> String {
    let mut out = String::from("|");
    for (cell, &width) in cells.iter().zip(widths) {
        out.push(' ');
        match cell {
            Cell::Text(text) => {
                out.push_str(text);
                let pad = width - text.chars().count();
                out.extend(std::iter::repeat_n(' ', pad));
            }
            Cell::Separator { left, right } => {
                let dashes = width - *left as usize - *right as usize;
                if *left {
                    out.push(':');
                }
                out.extend(std::iter::repeat_n('-', dashes));
                if *right {
                    out.push(':');
                }
            }
        }
        out.push_str(" |");
    }
    out
}

/// Normalize common Markdown spacing mistakes across a whole document.
///
/// In order: a space after a line-leading run of `#`, a space after a
/// line-leading `-`/`*` list marker, then runs of blank lines collapsed to
/// one. Lines inside fenced code blocks are left alone by the first two
/// passes.
pub fn beautify_markdown(text: &str) -> String {
    let mut in_fence = false;
    let mut lines = Vec::new();
    for line in text.split('\n') {
        if is_fence(line) {
            in_fence = !in_fence;
            lines.push(line.to_string());
            continue;
        }
        if in_fence {
            lines.push(line.to_string());
            continue;
        }
        let line = HEADING_NO_SPACE.replace(line, "$1 $2");
        let line = LIST_NO_SPACE.replace(&line, |caps: &Captures<'_>| {
            let rest = &caps[3];
            // `*word*` is emphasis, not a list item.
            if &caps[2] == "*" && rest.contains('*') {
                caps[0].to_string()
            } else {
                format!("{}{} {}", &caps[1], &caps[2], rest)
            }
        });
        lines.push(line.into_owned());
    }
    EXTRA_BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .into_owned()
}

/// Whether `line` opens or closes a fenced code block.
pub(crate) fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_json_keeps_key_order() {
        let out = pretty_json(r#"{"z":1,"a":[true,null]}"#, "selection").unwrap();
        assert_eq!(
            out,
            "{\n  \"z\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn test_pretty_json_reports_location() {
        let err = pretty_json("{\"a\": }", "selection").unwrap_err();
        assert_eq!(err.line_col().map(|(line, _)| line), Some(1));
    }

    #[test]
    fn test_align_table_pads_columns() {
        let out = align_table("| a | bb |\n| - | - |\n| c | d |").unwrap();
        insta::assert_snapshot!(out, @r"
        | a | bb |
        | - | -- |
        | c | d  |
        ");
    }

    #[test]
    fn test_align_table_keeps_alignment_colons() {
        let out = align_table("|name|qty|\n|:-|-:|\n|apple|3|").unwrap();
        assert_eq!(
            out,
            "| name  | qty |\n| :---- | --: |\n| apple | 3   |"
        );
    }

    #[test]
    fn test_align_table_keeps_dash_data_cells() {
        let table = "| name | score |\n| ---- | ----- |\n| bob  | -     |";
        assert_eq!(align_table(table).unwrap(), table);

        let out = align_table("|a|b|\n|-|-|\n|long|-|").unwrap();
        assert_eq!(out, "| a    | b |\n| ---- | - |\n| long | - |");
    }

    #[test]
    fn test_align_table_keeps_crlf() {
        let out = align_table("|a|bb|\r\n|-|-|\r\n|c|d|\r\n").unwrap();
        assert_eq!(out, "| a | bb |\r\n| - | -- |\r\n| c | d  |\r\n");
    }

    #[test]
    fn test_align_table_short_rows_and_plain_lines() {
        let out = align_table("intro text\n| a | b | c |\n| long |").unwrap();
        assert_eq!(out, "intro text\n| a    | b | c |\n| long |");
    }

    #[test]
    fn test_align_table_without_pipe() {
        let err = align_table("no table here").unwrap_err();
        assert!(matches!(err, ValidationError::NoTableDelimiter));
    }

    #[test]
    fn test_align_table_is_idempotent() {
        let once = align_table("|x|y|\n|---|---|\n|1|22|").unwrap();
        assert_eq!(align_table(&once).unwrap(), once);
    }

    #[test]
    fn test_beautify_spacing() {
        let out = beautify_markdown("#Title\n\n\n\n-item\n*other\n---\n**bold**\n*emph*");
        assert_eq!(out, "# Title\n\n- item\n* other\n---\n**bold**\n*emph*");
    }

    #[test]
    fn test_beautify_skips_code_fences() {
        let text = "```c\n#include <stdio.h>\n-x\n```\n#Heading";
        assert_eq!(
            beautify_markdown(text),
            "```c\n#include <stdio.h>\n-x\n```\n# Heading"
        );
    }

    #[test]
    fn test_beautify_is_idempotent() {
        let once = beautify_markdown("##Intro\n-a\n\n\n\n\n*b\n####### seven");
        assert_eq!(beautify_markdown(&once), once);
        assert!(once.contains("####### seven"));
    }
}
