// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Isolates the generated search query from a free-form Deep Search answer.
//!
//! The answer may wrap the query in explanatory prose, code fences or quotes.
//! This is a heuristic: a query line starting with "For " or "Based ", or one
//! without any colon, is not recognised as the query.

/// Prefixes marking explanatory sentences rather than a query.
const PROSE_PREFIXES: [&str; 2] = ["For ", "Based "];

/// Returns the single line of `answer` most likely to be the query.
///
/// Lines are scanned from last to first; the first non-empty line that
/// contains a colon and does not start with a prose prefix wins. Without such
/// a line, the last line is used. Blank input is returned unchanged.
pub fn extract_query(answer: &str) -> String {
    if answer.trim().is_empty() {
        return answer.to_string();
    }

    let lines: Vec<&str> = answer.trim().split('\n').collect();

    let candidate = lines
        .iter()
        .rev()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .find(|line| is_query_line(line));
    if let Some(line) = candidate {
        return strip_decoration(line);
    }

    match lines.last() {
        Some(last) => strip_decoration(last.trim()),
        None => answer.to_string(),
    }
}

fn is_query_line(line: &str) -> bool {
    line.contains(':') && !PROSE_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Strips surrounding backticks, then at most one matching pair of quotes.
fn strip_decoration(line: &str) -> String {
    let line = line.trim_matches('`');
    let unquoted = ['"', '\''].iter().find_map(|&quote| {
        line.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    });
    unquoted.unwrap_or(line).to_string()
}
