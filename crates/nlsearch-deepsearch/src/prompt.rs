// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The instruction prompt sent to Deep Search for query translation.

/// Files in `github.com/sourcegraph/sourcegraph` describing query syntax.
const SYNTAX_REFERENCES: [&str; 5] = [
    "internal/search/query/parser.go",
    "internal/search/query/validate.go",
    "internal/search/query/parser_test.go",
    "internal/search/query/validate_test.go",
    "client/branded/src/search-ui/components/QueryExamples.constants.ts",
];

/// Wraps a natural-language request in instructions asking for a bare
/// Sourcegraph search query.
pub fn build_search_prompt(request: &str) -> String {
    let references: String = SYNTAX_REFERENCES
        .iter()
        .map(|path| format!("- {path}\n"))
        .collect();

    format!(
        "Convert this natural language request into a valid Sourcegraph search query. \n\
         \n\
         For guidance on proper syntax, refer to these files in github.com/sourcegraph/sourcegraph:\n\
         {references}\
         \n\
         CRITICAL: Your response must be ONLY the search query itself. No explanations, \
         no markdown, no code blocks, no additional text. Just the raw query string.\n\
         \n\
         Request: {request}"
    )
}
