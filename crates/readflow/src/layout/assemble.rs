use crate::types::{BLOCK_SEPARATOR, ColumnLayout};

/// Render the columns of one page as linear text.
///
/// Columns are emitted left to right, each as its lines joined by single line
/// breaks, with a blank line between columns. Columns with no text are
/// skipped, and the result carries no leading or trailing whitespace.
pub fn assemble_page(columns: &[ColumnLayout], label_columns: bool) -> String {
    join_columns(columns.iter().map(ColumnLayout::text), label_columns)
}

/// Join rendered column strings, optionally with `=== COLUMN n ===` headers.
///
/// Headers are only written when more than one column has text.
pub(crate) fn join_columns(columns: impl IntoIterator<Item = String>, label_columns: bool) -> String {
    let columns: Vec<String> = columns
        .into_iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if label_columns && columns.len() > 1 {
        columns
            .iter()
            .enumerate()
            .map(|(i, text)| format!("=== COLUMN {} ===\n{}", i + 1, text))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    } else {
        columns.join(BLOCK_SEPARATOR)
    }
}
