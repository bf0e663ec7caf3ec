use tracing::debug;

use super::numbers::word_to_number;
use super::EditOperation;

/// Detect an editing macro in a dictated phrase
///
/// Checked in order:
/// 1. `delete <n>` where `<n>` is a numeral or number word and `n > 0`
/// 2. `delete word`
/// 3. `delete line`
///
/// A zero or unresolvable count falls through to the later rules instead of
/// producing an empty deletion. Returns `None` when the phrase should be
/// treated as plain dictation.
pub fn recognize_macro(phrase: &str) -> Option<EditOperation> {
    let phrase = phrase.trim().to_lowercase();

    if let Some(count) = delete_count(&phrase) {
        debug!(count, "delete-count macro");
        return Some(EditOperation::DeleteLeft(count));
    }

    let op = match phrase.as_str() {
        "delete word" => EditOperation::DeleteWord,
        "delete line" => EditOperation::DeleteLine,
        _ => return None,
    };
    debug!(?op, "editing macro");
    Some(op)
}

/// Whether the phrase has the `delete <token>` shape
///
/// Used after [`recognize_macro`] declines a phrase: a delete with an
/// invalid count is dropped rather than dictated as text.
pub fn is_delete_form(phrase: &str) -> bool {
    let phrase = phrase.trim().to_lowercase();
    let tokens: Vec<&str> = phrase.split_whitespace().collect();
    matches!(tokens.as_slice(), ["delete", _])
}

/// Parse `delete <token>` into a positive count
fn delete_count(phrase: &str) -> Option<u32> {
    let mut tokens = phrase.split_whitespace();
    if tokens.next()? != "delete" {
        return None;
    }
    let token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let count = if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse::<u32>().ok()?
    } else {
        word_to_number(token)?
    };

    (count > 0).then_some(count)
}
