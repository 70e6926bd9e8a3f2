/// Truncates `note` to at most `max_chars` characters, appending an ellipsis when anything was cut off.
///
/// Truncation happens on a character boundary, so multibyte input never panics.
pub fn bounded_note(note: &str, max_chars: usize) -> String {
    if note.chars().count() <= max_chars {
        return note.to_string();
    }
    let mut result = note.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    result.push('…');
    result
}
