//! Unwrapping of model output that arrives inside markdown code fences.

const FENCE: &str = "```";

/// Strip markdown code-fence lines from a completion.
///
/// When the trimmed text opens with a fence, every line whose trimmed form
/// starts with three backticks (with or without a language tag) is dropped and the
/// remainder is trimmed again. Text without an opening fence is only trimmed,
/// so cleaning already-clean text is a no-op.
pub fn strip_markdown_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }

    trimmed
        .lines()
        .filter(|line| !line.trim().starts_with(FENCE))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// First `max_chars` characters of `text`, respecting char boundaries.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
