//! Output hygiene for generated text
//!
//! Assistant CLIs tend to wrap documents in code fences or preface them
//! with meta-commentary ("Here is the test plan you requested..."). Both
//! are stripped before an artifact is stored.

/// Leading phrases that mark meta-commentary rather than document content.
const META_PREFIXES: &[&str] = &[
    "i will ",
    "i'll ",
    "i have created",
    "i've created",
    "here is ",
    "here's ",
    "sure,",
    "certainly",
    "great!",
    "perfect!",
    "based on the",
    "as requested",
];

/// Whether a line reads as meta-commentary about the document instead of
/// document content.
pub fn is_meta_line(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    META_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Whether generated text still opens with a meta-commentary preamble.
pub fn has_meta_preamble(text: &str) -> bool {
    text.lines()
        .find(|line| !line.trim().is_empty())
        .map(is_meta_line)
        .unwrap_or(false)
}

/// Strip code-fence wrapping and leading meta-commentary lines.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw.trim();

    // Unwrap a single fenced block covering the whole response
    if text.starts_with("```") {
        if let Some(first_newline) = text.find('\n') {
            let rest = &text[first_newline + 1..];
            if let Some(end) = rest.rfind("```") {
                text = rest[..end].trim();
            }
        }
    }

    // Drop meta-commentary lines before the first content line
    let mut lines = text.lines().peekable();
    let mut skipped = Vec::new();
    while let Some(line) = lines.peek() {
        if line.trim().is_empty() || is_meta_line(line) {
            skipped.push(*line);
            lines.next();
        } else {
            break;
        }
    }

    let remaining: Vec<&str> = lines.collect();
    if remaining.is_empty() {
        // Nothing but commentary; keep the original rather than lose it
        return text.to_string();
    }

    remaining.join("\n").trim().to_string()
}
