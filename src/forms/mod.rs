pub mod auth;
pub mod checkout;
pub mod delivery;
pub mod products;

/// Collapse runs of whitespace into single spaces and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize every line and drop blank lines at both ends.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }
    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Sanitize an optional field, mapping blank values to `None`.
pub(crate) fn non_blank(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}
