//! Poem text normalization
//!
//! Turns the raw lines of a poem page into the saved layout:
//! title, two blank lines, body, two blank lines, author.

/// Cleans up extracted lines and wraps them with a title header and author footer
///
/// Empty input is returned unchanged, without header or footer.
///
/// # Steps
///
/// 1. Strip leading whitespace from the first line
/// 2. Strip trailing whitespace from the last line
/// 3. If the last line is now empty, drop it and strip the new last line
/// 4. Prepend `[title, "", ""]` and append `["", "", author]`
///
/// # Examples
///
/// ```
/// use poem_harvest::crawler::normalize;
///
/// let lines = vec!["Line one".to_string(), "Line two".to_string()];
/// let doc = normalize("T", "A", lines);
/// assert_eq!(doc, vec!["T", "", "", "Line one", "Line two", "", "", "A"]);
/// ```
pub fn normalize(title: &str, author: &str, mut lines: Vec<String>) -> Vec<String> {
    if lines.is_empty() {
        return lines;
    }

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    strip_last(&mut lines);

    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
        strip_last(&mut lines);
    }

    let mut document = Vec::with_capacity(lines.len() + 6);
    document.push(title.to_string());
    document.push(String::new());
    document.push(String::new());
    document.append(&mut lines);
    document.push(String::new());
    document.push(String::new());
    document.push(author.to_string());
    document
}

fn strip_last(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        *last = last.trim().to_string();
    }
}
