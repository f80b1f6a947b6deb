//! Normalization of the raw path text found after `File:` on a marker line.

const QUOTES: [char; 2] = ['\'', '`'];

/// Normalizes a raw marker path.
///
/// Surrounding whitespace is trimmed, one wrapping pair of `'` or `` ` `` quotes is removed and
/// escaped spaces (`\ `) become plain spaces. The pass is repeated until nothing changes, so the
/// result is always a fixed point: `normalize_path(&normalize_path(p)) == normalize_path(p)`.
pub fn normalize_path(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = strip_quote_pair(trimmed);
    unquoted.replace("\\ ", " ").trim().to_owned()
}

fn strip_quote_pair(s: &str) -> &str {
    for q in QUOTES {
        if s.starts_with(q) && s.ends_with(q) {
            // A lone quote counts as both ends.
            return if s.len() == q.len_utf8() { "" } else { &s[1..s.len() - 1] };
        }
    }
    s
}
