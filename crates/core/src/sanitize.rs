//! turns free-form catalog titles into path components.
//!
//! titles often follow a `Show: "Episode Title" Part 2` convention where the
//! quoted part is the real title. [`sanitize`] keeps that part, optionally
//! followed by whatever trails the closing quote.

/// characters that are unsafe in a path component on common filesystems.
pub const INVALID_CHARS: [char; 8] = ['<', '>', ':', '/', '\\', '|', '?', '*'];

const FALLBACK_NAME: &str = "untitled";

/// sanitizes `raw` and extracts its quoted segment when it has one.
///
/// with at least two `"` the text between the first and the last quote becomes
/// the name; `include_trailing` appends everything after the last quote.
/// quotes left inside the segment are dropped, so sanitizing twice yields the
/// same name. when extraction leaves nothing usable the whole title is kept.
pub fn sanitize(raw: &str, include_trailing: bool) -> String {
    let stripped = replace_invalid(raw);

    if let (Some(first), Some(last)) = (stripped.find('"'), stripped.rfind('"'))
        && first < last
    {
        let quoted = stripped[first + 1..last].replace('"', " ");
        let name = if include_trailing {
            format!("{quoted}{}", &stripped[last + 1..])
        } else {
            quoted
        };

        let name = collapse_whitespace(&name);
        if is_usable(&name) {
            return name;
        }
    }

    strip_invalid(raw)
}

/// replaces invalid characters and collapses whitespace, without quote handling.
///
/// never returns an empty name or one made only of dots.
pub fn strip_invalid(raw: &str) -> String {
    let name = collapse_whitespace(&replace_invalid(raw));
    if is_usable(&name) {
        name
    } else {
        FALLBACK_NAME.to_string()
    }
}

fn replace_invalid(raw: &str) -> String {
    raw.chars()
        .map(|c| if INVALID_CHARS.contains(&c) { ' ' } else { c })
        .collect()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && !name.chars().all(|c| c == '.')
}
