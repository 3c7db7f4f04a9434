use std::borrow::Cow;

const LABEL_MAX_CHARS: usize = 20;
const LABEL_KEEP_CHARS: usize = 17;

/// Canvas label for a node name: names longer than 20 characters keep their
/// first 17 and end in `...`.
pub fn truncate_label(name: &str) -> Cow<'_, str> {
    if name.chars().count() <= LABEL_MAX_CHARS {
        return Cow::Borrowed(name);
    }

    let mut label = name.chars().take(LABEL_KEEP_CHARS).collect::<String>();
    label.push_str("...");
    Cow::Owned(label)
}

pub fn format_location(file: &str, line: u32, column: u32) -> String {
    match (file.is_empty(), line) {
        (true, _) => "-".to_owned(),
        (false, 0) => file.to_owned(),
        (false, line) if column == 0 => format!("{file}:{line}"),
        (false, line) => format!("{file}:{line}:{column}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_names_are_kept() {
        assert_eq!(truncate_label("parse"), "parse");
        assert_eq!(truncate_label("exactly_twenty_chars"), "exactly_twenty_chars");
    }

    #[test]
    fn long_names_are_cut_to_seventeen_plus_ellipsis() {
        let label = truncate_label("handle_incoming_request_batch");

        assert_eq!(label, "handle_incoming_r...");
        assert_eq!(label.chars().count(), 20);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_label("ééééééééééééééééééééé"), "ééééééééééééééééé...");
    }

    #[test]
    fn location_omits_missing_parts() {
        assert_eq!(format_location("", 4, 2), "-");
        assert_eq!(format_location("a.py", 0, 0), "a.py");
        assert_eq!(format_location("a.py", 12, 0), "a.py:12");
        assert_eq!(format_location("a.py", 12, 5), "a.py:12:5");
    }
}
