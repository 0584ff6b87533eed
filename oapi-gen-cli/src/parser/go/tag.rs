//! Struct tag handling.
//!
//! Tags follow the conventional `key:"value" other:"value"` layout.

/// Look up the value stored under `key` in a struct tag.
///
/// Parsing stops at the first malformed pair, like the conventional lookup
/// does.
pub fn lookup<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        if name_len == 0 || !rest[name_len..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        // `rest` starts at the opening quote.
        let mut end = None;
        let mut escaped = false;
        for (i, c) in rest.char_indices().skip(1) {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let end = end?;
        let value = &rest[1..end];
        rest = &rest[end + 1..];

        if name == key {
            return Some(value);
        }
    }
}

/// What a tag says about a field's output name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// No usable name in the tag.
    Absent,
    /// The field is renamed.
    Rename(String),
}

/// Extract the output name from a field tag.
///
/// The name is the first comma-separated segment of the value under `key`,
/// with whitespace removed. `omitempty` and similar options are dropped.
/// A bare `"-"` is kept as the name `-`; fields are never excluded by tag.
pub fn output_name(tag: &str, key: &str) -> TagName {
    let Some(value) = lookup(tag, key) else {
        return TagName::Absent;
    };

    let name: String = value
        .split(',')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match name.as_str() {
        "" => TagName::Absent,
        _ => TagName::Rename(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_multiple_keys() {
        let tag = r#"json:"id" xorm:"pk autoincr""#;
        assert_eq!(lookup(tag, "json"), Some("id"));
        assert_eq!(lookup(tag, "xorm"), Some("pk autoincr"));
        assert_eq!(lookup(tag, "yaml"), None);
    }

    #[test]
    fn test_lookup_stops_at_malformed_pair() {
        assert_eq!(lookup(r#"json "id""#, "json"), None);
        assert_eq!(lookup(r#"json:"id"#, "json"), None);
    }

    #[test]
    fn test_output_name_strips_options() {
        assert_eq!(
            output_name(r#"json:"extras,omitempty""#, "json"),
            TagName::Rename("extras".to_string())
        );
        assert_eq!(
            output_name(r#"json:" created At ""#, "json"),
            TagName::Rename("createdAt".to_string())
        );
    }

    #[test]
    fn test_output_name_absent_or_empty() {
        assert_eq!(output_name(r#"xorm:"pk""#, "json"), TagName::Absent);
        assert_eq!(output_name(r#"json:",omitempty""#, "json"), TagName::Absent);
    }

    #[test]
    fn test_output_name_dash_is_a_name() {
        assert_eq!(output_name(r#"json:"-""#, "json"), TagName::Rename("-".to_string()));
        assert_eq!(output_name(r#"json:"-,""#, "json"), TagName::Rename("-".to_string()));
    }

    #[test]
    fn test_custom_key() {
        let tag = r#"json:"id" yaml:"identifier""#;
        assert_eq!(output_name(tag, "yaml"), TagName::Rename("identifier".to_string()));
    }
}
