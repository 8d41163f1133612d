//! Front-matter document rendering
//!
//! Produces the page-bundle documents consumed by the static-site generator:
//!
//! ```text
//! ---
//! title: Summer Trip
//! date: 2025-07-04
//! resources:
//!   - src: beach.jpg
//!     title: "Low tide: 6am"
//! ---
//!
//! Two weeks on the coast.
//! ```

use serde::Serialize;

/// Characters that force a scalar to be double-quoted
const RESERVED_CHARS: &[char] = &[
    ':', '{', '}', '[', ']', ',', '"', '\'', '#', '&', '*', '!', '|', '>', '%', '@', '`',
];

/// Control characters that would break a bare scalar across lines
const CONTROL_CHARS: &[char] = &['\n', '\r', '\t'];

/// A gallery resource entry: one downloaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Local (sanitized) filename
    pub src: String,
    /// Caption from the remote description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Resource {
    /// Creates a resource, dropping an empty title
    pub fn new(src: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            src: src.into(),
            title: title.filter(|t| !t.is_empty()).map(str::to_string),
        }
    }
}

/// Escapes a scalar for the front matter.
///
/// Returns `value` unchanged unless it contains a reserved character, in
/// which case it is wrapped in double quotes with backslashes and quotes
/// escaped.
pub fn yaml_escape(value: &str) -> String {
    if !value.contains(RESERVED_CHARS) && !value.contains(CONTROL_CHARS) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Renders one gallery document.
///
/// Resources are emitted in the order given. The body is trimmed and
/// omitted when empty. The output always ends with exactly one newline.
pub fn render_document(title: &str, date: &str, resources: &[Resource], body: &str) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("title: {}", yaml_escape(title)),
        format!("date: {date}"),
    ];

    if !resources.is_empty() {
        lines.push("resources:".to_string());
        for resource in resources {
            lines.push(format!("  - src: {}", resource.src));
            if let Some(title) = resource.title.as_deref().filter(|t| !t.is_empty()) {
                lines.push(format!("    title: {}", yaml_escape(title)));
            }
        }
    }

    lines.push("---".to_string());

    let body = body.trim();
    if !body.is_empty() {
        lines.push(String::new());
        lines.push(body.to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Renders the top-level listing document (`_index.md`).
pub fn render_listing(title: &str) -> String {
    format!("---\ntitle: {}\n---\n", yaml_escape(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct FrontMatter {
        title: String,
        date: String,
        #[serde(default)]
        resources: Vec<ParsedResource>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct ParsedResource {
        src: String,
        title: Option<String>,
    }

    fn front_matter(doc: &str) -> FrontMatter {
        let inner = doc
            .strip_prefix("---\n")
            .and_then(|rest| rest.split("\n---\n").next())
            .expect("document has front matter");
        serde_yaml::from_str(inner).expect("front matter parses as YAML")
    }

    #[test]
    fn escape_plain_title_is_bare() {
        assert_eq!(yaml_escape("Summer Trip"), "Summer Trip");
    }

    #[test]
    fn escape_colon_forces_quotes() {
        assert_eq!(yaml_escape("Day 1: Arrival"), "\"Day 1: Arrival\"");
    }

    #[test]
    fn escape_every_reserved_char() {
        for c in RESERVED_CHARS {
            let value = format!("a{c}b");
            let escaped = yaml_escape(&value);
            assert!(escaped.starts_with('"'), "{c} should force quoting");
            assert!(escaped.ends_with('"'));
        }
    }

    #[test]
    fn escape_quotes_and_backslashes() {
        assert_eq!(
            yaml_escape(r#"She said "hi" \o/"#),
            r#""She said \"hi\" \\o/""#
        );
    }

    #[test]
    fn escape_backslash_alone_stays_bare() {
        assert_eq!(yaml_escape(r"C\D"), r"C\D");
    }

    #[test]
    fn escape_newline_forces_quotes() {
        assert_eq!(yaml_escape("line one\nline two"), "\"line one\\nline two\"");
    }

    #[test]
    fn render_minimal_document() {
        let doc = render_document("Summer Trip", "2025-07-04", &[], "");
        assert_eq!(doc, "---\ntitle: Summer Trip\ndate: 2025-07-04\n---\n");
    }

    #[test]
    fn render_full_document() {
        let resources = vec![
            Resource::new("beach.jpg", Some("Low tide: 6am")),
            Resource::new("dunes.png", None),
        ];
        let doc = render_document(
            "Summer Trip",
            "2025-07-04",
            &resources,
            "  Two weeks on the coast.\n\n",
        );
        assert_eq!(
            doc,
            "---\n\
             title: Summer Trip\n\
             date: 2025-07-04\n\
             resources:\n  \
               - src: beach.jpg\n    \
                 title: \"Low tide: 6am\"\n  \
               - src: dunes.png\n\
             ---\n\
             \n\
             Two weeks on the coast.\n"
        );
    }

    #[test]
    fn render_preserves_resource_order() {
        let resources = vec![Resource::new("z.jpg", None), Resource::new("a.jpg", None)];
        let doc = render_document("T", "2025-01-01", &resources, "");
        let z = doc.find("z.jpg").unwrap();
        let a = doc.find("a.jpg").unwrap();
        assert!(z < a);
    }

    #[test]
    fn render_whitespace_body_is_omitted() {
        let doc = render_document("T", "2025-01-01", &[], "   \n ");
        assert!(doc.ends_with("---\n"));
        assert!(!doc.ends_with("\n\n"));
    }

    #[test]
    fn rendered_front_matter_round_trips() {
        let resources = vec![Resource::new("a.jpg", Some("T"))];
        let doc = render_document("Summer Trip", "2025-07-04", &resources, "body");
        let fm = front_matter(&doc);
        assert_eq!(fm.title, "Summer Trip");
        assert_eq!(fm.date, "2025-07-04");
        assert_eq!(
            fm.resources,
            vec![ParsedResource {
                src: "a.jpg".to_string(),
                title: Some("T".to_string()),
            }]
        );
    }

    #[test]
    fn escaped_titles_round_trip() {
        let tricky = r#"Day 1: "Arrival" & {more} \ stuff"#;
        let resources = vec![Resource::new("a.jpg", Some(tricky))];
        let doc = render_document(tricky, "2025-07-04", &resources, "");
        let fm = front_matter(&doc);
        assert_eq!(fm.title, tricky);
        assert_eq!(fm.resources[0].title.as_deref(), Some(tricky));
    }

    #[test]
    fn resource_new_drops_empty_title() {
        assert_eq!(Resource::new("a.jpg", Some("")).title, None);
    }

    #[test]
    fn listing_document() {
        assert_eq!(render_listing("Galleries"), "---\ntitle: Galleries\n---\n");
    }
}
