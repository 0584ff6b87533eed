//! `@oas:` directives in doc comments.
//!
//! A directive line looks like
//!
//! ```text
//! @oas: kind=response placeholder=T name=%sCollection
//! ```
//!
//! Only the last directive line of a comment counts. Tokens without `=` are
//! ignored, and so are keys other than `kind`, `placeholder` and `name`.

/// Marker that starts a directive.
pub const DIRECTIVE_MARKER: &str = "@oas:";

/// Substitution slot inside a `name` template.
pub const NAME_SLOT: &str = "%s";

/// What a declaration is declared to be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DirectiveKind {
    /// No `kind` key.
    #[default]
    Unspecified,

    /// `kind=response`: a wrapper template expanded per record.
    Response,

    /// Any other value. Has no effect.
    Other(String),
}

impl DirectiveKind {
    fn parse(value: &str) -> Self {
        match value {
            "" => DirectiveKind::Unspecified,
            "response" => DirectiveKind::Response,
            other => DirectiveKind::Other(other.to_string()),
        }
    }

    /// The value as written, empty when unspecified.
    pub fn as_str(&self) -> &str {
        match self {
            DirectiveKind::Unspecified => "",
            DirectiveKind::Response => "response",
            DirectiveKind::Other(value) => value,
        }
    }
}

/// Parsed directive. Missing keys are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// `kind` key.
    pub kind: DirectiveKind,

    /// `placeholder` key: the generic parameter substituted during expansion.
    pub placeholder: String,

    /// `name` key: output name template with one `%s` slot.
    pub name: String,
}

impl Directive {
    /// Parse the authoritative directive out of a doc comment.
    pub fn parse(comment: &str) -> Self {
        let mut directive = Directive::default();

        let Some(line) = comment.lines().filter_map(directive_payload).last() else {
            return directive;
        };

        for token in line.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };

            match key {
                "kind" => directive.kind = DirectiveKind::parse(value),
                "placeholder" => directive.placeholder = value.to_string(),
                "name" => directive.name = value.to_string(),
                _ => {
                    tracing::trace!(key, value, "Ignoring unrecognized directive key");
                }
            }
        }

        directive
    }

    /// Check if this marks a response wrapper.
    pub fn is_response(&self) -> bool {
        self.kind == DirectiveKind::Response
    }

    /// Check if the name template has a substitution slot.
    pub fn has_name_slot(&self) -> bool {
        self.name.contains(NAME_SLOT)
    }

    /// Format the name template for one model.
    ///
    /// Only the first `%s` is replaced. A template without a slot comes back
    /// unchanged.
    pub fn schema_name(&self, model: &str) -> String {
        self.name.replacen(NAME_SLOT, model, 1)
    }
}

/// Text following the marker on a line, if the line has one.
fn directive_payload(line: &str) -> Option<&str> {
    line.find(DIRECTIVE_MARKER)
        .map(|start| &line[start + DIRECTIVE_MARKER.len()..])
}
