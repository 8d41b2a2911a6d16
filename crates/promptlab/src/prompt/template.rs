//! Single-string templates with `{name}` placeholders.

use crate::{Error, Result};
use std::collections::BTreeMap;

// ── Variables ──────────────────────────────────────────────────────

/// Mapping of template variable name to literal value.
///
/// Extra variables that a template never references are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables(BTreeMap<String, String>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable (builder pattern).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ── PromptTemplate ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A text pattern with named placeholders.
///
/// A placeholder is `{` + identifier + `}`, where an identifier is ASCII
/// letters, digits, and `_` not starting with a digit. `{{` and `}}` render
/// as literal braces. Any other brace is kept as written.
///
/// # Example
///
/// ```
/// use promptlab::prompt::{PromptTemplate, Variables};
///
/// let template = PromptTemplate::new("Tell me a joke about {topic}");
/// assert_eq!(template.input_variables(), vec!["topic"]);
///
/// let text = template
///     .format(&Variables::new().with("topic", "bears"))
///     .unwrap();
/// assert_eq!(text, "Tell me a joke about bears");
///
/// assert!(template.format(&Variables::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse `source` into literal and placeholder segments.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = parse_segments(&source);
        Self { source, segments }
    }

    /// Placeholder names in first-seen order, without duplicates.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Substitute every placeholder from `vars`.
    ///
    /// Fails with [`Error::MissingVariable`] on the first placeholder that
    /// `vars` does not define.
    pub fn format(&self, vars: &Variables) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = vars.get(name).ok_or_else(|| Error::MissingVariable {
                        name: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_identifier(chars: &[char]) -> bool {
    match chars.first() {
        Some(c) if c.is_ascii_alphabetic() || *c == '_' => chars
            .iter()
            .all(|c| c.is_ascii_alphanumeric() || *c == '_'),
        _ => false,
    }
}

fn parse_segments(source: &str) -> Vec<Segment> {
    let chars: Vec<char> = source.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match (c, next) {
            ('{', Some('{')) | ('}', Some('}')) => {
                literal.push(c);
                i += 2;
            }
            ('{', _) => {
                let close = chars[i + 1..].iter().position(|&ch| ch == '}' || ch == '{');
                match close {
                    Some(offset) if chars[i + 1 + offset] == '}' => {
                        let name = &chars[i + 1..i + 1 + offset];
                        if is_identifier(name) {
                            if !literal.is_empty() {
                                segments.push(Segment::Literal(std::mem::take(&mut literal)));
                            }
                            segments.push(Segment::Variable(name.iter().collect()));
                            i += offset + 2;
                        } else {
                            literal.push(c);
                            i += 1;
                        }
                    }
                    _ => {
                        literal.push(c);
                        i += 1;
                    }
                }
            }
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_placeholders() {
        let template = PromptTemplate::new("Name: {name}\nLocation: {location}");
        let vars = Variables::new()
            .with("name", "Alice")
            .with("location", "New York");
        assert_eq!(
            template.format(&vars).unwrap(),
            "Name: Alice\nLocation: New York"
        );
    }

    #[test]
    fn missing_variable_is_configuration_error() {
        let template = PromptTemplate::new("What is a classic dish from {location}?");
        let err = template.format(&Variables::new()).unwrap_err();
        assert!(err.is_configuration());
        match err {
            Error::MissingVariable { name } => assert_eq!(name, "location"),
            other => panic!("expected MissingVariable, got {other:?}"),
        }
    }

    #[test]
    fn extra_variables_are_ignored() {
        let template = PromptTemplate::new("Hi {name}");
        let vars = Variables::new().with("name", "Bob").with("unused", "x");
        assert_eq!(template.format(&vars).unwrap(), "Hi Bob");
    }

    #[test]
    fn repeated_placeholder_listed_once() {
        let template = PromptTemplate::new("{a} and {b} and {a}");
        assert_eq!(template.input_variables(), vec!["a", "b"]);
        let vars = Variables::new().with("a", "1").with("b", "2");
        assert_eq!(template.format(&vars).unwrap(), "1 and 2 and 1");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template = PromptTemplate::new("JSON: {{\"k\": {value}}}");
        assert_eq!(template.input_variables(), vec!["value"]);
        let out = template
            .format(&Variables::new().with("value", "1"))
            .unwrap();
        assert_eq!(out, "JSON: {\"k\": 1}");
    }

    #[test]
    fn non_identifier_braces_are_kept() {
        let template = PromptTemplate::new("set {} and { spaced } and {1abc} and {open");
        assert!(template.input_variables().is_empty());
        assert_eq!(
            template.format(&Variables::new()).unwrap(),
            "set {} and { spaced } and {1abc} and {open"
        );
    }

    #[test]
    fn values_are_substituted_literally() {
        // A value that looks like a placeholder is not expanded again.
        let template = PromptTemplate::new("Say {word}");
        let out = template
            .format(&Variables::new().with("word", "{other}"))
            .unwrap();
        assert_eq!(out, "Say {other}");
    }

    #[test]
    fn no_placeholder_marker_remains() {
        let template = PromptTemplate::new("{greeting}, {name}! Welcome to {place}.");
        let vars: Variables = [
            ("greeting", "Hello"),
            ("name", "Ann"),
            ("place", "Rome"),
        ]
        .into_iter()
        .collect();
        let out = template.format(&vars).unwrap();
        for name in template.input_variables() {
            assert!(!out.contains(&format!("{{{name}}}")));
        }
        assert_eq!(out, "Hello, Ann! Welcome to Rome.");
    }

    #[test]
    fn non_ascii_text_survives() {
        let template = PromptTemplate::new("Café {dish} — très bien");
        let out = template
            .format(&Variables::new().with("dish", "crêpe"))
            .unwrap();
        assert_eq!(out, "Café crêpe — très bien");
    }
}
