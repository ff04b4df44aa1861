//! Label selectors
//!
//! Parses the equality-based and set-based selector grammar used by list
//! operations: `env=prod`, `tier!=cache`, `app in (web, api)`,
//! `region notin (eu)`, `release` (exists), `!canary` (does not exist),
//! joined by commas. An empty selector string matches everything.
//!
//! Selectors are parsed fresh for every list call and are never cached.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Maximum length of a label key name segment or value
const MAX_LABEL_LENGTH: usize = 63;

/// Comparison applied by a single requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

/// One parsed requirement, e.g. `app in (web, api)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub key: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Requirement {
    /// Whether a label map satisfies this requirement.
    ///
    /// `NotEquals` and `NotIn` are satisfied by objects that do not carry
    /// the key at all.
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self.operator {
            Operator::Exists => labels.contains_key(&self.key),
            Operator::DoesNotExist => !labels.contains_key(&self.key),
            Operator::Equals => labels.get(&self.key) == self.values.first(),
            Operator::NotEquals => labels.get(&self.key) != self.values.first(),
            Operator::In => labels
                .get(&self.key)
                .is_some_and(|v| self.values.contains(v)),
            Operator::NotIn => labels
                .get(&self.key)
                .map_or(true, |v| !self.values.contains(v)),
        }
    }
}

/// A parsed label-matching predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// The selector that matches every object.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Whether this selector places no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Parse a selector string.
    ///
    /// Whitespace around requirements, operators and values is ignored.
    /// An empty (or all-whitespace) input yields [`Selector::everything`].
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::everything());
        }

        let invalid = |reason: String| Error::InvalidSelector {
            selector: input.to_string(),
            reason,
        };

        let mut requirements = Vec::new();
        for part in split_requirements(trimmed).map_err(&invalid)? {
            requirements.push(parse_requirement(part).map_err(&invalid)?);
        }

        Ok(Self { requirements })
    }

    /// Whether a label map satisfies every requirement.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

/// Split the input at top-level commas, leaving `in (a, b)` value lists
/// intact.
fn split_requirements(input: &str) -> std::result::Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced ')'".to_string())?;
            }
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unbalanced '('".to_string());
    }
    parts.push(&input[start..]);
    Ok(parts)
}

fn parse_requirement(part: &str) -> std::result::Result<Requirement, String> {
    let part = part.trim();
    if part.is_empty() {
        return Err("empty requirement".to_string());
    }

    if let Some(rest) = part.strip_prefix('!') {
        let key = rest.trim();
        validate_key(key)?;
        return Ok(Requirement {
            key: key.to_string(),
            operator: Operator::DoesNotExist,
            values: Vec::new(),
        });
    }

    if let Some(open) = part.find('(') {
        return parse_set_requirement(part, open);
    }

    if let Some((key, value)) = part.split_once("!=") {
        return equality_requirement(key, value, Operator::NotEquals);
    }
    if let Some((key, value)) = part.split_once("==") {
        return equality_requirement(key, value, Operator::Equals);
    }
    if let Some((key, value)) = part.split_once('=') {
        return equality_requirement(key, value, Operator::Equals);
    }

    if let Some((_key, op)) = part.rsplit_once(char::is_whitespace) {
        if op == "in" || op == "notin" {
            return Err(format!("expected '(' after {:?}", op));
        }
        return Err(format!("unrecognized requirement {:?}", part));
    }

    validate_key(part)?;
    Ok(Requirement {
        key: part.to_string(),
        operator: Operator::Exists,
        values: Vec::new(),
    })
}

fn equality_requirement(
    key: &str,
    value: &str,
    operator: Operator,
) -> std::result::Result<Requirement, String> {
    let key = key.trim();
    let value = value.trim();
    validate_key(key)?;
    validate_value(value)?;
    Ok(Requirement {
        key: key.to_string(),
        operator,
        values: vec![value.to_string()],
    })
}

/// Parse `key in (a, b)` / `key notin (a, b)`; `open` is the index of the
/// opening parenthesis.
fn parse_set_requirement(part: &str, open: usize) -> std::result::Result<Requirement, String> {
    let Some(body) = part[open..].strip_prefix('(').and_then(|s| s.strip_suffix(')')) else {
        return Err(format!("malformed value list in {:?}", part));
    };

    let head = part[..open].trim_end();
    if let Some(key) = strip_operator_word(head, "notin") {
        validate_key(key)?;
        set_requirement(key, Operator::NotIn, body)
    } else if let Some(key) = strip_operator_word(head, "in") {
        validate_key(key)?;
        set_requirement(key, Operator::In, body)
    } else {
        Err(format!("expected 'in' or 'notin' in {:?}", part))
    }
}

/// Strip a trailing operator word, requiring whitespace between it and the
/// key so that keys like `domain` are not misread as `doma in`.
fn strip_operator_word<'a>(head: &'a str, op: &str) -> Option<&'a str> {
    let rest = head.strip_suffix(op)?;
    let rest = rest.strip_suffix(char::is_whitespace)?;
    Some(rest.trim_end())
}

fn set_requirement(
    key: &str,
    operator: Operator,
    body: &str,
) -> std::result::Result<Requirement, String> {
    let mut values = Vec::new();
    for value in body.split(',') {
        let value = value.trim();
        validate_value(value)?;
        values.push(value.to_string());
    }
    if values.is_empty() {
        return Err("empty value list".to_string());
    }
    Ok(Requirement {
        key: key.to_string(),
        operator,
        values,
    })
}

/// Label keys are `name` or `prefix/name`; the name segment is at most 63
/// characters, starts and ends alphanumeric, and uses `-`, `_`, `.`
/// internally.
fn validate_key(key: &str) -> std::result::Result<(), String> {
    if key.is_empty() {
        return Err("empty label key".to_string());
    }
    let name = match key.rsplit_once('/') {
        Some((prefix, name)) => {
            if prefix.is_empty() {
                return Err(format!("empty prefix in label key {:?}", key));
            }
            name
        }
        None => key,
    };
    validate_segment(name, "label key")
}

/// Label values may be empty; non-empty values follow the same charset
/// rules as key name segments.
fn validate_value(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    validate_segment(value, "label value")
}

fn validate_segment(segment: &str, what: &str) -> std::result::Result<(), String> {
    if segment.is_empty() {
        return Err(format!("empty {}", what));
    }
    if segment.len() > MAX_LABEL_LENGTH {
        return Err(format!("{} {:?} exceeds {} characters", what, segment, MAX_LABEL_LENGTH));
    }
    let valid_inner = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.';
    let edges_ok = segment.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && segment.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    if !edges_ok {
        return Err(format!("{} {:?} must start and end alphanumeric", what, segment));
    }
    if !segment.chars().all(valid_inner) {
        return Err(format!("invalid character in {} {:?}", what, segment));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_string_matches_everything() {
        let selector = Selector::parse("").unwrap();
        assert!(selector.is_empty());
        assert!(selector.matches(&labels(&[])));
        assert!(selector.matches(&labels(&[("app", "web")])));
    }

    #[test]
    fn test_equality_and_double_equals() {
        for input in ["app=web", "app == web", " app=web "] {
            let selector = Selector::parse(input).unwrap();
            assert!(selector.matches(&labels(&[("app", "web")])), "{input}");
            assert!(!selector.matches(&labels(&[("app", "api")])), "{input}");
            assert!(!selector.matches(&labels(&[])), "{input}");
        }
    }

    #[test]
    fn test_not_equals_matches_absent_key() {
        let selector = Selector::parse("env!=prod").unwrap();
        assert!(selector.matches(&labels(&[("env", "staging")])));
        assert!(selector.matches(&labels(&[])));
        assert!(!selector.matches(&labels(&[("env", "prod")])));
    }

    #[test]
    fn test_set_requirements() {
        let selector = Selector::parse("app in (web, api)").unwrap();
        assert!(selector.matches(&labels(&[("app", "web")])));
        assert!(selector.matches(&labels(&[("app", "api")])));
        assert!(!selector.matches(&labels(&[("app", "worker")])));
        assert!(!selector.matches(&labels(&[])));

        let selector = Selector::parse("region notin (eu, us)").unwrap();
        assert!(selector.matches(&labels(&[("region", "ap")])));
        assert!(selector.matches(&labels(&[])));
        assert!(!selector.matches(&labels(&[("region", "eu")])));
    }

    #[test]
    fn test_exists_and_does_not_exist() {
        let selector = Selector::parse("release").unwrap();
        assert!(selector.matches(&labels(&[("release", "stable")])));
        assert!(!selector.matches(&labels(&[])));

        let selector = Selector::parse("!canary").unwrap();
        assert!(selector.matches(&labels(&[])));
        assert!(!selector.matches(&labels(&[("canary", "true")])));
    }

    #[test]
    fn test_conjunction_of_requirements() {
        let selector = Selector::parse("app=web,env in (prod, staging),!canary").unwrap();
        assert!(selector.matches(&labels(&[("app", "web"), ("env", "prod")])));
        assert!(!selector.matches(&labels(&[("app", "web"), ("env", "dev")])));
        assert!(!selector.matches(&labels(&[
            ("app", "web"),
            ("env", "prod"),
            ("canary", "1")
        ])));
    }

    #[test]
    fn test_prefixed_key_and_empty_value() {
        let selector = Selector::parse("example.com/team=infra").unwrap();
        assert!(selector.matches(&labels(&[("example.com/team", "infra")])));

        // empty value on the right of '=' is legal
        let selector = Selector::parse("scratch=").unwrap();
        assert!(selector.matches(&labels(&[("scratch", "")])));
        assert!(!selector.matches(&labels(&[("scratch", "full")])));
    }

    #[test]
    fn test_malformed_selectors_fail() {
        for input in [
            "=invalid==",
            "==value",
            "!=x",
            "app in web",
            "in (a)",
            "key in (a",
            "key in a)",
            "a=b,",
            "key&=value",
            "app===web",
        ] {
            let result = Selector::parse(input);
            assert!(
                matches!(result, Err(Error::InvalidSelector { .. })),
                "{:?} should fail to parse",
                input
            );
        }
    }

    #[test]
    fn test_key_named_like_operator_suffix() {
        // a key ending in "in" must not be mistaken for the set operator
        let result = Selector::parse("domain(a)");
        assert!(matches!(result, Err(Error::InvalidSelector { .. })));

        let selector = Selector::parse("domain=web").unwrap();
        assert!(selector.matches(&labels(&[("domain", "web")])));
    }
}
