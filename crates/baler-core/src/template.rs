//! Archive name patterns and their substitution context.
//!
//! # Tokens
//!
//! - `%i` expands to the probed slot index.
//! - `%d{FORMAT}` expands the cycle timestamp with a strftime `FORMAT`.
//! - `%%` produces a literal percent sign.
//! - `${name}` looks the name up in the [`SubstitutionContext`]; unknown
//!   references render verbatim.
//!
//! Patterns are parsed once up front so malformed tokens surface at
//! configuration time instead of mid-cycle.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};

#[derive(Clone, Debug)]
enum Segment {
    Literal(String),
    Index,
    Date(String),
    Variable(String),
}

/// Immutable name-to-value lookup backing `${name}` references.
///
/// The context is captured when built; later environment changes do not
/// leak into renders.
#[derive(Clone, Debug, Default)]
pub struct SubstitutionContext {
    vars: BTreeMap<String, String>,
}

impl SubstitutionContext {
    /// Empty context; every `${name}` reference renders verbatim.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Context seeded with a snapshot of the process environment.
    #[must_use]
    pub fn with_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Add or replace a single variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Look up a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Parsed archive name pattern.
#[derive(Clone, Debug)]
pub struct NamePattern {
    pattern: String,
    segments: Vec<Segment>,
}

impl NamePattern {
    /// Parse `pattern` into renderable segments.
    ///
    /// # Errors
    ///
    /// Returns an error describing the offending byte position when the
    /// pattern contains an unknown `%` token, a dangling `%`, a `%d` without
    /// a `{FORMAT}` group, an unclosed group, an unclosed `${` reference, or
    /// a strftime specifier chrono does not support.
    pub fn parse(pattern: &str) -> CoreResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((position, ch)) = chars.next() {
            match ch {
                '%' => match chars.next() {
                    Some((_, '%')) => literal.push('%'),
                    Some((_, 'i')) => {
                        flush_literal(&mut literal, &mut segments);
                        segments.push(Segment::Index);
                    }
                    Some((_, 'd')) => {
                        if !matches!(chars.peek(), Some((_, '{'))) {
                            return Err(CoreError::template(
                                "date token requires a {FORMAT} group",
                                pattern,
                                position,
                            ));
                        }
                        chars.next();
                        let format = read_group(&mut chars).ok_or_else(|| {
                            CoreError::template("unclosed date format group", pattern, position)
                        })?;
                        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
                            return Err(CoreError::template(
                                "unsupported strftime specifier",
                                pattern,
                                position,
                            ));
                        }
                        flush_literal(&mut literal, &mut segments);
                        segments.push(Segment::Date(format));
                    }
                    Some(_) => {
                        return Err(CoreError::template("unknown % token", pattern, position));
                    }
                    None => {
                        return Err(CoreError::template(
                            "dangling % at end of pattern",
                            pattern,
                            position,
                        ));
                    }
                },
                '$' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        let name = read_group(&mut chars).ok_or_else(|| {
                            CoreError::template("unclosed variable reference", pattern, position)
                        })?;
                        flush_literal(&mut literal, &mut segments);
                        segments.push(Segment::Variable(name));
                    } else {
                        literal.push('$');
                    }
                }
                other => literal.push(other),
            }
        }
        flush_literal(&mut literal, &mut segments);

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Render the pattern for a slot index and cycle timestamp.
    #[must_use]
    pub fn render(&self, index: u32, now: DateTime<Utc>, context: &SubstitutionContext) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Index => out.push_str(&index.to_string()),
                Segment::Date(format) => out.push_str(&now.format(format).to_string()),
                Segment::Variable(name) => match context.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }

    /// The pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn read_group(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    let mut group = String::new();
    for (_, ch) in chars.by_ref() {
        if ch == '}' {
            return Some(group);
        }
        group.push(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 53).unwrap()
    }

    fn template_position(pattern: &str) -> usize {
        match NamePattern::parse(pattern).expect_err("pattern should fail") {
            CoreError::Template { position, .. } => position,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn renders_index_date_and_literals() -> Result<()> {
        let pattern = NamePattern::parse("logs/archive-%i-%d{%Y%m%d}.zip")?;
        let rendered = pattern.render(3, fixed_now(), &SubstitutionContext::new());
        assert_eq!(rendered, "logs/archive-3-20240314.zip");
        assert_eq!(pattern.as_str(), "logs/archive-%i-%d{%Y%m%d}.zip");
        Ok(())
    }

    #[test]
    fn escaped_percent_is_literal() -> Result<()> {
        let pattern = NamePattern::parse("usage-100%%-%i.zip")?;
        let rendered = pattern.render(7, fixed_now(), &SubstitutionContext::new());
        assert_eq!(rendered, "usage-100%-7.zip");
        Ok(())
    }

    #[test]
    fn variables_substitute_from_the_context() -> Result<()> {
        let context = SubstitutionContext::new().with_var("app", "payments");
        let pattern = NamePattern::parse("${app}-${missing}-%i.zip")?;
        let rendered = pattern.render(0, fixed_now(), &context);
        assert_eq!(rendered, "payments-${missing}-0.zip");
        Ok(())
    }

    #[test]
    fn bare_dollar_is_literal() -> Result<()> {
        let pattern = NamePattern::parse("cost$5-%i.zip")?;
        let rendered = pattern.render(2, fixed_now(), &SubstitutionContext::new());
        assert_eq!(rendered, "cost$5-2.zip");
        Ok(())
    }

    #[test]
    fn malformed_tokens_report_their_position() {
        assert_eq!(template_position("%x"), 0);
        assert_eq!(template_position("abc%"), 3);
        assert_eq!(template_position("%d.zip"), 0);
        assert_eq!(template_position("ok-%d{%Y"), 3);
        assert_eq!(template_position("ok-${open"), 3);
        assert_eq!(template_position("%d{%Q}"), 0);
    }

    #[test]
    fn with_var_replaces_without_mutating_the_original() {
        let context = SubstitutionContext::new().with_var("stage", "blue");
        let replaced = context.clone().with_var("stage", "green");
        assert_eq!(context.get("stage"), Some("blue"));
        assert_eq!(replaced.get("stage"), Some("green"));
        assert_eq!(context.get("absent"), None);
    }
}
