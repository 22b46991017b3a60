//! Template pattern compiler.
//!
//! A pattern template is a regular expression that may reference context
//! variables with `${NAME}` placeholders:
//!
//! ```text
//! ${SERVICE}-${STAGE}-.*
//! ```
//!
//! Compilation is two steps and nothing more: placeholders are replaced with
//! the regex-escaped value of the named context variable, then the result is
//! compiled with the `regex` crate and anchored to the whole candidate. No
//! other expression syntax is recognised inside a placeholder.

use std::fmt;

use regex::Regex;
use tracing::warn;

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    policy::PolicyContext,
};

/// A compiled, fully anchored pattern.
///
/// Stateless and reusable. `Display` renders the substituted pattern with
/// its implicit anchors, e.g. `/^svc-dev-.*$/`. A top-level alternation is
/// shown grouped, `/^(?:a|b)$/`, since that is what is matched.
#[derive(Debug, Clone)]
pub struct Matcher {
    source: String,
    regex: Regex,
}

impl Matcher {
    /// True when `candidate` matches the pattern in its entirety.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// The pattern after substitution, without anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if has_top_level_alternation(&self.source) {
            write!(f, "/^(?:{})$/", self.source)
        } else {
            write!(f, "/^{}$/", self.source)
        }
    }
}

/// True when `source` has a `|` outside every group and character class.
/// `source` must already be a valid regular expression.
fn has_top_level_alternation(source: &str) -> bool {
    let mut chars = source.chars();
    let mut groups = 0usize;
    let mut classes = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => {
                classes += 1;
                // A leading `]` (after an optional `^`) is a literal member.
                let mut rest = chars.clone();
                match rest.next() {
                    Some('^') if rest.clone().next() == Some(']') => {
                        chars.nth(1);
                    }
                    Some(']') => {
                        chars.next();
                    }
                    _ => {}
                }
            }
            ']' if classes > 0 => classes -= 1,
            _ if classes > 0 => {}
            '(' => groups += 1,
            ')' => groups = groups.saturating_sub(1),
            '|' if groups == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Substitute `context` into `template` and compile the result.
///
/// # Errors
///
/// `SafeguardError::PatternCompile` when a placeholder is unterminated or
/// has an invalid name, names a variable `context` does not declare, or the
/// substituted pattern is not a valid regular expression.
pub fn compile(template: &str, context: &PolicyContext) -> SafeguardResult<Matcher> {
    let source = substitute(template, context)?;

    // Validate on its own first: a pattern like `a)|(b` is unbalanced by
    // itself but would parse once wrapped in the anchoring group.
    Regex::new(&source).map_err(|e| compile_error(template, e.to_string()))?;
    let regex =
        Regex::new(&format!("^(?:{source})$")).map_err(|e| compile_error(template, e.to_string()))?;

    Ok(Matcher { source, regex })
}

fn substitute(template: &str, context: &PolicyContext) -> SafeguardResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| compile_error(template, "unterminated '${' placeholder".to_string()))?;
        let name = &after[..end];

        if !is_variable_name(name) {
            return Err(compile_error(template, format!("invalid variable name '{name}'")));
        }

        match context.lookup(name) {
            Some(Some(value)) => out.push_str(&regex::escape(value)),
            Some(None) => {
                warn!(
                    variable = %name,
                    template = %template,
                    "pattern references a context variable with no value; substituting empty string"
                );
            }
            None => {
                let known: Vec<&str> = context.names().collect();
                return Err(compile_error(
                    template,
                    format!(
                        "variable '{name}' is not defined (available: {})",
                        known.join(", ")
                    ),
                ));
            }
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn compile_error(template: &str, reason: String) -> SafeguardError {
    SafeguardError::PatternCompile {
        pattern: template.to_string(),
        reason,
    }
}
