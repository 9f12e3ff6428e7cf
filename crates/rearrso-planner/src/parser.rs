//! Rearrangement pattern parser
//!
//! Tokenizes and classifies pattern strings like `"(h w) c -> h w c"` into
//! tagged [`AxisToken`]s. Downstream stages match on the token variant and
//! never re-inspect raw strings.

use crate::error::{RearrangeError, SyntaxError};

/// The literal separating the input side from the output side
const SEPARATOR: &str = "->";

/// The ellipsis marker absorbing all axes not otherwise named
const ELLIPSIS: &str = "...";

/// One lexical unit of a pattern side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisToken {
    /// A simple named axis, e.g. `h`
    Name(String),
    /// A parenthesized group of named axes occupying one physical
    /// dimension, e.g. `(h w)`; member order is semantically significant
    Composite(Vec<String>),
    /// The `...` wildcard
    Ellipsis,
    /// The literal `1` marker for a size-1 axis
    Singleton,
}

impl AxisToken {
    /// Check if this token is a composite group
    pub fn is_composite(&self) -> bool {
        matches!(self, AxisToken::Composite(_))
    }

    /// Check if this token is the ellipsis
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, AxisToken::Ellipsis)
    }
}

/// Parsed rearrangement pattern: an ordered input side and output side.
///
/// Immutable after parse.
///
/// # Examples
///
/// ```
/// use rearrso_planner::{AxisToken, Pattern};
///
/// let pattern = Pattern::parse("(h w) c -> h w c").unwrap();
/// assert_eq!(pattern.input.len(), 2);
/// assert_eq!(pattern.output.len(), 3);
/// assert!(pattern.input[0].is_composite());
/// assert_eq!(pattern.output[0], AxisToken::Name("h".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Input-side tokens, left to right
    pub input: Vec<AxisToken>,
    /// Output-side tokens, left to right
    pub output: Vec<AxisToken>,
}

impl Pattern {
    /// Parse a pattern string
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_planner::Pattern;
    ///
    /// let pattern = Pattern::parse("b h w c -> b (h w) c").unwrap();
    /// assert_eq!(pattern.input.len(), 4);
    ///
    /// assert!(Pattern::parse("h w").is_err());
    /// assert!(Pattern::parse("(h (w)) -> h w").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, RearrangeError> {
        let parts: Vec<&str> = pattern.split(SEPARATOR).collect();

        if parts.len() < 2 {
            return Err(SyntaxError::MissingSeparator.into());
        }
        if parts.len() > 2 {
            return Err(SyntaxError::MultipleSeparators.into());
        }

        let input = parse_side(parts[0])?;
        let output = parse_side(parts[1])?;

        Ok(Self { input, output })
    }
}

/// Tokenize and classify one side of a pattern
fn parse_side(side: &str) -> Result<Vec<AxisToken>, SyntaxError> {
    let units = split_units(side)?;

    let mut tokens = Vec::with_capacity(units.len());
    let mut seen: Vec<String> = Vec::new();
    let mut ellipsis_seen = false;

    for unit in &units {
        let token = classify(unit, side)?;

        match &token {
            AxisToken::Ellipsis => {
                if ellipsis_seen {
                    return Err(SyntaxError::MultipleEllipsis);
                }
                ellipsis_seen = true;
            }
            AxisToken::Name(name) => check_unique(&mut seen, name)?,
            AxisToken::Composite(members) => {
                for member in members {
                    check_unique(&mut seen, member)?;
                }
            }
            AxisToken::Singleton => {}
        }

        tokens.push(token);
    }

    Ok(tokens)
}

/// Split a pattern side into whitespace-delimited units, except that
/// whitespace inside a parenthesized group does not delimit: the whole
/// group is one unit.
fn split_units(side: &str) -> Result<Vec<String>, SyntaxError> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;

    for ch in side.trim().chars() {
        match ch {
            '(' => {
                if depth > 0 {
                    return Err(SyntaxError::NestedGroup {
                        side: side.trim().to_string(),
                    });
                }
                depth += 1;
                current.push(ch);
            }
            ')' => {
                if depth == 0 {
                    return Err(SyntaxError::UnbalancedParens {
                        side: side.trim().to_string(),
                    });
                }
                depth -= 1;
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    units.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if depth != 0 {
        return Err(SyntaxError::UnbalancedParens {
            side: side.trim().to_string(),
        });
    }
    if !current.is_empty() {
        units.push(current);
    }

    Ok(units)
}

/// Classify one raw unit into an [`AxisToken`]
fn classify(unit: &str, side: &str) -> Result<AxisToken, SyntaxError> {
    if unit == ELLIPSIS {
        return Ok(AxisToken::Ellipsis);
    }

    if let Some(rest) = unit.strip_prefix('(') {
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| SyntaxError::UnbalancedParens {
                side: side.trim().to_string(),
            })?;

        let members: Vec<String> = inner.split_whitespace().map(str::to_string).collect();
        if members.is_empty() {
            return Err(SyntaxError::EmptyGroup);
        }
        for member in &members {
            check_name(member)?;
        }
        return Ok(AxisToken::Composite(members));
    }

    if unit == "1" {
        return Ok(AxisToken::Singleton);
    }

    check_name(unit)?;
    Ok(AxisToken::Name(unit.to_string()))
}

/// Axis names are identifiers: `[A-Za-z_][A-Za-z0-9_]*`
fn check_name(name: &str) -> Result<(), SyntaxError> {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');

    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(SyntaxError::InvalidName {
            token: name.to_string(),
        })
    }
}

fn check_unique(seen: &mut Vec<String>, name: &str) -> Result<(), SyntaxError> {
    if seen.iter().any(|s| s == name) {
        return Err(SyntaxError::DuplicateAxis {
            name: name.to_string(),
        });
    }
    seen.push(name.to_string());
    Ok(())
}
