//! Forward-reference detection for rule expressions.
//!
//! A rule may only look at the current bar and the past. The scanner flags
//! text that reaches forward: negative shifts, `lead(...)`, `next_*`
//! identifiers and `t+` offsets. Matching ignores case and tolerates
//! whitespace between tokens.
//!
//! Structured expressions ([`ExprNode`]) are unparsed to canonical text and
//! go through the same scan, so both entry points share one pattern set.

use crate::error::{ConfigError, GuardrailViolation};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

/// Built-in patterns: (label, regex).
const DEFAULT_PATTERNS: [(&str, &str); 4] = [
    ("negative shift", r"\bshift\s*\(\s*(?:periods\s*=\s*)?-\s*0*[1-9]"),
    ("lead operator", r"\blead\s*\("),
    ("next_ identifier", r"\bnext_\w"),
    ("relative future offset", r"\bt\s*\+"),
];

/// One forbidden shape, with a label used in violation messages.
#[derive(Debug, Clone)]
pub struct FutureRefPattern {
    label: String,
    regex: Regex,
}

impl FutureRefPattern {
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::Pattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            label: label.into(),
            regex,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered set of forbidden patterns; the first match wins.
#[derive(Debug, Clone)]
pub struct FutureRefScanner {
    patterns: Vec<FutureRefPattern>,
}

impl Default for FutureRefScanner {
    fn default() -> Self {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|(label, pattern)| {
                FutureRefPattern::new(*label, pattern).expect("built-in pattern is valid")
            })
            .collect();
        Self { patterns }
    }
}

impl FutureRefScanner {
    /// The defaults plus caller-supplied regexes (labelled by their own text).
    pub fn with_extra_patterns<I, S>(extra: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanner = Self::default();
        for pattern in extra {
            let pattern = pattern.as_ref();
            scanner.patterns.push(FutureRefPattern::new(pattern, pattern)?);
        }
        Ok(scanner)
    }

    pub fn patterns(&self) -> &[FutureRefPattern] {
        &self.patterns
    }

    /// First pattern matching `text`, if any.
    pub fn scan(&self, text: &str) -> Option<&FutureRefPattern> {
        self.patterns.iter().find(|p| p.is_match(text))
    }

    pub fn check<E: ExpressionSource + ?Sized>(&self, expr: &E) -> Result<(), GuardrailViolation> {
        let text = expr.canonical_text();
        match self.scan(&text) {
            Some(pattern) => Err(GuardrailViolation::ForwardReference {
                pattern: pattern.label().to_owned(),
                expression: text.into_owned(),
            }),
            None => Ok(()),
        }
    }
}

fn default_scanner() -> &'static FutureRefScanner {
    static SCANNER: OnceLock<FutureRefScanner> = OnceLock::new();
    SCANNER.get_or_init(FutureRefScanner::default)
}

/// Fail if `expr` references data not available at decision time.
pub fn detect_future_refs<E: ExpressionSource + ?Sized>(expr: &E) -> Result<(), GuardrailViolation> {
    default_scanner().check(expr)
}

/// [`detect_future_refs`] with a custom pattern set.
pub fn detect_future_refs_with<E: ExpressionSource + ?Sized>(
    expr: &E,
    scanner: &FutureRefScanner,
) -> Result<(), GuardrailViolation> {
    scanner.check(expr)
}

/// Anything that can be rendered to canonical expression text.
pub trait ExpressionSource {
    fn canonical_text(&self) -> Cow<'_, str>;
}

impl ExpressionSource for str {
    fn canonical_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ExpressionSource for String {
    fn canonical_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl ExpressionSource for ExprNode {
    fn canonical_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

/// Minimal parsed-expression tree, as handed over by an external parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Name(String),
    Number(f64),
    Unary {
        op: String,
        operand: Box<ExprNode>,
    },
    Binary {
        op: String,
        lhs: Box<ExprNode>,
        rhs: Box<ExprNode>,
    },
    Attribute {
        value: Box<ExprNode>,
        attr: String,
    },
    Call {
        func: Box<ExprNode>,
        args: Vec<ExprNode>,
        keywords: Vec<(String, ExprNode)>,
    },
}

impl ExprNode {
    pub fn name(name: impl Into<String>) -> Self {
        ExprNode::Name(name.into())
    }

    pub fn binary(op: impl Into<String>, lhs: ExprNode, rhs: ExprNode) -> Self {
        ExprNode::Binary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `value.method(args...)`
    pub fn method(value: ExprNode, method: impl Into<String>, args: Vec<ExprNode>) -> Self {
        ExprNode::Call {
            func: Box::new(ExprNode::Attribute {
                value: Box::new(value),
                attr: method.into(),
            }),
            args,
            keywords: Vec::new(),
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Name(name) => write!(f, "{name}"),
            ExprNode::Number(n) => write!(f, "{n}"),
            ExprNode::Unary { op, operand } => write!(f, "{op}{operand}"),
            ExprNode::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
            ExprNode::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            ExprNode::Call {
                func,
                args,
                keywords,
            } => {
                write!(f, "{func}(")?;
                let mut first = true;
                for arg in args {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{arg}")?;
                }
                for (key, value) in keywords {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{key}={value}")?;
                }
                write!(f, ")")
            }
        }
    }
}
