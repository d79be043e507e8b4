//! Column references inside filter expressions.

use crate::engine::precompute::LAG1_PREFIX;
use crate::indicators::Specifier;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Words of the expression language that are never column names.
const KEYWORDS: [&str; 9] = ["and", "or", "not", "in", "is", "true", "false", "none", "nan"];

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("word pattern is valid"))
}

fn quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"'[^']*'|"[^"]*""#).expect("quote pattern is valid"))
}

fn crossover_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-z0-9_]+?)_keser_([a-z0-9_]+)_(yukari|asagi)$")
            .expect("crossover pattern is valid")
    })
}

fn letter_digit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z])([0-9])|([0-9])([A-Za-z])").expect("boundary pattern is valid")
    })
}

/// Every `[A-Za-z0-9_]+` run in `text` that is not a pure number, in order of
/// first appearance, without duplicates.
pub fn extract_referenced_columns(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    word_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| !word.bytes().all(|b| b.is_ascii_digit()))
        .filter(|word| seen.insert(*word))
        .map(str::to_owned)
        .collect()
}

/// Identifiers in `text` that must resolve to table columns.
///
/// Narrower than [`extract_referenced_columns`]: skips quoted strings,
/// keywords, numeric literals, function and method names (`name(`),
/// attributes (`.name`) and local variables (`@name`).
pub fn column_references(text: &str) -> Vec<String> {
    let text = quoted_regex().replace_all(text, |caps: &regex::Captures<'_>| {
        " ".repeat(caps[0].len())
    });
    let bytes = text.as_bytes();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for m in word_regex().find_iter(&text) {
        let word = m.as_str();
        if word.as_bytes()[0].is_ascii_digit() {
            continue;
        }
        if KEYWORDS.contains(&word.to_ascii_lowercase().as_str()) {
            continue;
        }
        let before = text[..m.start()].trim_end().as_bytes().last().copied();
        if matches!(before, Some(b'.') | Some(b'@')) {
            continue;
        }
        let after = bytes[m.end()..]
            .iter()
            .copied()
            .find(|b| !b.is_ascii_whitespace());
        if after == Some(b'(') {
            continue;
        }
        if seen.insert(word.to_owned()) {
            out.push(word.to_owned());
        }
    }
    out
}

/// Insert `_` at every boundary between a letter and a digit:
/// `ema20` → `ema_20`, `rsi14_above50` → `rsi_14_above_50`.
pub fn standardize_name(name: &str) -> String {
    // Two passes: adjacent boundaries (`a1b`) share a character, which a
    // single non-overlapping pass would miss.
    let once = letter_digit_regex().replace_all(name, "${1}${3}_${2}${4}");
    letter_digit_regex()
        .replace_all(&once, "${1}${3}_${2}${4}")
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    /// `yukari`: left crosses above right.
    Up,
    /// `asagi`: left crosses below right.
    Down,
}

/// `<left>_keser_<right>_yukari|asagi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossover {
    pub left: String,
    pub right: String,
    pub direction: CrossDirection,
}

pub fn parse_crossover(name: &str) -> Option<Crossover> {
    let caps = crossover_regex().captures(name)?;
    let direction = match &caps[3] {
        "yukari" => CrossDirection::Up,
        _ => CrossDirection::Down,
    };
    Some(Crossover {
        left: caps[1].to_owned(),
        right: caps[2].to_owned(),
        direction,
    })
}

/// Why a referenced column is absent from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingColumnKind {
    /// A crossover-direction name. These are never materialised; the rule
    /// has to be written against its legs and their `lag1__` helpers.
    NeverDerived,
    /// A column the precompute engine knows how to derive.
    NotYetComputed { specifier: String },
    /// Close to a known or derivable name once letter/digit boundaries are
    /// separated.
    NameMismatch { suggestion: String },
    Unrecognized,
}

impl MissingColumnKind {
    pub fn describe(&self, column: &str) -> String {
        match self {
            MissingColumnKind::NeverDerived => format!(
                "'{column}' is a crossover name and is never materialised; compare its legs and their {LAG1_PREFIX} helpers instead"
            ),
            MissingColumnKind::NotYetComputed { specifier } => {
                format!("'{column}' has not been computed (derivable from '{specifier}')")
            }
            MissingColumnKind::NameMismatch { suggestion } => {
                format!("'{column}' not found; did you mean '{suggestion}'?")
            }
            MissingColumnKind::Unrecognized => format!("'{column}' is not a known column"),
        }
    }
}

/// Classify a column that a filter references but the table lacks.
pub fn classify_missing(column: &str, known: &[String]) -> MissingColumnKind {
    if parse_crossover(column).is_some() {
        return MissingColumnKind::NeverDerived;
    }
    if let Some(specifier) = derivable_from(column, known) {
        return MissingColumnKind::NotYetComputed { specifier };
    }
    let standardized = standardize_name(column);
    if standardized != column
        && (known.iter().any(|k| k == &standardized) || derivable_from(&standardized, known).is_some())
    {
        return MissingColumnKind::NameMismatch {
            suggestion: standardized,
        };
    }
    MissingColumnKind::Unrecognized
}

fn derivable_from(column: &str, known: &[String]) -> Option<String> {
    if let Some(base) = column.strip_prefix(LAG1_PREFIX) {
        if known.iter().any(|k| k == base) {
            return Some(column.to_owned());
        }
        return derivable_from(base, known).map(|_| column.to_owned());
    }
    Specifier::from_column(column).map(|spec| spec.to_string())
}
