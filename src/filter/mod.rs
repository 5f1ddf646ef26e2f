use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{FilterError, Result};
use crate::models::FilterRule;

/// An ordered, compiled view of the enabled rules.
///
/// Rules whose pattern cannot be compiled are dropped here and reported on
/// every outcome; the rest run in collection order, each one seeing the
/// output of the previous.
pub(crate) struct FilterEngine {
    rules: Vec<CompiledRule>,
    skipped: Vec<SkippedRule>,
}

struct CompiledRule {
    id: String,
    regex: Regex,
    replacement: Replacement,
}

enum Replacement {
    /// Capture-group template in `regex` syntax.
    Template(String),
    /// Inserted verbatim.
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SkippedRule {
    pub(crate) id: String,
    pub(crate) pattern: String,
    pub(crate) reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RuleHit {
    pub(crate) id: String,
    pub(crate) matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FilterOutcome {
    pub(crate) text: String,
    pub(crate) matches: usize,
    /// Rules that matched at least once, in application order.
    pub(crate) hits: Vec<RuleHit>,
    pub(crate) skipped: Vec<SkippedRule>,
}

impl FilterEngine {
    pub(crate) fn new(rules: &[FilterRule]) -> Self {
        let mut compiled = Vec::new();
        let mut skipped = Vec::new();

        for rule in rules.iter().filter(|r| r.enabled) {
            if rule.pattern.is_empty() {
                skipped.push(SkippedRule {
                    id: rule.id.clone(),
                    pattern: String::new(),
                    reason: FilterError::EmptyPattern.to_string(),
                });
                continue;
            }
            match compile(&rule.pattern, rule.use_regex) {
                Ok(regex) => {
                    let replacement = if rule.use_regex {
                        Replacement::Template(translate_replacement(&rule.replacement, &regex))
                    } else {
                        Replacement::Literal(rule.replacement.clone())
                    };
                    compiled.push(CompiledRule {
                        id: rule.id.clone(),
                        regex,
                        replacement,
                    });
                }
                Err(e) => {
                    warn!(rule = %rule.id, pattern = %rule.pattern, error = %e, "skipping filter with invalid pattern");
                    skipped.push(SkippedRule {
                        id: rule.id.clone(),
                        pattern: rule.pattern.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(active = compiled.len(), skipped = skipped.len(), "filter engine ready");
        Self {
            rules: compiled,
            skipped,
        }
    }

    pub(crate) fn active_count(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn apply(&self, text: &str) -> FilterOutcome {
        if text.is_empty() {
            return FilterOutcome {
                text: String::new(),
                matches: 0,
                hits: Vec::new(),
                skipped: self.skipped.clone(),
            };
        }

        let (text, hits) = self.rules.iter().fold(
            (text.to_string(), Vec::new()),
            |(current, mut hits), rule| {
                let (next, count) = rule.substitute(&current);
                if count > 0 {
                    debug!(rule = %rule.id, count, "filter matched");
                    hits.push(RuleHit {
                        id: rule.id.clone(),
                        matches: count,
                    });
                }
                (next, hits)
            },
        );

        FilterOutcome {
            text,
            matches: hits.iter().map(|h| h.matches).sum(),
            hits,
            skipped: self.skipped.clone(),
        }
    }
}

impl CompiledRule {
    fn substitute(&self, text: &str) -> (String, usize) {
        let mut count = 0;
        let out = self.regex.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            match &self.replacement {
                Replacement::Literal(s) => s.clone(),
                Replacement::Template(template) => {
                    let mut dst = String::new();
                    caps.expand(template, &mut dst);
                    dst
                }
            }
        });
        (out.into_owned(), count)
    }
}

/// Run the enabled rules over `text` once, without keeping the engine.
pub(crate) fn apply_filters(rules: &[FilterRule], text: &str) -> FilterOutcome {
    FilterEngine::new(rules).apply(text)
}

/// Check a pattern the way the engine will compile it.
pub(crate) fn validate_pattern(pattern: &str, use_regex: bool) -> Result<()> {
    if pattern.is_empty() {
        return Err(FilterError::EmptyPattern);
    }
    compile(pattern, use_regex).map(|_| ())
}

fn compile(pattern: &str, use_regex: bool) -> Result<Regex> {
    let source = if use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Rewrite a `$`-style replacement template into `regex` expansion syntax.
///
/// `$n`/`$nn` refer to a group only when that group exists (two digits are
/// tried first), `$&` is the whole match, `$<name>` a named group, and `$$` a
/// single dollar. Every other `$` is kept literally.
pub(crate) fn translate_replacement(template: &str, regex: &Regex) -> String {
    let groups = regex.captures_len().saturating_sub(1);
    let has_names = regex.capture_names().flatten().next().is_some();
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }

        match chars.get(i + 1).copied() {
            Some('$') => {
                out.push_str("$$");
                i += 2;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 2;
            }
            Some(d) if d.is_ascii_digit() => {
                let first = d.to_digit(10).unwrap_or(0) as usize;
                let two = chars
                    .get(i + 2)
                    .and_then(|c| c.to_digit(10))
                    .map(|second| first * 10 + second as usize);
                match two {
                    Some(n) if n >= 1 && n <= groups => {
                        out.push_str(&format!("${{{n}}}"));
                        i += 3;
                    }
                    _ if first >= 1 && first <= groups => {
                        out.push_str(&format!("${{{first}}}"));
                        i += 2;
                    }
                    _ => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            Some('<') if has_names => {
                let close = chars[i + 2..].iter().position(|&c| c == '>');
                match close {
                    Some(len) => {
                        let name: String = chars[i + 2..i + 2 + len].iter().collect();
                        out.push_str(&format!("${{{name}}}"));
                        i += 3 + len;
                    }
                    None => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            _ => {
                out.push_str("$$");
                i += 1;
            }
        }
    }

    out
}
