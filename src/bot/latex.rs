//! Best-effort rewriting of LaTeX-style math in completion output into plain
//! text. Not a parser: an ordered list of substitutions applied inside matched
//! spans only. Nested braces, multiple integrals in one span and malformed
//! input are out of scope and pass through as-is.

use regex::Regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
    /// Replace only the first occurrence within the span.
    first_only: bool,
}

/// Rewrites integral and fraction expressions into readable plain text,
/// e.g. `\frac{1}{2}` -> `(1 / 2)` and `\int_{0}^{1} x \, dx` -> `∫[0, 1] x dx`.
pub struct Normalizer {
    /// Outer span matcher: an integral up to its differential, or one fraction.
    span: Regex,
    rules: Vec<Rule>,
}

impl Normalizer {
    pub fn new() -> Self {
        let rule = |pattern: &str, replacement: &'static str, first_only: bool| Rule {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
            first_only,
        };

        Self {
            span: Regex::new(r"\\int[\s\S]*?dx|\\frac\{[\s\S]*?\}\{[\s\S]*?\}").unwrap(),
            rules: vec![
                rule(r"\\int_\{(.*?)\}\^\{(.*?)\}", "∫[$1, $2]", false),
                rule(r"\\frac\{(.*?)\}\{(.*?)\}", "($1 / $2)", false),
                rule(r"_\{(.*?)\}", "_$1", false),
                rule(r"\^\{(.*?)\}", "^$1", false),
                rule(r"\\,", " ", false),
                rule(r"\\left\[(.*?)\\right\]", "[$1]", false),
                rule(r"\\right|\\left", "", false),
                rule(r"\\dx|\\d", " dx", false),
                rule(r"\\", "", true),
                rule(r"\s+", " ", false),
            ],
        }
    }

    /// Rewrite every matched span; everything else is untouched.
    pub fn normalize(&self, text: &str) -> String {
        self.span
            .replace_all(text, |caps: &regex::Captures| self.rewrite_span(&caps[0]))
            .into_owned()
    }

    fn rewrite_span(&self, span: &str) -> String {
        let mut out = span.to_string();
        for rule in &self.rules {
            out = if rule.first_only {
                rule.pattern.replace(&out, rule.replacement).into_owned()
            } else {
                rule.pattern.replace_all(&out, rule.replacement).into_owned()
            };
        }
        out
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
