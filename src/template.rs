//! Line-by-line comparison of candidate text against a reference template.
//!
//! A reference template is plain text in which exactly one line carries the
//! `{license_date}` placeholder. That line is the only one allowed to differ
//! from the reference, and only by the copyright years substituted for the
//! placeholder. Every other line must match exactly.

use regex::Regex;
use std::sync::OnceLock;

pub const PLACEHOLDER: &str = "{license_date}";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Reference template has no {{license_date}} placeholder")]
    MissingPlaceholder,
    #[error("Reference template has placeholders on lines {first} and {second}")]
    DuplicatePlaceholder { first: usize, second: usize },
    #[error("Invalid year pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// How the copyright years in the variable line are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearPolicy {
    /// Accept `20YY-<current_year>` or a bare `<current_year>`.
    Tolerant { current_year: i32 },
    /// Accept exactly this text in place of the placeholder.
    Exact(String),
}

impl YearPolicy {
    fn pattern(&self) -> String {
        match self {
            YearPolicy::Tolerant { current_year } => {
                format!(r"(?:20[0-9]{{2}}-{current_year}|{current_year})")
            }
            YearPolicy::Exact(text) => regex::escape(text),
        }
    }
}

/// Why a candidate block was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("does not match reference")]
    DoesNotMatch,
    #[error("incorrect copyright years or does not match reference")]
    IncorrectYears,
    #[error("header missing/too short")]
    HeaderTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Mismatch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
    variable_line: usize,
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{license_date\}").expect("placeholder regex must compile"))
}

impl Template {
    /// Parse reference text, locating the single line holding the placeholder.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();

        let mut variable_line = None;
        for (idx, line) in lines.iter().enumerate() {
            if !placeholder_re().is_match(line) {
                continue;
            }
            if let Some(first) = variable_line {
                return Err(TemplateError::DuplicatePlaceholder { first, second: idx });
            }
            variable_line = Some(idx);
        }

        let variable_line = variable_line.ok_or(TemplateError::MissingPlaceholder)?;

        Ok(Template {
            lines,
            variable_line,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn variable_line(&self) -> usize {
        self.variable_line
    }

    /// The reference text with `years` substituted for the placeholder.
    #[cfg(test)]
    pub fn render(&self, years: &str) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.replace(PLACEHOLDER, years));
            out.push('\n');
        }
        out
    }

    /// Compile the variable line into a fully anchored matcher for `policy`.
    pub fn matcher(&self, policy: &YearPolicy) -> Result<TemplateMatcher<'_>, TemplateError> {
        let reference = &self.lines[self.variable_line];
        let (before, after) = reference
            .split_once(PLACEHOLDER)
            .ok_or(TemplateError::MissingPlaceholder)?;

        let pattern = format!(
            "^{}{}{}$",
            regex::escape(before),
            policy.pattern(),
            regex::escape(after)
        );

        Ok(TemplateMatcher {
            template: self,
            year_line: Regex::new(&pattern)?,
        })
    }
}

/// A template paired with the compiled pattern for its variable line.
#[derive(Debug)]
pub struct TemplateMatcher<'a> {
    template: &'a Template,
    year_line: Regex,
}

impl TemplateMatcher<'_> {
    pub fn template(&self) -> &Template {
        self.template
    }

    /// Compare `candidate` against the reference, position by position.
    ///
    /// Missing or extra lines on either side are never tolerated.
    pub fn verify<S: AsRef<str>>(&self, candidate: &[S]) -> Verdict {
        let reference = &self.template.lines;
        let len = candidate.len().max(reference.len());

        for idx in 0..len {
            let (Some(actual), Some(expected)) = (candidate.get(idx), reference.get(idx)) else {
                return Verdict::Invalid(Mismatch::DoesNotMatch);
            };
            let actual = actual.as_ref();

            if idx == self.template.variable_line {
                if !self.year_line.is_match(actual) {
                    return Verdict::Invalid(Mismatch::IncorrectYears);
                }
            } else if actual != expected {
                return Verdict::Invalid(Mismatch::DoesNotMatch);
            }
        }

        Verdict::Valid
    }
}
