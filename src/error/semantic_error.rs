use std::fmt;

use crate::location::SourceLocation;

/// How serious a [`Diagnostic`] is. Only errors block execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// A structured semantic error or warning.
///
/// The fields are kept separate so that a front end can render them in any
/// medium; [`fmt::Display`] gives the plain-text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message:  String,
    pub location: SourceLocation,
    pub hint:     Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}

/// Accumulates diagnostics across semantic passes.
///
/// # Example
/// ```
/// use ktinterp::{error::Diagnostics, location::SourceLocation};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.warning("Unreachable code detected", SourceLocation::new(4, 5), None);
///
/// assert!(!diagnostics.has_errors());
/// assert!(diagnostics.has_warnings());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors:   Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    pub fn error(&mut self,
                 message: impl Into<String>,
                 location: SourceLocation,
                 hint: Option<&str>) {
        self.push(Diagnostic { severity: Severity::Error,
                               message: message.into(),
                               location,
                               hint: hint.map(str::to_string) });
    }

    /// Records a warning.
    pub fn warning(&mut self,
                   message: impl Into<String>,
                   location: SourceLocation,
                   hint: Option<&str>) {
        self.push(Diagnostic { severity: Severity::Warning,
                               message: message.into(),
                               location,
                               hint: hint.map(str::to_string) });
    }

    /// Records a prebuilt diagnostic in the list matching its severity.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Returns errors and warnings together, ordered by position.
    #[must_use]
    pub fn all(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<_> = self.errors.iter().chain(&self.warnings).collect();
        all.sort_by_key(|d| d.location.sort_key());
        all
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    /// Formats every diagnostic as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        if !self.has_errors() && !self.has_warnings() {
            return "No errors or warnings".to_string();
        }

        let mut lines = Vec::new();
        if self.has_errors() {
            lines.push(format!("Found {} error(s):", self.errors.len()));
            lines.extend(self.errors.iter().map(ToString::to_string));
        }
        if self.has_warnings() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("Found {} warning(s):", self.warnings.len()));
            lines.extend(self.warnings.iter().map(ToString::to_string));
        }
        lines.join("\n")
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Builds a redefinition error; `kind` is `function`, `variable` or
/// `parameter`.
#[must_use]
pub fn redefinition(name: &str, kind: &str, location: SourceLocation) -> Diagnostic {
    Diagnostic { severity: Severity::Error,
                 message: format!("Redefinition of {kind} '{name}'"),
                 location,
                 hint: Some("Choose a different name or remove one of the definitions".to_string()) }
}

/// Builds an error for a type annotation naming no known type.
#[must_use]
pub fn unknown_type(name: &str, location: SourceLocation) -> Diagnostic {
    Diagnostic { severity: Severity::Error,
                 message: format!("Unknown type: {name}"),
                 location,
                 hint: Some("Use Int, String, Boolean, or Unit".to_string()) }
}

/// Builds the warning for a statement that can never execute.
#[must_use]
pub fn unreachable_code(location: SourceLocation) -> Diagnostic {
    Diagnostic { severity: Severity::Warning,
                 message: "Unreachable code detected".to_string(),
                 location,
                 hint: Some("Remove this code or fix the control flow".to_string()) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn all_is_sorted_by_position() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(unreachable_code(SourceLocation::new(9, 1)));
        diagnostics.push(redefinition("f", "function", SourceLocation::new(2, 5)));
        diagnostics.push(unknown_type("Double", SourceLocation::new(2, 1)));

        let lines: Vec<_> = diagnostics.all().iter().map(|d| d.location.sort_key()).collect();
        assert_eq!(lines, vec![(2, 1), (2, 5), (9, 1)]);
    }

    #[test]
    fn report_lists_errors_before_warnings() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(unreachable_code(SourceLocation::new(3, 9)));
        diagnostics.push(redefinition("x", "variable", SourceLocation::new(1, 1)));

        let expected = "Found 1 error(s):\n\
                        ERROR: 1:1: Redefinition of variable 'x'\n  \
                        hint: Choose a different name or remove one of the definitions\n\
                        \n\
                        Found 1 warning(s):\n\
                        WARNING: 3:9: Unreachable code detected\n  \
                        hint: Remove this code or fix the control flow";
        assert_eq!(diagnostics.report(), expected);
    }

    #[test]
    fn empty_report() {
        assert_eq!(Diagnostics::new().report(), "No errors or warnings");
    }
}
