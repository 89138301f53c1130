use std::{fmt, sync::Arc};

/// A position in the source text.
///
/// Every token and AST node carries one. Lines and columns are 1-based and
/// columns count characters, not bytes. Locations only feed diagnostics; they
/// never influence evaluation.
///
/// # Example
/// ```
/// use ktinterp::location::SourceLocation;
///
/// let loc = SourceLocation::new(3, 7);
/// assert_eq!(loc.to_string(), "3:7");
///
/// let loc = loc.with_filename("main.kt");
/// assert_eq!(loc.to_string(), "main.kt:3:7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line:     usize,
    pub column:   usize,
    pub filename: Option<Arc<str>>,
}

impl SourceLocation {
    /// Creates a location without a file name.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line,
               column,
               filename: None }
    }

    /// The location of the first character of an anonymous source.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(1, 1)
    }

    /// Returns the same position attributed to `filename`.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Key used to order diagnostics.
    #[must_use]
    pub const fn sort_key(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(file) => write!(f, "{file}:{}:{}", self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}
