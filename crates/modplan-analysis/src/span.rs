use std::path::PathBuf;

/// Half-open range of offsets in a file, counted in UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetSpan {
    pub start: usize,
    pub end: usize,
}

impl OffsetSpan {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span, or touches its end
    #[must_use]
    pub const fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// One location that refers to a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSpan {
    /// Absolute path of the file containing the reference
    pub file: PathBuf,
    pub span: OffsetSpan,
}

impl ReferenceSpan {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, span: OffsetSpan) -> Self {
        Self {
            file: file.into(),
            span,
        }
    }
}

/// A replacement expressed in offsets, as emitted by the analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChange {
    /// Absolute path of the file to edit
    pub file: PathBuf,
    pub span: OffsetSpan,
    pub new_text: String,
}

impl RawChange {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, span: OffsetSpan, new_text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            span,
            new_text: new_text.into(),
        }
    }
}
