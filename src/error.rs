use memchr::memchr_iter;

/// Syntax violations reported while walking the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected byte")]
    UnexpectedByte,
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("object key must be a string")]
    ExpectedKeyString,
    #[error("expected ':' after object key")]
    ExpectedColon,
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
    #[error("unexpected trailing content")]
    TrailingContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("malformed input: {0}")]
    MalformedInput(SyntaxKind),
    #[error("arena capacity exhausted")]
    AllocationExhausted,
    #[error("address space reservation failed")]
    ReservationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolves a byte offset into 1-based line and column numbers.
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let head = &input[..offset];
        let mut line = 1;
        let mut line_start = 0;
        for idx in memchr_iter(b'\n', head) {
            line += 1;
            line_start = idx + 1;
        }
        Self {
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

impl Error {
    pub fn syntax(kind: SyntaxKind, input: &[u8], offset: usize) -> Self {
        let location = Location::from_offset(input, offset);
        let message = match input.get(offset) {
            Some(&byte) if kind == SyntaxKind::UnexpectedByte => format!(
                "{kind} {:?} at line {}, column {}",
                byte as char, location.line, location.column
            ),
            _ => format!("{kind} at line {}, column {}", location.line, location.column),
        };
        Self {
            kind: ErrorKind::MalformedInput(kind),
            message,
            location: Some(location),
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::AllocationExhausted,
            message: message.into(),
            location: None,
        }
    }

    pub fn reservation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ReservationFailed,
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, input: &[u8], offset: usize) -> Self {
        if self.location.is_none() {
            self.location = Some(Location::from_offset(input, offset));
        }
        self
    }

    pub fn syntax_kind(&self) -> Option<SyntaxKind> {
        match self.kind {
            ErrorKind::MalformedInput(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedInput(_))
    }

    pub fn offset(&self) -> Option<usize> {
        self.location.map(|location| location.offset)
    }
}
