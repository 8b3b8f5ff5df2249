use std::ops::Range;

/// Assembly diagnostic kinds, in the order the passes detect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Layout pass
    UnknownInstruction,
    InvalidLabel,
    DuplicateLabel,
    MissingArgument,
    UnexpectedArgument,

    // Emission pass
    InvalidArgument,
    ProgramTooLarge,
}

impl DiagnosticKind {
    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidLabel => Some("label names must not be empty or numeric"),
            Self::InvalidArgument => Some("arguments are label names or integers such as `42` or `$-1`"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnknownInstruction => "unknown instruction",
            Self::InvalidLabel => "invalid label name",
            Self::DuplicateLabel => "duplicate label",
            Self::MissingArgument => "missing argument",
            Self::UnexpectedArgument => "unexpected argument",
            Self::InvalidArgument => "invalid argument",
            Self::ProgramTooLarge => "program too large",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownInstruction => "`{}` is not a known instruction".to_string(),
            Self::DuplicateLabel => "label `{}` is already defined".to_string(),
            Self::InvalidArgument => "`{}` is neither a label nor an integer".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: Range<usize>,
    pub(crate) message: String,
}

/// One assembly error, anchored to a source line and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    /// 1-based source line.
    pub(crate) line: usize,
    /// Byte range in the source, underlined in rendered output.
    pub(crate) range: Range<usize>,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl Diagnostic {
    pub(crate) fn with_default_message(
        kind: DiagnosticKind,
        line: usize,
        range: Range<usize>,
    ) -> Self {
        Self {
            kind,
            line,
            range,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at line {} ({}..{}): {}",
            self.line, self.range.start, self.range.end, self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.range.start, related.range.end
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
