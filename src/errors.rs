//! Enumgram error handling.
//!
//! Every failure mode in the crate is represented by a single [`EnumError`]
//! carrying an [`ErrorKind`], source information for miette rendering, and
//! diagnostic metadata. Errors are grouped into categories so callers (and
//! tests) can tell a malformed grammar apart from caller misuse and from an
//! internal defect in the compiler or pruner.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source text and name attached to errors for diagnostic rendering.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real grammar content.
    pub fn from_source(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable, e.g. when the
    /// production set was assembled in memory rather than parsed from text.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("// {}", context),
        }
    }

    /// Convert to a NamedSource for miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("in-memory grammar")
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type: what went wrong, where, and how to help.
#[derive(Debug)]
pub struct EnumError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
}

/// All failure modes as a closed enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Grammar errors - the supplied grammar is unusable
    #[error("production '{head}' has duplicate definitions")]
    DuplicateProduction {
        head: String,
        original_location: SourceSpan,
    },
    #[error("production '{name}' not found")]
    ProductionNotFound { name: String },
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("grammar contains no productions")]
    EmptyGrammar,
    #[error("production '{start}' has no finite derivation")]
    NoFiniteDerivation { start: String },

    // Usage errors - caller misuse of the iteration protocol
    #[error("statement sequence is exhausted")]
    Exhausted,

    // Internal errors - defects in the compiler or pruner, not user input
    #[error("internal invariant violated: {detail}")]
    InternalInvariant { detail: String },
}

/// Context-specific source information.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// Coarse error classification, used by tests and callers to distinguish
/// bad input from bad usage from engine bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Grammar,
    Usage,
    Internal,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateProduction { .. }
            | Self::ProductionNotFound { .. }
            | Self::UnexpectedToken { .. }
            | Self::EmptyGrammar
            | Self::NoFiniteDerivation { .. } => ErrorCategory::Grammar,

            Self::Exhausted => ErrorCategory::Usage,

            Self::InternalInvariant { .. } => ErrorCategory::Internal,
        }
    }

    /// Error code suffix for diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::DuplicateProduction { .. } => "duplicate_production",
            Self::ProductionNotFound { .. } => "production_not_found",
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::EmptyGrammar => "empty_grammar",
            Self::NoFiniteDerivation { .. } => "no_finite_derivation",
            Self::Exhausted => "exhausted",
            Self::InternalInvariant { .. } => "internal_invariant",
        }
    }
}

impl std::error::Error for EnumError {}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for EnumError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let mut labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        if let ErrorKind::DuplicateProduction {
            original_location, ..
        } = &self.kind
        {
            labels.push(LabeledSpan::new_with_span(
                Some("first defined here".into()),
                *original_location,
            ));
        }
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl EnumError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::DuplicateProduction { .. } => "redefined here".into(),
            ErrorKind::ProductionNotFound { .. } => "referenced here".into(),
            ErrorKind::UnexpectedToken { .. } => "unexpected token".into(),
            ErrorKind::EmptyGrammar => "empty grammar".into(),
            ErrorKind::NoFiniteDerivation { .. } => "every derivation recurses forever".into(),
            ErrorKind::Exhausted => "no statements remain".into(),
            ErrorKind::InternalInvariant { .. } => "invariant violated".into(),
        }
    }

    /// Standalone constructor for iteration-protocol misuse. Exhaustion is
    /// raised far from any grammar source, so it carries no real span.
    pub fn exhausted() -> Self {
        EnumError {
            kind: ErrorKind::Exhausted,
            source_info: SourceInfo {
                source: SourceContext::fallback("statement iterator").to_named_source(),
                primary_span: unspanned(),
                phase: "enumerate".into(),
            },
            diagnostic_info: DiagnosticInfo {
                help: Some("call has_next() before requesting another statement".into()),
                error_code: "enumgram::enumerate::exhausted".into(),
            },
        }
    }
}

/// Context-aware error creation. Each phase that can fail owns a reporter
/// that knows the source text and phase name for its diagnostics.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> EnumError;

    fn unexpected_token(&self, expected: &str, found: &str, span: SourceSpan) -> EnumError {
        self.report(
            ErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    fn production_not_found(&self, name: &str, span: SourceSpan) -> EnumError {
        self.report(ErrorKind::ProductionNotFound { name: name.into() }, span)
    }

    /// Internal errors indicate defects in the tree compiler or pruner,
    /// never bad user input.
    fn internal_invariant(&self, detail: &str, span: SourceSpan) -> EnumError {
        let mut error = self.report(
            ErrorKind::InternalInvariant {
                detail: detail.into(),
            },
            span,
        );
        error.diagnostic_info.help =
            Some("this is a bug in enumgram, not in the grammar; please report it".into());
        error
    }
}

/// General-purpose reporter carrying the grammar source and the phase
/// ("parse", "store", "compile", ...) in which the error arose.
#[derive(Debug, Clone)]
pub struct Reporter {
    pub source: SourceContext,
    pub phase: String,
}

impl Reporter {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for Reporter {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> EnumError {
        let error_code = format!("enumgram::{}::{}", self.phase, kind.code_suffix());

        EnumError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

/// Placeholder span for errors not tied to a source location, such as
/// protocol misuse or internal invariant failures.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Converts a grammar span to a miette SourceSpan.
pub fn to_source_span(span: crate::grammar::Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Prints an EnumError with full miette diagnostics to stderr.
pub fn print_error(error: EnumError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
