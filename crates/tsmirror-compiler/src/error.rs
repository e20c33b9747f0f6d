//! Error types for the compile pipeline

use std::io;
use std::ops::Range;
use std::path::PathBuf;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use thiserror::Error;

/// A syntax error located in a source file.
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", path.display())]
pub struct ParseDiagnostic {
    pub path: PathBuf,
    pub message: String,
    /// Byte range of the offending tokens
    pub range: Range<usize>,
    pub source_text: String,
}

impl ParseDiagnostic {
    /// Render the diagnostic with source context to stderr.
    pub fn eprint(&self) -> io::Result<()> {
        let filename = self.path.to_string_lossy().to_string();
        let span = (filename.as_str(), self.range.clone());

        Report::build(ReportKind::Error, span.clone())
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code("E1000")
            .with_message("Parse error")
            .with_label(
                Label::new(span)
                    .with_message(&self.message)
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename.as_str(), Source::from(self.source_text.as_str())))
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse error in {0}")]
    Parse(#[from] Box<ParseDiagnostic>),

    #[error("invalid code generator options for {}: {source}", path.display())]
    Options {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to generate code for {}: {message}", path.display())]
    Emit { path: PathBuf, message: String },
}

impl CompileError {
    /// The parse diagnostic carried by this error, if any.
    pub fn diagnostic(&self) -> Option<&ParseDiagnostic> {
        match self {
            CompileError::Parse(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
