use miette::Diagnostic;
use thiserror::Error;

/// Fatal error type for corpus reading.
///
/// Fatal conditions abort the parse of the whole document; a partial
/// corpus is never returned. Recoverable authoring slips travel through
/// [`crate::Diagnostics`] instead.
#[derive(Error, Diagnostic, Debug)]
pub enum NluError {
    #[error("YAML syntax error: {0}")]
    #[diagnostic(code(nlu::syntax))]
    Syntax(#[from] serde_yaml::Error),

    #[error("Schema error: {message}")]
    #[diagnostic(code(nlu::schema))]
    Schema {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Entity annotation error: {message}")]
    #[diagnostic(code(nlu::annotation))]
    Annotation {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl NluError {
    /// Create a schema error without help text.
    pub fn schema(message: impl Into<String>) -> Self {
        NluError::Schema {
            message: message.into(),
            help: None,
        }
    }

    /// Create a schema error with help text.
    pub fn schema_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        NluError::Schema {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an annotation error with help text.
    pub fn annotation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        NluError::Annotation {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, NluError>;
