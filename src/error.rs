use miette::Diagnostic;
use thiserror::Error;

/// Main error type for compendium operations
#[derive(Error, Diagnostic, Debug)]
pub enum CompendiumError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(compendium::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(compendium::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to fetch {uri}: {message}")]
    #[diagnostic(code(compendium::fetch))]
    Fetch { uri: String, message: String },

    #[error("Unknown parser '{parser}'")]
    #[diagnostic(
        code(compendium::unknown_parser),
        help("Run `compendium parsers` to list the registered parser ids")
    )]
    UnknownParser { parser: String },

    #[error("Malformed source{}: {message}", location_suffix(.line))]
    #[diagnostic(code(compendium::malformed_source))]
    MalformedSource {
        message: String,
        /// 1-based line of the offending input, when known
        line: Option<usize>,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid component '{component}': {message}")]
    #[diagnostic(code(compendium::component))]
    ComponentValidation { component: String, message: String },

    #[error("Failed to write {path}: {message}")]
    #[diagnostic(code(compendium::serialize))]
    Serialization {
        path: std::path::PathBuf,
        message: String,
    },
}

fn location_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl CompendiumError {
    /// Shorthand for a malformed payload error without location.
    pub fn malformed(message: impl Into<String>) -> Self {
        CompendiumError::MalformedSource {
            message: message.into(),
            line: None,
            help: None,
        }
    }

    /// Shorthand for a malformed payload error pinned to a line.
    pub fn malformed_at(line: usize, message: impl Into<String>) -> Self {
        CompendiumError::MalformedSource {
            message: message.into(),
            line: Some(line),
            help: None,
        }
    }

    /// Shorthand for a component validation error.
    pub fn invalid_component(component: impl Into<String>, message: impl Into<String>) -> Self {
        CompendiumError::ComponentValidation {
            component: component.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompendiumError>;
