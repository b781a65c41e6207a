//! Core error types for diagram generation
//!
//! This module defines common error types used throughout the generation pipeline.

use thiserror::Error;

/// Core error types for diagram generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unknown type: {identifier}")]
    UnknownType { identifier: String },

    #[error("Malformed type text: {text}")]
    MalformedTypeText { text: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Create a new unknown-type error
    pub fn unknown_type(identifier: impl Into<String>) -> Self {
        Self::UnknownType {
            identifier: identifier.into(),
        }
    }

    /// Create a new malformed-type-text error
    pub fn malformed_type_text(text: impl Into<String>) -> Self {
        Self::MalformedTypeText { text: text.into() }
    }

    /// Create a new catalog error
    pub fn catalog_error(message: impl Into<String>) -> Self {
        Self::CatalogError {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_error() {
        let error = GeneratorError::unknown_type("Ghost");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unknown type"));
        assert!(error_msg.contains("Ghost"));
    }

    #[test]
    fn test_malformed_type_text_error() {
        let error = GeneratorError::malformed_type_text("List<(int, string)>");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed type text"));
        assert!(error_msg.contains("List<(int, string)>"));
    }

    #[test]
    fn test_catalog_error() {
        let error = GeneratorError::catalog_error("duplicate declaration");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Catalog error"));
        assert!(error_msg.contains("duplicate declaration"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: GeneratorError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
