// ABOUTME: Error type for rendering the WordPress export document.
// ABOUTME: Wraps writer and encoding failures from the XML writer.

use thiserror::Error;

/// Errors raised while rendering an export document.
///
/// The XML writer reports every failure as an I/O error, so there is no
/// separate XML variant.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export document: {0}")]
    Io(#[from] std::io::Error),

    #[error("export document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
