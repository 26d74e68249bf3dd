use std::string::FromUtf8Error;

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error when reading {0}")]
    IoError(#[from] std::io::Error),
    #[error("XML error {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("Malformed attribute {0}")]
    AttributeError(#[from] AttrError),
    #[error("Parser Error when parsing `{0}`")]
    ParseError(String),
    #[error("Attribute `{attribute}` of file `{file}` is not a number: `{value}`")]
    InvalidCounter {
        file: String,
        attribute: &'static str,
        value: String,
    },
    #[error("Output is not valid UTF-8 {0}")]
    Utf8Error(#[from] FromUtf8Error),
}

impl Error {
    /// Errors that only invalidate the file being read. The merge skips that
    /// file and carries on with the rest.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::IoError(_) | Error::XmlError(_) | Error::AttributeError(_) | Error::ParseError(_)
        )
    }
}
