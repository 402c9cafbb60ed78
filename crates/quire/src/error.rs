use core::fmt;
use std::{borrow::Cow, ops::Deref};

/// An error raised at the edges of a conversion.
///
/// The converters themselves are total; errors only come from the export
/// facade (degenerate content) and from packaging collaborators.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
enum Repr {
    /// The document has nothing to export.
    NoContent,
    /// A packaging or I/O step failed.
    Export {
        operation: Cow<'static, str>,
        message: Cow<'static, str>,
    },
    /// Just a message.
    Msg(Cow<'static, str>),
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoContent,
    Export,
    Other,
}

impl Error {
    /// The document is empty and the export was skipped.
    pub fn no_content() -> Self {
        Error(Box::new(Repr::NoContent))
    }

    /// An export step failed, tagged with the operation name.
    pub fn export(
        operation: impl Into<Cow<'static, str>>,
        message: impl fmt::Display,
    ) -> Self {
        Error(Box::new(Repr::Export {
            operation: operation.into(),
            message: message.to_string().into(),
        }))
    }

    pub fn kind(&self) -> ErrorKind {
        match self.0.deref() {
            Repr::NoContent => ErrorKind::NoContent,
            Repr::Export { .. } => ErrorKind::Export,
            Repr::Msg(_) => ErrorKind::Other,
        }
    }

    /// The failing operation, if the error was raised by an export step.
    pub fn operation(&self) -> Option<&str> {
        match self.0.deref() {
            Repr::Export { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::NoContent => write!(f, "document has no content to export"),
            Repr::Export { operation, message } => write!(f, "{operation} failed: {message}"),
            Repr::Msg(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::export("io", e)
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Error(Box::new(Repr::Msg(s)))
    }
}
