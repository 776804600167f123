use std::fmt;
use std::io;

use bitflags::bitflags;


bitflags! {
    /// The structural rules a TNEF stream has been found to violate.
    ///
    /// An empty set means the stream was compliant as far as it has been read.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct ComplianceStatus: u32 {
        const ATTRIBUTE_OVERFLOW = 0x0000_0001;
        const INVALID_ATTRIBUTE = 0x0000_0002;
        const INVALID_ATTRIBUTE_CHECKSUM = 0x0000_0004;
        const INVALID_ATTRIBUTE_LENGTH = 0x0000_0008;
        const INVALID_ATTRIBUTE_LEVEL = 0x0000_0010;
        const INVALID_ATTRIBUTE_VALUE = 0x0000_0020;
        const INVALID_DATE = 0x0000_0040;
        const INVALID_MESSAGE_CLASS = 0x0000_0080;
        const INVALID_MESSAGE_CODEPAGE = 0x0000_0100;
        const INVALID_PROPERTY_LENGTH = 0x0000_0200;
        const INVALID_ROW_COUNT = 0x0000_0400;
        const INVALID_TNEF_SIGNATURE = 0x0000_0800;
        const INVALID_TNEF_VERSION = 0x0000_1000;
        const NESTING_TOO_DEEP = 0x0000_2000;
        const STREAM_TRUNCATED = 0x0000_4000;
        const UNSUPPORTED_PROPERTY_TYPE = 0x0000_8000;
    }
}
impl ComplianceStatus {
    pub fn is_compliant(&self) -> bool {
        self.is_empty()
    }
}

/// How a reader reacts to a compliance violation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ComplianceMode {
    /// Record the violation, substitute a safe default and keep going.
    #[default]
    Loose,

    /// Fail with the first violation.
    Strict,
}


#[derive(Debug)]
pub enum TnefError {
    Io(io::Error),
    Compliance { status: ComplianceStatus, message: String },
    InvalidOperation { message: String },
}
impl TnefError {
    pub(crate) fn invalid_operation<S: Into<String>>(message: S) -> Self {
        Self::InvalidOperation { message: message.into() }
    }

    /// Whether this error means the source ended before a fixed-size field was complete.
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }

    /// The violated rule, if this is a compliance error.
    pub fn compliance_status(&self) -> Option<ComplianceStatus> {
        match self {
            Self::Compliance { status, .. } => Some(*status),
            _ => None,
        }
    }
}
impl fmt::Display for TnefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Compliance { status, message }
                => write!(f, "TNEF compliance violation {:?}: {}", status, message),
            Self::InvalidOperation { message }
                => write!(f, "invalid operation: {}", message),
        }
    }
}
impl std::error::Error for TnefError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl From<io::Error> for TnefError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}


pub(crate) fn truncated() -> TnefError {
    TnefError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "TNEF stream ends prematurely"))
}
