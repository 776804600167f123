pub mod attachment;
mod binread;
pub mod extract;
pub mod tnef;


pub use crate::attachment::{Attachment, AttachmentKind, ContentDisposition, ContentType, TransferEncoding};
pub use crate::extract::{extract, extract_attachments};
pub use crate::tnef::{ComplianceMode, ComplianceStatus, TnefError, TnefPropertyReader, TnefReader};
