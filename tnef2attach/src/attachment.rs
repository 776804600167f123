use std::fmt;

use chrono::{DateTime, Utc};
use encoding_rs::Encoding;


pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const HTML_CONTENT_TYPE: &str = "text/html";
pub const DEFAULT_HTML_FILENAME: &str = "body.html";


#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttachmentKind {
    /// The HTML rendition of the message body.
    HtmlBody,

    /// A file attached to the message.
    File,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContentDisposition {
    /// Shown in the message body instead of being offered as a separate file.
    pub inline: bool,
    pub size: Option<i64>,
    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
}
impl ContentDisposition {
    pub fn disposition_type(&self) -> &'static str {
        if self.inline { "inline" } else { "attachment" }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentType {
    pub mime_type: String,

    /// Display name of the attachment.
    pub name: Option<String>,
}
impl ContentType {
    pub fn new<S: Into<String>>(mime_type: S) -> Self {
        Self { mime_type: mime_type.into(), name: None }
    }
}
impl Default for ContentType {
    fn default() -> Self { Self::new(DEFAULT_CONTENT_TYPE) }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TransferEncoding {
    Base64,
}
impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => write!(f, "base64"),
        }
    }
}


/// One attachment recovered from a TNEF stream, ready to be turned into a MIME part.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub is_text_body: bool,

    /// Character encoding of a textual body.
    pub encoding: Option<&'static Encoding>,

    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
    pub filename: Option<String>,
    pub content_id: Option<String>,
    pub content_location: Option<String>,
    pub content_base: Option<String>,
    pub content_disposition: ContentDisposition,
    pub content_type: ContentType,
    pub transfer_encoding: Option<TransferEncoding>,
    pub body: Option<Vec<u8>>,
}
impl Attachment {
    /// An empty file attachment.
    pub fn new_file() -> Self {
        Self {
            kind: AttachmentKind::File,
            is_text_body: false,
            encoding: None,
            creation_date: None,
            modification_date: None,
            filename: None,
            content_id: None,
            content_location: None,
            content_base: None,
            content_disposition: ContentDisposition::default(),
            content_type: ContentType::default(),
            transfer_encoding: None,
            body: None,
        }
    }

    /// The HTML body of a message, named after its subject.
    pub fn new_html_body(subject: Option<&str>, encoding: &'static Encoding, body: Vec<u8>) -> Self {
        let filename = match subject.map(sanitize_filename) {
            Some(name) if !name.is_empty() => format!("{}.html", name),
            _ => DEFAULT_HTML_FILENAME.to_owned(),
        };
        let mut content_type = ContentType::new(HTML_CONTENT_TYPE);
        content_type.name = Some(filename.clone());

        Self {
            kind: AttachmentKind::HtmlBody,
            is_text_body: true,
            encoding: Some(encoding),
            filename: Some(filename),
            content_type,
            content_disposition: ContentDisposition {
                inline: true,
                size: Some(body.len() as i64),
                ..ContentDisposition::default()
            },
            transfer_encoding: Some(TransferEncoding::Base64),
            body: Some(body),
            ..Self::new_file()
        }
    }

    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(|b| b.len()).unwrap_or(0)
    }
}


/// Replaces the characters that are not allowed in file names on common platforms.
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/'|'\\'|':'|'*'|'?'|'"'|'<'|'>'|'|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
