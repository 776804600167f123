//! Walks a TNEF stream and collects the attachments it carries.


use std::io::Read;

use chrono::{DateTime, Utc};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use msox::{AttachFlags, AttachMethod, PropTag, PropType, TnefAttributeId, TnefAttributeLevel};

use crate::attachment::{Attachment, TransferEncoding};
use crate::tnef::{ComplianceMode, ComplianceStatus, TnefError, TnefReader};


/// The attachment whose attributes are currently being read.
enum Accumulator {
    /// Still being assembled.
    Open(Attachment),

    /// Already handed out; later attributes update the entry at this index.
    Emitted(usize),
}


/// Decodes a whole TNEF stream and returns its attachments with the compliance status.
pub fn extract<R: Read>(source: R, default_codepage: u16, mode: ComplianceMode) -> Result<(Vec<Attachment>, ComplianceStatus), TnefError> {
    let mut reader = TnefReader::new(source, default_codepage, mode)?;
    let attachments = extract_attachments(&mut reader)?;
    Ok((attachments, reader.compliance_status()))
}


/// Reads all remaining attributes of `reader` and assembles attachments from them.
///
/// The HTML body, if the message has one, comes first; file attachments follow in stream order.
pub fn extract_attachments<R: Read>(reader: &mut TnefReader<R>) -> Result<Vec<Attachment>, TnefError> {
    let mut attachments = Vec::new();
    let mut current: Option<Accumulator> = None;

    while reader.read_next_attribute()? {
        let (Some(level), Some(id)) = (reader.attribute_level(), reader.attribute_id()) else { continue };

        match (level, id) {
            (TnefAttributeLevel::Message, TnefAttributeId::MsgProps) => {
                if let Some(body) = read_message_properties(reader)? {
                    debug!("HTML body: {} bytes", body.body_len());
                    attachments.push(body);
                }
            },
            (TnefAttributeLevel::Attachment, TnefAttributeId::AttachRenderData) => {
                if matches!(current, Some(Accumulator::Open(_))) {
                    debug!("discarding attachment that never received its data");
                }
                current = Some(Accumulator::Open(Attachment::new_file()));
            },
            (TnefAttributeLevel::Attachment, TnefAttributeId::Attachment) => {
                let Some(attachment) = target(&mut current, &mut attachments) else { continue };
                let captured = read_attachment_properties(reader, attachment)?;
                if captured {
                    attachment.transfer_encoding = Some(TransferEncoding::Base64);
                    emit(&mut current, &mut attachments);
                }
            },
            (TnefAttributeLevel::Attachment, TnefAttributeId::AttachCreateDate|TnefAttributeId::AttachModifyDate) => {
                let Some(attachment) = target(&mut current, &mut attachments) else { continue };
                let date = tolerate(reader.property_reader().as_datetime(), "attachment date")?.flatten();
                if id == TnefAttributeId::AttachCreateDate {
                    set_creation_date(attachment, date);
                } else {
                    set_modification_date(attachment, date);
                }
            },
            (TnefAttributeLevel::Attachment, TnefAttributeId::AttachTitle) => {
                let Some(attachment) = target(&mut current, &mut attachments) else { continue };
                if attachment.filename.is_none() {
                    attachment.filename = tolerate(reader.property_reader().as_string(), "attachment title")?;
                }
            },
            (TnefAttributeLevel::Attachment, TnefAttributeId::AttachData) => {
                if reader.attach_method() != AttachMethod::ByValue {
                    debug!("ignoring attachment data with method {:?}", reader.attach_method());
                    continue;
                }
                let Some(attachment) = target(&mut current, &mut attachments) else { continue };
                if let Some(bytes) = tolerate(reader.property_reader().as_bytes(), "attachment data")? {
                    attachment.body = Some(bytes);
                    attachment.transfer_encoding = Some(TransferEncoding::Base64);
                    emit(&mut current, &mut attachments);
                }
            },
            _ => {},
        }
    }

    Ok(attachments)
}


/// The attachment that attributes currently apply to, whether or not it has been emitted.
fn target<'a>(current: &'a mut Option<Accumulator>, attachments: &'a mut Vec<Attachment>) -> Option<&'a mut Attachment> {
    match current {
        Some(Accumulator::Open(attachment)) => Some(attachment),
        Some(Accumulator::Emitted(index)) => attachments.get_mut(*index),
        None => None,
    }
}

/// Appends the open attachment to the output; does nothing if it is already there.
fn emit(current: &mut Option<Accumulator>, attachments: &mut Vec<Attachment>) {
    match current.take() {
        Some(Accumulator::Open(attachment)) => {
            debug!("attachment {:?}: {} bytes", attachment.filename, attachment.body_len());
            attachments.push(attachment);
            *current = Some(Accumulator::Emitted(attachments.len() - 1));
        },
        other => *current = other,
    }
}

/// Treats a value that cannot be read in the requested shape as absent.
///
/// Compliance errors (which only surface in strict mode) are passed on.
fn tolerate<T>(result: Result<T, TnefError>, what: &str) -> Result<Option<T>, TnefError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e @ TnefError::InvalidOperation { .. }) => {
            warn!("skipping {}: {}", what, e);
            Ok(None)
        },
        Err(e) if e.is_truncation() => {
            warn!("skipping {}: {}", what, e);
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

fn set_creation_date(attachment: &mut Attachment, date: Option<DateTime<Utc>>) {
    if date.is_some() {
        attachment.creation_date = date;
        attachment.content_disposition.creation_date = date;
    }
}

fn set_modification_date(attachment: &mut Attachment, date: Option<DateTime<Utc>>) {
    if date.is_some() {
        attachment.modification_date = date;
        attachment.content_disposition.modification_date = date;
    }
}


/// Looks for the HTML body among the message properties.
fn read_message_properties<R: Read>(reader: &mut TnefReader<R>) -> Result<Option<Attachment>, TnefError> {
    let message_encoding = reader.message_encoding();
    let mut props = reader.property_reader();

    let mut subject: Option<String> = None;
    let mut creation_date = None;
    let mut modification_date = None;
    let mut body: Option<(Vec<u8>, &'static Encoding)> = None;

    while props.read_next_property()? {
        let Some(tag) = props.property_tag() else { continue };
        match tag.id {
            PropTag::TagSubject => {
                subject = tolerate(props.as_string(), "subject")?;
            },
            PropTag::TagCreationTime => {
                creation_date = tolerate(props.as_datetime(), "creation time")?.flatten();
            },
            PropTag::TagLastModificationTime => {
                modification_date = tolerate(props.as_datetime(), "modification time")?.flatten();
            },
            PropTag::TagBodyHtml => {
                body = if tag.value_type() == PropType::String {
                    tolerate(props.as_string(), "HTML body")?
                        .map(|text| (text.into_bytes(), UTF_8))
                } else {
                    tolerate(props.as_bytes(), "HTML body")?
                        .map(|bytes| (bytes, message_encoding))
                };
            },
            _ => {},
        }
    }

    Ok(body.map(|(bytes, encoding)| {
        let mut attachment = Attachment::new_html_body(subject.as_deref(), encoding, bytes);
        set_creation_date(&mut attachment, creation_date);
        set_modification_date(&mut attachment, modification_date);
        attachment
    }))
}

/// Copies the attachment properties into `attachment`. Returns whether its data was among them.
fn read_attachment_properties<R: Read>(reader: &mut TnefReader<R>, attachment: &mut Attachment) -> Result<bool, TnefError> {
    let mut props = reader.property_reader();
    let mut captured = false;

    while props.read_next_property()? {
        let Some(tag) = props.property_tag() else { continue };
        match tag.id {
            PropTag::TagAttachLongFilename => {
                if let Some(name) = tolerate(props.as_string(), "long filename")? {
                    attachment.filename = Some(name);
                }
            },
            PropTag::TagAttachFilename => {
                if attachment.filename.is_none() {
                    attachment.filename = tolerate(props.as_string(), "filename")?;
                }
            },
            PropTag::TagAttachContentLocation => {
                attachment.content_location = tolerate(props.as_uri(), "content location")?;
            },
            PropTag::TagAttachContentBase => {
                attachment.content_base = tolerate(props.as_uri(), "content base")?;
            },
            PropTag::TagAttachContentId => {
                attachment.content_id = tolerate(props.as_string(), "content ID")?;
            },
            PropTag::TagAttachContentDisposition => {
                if let Some(disposition) = tolerate(props.as_string(), "content disposition")? {
                    if disposition.trim().eq_ignore_ascii_case("inline") {
                        attachment.content_disposition.inline = true;
                    }
                }
            },
            PropTag::TagAttachMimeTag => {
                if let Some(mime_type) = tolerate(props.as_string(), "MIME type")? {
                    attachment.content_type.mime_type = mime_type;
                }
            },
            PropTag::TagAttachFlags => {
                if let Some(flags) = tolerate(props.as_i32(), "attachment flags")? {
                    let flags = AttachFlags::from_bits_truncate(flags as u32);
                    if flags.contains(AttachFlags::RENDERED_IN_BODY) {
                        attachment.content_disposition.inline = true;
                    }
                }
            },
            PropTag::TagAttachSize => {
                attachment.content_disposition.size = tolerate(props.as_i64(), "attachment size")?;
            },
            PropTag::TagDisplayName => {
                attachment.content_type.name = tolerate(props.as_string(), "display name")?;
            },
            PropTag::TagCreationTime => {
                let date = tolerate(props.as_datetime(), "creation time")?.flatten();
                set_creation_date(attachment, date);
            },
            PropTag::TagLastModificationTime => {
                let date = tolerate(props.as_datetime(), "modification time")?.flatten();
                set_modification_date(attachment, date);
            },
            PropTag::TagAttachDataBinary => {
                if props.is_embedded_message() {
                    debug!("attachment is an embedded message");
                }
                if let Some(bytes) = tolerate(props.as_bytes(), "attachment data")? {
                    attachment.body = Some(bytes);
                    captured = true;
                }
            },
            _ => {},
        }
    }

    Ok(captured)
}
