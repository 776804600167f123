mod compliance;
mod props;
mod stream;
pub mod value;


use std::io::{self, Read};

use encoding_rs::{Encoding, WINDOWS_1252};
use log::{debug, warn};
use msox::{AttachMethod, TnefAttributeId, TnefAttributeLevel, TnefAttributeType};

use crate::binread::{BUFFER_SIZE, ReadBuffer};
pub use crate::tnef::compliance::{ComplianceMode, ComplianceStatus, TnefError};
pub use crate::tnef::props::{TnefPropertyReader, ValueCursor};
pub use crate::tnef::stream::{RawValueReader, TextValueReader};
use crate::tnef::compliance::truncated;
use crate::tnef::props::PropertyState;
use crate::tnef::value::{DEFAULT_CODEPAGE, encoding_for_codepage};


pub const TNEF_SIGNATURE: u32 = 0x223E9F78;
pub const TNEF_VERSION: i32 = 0x0001_0000;

/// How many embedded messages may be nested inside each other.
pub const MAX_NESTING_DEPTH: usize = 32;


macro_rules! impl_read {
    ($func_name:ident, $type:ty, $byte_count:expr) => {
        /// Reads a little-endian value, adding its bytes to the checksum.
        pub fn $func_name(&mut self) -> Result<$type, TnefError> {
            let mut buf = [0u8; $byte_count];
            self.read_exact(&mut buf)?;
            Ok(<$type>::from_le_bytes(buf))
        }
    };
}


/// The framing of one TNEF attribute.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AttributeHeader {
    pub level: TnefAttributeLevel,
    pub id: TnefAttributeId,
    pub length: u32,

    /// Stream offset of the first value byte.
    pub value_offset: u64,
}
impl AttributeHeader {
    pub fn attribute_type(&self) -> TnefAttributeType {
        self.id.attribute_type()
    }

    /// Stream offset just past the last value byte (where the checksum starts).
    pub fn value_end(&self) -> u64 {
        self.value_offset + u64::from(self.length)
    }
}


/// A forward-only reader of TNEF attributes.
///
/// Every byte of an attribute's value passes through a running checksum that is
/// verified against the attribute's trailer once the reader moves on.
pub struct TnefReader<R> {
    buffer: ReadBuffer<R>,
    checksum: u16,
    mode: ComplianceMode,
    status: ComplianceStatus,
    codepage: u16,
    encoding: &'static Encoding,
    tnef_version: Option<i32>,
    legacy_key: u16,
    depth: usize,
    limit: Option<u64>,
    attribute: Option<AttributeHeader>,
    attach_method: AttachMethod,
    props: PropertyState,
}
impl<R: Read> TnefReader<R> {
    /// Opens a TNEF stream and reads its header.
    ///
    /// `default_codepage` decodes 8-bit strings until the stream announces its own;
    /// an unknown codepage is recorded and replaced with 1252.
    pub fn new(source: R, default_codepage: u16, mode: ComplianceMode) -> Result<Self, TnefError> {
        Self::nested(source, default_codepage, mode, 0, None)
    }

    /// Opens a TNEF stream with codepage 1252 in loose mode.
    pub fn with_defaults(source: R) -> Result<Self, TnefError> {
        Self::new(source, DEFAULT_CODEPAGE, ComplianceMode::Loose)
    }

    pub(crate) fn nested(source: R, default_codepage: u16, mode: ComplianceMode, depth: usize, limit: Option<u64>) -> Result<Self, TnefError> {
        let mut reader = Self {
            buffer: ReadBuffer::new(source),
            checksum: 0,
            mode,
            status: ComplianceStatus::empty(),
            codepage: DEFAULT_CODEPAGE,
            encoding: WINDOWS_1252,
            tnef_version: None,
            legacy_key: 0,
            depth,
            limit,
            attribute: None,
            attach_method: AttachMethod::ByValue,
            props: PropertyState::default(),
        };

        match encoding_for_codepage(default_codepage) {
            Some(encoding) => {
                reader.codepage = default_codepage;
                reader.encoding = encoding;
            },
            None => reader.set_compliance_error(
                ComplianceStatus::INVALID_MESSAGE_CODEPAGE,
                format!("unsupported default codepage {}", default_codepage),
            )?,
        }

        reader.read_header()?;
        Ok(reader)
    }

    fn read_header(&mut self) -> Result<(), TnefError> {
        let result = self.read_u32();
        let Some(signature) = self.recover_truncation(result, "TNEF signature")? else { return Ok(()) };
        if signature != TNEF_SIGNATURE {
            self.set_compliance_error(
                ComplianceStatus::INVALID_TNEF_SIGNATURE,
                format!("wrong TNEF signature (expected 0x{:08X}, obtained 0x{:08X})", TNEF_SIGNATURE, signature),
            )?;
        }

        let result = self.read_u16();
        if let Some(legacy_key) = self.recover_truncation(result, "legacy key")? {
            debug!("legacy key: {}", legacy_key);
            self.legacy_key = legacy_key;
        }
        Ok(())
    }

    /// Records a violation. In strict mode, also fails with it.
    pub(crate) fn set_compliance_error<S: Into<String>>(&mut self, status: ComplianceStatus, message: S) -> Result<(), TnefError> {
        let message = message.into();
        warn!("{:?}: {}", status, message);
        self.status |= status;
        match self.mode {
            ComplianceMode::Loose => Ok(()),
            ComplianceMode::Strict => Err(TnefError::Compliance { status, message }),
        }
    }

    /// Records a violation that never fails the read, whatever the mode.
    pub(crate) fn record_status<S: Into<String>>(&mut self, status: ComplianceStatus, message: S) {
        warn!("{:?}: {}", status, message.into());
        self.status |= status;
    }

    /// Turns a truncated read into `None`, recording it as a violation.
    pub(crate) fn recover_truncation<T>(&mut self, result: Result<T, TnefError>, what: &str) -> Result<Option<T>, TnefError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_truncation() => {
                self.set_compliance_error(
                    ComplianceStatus::STREAM_TRUNCATED,
                    format!("stream ends while reading {} at offset {}", what, self.stream_offset()),
                )?;
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }

    /// Reads whatever is buffered (refilling if necessary) into `buf`. Returns 0 at the end of the source.
    pub(crate) fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let available = self.buffer.fill(buf.len().min(BUFFER_SIZE))?;
        if available == 0 {
            return Ok(0);
        }
        let bytes = self.buffer.consume(buf.len());
        self.checksum = add_to_checksum(self.checksum, bytes);
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Fills `buf` completely, adding its bytes to the checksum.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TnefError> {
        let mut done = 0;
        while done < buf.len() {
            let count = self.read_some(&mut buf[done..])?;
            if count == 0 {
                return Err(truncated());
            }
            done += count;
        }
        Ok(())
    }

    impl_read!(read_u8, u8, 1);
    impl_read!(read_i16, i16, 2);
    impl_read!(read_u16, u16, 2);
    impl_read!(read_i32, i32, 4);
    impl_read!(read_u32, u32, 4);
    impl_read!(read_i64, i64, 8);
    impl_read!(read_f32, f32, 4);
    impl_read!(read_f64, f64, 8);

    /// Looks at the next four bytes without consuming or checksumming them.
    pub fn peek_i32(&mut self) -> Result<i32, TnefError> {
        if self.buffer.fill(4)? < 4 {
            return Err(truncated());
        }
        let bytes = self.buffer.peek();
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Moves forward to `offset`, checksumming everything skipped.
    ///
    /// Returns false if the source ends first.
    pub fn seek(&mut self, offset: u64) -> Result<bool, TnefError> {
        let position = self.stream_offset();
        if offset < position {
            return Err(TnefError::invalid_operation(format!("cannot seek backwards from {} to {}", position, offset)));
        }

        let mut remaining = offset - position;
        while remaining > 0 {
            let wanted = remaining.min(BUFFER_SIZE as u64) as usize;
            if self.buffer.fill(wanted)? == 0 {
                return Ok(false);
            }
            let bytes = self.buffer.consume(wanted);
            self.checksum = add_to_checksum(self.checksum, bytes);
            remaining -= bytes.len() as u64;
        }
        Ok(true)
    }

    /// Advances to the next attribute.
    ///
    /// Whatever is left of the current attribute is skipped and its checksum verified.
    /// Returns false at the end of the stream or if it is truncated.
    pub fn read_next_attribute(&mut self) -> Result<bool, TnefError> {
        self.props = PropertyState::default();
        if let Some(attribute) = self.attribute.take() {
            if !self.finish_attribute(&attribute)? {
                return Ok(false);
            }
        }

        // running out of data between attributes is the regular way to end
        self.buffer.fill(1)?;
        if self.buffer.is_exhausted() {
            return Ok(false);
        }

        let level = TnefAttributeLevel::from_base_type(self.read_u8()?);
        if !matches!(level, TnefAttributeLevel::Message|TnefAttributeLevel::Attachment) {
            self.set_compliance_error(
                ComplianceStatus::INVALID_ATTRIBUTE_LEVEL,
                format!("invalid attribute level {:?} at offset {}", level, self.stream_offset() - 1),
            )?;
        }

        let result = self.read_u32();
        let Some(id_u32) = self.recover_truncation(result, "attribute ID")? else { return Ok(false) };
        let id = TnefAttributeId::from_base_type(id_u32);

        let result = self.read_i32();
        let Some(length_i32) = self.recover_truncation(result, "attribute length")? else { return Ok(false) };
        let value_offset = self.stream_offset();
        self.checksum = 0;

        let length = match u32::try_from(length_i32) {
            Ok(l) => l,
            Err(_) => {
                self.set_compliance_error(
                    ComplianceStatus::INVALID_ATTRIBUTE_LENGTH,
                    format!("attribute {:?} has negative length {}", id, length_i32),
                )?;
                return Ok(false);
            },
        };

        let attribute = AttributeHeader {
            level,
            id,
            length,
            value_offset,
        };
        debug!("attribute {:?}.{:?}: {} bytes at offset {}", level, id, length, value_offset);

        if let Some(limit) = self.limit {
            if attribute.value_end() + 2 > limit {
                self.set_compliance_error(
                    ComplianceStatus::ATTRIBUTE_OVERFLOW,
                    format!("attribute {:?} ends at {} but the stream ends at {}", id, attribute.value_end() + 2, limit),
                )?;
            }
        }

        if !self.check_attribute(&attribute)? {
            return Ok(false);
        }
        if !self.load_properties(&attribute)? {
            return Ok(false);
        }
        self.attribute = Some(attribute);
        Ok(true)
    }

    /// Skips to the end of an attribute's value and verifies its checksum.
    fn finish_attribute(&mut self, attribute: &AttributeHeader) -> Result<bool, TnefError> {
        let end = attribute.value_end();
        if self.stream_offset() > end {
            self.set_compliance_error(
                ComplianceStatus::ATTRIBUTE_OVERFLOW,
                format!("read past the end of attribute {:?}", attribute.id),
            )?;
            return Ok(false);
        }
        if !self.seek(end)? {
            self.set_compliance_error(
                ComplianceStatus::STREAM_TRUNCATED,
                format!("stream ends inside the value of attribute {:?}", attribute.id),
            )?;
            return Ok(false);
        }

        let calculated = self.checksum;
        let result = self.read_u16();
        let Some(obtained) = self.recover_truncation(result, "attribute checksum")? else { return Ok(false) };
        if obtained != calculated {
            self.set_compliance_error(
                ComplianceStatus::INVALID_ATTRIBUTE_CHECKSUM,
                format!("checksum mismatch in attribute {:?}: calculated 0x{:04X}, obtained 0x{:04X}", attribute.id, calculated, obtained),
            )?;
        }
        Ok(true)
    }

    /// Validates the attribute ID and applies the side effects of specific attributes.
    fn check_attribute(&mut self, attribute: &AttributeHeader) -> Result<bool, TnefError> {
        if !attribute.id.is_known() {
            self.set_compliance_error(
                ComplianceStatus::INVALID_ATTRIBUTE,
                format!("unknown attribute 0x{:08X}", u32::from(attribute.id)),
            )?;
            return Ok(true);
        }

        match attribute.id {
            TnefAttributeId::AttachRenderData => {
                self.attach_method = AttachMethod::ByValue;
            },
            TnefAttributeId::OemCodepage|TnefAttributeId::TnefVersion => {
                if attribute.length < 4 {
                    self.set_compliance_error(
                        ComplianceStatus::INVALID_ATTRIBUTE_VALUE,
                        format!("attribute {:?} is too short ({} bytes)", attribute.id, attribute.length),
                    )?;
                    return Ok(true);
                }

                // only peek; the value is still there for whoever reads the attribute
                let result = self.peek_i32();
                let Some(value) = self.recover_truncation(result, "attribute value")? else { return Ok(false) };
                if attribute.id == TnefAttributeId::OemCodepage {
                    self.set_codepage(value)?;
                } else {
                    self.tnef_version = Some(value);
                    if value != TNEF_VERSION {
                        self.set_compliance_error(
                            ComplianceStatus::INVALID_TNEF_VERSION,
                            format!("unknown TNEF version 0x{:08X}", value),
                        )?;
                    }
                }
            },
            TnefAttributeId::MessageClass|TnefAttributeId::OriginalMessageClass => {
                if attribute.length == 0 {
                    self.set_compliance_error(
                        ComplianceStatus::INVALID_MESSAGE_CLASS,
                        format!("attribute {:?} is empty", attribute.id),
                    )?;
                }
            },
            _ => {},
        }
        Ok(true)
    }

    fn set_codepage(&mut self, value: i32) -> Result<(), TnefError> {
        let found = u16::try_from(value).ok()
            .and_then(|cp| encoding_for_codepage(cp).map(|enc| (cp, enc)));
        match found {
            Some((codepage, encoding)) => {
                debug!("message codepage: {} ({})", codepage, encoding.name());
                self.codepage = codepage;
                self.encoding = encoding;
                Ok(())
            },
            None => self.set_compliance_error(
                ComplianceStatus::INVALID_MESSAGE_CODEPAGE,
                format!("unsupported message codepage {}", value),
            ),
        }
    }

    /// A reader for the properties, rows or scalar value of the current attribute.
    pub fn property_reader(&mut self) -> TnefPropertyReader<'_, R> {
        TnefPropertyReader::new(self)
    }

    /// The current attribute, if positioned on one.
    pub fn attribute(&self) -> Option<&AttributeHeader> { self.attribute.as_ref() }

    pub fn attribute_level(&self) -> Option<TnefAttributeLevel> { self.attribute.map(|a| a.level) }
    pub fn attribute_id(&self) -> Option<TnefAttributeId> { self.attribute.map(|a| a.id) }

    /// Absolute offset of the next byte to be read.
    pub fn stream_offset(&self) -> u64 { self.buffer.position() }

    pub fn compliance_mode(&self) -> ComplianceMode { self.mode }
    pub fn compliance_status(&self) -> ComplianceStatus { self.status }
    pub fn message_codepage(&self) -> u16 { self.codepage }
    pub fn message_encoding(&self) -> &'static Encoding { self.encoding }
    pub fn tnef_version(&self) -> Option<i32> { self.tnef_version }
    pub fn legacy_key(&self) -> u16 { self.legacy_key }
    pub fn depth(&self) -> usize { self.depth }

    /// The attach method most recently announced by the stream.
    pub fn attach_method(&self) -> AttachMethod { self.attach_method }

    /// Gives back the underlying source; buffered but unread bytes are lost.
    pub fn into_inner(self) -> R { self.buffer.into_inner() }
}


fn add_to_checksum(checksum: u16, bytes: &[u8]) -> u16 {
    bytes.iter()
        .fold(checksum, |sum, &b| sum.wrapping_add(u16::from(b)))
}
