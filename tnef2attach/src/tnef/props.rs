use std::io::Read;

use chrono::{DateTime, Utc};
use encoding_rs::{Encoding, UTF_16LE};
use log::debug;
use msox::{
    AttachMethod, NameId, PropId, PropIdType, PropTag, PropType, PropValue, PropertyTag,
    TnefAttributeType,
};
use uuid::Uuid;

use crate::tnef::{AttributeHeader, ComplianceStatus, MAX_NESTING_DEPTH, TnefError, TnefReader};
use crate::tnef::stream::{RawValueReader, TextValueReader};
use crate::tnef::value::{
    attribute_date_to_datetime, datetime_to_filetime, decode_string8, decode_unicode,
    filetime_to_datetime, oa_date_to_datetime, pad_to_4,
};


/// What the value of the current attribute consists of.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Payload {
    #[default]
    Nothing,
    Properties,
    Rows,
    Scalar,
}

/// Where a property reader stands within the current attribute.
///
/// Indexes count the items already entered, so an index of 0 means "before the first".
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ValueCursor {
    pub row_index: u32,
    pub row_count: u32,
    pub property_index: u32,
    pub property_count: u32,
    pub value_index: u32,
    pub value_count: u32,

    /// Stream offset of the current value.
    pub value_offset: u64,

    /// Bytes the current value occupies, including length prefix and padding.
    pub value_length: u64,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PropertyState {
    payload: Payload,
    attribute: Option<AttributeHeader>,
    cursor: ValueCursor,
    tag: Option<PropertyTag>,
    name: Option<NameId>,
}

/// The wire shape of the current value; decides which accessors apply.
#[derive(Clone, Copy, Debug)]
enum ValueShape {
    Property(PropType),
    Attribute(TnefAttributeType),
}


impl<R: Read> TnefReader<R> {
    /// Prepares property state for a freshly read attribute.
    pub(crate) fn load_properties(&mut self, attribute: &AttributeHeader) -> Result<bool, TnefError> {
        self.props = PropertyState {
            attribute: Some(*attribute),
            ..PropertyState::default()
        };

        if attribute.id.carries_properties() {
            self.props.payload = Payload::Properties;
            let Some(count) = self.read_count(ComplianceStatus::INVALID_PROPERTY_LENGTH, "property count")? else { return Ok(false) };
            debug!("property count: {}", count);
            self.props.cursor.property_count = count;
        } else if attribute.id.carries_rows() {
            self.props.payload = Payload::Rows;
            let Some(count) = self.read_count(ComplianceStatus::INVALID_ROW_COUNT, "row count")? else { return Ok(false) };
            debug!("row count: {}", count);
            self.props.cursor.row_count = count;
        } else {
            self.props.payload = Payload::Scalar;
            self.props.cursor.value_count = 1;
        }
        Ok(true)
    }

    /// Reads a 4-byte count. A negative count is recorded as `status` and read as 0.
    ///
    /// Returns `None` if the stream is truncated.
    fn read_count(&mut self, status: ComplianceStatus, what: &str) -> Result<Option<u32>, TnefError> {
        if !self.ensure_in_attribute(4, what)? {
            return Ok(Some(0));
        }
        let result = self.read_i32();
        let Some(count) = self.recover_truncation(result, what)? else { return Ok(None) };
        match u32::try_from(count) {
            Ok(c) => Ok(Some(c)),
            Err(_) => {
                self.set_compliance_error(status, format!("negative {} {}", what, count))?;
                Ok(Some(0))
            },
        }
    }

    /// Checks that `count` more bytes still belong to the current attribute.
    fn ensure_in_attribute(&mut self, count: u64, what: &str) -> Result<bool, TnefError> {
        let Some(attribute) = self.props.attribute else { return Ok(false) };
        if self.stream_offset() + count > attribute.value_end() {
            self.set_compliance_error(
                ComplianceStatus::ATTRIBUTE_OVERFLOW,
                format!("{} runs past the end of attribute {:?}", what, attribute.id),
            )?;
            return Ok(false);
        }
        Ok(true)
    }
}


/// Reads the MAPI properties, property rows or scalar value of a TNEF attribute.
///
/// Values are read in place from the underlying stream, so each one can only be read once
/// and only in order.
pub struct TnefPropertyReader<'r, R> {
    reader: &'r mut TnefReader<R>,
}
impl<'r, R: Read> TnefPropertyReader<'r, R> {
    pub(crate) fn new(reader: &'r mut TnefReader<R>) -> Self {
        Self { reader }
    }

    pub fn cursor(&self) -> ValueCursor { self.reader.props.cursor }

    /// The tag of the current property; `None` for scalar attributes.
    pub fn property_tag(&self) -> Option<PropertyTag> { self.reader.props.tag }

    /// The identity of the current property if it is a named one.
    pub fn property_name(&self) -> Option<&NameId> { self.reader.props.name.as_ref() }

    pub fn property_count(&self) -> u32 { self.reader.props.cursor.property_count }
    pub fn row_count(&self) -> u32 { self.reader.props.cursor.row_count }
    pub fn value_count(&self) -> u32 { self.reader.props.cursor.value_count }

    /// Whether the current property holds a nested TNEF message.
    pub fn is_embedded_message(&self) -> bool {
        self.reader.props.tag.map(|t| t.id == PropTag::TagAttachDataBinary).unwrap_or(false)
            && self.reader.attach_method == AttachMethod::EmbeddedMessage
    }

    /// Gives up on the rest of the attribute after a structural error.
    fn abandon(&mut self) {
        let cursor = &mut self.reader.props.cursor;
        cursor.row_count = cursor.row_index;
        cursor.property_count = cursor.property_index;
        cursor.value_count = cursor.value_index;
    }

    /// Advances to the next property, skipping the unread values of the current one.
    pub fn read_next_property(&mut self) -> Result<bool, TnefError> {
        match self.reader.props.payload {
            Payload::Properties => {},
            Payload::Rows if self.reader.props.cursor.row_index > 0 => {},
            _ => return Ok(false),
        }

        while self.read_next_value()? {}

        let cursor = self.reader.props.cursor;
        if cursor.property_index >= cursor.property_count {
            return Ok(false);
        }

        if !self.reader.ensure_in_attribute(4, "property tag")? {
            self.abandon();
            return Ok(false);
        }
        let result = self.reader.read_u16();
        let Some(prop_type) = self.reader.recover_truncation(result, "property type")? else { self.abandon(); return Ok(false) };
        let result = self.reader.read_u16();
        let Some(prop_id) = self.reader.recover_truncation(result, "property ID")? else { self.abandon(); return Ok(false) };
        let tag = PropertyTag::from_raw(prop_id, prop_type);

        let name = if tag.is_named() {
            match self.read_name_id()? {
                Some(n) => Some(n),
                None => {
                    self.abandon();
                    return Ok(false);
                },
            }
        } else {
            None
        };

        let value_count = if tag.is_multi_valued() || tag.value_type().is_variable_length() {
            match self.reader.read_count(ComplianceStatus::INVALID_PROPERTY_LENGTH, "value count")? {
                Some(c) => c,
                None => {
                    self.abandon();
                    return Ok(false);
                },
            }
        } else {
            1
        };
        debug!("property {:?} ({:04X}{:04X}) with {} value(s)", tag.id, prop_id, prop_type, value_count);

        let value_offset = self.reader.stream_offset();
        let state = &mut self.reader.props;
        state.tag = Some(tag);
        state.name = name;
        state.cursor.property_index += 1;
        state.cursor.value_index = 0;
        state.cursor.value_count = value_count;
        state.cursor.value_offset = value_offset;
        state.cursor.value_length = 0;

        if tag.id == PropTag::TagAttachMethod && tag.prop_type == u16::from(PropType::Integer32) {
            if !self.reader.ensure_in_attribute(4, "attach method")? {
                self.abandon();
                return Ok(false);
            }
            let result = self.reader.peek_i32();
            let Some(method) = self.reader.recover_truncation(result, "attach method")? else { self.abandon(); return Ok(false) };
            self.reader.attach_method = AttachMethod::from_base_type(method as u32);
            debug!("attach method: {:?}", self.reader.attach_method);
        }
        Ok(true)
    }

    fn read_name_id(&mut self) -> Result<Option<NameId>, TnefError> {
        if !self.reader.ensure_in_attribute(20, "named property identity")? {
            return Ok(None);
        }
        let mut guid_buf = [0u8; 16];
        let result = self.reader.read_exact(&mut guid_buf);
        if self.reader.recover_truncation(result, "property set GUID")?.is_none() {
            return Ok(None);
        }
        let property_set = Uuid::from_bytes_le(guid_buf);

        let result = self.reader.read_u32();
        let Some(kind_u32) = self.reader.recover_truncation(result, "named property kind")? else { return Ok(None) };
        let id = match PropIdType::try_from_repr(kind_u32) {
            Some(PropIdType::Number) => {
                if !self.reader.ensure_in_attribute(4, "named property number")? {
                    return Ok(None);
                }
                let result = self.reader.read_u32();
                let Some(number) = self.reader.recover_truncation(result, "named property number")? else { return Ok(None) };
                PropId::Number(number)
            },
            Some(PropIdType::String) => {
                if !self.reader.ensure_in_attribute(4, "named property name length")? {
                    return Ok(None);
                }
                let result = self.reader.read_i32();
                let Some(length_i32) = self.reader.recover_truncation(result, "named property name length")? else { return Ok(None) };
                let Ok(length) = u64::try_from(length_i32) else {
                    self.reader.set_compliance_error(
                        ComplianceStatus::INVALID_PROPERTY_LENGTH,
                        format!("negative named property name length {}", length_i32),
                    )?;
                    return Ok(None);
                };
                if !self.reader.ensure_in_attribute(pad_to_4(length), "named property name")? {
                    return Ok(None);
                }

                let mut name_buf = vec![0u8; length as usize];
                let result = self.reader.read_exact(&mut name_buf);
                if self.reader.recover_truncation(result, "named property name")?.is_none() {
                    return Ok(None);
                }
                let padded_end = self.reader.stream_offset() + pad_to_4(length) - length;
                if !self.reader.seek(padded_end)? {
                    self.reader.set_compliance_error(ComplianceStatus::STREAM_TRUNCATED, "stream ends in named property padding")?;
                    return Ok(None);
                }
                PropId::String(decode_unicode(&name_buf))
            },
            None => {
                self.reader.set_compliance_error(
                    ComplianceStatus::INVALID_ATTRIBUTE_VALUE,
                    format!("invalid named property kind 0x{:08X}", kind_u32),
                )?;
                return Ok(None);
            },
        };

        let name_id = NameId { property_set, id };
        debug!("named property: {:?}", name_id);
        Ok(Some(name_id))
    }

    /// Advances to the next row of a property table, skipping what is left of the current one.
    pub fn read_next_row(&mut self) -> Result<bool, TnefError> {
        if self.reader.props.payload != Payload::Rows {
            return Ok(false);
        }

        while self.read_next_property()? {}

        let cursor = self.reader.props.cursor;
        if cursor.row_index >= cursor.row_count {
            return Ok(false);
        }

        let Some(count) = self.reader.read_count(ComplianceStatus::INVALID_PROPERTY_LENGTH, "row property count")? else {
            self.abandon();
            return Ok(false);
        };

        let state = &mut self.reader.props;
        state.tag = None;
        state.name = None;
        state.cursor.row_index += 1;
        state.cursor.property_index = 0;
        state.cursor.property_count = count;
        state.cursor.value_index = 0;
        state.cursor.value_count = 0;
        Ok(true)
    }

    /// Advances to the next value of the current property (or the scalar attribute value).
    pub fn read_next_value(&mut self) -> Result<bool, TnefError> {
        let payload = self.reader.props.payload;
        let Some(attribute) = self.reader.props.attribute else { return Ok(false) };
        if payload == Payload::Nothing {
            return Ok(false);
        }

        let cursor = self.reader.props.cursor;
        if cursor.value_index > 0 && !self.skip_current_value()? {
            self.abandon();
            return Ok(false);
        }
        if cursor.value_index >= cursor.value_count {
            return Ok(false);
        }

        let value_offset = self.reader.stream_offset();
        let value_length = if payload == Payload::Scalar {
            u64::from(attribute.length)
        } else {
            match self.try_get_value_length()? {
                Some(length) => length,
                None => {
                    self.abandon();
                    return Ok(false);
                },
            }
        };

        if value_offset + value_length > attribute.value_end() {
            self.reader.set_compliance_error(
                ComplianceStatus::INVALID_ATTRIBUTE_VALUE,
                format!(
                    "value of {} bytes at offset {} runs past the end of attribute {:?}",
                    value_length, value_offset, attribute.id,
                ),
            )?;
            self.abandon();
            return Ok(false);
        }

        let cursor = &mut self.reader.props.cursor;
        cursor.value_index += 1;
        cursor.value_offset = value_offset;
        cursor.value_length = value_length;
        Ok(true)
    }

    fn skip_current_value(&mut self) -> Result<bool, TnefError> {
        let cursor = self.reader.props.cursor;
        let end = cursor.value_offset + cursor.value_length;
        if self.reader.stream_offset() >= end {
            return Ok(true);
        }
        if !self.reader.seek(end)? {
            self.reader.set_compliance_error(ComplianceStatus::STREAM_TRUNCATED, "stream ends inside a property value")?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Works out how many bytes the value at the current position occupies.
    ///
    /// An unsupported type is recorded and its value treated as empty; any further values of
    /// the property are dropped. `None` means the value cannot be located.
    fn try_get_value_length(&mut self) -> Result<Option<u64>, TnefError> {
        let Some(tag) = self.reader.props.tag else { return Ok(Some(0)) };
        let value_type = tag.value_type();

        if let Some(size) = value_type.fixed_size() {
            return Ok(Some(size as u64));
        }

        if value_type.is_variable_length() {
            if !self.reader.ensure_in_attribute(4, "value length")? {
                return Ok(None);
            }
            let result = self.reader.peek_i32();
            let Some(length_i32) = self.reader.recover_truncation(result, "value length")? else { return Ok(None) };
            let length = match u64::try_from(length_i32) {
                Ok(l) => l,
                Err(_) => {
                    self.reader.set_compliance_error(
                        ComplianceStatus::INVALID_PROPERTY_LENGTH,
                        format!("negative value length {} for property {:?}", length_i32, tag.id),
                    )?;
                    0
                },
            };
            return Ok(Some(4 + pad_to_4(length)));
        }

        self.reader.record_status(
            ComplianceStatus::UNSUPPORTED_PROPERTY_TYPE,
            format!("unsupported type 0x{:04X} of property {:?}", tag.prop_type, tag.id),
        );
        // the values after this one cannot be framed; this one is the last
        let cursor = &mut self.reader.props.cursor;
        cursor.value_count = cursor.value_index + 1;
        Ok(Some(0))
    }

    fn shape(&self) -> Result<ValueShape, TnefError> {
        match (self.reader.props.payload, self.reader.props.tag, self.reader.props.attribute) {
            (Payload::Scalar, _, Some(attribute)) => Ok(ValueShape::Attribute(attribute.attribute_type())),
            (Payload::Properties|Payload::Rows, Some(tag), _) => Ok(ValueShape::Property(tag.value_type())),
            _ => Err(TnefError::invalid_operation("not positioned on a property or attribute value")),
        }
    }

    /// Enters the first value if none has been entered and makes sure it is still unread.
    fn begin_value(&mut self) -> Result<ValueCursor, TnefError> {
        if self.reader.props.cursor.value_index == 0 && !self.read_next_value()? {
            return Err(TnefError::invalid_operation("no value to read"));
        }
        let cursor = self.reader.props.cursor;
        if self.reader.stream_offset() != cursor.value_offset {
            return Err(TnefError::invalid_operation("the current value has already been read"));
        }
        Ok(cursor)
    }

    fn require_length(&mut self, cursor: &ValueCursor, needed: u64) -> Result<(), TnefError> {
        if cursor.value_length < needed {
            self.reader.set_compliance_error(
                ComplianceStatus::INVALID_ATTRIBUTE_LENGTH,
                format!("value has {} bytes, {} needed", cursor.value_length, needed),
            )?;
            return Err(TnefError::invalid_operation("value is too short"));
        }
        Ok(())
    }

    /// The width in bits of the current value if it reads as an integer.
    fn integer_width(shape: ValueShape) -> Option<u32> {
        match shape {
            ValueShape::Property(PropType::Boolean) => Some(1),
            ValueShape::Property(PropType::Integer16) => Some(16),
            ValueShape::Property(PropType::Integer32|PropType::ErrorCode) => Some(32),
            ValueShape::Property(PropType::Currency|PropType::Integer64) => Some(64),
            ValueShape::Attribute(TnefAttributeType::Short|TnefAttributeType::Word) => Some(16),
            ValueShape::Attribute(TnefAttributeType::Long|TnefAttributeType::DWord) => Some(32),
            _ => None,
        }
    }

    /// Reads any integer-like value no wider than `max_bits`, widening it to i64.
    fn read_integer(&mut self, max_bits: u32, accessor: &str) -> Result<i64, TnefError> {
        let shape = self.shape()?;
        match Self::integer_width(shape) {
            Some(bits) if bits <= max_bits => {},
            _ => return Err(TnefError::invalid_operation(format!("cannot read {:?} as {}", shape, accessor))),
        }

        let cursor = self.begin_value()?;
        match shape {
            ValueShape::Property(PropType::Boolean) => Ok(i64::from(self.reader.read_u8()? != 0)),
            ValueShape::Property(PropType::Integer16) => Ok(i64::from(self.reader.read_i16()?)),
            ValueShape::Property(PropType::Integer32|PropType::ErrorCode) => Ok(i64::from(self.reader.read_i32()?)),
            ValueShape::Attribute(TnefAttributeType::Short|TnefAttributeType::Word) => {
                self.require_length(&cursor, 2)?;
                Ok(i64::from(self.reader.read_i16()?))
            },
            ValueShape::Attribute(TnefAttributeType::Long|TnefAttributeType::DWord) => {
                self.require_length(&cursor, 4)?;
                Ok(i64::from(self.reader.read_i32()?))
            },
            _ => self.reader.read_i64(),
        }
    }

    pub fn as_boolean(&mut self) -> Result<bool, TnefError> {
        Ok(self.read_integer(64, "boolean")? != 0)
    }

    pub fn as_i16(&mut self) -> Result<i16, TnefError> {
        Ok(self.read_integer(16, "i16")? as i16)
    }

    pub fn as_i32(&mut self) -> Result<i32, TnefError> {
        Ok(self.read_integer(32, "i32")? as i32)
    }

    pub fn as_i64(&mut self) -> Result<i64, TnefError> {
        self.read_integer(64, "i64")
    }

    pub fn as_f32(&mut self) -> Result<f32, TnefError> {
        match self.shape()? {
            ValueShape::Property(PropType::Floating32) => {
                self.begin_value()?;
                self.reader.read_f32()
            },
            ValueShape::Property(PropType::Boolean|PropType::Integer16) => {
                Ok(self.read_integer(16, "f32")? as f32)
            },
            other => Err(TnefError::invalid_operation(format!("cannot read {:?} as f32", other))),
        }
    }

    pub fn as_f64(&mut self) -> Result<f64, TnefError> {
        match self.shape()? {
            ValueShape::Property(PropType::Floating32) => {
                self.begin_value()?;
                Ok(f64::from(self.reader.read_f32()?))
            },
            ValueShape::Property(PropType::Floating64|PropType::FloatingTime) => {
                self.begin_value()?;
                self.reader.read_f64()
            },
            ValueShape::Property(PropType::Currency) => {
                // fixed point with four decimal places
                Ok(self.read_integer(64, "f64")? as f64 / 10_000.0)
            },
            ValueShape::Property(PropType::Boolean|PropType::Integer16|PropType::Integer32) => {
                Ok(self.read_integer(32, "f64")? as f64)
            },
            other => Err(TnefError::invalid_operation(format!("cannot read {:?} as f64", other))),
        }
    }

    pub fn as_guid(&mut self) -> Result<Uuid, TnefError> {
        match self.shape()? {
            ValueShape::Property(PropType::Guid) => {
                self.begin_value()?;
                let mut buf = [0u8; 16];
                self.reader.read_exact(&mut buf)?;
                Ok(Uuid::from_bytes_le(buf))
            },
            other => Err(TnefError::invalid_operation(format!("cannot read {:?} as GUID", other))),
        }
    }

    /// Reads a timestamp. An impossible date is recorded and read as `None`.
    pub fn as_datetime(&mut self) -> Result<Option<DateTime<Utc>>, TnefError> {
        let shape = self.shape()?;
        let converted = match shape {
            ValueShape::Property(PropType::Time) => {
                self.begin_value()?;
                let ticks = self.reader.read_i64()?;
                filetime_to_datetime(ticks)
            },
            ValueShape::Property(PropType::FloatingTime) => {
                self.begin_value()?;
                let days = self.reader.read_f64()?;
                oa_date_to_datetime(days)
            },
            ValueShape::Attribute(TnefAttributeType::Date) => {
                let cursor = self.begin_value()?;
                self.require_length(&cursor, 14)?;
                let mut words = [0u16; 7];
                for word in &mut words {
                    *word = self.reader.read_u16()?;
                }
                attribute_date_to_datetime(&words)
            },
            other => return Err(TnefError::invalid_operation(format!("cannot read {:?} as date", other))),
        };

        if converted.is_none() {
            self.reader.set_compliance_error(ComplianceStatus::INVALID_DATE, format!("invalid {:?} date", shape))?;
        }
        Ok(converted)
    }

    /// The bytes of the current value, without length prefix or padding.
    pub fn as_bytes(&mut self) -> Result<Vec<u8>, TnefError> {
        match self.shape()? {
            ValueShape::Property(PropType::String|PropType::String8|PropType::Binary|PropType::Object)
                    |ValueShape::Attribute(_) => self.read_raw_value(),
            other => Err(TnefError::invalid_operation(format!("cannot read {:?} as bytes", other))),
        }
    }

    pub fn as_string(&mut self) -> Result<String, TnefError> {
        match self.shape()? {
            ValueShape::Property(PropType::String) => {
                let bytes = self.read_raw_value()?;
                Ok(decode_unicode(&bytes))
            },
            ValueShape::Property(PropType::String8|PropType::Binary)
                    |ValueShape::Attribute(TnefAttributeType::String|TnefAttributeType::Text
                        |TnefAttributeType::Word|TnefAttributeType::Byte) => {
                let encoding = self.reader.encoding;
                let bytes = self.read_raw_value()?;
                Ok(decode_string8(&bytes, encoding))
            },
            other => Err(TnefError::invalid_operation(format!("cannot read {:?} as string", other))),
        }
    }

    /// Reads a URI-valued string (content location, content base).
    pub fn as_uri(&mut self) -> Result<String, TnefError> {
        let text = self.as_string()?;
        Ok(text.trim().to_owned())
    }

    /// A stream over the bytes of the current value.
    ///
    /// For length-prefixed types the prefix is consumed and the stream ends before the padding.
    pub fn raw_value_stream(&mut self) -> Result<RawValueReader<'_, R>, TnefError> {
        let shape = self.shape()?;
        let cursor = self.begin_value()?;
        let length = match shape {
            ValueShape::Property(value_type) if value_type.is_variable_length() => {
                let declared = self.reader.read_i32()?;
                u64::try_from(declared).unwrap_or(0).min(cursor.value_length - 4)
            },
            _ => cursor.value_length,
        };
        Ok(RawValueReader::new(&mut *self.reader, length))
    }

    pub fn read_raw_value(&mut self) -> Result<Vec<u8>, TnefError> {
        let mut stream = self.raw_value_stream()?;
        let mut bytes = Vec::with_capacity(stream.remaining().min(1 << 20) as usize);
        let result = stream.read_to_end(&mut bytes).map_err(TnefError::from);
        // in loose mode, a truncated value yields what could be read
        self.reader.recover_truncation(result, "property value")?;
        Ok(bytes)
    }

    /// Decodes the current text value piece by piece.
    pub fn read_text_value(&mut self) -> Result<TextValueReader<'_, R>, TnefError> {
        let encoding: &'static Encoding = match self.shape()? {
            ValueShape::Property(PropType::String) => UTF_16LE,
            ValueShape::Property(PropType::String8|PropType::Binary)
                    |ValueShape::Attribute(TnefAttributeType::String|TnefAttributeType::Text
                        |TnefAttributeType::Word|TnefAttributeType::Byte) => self.reader.encoding,
            other => return Err(TnefError::invalid_operation(format!("cannot read {:?} as text", other))),
        };
        let raw = self.raw_value_stream()?;
        Ok(TextValueReader::new(raw, encoding))
    }

    /// A reader for the TNEF message embedded in the current attachment data value.
    ///
    /// The 16-byte interface identifier in front of the nested stream is skipped.
    pub fn embedded_reader(&mut self) -> Result<TnefReader<RawValueReader<'_, R>>, TnefError> {
        if !self.is_embedded_message() {
            return Err(TnefError::invalid_operation("the current property is not an embedded message"));
        }

        let depth = self.reader.depth + 1;
        if depth > MAX_NESTING_DEPTH {
            self.reader.set_compliance_error(
                ComplianceStatus::NESTING_TOO_DEEP,
                format!("embedded message nested {} levels deep", depth),
            )?;
        }
        let codepage = self.reader.codepage;
        let mode = self.reader.mode;

        let mut raw = self.raw_value_stream()?;
        let mut interface_id = [0u8; 16];
        raw.read_exact(&mut interface_id)?;
        let limit = raw.remaining();
        TnefReader::nested(raw, codepage, mode, depth, Some(limit))
    }

    /// Reads the current value in whatever representation its type calls for.
    pub fn read_value(&mut self) -> Result<PropValue, TnefError> {
        let shape = self.shape()?;
        let value = match shape {
            ValueShape::Property(value_type) => match value_type {
                PropType::Unspecified|PropType::Null => {
                    self.begin_value()?;
                    PropValue::Null
                },
                PropType::Integer16 => PropValue::Integer16(self.as_i16()?),
                PropType::Integer32 => PropValue::Integer32(self.as_i32()?),
                PropType::Floating32 => PropValue::Floating32(self.as_f32()?),
                PropType::Floating64 => PropValue::Floating64(self.as_f64()?),
                PropType::FloatingTime => PropValue::FloatingTime(self.as_f64()?),
                PropType::Currency => PropValue::Currency(self.as_i64()?),
                PropType::ErrorCode => PropValue::ErrorCode(self.as_i32()? as u32),
                PropType::Boolean => PropValue::Boolean(self.as_boolean()?),
                PropType::Integer64 => PropValue::Integer64(self.as_i64()?),
                PropType::Time => {
                    self.begin_value()?;
                    PropValue::Time(self.reader.read_i64()?)
                },
                PropType::Guid => PropValue::Guid(self.as_guid()?),
                PropType::String8 => PropValue::String8(self.as_string()?),
                PropType::String => PropValue::String(self.as_string()?),
                PropType::Binary => PropValue::Binary(self.read_raw_value()?),
                PropType::Object => PropValue::Object(self.read_raw_value()?),
                PropType::Other(other) => {
                    return Err(TnefError::invalid_operation(format!("unsupported property type 0x{:04X}", other)));
                },
            },
            ValueShape::Attribute(attribute_type) => match attribute_type {
                TnefAttributeType::String|TnefAttributeType::Text => PropValue::String8(self.as_string()?),
                TnefAttributeType::Date => match self.as_datetime()? {
                    Some(datetime) => PropValue::Time(datetime_to_filetime(&datetime)),
                    None => PropValue::Null,
                },
                TnefAttributeType::Short => PropValue::Integer16(self.as_i16()?),
                TnefAttributeType::Long|TnefAttributeType::DWord => PropValue::Integer32(self.as_i32()?),
                TnefAttributeType::Word => {
                    // message classes are strings filed under this type
                    if self.value_length_of_scalar() == 2 {
                        PropValue::Integer16(self.as_i16()?)
                    } else {
                        PropValue::String8(self.as_string()?)
                    }
                },
                TnefAttributeType::Triples|TnefAttributeType::Byte|TnefAttributeType::Other(_) => {
                    PropValue::Binary(self.read_raw_value()?)
                },
            },
        };
        Ok(value)
    }

    fn value_length_of_scalar(&self) -> u64 {
        self.reader.props.attribute.map(|a| u64::from(a.length)).unwrap_or(0)
    }
}
