#![allow(dead_code)]

//! Builders for synthetic TNEF streams.


pub const LEVEL_MESSAGE: u8 = 1;
pub const LEVEL_ATTACHMENT: u8 = 2;

pub const ATT_SUBJECT: u32 = 0x0001_8004;
pub const ATT_MESSAGE_CLASS: u32 = 0x0007_8008;
pub const ATT_ATTACH_DATA: u32 = 0x0006_800F;
pub const ATT_ATTACH_TITLE: u32 = 0x0001_8010;
pub const ATT_ATTACH_CREATE_DATE: u32 = 0x0003_8012;
pub const ATT_ATTACH_MODIFY_DATE: u32 = 0x0003_8013;
pub const ATT_ATTACH_RENDER_DATA: u32 = 0x0006_9002;
pub const ATT_MSG_PROPS: u32 = 0x0006_9003;
pub const ATT_RECIP_TABLE: u32 = 0x0006_9004;
pub const ATT_ATTACHMENT: u32 = 0x0006_9005;
pub const ATT_TNEF_VERSION: u32 = 0x0008_9006;
pub const ATT_OEM_CODEPAGE: u32 = 0x0006_9007;

pub const PT_I2: u16 = 0x0002;
pub const PT_LONG: u16 = 0x0003;
pub const PT_R4: u16 = 0x0004;
pub const PT_DOUBLE: u16 = 0x0005;
pub const PT_CURRENCY: u16 = 0x0006;
pub const PT_APPTIME: u16 = 0x0007;
pub const PT_ERROR: u16 = 0x000A;
pub const PT_BOOLEAN: u16 = 0x000B;
pub const PT_OBJECT: u16 = 0x000D;
pub const PT_I8: u16 = 0x0014;
pub const PT_STRING8: u16 = 0x001E;
pub const PT_UNICODE: u16 = 0x001F;
pub const PT_SYSTIME: u16 = 0x0040;
pub const PT_CLSID: u16 = 0x0048;
pub const PT_BINARY: u16 = 0x0102;
pub const MV_FLAG: u16 = 0x1000;


pub fn checksum(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// A length-prefixed value padded to a multiple of 4 bytes.
pub fn padded(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as i32).to_le_bytes());
    out.extend_from_slice(data);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

pub fn utf16z(text: &str) -> Vec<u8> {
    let mut out: Vec<u8> = text.encode_utf16()
        .flat_map(|u| u.to_le_bytes())
        .collect();
    out.extend_from_slice(&[0, 0]);
    out
}

pub fn string8z(text: &str) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.push(0);
    out
}


/// Builds a TNEF stream attribute by attribute.
pub struct TnefBuilder {
    bytes: Vec<u8>,
}
impl TnefBuilder {
    pub fn new() -> Self {
        Self::with_signature(0x223E9F78)
    }

    pub fn with_signature(signature: u32) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&signature.to_le_bytes());
        bytes.extend_from_slice(&0x1234u16.to_le_bytes());
        Self { bytes }
    }

    /// Appends an attribute with a correct checksum.
    pub fn attribute(self, level: u8, id: u32, value: &[u8]) -> Self {
        let sum = checksum(value);
        self.attribute_with_checksum(level, id, value, sum)
    }

    pub fn attribute_with_checksum(mut self, level: u8, id: u32, value: &[u8], sum: u16) -> Self {
        self.bytes.push(level);
        self.bytes.extend_from_slice(&id.to_le_bytes());
        self.bytes.extend_from_slice(&(value.len() as i32).to_le_bytes());
        self.bytes.extend_from_slice(value);
        self.bytes.extend_from_slice(&sum.to_le_bytes());
        self
    }

    /// Appends raw bytes, for streams that do not follow the framing.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> { self.bytes }
}


/// Builds the value of a property-list attribute.
pub struct PropsBuilder {
    count: i32,
    bytes: Vec<u8>,
}
impl PropsBuilder {
    pub fn new() -> Self {
        Self { count: 0, bytes: Vec::new() }
    }

    fn tag(&mut self, prop_type: u16, id: u16) {
        self.count += 1;
        self.bytes.extend_from_slice(&prop_type.to_le_bytes());
        self.bytes.extend_from_slice(&id.to_le_bytes());
    }

    /// A fixed-size value, zero-padded to a multiple of 4 bytes.
    pub fn fixed(mut self, prop_type: u16, id: u16, value: &[u8]) -> Self {
        self.tag(prop_type, id);
        self.bytes.extend_from_slice(value);
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        self
    }

    /// A single variable-length value with its value count.
    pub fn variable(mut self, prop_type: u16, id: u16, data: &[u8]) -> Self {
        self.tag(prop_type, id);
        self.bytes.extend_from_slice(&1i32.to_le_bytes());
        self.bytes.extend_from_slice(&padded(data));
        self
    }

    /// A multi-valued fixed-size property.
    pub fn multi_fixed(mut self, prop_type: u16, id: u16, values: &[&[u8]]) -> Self {
        self.tag(prop_type | MV_FLAG, id);
        self.bytes.extend_from_slice(&(values.len() as i32).to_le_bytes());
        for value in values {
            self.bytes.extend_from_slice(value);
            while self.bytes.len() % 4 != 0 {
                self.bytes.push(0);
            }
        }
        self
    }

    /// A named property identified by number, holding one 32-bit integer.
    pub fn named_number_long(mut self, id: u16, guid: [u8; 16], number: u32, value: i32) -> Self {
        self.tag(PT_LONG, id);
        self.bytes.extend_from_slice(&guid);
        self.bytes.extend_from_slice(&0u32.to_le_bytes());
        self.bytes.extend_from_slice(&number.to_le_bytes());
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// A named property identified by name, holding one 8-bit string.
    pub fn named_string_string8(mut self, id: u16, guid: [u8; 16], name: &str, value: &str) -> Self {
        self.tag(PT_STRING8, id);
        self.bytes.extend_from_slice(&guid);
        self.bytes.extend_from_slice(&1u32.to_le_bytes());
        self.bytes.extend_from_slice(&padded(&utf16z(name)));
        self.bytes.extend_from_slice(&1i32.to_le_bytes());
        self.bytes.extend_from_slice(&padded(&string8z(value)));
        self
    }

    pub fn long(self, id: u16, value: i32) -> Self {
        self.fixed(PT_LONG, id, &value.to_le_bytes())
    }

    pub fn string8(self, id: u16, value: &str) -> Self {
        self.variable(PT_STRING8, id, &string8z(value))
    }

    pub fn unicode(self, id: u16, value: &str) -> Self {
        self.variable(PT_UNICODE, id, &utf16z(value))
    }

    pub fn binary(self, id: u16, value: &[u8]) -> Self {
        self.variable(PT_BINARY, id, value)
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = self.count.to_le_bytes().to_vec();
        out.extend_from_slice(&self.bytes);
        out
    }
}
