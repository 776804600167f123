mod prop_enums;
mod tnef_enums;


use std::ops::Range;

use bitflags::bitflags;
use from_to_repr::{from_to_other, FromToRepr};
use uuid::Uuid;

pub use crate::prop_enums::PropTag;
pub use crate::tnef_enums::{ATTRIBUTE_TYPE_MASK, TnefAttributeId, TnefAttributeLevel, TnefAttributeType};


/// Bit set in a property type if the property holds multiple values.
pub const MULTI_VALUED_FLAG: u16 = 0x1000;

/// Property IDs in this range are named properties; their identity is a [`NameId`].
pub const NAMED_PROPERTY_RANGE: Range<u16> = 0x8000..0xFFFE;

/// Property set of named properties with string names and no other home.
pub const PS_PUBLIC_STRINGS: Uuid = Uuid::from_u128(0x00020329_0000_0000_C000_000000000046);

/// Property set of named properties shared by all message classes.
pub const PSETID_COMMON: Uuid = Uuid::from_u128(0x00062008_0000_0000_C000_000000000046);

/// Property set of named properties mirroring Internet message headers.
pub const PS_INTERNET_HEADERS: Uuid = Uuid::from_u128(0x00020386_0000_0000_C000_000000000046);

/// Property set of named properties describing attachments.
pub const PSETID_ATTACHMENT: Uuid = Uuid::from_u128(0x96357F7F_59E1_47D0_99A7_46515C183B54);


/// The type of an Exchange property, without the multi-value flag.
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u16, derive_compare = "as_int")]
pub enum PropType {
    Unspecified = 0x0000,
    Null = 0x0001,
    Integer16 = 0x0002,
    Integer32 = 0x0003,
    Floating32 = 0x0004,
    Floating64 = 0x0005,
    Currency = 0x0006,
    FloatingTime = 0x0007,
    ErrorCode = 0x000A,
    Boolean = 0x000B,
    Object = 0x000D,
    Integer64 = 0x0014,
    String8 = 0x001E,
    String = 0x001F,
    Time = 0x0040,
    Guid = 0x0048,
    Binary = 0x0102,
    Other(u16),
}
impl PropType {
    /// Number of bytes one value of this type occupies in a TNEF property list,
    /// if that number does not depend on the value.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Integer16|Self::Boolean|Self::Integer32|Self::Floating32|Self::ErrorCode => Some(4),
            Self::Currency|Self::Floating64|Self::Integer64|Self::FloatingTime|Self::Time => Some(8),
            Self::Guid => Some(16),
            _ => None,
        }
    }

    /// Whether values of this type are prefixed with their byte length.
    pub fn is_variable_length(&self) -> bool {
        matches!(self, Self::String|Self::String8|Self::Binary|Self::Object)
    }
}

/// The identity of a property: its ID and its type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PropertyTag {
    pub id: PropTag,
    pub prop_type: u16,
}
impl PropertyTag {
    pub fn new(id: PropTag, prop_type: PropType) -> Self {
        Self { id, prop_type: u16::from(prop_type) }
    }

    pub fn from_raw(id: u16, prop_type: u16) -> Self {
        Self { id: PropTag::from_base_type(id), prop_type }
    }

    /// Splits the 32-bit form (`type << 16 | id`).
    pub fn from_u32(value: u32) -> Self {
        let id = (value & 0xFFFF) as u16;
        let prop_type = ((value >> 16) & 0xFFFF) as u16;
        Self::from_raw(id, prop_type)
    }

    /// Joins this tag into its 32-bit form (`type << 16 | id`).
    pub fn to_u32(&self) -> u32 {
        (u32::from(self.prop_type) << 16) | u32::from(self.id_u16())
    }

    pub fn id_u16(&self) -> u16 {
        u16::from(self.id)
    }

    /// The type of each single value of this property.
    pub fn value_type(&self) -> PropType {
        PropType::from_base_type(self.prop_type & !MULTI_VALUED_FLAG)
    }

    pub fn is_multi_valued(&self) -> bool {
        self.prop_type & MULTI_VALUED_FLAG != 0
    }

    pub fn is_named(&self) -> bool {
        NAMED_PROPERTY_RANGE.contains(&self.id_u16())
    }
}

#[derive(Clone, Copy, Debug, Eq, FromToRepr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u32)]
pub enum PropIdType {
    Number = 0x00_00_00_00,
    String = 0x00_00_00_01,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PropId {
    Number(u32),
    String(String),
}

/// The identity of a named property: a property set and a number or name within it.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NameId {
    pub property_set: Uuid,
    pub id: PropId,
}
impl NameId {
    pub fn with_number(property_set: Uuid, number: u32) -> Self {
        Self { property_set, id: PropId::Number(number) }
    }

    pub fn with_name<S: Into<String>>(property_set: Uuid, name: S) -> Self {
        Self { property_set, id: PropId::String(name.into()) }
    }

    pub fn kind(&self) -> PropIdType {
        match self.id {
            PropId::Number(_) => PropIdType::Number,
            PropId::String(_) => PropIdType::String,
        }
    }
}

/// How an attachment's data is stored (`PidTagAttachMethod`).
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u32, derive_compare = "as_int")]
pub enum AttachMethod {
    NoAttachment = 0,
    ByValue = 1,
    ByReference = 2,
    ByReferenceResolve = 3,
    ByReferenceOnly = 4,
    EmbeddedMessage = 6,
    Other(u32),
}

bitflags! {
    /// Rendering hints of an attachment (`PidTagAttachFlags`).
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct AttachFlags: u32 {
        const INVISIBLE_IN_HTML = 0x0000_0001;
        const INVISIBLE_IN_RTF = 0x0000_0002;
        const RENDERED_IN_BODY = 0x0000_0004;
    }
}

/// A single value of an Exchange property.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum PropValue {
    Null,
    Integer16(i16),
    Integer32(i32),
    Floating32(f32),
    Floating64(f64),
    Currency(i64),
    FloatingTime(f64),
    ErrorCode(u32),
    Boolean(bool),
    Object(Vec<u8>),
    Integer64(i64),
    String8(String),
    String(String),
    Time(i64),
    Guid(Uuid),
    Binary(Vec<u8>),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_wire_form() {
        let tag = PropertyTag::new(PropTag::TagSubject, PropType::String8);
        assert_eq!(tag.to_u32(), 0x001E_0037);
        assert_eq!(PropertyTag::from_u32(0x001E_0037), tag);
        assert_eq!(tag.id, PropTag::TagSubject);
        assert_eq!(tag.value_type(), PropType::String8);
        assert!(!tag.is_multi_valued());
        assert!(!tag.is_named());
    }

    #[test]
    fn multi_valued_flag() {
        let tag = PropertyTag::from_raw(0x1234, MULTI_VALUED_FLAG | u16::from(PropType::Integer32));
        assert!(tag.is_multi_valued());
        assert_eq!(tag.value_type(), PropType::Integer32);
        assert_ne!(tag, PropertyTag::from_raw(0x1234, u16::from(PropType::Integer32)));
    }

    #[test]
    fn named_range_bounds() {
        assert!(!PropertyTag::from_raw(0x7FFF, 0x0003).is_named());
        assert!(PropertyTag::from_raw(0x8000, 0x0003).is_named());
        assert!(PropertyTag::from_raw(0xFFFD, 0x0003).is_named());
        assert!(!PropertyTag::from_raw(0xFFFE, 0x0003).is_named());
    }

    #[test]
    fn fixed_sizes() {
        assert_eq!(PropType::Integer16.fixed_size(), Some(4));
        assert_eq!(PropType::Boolean.fixed_size(), Some(4));
        assert_eq!(PropType::Time.fixed_size(), Some(8));
        assert_eq!(PropType::Guid.fixed_size(), Some(16));
        assert_eq!(PropType::Binary.fixed_size(), None);
        assert!(PropType::Object.is_variable_length());
        assert!(!PropType::Null.is_variable_length());
    }

    #[test]
    fn name_id_equality() {
        let a = NameId::with_number(PSETID_COMMON, 0x8580);
        let b = NameId::with_number(PSETID_COMMON, 0x8580);
        let c = NameId::with_number(PS_PUBLIC_STRINGS, 0x8580);
        let d = NameId::with_name(PSETID_COMMON, "Keywords");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(d.kind(), PropIdType::String);
        assert_eq!(PropIdType::try_from_repr(1), Some(PropIdType::String));
    }

    #[test]
    fn attach_method_values() {
        assert_eq!(AttachMethod::from_base_type(1), AttachMethod::ByValue);
        assert_eq!(AttachMethod::from_base_type(6), AttachMethod::EmbeddedMessage);
        assert_eq!(AttachMethod::from_base_type(9), AttachMethod::Other(9));
    }
}
