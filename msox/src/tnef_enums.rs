use from_to_repr::from_to_other;


/// The level at which a TNEF attribute applies.
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u8, derive_compare = "as_int")]
pub enum TnefAttributeLevel {
    Message = 0x01,
    Attachment = 0x02,
    Other(u8),
}

/// The value type of a legacy TNEF attribute, as encoded in bits 16 to 19 of its ID.
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u32, derive_compare = "as_int")]
pub enum TnefAttributeType {
    Triples = 0x0000_0000,
    String = 0x0001_0000,
    Text = 0x0002_0000,
    Date = 0x0003_0000,
    Short = 0x0004_0000,
    Long = 0x0005_0000,
    Byte = 0x0006_0000,
    Word = 0x0007_0000,
    DWord = 0x0008_0000,
    Other(u32),
}

pub const ATTRIBUTE_TYPE_MASK: u32 = 0x000F_0000;

/// The ID of a TNEF attribute, including its value type.
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u32, derive_compare = "as_int")]
pub enum TnefAttributeId {
    Owner = 0x0006_0000,
    SentFor = 0x0006_0001,
    Delegate = 0x0006_0002,
    OriginalMessageClass = 0x0007_0006,
    DateStart = 0x0003_0006,
    DateEnd = 0x0003_0007,
    AidOwner = 0x0005_0008,
    RequestResponse = 0x0004_0009,
    From = 0x0000_8000,
    Subject = 0x0001_8004,
    DateSent = 0x0003_8005,
    DateReceived = 0x0003_8006,
    MessageStatus = 0x0006_8007,
    MessageClass = 0x0007_8008,
    MessageId = 0x0001_8009,
    ParentId = 0x0001_800A,
    ConversationId = 0x0001_800B,
    Body = 0x0002_800C,
    Priority = 0x0004_800D,
    AttachData = 0x0006_800F,
    AttachTitle = 0x0001_8010,
    AttachMetaFile = 0x0006_8011,
    AttachCreateDate = 0x0003_8012,
    AttachModifyDate = 0x0003_8013,
    DateModified = 0x0003_8020,
    AttachTransportFilename = 0x0006_9001,
    AttachRenderData = 0x0006_9002,
    MsgProps = 0x0006_9003,
    RecipTable = 0x0006_9004,
    Attachment = 0x0006_9005,
    TnefVersion = 0x0008_9006,
    OemCodepage = 0x0006_9007,
    Other(u32),
}
impl TnefAttributeId {
    /// The value type encoded in this attribute ID.
    pub fn attribute_type(&self) -> TnefAttributeType {
        TnefAttributeType::from_base_type(u32::from(*self) & ATTRIBUTE_TYPE_MASK)
    }

    /// Whether this is one of the attribute IDs defined by MS-OXTNEF.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Whether the value of this attribute is a list of MAPI properties.
    pub fn carries_properties(&self) -> bool {
        matches!(self, Self::MsgProps | Self::Attachment)
    }

    /// Whether the value of this attribute is a table of MAPI property rows.
    pub fn carries_rows(&self) -> bool {
        matches!(self, Self::RecipTable)
    }
}
