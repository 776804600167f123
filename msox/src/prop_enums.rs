use from_to_repr::from_to_other;


/// Well-known MAPI property IDs (MS-OXPROPS), without their type.
///
/// IDs in the named-property range (0x8000 to 0xFFFE) are never listed here;
/// they only have meaning together with a [`NameId`](crate::NameId).
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u16, derive_compare = "as_int")]
pub enum PropTag {
    TagAutoForwarded = 0x0005,
    TagImportance = 0x0017,
    TagMessageClass = 0x001A,
    TagPriority = 0x0026,
    TagSensitivity = 0x0036,
    TagSubject = 0x0037,
    TagClientSubmitTime = 0x0039,
    TagSubjectPrefix = 0x003D,
    TagReceivedByName = 0x0040,
    TagSentRepresentingName = 0x0042,
    TagReceivedRepresentingName = 0x0044,
    TagOriginalSubject = 0x0049,
    TagReplyRecipientNames = 0x0050,
    TagConversationTopic = 0x0070,
    TagConversationIndex = 0x0071,
    TagTransportMessageHeaders = 0x007D,
    TagRecipientType = 0x0C15,
    TagSenderName = 0x0C1A,
    TagSenderAddressType = 0x0C1E,
    TagSenderEmailAddress = 0x0C1F,
    TagDisplayBcc = 0x0E02,
    TagDisplayCc = 0x0E03,
    TagDisplayTo = 0x0E04,
    TagMessageDeliveryTime = 0x0E06,
    TagMessageFlags = 0x0E07,
    TagMessageSize = 0x0E08,
    TagHasAttachments = 0x0E1B,
    TagNormalizedSubject = 0x0E1D,
    TagRtfInSync = 0x0E1F,
    TagAttachSize = 0x0E20,
    TagAttachNumber = 0x0E21,
    TagInstanceKey = 0x0FF6,
    TagRecordKey = 0x0FF9,
    TagObjectType = 0x0FFE,
    TagEntryId = 0x0FFF,
    TagBody = 0x1000,
    TagRtfCompressed = 0x1009,
    TagBodyHtml = 0x1013,
    // TagHtml = TagBodyHtml
    TagBodyContentLocation = 0x1014,
    TagBodyContentId = 0x1015,
    TagNativeBody = 0x1016,
    TagInternetMessageId = 0x1035,
    TagInternetReferences = 0x1039,
    TagInReplyToId = 0x1042,
    TagRowid = 0x3000,
    TagDisplayName = 0x3001,
    TagAddressType = 0x3002,
    TagEmailAddress = 0x3003,
    TagComment = 0x3004,
    TagCreationTime = 0x3007,
    TagLastModificationTime = 0x3008,
    TagSearchKey = 0x300B,
    TagStoreSupportMask = 0x340D,
    TagSmtpAddress = 0x39FE,
    TagAttachDataBinary = 0x3701,
    // TagAttachDataObject = TagAttachDataBinary
    TagAttachEncoding = 0x3702,
    TagAttachExtension = 0x3703,
    TagAttachFilename = 0x3704,
    TagAttachMethod = 0x3705,
    TagAttachLongFilename = 0x3707,
    TagAttachPathname = 0x3708,
    TagAttachRendering = 0x3709,
    TagAttachTag = 0x370A,
    TagRenderingPosition = 0x370B,
    TagAttachTransportName = 0x370C,
    TagAttachLongPathname = 0x370D,
    TagAttachMimeTag = 0x370E,
    TagAttachAdditionalInformation = 0x370F,
    TagAttachContentBase = 0x3711,
    TagAttachContentId = 0x3712,
    TagAttachContentLocation = 0x3713,
    TagAttachFlags = 0x3714,
    TagAttachContentDisposition = 0x3716,
    TagAttachPayloadProviderGuidString = 0x3719,
    TagAttachPayloadClass = 0x371A,
    TagTextAttachmentCharset = 0x371B,
    TagInternetCodepage = 0x3FDE,
    TagMessageLocaleId = 0x3FF1,
    TagCreatorName = 0x3FF8,
    TagLastModifierName = 0x3FFA,
    TagMessageCodepage = 0x3FFD,
    TagAttachmentLinkId = 0x7FFA,
    TagExceptionStartTime = 0x7FFB,
    TagExceptionEndTime = 0x7FFC,
    TagAttachmentFlags = 0x7FFD,
    TagAttachmentHidden = 0x7FFE,
    TagAttachmentContactPhoto = 0x7FFF,
    Other(u16),
}
