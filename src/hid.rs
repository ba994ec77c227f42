// SPDX-License-Identifier: MIT

//! Tokenizer for the items of a HID Report Descriptor.
//!
//! This module only splits the byte stream into [Item]s and decodes each
//! item's type, tag and data. Applying the items to build the reports is
//! done by [crate::parse_report_descriptor].
//!
//! References to "Section a.b.c" are to the
//! [HID Device Class Definition for HID 1.11](https://www.usb.org/document-library/device-class-definition-hid-111).
//!
//! # Listing the items of a descriptor
//!
//! [`ReportDescriptorItems::try_from(bytes)`](ReportDescriptorItems::try_from) fails on the
//! first truncated item, the lazy [`items()`] iterator hands out every
//! item before the truncation:
//!
//! ```
//! # use hidfield::hid::*;
//! # fn dump(bytes: &[u8]) {
//! for rdesc_item in items(bytes) {
//!     let Ok(rdesc_item) = rdesc_item else {
//!         break;
//!     };
//!     let item = rdesc_item.item();
//!     if let ItemType::Global(GlobalItem::ReportId(id)) = item.item_type() {
//!         println!("Report ID {id} at offset {:#x}", rdesc_item.offset());
//!     }
//! }
//! # }
//! ```

use crate::types::*;
use crate::{ensure, ParserError};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The data of a short item, 0, 1, 2 or 4 bytes in little endian.
///
/// Whether the data is signed depends on the item's tag, so both
/// interpretations are available: `u32::from` zero-extends, `i32::from`
/// sign-extends from the data's width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HidValue {
    value: u32,
    nbytes: usize,
}

impl HidValue {
    /// Number of data bytes
    pub fn len(&self) -> usize {
        self.nbytes
    }

    pub fn is_empty(&self) -> bool {
        self.nbytes == 0
    }
}

impl TryFrom<&[u8]> for HidValue {
    type Error = HidError;

    fn try_from(bytes: &[u8]) -> Result<HidValue> {
        let value = match *bytes {
            [] => 0,
            [b0] => b0 as u32,
            [b0, b1] => u16::from_le_bytes([b0, b1]) as u32,
            [b0, b1, b2, b3] => u32::from_le_bytes([b0, b1, b2, b3]),
            _ => {
                return Err(HidError::InvalidData {
                    message: format!("Cannot convert {} bytes to a HID value", bytes.len()),
                })
            }
        };
        Ok(HidValue {
            value,
            nbytes: bytes.len(),
        })
    }
}

impl From<&HidValue> for u32 {
    fn from(v: &HidValue) -> u32 {
        v.value
    }
}

impl From<HidValue> for u32 {
    fn from(v: HidValue) -> u32 {
        u32::from(&v)
    }
}

impl From<&HidValue> for i32 {
    /// Sign-extends the value from its native width of 8, 16 or 32 bits.
    fn from(v: &HidValue) -> i32 {
        match v.len() {
            1 => ((v.value & 0xFF) as i8) as i32,
            2 => ((v.value & 0xFFFF) as i16) as i32,
            _ => v.value as i32,
        }
    }
}

impl From<HidValue> for i32 {
    fn from(v: HidValue) -> i32 {
        i32::from(&v)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HidError {
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
    #[error("Insufficient data")]
    InsufficientData,
}

type Result<T> = std::result::Result<T, HidError>;

/// The decoded type and tag of an item, see Section 6.2.2.2.
///
/// [ItemType::Long] and [ItemType::Reserved] (type 3) carry no data that
/// affects the reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemType {
    Main(MainItem),
    Global(GlobalItem),
    Local(LocalItem),
    Long,
    Reserved,
}

/// Main items, see Section 6.2.2.4. Input, Output and Feature each add a
/// field to a report, Collection and End Collection group fields.
///
/// The data flags of Input, Output and Feature items (constant, variable, ...)
/// do not affect the report layout and are not decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MainItem {
    Input,
    Output,
    Feature,
    Collection(CollectionItem),
    EndCollection,
    /// Tags 0x0-0x7 and 0xD-0xE.
    Reserved { tag: u8 },
}

/// The type of a collection, Section 6.2.2.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CollectionItem {
    Physical,
    Application,
    Logical,
    Report,
    NamedArray,
    UsageSwitch,
    UsageModifier,
    Reserved { value: u8 },
    VendorDefined { value: u8 },
}

impl From<u8> for CollectionItem {
    fn from(v: u8) -> CollectionItem {
        match v {
            0x00 => CollectionItem::Physical,
            0x01 => CollectionItem::Application,
            0x02 => CollectionItem::Logical,
            0x03 => CollectionItem::Report,
            0x04 => CollectionItem::NamedArray,
            0x05 => CollectionItem::UsageSwitch,
            0x06 => CollectionItem::UsageModifier,
            value @ 0x07..=0x7f => CollectionItem::Reserved { value },
            value @ 0x80..=0xff => CollectionItem::VendorDefined { value },
        }
    }
}

/// Global items, Section 6.2.2.7. These stay in effect for every following
/// Main item until changed or restored by [GlobalItem::Pop].
///
/// Logical and Physical Minimum/Maximum and the Unit Exponent are taken
/// as signed values, everything else is unsigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalItem {
    UsagePage(UsagePage),
    LogicalMinimum(LogicalMinimum),
    LogicalMaximum(LogicalMaximum),
    PhysicalMinimum(PhysicalMinimum),
    PhysicalMaximum(PhysicalMaximum),
    UnitExponent(UnitExponent),
    Unit(Unit),
    ReportSize(ReportSize),
    ReportId(ReportId),
    ReportCount(ReportCount),
    Push,
    Pop,
    /// Tags 0xC-0xE.
    Reserved { tag: u8 },
}

/// Local items, Section 6.2.2.8. These apply to the next Main item only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalItem {
    Usage(UsageId),
    UsageMinimum(UsageMinimum),
    UsageMaximum(UsageMaximum),
    DesignatorIndex(DesignatorIndex),
    DesignatorMinimum(DesignatorMinimum),
    DesignatorMaximum(DesignatorMaximum),
    StringIndex(StringIndex),
    StringMinimum(StringMinimum),
    StringMaximum(StringMaximum),
    Delimiter(Delimiter),
    /// Tag 0x6 and tags 0xB-0xE.
    Reserved { tag: u8 },
}

impl ItemType {
    /// Decode the item type and tag of the given header byte, taking the
    /// item's data from `value`.
    fn from_header(header: u8, value: &HidValue) -> ItemType {
        let tag = (header >> 4) & 0xF;
        match (header >> 2) & 0x3 {
            0 => ItemType::Main(MainItem::from_tag(tag, value)),
            1 => ItemType::Global(GlobalItem::from_tag(tag, value)),
            2 => ItemType::Local(LocalItem::from_tag(tag, value)),
            _ => ItemType::Reserved,
        }
    }
}

impl MainItem {
    fn from_tag(tag: u8, value: &HidValue) -> MainItem {
        match tag {
            0x8 => MainItem::Input,
            0x9 => MainItem::Output,
            0xA => MainItem::Collection(CollectionItem::from((u32::from(value) & 0xFF) as u8)),
            0xB => MainItem::Feature,
            0xC => MainItem::EndCollection,
            tag => MainItem::Reserved { tag },
        }
    }
}

impl GlobalItem {
    fn from_tag(tag: u8, value: &HidValue) -> GlobalItem {
        match tag {
            0x0 => GlobalItem::UsagePage(UsagePage(value.into())),
            0x1 => GlobalItem::LogicalMinimum(LogicalMinimum(value.into())),
            0x2 => GlobalItem::LogicalMaximum(LogicalMaximum(value.into())),
            0x3 => GlobalItem::PhysicalMinimum(PhysicalMinimum(value.into())),
            0x4 => GlobalItem::PhysicalMaximum(PhysicalMaximum(value.into())),
            0x5 => GlobalItem::UnitExponent(UnitExponent(value.into())),
            0x6 => GlobalItem::Unit(Unit(value.into())),
            0x7 => GlobalItem::ReportSize(ReportSize(value.into())),
            0x8 => GlobalItem::ReportId(ReportId(value.into())),
            0x9 => GlobalItem::ReportCount(ReportCount(value.into())),
            0xA => GlobalItem::Push,
            0xB => GlobalItem::Pop,
            tag => GlobalItem::Reserved { tag },
        }
    }
}

impl LocalItem {
    fn from_tag(tag: u8, value: &HidValue) -> LocalItem {
        match tag {
            0x0 => LocalItem::Usage(UsageId(value.into())),
            0x1 => LocalItem::UsageMinimum(UsageMinimum(value.into())),
            0x2 => LocalItem::UsageMaximum(UsageMaximum(value.into())),
            0x3 => LocalItem::DesignatorIndex(DesignatorIndex(value.into())),
            0x4 => LocalItem::DesignatorMinimum(DesignatorMinimum(value.into())),
            0x5 => LocalItem::DesignatorMaximum(DesignatorMaximum(value.into())),
            0x7 => LocalItem::StringIndex(StringIndex(value.into())),
            0x8 => LocalItem::StringMinimum(StringMinimum(value.into())),
            0x9 => LocalItem::StringMaximum(StringMaximum(value.into())),
            0xA => LocalItem::Delimiter(Delimiter(value.into())),
            tag => LocalItem::Reserved { tag },
        }
    }
}

/// A single item as found in the descriptor, either a short item of 1-5
/// bytes or a long item (Section 6.2.2.3). HID 1.11 defines no long item
/// tags, so long items are recognized but their data is never interpreted.
pub trait Item {
    /// Number of bytes including the header byte.
    fn size(&self) -> usize;

    fn item_type(&self) -> ItemType;

    /// The tag of this item as shifted-down numeric value, i.e. the upper
    /// 4 bits in the header byte in the range 0..15.
    fn tag(&self) -> u8 {
        (self.header() & 0b11110000) >> 4
    }

    /// The header byte of this item, comprising data size, type and tag.
    fn header(&self) -> u8;

    /// Returns true if this item is a Long Item (tag 0xF).
    fn is_long_item(&self) -> bool;

    /// The raw bytes of this item, starting with the header byte.
    fn bytes(&self) -> &[u8];

    /// The item's data value. Long items and items without data
    /// return an empty value of zero.
    fn value(&self) -> HidValue;
}

#[derive(Debug, Clone)]
struct ShortItem {
    header: u8,
    item_type: ItemType,
    value: HidValue,
    bytes: Vec<u8>,
}

impl Item for ShortItem {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn item_type(&self) -> ItemType {
        self.item_type
    }

    fn header(&self) -> u8 {
        self.header
    }

    fn is_long_item(&self) -> bool {
        false
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn value(&self) -> HidValue {
        self.value
    }
}

impl TryFrom<&[u8]> for ShortItem {
    type Error = HidError;

    fn try_from(bytes: &[u8]) -> Result<ShortItem> {
        ensure!(!bytes.is_empty(), HidError::InsufficientData);
        let header = bytes[0];
        let size = match header & 0b0011 {
            0 => 0,
            1 => 1,
            2 => 2,
            _ => 4,
        };
        ensure!(bytes.len() > size, HidError::InsufficientData);
        let value = HidValue::try_from(&bytes[1..size + 1])?;

        Ok(ShortItem {
            header,
            item_type: ItemType::from_header(header, &value),
            value,
            bytes: bytes[0..size + 1].to_owned(),
        })
    }
}

/// A long item: the header byte, one byte of data length and that many
/// bytes of data.
#[derive(Debug, Clone)]
struct LongItem {
    header: u8,
    bytes: Vec<u8>,
}

impl Item for LongItem {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn item_type(&self) -> ItemType {
        ItemType::Long
    }

    fn header(&self) -> u8 {
        self.header
    }

    fn is_long_item(&self) -> bool {
        true
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn value(&self) -> HidValue {
        HidValue::default()
    }
}

impl TryFrom<&[u8]> for LongItem {
    type Error = HidError;

    fn try_from(bytes: &[u8]) -> Result<LongItem> {
        ensure!(bytes.len() >= 2, HidError::InsufficientData);
        let size = bytes[1] as usize;
        ensure!(bytes.len() >= size + 2, HidError::InsufficientData);

        Ok(LongItem {
            header: bytes[0],
            bytes: bytes[0..size + 2].to_owned(),
        })
    }
}

#[derive(Debug, Clone)]
enum RawItem {
    Short(ShortItem),
    Long(LongItem),
}

impl Item for RawItem {
    fn size(&self) -> usize {
        match self {
            RawItem::Short(i) => i.size(),
            RawItem::Long(i) => i.size(),
        }
    }

    fn item_type(&self) -> ItemType {
        match self {
            RawItem::Short(i) => i.item_type(),
            RawItem::Long(i) => i.item_type(),
        }
    }

    fn header(&self) -> u8 {
        match self {
            RawItem::Short(i) => i.header(),
            RawItem::Long(i) => i.header(),
        }
    }

    fn is_long_item(&self) -> bool {
        matches!(self, RawItem::Long(_))
    }

    fn bytes(&self) -> &[u8] {
        match self {
            RawItem::Short(i) => i.bytes(),
            RawItem::Long(i) => i.bytes(),
        }
    }

    fn value(&self) -> HidValue {
        match self {
            RawItem::Short(i) => i.value(),
            RawItem::Long(i) => i.value(),
        }
    }
}

impl TryFrom<&[u8]> for RawItem {
    type Error = HidError;

    fn try_from(bytes: &[u8]) -> Result<RawItem> {
        ensure!(!bytes.is_empty(), HidError::InsufficientData);
        if bytes[0] >> 4 == 0xF {
            Ok(RawItem::Long(LongItem::try_from(bytes)?))
        } else {
            Ok(RawItem::Short(ShortItem::try_from(bytes)?))
        }
    }
}

/// An [Item] together with its position in the descriptor.
#[derive(Debug, Clone)]
pub struct ReportDescriptorItem {
    offset: usize,
    item: RawItem,
}

impl ReportDescriptorItem {
    /// Byte offset of the item's header byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn item(&self) -> &impl Item {
        &self.item
    }
}

/// Lazy iterator over the items of a report descriptor, see [items()].
///
/// Once an item fails to decode the error is returned and the iterator
/// is exhausted.
#[derive(Debug, Clone)]
pub struct ItemIter<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

/// Iterate over the items of the given report descriptor bytes.
///
/// A truncated item yields [ParserError::NotEnoughData] whose offset is
/// the first byte following the item's header byte.
pub fn items(bytes: &[u8]) -> ItemIter<'_> {
    ItemIter {
        bytes,
        offset: 0,
        failed: false,
    }
}

impl Iterator for ItemIter<'_> {
    type Item = crate::Result<ReportDescriptorItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }

        let offset = self.offset;
        match RawItem::try_from(&self.bytes[offset..]) {
            Ok(item) => {
                self.offset += item.size();
                Some(Ok(ReportDescriptorItem { offset, item }))
            }
            Err(e) => {
                self.failed = true;
                // short items only ever carry 0, 1, 2 or 4 data bytes, so
                // the only failure left is running out of bytes
                tracing::trace!("Item at offset {offset}: {e}");
                Some(Err(ParserError::NotEnoughData { offset: offset + 1 }))
            }
        }
    }
}

/// All items of a report descriptor, see [items()] for a lazy version.
#[derive(Debug)]
pub struct ReportDescriptorItems {
    items: Vec<ReportDescriptorItem>,
}

impl std::ops::Deref for ReportDescriptorItems {
    type Target = [ReportDescriptorItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl TryFrom<&[u8]> for ReportDescriptorItems {
    type Error = ParserError;

    fn try_from(bytes: &[u8]) -> crate::Result<Self> {
        let items = items(bytes).collect::<crate::Result<Vec<_>>>()?;
        Ok(ReportDescriptorItems { items })
    }
}
