// SPDX-License-Identifier: MIT

//! This crate provides a parser for HID Report Descriptors and a set of
//! bit-level accessors to decode the fields of the reports those
//! descriptors describe.
//!
//! The entry point is usually [`ReportTable::try_from(bytes)`](ReportTable::try_from)
//! or, where a partially parsed descriptor is still of use,
//! [parse_report_descriptor]:
//!
//! ```
//! # use hidfield::*;
//! # fn read(bytes: &[u8], report: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let table = ReportTable::try_from(bytes)?;
//! for r in table.input_reports() {
//!     println!("Input report {} has {} bytes", r.id(), r.size_in_bytes());
//! }
//! // Generic Desktop / X
//! let x = table.read_signed(report, UsagePage(0x01), UsageId(0x30))?;
//! println!("X moved by {x}");
//! # Ok(())
//! # }
//! ```
//!
//! The [hid] module exposes the raw items of a report descriptor for
//! callers that need to look at the descriptor itself rather than the
//! reports it describes.

use std::collections::HashMap;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod codec;
pub mod hex;
pub mod hid;
pub mod hut;
pub mod types;

use hid::*;
pub use codec::{FieldError, FieldLocation};
pub use types::*;

/// Return early with the given error if the condition does not hold.
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}
pub(crate) use ensure;

/// The three kinds of reports a device may have.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Direction {
    Input,
    Output,
    Feature,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Input => "Input",
            Direction::Output => "Output",
            Direction::Feature => "Feature",
        };
        write!(f, "{s}")
    }
}

/// A collection enclosing a field, see Section 6.2.2.6.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Collection {
    pub kind: CollectionItem,
    /// The Usage Page in effect when the collection was opened
    pub usage_page: UsagePage,
    /// The first Usage preceding the collection or zero if there was none
    pub usage: UsageId,
}

/// One Input, Output or Feature main item within a [Report].
///
/// A field describes [ReportField::count] elements of [ReportField::bit_size]
/// bits each, starting at [ReportField::bit_offset] within the report's data.
/// The bit offset does not include the leading report ID byte, see
/// [codec::locate_field] for the offset within a report as sent by the device.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReportField {
    pub bit_offset: usize,
    pub bit_size: usize,
    pub count: usize,
    pub usage_page: UsagePage,
    /// The Usage local items in descriptor order
    pub usages: Vec<UsageId>,
    pub usage_minimum: UsageMinimum,
    pub usage_maximum: UsageMaximum,
    pub logical_minimum: LogicalMinimum,
    pub logical_maximum: LogicalMaximum,
    pub physical_minimum: PhysicalMinimum,
    pub physical_maximum: PhysicalMaximum,
    pub unit_exponent: UnitExponent,
    pub unit: Unit,
    /// The enclosing collections, outermost first
    pub collections: Vec<Collection>,
}

impl ReportField {
    /// The number of bits this field occupies in its report.
    pub fn size_in_bits(&self) -> usize {
        self.bit_size.saturating_mul(self.count)
    }
}

impl std::fmt::Display for ReportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let usages = self
            .usages
            .iter()
            .map(|u| format!("{u:#04X}"))
            .collect::<Vec<String>>()
            .join(", ");
        write!(
            f,
            "BitOffset: {}, BitSize: {}, Count: {}, UsagePage: {:#04X}, Usage: [{}], UsageMinimum: {:#04X}, UsageMaximum: {:#04X}, LogicalMinimum: {}, LogicalMaximum: {}",
            self.bit_offset,
            self.bit_size,
            self.count,
            self.usage_page,
            usages,
            self.usage_minimum,
            self.usage_maximum,
            self.logical_minimum,
            self.logical_maximum,
        )
    }
}

/// A single report of one [Direction], identified by its [ReportId].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Report {
    id: ReportId,
    direction: Direction,
    /// The size of this report in bits, excluding the report ID byte
    size: usize,
    fields: Vec<ReportField>,
}

impl Report {
    fn new(id: ReportId, direction: Direction) -> Self {
        Report {
            id,
            direction,
            size: 0,
            fields: vec![],
        }
    }

    /// The report ID, [ReportId] zero if the descriptor never set one.
    pub fn id(&self) -> ReportId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The sum of all fields' sizes in bits.
    pub fn size_in_bits(&self) -> usize {
        self.size
    }

    /// The size in bytes, rounded up. This does not include the
    /// report ID byte.
    pub fn size_in_bytes(&self) -> usize {
        self.size.div_ceil(8)
    }

    /// The fields of this report in descriptor order.
    pub fn fields(&self) -> &[ReportField] {
        &self.fields
    }

    fn append(&mut self, mut field: ReportField) {
        field.bit_offset = self.size;
        self.size = self.size.saturating_add(field.size_in_bits());
        self.fields.push(field);
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "ReportID: {:#04X}, NumBytes: {}",
            self.id,
            self.size_in_bytes()
        )?;
        for field in &self.fields {
            writeln!(f, "\t{field}")?;
        }
        Ok(())
    }
}

/// The reports described by a HID Report Descriptor, grouped by [Direction].
/// Within each direction there is at most one [Report] per [ReportId] and
/// reports are in the order they first appear in the descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReportTable {
    input_reports: Vec<Report>,
    output_reports: Vec<Report>,
    feature_reports: Vec<Report>,
    valid: bool,
}

impl ReportTable {
    pub fn input_reports(&self) -> &[Report] {
        &self.input_reports
    }

    pub fn output_reports(&self) -> &[Report] {
        &self.output_reports
    }

    pub fn feature_reports(&self) -> &[Report] {
        &self.feature_reports
    }

    /// The reports of the given [Direction].
    pub fn reports(&self, direction: Direction) -> &[Report] {
        match direction {
            Direction::Input => &self.input_reports,
            Direction::Output => &self.output_reports,
            Direction::Feature => &self.feature_reports,
        }
    }

    /// Look up the report with the given ID.
    pub fn find_report(&self, direction: Direction, id: ReportId) -> Option<&Report> {
        self.reports(direction).iter().find(|r| r.id == id)
    }

    /// True if the descriptor was parsed to the end without error.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl std::fmt::Display for ReportTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for direction in [Direction::Input, Direction::Output, Direction::Feature] {
            let reports = self.reports(direction);
            writeln!(f, "{direction} Reports: {}", reports.len())?;
            for r in reports {
                writeln!(f, "{r}")?;
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Not enough data at offset {offset}")]
    NotEnoughData { offset: usize },
    #[error("Global Stack is Empty")]
    GlobalStackEmpty { offset: usize },
}

type Result<T> = std::result::Result<T, ParserError>;

impl TryFrom<&[u8]> for ReportTable {
    type Error = ParserError;

    fn try_from(bytes: &[u8]) -> Result<ReportTable> {
        parse_report_descriptor(bytes).into_result()
    }
}

/// The result of [parse_report_descriptor]: the reports parsed so far and
/// the error that stopped the parser, if any.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub table: ReportTable,
    pub error: Option<ParserError>,
}

impl ParseOutcome {
    /// Discard the partial table if parsing failed.
    pub fn into_result(self) -> Result<ReportTable> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.table),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Globals {
    usage_page: UsagePage,
    logical_minimum: LogicalMinimum,
    logical_maximum: LogicalMaximum,
    physical_minimum: PhysicalMinimum,
    physical_maximum: PhysicalMaximum,
    unit_exponent: UnitExponent,
    unit: Unit,
    report_size: ReportSize,
    report_id: ReportId,
    report_count: ReportCount,
}

// Designators, strings and delimiters are tracked but do not affect the
// report layout.
#[allow(dead_code)]
#[derive(Clone, Debug, Default)]
struct Locals {
    usages: Vec<UsageId>,
    usage_minimum: UsageMinimum,
    usage_maximum: UsageMaximum,
    designator_index: DesignatorIndex,
    designator_minimum: DesignatorMinimum,
    designator_maximum: DesignatorMaximum,
    string_index: StringIndex,
    string_minimum: StringMinimum,
    string_maximum: StringMaximum,
    delimiter: Delimiter,
}

/// The parser state for a single pass over a report descriptor.
#[derive(Debug, Default)]
struct Stack {
    /// The active global state, i.e. the top of the global stack
    globals: Globals,
    /// Global states saved by Push, innermost last
    saved: Vec<Globals>,
    locals: Locals,
    collections: Vec<Collection>,
}

impl Stack {
    fn push(&mut self) {
        self.saved.push(self.globals);
    }

    /// Restore the last pushed global state, returns false if there is none.
    fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(globals) => {
                self.globals = globals;
                true
            }
            None => false,
        }
    }

    fn reset_locals(&mut self) {
        self.locals = Locals::default();
    }

    fn globals(&mut self) -> &mut Globals {
        &mut self.globals
    }

    fn locals(&mut self) -> &mut Locals {
        &mut self.locals
    }
}

/// Lookup-or-create of reports by direction and report ID.
#[derive(Debug, Default)]
struct TableBuilder {
    table: ReportTable,
    index: HashMap<(Direction, ReportId), usize>,
}

impl TableBuilder {
    fn report(&mut self, direction: Direction, id: ReportId) -> &mut Report {
        let reports = match direction {
            Direction::Input => &mut self.table.input_reports,
            Direction::Output => &mut self.table.output_reports,
            Direction::Feature => &mut self.table.feature_reports,
        };
        let idx = *self.index.entry((direction, id)).or_insert_with(|| {
            reports.push(Report::new(id, direction));
            reports.len() - 1
        });
        &mut reports[idx]
    }
}

fn handle_main_item(direction: Direction, stack: &Stack, builder: &mut TableBuilder) {
    let globals = &stack.globals;
    let locals = &stack.locals;

    let field = ReportField {
        bit_offset: 0,
        bit_size: usize::from(globals.report_size),
        count: usize::from(globals.report_count),
        usage_page: globals.usage_page,
        usages: locals.usages.clone(),
        usage_minimum: locals.usage_minimum,
        usage_maximum: locals.usage_maximum,
        logical_minimum: globals.logical_minimum,
        logical_maximum: globals.logical_maximum,
        physical_minimum: globals.physical_minimum,
        physical_maximum: globals.physical_maximum,
        unit_exponent: globals.unit_exponent,
        unit: globals.unit,
        collections: stack.collections.clone(),
    };

    builder.report(direction, globals.report_id).append(field);
}

macro_rules! update_stack {
    ($stack:ident, $class:ident, $which:ident, $from:ident) => {
        let state = $stack.$class();
        state.$which = $from;
    };
}

fn parse_items(bytes: &[u8], builder: &mut TableBuilder) -> Result<()> {
    let mut stack = Stack::default();

    for rdesc_item in hid::items(bytes) {
        let rdesc_item = rdesc_item?;
        let offset = rdesc_item.offset();
        let item = rdesc_item.item();
        match item.item_type() {
            ItemType::Main(MainItem::Input) => {
                handle_main_item(Direction::Input, &stack, builder);
                stack.reset_locals();
            }
            ItemType::Main(MainItem::Output) => {
                handle_main_item(Direction::Output, &stack, builder);
                stack.reset_locals();
            }
            ItemType::Main(MainItem::Feature) => {
                handle_main_item(Direction::Feature, &stack, builder);
                stack.reset_locals();
            }
            ItemType::Main(MainItem::Collection(kind)) => {
                let c = Collection {
                    kind,
                    usage_page: stack.globals.usage_page,
                    usage: stack.locals.usages.first().copied().unwrap_or_default(),
                };
                stack.collections.push(c);
                stack.reset_locals();
            }
            ItemType::Main(MainItem::EndCollection) => {
                if stack.collections.pop().is_none() {
                    tracing::trace!("Unbalanced End Collection at offset {offset}");
                }
                stack.reset_locals();
            }
            ItemType::Main(MainItem::Reserved { .. }) => {
                stack.reset_locals();
            }
            ItemType::Long => {
                tracing::trace!("Skipping long item of {} bytes at offset {offset}", item.size());
            }
            ItemType::Reserved => {}
            ItemType::Global(GlobalItem::UsagePage(usage_page)) => {
                update_stack!(stack, globals, usage_page, usage_page);
            }
            ItemType::Global(GlobalItem::LogicalMinimum(minimum)) => {
                update_stack!(stack, globals, logical_minimum, minimum);
            }
            ItemType::Global(GlobalItem::LogicalMaximum(maximum)) => {
                update_stack!(stack, globals, logical_maximum, maximum);
            }
            ItemType::Global(GlobalItem::PhysicalMinimum(minimum)) => {
                update_stack!(stack, globals, physical_minimum, minimum);
            }
            ItemType::Global(GlobalItem::PhysicalMaximum(maximum)) => {
                update_stack!(stack, globals, physical_maximum, maximum);
            }
            ItemType::Global(GlobalItem::UnitExponent(exponent)) => {
                update_stack!(stack, globals, unit_exponent, exponent);
            }
            ItemType::Global(GlobalItem::Unit(unit)) => {
                update_stack!(stack, globals, unit, unit);
            }
            ItemType::Global(GlobalItem::ReportSize(size)) => {
                update_stack!(stack, globals, report_size, size);
            }
            ItemType::Global(GlobalItem::ReportId(id)) => {
                update_stack!(stack, globals, report_id, id);
            }
            ItemType::Global(GlobalItem::ReportCount(count)) => {
                update_stack!(stack, globals, report_count, count);
            }
            ItemType::Global(GlobalItem::Push) => {
                stack.push();
                tracing::trace!("Push at offset {offset}, depth {}", stack.saved.len() + 1);
            }
            ItemType::Global(GlobalItem::Pop) => {
                ensure!(stack.pop(), ParserError::GlobalStackEmpty { offset });
                tracing::trace!("Pop at offset {offset}, depth {}", stack.saved.len() + 1);
            }
            ItemType::Global(GlobalItem::Reserved { .. }) => {}
            ItemType::Local(LocalItem::Usage(usage)) => {
                stack.locals().usages.push(usage);
            }
            ItemType::Local(LocalItem::UsageMinimum(minimum)) => {
                update_stack!(stack, locals, usage_minimum, minimum);
            }
            ItemType::Local(LocalItem::UsageMaximum(maximum)) => {
                update_stack!(stack, locals, usage_maximum, maximum);
            }
            ItemType::Local(LocalItem::DesignatorIndex(index)) => {
                update_stack!(stack, locals, designator_index, index);
            }
            ItemType::Local(LocalItem::DesignatorMinimum(minimum)) => {
                update_stack!(stack, locals, designator_minimum, minimum);
            }
            ItemType::Local(LocalItem::DesignatorMaximum(maximum)) => {
                update_stack!(stack, locals, designator_maximum, maximum);
            }
            ItemType::Local(LocalItem::StringIndex(index)) => {
                update_stack!(stack, locals, string_index, index);
            }
            ItemType::Local(LocalItem::StringMinimum(minimum)) => {
                update_stack!(stack, locals, string_minimum, minimum);
            }
            ItemType::Local(LocalItem::StringMaximum(maximum)) => {
                update_stack!(stack, locals, string_maximum, maximum);
            }
            ItemType::Local(LocalItem::Delimiter(delimiter)) => {
                update_stack!(stack, locals, delimiter, delimiter);
            }
            ItemType::Local(LocalItem::Reserved { .. }) => {}
        };
    }

    Ok(())
}

/// Parse the given HID Report Descriptor in a single pass.
///
/// Parsing stops at the first truncated item or at a Pop without a
/// matching Push. The reports compiled up to that point are returned
/// alongside the error and the table is flagged as not
/// [valid](ReportTable::is_valid).
pub fn parse_report_descriptor(bytes: &[u8]) -> ParseOutcome {
    let mut builder = TableBuilder::default();
    let error = parse_items(bytes, &mut builder).err();
    match &error {
        Some(e) => tracing::debug!("Failed to parse report descriptor: {e}"),
        None => builder.table.valid = true,
    }

    ParseOutcome {
        table: builder.table,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::hex_string_to_bytes;

    const LIGHTING_RDESC: &str = "
        05 59 09 01 A1 01 09 02 A1 02 85 01 09 03 15 00 27 FF FF 00 00 75 10 95 01 B1 03 09 04 09 05 09
        06 09 07 09 08 15 00 27 FF FF FF 7F 75 20 95 05 B1 03 C0 09 20 A1 02 85 02 09 21 15 00 27 FF FF
        00 00 75 10 95 01 B1 02 C0 09 22 A1 02 85 03 09 21 15 00 27 FF FF 00 00 75 10 95 01 B1 02 09 23
        09 24 09 25 09 27 09 26 15 00 27 FF FF FF 7F 75 20 95 05 B1 02 09 28 09 29 09 2A 09 2C 09 2D 15
        00 26 FF 00 75 08 95 05 B1 02 C0 09 50 A1 02 85 04 09 03 09 55 15 00 25 08 75 08 95 02 B1 02 09
        21 15 00 27 FF FF 00 00 75 10 95 08 B1 02 09 51 09 52 09 53 09 51 09 52 09 53 09 51 09 52 09 53
        09 51 09 52 09 53 09 51 09 52 09 53 09 51 09 52 09 53 09 51 09 52 09 53 09 51 09 52 09 53 15 00
        26 FF 00 75 08 95 18 B1 02 C0 09 60 A1 02 85 05 09 55 15 00 25 08 75 08 95 01 B1 02 09 61 09 62
        15 00 27 FF FF 00 00 75 10 95 02 B1 02 09 51 09 52 09 53 15 00 26 FF 00 75 08 95 03 B1 02 C0 09
        70 A1 02 85 06 09 71 15 00 25 01 75 08 95 01 B1 02 C0 85 07 06 00 FF 09 02 15 00 26 FF 00 75 08
        95 3F B1 02 C0";

    #[rustfmt::skip]
    const MOUSE_RDESC: [u8; 50] = [
        0x05, 0x01,        // Usage Page (Generic Desktop)
        0x09, 0x02,        // Usage (Mouse)
        0xa1, 0x01,        // Collection (Application)
        0x09, 0x01,        //   Usage (Pointer)
        0xa1, 0x00,        //   Collection (Physical)
        0x05, 0x09,        //     Usage Page (Button)
        0x19, 0x01,        //     Usage Minimum (1)
        0x29, 0x03,        //     Usage Maximum (3)
        0x15, 0x00,        //     Logical Minimum (0)
        0x25, 0x01,        //     Logical Maximum (1)
        0x95, 0x03,        //     Report Count (3)
        0x75, 0x01,        //     Report Size (1)
        0x81, 0x02,        //     Input (Data,Var,Abs)
        0x95, 0x01,        //     Report Count (1)
        0x75, 0x05,        //     Report Size (5)
        0x81, 0x03,        //     Input (Cnst,Var,Abs)
        0x05, 0x01,        //     Usage Page (Generic Desktop)
        0x09, 0x30,        //     Usage (X)
        0x09, 0x31,        //     Usage (Y)
        0x15, 0x81,        //     Logical Minimum (-127)
        0x25, 0x7f,        //     Logical Maximum (127)
        0x75, 0x08,        //     Report Size (8)
        0x95, 0x02,        //     Report Count (2)
        0x81, 0x06,        //     Input (Data,Var,Rel)
        0xc0,              //   End Collection
        0xc0,              // End Collection
    ];

    #[test]
    fn empty_descriptor() {
        let table = ReportTable::try_from([0u8; 0].as_slice()).unwrap();
        assert!(table.is_valid());
        assert!(table.input_reports().is_empty());
        assert!(table.output_reports().is_empty());
        assert!(table.feature_reports().is_empty());
    }

    #[test]
    fn lighting_feature_reports() {
        let bytes = hex_string_to_bytes(LIGHTING_RDESC).unwrap();
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        assert!(table.is_valid());
        assert_eq!(table.input_reports().len(), 0);
        assert_eq!(table.output_reports().len(), 0);

        let features = table.feature_reports();
        let ids: Vec<u32> = features.iter().map(|r| r.id().into()).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5, 6, 7]);
        let sizes: Vec<usize> = features.iter().map(|r| r.size_in_bytes()).collect();
        assert_eq!(sizes, [22, 2, 27, 42, 8, 1, 63]);

        let r1 = &features[0];
        assert_eq!(r1.direction(), Direction::Feature);
        assert_eq!(r1.size_in_bits(), 176);
        assert_eq!(r1.fields().len(), 2);
        assert_eq!(r1.fields()[1].bit_offset, 16);
        assert_eq!(r1.fields()[1].bit_size, 32);
        assert_eq!(r1.fields()[1].count, 5);
        assert_eq!(
            r1.fields()[1].usages,
            [UsageId(4), UsageId(5), UsageId(6), UsageId(7), UsageId(8)]
        );
        assert_eq!(r1.fields()[1].logical_maximum, LogicalMaximum(0x7fffffff));

        let r7 = table.find_report(Direction::Feature, ReportId(7)).unwrap();
        assert_eq!(r7.fields()[0].usage_page, UsagePage(0xff00));
        assert_eq!(r7.fields()[0].logical_maximum, LogicalMaximum(255));
    }

    #[test]
    fn display() {
        let bytes = hex_string_to_bytes(LIGHTING_RDESC).unwrap();
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        let r1 = &table.feature_reports()[0];
        assert_eq!(
            format!("{}", r1.fields()[0]),
            "BitOffset: 0, BitSize: 16, Count: 1, UsagePage: 0x59, Usage: [0x03], UsageMinimum: 0x00, UsageMaximum: 0x00, LogicalMinimum: 0, LogicalMaximum: 65535"
        );
        let text = format!("{r1}");
        assert!(text.starts_with("ReportID: 0x01, NumBytes: 22\n\tBitOffset: 0,"));
        assert_eq!(text.lines().count(), 3);

        let text = format!("{table}");
        assert!(text.starts_with("Input Reports: 0\nOutput Reports: 0\nFeature Reports: 7\n"));
    }

    #[test]
    fn mouse() {
        let table = ReportTable::try_from(MOUSE_RDESC.as_slice()).unwrap();
        assert!(table.output_reports().is_empty());
        assert!(table.feature_reports().is_empty());

        let reports = table.input_reports();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.id(), ReportId(0));
        assert_eq!(report.size_in_bits(), 24);
        assert_eq!(report.size_in_bytes(), 3);

        let fields = report.fields();
        assert_eq!(fields.len(), 3);

        let buttons = &fields[0];
        assert_eq!(buttons.bit_offset, 0);
        assert_eq!(buttons.bit_size, 1);
        assert_eq!(buttons.count, 3);
        assert_eq!(buttons.usage_page, UsagePage(0x09));
        assert!(buttons.usages.is_empty());
        assert_eq!(buttons.usage_minimum, UsageMinimum(1));
        assert_eq!(buttons.usage_maximum, UsageMaximum(3));

        // Locals are reset after each main item
        let padding = &fields[1];
        assert_eq!(padding.bit_offset, 3);
        assert_eq!(padding.bit_size, 5);
        assert_eq!(padding.usage_minimum, UsageMinimum(0));
        assert_eq!(padding.usage_maximum, UsageMaximum(0));

        let xy = &fields[2];
        assert_eq!(xy.bit_offset, 8);
        assert_eq!(xy.usages, [UsageId(0x30), UsageId(0x31)]);
        assert_eq!(xy.logical_minimum, LogicalMinimum(-127));
        assert_eq!(xy.logical_maximum, LogicalMaximum(127));
        assert_eq!(
            xy.collections,
            [
                Collection {
                    kind: CollectionItem::Application,
                    usage_page: UsagePage(0x01),
                    usage: UsageId(0x02),
                },
                Collection {
                    kind: CollectionItem::Physical,
                    usage_page: UsagePage(0x01),
                    usage: UsageId(0x01),
                },
            ]
        );
    }

    #[test]
    fn pop_without_push() {
        #[rustfmt::skip]
        let bytes: [u8; 11] = [
            0x05, 0x01,  // Usage Page (Generic Desktop)
            0x75, 0x08,  // Report Size (8)
            0x95, 0x01,  // Report Count (1)
            0x81, 0x02,  // Input (Data,Var,Abs)
            0xb4,        // Pop
            0x81, 0x02,  // Input (Data,Var,Abs)
        ];
        let outcome = parse_report_descriptor(&bytes);
        assert_eq!(
            outcome.error,
            Some(ParserError::GlobalStackEmpty { offset: 8 })
        );
        assert!(!outcome.table.is_valid());
        assert_eq!(outcome.table.input_reports().len(), 1);
        assert_eq!(outcome.table.input_reports()[0].size_in_bits(), 8);

        let err = ReportTable::try_from(bytes.as_slice()).unwrap_err();
        assert_eq!(format!("{err}"), "Global Stack is Empty");
    }

    #[test]
    fn truncated_item() {
        let outcome = parse_report_descriptor(&[0x27, 0xff]);
        assert_eq!(outcome.error, Some(ParserError::NotEnoughData { offset: 1 }));
        assert!(!outcome.table.is_valid());
        assert_eq!(
            format!("{}", outcome.error.unwrap()),
            "Not enough data at offset 1"
        );

        // the first report survives
        let outcome = parse_report_descriptor(&[0x75, 0x08, 0x95, 0x01, 0x81, 0x02, 0x95]);
        assert_eq!(outcome.error, Some(ParserError::NotEnoughData { offset: 7 }));
        assert_eq!(outcome.table.input_reports()[0].size_in_bytes(), 1);

        let outcome = parse_report_descriptor(&[0xfe]);
        assert_eq!(outcome.error, Some(ParserError::NotEnoughData { offset: 1 }));
    }

    #[test]
    fn push_pop() {
        #[rustfmt::skip]
        let bytes: [u8; 12] = [
            0x75, 0x08,  // Report Size (8)
            0x95, 0x01,  // Report Count (1)
            0xa4,        // Push
            0x75, 0x10,  //   Report Size (16)
            0x81, 0x02,  //   Input (Data,Var,Abs)
            0xb4,        // Pop
            0x81, 0x02,  // Input (Data,Var,Abs)
        ];
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        let report = &table.input_reports()[0];
        assert_eq!(report.size_in_bits(), 24);
        let fields = report.fields();
        assert_eq!(fields[0].bit_size, 16);
        assert_eq!(fields[0].count, 1);
        assert_eq!(fields[1].bit_offset, 16);
        assert_eq!(fields[1].bit_size, 8);
        assert_eq!(fields[1].count, 1);
    }

    #[test]
    fn long_item_is_skipped() {
        #[rustfmt::skip]
        let bytes: [u8; 10] = [
            0xfe, 0x02, 0xaa, 0xbb,  // Long item, 2 bytes
            0x75, 0x08,              // Report Size (8)
            0x95, 0x01,              // Report Count (1)
            0x81, 0x02,              // Input (Data,Var,Abs)
        ];
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        assert_eq!(table.input_reports().len(), 1);
        assert_eq!(table.input_reports()[0].size_in_bits(), 8);
    }

    #[test]
    fn repeated_report_id() {
        #[rustfmt::skip]
        let bytes: [u8; 20] = [
            0x75, 0x08,  // Report Size (8)
            0x95, 0x01,  // Report Count (1)
            0x85, 0x01,  // Report ID (1)
            0x81, 0x02,  // Input
            0x91, 0x02,  // Output
            0x85, 0x02,  // Report ID (2)
            0x81, 0x02,  // Input
            0x85, 0x01,  // Report ID (1)
            0x95, 0x02,  // Report Count (2)
            0x81, 0x02,  // Input
        ];
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        let inputs = table.input_reports();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].id(), ReportId(1));
        assert_eq!(inputs[0].size_in_bits(), 24);
        assert_eq!(inputs[0].fields()[1].bit_offset, 8);
        assert_eq!(inputs[1].id(), ReportId(2));
        assert_eq!(inputs[1].size_in_bits(), 8);

        assert_eq!(table.output_reports().len(), 1);
        assert_eq!(table.output_reports()[0].size_in_bits(), 8);
        assert!(table.find_report(Direction::Output, ReportId(2)).is_none());
    }

    #[test]
    fn unbalanced_end_collection() {
        let bytes: [u8; 7] = [0xc0, 0x75, 0x01, 0x95, 0x01, 0x81, 0x02];
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        assert!(table.input_reports()[0].fields()[0].collections.is_empty());
    }

    #[test]
    fn ignored_items() {
        #[rustfmt::skip]
        let bytes: [u8; 22] = [
            0x09, 0x30,        // Usage (X)
            0xc5, 0x10,        // Global, reserved tag 0xC
            0x69, 0x07,        // Local, reserved tag 6
            0x0d, 0x55,        // Reserved item type
            0xfe, 0x01, 0xaa,  // Long item, 1 byte
            0x75, 0x08,        // Report Size (8)
            0x95, 0x01,        // Report Count (1)
            0x81, 0x02,        // Input (Data,Var,Abs)
            0x09, 0x31,        // Usage (Y)
            0x00,              // Main, reserved tag 0
            0x81, 0x02,        // Input (Data,Var,Abs)
        ];
        let table = ReportTable::try_from(bytes.as_slice()).unwrap();
        let report = &table.input_reports()[0];
        assert_eq!(report.size_in_bits(), 16);
        let fields = report.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].usages, vec![UsageId(0x30)]);
        assert_eq!(fields[0].bit_size, 8);
        assert!(fields[1].usages.is_empty());
        assert_eq!(fields[1].bit_offset, 8);
    }

    #[test]
    fn reserved_global_and_local_tags() {
        for prefix in [0xc5u8, 0xd5, 0xe5] {
            let bytes = [0x75, 0x04, prefix, 0x08, 0x95, 0x01, 0x81, 0x02];
            let table = ReportTable::try_from(bytes.as_slice()).unwrap();
            assert_eq!(table.input_reports()[0].size_in_bits(), 4, "prefix {prefix:#04x}");
        }

        for prefix in [0x69u8, 0xb9, 0xc9, 0xd9, 0xe9] {
            let bytes = [0x09, 0x30, prefix, 0x31, 0x75, 0x08, 0x95, 0x01, 0x81, 0x02];
            let table = ReportTable::try_from(bytes.as_slice()).unwrap();
            let field = &table.input_reports()[0].fields()[0];
            assert_eq!(field.usages, vec![UsageId(0x30)], "prefix {prefix:#04x}");
        }
    }
}
