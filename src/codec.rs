// SPDX-License-Identifier: MIT

//! Bit-level accessors for the fields of a HID report.
//!
//! All functions here operate on a raw report as read from the device,
//! addressed by a bit offset and a bit size. Bits are numbered LSB first:
//! bit `n` is bit `n % 8` of byte `n / 8`.
//!
//! The accessors are lenient: bits beyond the end of the buffer read as
//! zero and out-of-range sizes give a zero result rather than an error,
//! a short report from a device should not need special handling by the
//! caller.
//!
//! Use [locate_field] to find the offset and size of a field for a given
//! Usage. The returned [FieldLocation] includes the report ID byte where
//! the device sends one.

use crate::{Report, ReportField, ReportTable, UsageId, UsagePage};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("No field for usage {usage_page:#06x}/{usage:#06x}")]
    NotFound {
        usage_page: UsagePage,
        usage: UsageId,
    },
}

type Result<T> = std::result::Result<T, FieldError>;

/// Read `bit_size` bits starting at `bit_offset` as unsigned value.
///
/// A `bit_size` of zero or larger than 64 returns zero. Where the buffer
/// ends early, the missing high bits are zero.
///
/// ```
/// # use hidfield::codec::parse_unsigned;
/// assert_eq!(parse_unsigned(&[0x12, 0x34], 0, 16), 0x3412);
/// assert_eq!(parse_unsigned(&[0x12, 0x34], 8, 4), 0x4);
/// ```
pub fn parse_unsigned(bytes: &[u8], bit_offset: usize, bit_size: usize) -> u64 {
    if !(1..=64).contains(&bit_size) {
        return 0;
    }

    let mut value = 0u64;
    for i in 0..bit_size {
        let Some(bit) = bit_offset.checked_add(i) else {
            break;
        };
        let Some(byte) = bytes.get(bit / 8) else {
            break;
        };
        if (byte >> (bit % 8)) & 0x1 != 0 {
            value |= 1 << i;
        }
    }
    value
}

/// Read `bit_size` bits starting at `bit_offset` as two's complement
/// value, sign-extended from bit `bit_size - 1`.
///
/// A `bit_size` of zero or larger than 64 returns zero.
pub fn parse_signed(bytes: &[u8], bit_offset: usize, bit_size: usize) -> i64 {
    if !(1..=64).contains(&bit_size) {
        return 0;
    }

    let value = parse_unsigned(bytes, bit_offset, bit_size);
    if bit_size == 64 {
        return value as i64;
    }
    let shift = 64 - bit_size;
    ((value << shift) as i64) >> shift
}

/// Read `bit_size` bits starting at `bit_offset`, one bool per bit.
///
/// The result is shorter than `bit_size` if the buffer ends early.
pub fn parse_bitmask(bytes: &[u8], bit_offset: usize, bit_size: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bit_size.min(bytes.len().saturating_mul(8)));
    for i in 0..bit_size {
        let Some(bit) = bit_offset.checked_add(i) else {
            break;
        };
        let Some(byte) = bytes.get(bit / 8) else {
            break;
        };
        bits.push((byte >> (bit % 8)) & 0x1 != 0);
    }
    bits
}

/// Read a value and map it linearly from the logical range onto
/// `[out_min, out_max]`.
///
/// The value is read as signed if either logical bound is negative,
/// unsigned otherwise. Values outside the logical range are clamped. If
/// the logical range is empty, the result is `out_max` for values at or
/// above the bound and `out_min` otherwise.
pub fn parse_analog(
    bytes: &[u8],
    bit_offset: usize,
    bit_size: usize,
    logical_min: i64,
    logical_max: i64,
    out_min: f64,
    out_max: f64,
) -> f64 {
    let value = if logical_min < 0 || logical_max < 0 {
        parse_signed(bytes, bit_offset, bit_size) as f64
    } else {
        parse_unsigned(bytes, bit_offset, bit_size) as f64
    };

    let (min, max) = (logical_min as f64, logical_max as f64);
    let fraction = if logical_min == logical_max {
        if value >= max {
            1.0
        } else {
            0.0
        }
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    };

    out_min + fraction * (out_max - out_min)
}

/// [parse_analog] mapped onto `[-1.0, 1.0]`.
pub fn parse_analog_default(
    bytes: &[u8],
    bit_offset: usize,
    bit_size: usize,
    logical_min: i64,
    logical_max: i64,
) -> f64 {
    parse_analog(
        bytes,
        bit_offset,
        bit_size,
        logical_min,
        logical_max,
        -1.0,
        1.0,
    )
}

/// The position of a single field element within a report as sent by
/// the device, i.e. including the report ID byte if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocation {
    pub bit_offset: usize,
    pub bit_size: usize,
}

impl FieldLocation {
    pub fn read_unsigned(&self, bytes: &[u8]) -> u64 {
        parse_unsigned(bytes, self.bit_offset, self.bit_size)
    }

    pub fn read_signed(&self, bytes: &[u8]) -> i64 {
        parse_signed(bytes, self.bit_offset, self.bit_size)
    }

    pub fn read_bitmask(&self, bytes: &[u8]) -> Vec<bool> {
        parse_bitmask(bytes, self.bit_offset, self.bit_size)
    }
}

/// Find the first field element in `reports` for the given Usage.
///
/// Fields are searched in report order, then field order, and only
/// fields with a matching Usage Page are considered. A field matches if
/// `usage` is one of its Usages or is within its Usage Minimum/Maximum,
/// elements for the latter follow the explicit Usages.
///
/// If there is more than one report or the only report has a nonzero
/// [ReportId](crate::ReportId), reports are prefixed by a report ID byte
/// and the returned offset accounts for it.
pub fn locate_field(
    reports: &[Report],
    usage_page: UsagePage,
    usage: UsageId,
) -> Option<FieldLocation> {
    find_field(reports, usage_page, usage).map(|(location, _)| location)
}

fn find_field(
    reports: &[Report],
    usage_page: UsagePage,
    usage: UsageId,
) -> Option<(FieldLocation, &ReportField)> {
    let has_report_id = match reports {
        [] => false,
        [report] => report.id().is_explicit(),
        _ => true,
    };
    let prefix = if has_report_id { 8 } else { 0 };

    reports
        .iter()
        .flat_map(|r| r.fields())
        .filter(|f| f.usage_page == usage_page)
        .find_map(|f| {
            let index = match f.usages.iter().position(|u| *u == usage) {
                Some(idx) => idx,
                None => {
                    let u = u32::from(usage);
                    let (min, max) = (u32::from(f.usage_minimum), u32::from(f.usage_maximum));
                    if !(min..=max).contains(&u) {
                        return None;
                    }
                    f.usages.len().saturating_add((u - min) as usize)
                }
            };
            let bit_offset = f
                .bit_offset
                .saturating_add(prefix)
                .saturating_add(f.bit_size.saturating_mul(index));
            let location = FieldLocation {
                bit_offset,
                bit_size: f.bit_size,
            };
            Some((location, f))
        })
}

/// Shortcuts to decode a field of an Input report by its Usage.
///
/// The report passed in must be the one containing the field, where a
/// device has multiple Input reports the caller is expected to check the
/// report ID byte first.
impl ReportTable {
    /// [locate_field] within the Input reports.
    pub fn locate_input(&self, usage_page: UsagePage, usage: UsageId) -> Option<FieldLocation> {
        locate_field(self.input_reports(), usage_page, usage)
    }

    fn find_input(
        &self,
        usage_page: UsagePage,
        usage: UsageId,
    ) -> Result<(FieldLocation, &ReportField)> {
        find_field(self.input_reports(), usage_page, usage)
            .ok_or(FieldError::NotFound { usage_page, usage })
    }

    pub fn read_unsigned(&self, report: &[u8], usage_page: UsagePage, usage: UsageId) -> Result<u64> {
        let (location, _) = self.find_input(usage_page, usage)?;
        Ok(location.read_unsigned(report))
    }

    pub fn read_signed(&self, report: &[u8], usage_page: UsagePage, usage: UsageId) -> Result<i64> {
        let (location, _) = self.find_input(usage_page, usage)?;
        Ok(location.read_signed(report))
    }

    /// Decode the field and map it from its logical range onto
    /// `[out_min, out_max]`, see [parse_analog].
    pub fn read_analog(
        &self,
        report: &[u8],
        usage_page: UsagePage,
        usage: UsageId,
        out_min: f64,
        out_max: f64,
    ) -> Result<f64> {
        let (location, field) = self.find_input(usage_page, usage)?;
        Ok(parse_analog(
            report,
            location.bit_offset,
            location.bit_size,
            i32::from(field.logical_minimum).into(),
            i32::from(field.logical_maximum).into(),
            out_min,
            out_max,
        ))
    }
}
