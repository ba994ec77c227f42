// SPDX-License-Identifier: MIT

//! Human-readable names for Usage Pages and Usages, see the
//! [HID Usage Tables](https://usb.org/document-library/hid-usage-tables-15).
//!
//! Names are looked up via the [hut](https://docs.rs/hut) crate if the
//! `hut` feature is enabled (the default).

use crate::types::{UsageId, UsagePage};

/// The name of the given Usage Page, e.g. `"Generic Desktop"` for
/// `UsagePage(0x01)`.
///
/// Pages in the vendor-defined range 0xFF00-0xFFFF are `"Vendor-defined"`,
/// pages in the reserved range 0xF1D1-0xFEFF are `"Reserved"`. Any other
/// page not known to the HID Usage Tables is `"Unknown"`.
pub fn usage_page_name(usage_page: UsagePage) -> String {
    match u32::from(usage_page) {
        0xFF00..=0xFFFF => "Vendor-defined".into(),
        0xF1D1..=0xFEFF => "Reserved".into(),
        page => lookup(page).unwrap_or_else(|| "Unknown".into()),
    }
}

/// The name of the given Usage within the given Usage Page, e.g. `"X"`
/// for `UsageId(0x30)` in Generic Desktop, or `None` if the Usage is not
/// known to the HID Usage Tables.
///
/// A 32-bit Usage carries its own Usage Page in the upper 16 bits, which
/// then takes precedence over `usage_page`.
pub fn usage_name(usage_page: UsagePage, usage: UsageId) -> Option<String> {
    let (page, id) = match u32::from(usage) {
        usage if usage > 0xFFFF => (usage >> 16, usage & 0xFFFF),
        usage => (u32::from(usage_page), usage),
    };
    lookup_usage(page, id)
}

#[cfg(feature = "hut")]
fn lookup(page: u32) -> Option<String> {
    let page = u16::try_from(page).ok()?;
    hut::UsagePage::try_from(page).ok().map(|up| up.name())
}

#[cfg(feature = "hut")]
fn lookup_usage(page: u32, id: u32) -> Option<String> {
    let page = u16::try_from(page).ok()?;
    let id = u16::try_from(id).ok()?;
    hut::Usage::new_from_page_and_id(page, id)
        .ok()
        .map(|u| u.name())
}

#[cfg(not(feature = "hut"))]
fn lookup(_page: u32) -> Option<String> {
    None
}

#[cfg(not(feature = "hut"))]
fn lookup_usage(_page: u32, _id: u32) -> Option<String> {
    None
}
