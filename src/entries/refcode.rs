//! Reference-code rendering. Pure string formatting; no clock, no store.

/// Renders the display code for an entry:
/// `IPR/{particulars}/{client}/{capacity}MW/{state}/{site}/{YY}{MM}/{serial % 100}`
/// with the capacity truncated to a whole number of megawatts and the final
/// segment zero-padded to two digits.
///
/// The two-digit tail repeats every 100 serials, so the code is display
/// material only; the store-assigned entry id stays the canonical key.
pub fn format_reference_code(
    particulars: &str,
    client_code: &str,
    capacity_mw: f64,
    state_code: &str,
    site_code: &str,
    serial: i64,
    year: i32,
    month: u8,
) -> String {
    format!(
        "IPR/{}/{}/{}MW/{}/{}/{:02}{:02}/{:02}",
        particulars,
        client_code,
        capacity_mw.trunc() as i64,
        state_code,
        site_code,
        year.rem_euclid(100),
        month,
        serial.rem_euclid(100),
    )
}

/// Four-digit cumulative counter stored alongside the code.
pub fn cumulative_count(serial: i64) -> String {
    format!("{serial:04}")
}
