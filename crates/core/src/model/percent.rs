/// Integer percentage of `part` over `whole`, rounded half-up.
///
/// Returns 0 when `whole` is 0.
#[must_use]
pub fn rounded_percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = (part.saturating_mul(200).saturating_add(whole)) / whole.saturating_mul(2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
