//! Match scoring — the one number this service computes itself.
//!
//! The model hands back the two skill lists; the percentage is derived
//! here from their lengths alone. Two replies with the same list lengths
//! always score identically, whatever the list contents.

/// Share of matched skills as an integer percentage in 0-100.
///
/// `round(100 * matching / (matching + missing))`, with 0 when both
/// counts are zero.
pub fn match_percentage(matching: usize, missing: usize) -> u8 {
    let total = matching + missing;
    if total == 0 {
        return 0;
    }
    ((matching as f64 / total as f64) * 100.0).round() as u8
}
