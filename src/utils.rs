//! Small numeric helpers shared across the tracker.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Global set of warned messages (for warn_once).
static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Emit a `tracing` warning only once per distinct message.
pub fn warn_once(message: &str) {
    let warned = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));
    // recover from poisoning
    let mut guard = match warned.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if guard.insert(message.to_string()) {
        tracing::warn!("{}", message);
    }
}

/// Lower median of a slice.
///
/// For an even number of values the lower of the two middle elements is
/// returned, and equal values keep their input order, so ties resolve to the
/// element with the lower index. Returns `None` for an empty slice or when any
/// value is not finite.
pub fn lower_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut sorted = values.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[(sorted.len() - 1) / 2])
}

/// Round to the nearest integer, saturating at the `i32` range.
pub fn round_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        0
    } else {
        value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }
}
