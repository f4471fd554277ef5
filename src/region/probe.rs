//! Bounded capacity probe
//!
//! The producer never publishes the region's size. The probe searches the
//! closed range `[min, max]` for the largest size a caller-supplied predicate
//! can map, assuming every size below a mappable size also maps.

/// Outcome of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Largest size that mapped
    pub capacity: usize,
    /// Number of predicate calls made
    pub attempts: u32,
    /// True when `max` itself mapped, so the real size may be larger
    pub capped: bool,
}

/// Find the largest size in `[min, max]` for which `maps` returns true.
///
/// Returns `None` when `min` itself cannot be mapped. The predicate is called
/// at most `2 + log2(max - min)` times.
pub fn probe_capacity(
    min: usize,
    max: usize,
    mut maps: impl FnMut(usize) -> bool,
) -> Option<ProbeOutcome> {
    let max = max.max(min);
    let mut attempts = 1;

    if !maps(min) {
        return None;
    }
    if min == max {
        return Some(ProbeOutcome { capacity: min, attempts, capped: true });
    }

    attempts += 1;
    if maps(max) {
        return Some(ProbeOutcome { capacity: max, attempts, capped: true });
    }

    // `lo` always maps, `hi` never does.
    let (mut lo, mut hi) = (min, max);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        attempts += 1;
        if maps(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Some(ProbeOutcome { capacity: lo, attempts, capped: false })
}
