//! Closed-form transition counts.
//!
//! The LI and HI formulas assume the waves of consecutive generator events
//! do not overlap, which holds whenever `period` exceeds the time one event
//! needs to settle (any period with `preparation_time == 0`).

use crate::BenchKind;

/// Internal (and external) transitions of an LI run: `m((w-1)(d-1)+1)`.
pub fn li_expected(width: u32, depth: u32, max_events: u64) -> u64 {
    let (w, d) = (u64::from(width), u64::from(depth));
    max_events * ((w - 1) * (d - 1) + 1)
}

/// Internal (and external) transitions of an HI run: `m((w-1)w/2 (d-1)+1)`.
///
/// Atomic `k` of a chain is reached once from the level input and once by
/// each of its `k - 1` predecessors.
pub fn hi_expected(width: u32, depth: u32, max_events: u64) -> u64 {
    let (w, d) = (u64::from(width), u64::from(depth));
    max_events * ((w - 1) * w / 2 * (d - 1) + 1)
}

/// Expected internal transitions for `kind`, where a closed form exists.
/// HO shares HI's count; HOmod has only an event bound.
pub fn expected_transitions(kind: BenchKind, width: u32, depth: u32, max_events: u64) -> Option<u64> {
    match kind {
        BenchKind::Li                 => Some(li_expected(width, depth, max_events)),
        BenchKind::Hi | BenchKind::Ho => Some(hi_expected(width, depth, max_events)),
        BenchKind::HoMod              => None,
    }
}

/// Upper bound on the values delivered to HOmod atomics by one generator
/// event.  Exact for `depth == 2`.
///
/// `1 + Σ_{l=1}^{d-1} Σ_{c=1}^{K(l)+w-1} Σ_{i=1}^{w} (W(1) + W(i)) · P(l, c-i+1)`
/// where `W(i) = max(w-i, 0)` is the size of grid row `i`.  `P(l, j)` is
/// zero except at `j = 1`, so only the `c = i` terms survive.
pub fn homod_event_bound(width: u32, depth: u32) -> u64 {
    let w = u64::from(width);
    let per_path: u64 = (1..=w).map(|i| big_w(w, 1) + big_w(w, i)).sum();
    let mut n: u64 = 1;
    for l in 1..u64::from(depth) {
        n = n.saturating_add(per_path.saturating_mul(paths(w, l)));
    }
    n
}

fn big_w(w: u64, i: u64) -> u64 {
    w.saturating_sub(i)
}

/// `P(l, 1)`: each level multiplies the paths by `w(w-1)`.
fn paths(w: u64, l: u64) -> u64 {
    let exp = u32::try_from(l - 1).unwrap_or(u32::MAX);
    w.saturating_mul(big_w(w, 1)).saturating_pow(exp)
}
