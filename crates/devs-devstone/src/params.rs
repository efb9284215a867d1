//! Benchmark parameters.

use std::fmt;
use std::str::FromStr;

use crate::{BenchError, BenchResult};

/// The four DEVStone structures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BenchKind {
    /// Low interconnection: every atomic is fed only by its level's input.
    #[default]
    Li,
    /// High interconnection: LI plus a chain between the atomics of a level.
    Hi,
    /// HI fed through a second input pair, with atomic outputs collected on
    /// a second output.
    Ho,
    /// Triangular grid of atomics whose first row feeds back into the next
    /// level's auxiliary input.
    HoMod,
}

impl BenchKind {
    pub const ALL: [BenchKind; 4] = [BenchKind::Li, BenchKind::Hi, BenchKind::Ho, BenchKind::HoMod];

    /// `true` if the top of the tower has an `inAux` port the generator
    /// also feeds.
    pub fn has_aux_input(self) -> bool {
        matches!(self, BenchKind::Ho | BenchKind::HoMod)
    }
}

impl fmt::Display for BenchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BenchKind::Li    => "LI",
            BenchKind::Hi    => "HI",
            BenchKind::Ho    => "HO",
            BenchKind::HoMod => "HOmod",
        })
    }
}

impl FromStr for BenchKind {
    type Err = BenchError;

    fn from_str(s: &str) -> BenchResult<Self> {
        BenchKind::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| BenchError::InvalidParameter(format!("unknown benchmark {s:?} (expected LI, HI, HO or HOmod)")))
    }
}

/// Everything needed to build and run one benchmark.
#[derive(Clone, Debug, PartialEq)]
pub struct DevStoneParams {
    pub kind:             BenchKind,
    pub width:            u32,
    pub depth:            u32,
    /// Events the generator emits.
    pub max_events:       u64,
    /// Delay before the generator's first event, and the hold time of an
    /// atomic after an external transition.
    pub preparation_time: f64,
    /// Gap between generator events.
    pub period:           f64,
    /// Busy work per internal transition, milliseconds of wall time.
    pub int_delay_ms:     f64,
    /// Busy work per external transition, milliseconds of wall time.
    pub ext_delay_ms:     f64,
}

impl Default for DevStoneParams {
    fn default() -> Self {
        Self {
            kind:             BenchKind::Li,
            width:            2,
            depth:            2,
            max_events:       1,
            preparation_time: 0.0,
            period:           1.0,
            int_delay_ms:     0.0,
            ext_delay_ms:     0.0,
        }
    }
}

impl DevStoneParams {
    pub fn new(kind: BenchKind, width: u32, depth: u32, max_events: u64) -> Self {
        Self { kind, width, depth, max_events, ..Self::default() }
    }

    pub fn validate(&self) -> BenchResult<()> {
        let bad = |msg: String| Err(BenchError::InvalidParameter(msg));
        if self.width < 2 {
            return bad(format!("width must be at least 2, got {}", self.width));
        }
        if self.depth < 2 {
            return bad(format!("depth must be at least 2, got {}", self.depth));
        }
        if self.max_events < 1 {
            return bad("max_events must be at least 1".into());
        }
        if !(self.preparation_time >= 0.0 && self.preparation_time.is_finite()) {
            return bad(format!("preparation_time must be finite and >= 0, got {}", self.preparation_time));
        }
        if !(self.period > 0.0 && self.period.is_finite()) {
            return bad(format!("period must be finite and > 0, got {}", self.period));
        }
        for (name, v) in [("int_delay_ms", self.int_delay_ms), ("ext_delay_ms", self.ext_delay_ms)] {
            if !(v >= 0.0 && v.is_finite()) {
                return bad(format!("{name} must be finite and >= 0, got {v}"));
            }
        }
        Ok(())
    }
}
