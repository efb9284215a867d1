use devs_core::{DevsError, ModelId};
use thiserror::Error;

use crate::CoordinatorState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("cannot {op} while the coordinator is {state}")]
    InvalidState {
        op:    &'static str,
        state: CoordinatorState,
    },

    /// An atomic model's transition reported a protocol violation.  The run
    /// is aborted; only `exit` is accepted afterwards.
    #[error("model {model} failed: {source}")]
    Model {
        model:  ModelId,
        #[source]
        source: DevsError,
    },

    #[error("no progress: {cycles} consecutive cycles at t={time}")]
    Stalled { time: f64, cycles: u64 },

    #[error("injection at t={time} is past the next scheduled event at t={next}")]
    InjectOutOfBounds { time: f64, next: f64 },

    #[error(transparent)]
    Devs(#[from] DevsError),
}

pub type SimResult<T> = Result<T, SimError>;
