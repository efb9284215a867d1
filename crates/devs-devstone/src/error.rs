use devs_core::DevsError;
use devs_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid benchmark parameter: {0}")]
    InvalidParameter(String),

    #[error("model construction failed: {0}")]
    Devs(#[from] DevsError),

    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
}

pub type BenchResult<T> = Result<T, BenchError>;
