//! Plain data row types written by output backends.

use devs_model::TransitionKind;

/// One atomic model's state right after a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRow {
    pub time:     f64,
    pub model_id: u32,
    pub model:    String,
    /// `None` for the initial state recorded at initialization.
    pub kind:     Option<TransitionKind>,
    pub phase:    String,
    /// `inf` when the model is passive.
    pub sigma:    f64,
}

impl TransitionRow {
    /// Label written in the `kind` column.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            None                            => "init",
            Some(TransitionKind::Internal)  => "internal",
            Some(TransitionKind::External)  => "external",
            Some(TransitionKind::Confluent) => "confluent",
        }
    }
}

/// Summary of one simulation cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleRow {
    pub time:      f64,
    pub imminent:  u64,
    pub receivers: u64,
}
