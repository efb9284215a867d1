//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `transitions.csv`
//! - `cycles.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CycleRow, OutputResult, TransitionRow};

/// Writes a simulation trace to two CSV files.
pub struct CsvWriter {
    transitions: Writer<File>,
    cycles:      Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut transitions = Writer::from_path(dir.join("transitions.csv"))?;
        transitions.write_record(["time", "model_id", "model", "kind", "phase", "sigma"])?;

        let mut cycles = Writer::from_path(dir.join("cycles.csv"))?;
        cycles.write_record(["time", "imminent", "receivers"])?;

        Ok(Self {
            transitions,
            cycles,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        for row in rows {
            self.transitions.write_record(&[
                row.time.to_string(),
                row.model_id.to_string(),
                row.model.clone(),
                row.kind_label().to_string(),
                row.phase.clone(),
                row.sigma.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_cycle(&mut self, row: &CycleRow) -> OutputResult<()> {
        self.cycles.write_record(&[
            row.time.to_string(),
            row.imminent.to_string(),
            row.receivers.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.transitions.flush()?;
        self.cycles.flush()?;
        Ok(())
    }
}
