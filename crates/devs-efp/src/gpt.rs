//! Wiring of the generator / processor / transducer scenario.

use devs_core::{DevsResult, ModelId};
use devs_model::ModelTree;
use devs_sim::{Coordinator, SimConfig, SimResult, SimStats};

use crate::{Generator, Processor, Transducer, TransducerReport};

/// A built GPT tree plus the ids of its three models.
pub struct Gpt {
    pub tree:       ModelTree,
    pub generator:  ModelId,
    pub processor:  ModelId,
    pub transducer: ModelId,
}

/// Build the scenario as the root of a new tree named `"gpt"`.
///
/// The processor's service time is `3 × period`.
pub fn build_gpt(period: f64, observation: f64) -> DevsResult<Gpt> {
    let mut tree = ModelTree::new("gpt");
    let root = tree.root();
    let generator = tree.add_atomic(root, "generator", Generator::new(period))?;
    let processor = tree.add_atomic(root, "processor", Processor::new(3.0 * period))?;
    let transducer = tree.add_atomic(root, "transducer", Transducer::new(observation))?;

    tree.couple(root, generator, "out", processor, "in")?;
    tree.couple(root, generator, "out", transducer, "arrived")?;
    tree.couple(root, processor, "out", transducer, "solved")?;
    tree.couple(root, transducer, "out", generator, "stop")?;

    Ok(Gpt { tree, generator, processor, transducer })
}

impl Gpt {
    /// Run the scenario to completion and return the transducer's report
    /// together with the kernel statistics.
    pub fn run(self, config: SimConfig) -> SimResult<(TransducerReport, SimStats)> {
        let transducer = self.transducer;
        let mut coord = Coordinator::with_config(self.tree, config)?;
        coord.initialize()?;
        let stats = coord.simulate(f64::INFINITY)?;
        coord.exit()?;
        let report = coord
            .tree()
            .atomic::<Transducer>(transducer)
            .map(|t| t.report().copied().unwrap_or_else(|| t.snapshot()))
            .unwrap_or_default();
        Ok((report, stats))
    }
}
