/// A unit of work flowing from the generator through the processor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Job {
    pub id:   u64,
    /// Simulated time at which the generator created the job.
    pub time: f64,
}
