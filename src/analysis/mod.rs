/// Analysis layer: pure, synchronous statistics over a [`Dataset`].
///
/// Everything here is a deterministic function of its inputs: derived values
/// (correlation matrices, regression summaries) are recomputed in full from
/// the source rows on each call and never cached or mutated in place.
///
/// [`Dataset`]: crate::data::model::Dataset

pub mod correlation;
pub mod error;
pub mod regression;

pub use correlation::CorrelationMatrix;
pub use error::AnalysisError;
pub use regression::RegressionSummary;
