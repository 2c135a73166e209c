pub mod alerts;
pub mod classify;
pub mod ingest;
pub mod ranking;
pub mod scoring;
pub mod validation;

pub use alerts::{AlertEngine, SustainedAlertEvaluator};
pub use classify::{classify, classify_reading};
pub use ingest::{label_payload, LabeledReading};
pub use ranking::CropRanker;
pub use scoring::ParameterScorer;
pub use validation::{validate_conditions, RangeViolation};
