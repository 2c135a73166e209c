pub mod json_files;

pub use json_files::{load_catalog, load_history, load_payload, load_reading, load_thresholds};
