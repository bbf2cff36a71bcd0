pub mod classifier;
pub mod data;
pub mod dataset;
pub mod dates;
