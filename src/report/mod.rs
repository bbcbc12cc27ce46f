pub mod aggregator;
pub mod rollup;

pub use aggregator::run;
pub use rollup::compute_row;
