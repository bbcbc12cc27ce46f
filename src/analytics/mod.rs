pub mod series;
pub mod stats;

pub use series::price_series;
