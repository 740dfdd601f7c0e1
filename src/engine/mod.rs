mod dataset;
mod sales_engine;
#[cfg(test)]
mod tests;

pub use dataset::Dataset;
pub use sales_engine::SalesEngine;
