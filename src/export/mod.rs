mod enriched_export;

pub use enriched_export::{produce_enriched_export, write_enriched_export};
