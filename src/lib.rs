pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::MemoryStore;
pub use config::cli::LocalStorage;
pub use core::{engine::BillingEngine, quotation_pipeline::QuotationPipeline};
pub use utils::error::{BillingError, Result};
