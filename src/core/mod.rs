pub mod billing_run;
pub mod engine;
pub mod pricing;
pub mod quotation_pipeline;

pub use crate::domain::model::{LineItem, PricedBatch, PricingResult};
pub use crate::domain::ports::{BillingPipeline, ConfigProvider, RecordStore, Storage};
pub use crate::utils::error::Result;
