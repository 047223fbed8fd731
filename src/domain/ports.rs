use crate::core::pricing::NegativePolicy;
use crate::domain::model::{
    EventRecord, Fulfillment, PricedBatch, ProspectJob, Quotation, QuotationItem,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn negative_policy(&self) -> NegativePolicy;
    fn compress_output(&self) -> bool;
}

/// 遠端資料表的注入式替身:select / insert / update,
/// 取代原系統的行程級單例客戶端
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select_quotations(&self) -> Result<Vec<Quotation>>;
    async fn select_prospect_jobs(&self) -> Result<Vec<ProspectJob>>;
    async fn select_events(&self) -> Result<Vec<EventRecord>>;

    async fn insert_quotation(&self, quotation: Quotation) -> Result<()>;
    async fn update_quotation(&self, quotation: &Quotation) -> Result<()>;
    async fn update_budget_value(&self, prospect_job_id: &str, budget_value: f64) -> Result<()>;
    async fn update_fulfillment(&self, event_id: &str, fulfillment: &Fulfillment) -> Result<()>;
}

#[async_trait]
pub trait BillingPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<QuotationItem>>;
    async fn price(&self, items: Vec<QuotationItem>) -> Result<PricedBatch>;
    async fn load(&self, batch: PricedBatch) -> Result<String>;
}
