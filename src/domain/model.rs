use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 報價行項:數量 × 單價
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: i64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(quantity: i64, unit_price: f64) -> Self {
        Self {
            quantity,
            unit_price,
        }
    }
}

/// 單行計價結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    pub subtotal: f64,
    pub fee: f64,
    pub total: f64,
}

/// 彙總計價結果。衍生值,不持久化;輸入變動時重算。
/// 不變式:total == subtotal + fee + taxes (捨入後)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: f64,
    pub fee: f64,
    pub taxes: f64,
    pub total: f64,
}

impl PricingResult {
    pub fn zero() -> Self {
        Self {
            subtotal: 0.0,
            fee: 0.0,
            taxes: 0.0,
            total: 0.0,
        }
    }
}

/// 是否計入報價 (原系統的 sim / não / cortesia 旗標,計價時不過濾,照原樣帶過)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeFlag {
    #[serde(rename = "sim")]
    Sim,
    #[serde(rename = "não")]
    Nao,
    #[serde(rename = "cortesia")]
    Cortesia,
}

impl Default for IncludeFlag {
    fn default() -> Self {
        IncludeFlag::Sim
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationItem {
    pub sku: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(default)]
    pub include: IncludeFlag,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub production_time: Option<String>,
}

impl QuotationItem {
    pub fn as_line_item(&self) -> LineItem {
        LineItem::new(self.quantity, self.unit_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub id: String,
    pub prospect_job_id: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
    pub items: Vec<QuotationItem>,
}

/// 商業漏斗項目。budget_value 在每次報價儲存時由報價總值重算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectJob {
    pub id: String,
    pub description: String,
    pub client_name: String,
    pub status: String,
    pub budget_value: f64,
}

/// 活動履約紀錄,以單一物流基準值計費
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fulfillment {
    pub event_id: String,
    pub logistics_value: f64,
    #[serde(default)]
    pub extra_expenses: f64,
    pub fee: f64,
    pub taxes: f64,
    pub total_invoiced: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub item: String,
    pub quantity: i64,
    pub status: String,
    pub fulfillment: Option<Fulfillment>,
}

/// 行項與其計價結果,計價階段的逐行輸出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub item: QuotationItem,
    pub pricing: LinePricing,
}

/// 計價階段的完整輸出,交給 load 階段落地
#[derive(Debug, Clone)]
pub struct PricedBatch {
    pub priced_lines: Vec<PricedLine>,
    pub totals: PricingResult,
    pub csv_output: String,
    pub summary_json: String,
}

/// 計價後的報價:逐行結果加彙總
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedQuotation {
    pub quotation_id: String,
    pub prospect_job_id: String,
    pub lines: Vec<LinePricing>,
    pub totals: PricingResult,
}

/// 一次計費週期的產出摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub priced_quotations: Vec<PricedQuotation>,
    pub budgets_synced: usize,
    pub fulfillments_priced: usize,
}
