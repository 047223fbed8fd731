use crate::core::RecordStore;
use crate::domain::model::{EventRecord, Fulfillment, ProspectJob, Quotation, QuotationItem};
use crate::utils::error::{BillingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 記憶體內的紀錄儲存。遠端服務不可達時原系統退回靜態假資料,
/// 這裡把同一份資料做成可注入的 RecordStore 實作
#[derive(Clone, Default)]
pub struct MemoryStore {
    quotations: Arc<Mutex<HashMap<String, Quotation>>>,
    prospect_jobs: Arc<Mutex<HashMap<String, ProspectJob>>>,
    events: Arc<Mutex<HashMap<String, EventRecord>>>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 以代表性的假資料建立儲存
    pub fn seeded() -> Self {
        let mut quotations = HashMap::new();
        quotations.insert(
            "QUO-001".to_string(),
            Quotation {
                id: "QUO-001".to_string(),
                prospect_job_id: "PR-001".to_string(),
                status: "Enviado".to_string(),
                last_updated: chrono::Utc::now(),
                items: vec![QuotationItem {
                    sku: "BR-GEN-001".to_string(),
                    description: "Copo biodegradável para água 200ml".to_string(),
                    quantity: 1000,
                    unit_price: 2.15,
                    include: Default::default(),
                    observations: Some("Impressão em 1 cor".to_string()),
                    production_time: Some("15 dias úteis".to_string()),
                }],
            },
        );
        quotations.insert(
            "QUO-002".to_string(),
            Quotation {
                id: "QUO-002".to_string(),
                prospect_job_id: "PR-002".to_string(),
                status: "Rascunho".to_string(),
                last_updated: chrono::Utc::now(),
                items: vec![
                    QuotationItem {
                        sku: "BR-GEN-014".to_string(),
                        description: "Squeeze metálico 500ml".to_string(),
                        quantity: 2,
                        unit_price: 10.0,
                        include: Default::default(),
                        observations: None,
                        production_time: None,
                    },
                    QuotationItem {
                        sku: "BR-GEN-022".to_string(),
                        description: "Caneta ecológica".to_string(),
                        quantity: 3,
                        unit_price: 5.0,
                        include: Default::default(),
                        observations: None,
                        production_time: None,
                    },
                ],
            },
        );

        let mut prospect_jobs = HashMap::new();
        prospect_jobs.insert(
            "PR-001".to_string(),
            ProspectJob {
                id: "PR-001".to_string(),
                description: "Kit Boas Vindas Integradores".to_string(),
                client_name: "Iorrana Barreto".to_string(),
                status: "Em orçamento".to_string(),
                budget_value: 45000.0,
            },
        );
        prospect_jobs.insert(
            "PR-002".to_string(),
            ProspectJob {
                id: "PR-002".to_string(),
                description: "Brindes evento regional".to_string(),
                client_name: "Luciane Rosolen".to_string(),
                status: "Em orçamento".to_string(),
                budget_value: 0.0,
            },
        );

        let mut events = HashMap::new();
        events.insert(
            "EV-001".to_string(),
            EventRecord {
                id: "EV-001".to_string(),
                item: "Kit evento Superintendência".to_string(),
                quantity: 120,
                status: "Faturado".to_string(),
                fulfillment: Some(Fulfillment {
                    event_id: "EV-001".to_string(),
                    logistics_value: 550.0,
                    extra_expenses: 20.0,
                    // 種子值為舊公式的殘留,計費週期會由 logistics_value 重算
                    fee: 57.0,
                    taxes: 163.23,
                    total_invoiced: 932.73,
                }),
            },
        );

        Self {
            quotations: Arc::new(Mutex::new(quotations)),
            prospect_jobs: Arc::new(Mutex::new(prospect_jobs)),
            events: Arc::new(Mutex::new(events)),
        }
    }

    pub async fn put_prospect_job(&self, job: ProspectJob) {
        let mut jobs = self.prospect_jobs.lock().await;
        jobs.insert(job.id.clone(), job);
    }

    pub async fn put_event(&self, event: EventRecord) {
        let mut events = self.events.lock().await;
        events.insert(event.id.clone(), event);
    }

    pub async fn prospect_job(&self, id: &str) -> Option<ProspectJob> {
        let jobs = self.prospect_jobs.lock().await;
        jobs.get(id).cloned()
    }

    pub async fn event(&self, id: &str) -> Option<EventRecord> {
        let events = self.events.lock().await;
        events.get(id).cloned()
    }

    pub async fn quotation(&self, id: &str) -> Option<Quotation> {
        let quotations = self.quotations.lock().await;
        quotations.get(id).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select_quotations(&self) -> Result<Vec<Quotation>> {
        let quotations = self.quotations.lock().await;
        let mut rows: Vec<_> = quotations.values().cloned().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn select_prospect_jobs(&self) -> Result<Vec<ProspectJob>> {
        let jobs = self.prospect_jobs.lock().await;
        let mut rows: Vec<_> = jobs.values().cloned().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn select_events(&self) -> Result<Vec<EventRecord>> {
        let events = self.events.lock().await;
        let mut rows: Vec<_> = events.values().cloned().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn insert_quotation(&self, quotation: Quotation) -> Result<()> {
        let mut quotations = self.quotations.lock().await;
        quotations.insert(quotation.id.clone(), quotation);
        Ok(())
    }

    async fn update_quotation(&self, quotation: &Quotation) -> Result<()> {
        let mut quotations = self.quotations.lock().await;
        if !quotations.contains_key(&quotation.id) {
            return Err(BillingError::RecordNotFound {
                kind: "quotation".to_string(),
                id: quotation.id.clone(),
            });
        }
        quotations.insert(quotation.id.clone(), quotation.clone());
        Ok(())
    }

    async fn update_budget_value(&self, prospect_job_id: &str, budget_value: f64) -> Result<()> {
        let mut jobs = self.prospect_jobs.lock().await;
        match jobs.get_mut(prospect_job_id) {
            Some(job) => {
                job.budget_value = budget_value;
                Ok(())
            }
            None => Err(BillingError::RecordNotFound {
                kind: "prospect job".to_string(),
                id: prospect_job_id.to_string(),
            }),
        }
    }

    async fn update_fulfillment(&self, event_id: &str, fulfillment: &Fulfillment) -> Result<()> {
        let mut events = self.events.lock().await;
        match events.get_mut(event_id) {
            Some(event) => {
                event.fulfillment = Some(fulfillment.clone());
                Ok(())
            }
            None => Err(BillingError::RecordNotFound {
                kind: "event".to_string(),
                id: event_id.to_string(),
            }),
        }
    }
}
