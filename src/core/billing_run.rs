use crate::core::pricing::{price_base, price_line, price_lines, NegativePolicy};
use crate::core::{RecordStore, Storage};
use crate::domain::model::{BillingReport, Fulfillment, PricedQuotation};
use crate::utils::error::Result;
use std::time::Instant;

/// 單一步驟的執行結果
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step_name: String,
    pub records_processed: usize,
    pub duration: std::time::Duration,
}

/// 計費週期的共享上下文,步驟間傳遞計價結果與計數
#[derive(Debug)]
pub struct RunContext {
    pub run_id: String,
    pub policy: NegativePolicy,
    pub priced_quotations: Vec<PricedQuotation>,
    pub budgets_synced: usize,
    pub fulfillments_priced: usize,
    pub outcomes: Vec<StepOutcome>,
}

impl RunContext {
    pub fn new(run_id: String, policy: NegativePolicy) -> Self {
        Self {
            run_id,
            policy,
            priced_quotations: Vec::new(),
            budgets_synced: 0,
            fulfillments_priced: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn priced_quotation(&self, quotation_id: &str) -> Option<&PricedQuotation> {
        self.priced_quotations
            .iter()
            .find(|p| p.quotation_id == quotation_id)
    }
}

/// 計費週期中的一個步驟。失敗即中止整個週期
#[async_trait::async_trait]
pub trait BillingStep: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, store: &dyn RecordStore, context: &mut RunContext) -> Result<usize>;
}

/// 依序執行步驟的計費週期
pub struct BillingCycle<R: RecordStore> {
    store: R,
    steps: Vec<Box<dyn BillingStep>>,
}

impl<R: RecordStore> BillingCycle<R> {
    pub fn new(store: R) -> Self {
        Self {
            store,
            steps: Vec::new(),
        }
    }

    pub fn add_step(mut self, step: Box<dyn BillingStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub async fn run(&self, mut context: RunContext) -> Result<RunContext> {
        tracing::info!(
            "🚀 Billing cycle '{}' starting with {} steps",
            context.run_id,
            self.steps.len()
        );

        for step in &self.steps {
            tracing::info!("▶️ Step '{}' starting", step.name());
            let started = Instant::now();

            let records_processed = step.execute(&self.store, &mut context).await?;
            let duration = started.elapsed();

            tracing::info!(
                "✅ Step '{}' processed {} records in {:?}",
                step.name(),
                records_processed,
                duration
            );

            context.outcomes.push(StepOutcome {
                step_name: step.name().to_string(),
                records_processed,
                duration,
            });
        }

        tracing::info!("🏁 Billing cycle '{}' completed", context.run_id);
        Ok(context)
    }
}

/// 步驟一:計價所有報價,結果存入上下文並刷新報價紀錄
pub struct PriceQuotationsStep;

#[async_trait::async_trait]
impl BillingStep for PriceQuotationsStep {
    fn name(&self) -> &str {
        "price-quotations"
    }

    async fn execute(&self, store: &dyn RecordStore, context: &mut RunContext) -> Result<usize> {
        let quotations = store.select_quotations().await?;
        let count = quotations.len();

        for mut quotation in quotations {
            let line_items: Vec<_> = quotation.items.iter().map(|i| i.as_line_item()).collect();
            let totals = price_lines(&line_items, context.policy)?;

            let mut lines = Vec::with_capacity(quotation.items.len());
            for item in &quotation.items {
                lines.push(price_line(item.quantity, item.unit_price, context.policy)?);
            }

            tracing::debug!(
                "Quotation {} priced: total {:.2} over {} lines",
                quotation.id,
                totals.total,
                lines.len()
            );

            context.priced_quotations.push(PricedQuotation {
                quotation_id: quotation.id.clone(),
                prospect_job_id: quotation.prospect_job_id.clone(),
                lines,
                totals,
            });

            quotation.last_updated = chrono::Utc::now();
            store.update_quotation(&quotation).await?;
        }

        Ok(count)
    }
}

/// 步驟二:以報價總值同步商業漏斗的 budget_value
pub struct SyncBudgetsStep;

#[async_trait::async_trait]
impl BillingStep for SyncBudgetsStep {
    fn name(&self) -> &str {
        "sync-budgets"
    }

    async fn execute(&self, store: &dyn RecordStore, context: &mut RunContext) -> Result<usize> {
        for priced in &context.priced_quotations {
            store
                .update_budget_value(&priced.prospect_job_id, priced.totals.total)
                .await?;

            tracing::debug!(
                "Prospect job {} budget synced to {:.2}",
                priced.prospect_job_id,
                priced.totals.total
            );
        }

        context.budgets_synced = context.priced_quotations.len();
        Ok(context.budgets_synced)
    }
}

/// 步驟三:由物流基準值重算履約紀錄的手續費/稅額/開票總值
pub struct PriceFulfillmentsStep;

#[async_trait::async_trait]
impl BillingStep for PriceFulfillmentsStep {
    fn name(&self) -> &str {
        "price-fulfillments"
    }

    async fn execute(&self, store: &dyn RecordStore, context: &mut RunContext) -> Result<usize> {
        let events = store.select_events().await?;
        let mut priced = 0usize;

        for event in events {
            let Some(fulfillment) = event.fulfillment else {
                continue;
            };

            let pricing = price_base(fulfillment.logistics_value, context.policy)?;

            let updated = Fulfillment {
                event_id: event.id.clone(),
                logistics_value: pricing.base,
                extra_expenses: fulfillment.extra_expenses,
                fee: pricing.fee,
                taxes: pricing.taxes,
                total_invoiced: pricing.total,
            };

            store.update_fulfillment(&event.id, &updated).await?;
            priced += 1;
        }

        context.fulfillments_priced = priced;
        Ok(priced)
    }
}

/// 步驟四:把計費報告落地成 JSON
pub struct WriteReportStep<S: Storage> {
    storage: S,
    output_dir: String,
}

impl<S: Storage> WriteReportStep<S> {
    pub fn new(storage: S, output_dir: String) -> Self {
        Self {
            storage,
            output_dir,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> BillingStep for WriteReportStep<S> {
    fn name(&self) -> &str {
        "write-report"
    }

    async fn execute(&self, _store: &dyn RecordStore, context: &mut RunContext) -> Result<usize> {
        let report = BillingReport {
            run_id: context.run_id.clone(),
            generated_at: chrono::Utc::now(),
            priced_quotations: context.priced_quotations.clone(),
            budgets_synced: context.budgets_synced,
            fulfillments_priced: context.fulfillments_priced,
        };

        let report_path = format!("{}/billing_report.json", self.output_dir);
        let payload = serde_json::to_string_pretty(&report)?;
        self.storage
            .write_file(&report_path, payload.as_bytes())
            .await?;

        tracing::info!("📁 Billing report written to: {}", report_path);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::core::pricing::round2;
    use crate::utils::error::BillingError;

    struct CountingStep {
        step_name: String,
    }

    #[async_trait::async_trait]
    impl BillingStep for CountingStep {
        fn name(&self) -> &str {
            &self.step_name
        }

        async fn execute(
            &self,
            _store: &dyn RecordStore,
            _context: &mut RunContext,
        ) -> Result<usize> {
            Ok(7)
        }
    }

    struct FailingStep;

    #[async_trait::async_trait]
    impl BillingStep for FailingStep {
        fn name(&self) -> &str {
            "failing"
        }

        async fn execute(
            &self,
            _store: &dyn RecordStore,
            _context: &mut RunContext,
        ) -> Result<usize> {
            Err(BillingError::ProcessingError {
                message: "boom".to_string(),
            })
        }
    }

    fn test_context() -> RunContext {
        RunContext::new("bill_test".to_string(), NegativePolicy::Reject)
    }

    #[tokio::test]
    async fn test_cycle_records_outcomes_in_order() {
        let cycle = BillingCycle::new(MemoryStore::empty())
            .add_step(Box::new(CountingStep {
                step_name: "first".to_string(),
            }))
            .add_step(Box::new(CountingStep {
                step_name: "second".to_string(),
            }));

        let context = cycle.run(test_context()).await.unwrap();
        assert_eq!(context.outcomes.len(), 2);
        assert_eq!(context.outcomes[0].step_name, "first");
        assert_eq!(context.outcomes[1].step_name, "second");
        assert_eq!(context.outcomes[0].records_processed, 7);
    }

    #[tokio::test]
    async fn test_cycle_aborts_on_first_failure() {
        let cycle = BillingCycle::new(MemoryStore::empty())
            .add_step(Box::new(FailingStep))
            .add_step(Box::new(CountingStep {
                step_name: "never-reached".to_string(),
            }));

        let result = cycle.run(test_context()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_price_quotations_step_fills_context() {
        let cycle = BillingCycle::new(MemoryStore::seeded()).add_step(Box::new(PriceQuotationsStep));

        let context = cycle.run(test_context()).await.unwrap();
        assert!(!context.priced_quotations.is_empty());
        for priced in &context.priced_quotations {
            let t = &priced.totals;
            assert_eq!(round2(t.subtotal + t.fee + t.taxes), t.total);
        }
    }
}
