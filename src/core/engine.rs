use crate::core::BillingPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct BillingEngine<P: BillingPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: BillingPipeline> BillingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting billing run...");

        // Extract
        println!("Extracting quotation items...");
        let items = self.pipeline.extract().await?;
        println!("Extracted {} items", items.len());
        self.monitor.log_stats("Extract");

        // Price
        println!("Pricing items...");
        let batch = self.pipeline.price(items).await?;
        println!(
            "Priced {} lines, invoiced total {:.2}",
            batch.priced_lines.len(),
            batch.totals.total
        );
        self.monitor.log_stats("Price");

        // Load
        println!("Writing priced output...");
        let output_path = self.pipeline.load(batch).await?;
        println!("Output saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
