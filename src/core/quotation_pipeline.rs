use crate::core::pricing::{price_line, price_lines};
use crate::core::{BillingPipeline, ConfigProvider, PricedBatch, Storage};
use crate::domain::model::{PricedLine, Quotation, QuotationItem};
use crate::utils::error::{BillingError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub struct QuotationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> QuotationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn parse_csv(&self, data: &[u8]) -> Result<Vec<QuotationItem>> {
        let mut reader = csv::Reader::from_reader(data);
        let mut items = Vec::new();
        for row in reader.deserialize::<QuotationItem>() {
            items.push(row?);
        }
        Ok(items)
    }

    fn parse_json(&self, data: &[u8]) -> Result<Vec<QuotationItem>> {
        // 兩種形狀都接受:純項目陣列,或含 items 的完整報價紀錄
        match serde_json::from_slice::<Vec<QuotationItem>>(data) {
            Ok(items) => Ok(items),
            Err(_) => {
                let quotation: Quotation = serde_json::from_slice(data)?;
                Ok(quotation.items)
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> BillingPipeline for QuotationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<QuotationItem>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading quotation items from: {}", input_path);

        let data = self.storage.read_file(input_path).await?;

        let extension = Path::new(input_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "csv" => self.parse_csv(&data),
            "json" => self.parse_json(&data),
            other => Err(BillingError::InvalidConfigValueError {
                field: "input_path".to_string(),
                value: input_path.to_string(),
                reason: format!("Unsupported input format: '{}' (expected csv or json)", other),
            }),
        }
    }

    async fn price(&self, items: Vec<QuotationItem>) -> Result<PricedBatch> {
        let policy = self.config.negative_policy();

        let line_items: Vec<_> = items.iter().map(|i| i.as_line_item()).collect();
        let totals = price_lines(&line_items, policy)?;

        let mut priced_lines = Vec::with_capacity(items.len());
        for item in items {
            let pricing = price_line(item.quantity, item.unit_price, policy)?;
            priced_lines.push(PricedLine { item, pricing });
        }

        // 計價輸出 CSV:逐行 + TOTAL 列
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "sku",
            "description",
            "quantity",
            "unit_price",
            "subtotal",
            "fee",
            "total",
        ])?;
        for line in &priced_lines {
            writer.write_record(&[
                line.item.sku.clone(),
                line.item.description.clone(),
                line.item.quantity.to_string(),
                format!("{:.2}", line.item.unit_price),
                format!("{:.2}", line.pricing.subtotal),
                format!("{:.2}", line.pricing.fee),
                format!("{:.2}", line.pricing.total),
            ])?;
        }
        writer.write_record(&[
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:.2}", totals.subtotal),
            format!("{:.2}", totals.fee),
            format!("{:.2}", totals.total),
        ])?;
        let csv_output = String::from_utf8(
            writer
                .into_inner()
                .map_err(|e| BillingError::ProcessingError {
                    message: format!("CSV buffer flush failed: {}", e),
                })?,
        )
        .map_err(|e| BillingError::ProcessingError {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })?;

        let summary = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "line_count": priced_lines.len(),
            "totals": totals,
        });
        let summary_json = serde_json::to_string_pretty(&summary)?;

        Ok(PricedBatch {
            priced_lines,
            totals,
            csv_output,
            summary_json,
        })
    }

    async fn load(&self, batch: PricedBatch) -> Result<String> {
        let output_dir = self.config.output_path();

        let csv_path = format!("{}/priced.csv", output_dir);
        self.storage
            .write_file(&csv_path, batch.csv_output.as_bytes())
            .await?;

        let summary_path = format!("{}/summary.json", output_dir);
        self.storage
            .write_file(&summary_path, batch.summary_json.as_bytes())
            .await?;

        if !self.config.compress_output() {
            return Ok(csv_path);
        }

        let zip_path = format!("{}/billing_output.zip", output_dir);
        tracing::debug!("Creating ZIP bundle with 2 files");

        // 打包 ZIP
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("priced.csv", FileOptions::default())?;
            zip.write_all(batch.csv_output.as_bytes())?;

            zip.start_file::<_, ()>("summary.json", FileOptions::default())?;
            zip.write_all(batch.summary_json.as_bytes())?;

            // 完成並取回底層 Vec<u8>
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&zip_path, &zip_data).await?;

        Ok(zip_path)
    }
}
