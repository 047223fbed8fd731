use tempfile::TempDir;
use ventura_billing::core::pricing::NegativePolicy;
use ventura_billing::{BillingEngine, CliConfig, LocalStorage, QuotationPipeline};

fn write_csv_fixture(dir: &TempDir) {
    let csv = "sku,description,quantity,unit_price\n\
               BR-GEN-001,Copo biodegradável,1000,2.15\n\
               BR-GEN-014,Squeeze metálico,2,10.00\n\
               BR-GEN-022,Caneta ecológica,3,5.00\n";
    std::fs::write(dir.path().join("quotation.csv"), csv).unwrap();
}

fn test_config(input_path: &str, compress: bool) -> CliConfig {
    CliConfig {
        input_path: input_path.to_string(),
        output_path: "out".to_string(),
        negative_policy: NegativePolicy::Reject,
        compress,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_csv_quotation_pricing() {
    let temp_dir = TempDir::new().unwrap();
    write_csv_fixture(&temp_dir);

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = QuotationPipeline::new(storage, test_config("quotation.csv", false));
    let engine = BillingEngine::new_with_monitoring(pipeline, false);

    let output_path = engine.run().await.unwrap();
    assert_eq!(output_path, "out/priced.csv");

    // Verify priced CSV content
    let priced_csv =
        std::fs::read_to_string(temp_dir.path().join("out/priced.csv")).unwrap();
    assert!(priced_csv.contains("sku,description,quantity,unit_price,subtotal,fee,total"));
    assert!(priced_csv.contains("BR-GEN-001"));
    assert!(priced_csv.contains("2814.55"));
    assert!(priced_csv.contains("TOTAL"));

    // Verify summary totals: 2150 + 20 + 15 = 2185.00 subtotal,
    // 172.00 + 1.60 + 1.20 = 174.80 fee, 2814.55 + 26.18 + 19.64 = 2860.37 total
    let summary: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("out/summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["line_count"], 3);
    assert_eq!(summary["totals"]["subtotal"], 2185.00);
    assert_eq!(summary["totals"]["fee"], 174.80);
    assert_eq!(summary["totals"]["total"], 2860.37);
    assert_eq!(summary["totals"]["taxes"], 500.57);
}

#[tokio::test]
async fn test_end_to_end_json_quotation_pricing() {
    let temp_dir = TempDir::new().unwrap();
    let items = serde_json::json!([
        {"sku": "BR-GEN-001", "description": "Copo biodegradável", "quantity": 1000, "unit_price": 2.15}
    ]);
    std::fs::write(
        temp_dir.path().join("quotation.json"),
        serde_json::to_vec(&items).unwrap(),
    )
    .unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = QuotationPipeline::new(storage, test_config("quotation.json", false));
    let engine = BillingEngine::new(pipeline);

    engine.run().await.unwrap();

    let summary: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("out/summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["totals"]["total"], 2814.55);
    assert_eq!(summary["totals"]["taxes"], 492.55);
}

#[tokio::test]
async fn test_end_to_end_with_zip_bundle() {
    let temp_dir = TempDir::new().unwrap();
    write_csv_fixture(&temp_dir);

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = QuotationPipeline::new(storage, test_config("quotation.csv", true));
    let engine = BillingEngine::new(pipeline);

    let output_path = engine.run().await.unwrap();
    assert_eq!(output_path, "out/billing_output.zip");

    let zip_data = std::fs::read(temp_dir.path().join("out/billing_output.zip")).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(file_names.contains(&"priced.csv".to_string()));
    assert!(file_names.contains(&"summary.json".to_string()));

    let mut csv_file = archive.by_name("priced.csv").unwrap();
    let mut csv_content = String::new();
    std::io::Read::read_to_string(&mut csv_file, &mut csv_content).unwrap();
    assert!(csv_content.contains("TOTAL"));
}

#[tokio::test]
async fn test_missing_input_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = QuotationPipeline::new(storage, test_config("nowhere.csv", false));
    let engine = BillingEngine::new(pipeline);

    assert!(engine.run().await.is_err());
}

#[tokio::test]
async fn test_negative_line_rejected_through_the_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let csv = "sku,description,quantity,unit_price\n\
               BR-BAD-001,Estorno,-10,2.15\n";
    std::fs::write(temp_dir.path().join("quotation.csv"), csv).unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let pipeline = QuotationPipeline::new(storage, test_config("quotation.csv", false));
    let engine = BillingEngine::new(pipeline);

    assert!(engine.run().await.is_err());
}
