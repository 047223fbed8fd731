use anyhow::Context;
use clap::Parser;
use ventura_billing::config::toml_config::BillingConfig;
use ventura_billing::core::billing_run::{
    BillingCycle, PriceFulfillmentsStep, PriceQuotationsStep, RunContext, SyncBudgetsStep,
    WriteReportStep,
};
use ventura_billing::utils::{logger, validation::Validate};
use ventura_billing::{LocalStorage, MemoryStore};

#[derive(Parser)]
#[command(name = "billing-cycle")]
#[command(about = "Full billing cycle: price quotations, sync pipeline budgets, price fulfillments")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "billing-config.toml")]
    config: String,

    /// Run ID (generated from the current timestamp when omitted)
    #[arg(long)]
    run_id: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON logs (for scheduled runs)
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_batch_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting billing cycle");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match BillingConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 生成執行 ID
    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| format!("bill_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));

    display_run_summary(&config, &run_id);

    let store = MemoryStore::seeded();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No records will be updated");
        perform_dry_run(&store).await?;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let cycle = BillingCycle::new(store)
        .add_step(Box::new(PriceQuotationsStep))
        .add_step(Box::new(SyncBudgetsStep))
        .add_step(Box::new(PriceFulfillmentsStep))
        .add_step(Box::new(WriteReportStep::new(
            storage,
            config.output_path().to_string(),
        )));

    let context = RunContext::new(run_id.clone(), config.negative_policy());

    match cycle.run(context).await {
        Ok(context) => {
            tracing::info!("🎉 Billing cycle completed successfully!");

            println!("✅ Billing cycle completed successfully!");
            println!("🆔 Run ID: {}", run_id);
            println!("📊 Quotations priced: {}", context.priced_quotations.len());
            println!("📊 Budgets synced: {}", context.budgets_synced);
            println!("📊 Fulfillments priced: {}", context.fulfillments_priced);
            for outcome in &context.outcomes {
                println!(
                    "   {} - {} records in {:?}",
                    outcome.step_name, outcome.records_processed, outcome.duration
                );
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Billing cycle failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ventura_billing::utils::error::ErrorSeverity::Low => 0,
                ventura_billing::utils::error::ErrorSeverity::Medium => 2,
                ventura_billing::utils::error::ErrorSeverity::High => 1,
                ventura_billing::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_run_summary(config: &BillingConfig, run_id: &str) {
    tracing::info!("📋 Run: {} v{}", config.run.name, config.run.version);
    if !config.run.description.is_empty() {
        tracing::info!("📋 {}", config.run.description);
    }
    tracing::info!("🆔 Run ID: {}", run_id);
    tracing::info!("📂 Output path: {}", config.output_path());
    tracing::info!("⚖️ Negative input policy: {:?}", config.negative_policy());
}

async fn perform_dry_run(store: &MemoryStore) -> anyhow::Result<()> {
    use ventura_billing::core::RecordStore;

    let quotations = store
        .select_quotations()
        .await
        .context("listing quotations for dry run")?;
    let events = store
        .select_events()
        .await
        .context("listing events for dry run")?;

    println!("🔍 Dry run summary:");
    println!("   {} quotations would be priced", quotations.len());
    for quotation in &quotations {
        println!(
            "   - {} ({} lines, prospect job {})",
            quotation.id,
            quotation.items.len(),
            quotation.prospect_job_id
        );
    }
    let with_fulfillment = events.iter().filter(|e| e.fulfillment.is_some()).count();
    println!("   {} fulfillments would be repriced", with_fulfillment);

    Ok(())
}
