use clap::Parser;
use hardness_etl::utils::error::EtlError;
use hardness_etl::utils::{logger, validation::Validate};
use hardness_etl::{CliConfig, EtlEngine, HardnessPipeline, LocalStorage};

fn report_failure(e: &EtlError) -> i32 {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    e.severity().exit_code()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, None);

    tracing::info!("Starting hardness-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = match HardnessPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => std::process::exit(report_failure(&e)),
    };

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => std::process::exit(report_failure(&e)),
    }

    Ok(())
}
