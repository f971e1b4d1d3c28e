use clap::Parser;
use hardness_etl::config::toml_config::TomlConfig;
use hardness_etl::core::ConfigProvider;
use hardness_etl::utils::{logger, validation::Validate};
use hardness_etl::{EtlEngine, HardnessPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Hardness ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "etl-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

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

    // 載入 TOML 配置 (日誌等級可能來自設定檔，先於日誌初始化)
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose, config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }

    tracing::info!("🚀 Starting TOML-based hardness ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = HardnessPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Source: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Hardness strategy: {}", config.hardness_strategy());
    println!("  Height policy: {}", config.height_policy());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📄 Source Workbook:");
    println!("  Path: {}", config.input_path());
    println!(
        "  Exists: {}",
        std::path::Path::new(config.input_path()).exists()
    );

    println!();
    println!("⚙️ Processing:");
    println!(
        "  Hardness encodings tried: {}",
        config
            .hardness_strategy()
            .encodings()
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    println!("  Height policy: {}", config.height_policy());

    let material = config.material_constants();
    println!();
    println!("🧱 Material Constants:");
    println!("  Yield strength: {} MPa", material.yield_strength);
    println!("  Tensile strength: {} MPa", material.tensile_strength);
    println!("  Elongation: {} %", material.elongation_percent);
    println!("  Elastic modulus: {} GPa", material.elastic_modulus);

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Sheet: {}", config.sheet_name());
    for format in config.output_formats() {
        println!("  {} -> {}", format, config.output_filename(format));
    }
    if let Some(archive) = config.archive_filename() {
        println!("  Compression: {} (ZIP)", archive);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
