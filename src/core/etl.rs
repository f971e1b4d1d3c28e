use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("Extracting workbook...");
        let workbook = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} sheets ({} rows)",
            workbook.sheets.len(),
            workbook.total_rows()
        );
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("Transforming rows...");
        let result = self.pipeline.transform(workbook).await?;
        tracing::info!(
            "Transformed {} records ({} rows skipped)",
            result.records.len(),
            result.stats.rows_skipped
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("Loading data...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
