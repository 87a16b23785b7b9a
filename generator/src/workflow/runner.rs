use crate::assets::scan::scan_assets;
use crate::workflow::config::GenerationConfig;
use anyhow::Context;
use fallcore::{BatchReport, DatasetBatchDriver, MemoryHost, SceneHost};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

pub const SUMMARY_LOG: &str = "generation.log";
pub const REPORT_FILE: &str = "report.json";

#[derive(Clone)]
pub struct Runner {
    config: GenerationConfig,
}

impl Runner {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Runs the batch against the manifest-exporting in-process host.
    pub fn execute(&self) -> anyhow::Result<BatchReport> {
        let mut host = MemoryHost::new().with_manifest_export();
        self.execute_with(&mut host)
    }

    /// Console line describing where the manifest backend left its output.
    pub fn backend_note(&self) -> String {
        format!(
            "Scene manifests written to {} (manifest backend, no video encoded)",
            self.config.output_dir.display()
        )
    }

    pub fn execute_with<H: SceneHost>(&self, host: &mut H) -> anyhow::Result<BatchReport> {
        let settings = self
            .config
            .to_batch_settings()
            .context("resolving generation settings")?;
        let driver = DatasetBatchDriver::new(settings).context("configuring batch driver")?;
        let pool = scan_assets(&self.config.model_dir, &self.config.model_extension)?;

        let report = driver.run(host, &pool).context("running generation batch")?;
        write_report(&self.config.output_dir, &report)?;
        Ok(report)
    }
}

fn write_report(output_dir: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let log_path = output_dir.join(SUMMARY_LOG);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;
    writeln!(file, "{} seed={}", report.summary_line(), report.seed)
        .with_context(|| format!("writing {}", log_path.display()))?;

    let report_path = output_dir.join(REPORT_FILE);
    let body = serde_json::to_string_pretty(report).context("serializing batch report")?;
    fs::write(&report_path, body)
        .with_context(|| format!("writing {}", report_path.display()))?;
    Ok(())
}
