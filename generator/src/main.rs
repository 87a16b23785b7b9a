use clap::Parser;
use std::path::PathBuf;
use workflow::config::GenerationConfig;
use workflow::runner::Runner;

mod assets;
mod workflow;

/// Synthetic fall-detection video generator.
///
/// Scenes are rendered by the in-process manifest backend: each scene is
/// written as `<output>.json` next to the video path it describes.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Load generation settings from YAML instead of flags
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory containing character models
    #[arg(long, required_unless_present = "config")]
    model_dir: Option<PathBuf>,
    /// Directory for output videos (created if absent)
    #[arg(long, required_unless_present = "config")]
    output_dir: Option<PathBuf>,
    /// Override the preset resolution
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    resolution: Option<Vec<u32>>,
    /// Quality preset: tiny, small, medium, high, full
    #[arg(long, default_value = "small")]
    quality: String,
    /// Variation level: minimal, low, medium, high
    #[arg(long, default_value = "medium")]
    variation: String,
    /// Number of videos; defaults to one per model
    #[arg(long)]
    num_videos: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Model file extension to scan for
    #[arg(long, default_value = "fbx")]
    extension: String,
    /// Output container: mp4 or mkv
    #[arg(long, default_value = "mp4")]
    container: String,
}

impl Args {
    fn into_config(self) -> anyhow::Result<GenerationConfig> {
        if let Some(path) = self.config {
            return GenerationConfig::load(path);
        }

        let (Some(model_dir), Some(output_dir)) = (self.model_dir, self.output_dir) else {
            anyhow::bail!("--model-dir and --output-dir are required without --config");
        };
        let mut config = GenerationConfig::from_args(model_dir, output_dir);
        config.resolution = match self.resolution.as_deref() {
            Some(&[width, height]) => Some([width, height]),
            Some(other) => anyhow::bail!("--resolution takes WIDTH HEIGHT, got {:?}", other),
            None => None,
        };
        config.quality = self.quality;
        config.variation = self.variation;
        config.num_videos = self.num_videos;
        config.seed = self.seed;
        config.model_extension = self.extension;
        config.container = self.container;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Args::parse().into_config()?;

    let runner = Runner::new(config);
    let report = runner.execute()?;

    println!("{}", report.summary_line());
    println!("{}", runner.backend_note());
    for failure in report.failures() {
        println!(
            "  scene {}/{} ({}): {}",
            failure.index + 1,
            report.requested,
            failure.asset_path.display(),
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
