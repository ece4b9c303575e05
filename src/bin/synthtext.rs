use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use synthtext::GenerateOptions;
use synthtext::dataset::DatasetKind;

#[derive(Parser, Debug)]
#[command(name = "synthtext", version, about = "Generate synthetic text-line images")]
struct Cli {
    /// Generator config JSON (a list of generator configs).
    #[arg(long)]
    config: PathBuf,

    /// Output storage layout.
    #[arg(long, value_enum, default_value_t = DatasetKind::Img)]
    dataset: DatasetKind,

    /// Worker threads; 0 renders on the main thread. Defaults to one per core.
    #[arg(long)]
    workers: Option<usize>,

    /// Log progress every this many percent.
    #[arg(long, default_value_t = 10.0)]
    log_period: f64,

    /// Base RNG seed. Seeded from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let configs = synthtext::config::from_path(&cli.config)
        .with_context(|| format!("load config '{}'", cli.config.display()))?;
    let opts = GenerateOptions {
        workers: cli.workers,
        log_period: cli.log_period,
        seed: cli.seed,
        dataset: cli.dataset,
    };

    for cfg in &configs {
        synthtext::generate(cfg, &opts)
            .with_context(|| format!("generate into '{}'", cfg.save_dir.display()))?;
    }
    Ok(())
}
