mod cli;
mod report;
mod variants;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, ModelArgs};
use tracing_subscriber::EnvFilter;
use vwwbench_runtime::{RunConfig, VariantRegistry, Worker};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    match cli.command {
        Command::Run {
            models,
            iterations,
            warmup,
            input_policy,
            repeat,
            json,
        } => {
            let config = RunConfig {
                iterations,
                warmup,
                input_policy: input_policy.into(),
            };
            run(models, config, repeat, json).await
        }
        Command::Inspect { models } => inspect(models),
    }
}

fn init_logging(log: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load(models: &ModelArgs) -> Result<VariantRegistry> {
    let device = variants::parse_device(&models.device)?;
    let sources = variants::resolve_sources(&models.model_dir, &models.variants)?;
    Ok(variants::load_registry(&sources, &device))
}

async fn run(
    models: ModelArgs,
    config: RunConfig,
    repeat: usize,
    json: Option<std::path::PathBuf>,
) -> Result<()> {
    let registry = load(&models)?;
    if registry.is_empty() {
        anyhow::bail!("no model variant could be loaded");
    }

    let handle = Worker::spawn(registry)?;
    let mut last = None;
    for pass in 1..=repeat.max(1) {
        println!("Running on-device benchmarks...");
        let report = handle.run(config).await?;
        tracing::info!(pass, variants = report.results.len(), "run finished");
        print!("{}", report::render_table(&report));
        println!("{}", report::done_status(&report));
        last = Some(report);
    }

    if let (Some(path), Some(report)) = (json, last) {
        let body = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}

fn inspect(models: ModelArgs) -> Result<()> {
    let registry = load(&models)?;
    for variant in registry.iter() {
        println!("{}", variant.name());
        for input in &variant.spec().inputs {
            println!("  in  {input}");
        }
        for output in &variant.spec().outputs {
            println!("  out {output}");
        }
    }
    Ok(())
}
