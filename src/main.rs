mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::path::PathBuf;
use tohls::LadderPipeline;
use tohls_av::{FfmpegEncoder, FfprobeInspector, ToolRegistry};
use tohls_core::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tohls=trace,tohls_av=trace,tohls_ladder=trace,tohls_core=debug".to_string()
        } else {
            "tohls=info,tohls_av=info,tohls_ladder=info,tohls_core=info".to_string()
        }
    });

    // Logs go to stderr; stdout is reserved for --dry-run and --check-tools.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    for warning in config.validate() {
        tracing::warn!("config: {warning}");
    }

    if cli.check_tools {
        return check_tools(&config);
    }

    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }
    if let Some(dir) = cli.output_dir.clone() {
        config.output_dir = Some(dir);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(&cli, &config))
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let tools = ToolRegistry::discover(&config.tools);
    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let inspector = FfprobeInspector::from_registry(&tools)?.with_timeout(
        std::time::Duration::from_secs(config.encode.probe_timeout_secs),
    );

    if cli.dry_run {
        // Only ffprobe is needed to plan; never touch ffmpeg.
        for input in &cli.files {
            let ladder = tohls::pipeline::plan_file(&inspector, &cli.formats, input)
                .await
                .with_context(|| format!("Error while processing file '{}'", input.display()))?;
            let plan = serde_json::json!({
                "input": input,
                "master_playlist": output_dir.join(tohls_ladder::master_playlist_name(input)),
                "renditions": ladder,
            });
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        return Ok(());
    }

    let encoder =
        FfmpegEncoder::from_registry(&tools, output_dir.clone(), config.encode.clone())?;
    let pipeline = LadderPipeline::new(Box::new(inspector), Box::new(encoder))
        .with_output_dir(output_dir)
        .with_jobs(config.effective_jobs());

    let masters = pipeline.run(&cli.formats, &cli.files).await?;
    for master in masters {
        tracing::info!("Wrote {}", master.display());
    }
    Ok(())
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let registry = ToolRegistry::discover(&config.tools);
    let mut all_ok = true;

    for tool in registry.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);
        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }
        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }
        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
        Ok(())
    } else {
        anyhow::bail!("ffmpeg and ffprobe are both required; install them or set tools paths in the config")
    }
}
