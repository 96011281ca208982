use anyhow::Context;
use clap::Parser;
use resilo_engine::config::{ConfigLoader, RunConfig};
use resilo_engine::diagnostics::DirectorySink;
use resilo_engine::session::Session;
use resilo_flows::{FlowContext, FlowOutcome, GROUPS, run_group};
use resilo_webdriver::WebDriverBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resilo", version, about = "Storefront end-to-end flow runner")]
struct Args {
    /// Flow groups to run (default: all)
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Config file (default: ./resilo.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storefront base URL (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// WebDriver endpoint (overrides config)
    #[arg(long)]
    driver_url: Option<String>,

    /// Directory for failure captures (overrides config)
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// List flow groups and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so stdout stays a clean pass/fail report.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list {
        for group in GROUPS {
            println!("{}", group);
        }
        return Ok(());
    }

    let mut config = load_config(&args).await?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(driver_url) = args.driver_url {
        config.webdriver_url = driver_url;
    }
    if let Some(artifacts) = args.artifacts {
        config.artifact_dir = artifacts;
    }

    let groups: Vec<String> = if args.groups.is_empty() {
        GROUPS.iter().map(|g| g.to_string()).collect()
    } else {
        args.groups
    };

    let ctx = FlowContext::from_config(&config)
        .with_context(|| format!("invalid base url {}", config.base_url))?;

    let backend = WebDriverBackend::new(&config.webdriver_url);
    let sink = DirectorySink::new(&config.artifact_dir);
    let mut session = Session::new(backend, Box::new(sink))
        .tuned(config.strategy_timeout(), config.poll_interval());

    session
        .launch()
        .await
        .with_context(|| format!("could not reach WebDriver at {}", config.webdriver_url))?;

    let mut all: Vec<FlowOutcome> = Vec::new();
    for group in &groups {
        match run_group(group, &mut session, &ctx).await {
            Ok(outcomes) => all.extend(outcomes),
            Err(e) => {
                session.close().await.ok();
                return Err(e.into());
            }
        }
    }

    session.close().await.ok();

    let mut failed = 0usize;
    for outcome in &all {
        match &outcome.result {
            Ok(()) => println!("PASS {}", outcome.name),
            Err(e) => {
                failed += 1;
                println!("FAIL {}: {}", outcome.name, e);
            }
        }
    }
    println!("{} passed, {} failed", all.len() - failed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

async fn load_config(args: &Args) -> anyhow::Result<RunConfig> {
    match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("could not load {}", path.display())),
        None => ConfigLoader::load_default()
            .await
            .context("could not load ./resilo.yaml"),
    }
}
