use clap::Parser;
use probe_links::filter::normalize_seed;
use probe_links::report::{build_json, build_report, write_report};
use probe_links::{CrawlRun, LinkChecker};
use tokio::sync::watch;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    std::process::exit(run(args).await);
}

async fn run(args: Args) -> i32 {
    let seed = match normalize_seed(&args.url) {
        Ok(seed) => seed,
        Err(e) => {
            ::log::error!("Invalid URL: {}", e);
            return 1;
        }
    };

    let config = match args.to_config(seed.as_str()) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return 1;
        }
    };

    ::log::info!("Starting broken link check for {}", seed);
    ::log::info!("Using WebDriver at {}", config.webdriver_url);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, stopping after releasing the browser session");
            let _ = cancel_tx.send(true);
        }
    });

    let run = LinkChecker::with_config(config)
        .with_cancellation(cancel_rx)
        .run()
        .await;

    if let Err(e) = emit(&run, &args) {
        ::log::error!("Failed to write report: {}", e);
        return 1;
    }

    run.exit_code()
}

/// Print or save the report for `run`
fn emit(run: &CrawlRun, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let content = if args.json {
        build_json(run)?
    } else {
        build_report(run)
    };

    match &args.output {
        Some(path) => write_report(path, &content)?,
        None => println!("{}", content),
    }
    Ok(())
}
