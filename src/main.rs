use alerton::cli::Args;
use alerton::notifier::{self, Notifier};
use alerton::config;
use anyhow::{anyhow, Context, Result};
use clap::Parser;

fn hostname() -> Result<String> {
    nix::unistd::gethostname()
        .context("get hostname")?
        .into_string()
        .map_err(|_| anyhow!("hostname is not valid UTF-8"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::default_path);
    let config = config::load(&config_path).await?;
    let notifier = notifier::from_config(&config)?;

    let host = match args.host.clone() {
        Some(host) => host,
        None => hostname()?,
    };

    notifier
        .send(&args.title, &host, &args.body())
        .await
        .context("send alert")?;

    Ok(())
}
