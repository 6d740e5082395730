//! Resolve one GitHub credential the way the host framework would and print
//! the resulting identity as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use github_authn::{
    Credentials, GithubAuthNClient, GithubAuthNConfig, GithubAuthNLocalClient, HyperTransport,
    Service,
};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "github-authn-check", version, about)]
struct Cli {
    /// YAML configuration file; `GITHUB_AUTHN_*` environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub login the token is claimed to belong to.
    #[arg(short, long)]
    login: String,

    /// Personal access or OAuth token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: SecretString,

    /// Log filter, e.g. `debug` or `github_authn=trace`.
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid --log filter")?)
        .with_writer(std::io::stderr)
        .init();

    let cfg = GithubAuthNConfig::load(cli.config.as_deref())?.resolve()?;
    tracing::debug!(?cfg, "Loaded configuration");

    let transport = Arc::new(HyperTransport::from_config(&cfg)?);
    let authn = GithubAuthNLocalClient::new(Arc::new(Service::new(&cfg, transport)));

    let credentials = Credentials::new(cli.login, cli.token);
    match authn.authenticate(&credentials).await {
        Ok(identity) => {
            println!("{}", serde_json::to_string_pretty(&identity)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{e} ({})", e.kind());
            Ok(ExitCode::FAILURE)
        }
    }
}
