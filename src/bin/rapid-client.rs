use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rapid_client::config::loader;
use rapid_client::observability::metrics::encode_metrics;
use rapid_client::utils::logging::{self, LogLevel};
use rapid_client::{ClientConfig, RapidClient, Response};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config; without it the RAPID_* environment variables are used
    #[arg(short, long, env = "RAPID_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Print Prometheus metrics after the call
    #[arg(long)]
    print_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a token and print its type and expiry
    Token,
    /// GET a path, with optional `-q key=value` query parameters
    Get {
        path: String,
        #[arg(short, long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,
    },
    /// POST a JSON document
    Post { path: String, body: String },
    /// PUT a JSON document
    Put { path: String, body: String },
    Delete { path: String },
}

fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid KEY=value: no `=` found in `{s}`"))?;
    Ok((key.to_owned(), value.to_owned()))
}

fn parse_body(body: &str) -> Result<serde_json::Value> {
    serde_json::from_str(body).context("request body is not valid JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config
    // -------------------------------

    let args = Args::parse();
    let client_config = match &args.config {
        Some(path) => loader::file_to_config(path)?,
        None => ClientConfig::from_env(),
    };
    logging::run(&client_config, args.log_level);

    // -------------------------------
    // 2. Create client
    // -------------------------------

    let mut client = RapidClient::new(&client_config)?;
    info!(base_url = client.base_url(), "client ready");

    // -------------------------------
    // 3. Run command
    // -------------------------------

    let response = match args.command {
        Command::Token => {
            client.generate_token().await?;
            if let Some(token) = client.token() {
                println!("{} token, expires at {}", token.token_type(), token.expires_at().to_rfc3339());
            }
            None
        }
        Command::Get { path, query } => {
            let params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            Some(client.get(&path, &params).await?)
        }
        Command::Post { path, body } => Some(client.post(&path, &parse_body(&body)?).await?),
        Command::Put { path, body } => Some(client.put(&path, &parse_body(&body)?).await?),
        Command::Delete { path } => Some(client.delete(&path).await?),
    };

    if let Some(response) = response {
        print_response(response).await?;
    }

    // -------------------------------
    // 4. Metrics
    // -------------------------------

    if args.print_metrics {
        print!("{}", encode_metrics().await?);
    }
    Ok(())
}

async fn print_response(response: Response) -> Result<()> {
    println!("{} {} ({} ms)", response.status, response.request_url, response.elapsed.as_millis());
    let body = response.text().await?;
    if !body.is_empty() {
        println!("{}", body);
    }
    Ok(())
}
