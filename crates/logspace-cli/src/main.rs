// LogSpace CLI - root-cause analysis over LogSpace log folders

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use logspace_core::{locate_logs, LogKind};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "logspace")]
#[command(version = "0.1.0")]
#[command(about = "Log root-cause analysis CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(short, long, env = "LOGSPACE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an RCA for a client and application
    Analyze {
        /// Client (bank) name, e.g. Barclays
        client: String,

        /// Application name, e.g. Unigy
        logspace: String,

        /// Version, e.g. 4.0.1
        #[arg(short, long)]
        version: Option<String>,

        /// Timestamp of the incident (free text, only used in the query)
        #[arg(short, long)]
        timestamp: Option<String>,

        /// Number of evidence chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Analyze this log file instead of searching the LogSpace tree
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Check the API server is up
    Status,

    /// List the log files the server would pick up, without calling it
    Locate {
        /// Client (bank) name
        client: String,

        /// Application name
        logspace: String,

        /// Version filter
        #[arg(short, long)]
        version: Option<String>,

        /// LogSpace root directory
        #[arg(short, long, env = "LOGSPACE_ROOT", default_value = "LogSpace")]
        root: PathBuf,
    },
}

#[derive(Serialize)]
struct AnalyzeRequest {
    client: String,
    logspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uploaded_log_text: Option<String>,
}

// API Response types
#[derive(Deserialize)]
struct AnalyzeResponse {
    client: String,
    logspace: String,
    results: Vec<AnalysisResult>,
}

#[derive(Deserialize)]
struct AnalysisResult {
    answer: String,
    evidence: Vec<Evidence>,
}

#[derive(Deserialize)]
struct Evidence {
    score: f32,
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
    code: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Analyze {
            client: bank,
            logspace,
            version,
            timestamp,
            top_k,
            file,
        } => {
            let uploaded_log_text = match file {
                Some(path) => Some(std::fs::read_to_string(&path)?),
                None => None,
            };
            let request = AnalyzeRequest {
                client: bank,
                logspace,
                timestamp,
                version,
                top_k,
                uploaded_log_text,
            };
            analyze(&client, &cli.api_url, &request).await?;
        }
        Commands::Status => {
            check_status(&client, &cli.api_url).await?;
        }
        Commands::Locate {
            client: bank,
            logspace,
            version,
            root,
        } => {
            locate(&root, &bank, &logspace, version.as_deref());
        }
    }

    Ok(())
}

async fn analyze(
    client: &reqwest::Client,
    api_url: &str,
    request: &AnalyzeRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "Running RCA...".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    let response = client
        .post(format!("{}/analyze", api_url))
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await?;
        let message = error_message(status.as_u16(), &body);
        println!("{} {}", "Error:".red().bold(), message);
        // non-zero exit so scripts can tell a failed analysis apart
        return Err(message.into());
    }

    let result: AnalyzeResponse = response.json().await?;
    println!(
        "{} {} / {}",
        "Target:".dimmed(),
        result.client.yellow(),
        result.logspace.cyan()
    );

    for analysis in &result.results {
        println!("\n{}", "Answer:".green().bold());
        println!("{}", analysis.answer);

        if analysis.evidence.is_empty() {
            continue;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["#", "Score", "Excerpt"]);

        for (i, e) in analysis.evidence.iter().enumerate() {
            let flat = e.text.replace('\n', " ");
            let excerpt = if flat.chars().count() > 80 {
                format!("{}...", flat.chars().take(77).collect::<String>())
            } else {
                flat
            };
            table.add_row(vec![(i + 1).to_string(), format!("{:.3}", e.score), excerpt]);
        }

        println!("\n{}", "Evidence:".green().bold());
        println!("{table}");
    }

    Ok(())
}

// the server answers with {error, code}; fall back to the raw body
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => format!("{} ({})", err.error, err.code),
        Err(_) => format!("{} {}", status, body.trim()),
    }
}

async fn check_status(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "System Status".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    print!("  API Server ({})... ", api_url);
    io::stdout().flush()?;

    match client.get(format!("{}/health", api_url)).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("{}", "✓ Running".green());
        }
        Ok(resp) => {
            println!("{} ({})", "✗ Error".red(), resp.status());
        }
        Err(e) => {
            println!("{} ({})", "✗ Down".red(), e);
        }
    }

    println!();
    Ok(())
}

fn locate(root: &std::path::Path, client: &str, logspace: &str, version: Option<&str>) {
    println!("\n{} {}", "Searching:".cyan().bold(), root.display());
    println!("{}", "─".repeat(60).dimmed());

    let logs = locate_logs(root, client, logspace, version);
    if logs.is_empty() {
        println!("{}", "No logs found for given filters".yellow());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Kind", "Path", "Size"]);

    for log in &logs {
        let kind = match log.kind {
            LogKind::Error => log.kind.as_str().red().to_string(),
            LogKind::Info => log.kind.as_str().green().to_string(),
        };
        table.add_row(vec![
            kind,
            log.path.display().to_string(),
            format!("{} B", log.content.len()),
        ]);
    }

    println!("{table}");
    println!("\n{} {}", "Found:".dimmed(), logs.len().to_string().green());
}
