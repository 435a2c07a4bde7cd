// LogSpace seeder - builds a synthetic LogSpace tree for local testing
// Layout: <root>/<region>/<client>/<app>/<major>/<version>/logs.{error,info}

use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use rand::prelude::*;
use std::fs;
use std::path::PathBuf;

// region -> clients
const STRUCTURE: [(&str, &[&str]); 3] = [
    ("EMEA", &["Barclays"]),
    ("Asia", &["SBI"]),
    ("America", &["BankOfAmerica"]),
];

const APPS: [&str; 3] = ["Unigy", "Pulse", "Touch"];

// major -> versions
const VERSIONS: [(&str, &[&str]); 2] = [("4.0", &["4.0.1"]), ("3.0", &["3.0.1"])];

const ERROR_CODES: [&str; 8] = [
    "E_INTERNAL_FAILURE",
    "E_NETWORK_DOWN",
    "E_TIMEOUT",
    "E_DB_FAIL",
    "E_API_UNAVAILABLE",
    "E_CONFIG_MISMATCH",
    "E_AUTH_FAILED",
    "E_FILE_NOT_FOUND",
];

const COMPONENTS: [&str; 6] = ["DataSync", "AuthService", "DBHandler", "LogIngestor", "Monitor", "APIClient"];

const INFO_PATTERNS: [&str; 7] = [
    "System running stable",
    "All components responsive",
    "Heartbeat received",
    "Background tasks running normally",
    "Scheduled job executed",
    "Configuration verified",
    "Startup sequence completed",
];

#[derive(Parser)]
#[command(name = "logspace-seed")]
#[command(about = "Generate a synthetic LogSpace tree for testing")]
struct Args {
    /// Root directory to create the tree under
    #[arg(short, long, env = "LOGSPACE_ROOT", default_value = "LogSpace")]
    root: PathBuf,

    /// Lines per logs.error file
    #[arg(short, long, default_value = "8")]
    error_lines: usize,

    /// Lines per logs.info file
    #[arg(short, long, default_value = "6")]
    info_lines: usize,
}

fn app_error_patterns(app: &str) -> &'static [&'static str] {
    match app {
        "Unigy" => &[
            "Unigy trading endpoint failure",
            "Voice channel initialization error",
            "Unigy session manager crash",
        ],
        "Pulse" => &[
            "Pulse dashboard rendering stalled",
            "Pulse analytics computation timeout",
            "Pulse client connection dropped",
        ],
        "Touch" => &[
            "Touch UI communication error",
            "Touch gesture engine reported invalid state",
            "Touch service idle timeout",
        ],
        _ => &["Unknown failure"],
    }
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn error_log(app: &str, count: usize, rng: &mut impl Rng) -> String {
    (0..count)
        .map(|_| {
            format!(
                "{} - ERROR - Component={} - Code: {} - {}",
                timestamp(),
                pick(rng, &COMPONENTS),
                pick(rng, &ERROR_CODES),
                pick(rng, app_error_patterns(app))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn info_log(app: &str, count: usize, rng: &mut impl Rng) -> String {
    (0..count)
        .map(|_| format!("{} - INFO - Application={} - {}", timestamp(), app, pick(rng, &INFO_PATTERNS)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut rng = rand::rng();
    let mut created = 0;

    println!("\n{} {}", "Seeding LogSpace at".cyan().bold(), args.root.display());

    for (region, clients) in STRUCTURE {
        for client in clients {
            for app in APPS {
                for (major, versions) in VERSIONS {
                    for version in versions {
                        let folder = args.root.join(region).join(client).join(app).join(major).join(version);
                        fs::create_dir_all(&folder)?;

                        fs::write(folder.join("logs.error"), error_log(app, args.error_lines, &mut rng))?;
                        fs::write(folder.join("logs.info"), info_log(app, args.info_lines, &mut rng))?;

                        println!("  {} {}", "Created:".dimmed(), folder.display());
                        created += 1;
                    }
                }
            }
        }
    }

    println!("\n{} {} folders", "✓ Done:".green().bold(), created.to_string().yellow());
    Ok(())
}
