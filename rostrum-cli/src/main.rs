//! rostrum-cli — terminal frontend for the Rostrum catalog analytics API
//!
//! Talks to a running `rostrum-server` over HTTP and renders the analytics
//! snapshot and talk listings for the terminal.
//!
//! # Subcommands
//! - `stats [--json]`                       — headline analytics numbers
//! - `talks [filters] [-n <limit>] [--json]` — filtered talk listing
//! - `show <id> [--json]`                   — one talk by sessionID or code
//! - `status`                               — server health summary
//! - `refresh`                              — trigger a catalog re-fetch

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;

use rostrum_core::text::clean_markup;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8770";
const DEFAULT_LIMIT: usize = 20;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "rostrum-cli",
    version,
    about = "Rostrum catalog analytics — HTTP API frontend"
)]
struct Cli {
    /// Rostrum HTTP server URL (overrides ROSTRUM_HTTP_URL env var)
    #[arg(long, env = "ROSTRUM_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show headline analytics for the loaded snapshot
    Stats {
        /// Output the raw analytics document as JSON
        #[arg(long)]
        json: bool,
    },

    /// List talks, optionally filtered
    Talks {
        /// Substring match over title and abstract
        #[arg(long)]
        search: Option<String>,

        /// Exact session type, e.g. "Breakout"
        #[arg(long = "type")]
        session_type: Option<String>,

        /// Calendar date a talk must be scheduled on
        #[arg(long)]
        date: Option<String>,

        /// Substring match over speaker names
        #[arg(long)]
        speaker: Option<String>,

        /// Maximum number of talks to list
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Output the raw talk list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one talk by sessionID or code
    Show {
        /// Session identifier or talk code
        id: String,

        /// Output the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show Rostrum server status
    Status,

    /// Re-fetch the catalog and reload the snapshot
    Refresh,
}

// ============================================================================
// Rendering (pure — unit tested below)
// ============================================================================

/// One listing line per talk: code, type, title and first scheduled slot.
fn talk_line(talk: &Value) -> String {
    let code = talk["code"].as_str().unwrap_or("----");
    let talk_type = talk["type"].as_str().unwrap_or("Unknown");
    let title = talk["title"].as_str().unwrap_or("Untitled");

    let slot = talk["times"].get(0).map(|slot| {
        format!(
            " ({} {})",
            slot["date"].as_str().unwrap_or("?"),
            slot["startTimeFormatted"]
                .as_str()
                .or_else(|| slot["startTime"].as_str())
                .unwrap_or("?")
        )
    });

    format!(
        "{:<8} [{}] {}{}",
        code,
        talk_type,
        title,
        slot.unwrap_or_default()
    )
}

/// Multi-line headline summary of the full analytics document.
fn stats_summary(report: &Value) -> String {
    let basic = &report["basicStats"];
    let mut out = String::new();

    out.push_str(&format!(
        "Talks: {}  (avg length {} min)\n",
        basic["totalTalks"], basic["avgTalkLength"]
    ));
    out.push_str(&format!(
        "Speakers: {}  (avg {} talks each)\n",
        report["speakers"]["speakers"]
            .as_array()
            .map(Vec::len)
            .unwrap_or(0),
        report["speakers"]["avgTalksPerSpeaker"]
    ));
    out.push_str(&format!(
        "Schedule: {} time slots, up to {} parallel sessions (avg {})\n",
        report["schedule"]["totalTimeSlots"],
        report["schedule"]["maxParallelSessions"],
        report["schedule"]["avgParallelSessions"]
    ));
    out.push_str(&format!(
        "Rooms: {} (total capacity {})\n",
        report["rooms"]["rooms"].as_array().map(Vec::len).unwrap_or(0),
        report["rooms"]["totalCapacity"]
    ));

    if let Some(words) = report["topics"]["topWords"].as_array() {
        let top: Vec<&str> = words
            .iter()
            .take(5)
            .filter_map(|w| w["word"].as_str())
            .collect();
        if !top.is_empty() {
            out.push_str(&format!("Top words: {}\n", top.join(", ")));
        }
    }

    out.push_str(&format!("Last updated: {}", report["lastUpdated"]));
    out
}

/// Full-detail rendering of a single talk record.
fn talk_details(talk: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        talk["title"].as_str().unwrap_or("Untitled")
    ));
    out.push_str(&format!(
        "Code: {}  Type: {}  Language: {}\n",
        talk["code"].as_str().unwrap_or("-"),
        talk["type"].as_str().unwrap_or("Unknown"),
        talk["language"].as_str().unwrap_or("Unknown"),
    ));

    if let Some(times) = talk["times"].as_array() {
        for slot in times {
            out.push_str(&format!(
                "When: {} {}  Where: {}\n",
                slot["date"].as_str().unwrap_or("?"),
                slot["startTimeFormatted"]
                    .as_str()
                    .or_else(|| slot["startTime"].as_str())
                    .unwrap_or("?"),
                slot["room"].as_str().unwrap_or("Virtual/TBD"),
            ));
        }
    }

    if let Some(participants) = talk["participants"].as_array() {
        for p in participants {
            let name = p["fullName"]
                .as_str()
                .or_else(|| p["globalFullName"].as_str())
                .unwrap_or("Unknown");
            let company = p["companyName"]
                .as_str()
                .or_else(|| p["globalCompany"].as_str())
                .unwrap_or("Unknown");
            out.push_str(&format!("Speaker: {} ({})\n", name, company));
        }
    }

    let abstract_text = clean_markup(talk["abstract"].as_str());
    if !abstract_text.is_empty() {
        out.push_str(&format!("\n{}\n", abstract_text));
    }
    out
}

// ============================================================================
// HTTP plumbing
// ============================================================================

fn get_json(client: &reqwest::blocking::Client, url: &str) -> anyhow::Result<Value> {
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to reach {}", url))?;
    let status = resp.status();
    let body: Value = resp.json().context("Server returned invalid JSON")?;
    if !status.is_success() {
        bail!(
            "Server error ({}): {}",
            status,
            body["error"].as_str().unwrap_or("unknown error")
        );
    }
    Ok(body)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::blocking::Client::new();

    match cli.command {
        Commands::Stats { json } => {
            let report = get_json(&client, &format!("{}/api/stats", cli.server))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", stats_summary(&report));
            }
        }

        Commands::Talks {
            search,
            session_type,
            date,
            speaker,
            limit,
            json,
        } => {
            let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
            if let Some(v) = search {
                params.push(("search", v));
            }
            if let Some(v) = session_type {
                params.push(("type", v));
            }
            if let Some(v) = date {
                params.push(("date", v));
            }
            if let Some(v) = speaker {
                params.push(("speaker", v));
            }
            let url = reqwest::Url::parse_with_params(
                &format!("{}/api/talks", cli.server),
                &params,
            )
            .context("Invalid server URL")?;

            let body = get_json(&client, url.as_str())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&body["talks"])?);
            } else {
                let talks = body["talks"].as_array().cloned().unwrap_or_default();
                for talk in &talks {
                    println!("{}", talk_line(talk));
                }
                println!("-- {} of {} talks", talks.len(), body["total"]);
            }
        }

        Commands::Show { id, json } => {
            let talk = get_json(&client, &format!("{}/api/talks/{}", cli.server, id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&talk)?);
            } else {
                print!("{}", talk_details(&talk));
            }
        }

        Commands::Status => {
            let health = get_json(&client, &format!("{}/health", cli.server))?;
            println!(
                "Server: {} ({})  Talks: {}  Snapshot: {}",
                health["status"].as_str().unwrap_or("unknown"),
                health["version"].as_str().unwrap_or("?"),
                health["talks"],
                health["snapshot"].as_str().unwrap_or("?"),
            );
        }

        Commands::Refresh => {
            let resp = client
                .post(format!("{}/api/refresh", cli.server))
                .send()
                .context("Failed to reach server")?;
            let status = resp.status();
            let body: Value = resp.json().context("Server returned invalid JSON")?;
            if !status.is_success() {
                bail!(
                    "Refresh failed ({}): {}",
                    status,
                    body["error"].as_str().unwrap_or("unknown error")
                );
            }
            println!("Refreshed: {} talks", body["talks"]);
        }
    }

    Ok(())
}

// ============================================================================
// Unit Tests — rendering functions are pure
// ============================================================================
