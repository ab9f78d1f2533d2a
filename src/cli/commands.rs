use crate::architectures::{self, ArchitectureInfo, ArchitectureStatus};
use crate::config::Config;
use crate::error::{PromptitectureError, Result};
use crate::PackageInfo;
use colored::Colorize;
use serde::Deserialize;
use std::io::Write;
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(default)]
    pub uptime_seconds: i64,
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

pub fn serve(config: Config) -> anyhow::Result<()> {
    runtime()?.block_on(crate::api::serve(config))?;
    Ok(())
}

pub fn info(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let package = PackageInfo::current();

    writeln!(out)?;
    writeln!(out, "{} {}", package.name.bold().underline(), package.version.bold())?;
    writeln!(out, "{}", package.description)?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Author:".dimmed(), package.author)?;
    writeln!(out, "  {} {}", "License:".dimmed(), package.license)?;
    writeln!(out, "  {} {}", "Repository:".dimmed(), package.repository)?;
    writeln!(out, "  {} {}", "Issues:".dimmed(), package.bug_tracker)?;
    writeln!(out)?;

    writeln!(out, "{}", "Providers".cyan().bold())?;
    for provider in config.providers.status() {
        let state = if provider.configured {
            "✓ set".green().to_string()
        } else {
            "✗ not set".red().to_string()
        };
        writeln!(
            out,
            "  {} {} ({})",
            format!("{}:", provider.provider).dimmed(),
            provider.api_key_env,
            state
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "Server".cyan().bold())?;
    writeln!(out, "  {} {}", "Address:".dimmed(), config.base_url())?;
    writeln!(out)?;

    let entries = architectures::catalog();
    let available = entries
        .iter()
        .filter(|e| e.status == ArchitectureStatus::Available)
        .count();
    writeln!(
        out,
        "{} {} registered, {} available",
        "Architectures:".cyan().bold(),
        entries.len(),
        available
    )?;

    Ok(())
}

fn status_label(status: ArchitectureStatus) -> String {
    match status {
        ArchitectureStatus::Available => status.to_string().green().to_string(),
        ArchitectureStatus::Planned => status.to_string().yellow().to_string(),
    }
}

fn write_entry(info: &ArchitectureInfo, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "  {:<12} {:<12} {}",
        info.id.bold(),
        info.name,
        status_label(info.status)
    )
}

pub fn list_architectures(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", "Architectures".bold().underline())?;
    for info in architectures::catalog() {
        write_entry(&info, out)?;
    }
    Ok(())
}

pub fn show_architecture(name: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let info = architectures::lookup(name)?;
    writeln!(out, "{}", info.name.bold())?;
    writeln!(out, "  {} {}", "Id:".dimmed(), info.id)?;
    writeln!(out, "  {} {}", "Status:".dimmed(), status_label(info.status))?;
    Ok(())
}

pub fn show_config(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    write!(out, "{}", config.to_toml()?)?;
    Ok(())
}

/// Fetch and decode `<base_url>/health`
pub async fn fetch_health(base_url: &str) -> Result<HealthReport> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    log::debug!("GET {}", url);

    let client = reqwest::Client::builder()
        .timeout(PING_TIMEOUT)
        .build()
        .map_err(|e| PromptitectureError::Http(format!("Failed to build HTTP client: {}", e)))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| PromptitectureError::Http(format!("Request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PromptitectureError::Http(format!("{} returned {}", url, status)));
    }

    response
        .json::<HealthReport>()
        .await
        .map_err(|e| PromptitectureError::Http(format!("Invalid health response from {}: {}", url, e)))
}

pub fn ping(base_url: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let report = runtime()?.block_on(fetch_health(base_url))?;
    writeln!(
        out,
        "{} {} {} v{} (up {}s)",
        "✓".green(),
        base_url,
        report.service,
        report.version,
        report.uptime_seconds
    )?;
    if report.status != "ok" {
        log::warn!("Server reported status {:?}", report.status);
    }
    Ok(())
}
