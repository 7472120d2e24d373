use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{Config, Credentials, Dashboard, OpenWeatherProvider, S3Store};
use inquire::{Password, PasswordDisplayMode, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-dashboard",
    version,
    about = "Fetch current weather for a few cities and archive it to S3"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch weather for every city and archive it (default).
    Run,

    /// Store the OpenWeather API key and bucket name in the config file.
    Configure,

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => run_dashboard().await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn run_dashboard() -> anyhow::Result<()> {
    let creds = Credentials::from_env()?;
    tracing::debug!(?creds, "Loaded credentials");

    let provider = OpenWeatherProvider::new(creds.api_key.clone());
    let store = S3Store::from_env().await;
    let dashboard = Dashboard::new(&provider, &store, &creds.bucket_name);

    let mut stdout = std::io::stdout().lock();
    let report = dashboard
        .run(&mut stdout)
        .await
        .context("Weather dashboard run aborted")?;

    report.log_summary();
    println!(
        "\nStored {} of {} cities",
        report.stored_count(),
        report.cities.len()
    );
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let mut key_prompt = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation();
    if cfg.api_key.is_some() {
        key_prompt = key_prompt.with_help_message("Leave blank to keep the stored key");
    }
    let api_key = key_prompt.prompt().context("Failed to read API key")?;

    let mut bucket_prompt = Text::new("S3 bucket name:");
    if let Some(existing) = cfg.bucket_name.as_deref() {
        bucket_prompt = bucket_prompt.with_default(existing);
    }
    let bucket_name = bucket_prompt
        .prompt()
        .context("Failed to read bucket name")?;

    apply_answers(&mut cfg, &api_key, &bucket_name);

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Blank answers keep whatever the config already holds.
fn apply_answers(cfg: &mut Config, api_key: &str, bucket_name: &str) {
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        cfg.api_key = Some(api_key.to_string());
    }

    let bucket_name = bucket_name.trim();
    if !bucket_name.is_empty() {
        cfg.bucket_name = Some(bucket_name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["weather-dashboard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["weather-dashboard", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));

        let cli = Cli::try_parse_from(["weather-dashboard", "config-path"]).unwrap();
        assert!(matches!(cli.command, Some(Command::ConfigPath)));
    }

    #[test]
    fn blank_answers_keep_stored_values() {
        let mut cfg = Config {
            api_key: Some("STORED".into()),
            bucket_name: Some("archive".into()),
        };

        apply_answers(&mut cfg, "   ", "");
        assert_eq!(cfg.api_key.as_deref(), Some("STORED"));
        assert_eq!(cfg.bucket_name.as_deref(), Some("archive"));

        apply_answers(&mut cfg, " NEW ", "other-bucket");
        assert_eq!(cfg.api_key.as_deref(), Some("NEW"));
        assert_eq!(cfg.bucket_name.as_deref(), Some("other-bucket"));
    }
}
