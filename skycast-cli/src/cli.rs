use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use skycast_core::{
    AppState, Config, Controller, IconFetcher, LookupEvent, PlaceQuery, SubmitOutcome,
    WeatherService, WeatherSnapshot, render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Look up current weather and a 5-day forecast"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show weather for a place.
    Show {
        /// City or place name.
        place: String,

        /// Print the raw snapshot as JSON instead of the text layout.
        #[arg(long)]
        json: bool,

        /// Save the weather icons as PNG files into this directory.
        #[arg(long, value_name = "DIR")]
        icons_dir: Option<PathBuf>,
    },

    /// Prompt for places repeatedly, keeping the last good result on screen.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                place,
                json,
                icons_dir,
            } => show(&place, json, icons_dir.as_deref()).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(place: &str, json: bool, icons_dir: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;

    let query = PlaceQuery::parse(place)?;
    let snapshot = service.lookup(&query).await?;

    if let Some(dir) = icons_dir {
        let icons = IconFetcher::new(&config.openweather.icon_base_url);
        save_icons(&icons, &snapshot, dir).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        let state = AppState {
            snapshot: Some(snapshot),
            ..AppState::default()
        };
        print!("{}", render(&state, Utc::now()));
    }
    Ok(())
}

async fn save_icons(
    icons: &IconFetcher,
    snapshot: &WeatherSnapshot,
    dir: &Path,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create icon directory: {}", dir.display()))?;

    let mut wanted = vec![("current".to_string(), snapshot.current.icon.clone())];
    wanted.extend(
        snapshot
            .forecast
            .iter()
            .map(|d| (d.date.format("%Y-%m-%d").to_string(), d.icon.clone())),
    );

    for (name, code) in wanted {
        // A missing icon only costs a picture.
        match icons.fetch(&code).await {
            Ok(bytes) => {
                let path = dir.join(format!("{name}.png"));
                std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write icon: {}", path.display()))?;
            }
            Err(err) => tracing::warn!(%code, error = %err, "could not fetch icon"),
        }
    }
    Ok(())
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut controller = Controller::new(WeatherService::from_config(&config)?);

    print!("{}", render(controller.state(), Utc::now()));

    loop {
        let prompt = Text::new("City:").with_help_message("Esc to quit");
        let input = match prompt.prompt() {
            Ok(text) => text,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match controller.submit(&input) {
            SubmitOutcome::Started => {
                println!("Searching...");
                if let Some(LookupEvent::Failed(notice)) = controller.settle().await {
                    tracing::debug!(title = %notice.title, "lookup failed");
                }
            }
            SubmitOutcome::Busy => continue,
            SubmitOutcome::Rejected => {}
        }

        println!();
        print!("{}", render(controller.state(), Utc::now()));
    }

    Ok(())
}
