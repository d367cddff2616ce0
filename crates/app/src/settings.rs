//! Handles settings for the application. Configuration is read from
//! `config/asadito.toml` (optional), then `ASADITO_*` environment variables;
//! command-line flags override both.
use clap::ValueEnum;
use engine::{MoneyCents, ParticipantId, SettlementOptions, SplitPolicy};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/asadito.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Split the total among people who paid something.
    #[default]
    Payers,
    /// Split the total among the configured participant roster.
    Participants,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: String,
    pub split: SplitMode,
    pub participants: Vec<String>,
    pub tolerance_cents: i64,
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            split: SplitMode::Payers,
            participants: Vec::new(),
            tolerance_cents: 0,
            format: OutputFormat::Text,
        }
    }
}

impl Settings {
    /// Engine options derived from the settings.
    pub fn settlement_options(&self) -> SettlementOptions {
        let split = match self.split {
            SplitMode::Payers => SplitPolicy::Payers,
            SplitMode::Participants => SplitPolicy::Participants(
                self.participants
                    .iter()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .map(ParticipantId::from)
                    .collect(),
            ),
        };
        SettlementOptions {
            split,
            tolerance: MoneyCents::new(self.tolerance_cents.max(0)),
        }
    }
}

pub fn load(path: Option<&str>) -> Result<Settings> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(path.is_some()))
        .add_source(
            config::Environment::with_prefix("ASADITO")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("participants"),
        )
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
