//! Handles settings for the application. Configuration is written in
//! `scorta.toml`.
//!
//! Every key can be omitted: the CLI falls back to a local database file and
//! `info` level logging.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Option<Database>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("scorta").required(false))
            .set_default("app.level", "info")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn database_url(&self) -> Option<String> {
        self.database.as_ref().map(|database| match database {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        })
    }
}
