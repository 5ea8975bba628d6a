//! Shared command context: resolved configuration, host connection, and the
//! device snapshot source.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use aight_client::{ConfigAssistant, HostConnection, WsConnection};
use aight_core::{DeviceRecord, parse_snapshot};
use anyhow::Context;

use crate::config::Config;

pub struct App {
    pub config: Config,
    /// Offline snapshot file; when set, records come from here instead of
    /// the host.
    pub states_file: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config, states_file: Option<PathBuf>) -> Self {
        Self { config, states_file }
    }

    pub async fn connect(&self) -> anyhow::Result<ConfigAssistant<WsConnection>> {
        let server = &self.config.server;
        let token = server
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .context("no access token: set [server].token in the config, AIGHT_TOKEN, or --token")?;
        let conn = WsConnection::connect(&server.url, token, self.config.reply_timeout())
            .await
            .with_context(|| format!("cannot reach host at {}", server.url))?;
        Ok(ConfigAssistant::new(conn, self.config.reply_timeout()))
    }

    /// Records from the snapshot file, or from the host when no file is set.
    pub async fn load_records(&self) -> anyhow::Result<Vec<DeviceRecord>> {
        match &self.states_file {
            Some(path) => load_snapshot_file(path),
            None => {
                let assistant = self.connect().await?;
                self.records_via(&assistant).await
            }
        }
    }

    /// Like [`App::load_records`] but reuses an open connection.
    pub async fn records_via<C: HostConnection>(
        &self,
        assistant: &ConfigAssistant<C>,
    ) -> anyhow::Result<Vec<DeviceRecord>> {
        match &self.states_file {
            Some(path) => load_snapshot_file(path),
            None => {
                let (records, _skipped) = assistant
                    .fetch_snapshot()
                    .await
                    .context("cannot fetch device states")?;
                Ok(records)
            }
        }
    }
}

pub fn load_snapshot_file(path: &Path) -> anyhow::Result<Vec<DeviceRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read snapshot {}", path.display()))?;
    let (records, skipped) =
        parse_snapshot(&text).with_context(|| format!("invalid snapshot {}", path.display()))?;
    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "skipped malformed snapshot entries");
    }
    tracing::debug!(records = records.len(), "snapshot loaded from file");
    Ok(records)
}

/// ANSI styling only when stdout is a terminal and NO_COLOR is unset.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
