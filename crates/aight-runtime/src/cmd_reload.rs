//! `aight reload` and `aight reload-automations`.

use anyhow::Context;

use crate::app::App;

pub async fn cmd_reload(app: &App) -> anyhow::Result<()> {
    let assistant = app.connect().await?;
    let message = assistant
        .reload_integration()
        .await
        .context("integration reload failed")?;
    println!("{message}");
    let (records, _skipped) = assistant
        .fetch_snapshot()
        .await
        .context("cannot refresh device states after reload")?;
    println!("{} entities available", records.len());
    Ok(())
}

pub async fn cmd_reload_automations(app: &App) -> anyhow::Result<()> {
    let assistant = app.connect().await?;
    assistant
        .reload_automations()
        .await
        .context("automation reload failed")?;
    println!("Automations reloaded.");
    Ok(())
}
