//! `aight states`: dump the device snapshot as JSON.

use anyhow::Context;

use crate::app::App;
use crate::cli::StatesOpts;

pub async fn cmd_states(app: &App, opts: StatesOpts) -> anyhow::Result<()> {
    let records = app.load_records().await?;
    let json = serde_json::to_string_pretty(&records)?;
    match &opts.out {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => println!("{json}"),
    }
    eprintln!("{} entities", records.len());
    Ok(())
}
