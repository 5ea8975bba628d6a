//! `aight validate`, `aight preview` and `aight deploy` on a YAML file.

use std::io::Read;
use std::path::Path;

use aight_client::{DeployOutcome, PreviewReport, ValidationReport};
use anyhow::Context;

use crate::app::App;
use crate::cli::FileOpts;

/// Read the configuration text; `-` reads stdin.
pub fn read_config(path: &Path) -> anyhow::Result<String> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read configuration from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?
    };
    if text.trim().is_empty() {
        anyhow::bail!("configuration is empty");
    }
    Ok(text)
}

pub async fn cmd_validate(app: &App, opts: FileOpts) -> anyhow::Result<()> {
    let config = read_config(&opts.file)?;
    let assistant = app.connect().await?;
    let report = assistant
        .validate(&config, opts.config_type)
        .await
        .context("validation failed")?;
    print!("{}", validation_text(&report));
    if !report.valid {
        anyhow::bail!("configuration is invalid");
    }
    Ok(())
}

pub async fn cmd_preview(app: &App, opts: FileOpts) -> anyhow::Result<()> {
    let config = read_config(&opts.file)?;
    let assistant = app.connect().await?;
    let report = assistant
        .preview(&config, opts.config_type)
        .await
        .context("preview failed")?;
    print!("{}", preview_text(&report));
    Ok(())
}

pub async fn cmd_deploy(app: &App, opts: FileOpts) -> anyhow::Result<()> {
    let config = read_config(&opts.file)?;
    let assistant = app.connect().await?;
    match assistant
        .deploy(&config, opts.config_type)
        .await
        .context("deploy failed")?
    {
        DeployOutcome::Deployed => println!("Deployed {}.", opts.config_type.noun_phrase()),
        DeployOutcome::Manual(steps) => {
            println!("The host did not deploy the configuration. Install it by hand:");
            println!("{steps}");
        }
    }
    Ok(())
}

fn validation_text(report: &ValidationReport) -> String {
    let mut out = String::from(if report.valid {
        "Configuration is valid.\n"
    } else {
        "Configuration is invalid.\n"
    });
    for error in &report.errors {
        out.push_str(&format!("error: {error}\n"));
    }
    for warning in &report.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out
}

fn preview_text(report: &PreviewReport) -> String {
    let mut out = String::new();
    if !report.entities_referenced.is_empty() {
        out.push_str(&format!("entities: {}\n", report.entities_referenced.join(", ")));
    }
    for error in &report.errors {
        out.push_str(&format!("error: {error}\n"));
    }
    for warning in &report.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    if !report.preview_html.is_empty() {
        out.push_str(&report.preview_html);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_report_lists_errors_before_warnings() {
        let report = ValidationReport {
            valid: false,
            errors: vec!["missing trigger".into()],
            warnings: vec!["no alias".into()],
        };
        assert_eq!(
            validation_text(&report),
            "Configuration is invalid.\nerror: missing trigger\nwarning: no alias\n"
        );
    }

    #[test]
    fn preview_lists_entities() {
        let report = PreviewReport {
            preview_html: String::new(),
            entities_referenced: vec!["light.a".into(), "light.b".into()],
            warnings: vec![],
            errors: vec![],
        };
        assert_eq!(preview_text(&report), "entities: light.a, light.b\n");
    }

    #[test]
    fn blank_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "  \n").unwrap();
        let err = read_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
