pub mod config;
pub mod prompt;
pub mod services;

use config::{AppConfig, FeatureStatus, SettingsManager, keys};
use services::snapshot::{SnapshotReport, take_snapshot};

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// How settings are obtained for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Everything comes from `.env` and the environment.
    Unattended,
    /// Ask the user before taking the snapshot.
    Prompt,
}

/// Prompt when explicitly requested, or when required settings are missing
/// and someone is there to answer.
pub fn choose_mode(interactive: bool, status: &FeatureStatus, attended: bool) -> RunMode {
    if interactive || (!status.snapshot_configured && attended) {
        RunMode::Prompt
    } else {
        RunMode::Unattended
    }
}

/// Load `.env`, read the environment and settle every setting.
pub fn init_config() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let mut sm = SettingsManager::from_env();
    let status = sm.check_feature_status();
    // AppConfig cannot load until the prompts have run.
    let interactive = sm.is_enabled(keys::INTERACTIVE);

    match choose_mode(interactive, &status, console::user_attended()) {
        RunMode::Prompt => prompt::run_wizard(&mut sm)?,
        RunMode::Unattended if !status.snapshot_configured => {
            anyhow::bail!(
                "missing settings: {}",
                status.missing_settings.join(", ")
            );
        }
        RunMode::Unattended => {}
    }

    for warning in sm.check_feature_status().warnings {
        tracing::warn!("{warning}");
    }

    let config = AppConfig::load(&sm)?;
    tracing::info!(
        world = %config.world,
        map = %config.map,
        output_dir = %config.output_dir.display(),
        "Settings loaded"
    );
    Ok(config)
}

/// Configure, then take one snapshot.
pub fn run() -> Result<SnapshotReport, anyhow::Error> {
    let config = init_config()?;
    let report = take_snapshot(&config, None)?;
    tracing::info!(
        path = %report.path.display(),
        width = report.width,
        height = report.height,
        tiles = report.tile_count,
        "Snapshot saved"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(configured: bool) -> FeatureStatus {
        FeatureStatus {
            snapshot_configured: configured,
            ..FeatureStatus::default()
        }
    }

    #[test]
    fn test_configured_runs_unattended() {
        assert_eq!(choose_mode(false, &status(true), true), RunMode::Unattended);
    }

    #[test]
    fn test_interactive_flag_forces_prompt() {
        assert_eq!(choose_mode(true, &status(true), false), RunMode::Prompt);
    }

    #[test]
    fn test_missing_settings_prompt_only_when_attended() {
        assert_eq!(choose_mode(false, &status(false), true), RunMode::Prompt);
        assert_eq!(choose_mode(false, &status(false), false), RunMode::Unattended);
    }
}
