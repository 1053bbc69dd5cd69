//! Main entry point for the switchdl CLI

use anyhow::{bail, Context};
use clap::Parser;
use std::sync::Arc;
use switchdl::cli::{Args, Command, ConfigureAction, FileConfig, OutputFormatter, Settings};
use switchdl::core::{DownloadConfig, DownloadSummary, Downloader};
use switchdl::platform::{
    resolve_token, AccessToken, ApiClient, CredentialStore, HttpClientConfig, KeyringStore,
    TokenStatus,
};
use switchdl::resolve::{Prompter, TerminalPrompter};
use switchdl::utils::create_output_dir;
use switchdl::SwitchdlError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.global.verbose);
    debug!("Running command {:?}", args.command);

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<SwitchdlError>()
            .map(SwitchdlError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let formatter = Arc::new(OutputFormatter::new(args.verbosity_level()));

    if args.command == Command::Version {
        formatter.print_version();
        return Ok(());
    }

    let file = FileConfig::load()?;
    let settings = Settings::resolve(&args.global, &file)?;
    let store = KeyringStore::new();
    let cancel = cancel_on_ctrl_c();
    let mut prompter = TerminalPrompter::new().with_cancellation(cancel.clone());

    match args.command {
        Command::Video { ids, filename } => {
            let mut config = base_config(&settings, &store)?.with_video_ids(ids);
            config.filename = filename;
            config.validate()?;
            prepare_output_dir(&config)?;

            let downloader = build_downloader(&settings, &config.access_token, cancel, &formatter)?;
            if config.video_ids.len() == 1 {
                downloader
                    .download_video(&config, &mut prompter)
                    .await
                    .context("error downloading video")?;
            } else {
                let summary = downloader.download_videos(&config, &mut prompter).await;
                batch_status(&summary)?;
                if summary.all_failed() {
                    bail!("all {} video downloads failed", summary.total);
                }
            }
        }
        Command::Channel { ids, all } => {
            let config = base_config(&settings, &store)?.with_select_all(all);
            config.validate()?;
            prepare_output_dir(&config)?;

            let downloader = build_downloader(&settings, &config.access_token, cancel, &formatter)?;
            for channel_id in &ids {
                let channel_config = config.clone().with_channel_id(channel_id.as_str());
                let summary = downloader
                    .download_channel(&channel_config, channel_id, &mut prompter)
                    .await
                    .with_context(|| format!("error downloading channel {}", channel_id))?;

                if let Some(summary) = &summary {
                    batch_status(summary)?;
                }
                if summary.is_some_and(|s| s.all_failed()) {
                    bail!("no video of channel {} could be downloaded", channel_id);
                }
            }
        }
        Command::Configure { action } => {
            configure(action, &settings, &store, &mut prompter, cancel, &formatter).await?;
        }
        // printed before any configuration is loaded
        Command::Version => {}
    }

    Ok(())
}

/// An interrupted batch exits as cancelled even when some videos succeeded
fn batch_status(summary: &DownloadSummary) -> Result<(), SwitchdlError> {
    if summary.was_cancelled() {
        return Err(SwitchdlError::Cancelled);
    }
    Ok(())
}

fn base_config(settings: &Settings, store: &dyn CredentialStore) -> anyhow::Result<DownloadConfig> {
    let token = resolve_token(settings.explicit_token(), store)?;
    Ok(DownloadConfig::new(token, settings.output_dir.clone())
        .with_overwrite(settings.overwrite)
        .with_skip(settings.skip)
        .with_select_variant(settings.select_variant))
}

fn prepare_output_dir(config: &DownloadConfig) -> anyhow::Result<()> {
    create_output_dir(&config.output_dir).map_err(SwitchdlError::from).with_context(|| {
        format!(
            "error creating output directory {}",
            config.output_dir.display()
        )
    })
}

fn build_downloader(
    settings: &Settings,
    token: &AccessToken,
    cancel: CancellationToken,
    formatter: &Arc<OutputFormatter>,
) -> anyhow::Result<Downloader> {
    let client = api_client(settings, token, cancel)?;
    Ok(Downloader::new(client, Arc::clone(formatter))
        .with_progress(formatter.show_progress(settings.no_progress)))
}

fn api_client(
    settings: &Settings,
    token: &AccessToken,
    cancel: CancellationToken,
) -> anyhow::Result<ApiClient> {
    let config = HttpClientConfig {
        timeout: settings.timeout,
        ..Default::default()
    };
    Ok(ApiClient::with_config(token.clone(), config)?.with_cancellation(cancel))
}

async fn configure(
    action: Option<ConfigureAction>,
    settings: &Settings,
    store: &dyn CredentialStore,
    prompter: &mut dyn Prompter,
    cancel: CancellationToken,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    match action {
        None => {
            let token = if prompter.is_interactive() {
                rpassword::prompt_password("Enter your SwitchTube access token: ")
                    .map_err(|e| SwitchdlError::Input(e.to_string()))?
            } else {
                prompter.ask("Enter your SwitchTube access token: ")?
            };
            store.set(&token).context("failed to save token to keyring")?;
            formatter.success("Access token successfully saved.");
        }
        Some(ConfigureAction::Show) => {
            if store.get()?.is_some() {
                formatter.info("An access token is currently stored.");
            } else {
                formatter.info("No access token is currently stored.");
            }
        }
        Some(ConfigureAction::Validate) => {
            let token = resolve_token(settings.explicit_token(), store)?;
            let client = api_client(settings, &token, cancel)?;
            match client.validate_token().await? {
                TokenStatus::Valid => formatter.success("Access token is valid."),
                TokenStatus::Invalid(status) => {
                    warn!("Token rejected by the API with HTTP {}", status);
                    formatter.warning(&format!(
                        "Access token is invalid or expired (HTTP {}). Please run 'switchdl configure' to update it.",
                        status
                    ));
                }
            }
        }
        Some(ConfigureAction::Delete) => {
            if store.get()?.is_none() {
                formatter.info("No access token was found to delete.");
                return Ok(());
            }
            store.delete().context("failed to delete token")?;
            formatter.success("Access token successfully deleted.");
        }
    }
    Ok(())
}

/// Cancel requests, copies and prompts on Ctrl-C; a second Ctrl-C exits at once
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        info!("Interrupt received, cancelling");
        trigger.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted");
            std::process::exit(SwitchdlError::Cancelled.exit_code());
        }
    });
    cancel
}

/// Initialize logging system
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(verbose)
                .with_line_number(verbose)
                .compact(),
        )
        .init();
}
