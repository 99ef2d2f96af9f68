//! `content-cli`: drive the content API from a terminal.
//!
//! Wires the HTTP and file adapters into the domain services, then delegates
//! to `content_client::inbound::cli` for dispatch so the commands stay
//! testable without spawning a process.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use content_client::domain::{AuthSession, ClientError, ContentClient};
use content_client::inbound::cli::{Cli, CliError, CommandContext, expiry_notice, run_command};
use content_client::outbound::{FileSessionStore, HttpContentApi};
use content_client::{ClientSettings, telemetry};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            write_stderr(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = ClientSettings::load_from_iter([OsString::from("content-cli")])
        .map_err(|error| CliError::Config(error.to_string()))?;
    let settings = cli.apply_overrides(loaded);
    telemetry::init(settings.json_logs);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(async_run(cli, settings))
}

async fn async_run(cli: Cli, settings: ClientSettings) -> Result<(), CliError> {
    let base_url = settings
        .base_url()
        .map_err(|error| CliError::Config(format!("base URL: {error}")))?;
    let api = HttpContentApi::new(base_url, settings.timeout())
        .map_err(|error| CliError::Config(format!("HTTP client: {error}")))?;
    let session_dir = settings.session_dir();
    let store = FileSessionStore::open(&session_dir).map_err(|error| {
        ClientError::storage(format!("open session directory '{session_dir}': {error}"))
    })?;

    let client = ContentClient::new(Arc::new(api), Arc::new(store), Arc::new(DefaultClock))
        .with_login_path(settings.login_path());
    let session = AuthSession::new(client);
    let mut events = session.client().subscribe();
    let context = CommandContext {
        session: &session,
        clock: &DefaultClock,
        read_file: &read_local_file,
    };

    let result = run_command(&context, cli.command).await;
    if let Some(notice) = expiry_notice(&mut events) {
        write_stderr(&notice);
    }
    let rendered = serde_json::to_string_pretty(&result?)?;
    if let Err(err) = writeln!(io::stdout().lock(), "{rendered}") {
        drop(err);
    }
    Ok(())
}

fn read_local_file(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path must name a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    let mut file = directory.open(file_name)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn write_stderr(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}
