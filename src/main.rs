//! # existline Main Entry Point
//!
//! Loads the profile, applies flags and either runs one non-interactive
//! request (benchmark, store, request file) or starts the interactive client.

use anyhow::Result;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{filter::LevelFilter, fmt::time::ChronoLocal, EnvFilter};

use existline::cmd_args::CommandLineArgs;
use existline::config::{self, IniProfileStore, Profile};
use existline::oneshot::{run_one_shot, OneShotFlow};
use existline::{HttpTransport, HttpTransportConfig, ReplController, SessionState};

fn main() -> ExitCode {
    if let Err(e) = init_tracing_subscriber() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let cmd_args = CommandLineArgs::parse();
    match run(&cmd_args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cmd_args: &CommandLineArgs) -> Result<ExitCode> {
    let profile = load_profile(cmd_args.profile())?;

    let host = cmd_args
        .server()
        .map(str::to_string)
        .or_else(config::get_env_host)
        .unwrap_or_else(|| profile.host().to_string());

    let mut session = SessionState::new(host);
    session.set_indent(cmd_args.indent() && profile.indent());
    session.set_result_window(profile.window())?;

    let flow = OneShotFlow::from_args(cmd_args);

    let timeout_secs = cmd_args.timeout().unwrap_or_else(|| profile.timeout_secs());
    let mut transport = HttpTransport::new(HttpTransportConfig {
        timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        user: cmd_args.user().map(str::to_string).or(profile.user.clone()),
        password: cmd_args
            .password()
            .map(str::to_string)
            .or(profile.password.clone()),
        cancel_on_interrupt: flow.is_none(),
    })?;

    if let Some(flow) = flow {
        return Ok(run_one_shot(
            &flow,
            &session,
            &mut transport,
            &mut std::io::stdout().lock(),
            &mut std::io::stderr().lock(),
        ));
    }

    if !cmd_args.quiet() {
        println!("existline {} - eXist repository client", env!("CARGO_PKG_VERSION"));
        println!("Connected to {}. Type 'help' for a list of commands.", session.host());
    }

    let prompt = atty::is(atty::Stream::Stdin);
    let mut controller = ReplController::new(session, transport);
    controller.run(std::io::stdin().lock(), &mut std::io::stdout(), prompt)?;
    Ok(ExitCode::SUCCESS)
}

/// Load profile from INI file or return blank profile if not found
fn load_profile(profile_name: &str) -> Result<Profile> {
    let profile_path = config::get_profile_path();
    tracing::debug!("Loading profile '{}' from '{}'", profile_name, profile_path);

    let store = IniProfileStore::new(&profile_path);
    match store.get_profile(profile_name)? {
        Some(profile) => {
            tracing::debug!("Profile loaded successfully, host: {:?}", profile.host);
            Ok(profile)
        }
        None => {
            tracing::debug!("Profile '{}' not found, using defaults", profile_name);
            Ok(Profile::default())
        }
    }
}

fn init_tracing_subscriber() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(format!(
            "{}_LOG_LEVEL",
            env!("CARGO_PKG_NAME").to_uppercase()
        ))
        .from_env_lossy()
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("tokio=warn".parse()?)
        .add_directive("rustls=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
}
