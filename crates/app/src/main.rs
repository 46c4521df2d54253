use std::sync::Arc;

use backend::Backend;
use backend::demo::{DEMO_COURSE_ID, demo_backend};
use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use learn_core::model::CourseId;
use services::{AppServices, ClientConfig, Clock, ConfigError};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

/// Desktop course player for the learning platform.
///
/// Flags override the `LEARN_*` environment variables (also read from `.env`).
#[derive(Parser, Debug)]
#[command(name = "learn")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the learning API
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Open this course's player instead of the course list
    #[arg(long, value_name = "ID")]
    course_id: Option<u64>,

    /// Seconds between video progress saves
    #[arg(long, value_name = "SECS")]
    save_interval_secs: Option<u64>,

    /// Minimum change in percentage points before progress is saved again
    #[arg(long, value_name = "POINTS")]
    save_threshold: Option<f64>,

    /// Run against built-in sample data instead of the API
    #[arg(long)]
    demo: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layer the flags over `config`, validating them like their environment variables.
    fn apply(&self, mut config: ClientConfig) -> Result<ClientConfig, ConfigError> {
        if let Some(url) = &self.api_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(token) = &self.token {
            config.api_token = Some(token.clone());
        }
        if let Some(course_id) = self.course_id {
            config.course_id = Some(CourseId::new(course_id));
        }
        if let Some(secs) = self.save_interval_secs {
            config = config.with_save_interval_secs("--save-interval-secs", secs)?;
        }
        if let Some(threshold) = self.save_threshold {
            config = config.with_save_threshold("--save-threshold", threshold)?;
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = args.apply(ClientConfig::from_env()?)?;
    let clock = Clock::default_clock();

    let services = if args.demo {
        config.course_id.get_or_insert(DEMO_COURSE_ID);
        info!("running against demo data");
        AppServices::new(&Backend::from_adapter(demo_backend()?), &config, clock)
    } else {
        info!(base_url = %config.api_base_url, "connecting to learning API");
        AppServices::http(&config, clock)?
    };

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learn")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
