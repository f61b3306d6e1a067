use contacts_rs::{Effect, cli, config, telemetry};

fn main() {
    let cli = cli::parse_from(std::env::args_os());
    let config = load_config();

    let telemetry_cfg = telemetry::TelemetryConfig::new(cli.verbose, config.logging.clone());
    let _telemetry_guard = telemetry::init(telemetry_cfg);

    if let Err(e) = cli::run(cli, config) {
        tracing::error!("error: {}", e);
        if e.effect() == Effect::Unknown {
            tracing::error!("a document may have been partially written; check the .bak snapshot");
        }
        std::process::exit(1);
    }
}

/// Runs before telemetry exists, so a bad config file is reported directly.
fn load_config() -> config::Config {
    match config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("config load failed, using defaults: {err}");
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    }
}
