//! `wxnow` - CLI for weathernow

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use weathernow::cli::{Cli, Command, ConfigCommand, LocationArgs, NowCommand, WatchCommand};
use weathernow::{
    init_logging, Config, ConfiguredLocator, ForecastClient, LocationResolver, Result,
    ReverseGeocoder, WeatherView,
};

/// Everything one refresh needs.
#[derive(Debug)]
struct Services {
    resolver: LocationResolver<ConfiguredLocator>,
    geocoder: ReverseGeocoder,
    forecast: ForecastClient,
}

impl Services {
    fn new(config: &Config, args: &LocationArgs) -> Result<Self> {
        let coordinates = match args.coordinates()? {
            Some(coordinates) => Some(coordinates),
            None => config.location.coordinates()?,
        };
        debug!("Configured coordinates: {:?}", coordinates);

        let http = config.services.http_client()?;
        Ok(Self {
            resolver: LocationResolver::new(
                ConfiguredLocator::new(coordinates),
                config.location.position_options(),
            ),
            geocoder: ReverseGeocoder::new(
                http.clone(),
                &config.services.geocoder_url,
                config.services.language.clone(),
            ),
            forecast: ForecastClient::new(http, &config.services.forecast_url),
        })
    }

    async fn refresh(&mut self, view: &mut WeatherView) -> bool {
        view.refresh(&mut self.resolver, &self.geocoder, &self.forecast)
            .await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).map_err(|e| anyhow::anyhow!(e.notice()))?;

    let result = match cli.command {
        Command::Now(cmd) => handle_now(&config, &cmd).await,
        Command::Watch(cmd) => handle_watch(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    };

    if let Err(e) = result {
        debug!("Command failed: {:?}", e);
        anyhow::bail!(e.notice());
    }
    Ok(())
}

async fn handle_now(config: &Config, cmd: &NowCommand) -> Result<()> {
    let mut services = Services::new(config, &cmd.location)?;
    let mut view = WeatherView::new();

    services.refresh(&mut view).await;
    view.check()?;

    match (cmd.json, view.reading()) {
        (true, Some(reading)) => println!("{}", serde_json::to_string_pretty(reading)?),
        _ => println!("{}", view.render()),
    }
    Ok(())
}

async fn handle_watch(config: &Config, cmd: &WatchCommand) -> Result<()> {
    let mut services = Services::new(config, &cmd.location)?;
    let mut view = WeatherView::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("Loading…");
        services.refresh(&mut view).await;
        println!("\n{}\n", view.render());

        print!("[Enter] refresh  [q] quit: ");
        std::io::stdout().flush()?;

        match lines.next_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("q") => break,
            Some(_) => {}
            None => break,
        }
    }

    info!("Watch ended");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let show = |value: Option<f64>| {
                    value.map_or_else(|| "(not set)".to_string(), |v| v.to_string())
                };
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Location]");
                println!("  Latitude:       {}", show(config.location.latitude));
                println!("  Longitude:      {}", show(config.location.longitude));
                println!("  High accuracy:  {}", config.location.high_accuracy);
                println!("  Maximum age:    {}s", config.location.maximum_age_secs);
                println!("  Timeout:        {}s", config.location.timeout_secs);
                println!();
                println!("[Services]");
                println!("  Geocoder:       {}", config.services.geocoder_url);
                println!("  Forecast:       {}", config.services.forecast_url);
                println!("  Language:       {}", config.services.language);
                println!("  User agent:     {}", config.services.user_agent);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
