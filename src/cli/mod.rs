//! Command-line interface for the adapter

use crate::Result;
use crate::config::Config;
use clap::{Arg, ArgMatches, Command};

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("serve", sub_matches)) => handle_serve_command(sub_matches).await,
        Some(("check-config", sub_matches)) => handle_check_config_command(sub_matches),
        // clap enforces a subcommand
        _ => Ok(()),
    }
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .env("OIDC_ADAPTER_CONFIG")
        .help("Path to the config file (JSON or YAML)")
}

fn build_cli() -> Command {
    Command::new("oidc-adapter")
        .about("OAuth2 adapter for OpenID Connect identity providers")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Start the adapter server")
                .arg(config_arg())
                .arg(Arg::new("host").long("host").help("Server host"))
                .arg(
                    Arg::new("port")
                        .long("port")
                        .short('p')
                        .value_parser(clap::value_parser!(u16))
                        .help("Server port"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate the config file and print the effective configuration")
                .arg(config_arg()),
        )
}

/// Load the config named by `--config`, or the default file
fn load_config(matches: &ArgMatches) -> Result<Config> {
    match matches.get_one::<String>("config") {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

async fn handle_serve_command(matches: &ArgMatches) -> Result<()> {
    let mut config = load_config(matches)?;

    // Command-line flags override the file
    if let Some(host) = matches.get_one::<String>("host") {
        config.http.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.http.port = *port;
    }
    config.validate()?;

    let level = config.log.as_ref().and_then(|l| l.level.as_deref());
    crate::init_logging(level);

    crate::http::start_server(config).await
}

fn handle_check_config_command(matches: &ArgMatches) -> Result<()> {
    crate::init_logging(None);
    let config = load_config(matches)?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    eprintln!("Configuration OK ({} provider(s))", config.providers.len());
    Ok(())
}
