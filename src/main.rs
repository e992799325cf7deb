#![allow(non_snake_case)]

use std::process::exit;
use std::sync::Arc;

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use tokio::sync::Mutex;

use pollBot::clients::poll_client::XoyondoClient;
use pollBot::config::AppConfig;
use pollBot::service::poll_service::PollService;
use pollBot::{cli, runtime};

const DEFAULT_RUN_MODE: &str = "cli";

#[tokio::main]
async fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let config = AppConfig::load();

    let poll_url = match config.require("XOYONDO_URL") {
        Ok(url) => url,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };
    let client = match XoyondoClient::new(&poll_url) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("XOYONDO_URL: {}", err);
            exit(1);
        }
    };
    let service = PollService::new(client);

    let run_mode = config
        .get("RUN_MODE")
        .unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        let discord_client_secret = match config.require("DISCORD_CLIENT_SECRET") {
            Ok(secret) => secret,
            Err(err) => {
                eprintln!("{}", err);
                exit(1);
            }
        };
        let shared = Arc::new(Mutex::new(service));
        runtime::run_api(shared, discord_client_secret).await;
    } else if run_mode == "cli" {
        cli::cli(service).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
