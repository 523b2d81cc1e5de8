//! Run one function invocation locally.
//!
//! Usage: `invoke <search|featured-cards> < event.json`
//!
//! The event is read from stdin; empty input means a bare GET. The response
//! object is printed to stdout.

use anyhow::{anyhow, Context};
use std::io::Read;

use valuedeck_rs::config::{self, Config};
use valuedeck_rs::events::{Function, FunctionEvent};
use valuedeck_rs::function::FunctionHandler;
use valuedeck_rs::logging;
use valuedeck_rs::search::SearchService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let name = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: invoke <search|featured-cards> < event.json"))?;
    let function: Function = name.parse().map_err(|e: String| anyhow!(e))?;

    let cfg = Config::load(config::default_path())?;
    logging::init(&cfg.general.log_level)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read event from stdin")?;
    let event = if input.trim().is_empty() {
        FunctionEvent::get(&[])
    } else {
        serde_json::from_str(&input).context("invalid event JSON")?
    };

    let handler = FunctionHandler::new(SearchService::new(&cfg)?, &cfg.server);
    let response = handler.handle(function, &event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
