//! Headless dashboard run: loads config, fetches the dashboard payload, and
//! prints the composed view as JSON.
//!
//! Usage: `cgdash --company CGCEL --open stock`

use std::path::PathBuf;

use clap::Parser;

use cgdash_lib::error::ErrorPayload;
use cgdash_lib::types::{Company, Role};
use cgdash_lib::RunOptions;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Company filter: ALL, CGCEL or CGPISL. Defaults to the config value.
    #[arg(long)]
    company: Option<Company>,

    /// Card to open (complaint, stock, grc).
    #[arg(long)]
    open: Option<String>,

    /// Config file. Defaults to ~/.cgdash/config.json.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Role used for the notification bell: ADMIN, USER or TECHNICIAN.
    #[arg(long)]
    role: Option<Role>,

    /// JSON file with `{"birthday_names": [...], "holiday": {...}}`.
    #[arg(long)]
    landing: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = RunOptions {
        config_path: args.config,
        company: args.company,
        open_card: args.open.filter(|k| !k.is_empty()),
        role: args.role,
        landing_path: args.landing,
    };

    match cgdash_lib::run(options).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            let payload = ErrorPayload::from(&e);
            eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            Err(anyhow::anyhow!("{}", e))
        }
    }
}
