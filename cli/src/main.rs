use std::env;

use structopt::StructOpt;

use driftmail::query::LogQuery;
use driftmail::{Client, Config, EmailOptions, Error};

#[derive(Debug, StructOpt)]
#[structopt(name = "driftmail", about = "Command-line access to the Driftmail API.")]
struct Opt {
    /// API key; falls back to the DRIFTMAIL_API_KEY environment variable
    #[structopt(short = "k", long)]
    api_key: Option<String>,

    /// Path to a driftmail.toml config file
    #[structopt(short, long)]
    config: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Send a templated email
    Send {
        #[structopt(short, long)]
        email_id: String,

        /// Recipient address
        #[structopt(short, long)]
        to: String,

        /// Recipient display name
        #[structopt(short, long)]
        name: Option<String>,

        /// Template data as a JSON object
        #[structopt(short, long)]
        data: Option<String>,
    },

    /// Fetch send logs
    Logs {
        #[structopt(short, long)]
        count: Option<u32>,

        #[structopt(short, long)]
        offset: Option<u32>,
    },

    /// Fetch a single log entry
    Log { log_id: String },

    /// List templates
    Templates,

    /// Render a template without sending
    Render {
        #[structopt(short, long)]
        template_id: String,

        /// Template data as a JSON object
        #[structopt(short, long)]
        data: Option<String>,
    },
}

fn build_client(opt: &Opt) -> Client {
    let mut config = match opt.config {
        Some(ref path) => {
            Config::from_settings(&driftmail::config::load_config(Some(path.as_str())))
        }
        None => Config::default(),
    };

    if let Some(ref key) = opt.api_key {
        config.api_key = key.clone();
    } else if config.api_key.is_empty() {
        config.api_key = env::var("DRIFTMAIL_API_KEY").expect("No API key found!");
    }

    Client::new(config)
}

fn parse_data(data: &Option<String>) -> Result<serde_json::Value, Error> {
    match data {
        Some(raw) => serde_json::from_str(raw).map_err(|e| e.into()),
        None => Ok(serde_json::json!({})),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = Opt::from_args();
    let client = build_client(&opt);

    let output = match opt.command {
        Command::Send {
            ref email_id,
            ref to,
            ref name,
            ref data,
        } => {
            let mut recipient = serde_json::json!({ "address": to });
            if let Some(name) = name {
                recipient["name"] = serde_json::json!(name);
            }

            let options = EmailOptions {
                data: Some(parse_data(data)?),
                ..Default::default()
            };

            let result = client.send_email(email_id, recipient, &options).await?;
            log::info!("Send accepted: {}", result.status);

            serde_json::json!({
                "success": result.success,
                "status": result.status,
                "receipt_id": result.receipt_id,
            })
        }
        Command::Logs { count, offset } => {
            let query = LogQuery {
                count,
                offset,
                ..Default::default()
            };
            client.logs(&query).await?
        }
        Command::Log { ref log_id } => client.log(log_id).await?,
        Command::Templates => client.templates().await?,
        Command::Render {
            ref template_id,
            ref data,
        } => {
            client
                .render(template_id, None, parse_data(data)?, None)
                .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
