use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "routectl")]
#[command(about = "Management CLI for the dynamic route registry", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or replace a route
    Create {
        #[arg(long)]
        path: String,
        #[arg(long, default_value = "GET")]
        method: String,
        /// Response payload as JSON text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        response: Option<String>,
        /// Read the response payload from a JSON file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Replace the response of an existing route
    Update {
        #[arg(long)]
        path: String,
        #[arg(long)]
        response: String,
    },
    /// Print the generated OpenAPI document
    Spec,
    /// Call a dynamic route
    Call {
        #[arg(long, default_value = "GET")]
        method: String,
        #[arg(long)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Create {
            path,
            method,
            response,
            file,
        } => {
            let text = match (response, file) {
                (Some(text), _) => text,
                (None, Some(file)) => tokio::fs::read_to_string(file).await?,
                (None, None) => return Err("either --response or --file is required".into()),
            };
            let response: Value = serde_json::from_str(&text)?;
            client
                .post(format!("{}/api/create", base))
                .json(&json!({"path": path, "method": method, "response": response}))
                .send()
                .await?
        }
        Commands::Update { path, response } => {
            let response: Value = serde_json::from_str(&response)?;
            client
                .put(format!("{}/api/update", base))
                .json(&json!({"path": path, "newResponse": response}))
                .send()
                .await?
        }
        Commands::Spec => client.get(format!("{}/openapi.json", base)).send().await?,
        Commands::Call { method, path } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let path = if path.starts_with('/') { path } else { format!("/{}", path) };
            client.request(method, format!("{}{}", base, path)).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: registry returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
