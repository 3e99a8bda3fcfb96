use clap::{Parser, Subcommand};
use emporium::catalog::{Category, Item};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "emporium-cli")]
#[command(about = "Command-line client for the Handyman Emporium", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every item
    List,
    /// Show one item
    Get { id: i64 },
    /// Find items whose fields equal the given values
    Find {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        count: Option<i64>,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Add a new item
    Add {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        count: i64,
        #[arg(long)]
        category: Category,
    },
    /// Change the name, price or count of an item
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        count: Option<i64>,
    },
    /// Remove an item
    Delete { id: i64 },
}

fn query_pairs(fields: Vec<(&str, Option<String>)>) -> Vec<(String, String)> {
    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List => client.get(format!("{}/", base)).send().await?,
        Commands::Get { id } => client.get(format!("{}/items/{}", base, id)).send().await?,
        Commands::Find { name, price, count, category } => {
            let query = query_pairs(vec![
                ("name", name),
                ("price", price.map(|p| p.to_string())),
                ("count", count.map(|c| c.to_string())),
                ("category", category.map(|c| c.to_string())),
            ]);
            client.get(format!("{}/items/", base)).query(&query).send().await?
        }
        Commands::Add { id, name, price, count, category } => {
            let item = Item::new(id, name, price, count, category);
            client.post(format!("{}/", base)).json(&item).send().await?
        }
        Commands::Update { id, name, price, count } => {
            let query = query_pairs(vec![
                ("name", name),
                ("price", price.map(|p| p.to_string())),
                ("count", count.map(|c| c.to_string())),
            ]);
            client.put(format!("{}/update/{}", base, id)).query(&query).send().await?
        }
        Commands::Delete { id } => client.delete(format!("{}/delete/{}", base, id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
