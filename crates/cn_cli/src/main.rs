use clap::Parser;
use cn_core::{CompanyQuery, Result};
use cn_search::company_news_tools;
use cn_web::AppState;
use reqwest::Client;
use tracing::info;

mod config;
mod logging;

use config::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch the latest news about a company", long_about = None)]
pub struct Cli {
    /// Agent to run tasks with. Available agents: llm (default), direct
    #[arg(long, global = true)]
    agent: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server with the search page and the news endpoint
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch news for one company and print the report as JSON
    News {
        company: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    logging::init_logging(&settings.log_level);

    if let Some(kind) = cli.agent {
        settings.agent.kind = kind;
    }
    let agent = cn_agent::create_agent(settings.agent.clone())?;
    info!("🧠 Agent initialized (using {})", agent.name());

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            cn_web::serve(AppState::new(agent), &settings.bind_addr()).await?;
        }
        Commands::News { company } => {
            let query = CompanyQuery::new(company);
            query.validate()?;
            let tools = company_news_tools(&Client::new());
            let report = cn_agent::company_news(agent.as_ref(), &query, tools).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
