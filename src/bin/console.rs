//! Database Explorer console - terminal client for the explorer gateway
//!
//! ```bash
//! # Interactive mode
//! explorer-console --url http://localhost:5000
//!
//! # Run one statement and exit
//! explorer-console -c "SELECT * FROM event LIMIT 5"
//! ```

use clap::Parser;
use std::process::ExitCode;

use db_explorer::console::repl::run_interactive;
use db_explorer::console::{render, Console, GatewayClient, SubmitOutcome, DEFAULT_GATEWAY_URL};
use db_explorer::logging::{init_tracing, CONSOLE_FILTER};

#[derive(Parser, Debug)]
#[command(name = "explorer-console")]
#[command(author, version, about = "Interactive SQL console for the explorer gateway", long_about = None)]
struct Args {
    /// Gateway base URL
    #[arg(short = 'u', long = "url", env = "EXPLORER_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL)]
    url: String,

    /// Execute one SQL statement and exit
    #[arg(short = 'c', long = "command")]
    command: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    init_tracing(CONSOLE_FILTER);

    let client = GatewayClient::new(&args.url)?;
    let mut console = Console::new(client);

    if let Some(sql) = args.command {
        let outcome = console.submit_text(&sql).await;
        if outcome == SubmitOutcome::Ignored {
            return Ok(ExitCode::SUCCESS);
        }

        println!("{}", render(&console.state().view()));
        let failed = console.state().error().is_some();
        return Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS });
    }

    console.load_tables().await;
    run_interactive(&mut console).await?;

    Ok(ExitCode::SUCCESS)
}
