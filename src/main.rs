//! Multilingual Farmer Assistant
//!
//! Interactive entry point: reads queries in any of the eleven supported
//! languages, runs them through the pipeline, and prints the formatted
//! reply.

use anyhow::Result;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

use krishi_agency::{Config, LanguageCode, Pipeline};

const DEFAULT_USER_ID: &str = "user_01";
const DEFAULT_SESSION_ID: &str = "session_01";

#[tokio::main]
async fn main() -> Result<()> {
    // .env first, then logging.
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    println!("\n{}", "═".repeat(60));
    println!("🌾 Farmer Assistant");
    println!("{}", "═".repeat(60));
    println!("Weather | Farming Advice | Mandi Prices | Government Data");
    println!("{}\n", "═".repeat(60));

    let pipeline = Pipeline::new(&config);

    println!("💡 Commands: 'quit' | 'languages'\n");

    loop {
        print!("🧑‍🌾 You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let query = input.trim();

        if query.is_empty() {
            continue;
        }

        match query.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("\n👋 Goodbye!\n");
                break;
            }
            "languages" => {
                println!("\n🗣️  Supported languages:");
                for code in LanguageCode::ALL {
                    println!("   {} ({})", code.language_name(), code.as_tag());
                }
                println!();
                continue;
            }
            _ => {}
        }

        println!("\n⚙️  Processing...\n");

        match pipeline.call(query, DEFAULT_USER_ID, DEFAULT_SESSION_ID).await {
            Ok(reply) => {
                println!("{}", "─".repeat(50));
                println!("{reply}");
                println!("{}\n", "─".repeat(50));
            }
            Err(e) => {
                println!("❌ Error: {e}\n");
            }
        }
    }

    Ok(())
}
