//! demos/chat_repl.rs
//!
//! Loads the newest observation file from `data/processed` and chats about it
//! in the terminal. Type `/reset` to clear the conversation, `/quit` to leave.
//!
//! To run this demo:
//! GEMINI_API_KEY=... RUST_LOG=info cargo run --example chat_repl

use std::error::Error;
use std::sync::Arc;

use meteo_explorer::{ChatConfig, DashboardSummary, ExplorerSession, ObservationLoader};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // 1. Load the newest data file
    let observations = ObservationLoader::default().load_latest().await?;
    let summary = DashboardSummary::compute(&observations, &observations)?;
    println!(
        "{} cities, {} records, hottest {:.1}°C",
        summary.cities_tracked,
        summary.record_count,
        summary.max_temperature_max.unwrap_or(f64::NAN)
    );

    // 2. Start a session
    let table = Arc::new(observations.frame.collect()?);
    let mut session = ExplorerSession::new(table, &ChatConfig::from_env()?)?;
    for message in session.transcript() {
        println!("assistant> {}", message.content);
    }

    // 3. Chat
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/reset" => {
                session.clear();
                println!("(conversation cleared)");
            }
            prompt => match session.ask(prompt).await {
                Ok(reply) => println!("assistant [{:?}]> {}", reply.source, reply.content),
                Err(e) => println!("error> {e}"),
            },
        }
    }
    Ok(())
}
