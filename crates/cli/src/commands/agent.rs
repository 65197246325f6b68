//! `docent agent`: interactive or single-message chat mode.

use std::io::Write;

use docent_config::AppConfig;
use docent_core::ChatTurn;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    eprint!("  Loading knowledge...");
    let assistant = docent_agent::build_assistant(&config).await?;
    eprint!("\r                      \r");

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let response = assistant.chat(&msg, &[]).await?;
        eprint!("\r              \r");
        println!("{response}");
        return Ok(());
    }

    println!();
    println!("  Docent: Interactive Mode");
    println!();
    println!("  Model:      {}", assistant.model());
    println!("  Speaking for: {}", assistant.identity().name);
    println!("  Knowledge:  {} bytes", assistant.knowledge().len());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut history: Vec<ChatTurn> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input == "exit" || input == "quit" {
            break;
        }
        if input.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }

        eprint!("  ...");
        match assistant.chat(input, &history).await {
            Ok(response) => {
                eprint!("\r     \r");
                println!();
                for line in response.lines() {
                    println!("  Assistant > {line}");
                }
                println!();
                history.push(ChatTurn::new(input, Some(response)));
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}
