//! `nudge chat` — Interactive or single-message reminder chat.

use std::sync::Arc;
use std::time::Duration;

use nudge_config::AppConfig;
use nudge_core::turn::{SessionId, Turn};
use nudge_dialogue::ReminderBot;
use nudge_language::{EnglishLexicon, tokenize};
use nudge_memory::InMemorySlots;
use nudge_scheduler::ReminderQueue;
use nudge_timeparse::NaturalTimeExtractor;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use uuid::Uuid;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let queue = Arc::new(ReminderQueue::new());
    let bot = ReminderBot::new(
        Arc::new(EnglishLexicon::new()),
        Arc::new(NaturalTimeExtractor::new()),
        Arc::new(InMemorySlots::new()),
        queue.clone(),
    )
    .with_message_prefix(config.reminder.message_prefix.clone());

    let session = SessionId(format!("cli_{}", Uuid::new_v4()));
    tracing::debug!(session = %session, "starting chat session");

    if let Some(msg) = message {
        // Single message mode
        let reply = bot.handle(&turn(&session, &msg)).await?;
        println!("{reply}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Nudge — reminder chat");
    println!();
    println!("  Try: \"Remind me to buy groceries at 2pm\"");
    println!("  Due reminders print here as they fire.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    // Delivery: due reminders print as they fire.
    let (mut due_rx, delivery) = queue.start(Duration::from_secs(config.scheduler.tick_seconds));
    tokio::spawn(async move {
        while let Some(reminder) = due_rx.recv().await {
            println!();
            println!("  [Reminder] {}", reminder.body);
            print_input_marker();
        }
    });

    let stdin = io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    print_input_marker();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            print_input_marker();
            continue;
        }
        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        match bot.handle(&turn(&session, &line)).await {
            Ok(reply) => {
                println!("  Nudge > {reply}");
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
            }
        }
        print_input_marker();
    }

    delivery.abort();
    println!();
    println!("  Goodbye!");
    Ok(())
}

fn turn(session: &SessionId, sentence: &str) -> Turn {
    Turn::new(session.clone(), sentence, tokenize(sentence))
}

fn print_input_marker() {
    use std::io::Write;
    print!("  You > ");
    let _ = std::io::stdout().flush();
}
