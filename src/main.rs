use anyhow::Result;
use colored::*;
use gemini_chat::{
    chat::IgnoreReason, ChatController, ChatMode, Config, Draft, GeminiClient, Message,
    MessagePart, RequestComposer, Role, SendOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: /image (toggle image generation), /attach <path>, /detach, /quit";

fn print_message(message: &Message) {
    let label = match message.role {
        Role::User => "You".bright_green().bold(),
        Role::Model => "Gemini".bright_blue().bold(),
    };
    println!("{}:", label);
    for part in &message.parts {
        match part {
            MessagePart::Text { content } => println!("{}", content),
            MessagePart::Image { url, alt } => println!(
                "{} {} ({} bytes of data URI)",
                "[image]".bright_magenta(),
                alt.as_deref().unwrap_or(""),
                url.len()
            ),
            MessagePart::File {
                name, mime_type, ..
            } => println!("{} {} ({})", "[file]".bright_cyan(), name, mime_type),
        }
    }
    println!();
}

fn prompt_label(draft: &Draft) -> ColoredString {
    let mode = match draft.mode() {
        ChatMode::Chat => "chat",
        ChatMode::ImageGeneration => "image",
    };
    match draft.attachment() {
        Some(file) => format!("[{} + {}]> ", mode, file.name).yellow(),
        None => format!("[{}]> ", mode).yellow(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let controller = ChatController::new(
        GeminiClient::from_config(&config),
        RequestComposer::new(config.chat_model.clone(), config.image_model.clone()),
    );
    let mut draft = Draft::new();

    for message in controller.messages() {
        print_message(&message);
    }
    println!("{}\n", HELP.bright_black());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", prompt_label(&draft));
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim_end();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/image", _) => {
                draft.toggle_mode();
            }
            ("/detach", _) => draft.remove_attachment(),
            ("/attach", path) if !path.trim().is_empty() => {
                if let Err(e) = draft.attach(path.trim()).await {
                    println!("{}", e.to_string().red());
                }
            }
            ("/attach", _) => println!("{}", "Usage: /attach <path>".red()),
            _ => {
                draft.set_prompt(line);
                let before = controller.message_count();
                match controller.submit(&mut draft).await {
                    SendOutcome::Ignored(IgnoreReason::EmptyInput) => continue,
                    SendOutcome::Ignored(IgnoreReason::Busy) => {
                        println!("{}", "Still waiting for the previous reply.".yellow())
                    }
                    SendOutcome::Replied | SendOutcome::Failed(_) => {
                        for message in controller.messages_since(before) {
                            print_message(&message);
                        }
                        if let Some(error) = controller.error() {
                            println!("{}", error.red());
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
