//! Interactive chat with the assistant bound to one class.
//!
//! # Usage
//!
//! ```bash
//! # Chat about class 1 from the bundled catalog
//! tutorius-chat
//!
//! # Pick a class and point at a running assistant service
//! tutorius-chat --class 3 --base-url http://localhost:8080/
//!
//! # Use your own catalog and bindings
//! tutorius-chat --classes classes.json --bindings assistants.yaml
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a new chat
//! - `/sidebar` - Open or close the class sidebar
//! - `/class <id>` - Switch to another class
//! - `/export <file>` - Write the conversation as an HTML page
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use tutorius::chat::{
    ChatArgs, ChatCommand, ChatConfig, ClassChat, PlainTextRenderer, Renderer, SendOutcome,
    SkipReason, help_text, parse_command,
};
use tutorius::page::render_page;
use tutorius::{AssistantService, Completion};

/// Main entry point for the tutorius-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("tutorius-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    let catalog = Arc::new(config.load_catalog()?);
    let directory = Arc::new(config.load_directory()?);
    let client = AssistantService::with_options(
        None,
        config.base_url.clone(),
        Some(config.timeout),
    )?;

    let mut session = match ClassChat::open(catalog, directory, config.class_id, client) {
        Ok(session) => session,
        Err(err) if err.is_not_found() => {
            renderer.print_error("Class not found");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };
    let mut rl = DefaultEditor::new()?;

    session.render(&mut renderer);
    warn_if_unbound(&session, &mut renderer);
    println!("Type /help for commands, /quit to exit\n");

    loop {
        match rl.readline("You: ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::NewChat => {
                            session.new_chat();
                            renderer.print_info("Started a new chat.");
                        }
                        ChatCommand::ToggleSidebar => {
                            if session.toggle_sidebar() {
                                renderer.print_sidebar(session.class());
                            } else {
                                renderer.print_info("Sidebar closed.");
                            }
                        }
                        ChatCommand::Class(class_id) => match session.select_class(class_id) {
                            Ok(()) => {
                                session.render(&mut renderer);
                                warn_if_unbound(&session, &mut renderer);
                            }
                            Err(err) if err.is_not_found() => {
                                renderer.print_error("Class not found");
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Show => session.render(&mut renderer),
                        ChatCommand::Export(path) => {
                            match std::fs::write(&path, render_page(&session)) {
                                Ok(()) => renderer.print_info(&format!("Page written to {path}")),
                                Err(err) => renderer
                                    .print_error(&format!("Failed to write {path}: {err}")),
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                session.set_input(line);
                match session.send(&mut renderer).await {
                    SendOutcome::Skipped(SkipReason::Unbound) => {
                        warn_if_unbound(&session, &mut renderer);
                    }
                    SendOutcome::Skipped(SkipReason::EmptyInput)
                    | SendOutcome::Busy
                    | SendOutcome::Replied
                    | SendOutcome::Failed(_) => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn warn_if_unbound<C: Completion>(session: &ClassChat<C>, renderer: &mut dyn Renderer) {
    if session.binding().is_none() {
        renderer.print_info(&format!(
            "No assistant is configured for {}; messages cannot be sent.",
            session.class().code
        ));
    }
}
