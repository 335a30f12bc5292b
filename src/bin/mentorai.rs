//! Interactive career-mentor chat.
//!
//! This binary provides a REPL for chatting with MentorAI through Groq (or any other
//! OpenAI-compatible provider).
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; reads GROQ_API_KEY from the environment
//! mentorai
//!
//! # Start with a few outputs selected
//! mentorai --level intermediate --goal internship --outputs roadmap,portfolio
//!
//! # Disable colors (useful for piping output)
//! mentorai --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/outputs <list>` - Choose what the mentor should produce
//! - `/save [file]` - Save the chat as text
//! - `/clear` - Clear conversation history
//! - `/quit` - Exit the application

use std::path::PathBuf;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use mentorai::chat::{
    ChatArgs, ChatCommand, ChatConfig, PlainTextRenderer, QUICK_START_EXAMPLES, Renderer,
    help_text, parse_command,
};
use mentorai::prompt::has_guidance;
use mentorai::{Groq, ModelCatalog, OutputType, Session, TurnOutcome, register_biometrics};

/// Main entry point for the mentorai application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    register_biometrics(biometrics::Collector::new());

    let (args, _) = ChatArgs::from_command_line_relaxed("mentorai [OPTIONS]");
    let config = ChatConfig::try_from(args)?;
    let use_color = config.use_color;

    let client = Groq::with_options(None, config.base_url.clone(), None)?;
    let catalog = ModelCatalog::fetch(&client).await;
    let session = Session::new(client, config.conversation(catalog.default_model()));
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    println!("MentorAI - your smart tech career mentor (model: {})", session.config().model());
    println!("Internships • Jobs • Skills • Interviews • Portfolio");
    println!("Type /help for commands, /quit to exit\n");
    if !session.config().has_output_types() {
        renderer.print_info(
            "Select what to generate with /outputs, e.g. /outputs roadmap,interview\n",
        );
    }

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let message = match parse_command(line) {
                    Some(ChatCommand::Quit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Some(ChatCommand::Example(index)) => {
                        let example = QUICK_START_EXAMPLES[index];
                        println!("You: {example}");
                        example.to_string()
                    }
                    Some(cmd) => {
                        handle_command(cmd, &session, &catalog, &mut renderer);
                        continue;
                    }
                    None => line.to_string(),
                };

                match session.submit_with_progress(&message, &mut renderer).await {
                    Ok(view) => {
                        let reply = view
                            .transcript
                            .last()
                            .map(|m| m.content().to_string())
                            .unwrap_or_default();
                        match view.outcome {
                            TurnOutcome::Replied => renderer.print_reply(&reply),
                            TurnOutcome::Rejected | TurnOutcome::Failed => {
                                renderer.print_notice(&reply)
                            }
                        }
                    }
                    Err(err) => renderer.print_error(&err.to_string()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
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

fn handle_command(
    cmd: ChatCommand,
    session: &Session<Groq>,
    catalog: &ModelCatalog,
    renderer: &mut PlainTextRenderer,
) {
    match cmd {
        ChatCommand::Clear => {
            session.clear();
            renderer.print_info("Conversation cleared.");
        }
        ChatCommand::Help => {
            for line in help_text().lines() {
                println!("    {}", line);
            }
        }
        ChatCommand::Level(level) => {
            session.update_config(|c| c.set_level(level));
            renderer.print_info(&format!("Level set to {level}"));
        }
        ChatCommand::Goal(goal) => {
            session.update_config(|c| c.set_goal(goal));
            renderer.print_info(&format!("Career goal set to {goal}"));
        }
        ChatCommand::Tone(tone) => {
            session.update_config(|c| c.set_tone(tone));
            renderer.print_info(&format!("Tone set to {tone}"));
        }
        ChatCommand::Outputs(outputs) => {
            session.update_config(|c| c.set_output_types(outputs));
            renderer.print_info(&format!(
                "Outputs: {}",
                describe_outputs(session.config().output_types())
            ));
        }
        ChatCommand::Toggle(output) => {
            let label = output.label().to_string();
            if session.update_config(|c| c.toggle_output_type(output)) {
                renderer.print_info(&format!("Selected {label}"));
            } else {
                renderer.print_info(&format!("Deselected {label}"));
            }
        }
        ChatCommand::Creativity(value) => match session.update_config(|c| c.set_creativity(value)) {
            Ok(()) => renderer.print_info(&format!("Creativity set to {value:.1}")),
            Err(err) => renderer.print_error(&err.to_string()),
        },
        ChatCommand::Model(model) => {
            if !catalog.choices().contains(&model) {
                renderer.print_info(&format!("Note: {model} is not in the model list"));
            }
            renderer.print_info(&format!("Model changed to: {model}"));
            session.update_config(|c| c.set_model(model));
        }
        ChatCommand::Models => {
            let current = session.config().model().to_string();
            if catalog.fetched().is_empty() {
                println!("    Available models (fallback list):");
            } else {
                println!("    Available models:");
            }
            for model in catalog.choices() {
                let marker = if model == current { "*" } else { " " };
                println!("    {marker} {model}");
            }
        }
        ChatCommand::Save(path) => {
            let saved = match path {
                Some(path) => session
                    .save_transcript_to(&path)
                    .map(|written| written.then(|| PathBuf::from(path))),
                None => session.save_transcript(),
            };
            match saved {
                Ok(Some(path)) => {
                    renderer.print_info(&format!("Chat saved to {}", path.display()))
                }
                Ok(None) => renderer.print_info("Nothing to save yet."),
                Err(err) => renderer.print_error(&format!("Failed to save chat: {}", err)),
            }
        }
        ChatCommand::Stats => print_stats(session),
        ChatCommand::ShowConfig => print_config(session),
        ChatCommand::Example(_) | ChatCommand::Quit => {}
        ChatCommand::Invalid(message) => {
            renderer.print_error(&message);
        }
    }
}

fn describe_outputs<'a>(outputs: impl Iterator<Item = &'a OutputType>) -> String {
    let labels: Vec<String> = outputs
        .map(|o| {
            if has_guidance(o) {
                o.label().to_string()
            } else {
                format!("{} (no dedicated guidance)", o.label())
            }
        })
        .collect();
    if labels.is_empty() {
        "(none)".to_string()
    } else {
        labels.join(", ")
    }
}

fn print_stats(session: &Session<Groq>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Creativity: {:.1}", stats.creativity);
    println!("      Messages: {}", stats.message_count);
    println!("      Turns: {} ({} failed)", stats.turns, stats.failed_turns);
}

fn print_config(session: &Session<Groq>) {
    let config = session.config();
    println!("    Current Configuration:");
    println!("      Model: {}", config.model());
    println!("      Level: {}", config.level());
    println!("      Career goal: {}", config.goal());
    println!("      Tone: {}", config.tone());
    println!("      Outputs: {}", describe_outputs(config.output_types()));
    println!("      Creativity: {:.1}", config.creativity());
    println!("      Provider: {}", session.client().base_url());
}
