//! Genius Minds interactive shell.
//!
//! Line-oriented front end over the conversation engine and export
//! pipeline. Plain lines are sent to the open conversation; lines starting
//! with `/` are commands (`/help` lists them).
//!
//! Configuration comes from the environment (see `genius_minds::config`);
//! logs go to stderr so they do not interleave with the chat.

use std::error::Error;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use genius_minds::adapters::{
    CerebrasConfig, CerebrasSummarizer, FileConversationStore, PandocPdfRenderer, SensayConfig,
    SensayPersonaResponder,
};
use genius_minds::application::{
    ConversationEngine, ConversationEvent, DispatchConfig, ExportPipeline,
};
use genius_minds::config::{AppConfig, LogFormat, LoggingConfig};
use genius_minds::domain::conversation::{Conversation, Message, Sender};
use genius_minds::domain::export::ExportFormat;
use genius_minds::domain::foundation::ConversationId;
use genius_minds::domain::persona::{PersonaCatalog, PersonaId};

const HELP: &str = "\
Commands:
  /personas                 list available personas
  /new <persona>            start a one-on-one chat
  /group [persona ...]      start a group discussion (default: einstein curie)
  /list                     list conversations, newest first
  /open <n>                 open conversation n from /list
  /add <persona>            add a persona to the open discussion
  /remove <persona>         remove a persona from the open discussion
  /rename <title>           rename the open conversation
  /delete                   delete the open conversation
  /export <md|pdf|doc> [category; category ...]
                            write refined notes for the open conversation
  /help                     show this help
  /quit                     exit
Anything else is sent as a message.";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Personas,
    New(PersonaId),
    Group(Vec<PersonaId>),
    List,
    Open(usize),
    Add(PersonaId),
    Remove(PersonaId),
    Rename(String),
    Delete,
    Export {
        format: ExportFormat,
        categories: Vec<String>,
    },
    Help,
    Quit,
    Send(String),
    Empty,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ShellCommand::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(ShellCommand::Send(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    let persona = |args: &str| PersonaId::new(args).map_err(|e| e.to_string());

    match name {
        "personas" => Ok(ShellCommand::Personas),
        "new" => persona(args).map(ShellCommand::New),
        "group" => args
            .split_whitespace()
            .map(persona)
            .collect::<Result<Vec<_>, _>>()
            .map(ShellCommand::Group),
        "list" => Ok(ShellCommand::List),
        "open" => args
            .parse::<usize>()
            .map(ShellCommand::Open)
            .map_err(|_| "usage: /open <n>".to_string()),
        "add" => persona(args).map(ShellCommand::Add),
        "remove" => persona(args).map(ShellCommand::Remove),
        "rename" if !args.is_empty() => Ok(ShellCommand::Rename(args.to_string())),
        "rename" => Err("usage: /rename <title>".to_string()),
        "delete" => Ok(ShellCommand::Delete),
        "export" => {
            let (format, categories) = match args.split_once(char::is_whitespace) {
                Some((format, categories)) => (format, categories),
                None => (args, ""),
            };
            let format = format.parse::<ExportFormat>().map_err(|e| e.to_string())?;
            let categories = categories
                .split(';')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            Ok(ShellCommand::Export { format, categories })
        }
        "help" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command /{} (try /help)", other)),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn speaker(message: &Message) -> String {
    match message.sender() {
        Sender::User => "You".to_string(),
        Sender::System => "*".to_string(),
        Sender::Persona(id) => message
            .persona_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string()),
    }
}

fn print_message(message: &Message) {
    println!("{}: {}", speaker(message), message.content());
}

fn print_conversation(conversation: &Conversation) {
    println!("== {} ==", conversation.title());
    for message in conversation.messages() {
        print_message(message);
    }
}

struct Shell {
    engine: ConversationEngine,
    exporter: ExportPipeline,
    listed: Vec<Conversation>,
    current: Option<Conversation>,
}

impl Shell {
    /// Runs one command. Returns false when the shell should exit.
    async fn handle(&mut self, command: ShellCommand) -> Result<bool, Box<dyn Error>> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Personas => {
                for profile in self.engine.catalog().profiles() {
                    println!("{:<10} {} - {}", profile.id.as_str(), profile.name, profile.title);
                }
            }
            ShellCommand::New(persona) => {
                let conversation = self.engine.create_individual(persona).await?;
                print_conversation(&conversation);
                self.current = Some(conversation);
            }
            ShellCommand::Group(personas) => {
                let conversation = self.engine.create_group(personas).await?;
                print_conversation(&conversation);
                self.current = Some(conversation);
            }
            ShellCommand::List => {
                self.listed = self.engine.list().await;
                if self.listed.is_empty() {
                    println!("No conversations yet.");
                }
                for (index, conversation) in self.listed.iter().enumerate() {
                    println!(
                        "{:>3}. {} ({} messages, last active {})",
                        index + 1,
                        conversation.title(),
                        conversation.message_count(),
                        conversation.last_activity().as_datetime().format("%Y-%m-%d %H:%M"),
                    );
                }
            }
            ShellCommand::Open(index) => {
                let Some(listed) = index.checked_sub(1).and_then(|i| self.listed.get(i)) else {
                    println!("No such conversation; run /list first.");
                    return Ok(true);
                };
                match self.engine.get(listed.id()).await {
                    Some(conversation) => {
                        print_conversation(&conversation);
                        self.current = Some(conversation);
                    }
                    None => println!("That conversation no longer exists."),
                }
            }
            ShellCommand::Add(persona) => {
                let Some(id) = self.current_id() else {
                    return Ok(true);
                };
                let updated = self.engine.add_participant(id, persona).await?;
                self.show_update(updated);
            }
            ShellCommand::Remove(persona) => {
                let Some(id) = self.current_id() else {
                    return Ok(true);
                };
                let updated = self.engine.remove_participant(id, persona).await?;
                self.show_update(updated);
            }
            ShellCommand::Rename(title) => {
                let Some(id) = self.current_id() else {
                    return Ok(true);
                };
                let updated = self.engine.rename(id, title).await?;
                self.show_update(updated);
            }
            ShellCommand::Delete => {
                let Some(id) = self.current_id() else {
                    return Ok(true);
                };
                if self.engine.delete(id).await? {
                    println!("Conversation deleted.");
                }
                self.current = None;
            }
            ShellCommand::Export { format, categories } => {
                let Some(id) = self.current_id() else {
                    return Ok(true);
                };
                println!("Analyzing conversation...");
                match self.exporter.export(id, &categories, format).await {
                    Ok(document) => {
                        tokio::fs::write(&document.filename, &document.content).await?;
                        println!("Wrote {} ({} bytes)", document.filename, document.content.len());
                    }
                    Err(err) => println!("Export failed: {}. Please try again.", err),
                }
            }
            ShellCommand::Send(text) => {
                let Some(id) = self.current_id() else {
                    return Ok(true);
                };
                self.send(id, &text).await?;
            }
        }
        Ok(true)
    }

    fn current_id(&self) -> Option<ConversationId> {
        let id = self.current.as_ref().map(Conversation::id);
        if id.is_none() {
            println!("No open conversation; use /new, /group, or /open.");
        }
        id
    }

    fn show_update(&mut self, updated: Option<Conversation>) {
        match updated {
            Some(conversation) => {
                if let Some(last) = conversation.last_message() {
                    print_message(last);
                }
                println!("== {} ==", conversation.title());
                self.current = Some(conversation);
            }
            None => {
                println!("That conversation no longer exists.");
                self.current = None;
            }
        }
    }

    /// Sends a message and prints replies as they arrive.
    async fn send(
        &mut self,
        id: ConversationId,
        text: &str,
    ) -> Result<(), Box<dyn Error>> {
        let (tx, mut rx) = mpsc::channel(32);
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    ConversationEvent::MessageAppended { message, .. } if !message.is_user() => {
                        print_message(&message);
                    }
                    ConversationEvent::ResponderSkipped { persona_id, .. } => {
                        println!("({} did not respond)", persona_id);
                    }
                    _ => {}
                }
            }
        });

        let sent = self.engine.send_message_with_events(id, text, Some(tx)).await;
        printer.await?;

        if sent?.is_none() {
            println!("That conversation no longer exists.");
            self.current = None;
        } else {
            self.current = self.engine.get(id).await;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    tracing::info!("Starting Genius Minds v{}", env!("CARGO_PKG_VERSION"));

    let catalog = Arc::new(PersonaCatalog::builtin());
    let store = Arc::new(FileConversationStore::new(&config.storage.path));
    tracing::info!(path = %config.storage.path.display(), "conversation store ready");

    let mut sensay = SensayConfig::new()
        .with_base_url(&config.persona.base_url)
        .with_api_version(&config.persona.api_version)
        .with_user_id(&config.persona.user_id)
        .with_timeout(config.persona.timeout());
    if let Some(key) = &config.persona.api_key {
        sensay = sensay.with_api_key(key.expose_secret().as_str());
    }
    if !sensay.has_api_key() {
        tracing::warn!("no persona API key configured, personas will use simulated replies");
    }
    let responder = Arc::new(SensayPersonaResponder::new(sensay, Arc::clone(&catalog))?);

    let mut cerebras = CerebrasConfig::new()
        .with_base_url(&config.summarizer.base_url)
        .with_model(&config.summarizer.model)
        .with_temperature(config.summarizer.temperature)
        .with_max_tokens(config.summarizer.max_tokens)
        .with_timeout(config.summarizer.timeout());
    if let Some(key) = &config.summarizer.api_key {
        cerebras = cerebras.with_api_key(key.expose_secret().as_str());
    }
    let summarizer = Arc::new(CerebrasSummarizer::new(cerebras)?);

    let mut pdf = PandocPdfRenderer::new().with_pdf_timeout(config.export.pdf_timeout_secs);
    if let Some(path) = &config.export.pandoc_path {
        pdf = pdf.with_pandoc_path(path);
    }

    let dispatch = DispatchConfig::default()
        .with_delay_range(config.dispatch.min_delay(), config.dispatch.max_delay())
        .with_responder_timeout(config.dispatch.responder_timeout());

    let engine = ConversationEngine::new(store.clone(), responder, Arc::clone(&catalog))
        .with_dispatch(dispatch);
    let exporter = ExportPipeline::new(store, summarizer, Arc::new(pdf), catalog);

    let mut shell = Shell {
        engine,
        exporter,
        listed: Vec::new(),
        current: None,
    };

    println!("Genius Minds - talk with history's greatest minds. Type /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        match shell.handle(command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                tracing::error!(error = %err, "command failed");
                println!("Error: {}", err);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(key: &str) -> PersonaId {
        PersonaId::new(key).unwrap()
    }

    #[test]
    fn plain_text_is_sent() {
        assert_eq!(
            parse_command("  Hello there  "),
            Ok(ShellCommand::Send("Hello there".to_string()))
        );
        assert_eq!(parse_command("   "), Ok(ShellCommand::Empty));
    }

    #[test]
    fn group_takes_persona_list() {
        assert_eq!(
            parse_command("/group einstein curie"),
            Ok(ShellCommand::Group(vec![pid("einstein"), pid("curie")]))
        );
        assert_eq!(parse_command("/group"), Ok(ShellCommand::Group(vec![])));
    }

    #[test]
    fn export_parses_format_and_categories() {
        assert_eq!(
            parse_command("/export pdf Key Questions; Quotes"),
            Ok(ShellCommand::Export {
                format: ExportFormat::Pdf,
                categories: vec!["Key Questions".to_string(), "Quotes".to_string()],
            })
        );
        assert_eq!(
            parse_command("/export md"),
            Ok(ShellCommand::Export {
                format: ExportFormat::Markdown,
                categories: vec![],
            })
        );
        assert!(parse_command("/export rtf").is_err());
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(parse_command("/new").is_err());
        assert!(parse_command("/open two").is_err());
        assert!(parse_command("/rename").is_err());
        assert!(parse_command("/frobnicate").is_err());
    }
}
