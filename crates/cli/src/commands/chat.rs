//! `agenrp chat`: Interactive or single-message chat over reference documents.

use agenrp_agent::{ChatSession, ContextComposer, notices};
use agenrp_config::AppConfig;
use agenrp_core::Error;
use agenrp_core::message::{ConversationMessage, Role};
use agenrp_storage::{SupabaseStore, load_image_attachment, load_local_document, load_remote_documents};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::warn;

pub struct ChatArgs {
    pub documents: Vec<PathBuf>,
    pub remote: bool,
    pub image: Option<PathBuf>,
    pub message: Option<String>,
    pub api_key: Option<String>,
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Exit,
    Help,
    Docs,
    Add(PathBuf),
    Remove(String),
    Image(PathBuf),
    Say(String),
    Empty,
}

fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
        return Command::Exit;
    }

    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match head {
        "/help" => Command::Help,
        "/docs" => Command::Docs,
        "/add" if !rest.is_empty() => Command::Add(PathBuf::from(rest)),
        "/remove" if !rest.is_empty() => Command::Remove(rest.to_string()),
        "/image" if !rest.is_empty() => Command::Image(PathBuf::from(rest)),
        "/add" | "/remove" | "/image" => Command::Help,
        _ => Command::Say(line.to_string()),
    }
}

/// Build a session from configuration. A missing key is not fatal: the
/// session answers with the key-required notice until one is supplied.
fn build_session(
    config: &AppConfig,
    api_key: Option<String>,
) -> Result<ChatSession, Box<dyn std::error::Error>> {
    let composer = match config.grounding.load_policy()? {
        Some(policy) => ContextComposer::new(policy),
        None => ContextComposer::with_default_policy(),
    };

    let mut session = ChatSession::new(&config.model)
        .with_temperature(config.temperature)
        .with_composer(composer)
        .with_welcome(config.grounding.welcome);

    match agenrp_providers::build_from_config(config, api_key) {
        Ok(provider) => session.set_provider(Some(provider)),
        Err(Error::MissingCredential) => warn!("No API key available; replies will ask for one"),
        Err(e) => return Err(e.into()),
    }
    Ok(session)
}

fn print_entry(entry: &ConversationMessage) {
    let label = match entry.role {
        Role::User => "You",
        Role::Model => "Agen RP",
        Role::System => "Sistem",
    };
    println!("\n  {label} > {}\n", entry.content);
}

fn print_documents(session: &ChatSession) {
    if session.documents().is_empty() {
        println!("  (tiada dokumen dimuat naik)");
        return;
    }
    for doc in session.documents().iter() {
        println!("  [{}] {} ({}, {:?})", doc.id, doc.name, doc.mime_type, doc.source);
    }
}

async fn add_local(session: &mut ChatSession, path: &std::path::Path) -> agenrp_core::Result<()> {
    let document = load_local_document(path).await?;
    let (id, name) = (document.id.clone(), document.name.clone());
    session.add_document(document)?;
    println!("  ✅ {name} dimuat naik [{id}]");
    Ok(())
}

async fn add_remote(session: &mut ChatSession, config: &AppConfig) -> agenrp_core::Result<()> {
    let store = SupabaseStore::new(config.backend.resolve(None, None)?);
    let loaded = load_remote_documents(&store).await?;
    for failed in &loaded.failed {
        eprintln!("  ⚠️  {} tidak dapat dimuat turun: {}", failed.name, failed.error);
    }
    for document in loaded.documents {
        let name = document.name.clone();
        if let Err(e) = session.add_document(document) {
            eprintln!("  ⚠️  {name} diabaikan: {e}");
        }
    }
    Ok(())
}

pub async fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut session = build_session(&config, args.api_key)?;

    for path in &args.documents {
        add_local(&mut session, path).await?;
    }
    if args.remote {
        add_remote(&mut session, &config).await?;
    }

    if let Some(message) = args.message {
        // Single message mode
        let image = match &args.image {
            Some(path) => Some(load_image_attachment(path).await?),
            None => None,
        };
        eprint!("  Sedang menjana...");
        let entry = session.send(&message, image).await?;
        eprint!("\r                    \r");
        println!("{}", entry.content);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║      {} — {}     ║", notices::APP_NAME, notices::APP_SUBTITLE);
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", session.model());
    println!("  Dokumen:   {}", session.documents().len());
    if !session.has_provider() {
        println!("  Kunci API: tiada (agenrp config set-key <KEY>)");
    }
    println!();
    println!("  /add FILE, /remove ID, /docs, /image FILE, exit");
    println!("  Contoh soalan:");
    for question in notices::EXAMPLE_QUESTIONS {
        println!("    • {question}");
    }
    for entry in session.visible_messages() {
        print_entry(entry);
    }

    // An --image given without -m rides along with the first message.
    let mut pending_image = match &args.image {
        Some(path) => Some(load_image_attachment(path).await?),
        None => None,
    };

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            Command::Empty => continue,
            Command::Exit => break,
            Command::Help => println!("  /add FILE, /remove ID, /docs, /image FILE, exit"),
            Command::Docs => print_documents(&session),
            Command::Add(path) => {
                if let Err(e) = add_local(&mut session, &path).await {
                    eprintln!("  ⚠️  {e}");
                }
            }
            Command::Remove(id) => match session.remove_document(&id) {
                Some(doc) => println!("  🗑️  {} dibuang", doc.name),
                None => println!("  Tiada dokumen dengan id {id}"),
            },
            Command::Image(path) => match load_image_attachment(&path).await {
                Ok(uri) => {
                    pending_image = Some(uri);
                    println!("  📎 Imej akan dihantar bersama mesej seterusnya");
                }
                Err(e) => eprintln!("  ⚠️  {e}"),
            },
            Command::Say(text) => {
                eprint!("  ...");
                let result = session.send(&text, pending_image.take()).await;
                eprint!("\r     \r");
                match result {
                    Ok(entry) => print_entry(entry),
                    Err(e) => eprintln!("  ⚠️  {}", notices::describe_failure(&e)),
                }
            }
        }
    }

    println!("\n  Terima kasih. 👋");
    Ok(())
}
