// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DEEP RESEARCH CHAT CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Cliente de terminal do serviço de relatórios.
//
// Uso:
//   deep-research-chat                          (modo TUI interativo)
//   deep-research-chat --extract "name: Acme, brief"
//   deep-research-chat --once "company: Globex, detailed"
//   deep-research-chat --once --html "company: Globex"
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::Context;
use deep_research_chat::config::{install_panic_hook, load_chat_config, ChatConfig};
use deep_research_chat::markdown;
use deep_research_chat::report::{HttpReportClient, ReportClient};
use deep_research_chat::session::{Dispatcher, SessionController};
use deep_research_chat::store::FileStore;
use deep_research_chat::tui::{create_event_channel, run_tui, App};
use std::path::PathBuf;
use std::sync::Arc;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [PathBuf::from(".env"), PathBuf::from("../.env")];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => return,
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    // Última tentativa: dotenvy padrão (sobe os diretórios)
    let _ = dotenvy::dotenv();
}

/// Modo de execução escolhido pelos argumentos
enum Mode {
    Tui,
    Extract(String),
    Once { text: String, html: bool },
    Help,
}

fn parse_args(args: &[String]) -> Mode {
    match args.first().map(String::as_str) {
        None => Mode::Tui,
        Some("--help") | Some("-h") => Mode::Help,
        Some("--extract") if args.len() >= 2 => Mode::Extract(args[1..].join(" ")),
        Some("--once") => {
            let html = args.get(1).map(String::as_str) == Some("--html");
            let rest = if html { &args[2..] } else { &args[1..] };
            if rest.is_empty() {
                Mode::Help
            } else {
                Mode::Once {
                    text: rest.join(" "),
                    html,
                }
            }
        }
        Some(_) => Mode::Help,
    }
}

fn print_usage(program: &str) {
    eprintln!("Deep Research Chat v{}", deep_research_chat::VERSION);
    eprintln!();
    eprintln!("Uso: {}", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  (sem argumentos)        Modo TUI interativo");
    eprintln!("  --extract <texto>       Mostra os campos extraídos em JSON");
    eprintln!("  --once [--html] <texto> Executa uma pesquisa e imprime o relatório");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} --extract \"name: Acme, website: acme.com, brief\"", program);
    eprintln!("  {} --once \"company: Globex, industry: energy, detailed\"", program);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    let args: Vec<String> = std::env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "deep-research-chat".into());
    let mode = parse_args(args.get(1..).unwrap_or_default());

    match mode {
        Mode::Help => {
            print_usage(&program);
            std::process::exit(1);
        }
        Mode::Extract(text) => {
            init_stderr_logger("warn");
            let request = deep_research_chat::extract(&text);
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
        Mode::Once { text, html } => {
            init_stderr_logger("info");
            let config = load_chat_config();
            run_once_mode(&config, text, html).await
        }
        Mode::Tui => {
            let config = load_chat_config();
            init_file_logger(&config)?;
            install_panic_hook();
            run_tui_mode(&config)
        }
    }
}

/// Logger padrão em stderr
fn init_stderr_logger(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Logger em `<data_dir>/logs/chat.log` (a TUI ocupa o terminal)
fn init_file_logger(config: &ChatConfig) -> anyhow::Result<()> {
    let logs_dir = config.logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("não foi possível criar {}", logs_dir.display()))?;

    let log_path = logs_dir.join("chat.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("não foi possível abrir {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Uma pesquisa completa pelo controlador, sem TUI
async fn run_once_mode(config: &ChatConfig, text: String, html: bool) -> anyhow::Result<()> {
    let store = FileStore::new(config.data_dir.clone());
    let mut session = SessionController::load(Box::new(store), config);
    let client = HttpReportClient::new(config);

    session.set_input(text);
    let Some(submission) = session.submit() else {
        anyhow::bail!("pergunta vazia");
    };

    eprintln!("📨 {}", client.endpoint());
    eprintln!(
        "🔎 company={} website={} industry={} depth={}",
        submission.request.company_name,
        submission.request.website,
        submission.request.industry,
        submission.request.memo_depth
    );

    let result = client.research(&submission.request).await;
    let failed = result.is_err();
    session.complete(submission.generation, result);

    let report = session
        .transcript()
        .last()
        .map(|turn| turn.content.clone())
        .unwrap_or_default();

    if html {
        println!("{}", markdown::render(&report));
    } else {
        println!("{}", report);
    }

    if failed {
        std::process::exit(2);
    }
    Ok(())
}

fn run_tui_mode(config: &ChatConfig) -> anyhow::Result<()> {
    log::info!("🚀 Deep Research Chat v{} | serviço {}", deep_research_chat::VERSION, config.service_url);

    let store = FileStore::new(config.data_dir.clone());
    let controller = SessionController::load(Box::new(store), config);
    let client: Arc<dyn ReportClient> = Arc::new(HttpReportClient::new(config));

    let (tx, rx) = create_event_channel();
    let mut dispatcher = Dispatcher::new(
        client,
        tokio::runtime::Handle::current(),
        tx,
        config.stage_interval,
    );
    let mut app = App::new(controller);

    // Executar TUI (bloqueia até o usuário sair)
    tokio::task::block_in_place(|| run_tui(&mut app, &mut dispatcher, rx))
        .context("falha no terminal")?;

    log::info!("👋 TUI encerrada");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(parse_args(&[]), Mode::Tui));
        assert!(matches!(parse_args(&args(&["--help"])), Mode::Help));
        assert!(matches!(parse_args(&args(&["--extract"])), Mode::Help));
        assert!(matches!(parse_args(&args(&["--once", "--html"])), Mode::Help));

        match parse_args(&args(&["--extract", "name:", "Acme"])) {
            Mode::Extract(text) => assert_eq!(text, "name: Acme"),
            _ => panic!("expected extract mode"),
        }
        match parse_args(&args(&["--once", "--html", "company: Globex"])) {
            Mode::Once { text, html } => {
                assert_eq!(text, "company: Globex");
                assert!(html);
            }
            _ => panic!("expected once mode"),
        }
    }
}
