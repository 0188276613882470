//! # Deep Research Chat
//!
//! Cliente de terminal para o serviço **Deep Research**: o usuário descreve a
//! empresa em texto livre, o cliente extrai os campos, pede o memo ao serviço
//! e mostra o relatório em markdown.
//!
//! ## Fluxo
//!
//! ```text
//! texto livre ──► extract ──► StructuredRequest ──► POST /research
//!                                                        │
//! transcript ◄── markdown ◄── final_report_markdown ◄────┘
//!      │
//!      └──► histórico persistido (store)
//! ```
//!
//! ## Módulos
//!
//! ### 1. Extração (`extract`)
//! Padrões fixos, sem LLM: `name:`/`company:`, `website:`, `industry:` e a
//! profundidade do memo. Campo ausente vira valor padrão; nunca falha.
//!
//! ### 2. Markdown (`markdown`)
//! Subconjunto mínimo (títulos, negrito, bullets). O HTML sai sempre escapado.
//!
//! ### 3. Sessão (`session`)
//! Máquina de estados Idle/Pending, transcript, histórico, tema e
//! notificações. O `Dispatcher` executa as pesquisas no runtime tokio.
//!
//! ### 4. TUI (`tui`)
//! Interface ratatui com histórico lateral, chat e avisos temporários.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use deep_research_chat::prelude::*;
//!
//! let config = load_chat_config();
//! let mut session = SessionController::load(Box::new(FileStore::new(&config.data_dir)), &config);
//! session.set_input("name: Acme, website: acme.com, detailed");
//! let submission = session.submit().unwrap();
//! let result = HttpReportClient::new(&config).research(&submission.request).await;
//! session.complete(submission.generation, result);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos compartilhados: mensagens, histórico, pedido estruturado e tema.
pub mod types;

/// Extração de campos a partir de texto livre.
pub mod extract;

/// Renderização do subconjunto de markdown dos relatórios.
///
/// - [`markdown::render`]: HTML seguro (escape antes de qualquer substituição)
/// - [`markdown::parse`]: blocos usados pela TUI
pub mod markdown;

/// Cliente do serviço de relatórios (`POST /research`).
///
/// Inclui o cliente HTTP real e um mock programável para testes.
pub mod report;

/// Store chave-valor durável (arquivos ou memória).
pub mod store;

/// Sessão de chat: controlador, estados, notificações e dispatcher.
pub mod session;

/// Interface de terminal (TUI).
pub mod tui;

/// Utilitários de texto.
pub mod utils;

/// Configuração via variáveis de ambiente.
///
/// **Serviço:**
/// - `REPORT_SERVICE_URL`: URL base (padrão: http://127.0.0.1:8000)
/// - `REPORT_API_KEY`: enviada em `X-API-Key` (opcional)
/// - `REPORT_TIMEOUT_SECS`: timeout (padrão: 300, `0` = sem limite)
///
/// **Cliente:**
/// - `CHAT_DATA_DIR`: histórico, tema e logs (padrão: ./data)
/// - `CHAT_TITLE_MAX_CHARS`: tamanho do título no histórico (padrão: 60)
/// - `CHAT_NOTIFICATION_MS`: duração dos avisos (padrão: 3000)
/// - `CHAT_STAGE_INTERVAL_MS`: rotação dos estágios (padrão: 1500)
///
/// Também inclui o panic hook que registra panics via `log`.
pub mod config;

// Re-exports principais
pub use config::{install_panic_hook, load_chat_config, ChatConfig};
pub use extract::extract;
pub use report::{HttpReportClient, ReportClient, ReportError, ReportOutcome};
pub use session::{Dispatcher, SessionController, SessionEvent, Submission};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust,ignore
/// use deep_research_chat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{load_chat_config, ChatConfig};
    pub use crate::extract::extract;
    pub use crate::markdown::render;
    pub use crate::report::{
        HttpReportClient, MockReply, MockReportClient, ReportClient, ReportError, ReportOutcome,
    };
    pub use crate::session::{
        Dispatcher, NotificationKind, PendingState, SessionController, SessionEvent, Submission,
    };
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::types::*;
}
