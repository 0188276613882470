// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONTROLADOR DA SESSÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Dono de todo o estado do chat: transcript, histórico, seleção, entrada,
// estado Pending, tema e notificações.
//
// Fluxo:
// ┌──────┐ submit()  ┌─────────┐ complete() ┌──────┐
// │ Idle │ ────────► │ Pending │ ─────────► │ Idle │
// └──────┘           └─────────┘            └──────┘
//
// Não faz I/O de rede. Quem chama (Dispatcher ou `--once`) executa a
// pesquisa e devolve o resultado com a geração recebida em `submit()`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

use crate::config::ChatConfig;
use crate::extract::extract;
use crate::report::{ReportError, ReportOutcome};
use crate::session::notify::{NotificationKind, NotificationQueue};
use crate::session::state::PendingState;
use crate::store::{self, KeyValueStore};
use crate::types::{ChatTurn, HistoryEntry, StructuredRequest, Theme};
use crate::utils::truncate_title;

/// Aviso ao entrar em Pending
pub const MSG_STARTED: &str = "Research started…";
/// Aviso de sucesso
pub const MSG_COMPLETE: &str = "Research complete ✅";
/// Mensagem do assistente em caso de falha
pub const MSG_FETCH_FAILED: &str = "❌ Error: Could not fetch report.";
/// Aviso de falha
pub const MSG_API_ERROR: &str = "Error while calling the API. Please try again.";
/// Aviso após limpar o histórico
pub const MSG_HISTORY_CLEARED: &str = "History cleared.";

/// Pesquisa aceita por `submit()`, a ser executada por quem chamou
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Geração do período Pending aberto
    pub generation: u64,
    /// Texto original do usuário
    pub question: String,
    /// Campos extraídos da pergunta
    pub request: StructuredRequest,
}

/// Controlador da sessão de chat
pub struct SessionController {
    store: Box<dyn KeyValueStore>,
    transcript: Vec<ChatTurn>,
    history: Vec<HistoryEntry>,
    active: Option<i64>,
    input: String,
    pending: PendingState,
    /// Pergunta em andamento (vira `question` do HistoryEntry)
    pending_question: Option<String>,
    generation: u64,
    theme: Theme,
    notifications: NotificationQueue,
    title_max_chars: usize,
}

impl SessionController {
    /// Carrega histórico e tema do store.
    ///
    /// Valores ausentes ou corrompidos viram histórico vazio e tema escuro.
    pub fn load(store: Box<dyn KeyValueStore>, config: &ChatConfig) -> Self {
        let history = store::load_history(store.as_ref());
        let theme = store::load_theme(store.as_ref());
        log::info!(
            "📂 Sessão carregada: {} entradas no histórico, tema {}",
            history.len(),
            theme
        );

        Self {
            store,
            transcript: Vec::new(),
            history,
            active: None,
            input: String::new(),
            pending: PendingState::Idle,
            pending_question: None,
            generation: 0,
            theme,
            notifications: NotificationQueue::new(config.notification_ttl),
            title_max_chars: config.title_max_chars,
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // ACESSO AO ESTADO
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Mensagens exibidas
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Histórico, mais recente primeiro
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Entrada selecionada (ou criada por último)
    pub fn active(&self) -> Option<i64> {
        self.active
    }

    /// Estado Pending atual
    pub fn pending(&self) -> PendingState {
        self.pending
    }

    /// Atalho para `pending().is_pending()`
    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Rótulo do estágio atual, se Pending
    pub fn stage_label(&self) -> Option<&'static str> {
        self.pending.stage_label()
    }

    /// Tema atual
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Notificações ativas
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Texto em edição
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Texto em edição (mutável, para a UI editar)
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Substitui o texto em edição
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // CICLO DA PESQUISA
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Envia o texto em edição.
    ///
    /// No-op (retorna `None`) com entrada em branco ou se já estiver Pending.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.pending.is_pending() {
            log::debug!("Submit ignorado: pesquisa em andamento");
            return None;
        }
        if self.input.trim().is_empty() {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        let request = extract(&question);

        self.generation += 1;
        self.pending = PendingState::Pending {
            generation: self.generation,
            stage: 0,
        };
        self.transcript.push(ChatTurn::user(question.clone()));
        self.pending_question = Some(question.clone());
        self.notifications.push(NotificationKind::Info, MSG_STARTED);

        log::info!(
            "🔎 Pesquisa #{} iniciada: company={} depth={}",
            self.generation,
            request.company_name,
            request.memo_depth
        );

        Some(Submission {
            generation: self.generation,
            question,
            request,
        })
    }

    /// Avança o estágio "pensando". Ticks de outra geração são ignorados.
    pub fn advance_stage(&mut self, generation: u64) -> bool {
        self.pending.advance(generation)
    }

    /// Aplica o resultado da pesquisa da geração dada.
    ///
    /// Retorna false (sem efeito) se a geração não é a do período Pending atual.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<ReportOutcome, ReportError>,
    ) -> bool {
        if self.pending.generation() != Some(generation) {
            log::debug!("Resultado descartado: geração {} obsoleta", generation);
            return false;
        }

        self.pending = PendingState::Idle;
        let question = self.pending_question.take().unwrap_or_default();

        match result {
            Ok(outcome) => {
                let report = outcome.into_text();
                self.transcript.push(ChatTurn::assistant(report.clone()));

                let entry = HistoryEntry {
                    id: self.next_entry_id(),
                    title: truncate_title(&question, self.title_max_chars),
                    question,
                    result: report,
                };
                self.active = Some(entry.id);
                self.history.insert(0, entry);
                self.persist_history();

                self.notifications.push(NotificationKind::Success, MSG_COMPLETE);
                log::info!("✅ Pesquisa #{} concluída", generation);
            }
            Err(err) => {
                log::warn!("❌ Pesquisa #{} falhou: {}", generation, err);
                self.transcript.push(ChatTurn::assistant(MSG_FETCH_FAILED));
                self.notifications.push(NotificationKind::Error, MSG_API_ERROR);
            }
        }
        true
    }

    /// Timestamp em ms, sempre maior que o id mais recente
    fn next_entry_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        match self.history.iter().map(|e| e.id).max() {
            Some(newest) if newest >= now => newest + 1,
            _ => now,
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // TRANSIÇÕES AUXILIARES
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Nova sessão: limpa transcript, seleção e entrada.
    ///
    /// Uma pesquisa em andamento continua e seu resultado ainda entra no
    /// transcript e no histórico.
    pub fn new_session(&mut self) {
        self.transcript.clear();
        self.active = None;
        self.input.clear();
    }

    /// Mostra uma entrada do histórico. Id desconhecido → false.
    pub fn select_history(&mut self, id: i64) -> bool {
        let Some(entry) = self.history.iter().find(|e| e.id == id) else {
            return false;
        };
        self.transcript = vec![
            ChatTurn::user(entry.question.clone()),
            ChatTurn::assistant(entry.result.clone()),
        ];
        self.active = Some(id);
        true
    }

    /// Apaga o histórico. No-op com histórico vazio.
    pub fn clear_history(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        self.history.clear();
        self.persist_history();
        self.transcript.clear();
        self.active = None;
        self.notifications.push(NotificationKind::Info, MSG_HISTORY_CLEARED);
        log::info!("🗑️ Histórico apagado");
        true
    }

    /// Alterna escuro/claro e persiste
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = store::save_theme(self.store.as_mut(), self.theme) {
            log::warn!("⚠️ Falha ao salvar tema: {}", e);
        }
        self.theme
    }

    /// Remove notificações expiradas em `now`
    pub fn prune_notifications(&mut self, now: Instant) -> usize {
        self.notifications.prune(now)
    }

    /// TTL das notificações
    pub fn notification_ttl(&self) -> Duration {
        self.notifications.ttl()
    }

    fn persist_history(&mut self) {
        if let Err(e) = store::save_history(self.store.as_mut(), &self.history) {
            log::warn!("⚠️ Falha ao salvar histórico: {}", e);
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("transcript", &self.transcript.len())
            .field("history", &self.history.len())
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("theme", &self.theme)
            .finish()
    }
}
