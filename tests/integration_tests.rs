//! # Testes de Integração
//!
//! Valida o fluxo completo do cliente:
//! - Texto livre → extração → serviço (mock) → transcript → histórico
//! - Persistência do histórico e do tema entre execuções (FileStore)
//! - Dispatcher com ticks de estágio e resultados vindos do runtime tokio

use deep_research_chat::config::ChatConfig;
use deep_research_chat::markdown::render;
use deep_research_chat::report::{MockReply, MockReportClient, ReportClient, ReportError, ReportOutcome};
use deep_research_chat::session::{Dispatcher, SessionController, SessionEvent, THINKING_STAGES};
use deep_research_chat::store::{FileStore, MemoryStore};
use deep_research_chat::types::{ChatTurn, MemoDepth, Theme};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

fn memory_session() -> SessionController {
    SessionController::load(Box::new(MemoryStore::new()), &ChatConfig::default())
}

async fn exchange(session: &mut SessionController, client: &dyn ReportClient, text: &str) {
    session.set_input(text);
    let submission = session.submit().expect("submission accepted");
    let result = client.research(&submission.request).await;
    assert!(session.complete(submission.generation, result));
}

// ============================================================================
// TESTE 1: Fluxo completo com o controlador
// ============================================================================

#[tokio::test]
async fn test_question_to_history() {
    let client = MockReportClient::with_replies([MockReply::Report(
        "# Acme\n**Revenue**: 10M\n- retail".into(),
    )]);
    let mut session = memory_session();

    exchange(
        &mut session,
        &client,
        "name: Acme, website: acme.com, industry: retail, detailed",
    )
    .await;

    let sent = client.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].company_name, "Acme");
    assert_eq!(sent[0].website, "acme.com");
    assert_eq!(sent[0].industry, "retail");
    assert_eq!(sent[0].memo_depth, MemoDepth::Detailed);

    assert_eq!(session.transcript().len(), 2);
    let entry = &session.history()[0];
    assert_eq!(entry.question, "name: Acme, website: acme.com, industry: retail, detailed");
    assert_eq!(session.active(), Some(entry.id));

    assert_eq!(
        render(&entry.result),
        "<h1>Acme</h1>\n<p><strong>Revenue</strong>: 10M</p>\n<p>• retail</p>"
    );
}

#[tokio::test]
async fn test_many_successes_newest_first() {
    let client = MockReportClient::new();
    let mut session = memory_session();

    for name in ["One", "Two", "Three", "Four"] {
        exchange(&mut session, &client, &format!("company: {name}")).await;
    }

    let history = session.history();
    assert_eq!(history.len(), 4);
    let questions: Vec<_> = history.iter().map(|e| e.question.as_str()).collect();
    assert_eq!(
        questions,
        vec!["company: Four", "company: Three", "company: Two", "company: One"]
    );
    assert!(history.windows(2).all(|pair| pair[0].id > pair[1].id));
    assert_eq!(history[0].result, "# Four\nMock report");
}

#[tokio::test]
async fn test_failures_leave_history_untouched() {
    let client = MockReportClient::with_replies([
        MockReply::Status(502),
        MockReply::Network,
        MockReply::Missing,
    ]);
    let mut session = memory_session();

    exchange(&mut session, &client, "company: A").await;
    exchange(&mut session, &client, "company: B").await;
    assert!(session.history().is_empty());
    assert_eq!(session.transcript().len(), 4);
    assert_eq!(
        session.transcript()[1],
        ChatTurn::assistant("❌ Error: Could not fetch report.")
    );

    exchange(&mut session, &client, "company: C").await;
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].result, "No report returned.");
}

#[test]
fn test_submit_while_pending_keeps_transcript() {
    let mut session = memory_session();
    session.set_input("company: First");
    let first = session.submit().unwrap();

    for attempt in ["company: Second", "company: Third"] {
        session.set_input(attempt);
        assert!(session.submit().is_none());
        assert_eq!(session.transcript().len(), 1);
    }

    session.complete(first.generation, Err(ReportError::Timeout));
    assert!(!session.is_pending());
}

#[tokio::test]
async fn test_select_then_new_session_then_clear() {
    let client = MockReportClient::new();
    let mut session = memory_session();
    exchange(&mut session, &client, "company: A").await;
    exchange(&mut session, &client, "company: B").await;

    let older = session.history()[1].id;
    assert!(session.select_history(older));
    assert_eq!(session.transcript()[0].content, "company: A");

    session.new_session();
    assert!(session.transcript().is_empty());
    assert_eq!(session.active(), None);

    assert!(session.select_history(older));
    assert!(session.clear_history());
    assert!(session.history().is_empty());
    assert!(session.transcript().is_empty());
    assert_eq!(session.active(), None);
}

// ============================================================================
// TESTE 2: Persistência entre execuções
// ============================================================================

#[tokio::test]
async fn test_history_and_theme_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = ChatConfig {
        data_dir: dir.path().to_path_buf(),
        ..ChatConfig::default()
    };
    let client = MockReportClient::new();

    {
        let mut session =
            SessionController::load(Box::new(FileStore::new(&config.data_dir)), &config);
        exchange(&mut session, &client, "company: Persisted").await;
        session.toggle_theme();
    }

    let session = SessionController::load(Box::new(FileStore::new(&config.data_dir)), &config);
    assert_eq!(session.theme(), Theme::Light);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].question, "company: Persisted");
    assert!(session.transcript().is_empty());
    assert_eq!(session.active(), None);
}

#[test]
fn test_corrupt_files_start_clean() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dr_history_v2.json"), "[{\"id\":").unwrap();
    std::fs::write(dir.path().join("dr_theme.json"), "sepia").unwrap();

    let session =
        SessionController::load(Box::new(FileStore::new(dir.path())), &ChatConfig::default());
    assert!(session.history().is_empty());
    assert_eq!(session.theme(), Theme::Dark);
}

// ============================================================================
// TESTE 3: Dispatcher + runtime
// ============================================================================

fn drain_until_idle(
    dispatcher: &mut Dispatcher,
    session: &mut SessionController,
    rx: &Receiver<SessionEvent>,
) -> Vec<&'static str> {
    let mut labels = Vec::new();
    while session.is_pending() {
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("session event before timeout");
        dispatcher.handle(session, event);
        if let Some(label) = session.stage_label() {
            labels.push(label);
        }
    }
    labels
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dispatcher_rotates_stages_until_report() {
    let client = Arc::new(
        MockReportClient::with_replies([MockReply::Report("# Done".into())])
            .with_delay(Duration::from_millis(150)),
    );
    let (tx, rx) = mpsc::channel();
    let mut dispatcher = Dispatcher::new(
        client.clone(),
        tokio::runtime::Handle::current(),
        tx,
        Duration::from_millis(20),
    );
    let mut session = memory_session();

    session.set_input("company: Ticker, brief");
    assert!(dispatcher.submit(&mut session));
    assert_eq!(session.stage_label(), Some(THINKING_STAGES[0]));

    let labels =
        tokio::task::block_in_place(|| drain_until_idle(&mut dispatcher, &mut session, &rx));

    assert!(!labels.is_empty());
    assert_eq!(labels[0], THINKING_STAGES[1]);
    assert!(!dispatcher.is_ticking());
    assert_eq!(session.history()[0].result, "# Done");
    assert_eq!(client.requests()[0].memo_depth, MemoDepth::Brief);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_session_during_pending_still_records_result() {
    let client = Arc::new(MockReportClient::new().with_delay(Duration::from_millis(50)));
    let (tx, rx) = mpsc::channel();
    let mut dispatcher = Dispatcher::new(
        client,
        tokio::runtime::Handle::current(),
        tx,
        Duration::from_millis(20),
    );
    let mut session = memory_session();

    session.set_input("company: Late");
    dispatcher.submit(&mut session);
    session.new_session();
    assert!(session.transcript().is_empty());

    tokio::task::block_in_place(|| drain_until_idle(&mut dispatcher, &mut session, &rx));

    assert_eq!(
        session.transcript(),
        &[ChatTurn::assistant("# Late\nMock report")]
    );
    assert_eq!(session.history()[0].question, "company: Late");
}

#[test]
fn test_stale_events_are_ignored() {
    let mut session = memory_session();
    session.set_input("company: A");
    let first = session.submit().unwrap();
    session.complete(first.generation, Err(ReportError::Status(500)));

    session.set_input("company: B");
    let second = session.submit().unwrap();

    assert!(!session.advance_stage(first.generation));
    assert!(!session.complete(first.generation, Ok(ReportOutcome::Report("old".into()))));
    assert_eq!(session.stage_label(), Some(THINKING_STAGES[0]));

    assert!(session.complete(second.generation, Ok(ReportOutcome::Report("new".into()))));
    assert_eq!(session.history()[0].result, "new");
}
