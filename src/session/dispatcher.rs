// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DISPATCHER: PONTE ENTRE O CONTROLADOR E O RUNTIME ASYNC
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// O controlador é síncrono e vive na thread da UI. O Dispatcher:
// - dispara a pesquisa como task tokio
// - mantém o StageTicker enquanto Pending
// - aplica os eventos que chegam pelo canal (ticks e resultados)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::report::{ReportClient, ReportError, ReportOutcome};
use crate::session::controller::SessionController;
use crate::session::ticker::StageTicker;

/// Eventos entregues à thread da UI
#[derive(Debug)]
pub enum SessionEvent {
    /// Hora de avançar o estágio
    StageTick {
        /// Geração que originou o tick
        generation: u64,
    },
    /// Pesquisa terminou
    ReportFinished {
        /// Geração da pesquisa
        generation: u64,
        /// Resultado do serviço
        result: Result<ReportOutcome, ReportError>,
    },
}

/// Executa pesquisas e entrega os eventos ao controlador
pub struct Dispatcher {
    client: Arc<dyn ReportClient>,
    runtime: Handle,
    tx: Sender<SessionEvent>,
    stage_interval: Duration,
    ticker: Option<StageTicker>,
}

impl Dispatcher {
    /// Cria o dispatcher. Os eventos saem por `tx`.
    pub fn new(
        client: Arc<dyn ReportClient>,
        runtime: Handle,
        tx: Sender<SessionEvent>,
        stage_interval: Duration,
    ) -> Self {
        Self {
            client,
            runtime,
            tx,
            stage_interval,
            ticker: None,
        }
    }

    /// Envia a entrada atual do controlador.
    ///
    /// Retorna false se o controlador recusou (entrada vazia ou já Pending).
    pub fn submit(&mut self, controller: &mut SessionController) -> bool {
        let Some(submission) = controller.submit() else {
            return false;
        };
        let generation = submission.generation;

        self.ticker = Some(StageTicker::start(
            &self.runtime,
            self.stage_interval,
            generation,
            self.tx.clone(),
        ));

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = client.research(&submission.request).await;
            if tx
                .send(SessionEvent::ReportFinished { generation, result })
                .is_err()
            {
                log::debug!("Resultado #{} sem receptor", generation);
            }
        });
        true
    }

    /// Aplica um evento ao controlador.
    ///
    /// Ao sair de Pending o ticker é descartado (e a task abortada).
    pub fn handle(&mut self, controller: &mut SessionController, event: SessionEvent) {
        match event {
            SessionEvent::StageTick { generation } => {
                controller.advance_stage(generation);
            }
            SessionEvent::ReportFinished { generation, result } => {
                controller.complete(generation, result);
            }
        }

        if !controller.is_pending() {
            self.ticker = None;
        }
    }

    /// Verifica se há ticker ativo
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }
}
