//! Ticker dos estágios "pensando".
//!
//! Task tokio que envia um `StageTick` a cada intervalo. A task vive
//! enquanto o guard existir; `Drop` aborta.

use std::sync::mpsc::Sender;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::session::dispatcher::SessionEvent;

/// Guard da task de ticks
#[derive(Debug)]
pub struct StageTicker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl StageTicker {
    /// Inicia os ticks da geração dada. O primeiro tick sai após `period`.
    pub fn start(runtime: &Handle, period: Duration, generation: u64, tx: Sender<SessionEvent>) -> Self {
        let handle = runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if tx.send(SessionEvent::StageTick { generation }).is_err() {
                    // Receptor fechado (UI encerrou)
                    break;
                }
            }
        });

        Self { generation, handle }
    }

    /// Geração atendida por este ticker
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for StageTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
