// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTADOS DA SESSÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Rótulos exibidos enquanto a pesquisa está em andamento, em ordem
pub const THINKING_STAGES: [&str; 4] = [
    "🔍 Looking for reliable resources…",
    "📚 Researching and gathering evidence…",
    "🧠 Analyzing and organizing key insights…",
    "✍️ Articulating a clear research memo…",
];

/// Estado da sessão - no máximo uma pesquisa em andamento
///
/// O índice do estágio só existe dentro de `Pending`, então não há
/// como lê-lo com a sessão ociosa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingState {
    /// Nenhuma requisição em andamento
    #[default]
    Idle,

    /// Exatamente uma requisição em andamento
    Pending {
        /// Identifica este período Pending (eventos de outro período são descartados)
        generation: u64,
        /// Índice em [`THINKING_STAGES`]
        stage: usize,
    },
}

impl PendingState {
    /// Verifica se há requisição em andamento
    pub fn is_pending(&self) -> bool {
        matches!(self, PendingState::Pending { .. })
    }

    /// Geração atual, se Pending
    pub fn generation(&self) -> Option<u64> {
        match self {
            PendingState::Pending { generation, .. } => Some(*generation),
            PendingState::Idle => None,
        }
    }

    /// Rótulo do estágio atual, se Pending
    pub fn stage_label(&self) -> Option<&'static str> {
        match self {
            PendingState::Pending { stage, .. } => Some(THINKING_STAGES[stage % THINKING_STAGES.len()]),
            PendingState::Idle => None,
        }
    }

    /// Avança o estágio ciclicamente. Retorna false se o tick é de outra geração.
    pub fn advance(&mut self, tick_generation: u64) -> bool {
        match self {
            PendingState::Pending { generation, stage } if *generation == tick_generation => {
                *stage = (*stage + 1) % THINKING_STAGES.len();
                true
            }
            _ => false,
        }
    }
}
