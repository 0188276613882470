// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NOTIFICAÇÕES TEMPORÁRIAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Fila de avisos curtos (toasts). Cada aviso expira sozinho depois do TTL,
// sem depender dos outros.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Tipo do aviso (define a cor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Informativo
    Info,
    /// Operação concluída
    Success,
    /// Falha
    Error,
}

/// Aviso exibido por tempo limitado
#[derive(Debug, Clone)]
pub struct Notification {
    /// Identificador crescente
    pub id: u64,
    /// Tipo do aviso
    pub kind: NotificationKind,
    /// Texto exibido
    pub message: String,
    /// Momento de criação (relógio monotônico)
    pub created_at: Instant,
    /// Horário local de criação, para exibição
    pub timestamp: DateTime<Local>,
}

impl Notification {
    /// Verifica se já passou do TTL em `now`
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// Fila de notificações com TTL
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl NotificationQueue {
    /// Fila vazia com o TTL dado
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            next_id: 0,
        }
    }

    /// Adiciona um aviso criado agora
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    /// Adiciona um aviso com instante de criação explícito
    pub fn push_at(&mut self, kind: NotificationKind, message: impl Into<String>, at: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            kind,
            message: message.into(),
            created_at: at,
            timestamp: Local::now(),
        });
        id
    }

    /// Remove os avisos expirados em `now`. Retorna quantos saíram.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items.retain(|n| !n.is_expired(now, ttl));
        before - self.items.len()
    }

    /// Avisos ativos, do mais antigo para o mais novo
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// TTL configurado
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Quantidade de avisos ativos
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Nenhum aviso ativo
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
