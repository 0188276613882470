// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STORE CHAVE-VALOR DURÁVEL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Armazena strings por chave. Cada escrita substitui o valor inteiro.
// Leituras com falha viram "ausente"; quem chama decide o padrão.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::{HistoryEntry, Theme};

/// Chave do histórico serializado (JSON, mais recente primeiro)
pub const HISTORY_KEY: &str = "dr_history_v2";

/// Chave do tema ("dark" | "light")
pub const THEME_KEY: &str = "dr_theme";

/// Erros de persistência
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Store durável de strings.
pub trait KeyValueStore: Send {
    /// Lê o valor. Ausente ou ilegível → None.
    fn get(&self, key: &str) -> Option<String>;

    /// Substitui o valor inteiro da chave.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BACKEND: arquivos (um arquivo por chave)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Store em disco: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Usa o diretório dado (criado na primeira escrita)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Diretório base
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Falha ao ler {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Escreve em arquivo temporário e renomeia para não deixar JSON pela metade
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BACKEND: memória (testes)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Store em memória
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Store vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pré-populado
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers de histórico e tema
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Carrega o histórico. Ausente ou corrompido → vazio.
pub fn load_history(store: &dyn KeyValueStore) -> Vec<HistoryEntry> {
    let Some(raw) = store.get(HISTORY_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("⚠️ Histórico corrompido, ignorando: {}", e);
            Vec::new()
        }
    }
}

/// Grava o histórico inteiro.
pub fn save_history(
    store: &mut dyn KeyValueStore,
    history: &[HistoryEntry],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(history)?;
    store.set(HISTORY_KEY, &json)
}

/// Carrega o tema. Ausente ou inválido → escuro.
pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    store
        .get(THEME_KEY)
        .and_then(|raw| Theme::parse(&raw))
        .unwrap_or_default()
}

/// Grava o tema.
pub fn save_theme(store: &mut dyn KeyValueStore, theme: Theme) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str())
}
