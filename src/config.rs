// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO CLIENTE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configurações do serviço de relatórios, armazenamento e tempos da UI.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::path::PathBuf;
use std::time::Duration;

/// URL padrão do serviço (FastAPI local)
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Timeout padrão da requisição de pesquisa
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Tamanho máximo do título no histórico (em caracteres)
pub const DEFAULT_TITLE_MAX_CHARS: usize = 60;

/// Tempo de vida das notificações
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Intervalo de rotação dos estágios "pensando"
pub const DEFAULT_STAGE_INTERVAL_MS: u64 = 1500;

/// Configuração do cliente de chat.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// URL base do serviço (sem `/research`)
    pub service_url: String,

    /// Chave enviada em `X-API-Key` (opcional)
    pub api_key: Option<String>,

    /// Timeout da requisição. None = sem limite.
    pub request_timeout: Option<Duration>,

    /// Diretório do store e dos logs
    pub data_dir: PathBuf,

    /// Títulos maiores que isso são truncados com "…"
    pub title_max_chars: usize,

    /// Tempo até uma notificação sumir
    pub notification_ttl: Duration,

    /// Intervalo entre estágios enquanto Pending
    pub stage_interval: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            api_key: None,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            data_dir: PathBuf::from("data"),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            stage_interval: Duration::from_millis(DEFAULT_STAGE_INTERVAL_MS),
        }
    }
}

impl ChatConfig {
    /// Cria configuração padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diretório dos logs (`<data_dir>/logs`)
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Carrega a configuração a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `REPORT_SERVICE_URL`: URL base do serviço (padrão: http://127.0.0.1:8000)
/// - `REPORT_API_KEY`: chave enviada em `X-API-Key` (opcional)
/// - `REPORT_TIMEOUT_SECS`: timeout da pesquisa (padrão: 300, `0` = sem limite)
/// - `CHAT_DATA_DIR`: diretório do histórico e logs (padrão: ./data)
/// - `CHAT_TITLE_MAX_CHARS`: tamanho do título (padrão: 60)
/// - `CHAT_NOTIFICATION_MS`: duração das notificações (padrão: 3000)
/// - `CHAT_STAGE_INTERVAL_MS`: rotação dos estágios (padrão: 1500)
///
/// Valores inválidos são ignorados (mantém o padrão).
pub fn load_chat_config() -> ChatConfig {
    load_chat_config_from(|key| std::env::var(key).ok())
}

/// Mesmo que [`load_chat_config`], lendo de uma função arbitrária.
pub fn load_chat_config_from<F>(get: F) -> ChatConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ChatConfig::default();

    if let Some(url) = get("REPORT_SERVICE_URL").filter(|u| !u.trim().is_empty()) {
        config.service_url = url.trim().to_string();
        log::info!("📦 REPORT_SERVICE_URL={}", config.service_url);
    }

    if let Some(key) = get("REPORT_API_KEY").filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(key.trim().to_string());
        log::info!("📦 REPORT_API_KEY definido");
    }

    if let Some(secs) = parse_var::<u64>(&get, "REPORT_TIMEOUT_SECS") {
        config.request_timeout = if secs == 0 {
            None
        } else {
            Some(Duration::from_secs(secs))
        };
        log::info!("📦 REPORT_TIMEOUT_SECS={}", secs);
    }

    if let Some(dir) = get("CHAT_DATA_DIR").filter(|d| !d.trim().is_empty()) {
        config.data_dir = PathBuf::from(dir.trim());
        log::info!("📦 CHAT_DATA_DIR={}", config.data_dir.display());
    }

    if let Some(chars) = parse_var::<usize>(&get, "CHAT_TITLE_MAX_CHARS").filter(|c| *c > 0) {
        config.title_max_chars = chars;
    }

    if let Some(ms) = parse_var::<u64>(&get, "CHAT_NOTIFICATION_MS").filter(|ms| *ms > 0) {
        config.notification_ttl = Duration::from_millis(ms);
    }

    if let Some(ms) = parse_var::<u64>(&get, "CHAT_STAGE_INTERVAL_MS").filter(|ms| *ms > 0) {
        config.stage_interval = Duration::from_millis(ms);
    }

    config
}

fn parse_var<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = get(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("⚠️ {}={:?} inválido, usando padrão", key, raw);
            None
        }
    }
}

/// Instala panic hook que registra o panic via `log`.
///
/// Com a TUI ativa o terminal está em raw mode; escrever o panic em
/// stderr corromperia a tela, então a mensagem vai para o arquivo de log.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(move |panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        log::error!("[PANIC] Thread {} at {}: {}", thread_name, location, message);
    }));
}
