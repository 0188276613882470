// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DO SERVIÇO DE RELATÓRIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para `POST /research`.
// O serviço é opaco: recebe um StructuredRequest e devolve
// `{ "final_report_markdown": "..." }`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::types::StructuredRequest;

/// Texto usado quando a resposta não traz um relatório em string
pub const NO_REPORT_FALLBACK: &str = "No report returned.";

/// Erros do cliente de relatórios
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ReportError::Timeout
        } else if err.is_decode() {
            ReportError::Parse(err.to_string())
        } else {
            ReportError::Network(err.to_string())
        }
    }
}

/// Relatório devolvido pelo serviço
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// `final_report_markdown` presente e do tipo string
    Report(String),
    /// Resposta 2xx sem relatório utilizável
    Missing,
}

impl ReportOutcome {
    /// Interpreta o JSON da resposta
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value.get("final_report_markdown") {
            Some(serde_json::Value::String(text)) => Self::Report(text.clone()),
            _ => Self::Missing,
        }
    }

    /// Texto exibido no chat (com fallback)
    pub fn into_text(self) -> String {
        match self {
            Self::Report(text) => text,
            Self::Missing => NO_REPORT_FALLBACK.to_string(),
        }
    }
}

/// Trait principal para clientes do serviço de relatórios
///
/// Permite trocar o backend HTTP real por um mock nos testes.
#[async_trait]
pub trait ReportClient: Send + Sync {
    /// Executa uma pesquisa e aguarda o relatório
    async fn research(&self, request: &StructuredRequest) -> Result<ReportOutcome, ReportError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO HTTP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente HTTP para o serviço de relatórios
pub struct HttpReportClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpReportClient {
    /// Cria o cliente a partir da configuração.
    ///
    /// `request_timeout = None` deixa a requisição sem limite.
    pub fn new(config: &ChatConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            endpoint: format!("{}/research", config.service_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            client: builder.build().unwrap_or_default(),
        }
    }

    /// URL completa de `POST /research`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportClient for HttpReportClient {
    async fn research(&self, request: &StructuredRequest) -> Result<ReportOutcome, ReportError> {
        log::info!(
            "📨 POST {} | company={} depth={}",
            self.endpoint,
            request.company_name,
            request.memo_depth
        );

        let mut http = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            http = http.header("X-API-Key", key);
        }

        let response = http.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("❌ Serviço respondeu HTTP {}", status.as_u16());
            return Err(ReportError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ReportError::Parse(e.to_string()))?;

        let outcome = ReportOutcome::from_json(&value);
        match &outcome {
            ReportOutcome::Report(text) => log::info!("✅ Relatório recebido ({} chars)", text.len()),
            ReportOutcome::Missing => log::warn!("⚠️ Resposta sem final_report_markdown"),
        }
        Ok(outcome)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resposta programada do mock
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Relatório com o texto dado
    Report(String),
    /// 2xx sem relatório
    Missing,
    /// Falha HTTP com o status dado
    Status(u16),
    /// Falha de rede
    Network,
}

/// Cliente mock: devolve as respostas na ordem em que foram programadas.
///
/// Sem respostas restantes, ecoa o nome da empresa como relatório.
#[derive(Debug, Default)]
pub struct MockReportClient {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<StructuredRequest>>,
    delay: Option<Duration>,
}

impl MockReportClient {
    /// Mock sem respostas programadas
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock com uma fila de respostas
    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Atrasa cada resposta (para testar o estado Pending)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests recebidos até agora
    pub fn requests(&self) -> Vec<StructuredRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReportClient for MockReportClient {
    async fn research(&self, request: &StructuredRequest) -> Result<ReportOutcome, ReportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        match reply {
            Some(MockReply::Report(text)) => Ok(ReportOutcome::Report(text)),
            Some(MockReply::Missing) => Ok(ReportOutcome::Missing),
            Some(MockReply::Status(code)) => Err(ReportError::Status(code)),
            Some(MockReply::Network) => Err(ReportError::Network("connection refused".into())),
            None => Ok(ReportOutcome::Report(format!(
                "# {}\nMock report",
                request.company_name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_from_json() {
        assert_eq!(
            ReportOutcome::from_json(&json!({"final_report_markdown": "# R"})),
            ReportOutcome::Report("# R".into())
        );
        assert_eq!(
            ReportOutcome::from_json(&json!({"final_report_markdown": 42})),
            ReportOutcome::Missing
        );
        assert_eq!(ReportOutcome::from_json(&json!({})), ReportOutcome::Missing);
        assert_eq!(ReportOutcome::from_json(&json!([1, 2])), ReportOutcome::Missing);
    }

    #[test]
    fn test_missing_uses_fallback_text() {
        assert_eq!(ReportOutcome::Missing.into_text(), NO_REPORT_FALLBACK);
        assert_eq!(ReportOutcome::Report("x".into()).into_text(), "x");
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ChatConfig {
            service_url: "http://localhost:9000/".into(),
            ..ChatConfig::default()
        };
        let client = HttpReportClient::new(&config);
        assert_eq!(client.endpoint(), "http://localhost:9000/research");
    }

    #[tokio::test]
    async fn test_mock_replies_in_order() {
        let client = MockReportClient::with_replies([
            MockReply::Report("first".into()),
            MockReply::Status(500),
        ]);
        let request = StructuredRequest::default();

        let first = client.research(&request).await.unwrap();
        assert_eq!(first, ReportOutcome::Report("first".into()));

        let second = client.research(&request).await;
        assert!(matches!(second, Err(ReportError::Status(500))));

        let echo = client.research(&request).await.unwrap();
        assert_eq!(echo, ReportOutcome::Report("# Unknown\nMock report".into()));
        assert_eq!(client.requests().len(), 3);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Servidor HTTP de uma conexão com resposta fixa
    // ─────────────────────────────────────────────────────────────────────────

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Requisição recebida pelo servidor de teste
    struct CapturedRequest {
        head: String,
        body: String,
    }

    impl CapturedRequest {
        fn header(&self, name: &str) -> Option<String> {
            self.head.lines().find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case(name)
                    .then(|| value.trim().to_string())
            })
        }
    }

    /// Sobe um servidor que responde uma vez com `status` e `body`.
    ///
    /// `status = None` aceita a conexão e nunca responde.
    async fn serve_once(
        status: Option<&'static str>,
        body: &'static str,
    ) -> (String, oneshot::Receiver<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            let head_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while raw.len() < head_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            let body_received = String::from_utf8_lossy(&raw[head_end..]).to_string();
            let _ = tx.send(CapturedRequest {
                head,
                body: body_received,
            });

            match status {
                Some(status) => {
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                }
                None => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
            }
        });

        (url, rx)
    }

    fn client_for(url: String, api_key: Option<&str>) -> HttpReportClient {
        HttpReportClient::new(&ChatConfig {
            service_url: url,
            api_key: api_key.map(String::from),
            request_timeout: Some(Duration::from_secs(5)),
            ..ChatConfig::default()
        })
    }

    fn acme() -> StructuredRequest {
        StructuredRequest {
            company_name: "Acme".into(),
            website: "acme.com".into(),
            industry: "retail".into(),
            memo_depth: crate::types::MemoDepth::DeepDive,
        }
    }

    #[tokio::test]
    async fn test_http_success_sends_body_and_api_key() {
        let (url, captured) =
            serve_once(Some("200 OK"), r##"{"final_report_markdown":"# Acme"}"##).await;
        let client = client_for(url, Some("secret"));

        let outcome = client.research(&acme()).await.unwrap();
        assert_eq!(outcome, ReportOutcome::Report("# Acme".into()));

        let request = captured.await.unwrap();
        assert!(request.head.starts_with("POST /research "));
        assert_eq!(request.header("x-api-key").as_deref(), Some("secret"));
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            json!({
                "company_name": "Acme",
                "website": "acme.com",
                "industry": "retail",
                "memo_depth": "deep dive"
            })
        );
    }

    #[tokio::test]
    async fn test_http_without_api_key_omits_header() {
        let (url, captured) =
            serve_once(Some("200 OK"), r#"{"final_report_markdown":"ok"}"#).await;
        client_for(url, None).research(&acme()).await.unwrap();
        assert_eq!(captured.await.unwrap().header("x-api-key"), None);
    }

    #[tokio::test]
    async fn test_http_non_string_report_is_missing() {
        let (url, _captured) =
            serve_once(Some("200 OK"), r#"{"final_report_markdown":null}"#).await;
        let outcome = client_for(url, None).research(&acme()).await.unwrap();
        assert_eq!(outcome, ReportOutcome::Missing);

        let (url, _captured) = serve_once(Some("200 OK"), r#"{"status":"done"}"#).await;
        let outcome = client_for(url, None).research(&acme()).await.unwrap();
        assert_eq!(outcome, ReportOutcome::Missing);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (url, _captured) =
            serve_once(Some("500 Internal Server Error"), r#"{"detail":"boom"}"#).await;
        let result = client_for(url, None).research(&acme()).await;
        assert!(matches!(result, Err(ReportError::Status(500))));

        let (url, _captured) = serve_once(Some("404 Not Found"), "").await;
        let result = client_for(url, None).research(&acme()).await;
        assert!(matches!(result, Err(ReportError::Status(404))));
    }

    #[tokio::test]
    async fn test_http_malformed_body_is_parse_error() {
        let (url, _captured) = serve_once(Some("200 OK"), "<html>oops</html>").await;
        let result = client_for(url, None).research(&acme()).await;
        assert!(matches!(result, Err(ReportError::Parse(_))));
    }

    #[tokio::test]
    async fn test_http_timeout() {
        let (url, _captured) = serve_once(None, "").await;
        let client = HttpReportClient::new(&ChatConfig {
            service_url: url,
            request_timeout: Some(Duration::from_millis(200)),
            ..ChatConfig::default()
        });
        let result = client.research(&acme()).await;
        assert!(matches!(result, Err(ReportError::Timeout)));
    }

    #[tokio::test]
    async fn test_http_client_unreachable_is_network_error() {
        let config = ChatConfig {
            service_url: "http://127.0.0.1:9".into(),
            request_timeout: Some(Duration::from_secs(2)),
            ..ChatConfig::default()
        };
        let client = HttpReportClient::new(&config);
        let result = client.research(&StructuredRequest::default()).await;
        assert!(matches!(
            result,
            Err(ReportError::Network(_)) | Err(ReportError::Timeout)
        ));
    }
}
