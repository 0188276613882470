// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fmt;

/// Autor de uma mensagem do chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Texto digitado pelo usuário
    User,
    /// Resposta do serviço de relatórios
    Assistant,
}

/// Uma mensagem do transcript. Imutável depois de criada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Quem escreveu
    pub role: ChatRole,
    /// Conteúdo bruto (markdown no caso do assistente)
    pub content: String,
}

impl ChatTurn {
    /// Mensagem do usuário
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Mensagem do assistente
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Verifica se a mensagem é do usuário
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// Pesquisa concluída e persistida no histórico.
///
/// Os nomes dos campos são o formato gravado no store; não renomear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Timestamp de criação em ms (único por entrada)
    pub id: i64,
    /// Texto original do usuário
    pub question: String,
    /// Pergunta truncada para exibição na lista
    pub title: String,
    /// Relatório completo retornado
    pub result: String,
}

/// Profundidade do memo pedido ao serviço
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MemoDepth {
    /// Resumo curto
    #[serde(rename = "brief")]
    Brief,
    /// Padrão
    #[default]
    #[serde(rename = "standard")]
    Standard,
    /// Detalhado
    #[serde(rename = "detailed")]
    Detailed,
    /// Descritivo
    #[serde(rename = "descriptive")]
    Descriptive,
    /// Análise aprofundada
    #[serde(rename = "deep dive")]
    DeepDive,
}

impl MemoDepth {
    /// Todas as profundidades, na ordem em que são reconhecidas no texto
    pub const ALL: [MemoDepth; 5] = [
        MemoDepth::Brief,
        MemoDepth::Standard,
        MemoDepth::Detailed,
        MemoDepth::Descriptive,
        MemoDepth::DeepDive,
    ];

    /// Token usado no wire e no texto livre
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Standard => "standard",
            Self::Detailed => "detailed",
            Self::Descriptive => "descriptive",
            Self::DeepDive => "deep dive",
        }
    }

    /// Converte um token (case-insensitive). Desconhecido → None.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == token)
    }
}

impl fmt::Display for MemoDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Corpo enviado para `POST /research`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRequest {
    /// Nome da empresa ("Unknown" se não encontrado)
    pub company_name: String,
    /// Website ("" se não encontrado)
    pub website: String,
    /// Setor ("" se não encontrado)
    pub industry: String,
    /// Profundidade do memo
    pub memo_depth: MemoDepth,
}

impl Default for StructuredRequest {
    fn default() -> Self {
        Self {
            company_name: "Unknown".into(),
            website: String::new(),
            industry: String::new(),
            memo_depth: MemoDepth::Standard,
        }
    }
}

/// Tema visual persistido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Escuro (padrão)
    #[default]
    Dark,
    /// Claro
    Light,
}

impl Theme {
    /// Alterna entre escuro e claro
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Nome gravado no store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Lê o valor gravado no store; qualquer outra coisa → None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_depth_wire_format() {
        let json = serde_json::to_string(&MemoDepth::DeepDive).unwrap();
        assert_eq!(json, "\"deep dive\"");
        let depth: MemoDepth = serde_json::from_str("\"brief\"").unwrap();
        assert_eq!(depth, MemoDepth::Brief);
    }

    #[test]
    fn test_memo_depth_from_token() {
        assert_eq!(MemoDepth::from_token("DETAILED"), Some(MemoDepth::Detailed));
        assert_eq!(MemoDepth::from_token("Deep Dive"), Some(MemoDepth::DeepDive));
        assert_eq!(MemoDepth::from_token("huge"), None);
    }

    #[test]
    fn test_structured_request_body() {
        let body = serde_json::to_value(StructuredRequest::default()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "company_name": "Unknown",
                "website": "",
                "industry": "",
                "memo_depth": "standard"
            })
        );
    }

    #[test]
    fn test_history_entry_field_names() {
        let entry = HistoryEntry {
            id: 1,
            question: "q".into(),
            title: "q".into(),
            result: "r".into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["result"], "r");
    }

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("blue"), None);
    }

    #[test]
    fn test_chat_turn_roles() {
        assert!(ChatTurn::user("oi").is_user());
        assert!(!ChatTurn::assistant("olá").is_user());
    }
}
