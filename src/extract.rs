// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRATOR DE CAMPOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Converte texto livre em um StructuredRequest usando padrões fixos.
// Nunca falha: campo não encontrado → valor padrão.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{MemoDepth, StructuredRequest};

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)name[:=]\s*([^,]+)|company[:=]\s*([^,]+)").expect("valid name regex")
});

static WEBSITE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)website[:=]\s*([^,\s]+)").expect("valid website regex"));

static INDUSTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)industry[:=]\s*([^,]+)").expect("valid industry regex"));

static DEPTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(brief|standard|detailed|descriptive|deep dive)").expect("valid depth regex")
});

/// Extrai os campos estruturados de um pedido em texto livre.
///
/// Cada campo usa o primeiro match (case-insensitive):
/// - `name:` / `company:` → `company_name` (até vírgula ou fim)
/// - `website:` → `website` (até vírgula ou qualquer espaço em branco)
/// - `industry:` → `industry` (até vírgula ou fim)
/// - `brief|standard|detailed|descriptive|deep dive` → `memo_depth`
///
/// # Exemplo
///
/// ```rust
/// use deep_research_chat::extract::extract;
/// use deep_research_chat::types::MemoDepth;
///
/// let req = extract("name: Acme, website: acme.com, industry: retail, detailed");
/// assert_eq!(req.company_name, "Acme");
/// assert_eq!(req.memo_depth, MemoDepth::Detailed);
/// ```
pub fn extract(text: &str) -> StructuredRequest {
    let defaults = StructuredRequest::default();

    let company_name = NAME_RE
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| non_empty(m.as_str()))
        .unwrap_or(defaults.company_name);

    let website = first_group(&WEBSITE_RE, text).unwrap_or(defaults.website);
    let industry = first_group(&INDUSTRY_RE, text).unwrap_or(defaults.industry);

    let memo_depth = DEPTH_RE
        .find(text)
        .and_then(|m| MemoDepth::from_token(m.as_str()))
        .unwrap_or(defaults.memo_depth);

    StructuredRequest {
        company_name,
        website,
        industry,
        memo_depth,
    }
}

fn first_group(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_empty(m.as_str()))
}

/// Valor aparado; vazio conta como ausente
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_returns_defaults() {
        let req = extract("tell me something interesting");
        assert_eq!(req, StructuredRequest::default());
        assert_eq!(req.company_name, "Unknown");
        assert_eq!(req.website, "");
        assert_eq!(req.industry, "");
        assert_eq!(req.memo_depth, MemoDepth::Standard);
    }

    #[test]
    fn test_all_fields() {
        let req = extract("name: Acme, website: acme.com, industry: retail, detailed");
        assert_eq!(req.company_name, "Acme");
        assert_eq!(req.website, "acme.com");
        assert_eq!(req.industry, "retail");
        assert_eq!(req.memo_depth, MemoDepth::Detailed);
    }

    #[test]
    fn test_company_alternative() {
        let req = extract("Company: Globex Corp, brief please");
        assert_eq!(req.company_name, "Globex Corp");
        assert_eq!(req.memo_depth, MemoDepth::Brief);
    }

    #[test]
    fn test_name_value_runs_to_end_of_text() {
        let req = extract("research company name: Microsoft");
        assert_eq!(req.company_name, "Microsoft");
    }

    #[test]
    fn test_leftmost_marker_wins() {
        let req = extract("company: First, name: Second");
        assert_eq!(req.company_name, "First");
    }

    #[test]
    fn test_equals_separator() {
        let req = extract("name=Initech, industry=software");
        assert_eq!(req.company_name, "Initech");
        assert_eq!(req.industry, "software");
    }

    #[test]
    fn test_website_stops_at_whitespace() {
        let req = extract("website: https://www.microsoft.com and more");
        assert_eq!(req.website, "https://www.microsoft.com");
    }

    #[test]
    fn test_multiline_fields() {
        let req = extract("name: Acme\nwebsite: acme.com\nindustry: retail");
        assert_eq!(req.website, "acme.com");
        assert_eq!(req.industry, "retail");

        let req = extract("website:\tacme.com\tbrief");
        assert_eq!(req.website, "acme.com");
    }

    #[test]
    fn test_case_insensitive_markers_and_depth() {
        let req = extract("NAME: Umbrella, WEBSITE: umbrella.com, DEEP DIVE");
        assert_eq!(req.company_name, "Umbrella");
        assert_eq!(req.website, "umbrella.com");
        assert_eq!(req.memo_depth, MemoDepth::DeepDive);
    }

    #[test]
    fn test_first_depth_token_wins() {
        let req = extract("a brief or detailed memo");
        assert_eq!(req.memo_depth, MemoDepth::Brief);
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let req = extract("name:   , industry: ");
        assert_eq!(req.company_name, "Unknown");
        assert_eq!(req.industry, "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract(""), StructuredRequest::default());
    }
}
