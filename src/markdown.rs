// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RENDERIZADOR MARKDOWN MÍNIMO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Subconjunto pequeno de markdown usado nos memos de pesquisa:
// - `#`, `##`, `###` → títulos
// - `**negrito**` → <strong>
// - `- item` → parágrafo com "•"
// - demais linhas → parágrafos
//
// Todo o resto (links, código, tabelas, listas aninhadas) passa como texto.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::Regex;

static STRONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid strong regex"));

/// Símbolo usado no lugar de `- `
pub const BULLET: &str = "•";

/// Trecho inline de uma linha
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Texto comum
    Text(String),
    /// Trecho entre `**`
    Strong(String),
}

/// Bloco de uma linha do documento
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`, `##` ou `###` (nível 1..=3)
    Heading {
        /// Nível do título
        level: u8,
        /// Conteúdo sem o prefixo
        content: Vec<Inline>,
    },
    /// Linha iniciada por `- `
    Bullet(Vec<Inline>),
    /// Qualquer outra linha não vazia
    Paragraph(Vec<Inline>),
    /// Linha vazia (preservada como quebra)
    Blank,
}

/// Escapa `&`, `<` e `>` nessa ordem.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Quebra o texto em blocos, uma linha por bloco.
///
/// O prefixo mais longo é testado primeiro (`### ` antes de `## ` e `# `).
/// Aceita `\n` e `\r\n` como fim de linha.
pub fn parse(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Block {
    const HEADINGS: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

    for (prefix, level) in HEADINGS {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Block::Heading {
                level,
                content: parse_inline(rest),
            };
        }
    }

    if let Some(rest) = line.strip_prefix("- ") {
        return Block::Bullet(parse_inline(rest));
    }

    if line.is_empty() {
        Block::Blank
    } else {
        Block::Paragraph(parse_inline(line))
    }
}

/// Separa os trechos `**negrito**` (não guloso, dentro da linha).
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in STRONG_RE.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Inline::Text(line[last..whole.start()].to_string()));
        }
        spans.push(Inline::Strong(inner.as_str().to_string()));
        last = whole.end();
    }

    if last < line.len() {
        spans.push(Inline::Text(line[last..].to_string()));
    }
    spans
}

/// Renderiza o texto como HTML seguro.
///
/// O escape acontece ANTES de qualquer substituição: os blocos são
/// extraídos do texto já escapado, então nenhum trecho de entrada vira tag.
///
/// ```rust
/// use deep_research_chat::markdown::render;
///
/// assert_eq!(render("# Oi\n**a** <b>"), "<h1>Oi</h1>\n<p><strong>a</strong> &lt;b&gt;</p>");
/// ```
pub fn render(text: &str) -> String {
    let escaped = escape_html(text);
    parse(&escaped)
        .iter()
        .map(block_to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

fn block_to_html(block: &Block) -> String {
    match block {
        Block::Heading { level, content } => {
            format!("<h{level}>{}</h{level}>", inline_to_html(content))
        }
        Block::Bullet(content) => format!("<p>{BULLET} {}</p>", inline_to_html(content)),
        Block::Paragraph(content) => format!("<p>{}</p>", inline_to_html(content)),
        Block::Blank => String::new(),
    }
}

fn inline_to_html(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) => text.clone(),
            Inline::Strong(text) => format!("<strong>{text}</strong>"),
        })
        .collect()
}
