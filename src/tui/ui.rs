//! Renderização da interface TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Focus};
use crate::markdown::{self, Inline, BULLET};
use crate::session::NotificationKind;
use crate::types::{ChatRole, Theme};
use crate::utils::single_line;

/// Cores de um tema
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Fundo geral
    pub bg: Color,
    /// Texto comum
    pub fg: Color,
    /// Texto secundário
    pub muted: Color,
    /// Destaque (títulos, foco)
    pub accent: Color,
    /// Mensagens do usuário
    pub user: Color,
    /// Fundo do item selecionado
    pub selection: Color,
    /// Aviso de sucesso
    pub success: Color,
    /// Aviso de erro
    pub error: Color,
}

impl Palette {
    /// Paleta do tema
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                user: Color::Yellow,
                selection: Color::DarkGray,
                success: Color::Green,
                error: Color::Red,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                user: Color::Magenta,
                selection: Color::Gray,
                success: Color::Green,
                error: Color::Red,
            },
        }
    }
}

/// Renderiza a interface completa
pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    let palette = Palette::for_theme(app.controller.theme());
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        area,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(34), // Histórico
            Constraint::Min(20),    // Chat
        ])
        .split(area);

    render_sidebar(frame, app, &palette, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Transcript
            Constraint::Length(1), // Estágio
            Constraint::Length(3), // Input
            Constraint::Length(1), // Dica
        ])
        .split(columns[1]);

    render_transcript(frame, app, &palette, rows[0]);
    render_stage(frame, app, &palette, rows[1]);
    render_input(frame, app, &palette, rows[2]);
    render_tip(frame, &palette, rows[3]);
    render_notifications(frame, app, &palette, area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// HISTÓRICO
// ═══════════════════════════════════════════════════════════════════════════════

fn render_sidebar(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(9)])
        .split(area);

    let focused = app.focus == Focus::History;
    let active = app.controller.active();

    let items: Vec<ListItem<'_>> = app
        .controller
        .history()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let is_cursor = focused && idx == app.history_cursor;
            let is_active = active == Some(entry.id);

            let marker = if is_cursor { " ▶ " } else { "   " };
            let mut title_style = Style::default().fg(palette.fg);
            if is_active {
                title_style = title_style.fg(palette.accent).add_modifier(Modifier::BOLD);
            }

            let item = ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(palette.user)),
                Span::styled(single_line(&entry.title), title_style),
            ]));
            if is_cursor {
                item.style(Style::default().bg(palette.selection))
            } else {
                item
            }
        })
        .collect();

    let title = if focused {
        " 📜 Histórico (Enter abre) "
    } else {
        " 📜 Histórico "
    };
    let border = if focused { palette.user } else { palette.muted };

    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Span::styled(
            "   (vazio)",
            Style::default().fg(palette.muted),
        ))])
    } else {
        List::new(items)
    };
    frame.render_widget(
        list.block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        ),
        chunks[0],
    );

    let help_lines = [
        ("Enter", "Pesquisar"),
        ("Ctrl+N", "Nova sessão"),
        ("Ctrl+L", "Limpar histórico"),
        ("Ctrl+T", "Tema"),
        ("Tab", "Foco"),
        ("PgUp/PgDn", "Rolar"),
        ("Esc", "Sair"),
    ]
    .into_iter()
    .map(|(key, label)| {
        Line::from(vec![
            Span::styled(
                format!(" {key:<10}"),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(palette.muted)),
        ])
    })
    .collect::<Vec<_>>();

    frame.render_widget(
        Paragraph::new(help_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted)),
        ),
        chunks[1],
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSCRIPT
// ═══════════════════════════════════════════════════════════════════════════════

fn render_transcript(frame: &mut Frame<'_>, app: &mut App, palette: &Palette, area: Rect) {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for turn in app.controller.transcript() {
        match turn.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "Você",
                    Style::default().fg(palette.user).add_modifier(Modifier::BOLD),
                )));
                lines.extend(user_lines(&turn.content, palette));
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "🔬 Deep Research",
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                )));
                lines.extend(markdown_lines(&turn.content, palette));
            }
        }
        lines.push(Line::default());
    }

    if app.controller.transcript().is_empty() {
        lines.push(Line::from(Span::styled(
            "Pergunte sobre uma empresa. Ex: name: Acme, website: acme.com, industry: retail, detailed",
            Style::default().fg(palette.muted),
        )));
    }

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let content_height = wrapped_height(&lines, inner_width);
    app.clamp_scroll(content_height, inner_height);

    let title = match app.controller.active() {
        Some(_) => " 💬 Chat (histórico) ",
        None => " 💬 Chat ",
    };
    let border = if app.focus == Focus::Input {
        palette.accent
    } else {
        palette.muted
    };

    let transcript = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.transcript_scroll, 0));
    frame.render_widget(transcript, area);
}

/// Linhas da mensagem do usuário, sem caracteres de controle
pub fn user_lines(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    text.lines()
        .map(|raw| Line::from(Span::styled(single_line(raw), Style::default().fg(palette.fg))))
        .collect()
}

/// Converte o markdown do relatório em linhas estilizadas
pub fn markdown_lines(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    markdown::parse(text)
        .into_iter()
        .map(|block| match block {
            markdown::Block::Heading { level, content } => {
                let color = if level == 1 { palette.accent } else { palette.user };
                let base = Style::default().fg(color).add_modifier(Modifier::BOLD);
                Line::from(inline_spans(content, base))
            }
            markdown::Block::Bullet(content) => {
                let mut spans = vec![Span::styled(
                    format!("{BULLET} "),
                    Style::default().fg(palette.accent),
                )];
                spans.extend(inline_spans(content, Style::default().fg(palette.fg)));
                Line::from(spans)
            }
            markdown::Block::Paragraph(content) => {
                Line::from(inline_spans(content, Style::default().fg(palette.fg)))
            }
            markdown::Block::Blank => Line::default(),
        })
        .collect()
}

fn inline_spans(content: Vec<Inline>, base: Style) -> Vec<Span<'static>> {
    content
        .into_iter()
        .map(|span| match span {
            Inline::Text(text) => Span::styled(text, base),
            Inline::Strong(text) => Span::styled(text, base.add_modifier(Modifier::BOLD)),
        })
        .collect()
}

/// Altura aproximada após quebra de linha (largura em colunas do terminal)
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let total: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(total).unwrap_or(u16::MAX)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ESTÁGIO, INPUT E DICA
// ═══════════════════════════════════════════════════════════════════════════════

fn render_stage(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let line = match app.controller.stage_label() {
        Some(label) => Line::from(vec![
            Span::styled(
                " ⏳ Researching… ",
                Style::default().fg(palette.user).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(palette.accent)),
        ]),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let focused = app.focus == Focus::Input;
    let pending = app.controller.is_pending();

    let title = if pending {
        " Aguardando relatório… "
    } else {
        " Digite sua pergunta "
    };
    let border = if focused { palette.user } else { palette.muted };

    // Texto com cursor (usando índices de caracteres, não bytes)
    let input = single_line(app.controller.input());
    let chars: Vec<char> = app.controller.input().chars().collect();
    let cursor_pos = app.cursor_pos.min(chars.len());
    let before: String = single_line(&chars[..cursor_pos].iter().collect::<String>());
    let after: String = single_line(&chars[cursor_pos..].iter().collect::<String>());
    let cursor = Span::styled(
        "│",
        Style::default().fg(palette.user).add_modifier(Modifier::RAPID_BLINK),
    );

    let line = if input.is_empty() {
        Line::from(vec![
            cursor,
            Span::styled(
                " Ex: company: Globex, industry: energy, brief",
                Style::default().fg(palette.muted),
            ),
        ])
    } else if focused {
        Line::from(vec![Span::raw(before), cursor, Span::raw(after)])
    } else {
        Line::from(Span::raw(input))
    };

    frame.render_widget(
        Paragraph::new(line)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .style(Style::default().fg(palette.fg)),
        area,
    );
}

fn render_tip(frame: &mut Frame<'_>, palette: &Palette, area: Rect) {
    let tip = Paragraph::new(Line::from(vec![
        Span::styled(" Dica: ", Style::default().fg(palette.accent)),
        Span::raw("use name:, website:, industry: e brief/standard/detailed/descriptive/deep dive"),
    ]))
    .style(Style::default().fg(palette.muted));
    frame.render_widget(tip, area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// NOTIFICAÇÕES
// ═══════════════════════════════════════════════════════════════════════════════

fn render_notifications(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    const WIDTH: u16 = 48;
    const HEIGHT: u16 = 3;

    if area.width < WIDTH + 2 {
        return;
    }

    let mut y = area.y + 1;
    for notification in app.controller.notifications().items().iter().rev() {
        if y + HEIGHT > area.y + area.height {
            break;
        }
        let color = match notification.kind {
            NotificationKind::Info => palette.accent,
            NotificationKind::Success => palette.success,
            NotificationKind::Error => palette.error,
        };
        let rect = Rect::new(area.x + area.width - WIDTH - 1, y, WIDTH, HEIGHT);

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    notification.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(palette.muted),
                ),
                Span::styled(notification.message.clone(), Style::default().fg(color)),
            ]))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .style(Style::default().bg(palette.bg)),
            rect,
        );
        y += HEIGHT;
    }
}
