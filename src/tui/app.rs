//! Estado da aplicação TUI

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::SessionController;

/// Painel com foco do teclado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Campo de pergunta
    #[default]
    Input,
    /// Lista do histórico
    History,
}

/// O que o loop principal deve fazer após uma tecla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Nada além de redesenhar
    None,
    /// Enviar a entrada atual
    Submit,
    /// Encerrar a TUI
    Quit,
}

/// Linhas roladas por PgUp/PgDn
pub const PAGE_SCROLL: u16 = 10;

/// Estado da aplicação
pub struct App {
    /// Sessão de chat
    pub controller: SessionController,
    /// Posição do cursor no input (em caracteres)
    pub cursor_pos: usize,
    /// Painel com foco
    pub focus: Focus,
    /// Índice destacado na lista do histórico
    pub history_cursor: usize,
    /// Scroll do transcript (linhas a partir do topo)
    pub transcript_scroll: u16,
    /// Acompanha o fim do transcript automaticamente
    pub follow_tail: bool,
    /// Se deve sair
    pub should_quit: bool,
}

impl App {
    /// Cria o app em torno de uma sessão carregada
    pub fn new(controller: SessionController) -> Self {
        let cursor_pos = controller.input().chars().count();
        Self {
            controller,
            cursor_pos,
            focus: Focus::Input,
            history_cursor: 0,
            transcript_scroll: 0,
            follow_tail: true,
            should_quit: false,
        }
    }

    /// Trata uma tecla pressionada
    pub fn on_key(&mut self, key: KeyEvent) -> AppCommand {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return self.quit(),
            KeyCode::Char('c') if ctrl => return self.quit(),
            KeyCode::Char('n') if ctrl => {
                self.controller.new_session();
                self.cursor_pos = 0;
                self.scroll_to_tail();
                return AppCommand::None;
            }
            KeyCode::Char('l') if ctrl => {
                if self.controller.clear_history() {
                    self.history_cursor = 0;
                    self.scroll_to_tail();
                }
                return AppCommand::None;
            }
            KeyCode::Char('t') if ctrl => {
                self.controller.toggle_theme();
                return AppCommand::None;
            }
            KeyCode::Tab => {
                self.toggle_focus();
                return AppCommand::None;
            }
            KeyCode::PageUp => {
                self.scroll_up(PAGE_SCROLL);
                return AppCommand::None;
            }
            KeyCode::PageDown => {
                self.scroll_down(PAGE_SCROLL);
                return AppCommand::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.on_input_key(key),
            Focus::History => self.on_history_key(key),
        }
    }

    fn quit(&mut self) -> AppCommand {
        self.should_quit = true;
        AppCommand::Quit
    }

    fn on_input_key(&mut self, key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.input_char('\n');
                AppCommand::None
            }
            KeyCode::Enter => {
                if self.controller.is_pending() || self.controller.input().trim().is_empty() {
                    return AppCommand::None;
                }
                self.cursor_pos = 0;
                self.scroll_to_tail();
                AppCommand::Submit
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input_char(c);
                AppCommand::None
            }
            KeyCode::Backspace => {
                self.input_backspace();
                AppCommand::None
            }
            KeyCode::Delete => {
                self.input_delete();
                AppCommand::None
            }
            KeyCode::Left => {
                self.cursor_left();
                AppCommand::None
            }
            KeyCode::Right => {
                self.cursor_right();
                AppCommand::None
            }
            KeyCode::Home => {
                self.cursor_home();
                AppCommand::None
            }
            KeyCode::End => {
                self.cursor_end();
                AppCommand::None
            }
            KeyCode::Up => {
                self.history_select_up();
                AppCommand::None
            }
            KeyCode::Down => {
                self.history_select_down();
                AppCommand::None
            }
            _ => AppCommand::None,
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) -> AppCommand {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.history_select_up(),
            KeyCode::Down | KeyCode::Char('j') => self.history_select_down(),
            KeyCode::Enter => self.use_selected_history(),
            _ => {}
        }
        AppCommand::None
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Histórico
    // ─────────────────────────────────────────────────────────────────────────

    /// Alterna foco entre input e histórico
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::History,
            Focus::History => Focus::Input,
        };
        self.clamp_history_cursor();
    }

    /// Sobe na lista (para entradas mais novas)
    pub fn history_select_up(&mut self) {
        self.clamp_history_cursor();
        self.history_cursor = self.history_cursor.saturating_sub(1);
    }

    /// Desce na lista (para entradas mais antigas)
    pub fn history_select_down(&mut self) {
        let len = self.controller.history().len();
        if self.history_cursor + 1 < len {
            self.history_cursor += 1;
        }
    }

    /// Abre a entrada destacada no transcript
    pub fn use_selected_history(&mut self) {
        self.clamp_history_cursor();
        let Some(id) = self
            .controller
            .history()
            .get(self.history_cursor)
            .map(|e| e.id)
        else {
            return;
        };
        if self.controller.select_history(id) {
            self.transcript_scroll = 0;
            self.follow_tail = false;
        }
    }

    fn clamp_history_cursor(&mut self) {
        let len = self.controller.history().len();
        self.history_cursor = self.history_cursor.min(len.saturating_sub(1));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scroll do transcript
    // ─────────────────────────────────────────────────────────────────────────

    /// Rola para cima (desliga o acompanhamento do fim)
    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_tail = false;
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// Rola para baixo
    pub fn scroll_down(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
    }

    /// Volta a acompanhar o fim do transcript
    pub fn scroll_to_tail(&mut self) {
        self.follow_tail = true;
    }

    /// Ajusta o scroll ao conteúdo desenhado (chamado pela UI)
    pub fn clamp_scroll(&mut self, content_height: u16, viewport_height: u16) {
        let max = content_height.saturating_sub(viewport_height);
        if self.follow_tail || self.transcript_scroll >= max {
            self.transcript_scroll = max;
            self.follow_tail = true;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Retorna número de caracteres (não bytes)
    fn char_count(&self) -> usize {
        self.controller.input().chars().count()
    }

    /// Insere caractere no input (suporta UTF-8)
    pub fn input_char(&mut self, c: char) {
        let mut chars: Vec<char> = self.controller.input().chars().collect();
        let pos = self.cursor_pos.min(chars.len());
        chars.insert(pos, c);
        self.controller.set_input(chars.into_iter().collect::<String>());
        self.cursor_pos = pos + 1;
    }

    /// Remove caractere antes do cursor (backspace)
    pub fn input_backspace(&mut self) {
        let mut chars: Vec<char> = self.controller.input().chars().collect();
        let pos = self.cursor_pos.min(chars.len());
        if pos > 0 {
            chars.remove(pos - 1);
            self.controller.set_input(chars.into_iter().collect::<String>());
            self.cursor_pos = pos - 1;
        }
    }

    /// Remove caractere no cursor (delete)
    pub fn input_delete(&mut self) {
        let mut chars: Vec<char> = self.controller.input().chars().collect();
        if self.cursor_pos < chars.len() {
            chars.remove(self.cursor_pos);
            self.controller.set_input(chars.into_iter().collect::<String>());
        }
    }

    /// Move cursor para esquerda
    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor para direita
    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.char_count() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor para início
    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor para fim
    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.char_count();
    }
}
