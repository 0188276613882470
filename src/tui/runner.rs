//! Runner que conecta a sessão com a TUI

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::app::{App, AppCommand};
use super::ui;
use crate::session::{Dispatcher, SessionEvent};

/// Executa a TUI até o usuário sair
///
/// Bloqueia a thread atual. As pesquisas rodam no runtime do `dispatcher`.
pub fn run_tui(
    app: &mut App,
    dispatcher: &mut Dispatcher,
    event_rx: Receiver<SessionEvent>,
) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Loop principal
    let result = run_app(&mut terminal, app, dispatcher, &event_rx);

    // Restaurar terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Loop principal da TUI
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
    event_rx: &Receiver<SessionEvent>,
) -> io::Result<()> {
    loop {
        // Renderizar
        terminal.draw(|frame| ui::render(frame, app))?;

        // Processar ticks e resultados (não bloqueante)
        while let Ok(event) = event_rx.try_recv() {
            dispatcher.handle(&mut app.controller, event);
        }
        app.controller.prune_notifications(Instant::now());

        // Processar input do usuário (com timeout)
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.on_key(key) {
                        AppCommand::Submit => {
                            dispatcher.submit(&mut app.controller);
                        }
                        AppCommand::Quit => return Ok(()),
                        AppCommand::None => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Cria o canal de eventos da sessão
pub fn create_event_channel() -> (Sender<SessionEvent>, Receiver<SessionEvent>) {
    mpsc::channel()
}
