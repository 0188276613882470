//! Interface de terminal (TUI) do chat
//!
//! - `app`: estado da interface e mapeamento de teclas
//! - `ui`: desenho com ratatui
//! - `runner`: loop de eventos e setup do terminal

mod app;
mod runner;
mod ui;

pub use app::{App, AppCommand, Focus, PAGE_SCROLL};
pub use runner::{create_event_channel, run_tui};
pub use ui::{markdown_lines, render, user_lines, Palette};
