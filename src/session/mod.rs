// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SESSÃO DE CHAT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Estado da conversa (controller), máquina Idle/Pending (state),
// notificações (notify) e a ponte com o runtime tokio (dispatcher, ticker).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod controller;
mod dispatcher;
mod notify;
mod state;
mod ticker;

pub use controller::*;
pub use dispatcher::*;
pub use notify::*;
pub use state::*;
pub use ticker::*;
