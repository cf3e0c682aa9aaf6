//! The catalog controller actor: UI state, its derived view, and the service
//! loop that applies user actions to it.

mod hooks;
mod service;
mod state;

pub use hooks::*;
pub use service::*;
pub use state::*;
