//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod doorbell;
pub mod player;

pub use buttons::{buttons_task, ButtonPoller};
pub use doorbell::doorbell_task;
pub use player::player_task;
