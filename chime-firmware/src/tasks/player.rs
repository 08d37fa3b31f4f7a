//! Playback task
//!
//! Sole owner of the solenoid bank.

use tracing::info;

use crate::board::SolenoidBank;
use crate::player::Player;

#[embassy_executor::task]
pub async fn player_task(mut player: Player<'static, SolenoidBank>) {
    info!("Player task started");
    player.run().await
}
