//! Doorbell controller task

use rand::rngs::SmallRng;
use tracing::info;

use crate::controller::Doorbell;

#[embassy_executor::task]
pub async fn doorbell_task(mut doorbell: Doorbell<'static, SmallRng>) {
    info!("Doorbell task started");
    doorbell.run().await
}
