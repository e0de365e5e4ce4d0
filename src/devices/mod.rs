// devices/mod.rs
mod diy_led;
pub mod poller;

pub use diy_led::{DIM_STEP, DiyLedLamp, step_brightness};

use crate::{
    error::LampError,
    models::{Channel, Command, LampState, LampStatus},
};

#[async_trait::async_trait]
pub trait Device: Send + Sync {
    async fn handle_command(&self, channel: Channel, command: Command) -> Result<(), LampError>;
    async fn refresh(&self) -> Result<LampState, LampError>;
    async fn get_status(&self) -> Result<LampStatus, LampError>;
}
