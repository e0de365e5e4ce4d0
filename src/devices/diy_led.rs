// diy_led.rs
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use validator::Validate;

use crate::{
    config::DeviceConfig,
    error::LampError,
    events::EventBus,
    models::{
        Channel, ChannelState, Command, DEVICE_MAX_BRIGHTNESS, Direction, Envelope, InfoResponse,
        LampState, LampStatus, device_to_pct, pct_to_device,
    },
    transport::Transport,
};

pub const DIM_STEP: i32 = 25;

/// Applies one increase/decrease step to a device-scale brightness.
///
/// Increase saturates at full scale. Decrease keeps the deployed lamp
/// behaviour: the result is forced to 0 whenever it ends up below 255, so a
/// single decrease from any level switches the dimmer to zero.
pub fn step_brightness(current: u8, direction: Direction) -> u8 {
    let max = i32::from(DEVICE_MAX_BRIGHTNESS);
    let current = i32::from(current);
    let next = match direction {
        Direction::Increase => (current + DIM_STEP).min(max),
        Direction::Decrease => {
            let next = current - DIM_STEP;
            if next < max { 0 } else { next }
        }
    };
    next as u8
}

pub struct DiyLedLamp<T> {
    config: DeviceConfig,
    transport: T,
    events: Arc<EventBus>,
    current_brightness: Mutex<u8>,
    last_state: RwLock<Option<LampState>>,
}

impl<T: Transport> DiyLedLamp<T> {
    pub fn new(config: DeviceConfig, transport: T, events: Arc<EventBus>) -> Result<Self, LampError> {
        config.validate()?;
        info!(device = %config.name, ip = %config.ip, "Lamp initialized");
        Ok(Self {
            config,
            transport,
            events,
            current_brightness: Mutex::new(0),
            last_state: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub async fn current_brightness(&self) -> u8 {
        *self.current_brightness.lock().await
    }

    async fn poll(&self) -> Result<LampState, LampError> {
        let request = Envelope::info_request(&self.config.name);
        let body = self.transport.invoke(&request, &self.config.ip).await?;
        debug!(device = %self.config.name, %body, "Poll response");
        if body.trim().is_empty() {
            return Err(LampError::EmptyResponse);
        }
        let response: InfoResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    async fn sync_state(&self) -> Result<LampState, LampError> {
        let result = self.poll().await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!("diyled_polls_total", "outcome" => outcome).increment(1);
        let state = result?;

        *self.current_brightness.lock().await = state.brightness;
        *self.last_state.write().await = Some(state);

        self.events.publish(Channel::Power, ChannelState::OnOff(state.power));
        // The brightness channel doubles as a switch for dimmer widgets.
        self.events
            .publish(Channel::Brightness, ChannelState::OnOff(state.power));
        self.events.publish(
            Channel::Brightness,
            ChannelState::Percent(device_to_pct(state.brightness)),
        );
        debug!(
            device = %self.config.name,
            power = state.power,
            brightness = state.brightness,
            "Channels updated"
        );
        Ok(state)
    }

    async fn build_request(&self, channel: Channel, command: Command) -> Result<Envelope, LampError> {
        let name = &self.config.name;
        match (channel, command) {
            // On/off on the brightness channel toggles power, not the level.
            (_, Command::OnOff(on)) => Ok(Envelope::set_power(name, on)),
            (Channel::Brightness, Command::Percent(pct)) => {
                if pct > 100 {
                    return Err(LampError::Validation(format!(
                        "brightness {} is outside 0-100",
                        pct
                    )));
                }
                let brightness = pct_to_device(pct);
                *self.current_brightness.lock().await = brightness;
                Ok(Envelope::set_brightness(name, brightness))
            }
            (Channel::Brightness, Command::IncreaseDecrease(direction)) => {
                let mut current = self.current_brightness.lock().await;
                *current = step_brightness(*current, direction);
                Ok(Envelope::set_brightness(name, *current))
            }
            (Channel::Power, _) | (Channel::Brightness, Command::Refresh) => {
                Err(LampError::UnsupportedCommand(channel.id()))
            }
        }
    }
}

#[async_trait]
impl<T: Transport> super::Device for DiyLedLamp<T> {
    async fn handle_command(&self, channel: Channel, command: Command) -> Result<(), LampError> {
        debug!(device = %self.config.name, channel = channel.id(), ?command, "Handling command");
        if command == Command::Refresh {
            return self.sync_state().await.map(|_| ());
        }

        let request = self.build_request(channel, command).await?;
        let result = self.transport.send(&request, &self.config.ip).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            "diyled_commands_total",
            "channel" => channel.id(),
            "outcome" => outcome
        )
        .increment(1);
        result
    }

    async fn refresh(&self) -> Result<LampState, LampError> {
        self.sync_state().await
    }

    async fn get_status(&self) -> Result<LampStatus, LampError> {
        let state = *self.last_state.read().await;
        state.map(LampStatus::from).ok_or(LampError::NotPolled)
    }
}
