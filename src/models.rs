// models.rs
use serde::{Deserialize, Serialize};

pub const DEVICE_MAX_BRIGHTNESS: u8 = 255;

pub const INFO_REQUEST_PACKET: &str = "infoRequestPacket";
pub const CHANGE_VALUE_REQUEST_PACKET: &str = "changeValueRequestPacket";
pub const LIGHT_REQUEST: &str = "light";
/// The firmware expects this constant id inside every mutation.
pub const CHANGE_VALUE_ID: u32 = 123_456_789;

pub const CHANNEL_POWER: &str = "power";
pub const CHANNEL_BRIGHTNESS: &str = "brightness";

/// Device scale (0-255) to percentage (0-100), truncating.
pub fn device_to_pct(brightness: u8) -> u8 {
    (u16::from(brightness) * 100 / u16::from(DEVICE_MAX_BRIGHTNESS)) as u8
}

/// Percentage (0-100) to device scale, truncating. Values above 100 saturate.
pub fn pct_to_device(pct: u8) -> u8 {
    (u16::from(pct.min(100)) * u16::from(DEVICE_MAX_BRIGHTNESS) / 100) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Power,
    Brightness,
}

impl Channel {
    pub fn id(self) -> &'static str {
        match self {
            Channel::Power => CHANNEL_POWER,
            Channel::Brightness => CHANNEL_BRIGHTNESS,
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = crate::error::LampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CHANNEL_POWER => Ok(Channel::Power),
            CHANNEL_BRIGHTNESS => Ok(Channel::Brightness),
            other => Err(crate::error::LampError::UnknownChannel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Command {
    Refresh,
    OnOff(bool),
    Percent(u8),
    IncreaseDecrease(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChannelState {
    OnOff(bool),
    Percent(u8),
}

/// Lamp state as reported by the device, brightness on the device scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LampState {
    pub power: bool,
    pub brightness: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LampStatus {
    pub power: bool,
    pub brightness: u8,
}

impl From<LampState> for LampStatus {
    fn from(state: LampState) -> Self {
        Self {
            power: state.power,
            brightness: device_to_pct(state.brightness),
        }
    }
}

/// The `{"id": ..., "data": {...}}` wrapper used for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub id: &'static str,
    pub data: RequestData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestData {
    pub request: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub change_id: Option<u32>,
}

impl Envelope {
    pub fn info_request(name: &str) -> Self {
        Self {
            id: INFO_REQUEST_PACKET,
            data: RequestData {
                request: LIGHT_REQUEST,
                name: name.to_string(),
                key: None,
                value: None,
                change_id: None,
            },
        }
    }

    pub fn change_value(name: &str, key: &'static str, value: impl ToString) -> Self {
        Self {
            id: CHANGE_VALUE_REQUEST_PACKET,
            data: RequestData {
                request: LIGHT_REQUEST,
                name: name.to_string(),
                key: Some(key),
                value: Some(value.to_string()),
                change_id: Some(CHANGE_VALUE_ID),
            },
        }
    }

    pub fn set_power(name: &str, on: bool) -> Self {
        Self::change_value(name, CHANNEL_POWER, on)
    }

    pub fn set_brightness(name: &str, brightness: u8) -> Self {
        Self::change_value(name, CHANNEL_BRIGHTNESS, brightness)
    }
}

#[derive(Debug, Deserialize)]
pub struct InfoResponse {
    pub data: InfoData,
}

#[derive(Debug, Deserialize)]
pub struct InfoData {
    pub power: PowerField,
    pub brightness: u8,
}

/// Power arrives as a string; a JSON bool is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PowerField {
    Text(String),
    Flag(bool),
}

impl PowerField {
    pub fn is_on(&self) -> bool {
        match self {
            PowerField::Text(text) => text.eq_ignore_ascii_case("true"),
            PowerField::Flag(flag) => *flag,
        }
    }
}

impl From<InfoResponse> for LampState {
    fn from(response: InfoResponse) -> Self {
        Self {
            power: response.data.power.is_on(),
            brightness: response.data.brightness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn percentage_stays_in_range() {
        for b in 0..=255u8 {
            assert!(device_to_pct(b) <= 100);
        }
        assert_eq!(device_to_pct(128), 50);
        assert_eq!(device_to_pct(255), 100);
        assert_eq!(device_to_pct(0), 0);
    }

    #[test]
    fn conversion_drifts_at_most_one_percent() {
        for p in 0..=100u8 {
            let back = device_to_pct(pct_to_device(p));
            assert!(p.abs_diff(back) <= 1, "p={p} back={back}");
        }
    }

    #[test]
    fn info_request_has_no_mutation_fields() {
        let json = serde_json::to_string(&Envelope::info_request("desk")).unwrap();
        assert_eq!(
            json,
            r#"{"id":"infoRequestPacket","data":{"request":"light","name":"desk"}}"#
        );
    }

    #[test]
    fn power_on_mutation_matches_firmware_format() {
        let json = serde_json::to_string(&Envelope::set_power("desk", true)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"changeValueRequestPacket","data":{"request":"light","name":"desk","key":"power","value":"true","id":123456789}}"#
        );
    }

    #[test]
    fn power_field_is_case_insensitive() {
        let response: InfoResponse =
            serde_json::from_str(r#"{"data":{"power":"TRUE","brightness":128}}"#).unwrap();
        let state = LampState::from(response);
        assert_eq!(state, LampState { power: true, brightness: 128 });

        let response: InfoResponse =
            serde_json::from_str(r#"{"data":{"power":false,"brightness":0}}"#).unwrap();
        assert!(!LampState::from(response).power);
    }

    #[test]
    fn brightness_outside_device_scale_is_rejected() {
        let parsed =
            serde_json::from_str::<InfoResponse>(r#"{"data":{"power":"true","brightness":300}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: Command =
            serde_json::from_str(r#"{"type":"increase_decrease","value":"decrease"}"#).unwrap();
        assert_eq!(command, Command::IncreaseDecrease(Direction::Decrease));
        let command: Command = serde_json::from_str(r#"{"type":"refresh"}"#).unwrap();
        assert_eq!(command, Command::Refresh);
    }
}
