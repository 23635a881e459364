use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::error::AudioError;
use crate::processing::pcm::PcmFrame;

/// Outbound trailing-window message: base64 PCM payload plus an ISO-8601
/// timestamp. The transport client ships it as one JSON text frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: String,
    pub timestamp: String,
}

impl WindowMessage {
    pub const KIND: &'static str = "audio";

    /// Frame a PCM window for transport.
    pub fn from_pcm(pcm: &PcmFrame, at: DateTime<Utc>) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            payload: BASE64.encode(pcm.as_bytes()),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    pub fn to_json(&self) -> Result<String, AudioError> {
        serde_json::to_string(self)
            .map_err(|e| AudioError::Transport(format!("failed to serialize window message: {e}")))
    }

    /// Decode the payload back to raw PCM bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, AudioError> {
        BASE64
            .decode(&self.payload)
            .map_err(|e| AudioError::Transport(format!("invalid base64 payload: {e}")))
    }
}

/// Inbound classification result from the analysis server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMessage {
    pub label: i32,
    pub decibel: f32,
}

impl AnalysisMessage {
    pub fn from_json(raw: &str) -> Result<Self, AudioError> {
        serde_json::from_str(raw)
            .map_err(|e| AudioError::Transport(format!("invalid analysis message: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::pcm::encode_pcm16;
    use chrono::TimeZone;

    #[test]
    fn payload_is_base64_of_pcm_bytes() {
        // [0.0, 1.0] → PCM bytes [0x00, 0x00, 0xFF, 0x7F]
        let pcm = encode_pcm16(&[0.0, 1.0]);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let message = WindowMessage::from_pcm(&pcm, at);

        assert_eq!(message.kind, "audio");
        assert_eq!(message.payload, "AAD/fw==");
        assert_eq!(message.decode_payload().unwrap(), pcm.as_bytes());
    }

    #[test]
    fn timestamp_is_iso8601_utc() {
        let pcm = encode_pcm16(&[]);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();

        let message = WindowMessage::from_pcm(&pcm, at);

        assert_eq!(message.timestamp, "2024-05-01T12:30:45.000000Z");
    }

    #[test]
    fn json_shape_matches_wire_format() {
        let pcm = encode_pcm16(&[0.0]);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let json = WindowMessage::from_pcm(&pcm, at).to_json().unwrap();

        assert!(json.contains("\"type\":\"audio\""));
        assert!(json.contains("\"payload\":"));
        assert!(json.contains("\"timestamp\":"));

        let parsed: WindowMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, "audio");
    }

    #[test]
    fn analysis_message_parses() {
        let msg = AnalysisMessage::from_json(r#"{"label":3,"decibel":71.5}"#).unwrap();
        assert_eq!(msg.label, 3);
        assert!((msg.decibel - 71.5).abs() < 1e-6);
    }

    #[test]
    fn analysis_message_rejects_garbage() {
        assert!(AnalysisMessage::from_json("not json").is_err());
    }
}
