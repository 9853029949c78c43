//! Wire types for the server-authoritative deployment variant.
//!
//! One POST-style endpoint takes `{action, ...params}` and answers
//! `{success, state?, error?, offlineEarnings?}`. The server and the
//! transport are collaborators outside this crate; only the shapes and
//! their (de)serialization live here. Big integers travel as plain
//! decimal strings and are parsed back to unbounded integers on receipt.
//!
//! Clients must not apply optimistic changes: on `success == false` (or a
//! network/parse failure mapped to one) the prior local state stays
//! untouched.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::config::{CarTier, PartKind};
use crate::state::GameState;

/// Client-to-server request, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApiRequest {
    Load,
    Sync {
        state: WireState,
    },
    BuyPart {
        #[serde(rename = "partId")]
        part_id: String,
    },
    BuyManualUpgrade {
        #[serde(rename = "upgradeType")]
        upgrade_type: String,
    },
    Prestige,
    ConvertHpToTokens {
        #[serde(rename = "packageId")]
        package_id: String,
    },
}

/// Server-to-client response envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<WireState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Decimal string, present only on a load that found offline earnings.
    #[serde(
        default,
        rename = "offlineEarnings",
        skip_serializing_if = "Option::is_none"
    )]
    pub offline_earnings: Option<String>,
}

impl ApiResponse {
    /// The generic failure produced for network/parse errors.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// The full game state as it crosses the wire, camelCase keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireState {
    #[serde(with = "dec_string")]
    pub total_hp: BigUint,
    #[serde(with = "dec_string")]
    pub lifetime_hp_earned: BigUint,
    pub current_tier: u8,
    pub current_rpm: u32,
    pub current_gear: u8,
    pub last_click_time: f64,
    pub redzone_start_time: Option<f64>,
    pub throttle_level: u32,
    pub ecu_level: u32,
    /// Part id -> level, absent = 0.
    pub parts: BTreeMap<String, u32>,
    pub tokens: u32,
    pub tokens_earned_today: u32,
    pub last_token_date: String,
    pub achievements: Vec<String>,
}

impl From<&GameState> for WireState {
    fn from(state: &GameState) -> Self {
        Self {
            total_hp: state.total_hp.clone(),
            lifetime_hp_earned: state.lifetime_hp_earned.clone(),
            current_tier: state.current_tier.index(),
            current_rpm: state.current_rpm,
            current_gear: state.current_gear,
            last_click_time: state.last_observed_ms,
            redzone_start_time: state.redzone_start_ms,
            throttle_level: state.throttle_level,
            ecu_level: state.ecu_level,
            parts: state
                .parts
                .iter()
                .map(|(kind, level)| (kind.id().to_string(), *level))
                .collect(),
            tokens: state.tokens,
            tokens_earned_today: state.tokens_earned_today,
            last_token_date: state.last_token_date.clone(),
            achievements: state.achievements.iter().cloned().collect(),
        }
    }
}

impl WireState {
    /// Rebuild a local state from an authoritative server state. Unknown
    /// part ids are dropped rather than rejected, so an older client
    /// survives a server-side catalog addition.
    pub fn into_game_state(self) -> GameState {
        let mut state = GameState::new(self.last_click_time, &self.last_token_date);
        state.total_hp = self.total_hp;
        state.lifetime_hp_earned = self.lifetime_hp_earned;
        state.current_tier = CarTier::from_index(self.current_tier).unwrap_or(CarTier::Junker);
        state.current_rpm = self.current_rpm;
        state.current_gear = self.current_gear.clamp(1, 6);
        state.redzone_start_ms = self.redzone_start_time;
        state.throttle_level = self.throttle_level;
        state.ecu_level = self.ecu_level;
        for (id, level) in self.parts {
            if level == 0 {
                continue;
            }
            if let Some(kind) = PartKind::from_id(&id) {
                state.parts.insert(kind, level);
            }
        }
        state.tokens = self.tokens;
        state.tokens_earned_today = self.tokens_earned_today;
        state.achievements = self.achievements.into_iter().collect();
        state
    }
}

/// Plain decimal-string form used on the wire (no `BI:` tag; the schema
/// already knows which fields are big integers).
mod dec_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<BigUint>()
            .map_err(|e| de::Error::custom(format!("bad big integer {raw:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_actions_serialize_with_action_tag() {
        let req = ApiRequest::BuyPart {
            part_id: "big_turbo".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({ "action": "buy_part", "partId": "big_turbo" })
        );

        let req = ApiRequest::ConvertHpToTokens {
            package_id: "medium".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({ "action": "convert_hp_to_tokens", "packageId": "medium" })
        );
    }

    #[test]
    fn parameterless_actions_roundtrip() {
        for req in [ApiRequest::Load, ApiRequest::Prestige] {
            let json = serde_json::to_string(&req).unwrap();
            let back: ApiRequest = serde_json::from_str(&json).unwrap();
            assert_eq!(back, req);
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result: Result<ApiRequest, _> =
            serde_json::from_str(r#"{ "action": "give_me_everything" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn wire_state_uses_decimal_strings_for_hp() {
        let mut state = GameState::new(0.0, "2026-08-05");
        state.total_hp = "340282366920938463463374607431768211456".parse().unwrap();
        state.lifetime_hp_earned = state.total_hp.clone();

        let wire = WireState::from(&state);
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            value["totalHp"],
            json!("340282366920938463463374607431768211456")
        );
    }

    #[test]
    fn wire_state_roundtrips_through_json() {
        let mut state = GameState::new(777.0, "2026-08-05");
        state.total_hp = BigUint::from(123u32);
        state.lifetime_hp_earned = BigUint::from(456u32);
        state.current_tier = CarTier::Super;
        state.current_gear = 5;
        state.current_rpm = 7200;
        state.redzone_start_ms = Some(700.0);
        state.parts.insert(PartKind::BigTurbo, 4);
        state.tokens = 9;
        state.achievements.insert("hp_1k".to_string());

        let json = serde_json::to_string(&WireState::from(&state)).unwrap();
        let back: WireState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_game_state(), state);
    }

    #[test]
    fn unknown_part_ids_are_dropped_on_receipt() {
        let mut wire = WireState::from(&GameState::new(0.0, "2026-08-05"));
        wire.parts.insert("hover_conversion".to_string(), 3);
        wire.parts.insert("nitrous".to_string(), 2);
        let state = wire.into_game_state();
        assert_eq!(state.parts.len(), 1);
        assert_eq!(state.part_level(PartKind::Nitrous), 2);
    }

    #[test]
    fn response_omits_absent_fields() {
        let resp = ApiResponse {
            success: true,
            ..ApiResponse::default()
        };
        assert_eq!(serde_json::to_string(&resp).unwrap(), r#"{"success":true}"#);
    }

    #[test]
    fn failure_response_carries_error_only() {
        let resp = ApiResponse::failure("Network error");
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Network error"));
        assert!(resp.state.is_none());
        assert!(resp.offline_earnings.is_none());
    }

    #[test]
    fn offline_earnings_field_parses_from_camel_case() {
        let json = r#"{ "success": true, "offlineEarnings": "360000" }"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.offline_earnings.as_deref(), Some("360000"));
    }
}
