//! セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   新フィールドの追加のみの場合はこの値を変えない（旧データを維持できる）。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! 旧バージョンのセーブデータは、`MIN_COMPATIBLE_VERSION` 以上であれば
//! 不足フィールドにデフォルト値を補完して読み込む。
//!
//! ## BigInt の表現
//!
//! HP 残高は上限なし整数なので、JSON 上は `"BI:<10進文字列>"` の形で
//! ロスレスに表現する（通常の数値文字列と区別するためのタグ付き形式）。

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::config::{CarTier, PartKind, MAX_RPM};
use crate::state::GameState;

/// セーブデータのフォーマットバージョン。
/// フィールド追加時にインクリメントすること。
const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
#[cfg(target_arch = "wasm32")]
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "TURBO_TYCOON_V1";

/// シリアライズ用のセーブデータ構造体。
/// 一時的な表示状態（パーフェクトシフトのフラッシュ等）は含まない。
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    #[serde(with = "hp_string")]
    total_hp: BigUint,
    #[serde(with = "hp_string")]
    lifetime_hp_earned: BigUint,
    tier: u8,
    rpm: u32,
    gear: u8,
    last_observed_ms: f64,
    redzone_start_ms: Option<f64>,
    throttle_level: u32,
    ecu_level: u32,
    /// 各パーツのレベル。PartKind::all() の順。
    part_levels: Vec<u32>,
    tokens: u32,
    tokens_earned_today: u32,
    last_token_date: String,
    achievements: Vec<String>,
}

/// `BigUint` を `"BI:<decimal>"` 形式の文字列として読み書きする。
mod hp_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const TAG: &str = "BI:";

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{TAG}{value}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw
            .strip_prefix(TAG)
            .ok_or_else(|| de::Error::custom(format!("missing {TAG} tag: {raw:?}")))?;
        digits
            .parse::<BigUint>()
            .map_err(|e| de::Error::custom(format!("bad big integer {digits:?}: {e}")))
    }
}

/// GameState からセーブ用データを抽出する。
fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            total_hp: state.total_hp.clone(),
            lifetime_hp_earned: state.lifetime_hp_earned.clone(),
            tier: state.current_tier.index(),
            rpm: state.current_rpm,
            gear: state.current_gear,
            last_observed_ms: state.last_observed_ms,
            redzone_start_ms: state.redzone_start_ms,
            throttle_level: state.throttle_level,
            ecu_level: state.ecu_level,
            part_levels: PartKind::all()
                .iter()
                .map(|kind| state.part_level(*kind))
                .collect(),
            tokens: state.tokens,
            tokens_earned_today: state.tokens_earned_today,
            last_token_date: state.last_token_date.clone(),
            achievements: state.achievements.iter().cloned().collect(),
        },
    }
}

/// セーブデータを GameState に復元する。
/// 範囲外の値はクランプし、不明なパーツインデックスは無視する。
fn apply_save(state: &mut GameState, save: &GameSave) {
    state.total_hp = save.total_hp.clone();
    state.lifetime_hp_earned = save.lifetime_hp_earned.clone();
    state.current_tier = CarTier::from_index(save.tier).unwrap_or(CarTier::Junker);
    state.current_rpm = save.rpm.min(MAX_RPM);
    state.current_gear = save.gear.clamp(1, 6);
    state.last_observed_ms = save.last_observed_ms;
    state.redzone_start_ms = save.redzone_start_ms;
    state.throttle_level = save.throttle_level;
    state.ecu_level = save.ecu_level;

    state.parts.clear();
    for (i, level) in save.part_levels.iter().enumerate() {
        if *level == 0 {
            continue;
        }
        if let Some(kind) = PartKind::all().get(i) {
            state.parts.insert(*kind, *level);
        }
    }

    state.tokens = save.tokens;
    state.tokens_earned_today = save.tokens_earned_today;
    state.last_token_date = save.last_token_date.clone();
    state.achievements = save.achievements.iter().cloned().collect();
}

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// ゲーム状態を localStorage に保存する。
/// 失敗時はログを出して無視する（シミュレーションを止めない）。
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) {
    let save_data = extract_save(state);
    let json = match serde_json::to_string(&save_data) {
        Ok(j) => j,
        Err(e) => {
            log::warn!("failed to serialize save: {e}");
            return;
        }
    };

    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            log::warn!("failed to write save to localStorage: {e:?}");
        }
    }
}

/// localStorage からゲーム状態を復元する。
/// バージョン不一致やパースエラーの場合は false を返す（新規ゲームになる）。
#[cfg(target_arch = "wasm32")]
pub fn load_game(state: &mut GameState) -> bool {
    let storage = match get_storage() {
        Some(s) => s,
        None => return false,
    };

    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return false,
    };

    let save_data: SaveData = match serde_json::from_str(&json) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("failed to parse save, discarding: {e}");
            let _ = storage.remove_item(STORAGE_KEY);
            return false;
        }
    };

    if save_data.version < MIN_COMPATIBLE_VERSION {
        log::info!(
            "save too old (saved={}, min_compatible={}), starting fresh",
            save_data.version,
            MIN_COMPATIBLE_VERSION
        );
        let _ = storage.remove_item(STORAGE_KEY);
        return false;
    }

    if save_data.version < SAVE_VERSION {
        log::info!(
            "migrating old save (saved={}, current={})",
            save_data.version,
            SAVE_VERSION
        );
    }

    apply_save(state, &save_data.game);
    true
}

/// セーブデータを削除する。
#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
