//! Engine tuning constants, the car tier ladder, the part catalog and the
//! token/achievement tables.
//!
//! All game balance lives here. The simulation code never hardcodes a
//! number that a balance pass might want to touch.

use crate::achievements::{AchievementDef, Condition};

/// RPM ceiling. Hitting it on a tap below gear 6 is a perfect shift.
pub const MAX_RPM: u32 = 8000;
/// Lower bound of the redzone band [REDLINE, MAX_RPM).
pub const REDLINE: u32 = 7000;
/// Falling under this RPM above gear 1 forces a downshift.
pub const DOWNSHIFT_THRESHOLD: u32 = 1500;

/// Engine evaluation period: 100 ms, i.e. 10 ticks per second.
pub const TICK_MS: f64 = 100.0;
pub const TICKS_PER_SEC: u32 = 10;

/// Dwell time in the redzone before the engine force-shifts for you.
pub const SAFETY_SHIFT_THRESHOLD_MS: f64 = 1500.0;
/// How long the perfect-shift flag stays up for the presentation layer.
pub const PERFECT_SHIFT_FLASH_MS: f64 = 800.0;

/// Post-shift RPM: a perfect shift lands near the power band, a safety
/// shift drops you into the grind.
pub const PERFECT_SHIFT_RPM: u32 = 5000;
pub const STANDARD_SHIFT_RPM: u32 = 3000;
/// Rev-match blip on a downshift, kept above the threshold so the next
/// tick does not immediately downshift again.
pub const DOWNSHIFT_RPM: u32 = 4500;

/// Constant drag model: RPM lost per second at gear 1, scaled by
/// `DRAG_GEAR_FACTOR^(gear-1)` in higher gears.
pub const BASE_DECAY_PER_SEC: f64 = 150.0;
pub const DRAG_GEAR_FACTOR: f64 = 1.8;

/// Base HP per tap and the throttle upgrade's linear bonus.
pub const BASE_TAP_HP: u64 = 10;
pub const TAP_HP_PER_THROTTLE_LEVEL: u64 = 5;
/// Base RPM per tap and the ECU upgrade's linear bonus.
pub const BASE_TAP_RPM: u32 = 90;
pub const TAP_RPM_PER_ECU_LEVEL: u32 = 5;

/// One cost/output formula family covers all ten parts and both manual
/// upgrades; only the per-item base constants differ.
pub const COST_SCALING: f64 = 1.12;
pub const OUTPUT_SCALING: f64 = 1.10;
pub const MANUAL_UPGRADE_BASE_COST: u64 = 100;

/// Offline earnings: ignore absences shorter than this...
pub const OFFLINE_MIN_MS: f64 = 10_000.0;
/// ...and cap the credited window at 24 hours.
pub const OFFLINE_CAP_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Highest token package size; also the per-day exchange ceiling.
pub const DAILY_TOKEN_CAP: u32 = 75;

/// Periodic side-task cadences, in ticks (see `game::TurboGame`).
pub const ACHIEVEMENT_SWEEP_TICKS: u64 = 10; // 1 s
pub const AUTOSAVE_TICKS: u64 = 50; // 5 s
pub const DAILY_RESET_CHECK_TICKS: u64 = 600; // 60 s

/// How long one achievement toast holds the screen.
pub const TOAST_HOLD_MS: f64 = 5000.0;

/// Gear-dependent income multiplier for active taps, gears 1..=6.
pub fn gear_multiplier(gear: u8) -> f64 {
    match gear {
        1 => 1.0,
        2 => 1.25,
        3 => 1.5,
        4 => 1.75,
        5 => 2.0,
        _ => 2.5,
    }
}

/// Prestige ranks. Each tier doubles all income (2^tier) on top of its own
/// tap multiplier, and is gated on cumulative lifetime HP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CarTier {
    Junker,
    StreetTuner,
    Sports,
    Super,
    Hyper,
}

impl CarTier {
    /// All tiers in prestige order.
    pub fn all() -> &'static [CarTier] {
        &[
            CarTier::Junker,
            CarTier::StreetTuner,
            CarTier::Sports,
            CarTier::Super,
            CarTier::Hyper,
        ]
    }

    pub fn index(&self) -> u8 {
        match self {
            CarTier::Junker => 0,
            CarTier::StreetTuner => 1,
            CarTier::Sports => 2,
            CarTier::Super => 3,
            CarTier::Hyper => 4,
        }
    }

    pub fn from_index(idx: u8) -> Option<CarTier> {
        CarTier::all().get(idx as usize).copied()
    }

    /// The car you are driving at this tier.
    pub fn name(&self) -> &'static str {
        match self {
            CarTier::Junker => "'02 Toyota Camry",
            CarTier::StreetTuner => "'16 Honda Civic",
            CarTier::Sports => "'20 5.0 Ford Mustang",
            CarTier::Super => "'22 Porsche 911",
            CarTier::Hyper => "'25 Ferrari 296 GTB",
        }
    }

    /// Tap-income multiplier of the tier itself (distinct from the 2^tier
    /// prestige doubling).
    pub fn multiplier(&self) -> f64 {
        match self {
            CarTier::Junker => 1.0,
            CarTier::StreetTuner => 1.5,
            CarTier::Sports => 2.0,
            CarTier::Super => 3.0,
            CarTier::Hyper => 4.0,
        }
    }

    /// Lifetime HP needed to prestige *into* this tier.
    pub fn required_lifetime_hp(&self) -> u64 {
        match self {
            CarTier::Junker => 0,
            CarTier::StreetTuner => 5_000_000,
            CarTier::Sports => 50_000_000,
            CarTier::Super => 500_000_000,
            CarTier::Hyper => 5_000_000_000,
        }
    }

    pub fn next(&self) -> Option<CarTier> {
        CarTier::from_index(self.index() + 1)
    }
}

/// The ten purchasable passive-income generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PartKind {
    Intake,
    Exhaust,
    EcuMap,
    Tires,
    Coilovers,
    Downpipe,
    BigTurbo,
    LsdClutch,
    Nitrous,
    Widebody,
}

impl PartKind {
    /// All parts in shop display order.
    pub fn all() -> &'static [PartKind] {
        &[
            PartKind::Intake,
            PartKind::Exhaust,
            PartKind::EcuMap,
            PartKind::Tires,
            PartKind::Coilovers,
            PartKind::Downpipe,
            PartKind::BigTurbo,
            PartKind::LsdClutch,
            PartKind::Nitrous,
            PartKind::Widebody,
        ]
    }

    pub fn index(&self) -> usize {
        PartKind::all().iter().position(|k| k == self).unwrap_or(0)
    }

    /// Stable identifier used in saves and on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            PartKind::Intake => "intake",
            PartKind::Exhaust => "exhaust",
            PartKind::EcuMap => "ecu_map",
            PartKind::Tires => "tires",
            PartKind::Coilovers => "coilovers",
            PartKind::Downpipe => "downpipe",
            PartKind::BigTurbo => "big_turbo",
            PartKind::LsdClutch => "lsd_clutch",
            PartKind::Nitrous => "nitrous",
            PartKind::Widebody => "widebody",
        }
    }

    pub fn from_id(id: &str) -> Option<PartKind> {
        PartKind::all().iter().find(|k| k.id() == id).copied()
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            PartKind::Intake => "Cold Air Intake",
            PartKind::Exhaust => "Cat-Back Exhaust",
            PartKind::EcuMap => "Stage 1 ECU Map",
            PartKind::Tires => "Semi-Slick Tires",
            PartKind::Coilovers => "Coilover Kit",
            PartKind::Downpipe => "High-Flow Downpipe",
            PartKind::BigTurbo => "Big Turbo",
            PartKind::LsdClutch => "LSD & Clutch",
            PartKind::Nitrous => "Nitrous System",
            PartKind::Widebody => "Widebody Aero",
        }
    }

    /// Cost of level 1, in HP.
    pub fn base_cost(&self) -> u64 {
        match self {
            PartKind::Intake => 66,
            PartKind::Exhaust => 201,
            PartKind::EcuMap => 696,
            PartKind::Tires => 1_500,
            PartKind::Coilovers => 4_000,
            PartKind::Downpipe => 10_000,
            PartKind::BigTurbo => 25_000,
            PartKind::LsdClutch => 60_000,
            PartKind::Nitrous => 150_000,
            PartKind::Widebody => 400_000,
        }
    }

    /// Nominal HP per second (actual output is scaled by level, see
    /// `economy::part_output`).
    pub fn base_output(&self) -> u64 {
        match self {
            PartKind::Intake => 1,
            PartKind::Exhaust => 3,
            PartKind::EcuMap => 8,
            PartKind::Tires => 20,
            PartKind::Coilovers => 45,
            PartKind::Downpipe => 100,
            PartKind::BigTurbo => 250,
            PartKind::LsdClutch => 550,
            PartKind::Nitrous => 1_200,
            PartKind::Widebody => 3_000,
        }
    }
}

/// The two manual (per-tap) upgrades. They share the part cost formula
/// with `MANUAL_UPGRADE_BASE_COST` as base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManualUpgrade {
    /// +5 HP per tap per level.
    Throttle,
    /// +5 RPM per tap per level.
    Ecu,
}

impl ManualUpgrade {
    pub fn id(&self) -> &'static str {
        match self {
            ManualUpgrade::Throttle => "throttle",
            ManualUpgrade::Ecu => "ecu",
        }
    }

    pub fn from_id(id: &str) -> Option<ManualUpgrade> {
        match id {
            "throttle" => Some(ManualUpgrade::Throttle),
            "ecu" => Some(ManualUpgrade::Ecu),
            _ => None,
        }
    }
}

/// HP-to-token exchange packages. One successful exchange per calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPackage {
    pub id: &'static str,
    pub hp_cost: u64,
    pub token_amount: u32,
}

pub const TOKEN_PACKAGES: &[TokenPackage] = &[
    TokenPackage {
        id: "small",
        hp_cost: 5_000_000,
        token_amount: 3,
    },
    TokenPackage {
        id: "medium",
        hp_cost: 50_000_000,
        token_amount: 15,
    },
    TokenPackage {
        id: "large",
        hp_cost: 500_000_000,
        token_amount: 75,
    },
];

pub fn token_package(id: &str) -> Option<&'static TokenPackage> {
    TOKEN_PACKAGES.iter().find(|p| p.id == id)
}

/// Achievement table. Conditions are declarative so the sweep can evaluate
/// them generically against `(state, hp_per_second)`.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "hp_1k",
        title: "Baby's First Beater",
        description: "You hit 1,000 Lifetime HP.",
        reward_tokens: 5,
        condition: Condition::LifetimeHpAtLeast(1_000),
    },
    AchievementDef {
        id: "hp_10k",
        title: "Camry Weapon",
        description: "You hit 10,000 Lifetime HP.",
        reward_tokens: 10,
        condition: Condition::LifetimeHpAtLeast(10_000),
    },
    AchievementDef {
        id: "hp_100k",
        title: "Faster Than Your Ex",
        description: "You hit 100,000 Lifetime HP.",
        reward_tokens: 10,
        condition: Condition::LifetimeHpAtLeast(100_000),
    },
    AchievementDef {
        id: "hp_1m",
        title: "Ego Check",
        description: "1 Million HP lifetime.",
        reward_tokens: 15,
        condition: Condition::LifetimeHpAtLeast(1_000_000),
    },
    AchievementDef {
        id: "hp_10m",
        title: "Vengeance Shift",
        description: "10 Million HP lifetime.",
        reward_tokens: 20,
        condition: Condition::LifetimeHpAtLeast(10_000_000),
    },
    AchievementDef {
        id: "gear_6",
        title: "Boost Heaven",
        description: "Reach Gear 6 for the first time.",
        reward_tokens: 0,
        condition: Condition::GearReached(6),
    },
    AchievementDef {
        id: "prestige_1",
        title: "Fresh Start",
        description: "Reach Prestige Tier 1.",
        reward_tokens: 0,
        condition: Condition::TierAtLeast(1),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ladder_is_ordered() {
        let tiers = CarTier::all();
        for pair in tiers.windows(2) {
            assert!(pair[0].required_lifetime_hp() < pair[1].required_lifetime_hp());
            assert!(pair[0].multiplier() < pair[1].multiplier());
        }
    }

    #[test]
    fn tier_next_stops_at_hyper() {
        assert_eq!(CarTier::Junker.next(), Some(CarTier::StreetTuner));
        assert_eq!(CarTier::Super.next(), Some(CarTier::Hyper));
        assert_eq!(CarTier::Hyper.next(), None);
    }

    #[test]
    fn tier_index_roundtrip() {
        for tier in CarTier::all() {
            assert_eq!(CarTier::from_index(tier.index()), Some(*tier));
        }
        assert_eq!(CarTier::from_index(5), None);
    }

    #[test]
    fn part_ids_roundtrip() {
        for part in PartKind::all() {
            assert_eq!(PartKind::from_id(part.id()), Some(*part));
        }
        assert_eq!(PartKind::from_id("flux_capacitor"), None);
    }

    #[test]
    fn part_catalog_has_ten_entries_in_price_order() {
        let parts = PartKind::all();
        assert_eq!(parts.len(), 10);
        for pair in parts.windows(2) {
            assert!(pair[0].base_cost() < pair[1].base_cost());
        }
    }

    #[test]
    fn gear_multiplier_table() {
        assert_eq!(gear_multiplier(1), 1.0);
        assert_eq!(gear_multiplier(2), 1.25);
        assert_eq!(gear_multiplier(6), 2.5);
    }

    #[test]
    fn no_token_package_beats_daily_cap() {
        for pkg in TOKEN_PACKAGES {
            assert!(pkg.token_amount <= DAILY_TOKEN_CAP);
        }
    }

    #[test]
    fn achievement_ids_unique() {
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            for b in &ACHIEVEMENTS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
