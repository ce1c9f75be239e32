use thiserror::Error;
use uuid::Uuid;

use crate::items::EquipmentSlot;

/// Validation failures returned by the simulation core.
///
/// Every variant is recoverable by the caller. The operation that produced it
/// has left its inputs untouched.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid zone level {0}: zones must be level 1 or higher")]
    InvalidZoneLevel(u32),

    #[error("item '{item}' cannot be equipped in the {slot:?} slot")]
    InvalidEquipmentSlot { item: String, slot: EquipmentSlot },

    #[error("insufficient funds: {required} needed, {available} available")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("insufficient stamina: {required:.2} needed, {available:.2} available")]
    InsufficientStamina { required: f64, available: f64 },

    #[error("not eligible for ascension: {0}")]
    AscensionIneligible(String),

    #[error("guild is full ({capacity} members)")]
    GuildFull { capacity: u32 },

    #[error("raid precondition failed: {0}")]
    RaidPreconditionFailed(String),

    #[error("already at the maximum level ({0})")]
    MaxLevelReached(u32),

    #[error("outcome {0} was already applied")]
    DuplicateOutcome(Uuid),

    #[error("artifact {0} is already owned")]
    DuplicateArtifact(Uuid),

    #[error("insufficient artifact pieces: {required} needed, {available} available")]
    InsufficientArtifactPieces { required: u32, available: u32 },

    #[error("insufficient eldritch power: {required} needed, {available} available")]
    InsufficientPower { required: u32, available: u32 },

    #[error("action not permitted: {0}")]
    ActionNotPermitted(String),

    #[error("tax rate {rate}% exceeds the maximum of {max}%")]
    InvalidTax { rate: u32, max: u32 },

    #[error("player {0} is not a member of this guild")]
    NotAMember(u64),

    #[error("player {0} is already a member of this guild")]
    AlreadyMember(u64),

    #[error("invalid raid transition from {0}")]
    InvalidRaidTransition(String),

    #[error("invalid QTE option {0}")]
    InvalidQteOption(usize),

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
