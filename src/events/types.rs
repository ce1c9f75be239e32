use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{GameError, Result};
use crate::progression::{RewardDelta, RewardSource};

/// What a QTE effect changes on the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QteEffectKind {
    Xp,
    Money,
    ArtifactPieces,
    Renown,
    Sanity,
}

impl QteEffectKind {
    /// Two-letter code used in effect strings.
    pub fn code(&self) -> &'static str {
        match self {
            QteEffectKind::Xp => "xp",
            QteEffectKind::Money => "mn",
            QteEffectKind::ArtifactPieces => "ap",
            QteEffectKind::Renown => "rn",
            QteEffectKind::Sanity => "sa",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "xp" => Some(QteEffectKind::Xp),
            "mn" => Some(QteEffectKind::Money),
            "ap" => Some(QteEffectKind::ArtifactPieces),
            "rn" => Some(QteEffectKind::Renown),
            "sa" => Some(QteEffectKind::Sanity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QteEffect {
    pub kind: QteEffectKind,
    pub amount: u64,
}

impl QteEffect {
    pub fn new(kind: QteEffectKind, amount: u64) -> Self {
        Self { kind, amount }
    }
}

/// Effect list written as `"xp 100, mn 50, ap 1, rn 5"`. An empty string is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EffectList(pub Vec<QteEffect>);

impl EffectList {
    pub fn effects(&self) -> &[QteEffect] {
        &self.0
    }
}

impl FromStr for EffectList {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let mut effects = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.split_whitespace();
            let (Some(code), Some(amount), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(GameError::Config(format!("malformed effect '{}'", entry)));
            };
            let kind = QteEffectKind::from_code(code)
                .ok_or_else(|| GameError::Config(format!("unknown effect code '{}'", code)))?;
            let amount = amount
                .parse::<u64>()
                .map_err(|_| GameError::Config(format!("invalid effect amount '{}'", amount)))?;
            effects.push(QteEffect::new(kind, amount));
        }
        Ok(Self(effects))
    }
}

impl TryFrom<String> for EffectList {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for EffectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} {}", e.kind.code(), e.amount))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl From<EffectList> for String {
    fn from(list: EffectList) -> Self {
        list.to_string()
    }
}

/// One choice offered by a quick-time event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QteOption {
    pub label: String,
    /// Success chance in percent.
    pub chance: u32,
    #[serde(default)]
    pub rewards: EffectList,
    #[serde(default)]
    pub maluses: EffectList,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QteDefinition {
    pub description: String,
    #[serde(default)]
    pub options: Vec<QteOption>,
}

impl QteDefinition {
    pub fn validate(&self) -> Result<()> {
        if self.options.is_empty() {
            return Err(GameError::Config(format!(
                "QTE '{}' has no options",
                self.description
            )));
        }
        if let Some(option) = self.options.iter().find(|o| o.chance > 100) {
            return Err(GameError::Config(format!(
                "QTE option '{}' has a chance above 100%",
                option.label
            )));
        }
        Ok(())
    }
}

/// Result of picking an option in a quick-time event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QteOutcome {
    pub id: Uuid,
    pub option: usize,
    pub success: bool,
    /// 1..=100, success when at or below the option's chance.
    pub roll: u32,
    pub gains: Vec<QteEffect>,
    pub losses: Vec<QteEffect>,
}

/// Rewards of a zone (or town) event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventOutcome {
    pub id: Uuid,
    pub zone_level: u32,
    pub xp: u64,
    pub money: u64,
}

impl From<&EventOutcome> for RewardDelta {
    fn from(outcome: &EventOutcome) -> Self {
        Self {
            xp: outcome.xp,
            money: outcome.money,
            ..RewardDelta::new(outcome.id, RewardSource::Event)
        }
    }
}
