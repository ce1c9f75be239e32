use serde::{Deserialize, Serialize};

use crate::character::derived_stats::{CharacterStats, Stance};
use crate::core::config::CombatConfig;
use crate::core::error::GameError;
use crate::items::Consumable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CombatantKind {
    Player,
    Monster,
    Pet,
}

/// The side that started the encounter is the attacker. Defenders win ties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// What a combatant is allowed to do, independent of what kind of creature it is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    pub use_consumables: bool,
    pub lick_wounds: bool,
    pub retreat: bool,
}

impl Capabilities {
    /// Default capability set for a kind. Players only lick wounds with the matching trait.
    pub fn for_kind(kind: CombatantKind, lick_wounds_trait: bool) -> Self {
        match kind {
            CombatantKind::Player => Self {
                use_consumables: true,
                lick_wounds: lick_wounds_trait,
                retreat: true,
            },
            CombatantKind::Monster | CombatantKind::Pet => Self {
                use_consumables: false,
                lick_wounds: true,
                retreat: false,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Combatant {
    pub stats: CharacterStats,
    pub kind: CombatantKind,
    pub side: Side,
    pub hp: u32,
    /// Between 0 and 1.
    pub stamina: f64,
    /// Fraction of the next hit that is dodged.
    pub dodge: f64,
    /// Multiplier for the next attack, 1.0 when not aiming.
    pub aim: f64,
    pub capabilities: Capabilities,
    pub satchel: Vec<Consumable>,
    pub retreated: bool,
}

impl Combatant {
    pub fn new(stats: CharacterStats, kind: CombatantKind, side: Side) -> Self {
        let capabilities = Capabilities::for_kind(kind, stats.modifiers.lick_wounds);
        Self {
            hp: stats.hp,
            stats,
            kind,
            side,
            stamina: 1.0,
            dodge: 0.0,
            aim: 1.0,
            capabilities,
            satchel: Vec::new(),
            retreated: false,
        }
    }

    pub fn player(stats: CharacterStats, side: Side, satchel: Vec<Consumable>) -> Self {
        let mut combatant = Self::new(stats, CombatantKind::Player, side);
        combatant.satchel = satchel;
        combatant
    }

    pub fn monster(stats: CharacterStats, side: Side) -> Self {
        Self::new(stats, CombatantKind::Monster, side)
    }

    pub fn pet(stats: CharacterStats, side: Side) -> Self {
        Self::new(stats, CombatantKind::Pet, side)
    }

    pub fn name(&self) -> &str {
        &self.stats.name
    }

    pub fn level(&self) -> u32 {
        self.stats.level
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Alive and still on the field.
    pub fn is_fighting(&self) -> bool {
        self.is_alive() && !self.retreated
    }

    pub fn weight(&self) -> u32 {
        self.stats.weight
    }

    /// Lower acts first.
    pub fn initiative(&self) -> i64 {
        let offset = match self.stats.stance {
            Stance::Reckless => -1,
            Stance::Balanced => 0,
            Stance::Safe => 1,
        };
        self.weight() as i64 + offset
    }

    pub fn attack_cost(&self, config: &CombatConfig) -> f64 {
        config.attack_stamina_base + self.weight() as f64 * config.stamina_per_weight
    }

    pub fn stamina_regen(&self, config: &CombatConfig) -> f64 {
        config.stamina_regen / (1.0 + self.weight() as f64 / config.stamina_weight_scale)
    }

    pub fn dodge_charge(&self, config: &CombatConfig) -> f64 {
        (config.dodge_base_charge + config.dodge_charge_per_agility * self.stats.stats.agility() as f64
            - config.dodge_penalty_per_weight * self.weight() as f64)
            .max(0.0)
    }

    pub fn healing_item(&self) -> Option<usize> {
        self.satchel.iter().position(|item| item.heals())
    }

    pub fn revive_item(&self) -> Option<usize> {
        self.satchel.iter().position(|item| item.revive)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    Attack(usize),
    Dodge,
    Aim,
    /// Satchel index.
    UseConsumable(usize),
    LickWounds,
    Rest,
    Retreat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ActionResult {
    Hit {
        target: usize,
        damage: u32,
        aimed: bool,
        dodged: f64,
        target_hp: u32,
        revived: bool,
    },
    Dodged {
        dodge: f64,
    },
    Aimed,
    UsedConsumable {
        name: String,
        healed: u32,
    },
    LickedWounds {
        healed: u32,
    },
    Rested {
        stamina: f64,
    },
    /// Attack attempted without enough stamina. The turn became a rest.
    Exhausted {
        required: f64,
        available: f64,
    },
    /// The action is not available to this combatant. The turn became a rest.
    NotPermitted {
        reason: String,
    },
    Retreated,
    /// Step called on a finished encounter.
    Finished,
}

/// Record of one step of the encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnEvent {
    pub turn: u32,
    pub round: u32,
    pub actor: usize,
    pub result: ActionResult,
    /// Sudden death damage dealt to every combatant when this turn closed an
    /// overtime round.
    pub sudden_death: Option<u32>,
}

impl TurnEvent {
    /// The validation failure carried by a degraded turn, if any.
    pub fn error(&self) -> Option<GameError> {
        match &self.result {
            ActionResult::Exhausted {
                required,
                available,
            } => Some(GameError::InsufficientStamina {
                required: *required,
                available: *available,
            }),
            ActionResult::NotPermitted { reason } => Some(GameError::ActionNotPermitted(reason.clone())),
            _ => None,
        }
    }
}

/// Full state of one encounter. Only [`crate::combat::step`] changes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombatState {
    pub combatants: Vec<Combatant>,
    pub config: CombatConfig,
    /// Actions taken so far.
    pub turn: u32,
    pub round: u32,
    /// Combatant indices in acting order for the current round.
    pub order: Vec<usize>,
    pub cursor: usize,
    pub winner: Option<Side>,
}

impl CombatState {
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Index of the combatant whose turn it is.
    pub fn current_actor(&self) -> Option<usize> {
        if self.is_terminal() {
            return None;
        }
        self.order.get(self.cursor).copied()
    }

    pub fn fighting(&self, side: Side) -> impl Iterator<Item = (usize, &Combatant)> {
        self.combatants
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.side == side && c.is_fighting())
    }

    pub fn first_opponent(&self, actor: usize) -> Option<usize> {
        let side = self.combatants.get(actor)?.side.opponent();
        self.fighting(side).map(|(i, _)| i).next()
    }
}

/// Per-combatant share of the encounter rewards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombatReward {
    pub combatant: usize,
    pub xp: u64,
    pub money: u64,
    pub artifact_piece: bool,
}

/// What an encounter hands back once it is over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombatOutcome {
    pub winner: Side,
    pub turns: u32,
    pub rounds: u32,
    pub retreat: bool,
    pub survivors: Vec<(usize, u32)>,
    pub rewards: Vec<CombatReward>,
}
