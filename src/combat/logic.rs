use rand::Rng;

use super::policy::CombatPolicy;
use super::types::*;
use crate::core::config::CombatConfig;
use crate::core::constants::MIN_ATTACK_DAMAGE;
use crate::core::error::{GameError, Result};

/// Sets up an encounter and computes the first round order.
pub fn start_encounter(combatants: Vec<Combatant>, config: &CombatConfig) -> CombatState {
    let mut state = CombatState {
        combatants,
        config: config.clone(),
        turn: 0,
        round: 0,
        order: Vec::new(),
        cursor: 0,
        winner: None,
    };
    state.winner = check_winner(&state, None);
    if !state.is_terminal() {
        begin_round(&mut state);
    }
    state
}

/// Damage `attacker` would deal to `defender` right now.
///
/// Per element `max(0, damage - resist)`, summed, then scaled by the
/// attacker's aim and the defender's dodge. A connecting attack always
/// deals at least `MIN_ATTACK_DAMAGE`.
pub fn attack_damage(attacker: &Combatant, defender: &Combatant, config: &CombatConfig) -> u32 {
    let raw = attacker
        .stats
        .damage
        .against(&defender.stats.resist)
        .total() as f64;
    let dodge = defender.dodge.clamp(0.0, config.max_dodge_reduction);
    let damage = (raw * attacker.aim.max(1.0) * (1.0 - dodge)) as u32;
    damage.max(MIN_ATTACK_DAMAGE)
}

/// Advances the encounter by one action of the current actor.
pub fn step(mut state: CombatState, action: Action) -> (CombatState, TurnEvent) {
    let Some(actor) = state.current_actor() else {
        let event = TurnEvent {
            turn: state.turn,
            round: state.round,
            actor: 0,
            result: ActionResult::Finished,
            sudden_death: None,
        };
        return (state, event);
    };

    state.turn += 1;
    let round = state.round;
    let mut result = perform(&mut state, actor, action);

    let config = &state.config;
    let combatant = &mut state.combatants[actor];
    let regen = combatant.stamina_regen(config);
    combatant.stamina = (combatant.stamina + regen).min(1.0);
    if let ActionResult::Rested { stamina } = &mut result {
        *stamina = combatant.stamina;
    }

    let retreated = matches!(result, ActionResult::Retreated).then_some(combatant.side);
    state.winner = check_winner(&state, retreated);

    let sudden_death = if state.is_terminal() {
        None
    } else {
        advance(&mut state)
    };

    tracing::debug!(turn = state.turn, round, actor, ?result, "combat turn");
    if let Some(winner) = state.winner {
        tracing::debug!(?winner, turns = state.turn, rounds = state.round, "encounter over");
    }

    let event = TurnEvent {
        turn: state.turn,
        round,
        actor,
        result,
        sudden_death,
    };
    (state, event)
}

fn perform(state: &mut CombatState, actor: usize, action: Action) -> ActionResult {
    let config = state.config.clone();
    match action {
        Action::Attack(target) => attack(state, actor, target, &config),
        Action::Dodge => {
            let combatant = &mut state.combatants[actor];
            let charge = combatant.dodge_charge(&config);
            combatant.dodge = (combatant.dodge + charge).min(config.max_dodge_reduction);
            ActionResult::Dodged {
                dodge: combatant.dodge,
            }
        }
        Action::Aim => {
            state.combatants[actor].aim = config.aim_multiplier;
            ActionResult::Aimed
        }
        Action::UseConsumable(slot) => {
            let combatant = &mut state.combatants[actor];
            if !combatant.capabilities.use_consumables {
                return not_permitted(format!("{} cannot use consumables", combatant.name()));
            }
            match combatant.satchel.get(slot) {
                Some(item) if item.heals() => {}
                _ => return not_permitted(format!("no healing item in satchel slot {}", slot)),
            }
            let item = combatant.satchel.remove(slot);
            let missing = combatant.max_hp().saturating_sub(combatant.hp);
            let healed = item.heal_amount(combatant.max_hp()).min(missing);
            combatant.hp += healed;
            ActionResult::UsedConsumable {
                name: item.name,
                healed,
            }
        }
        Action::LickWounds => {
            let combatant = &mut state.combatants[actor];
            if !combatant.capabilities.lick_wounds {
                return not_permitted(format!("{} cannot lick wounds", combatant.name()));
            }
            let healed = combatant
                .level()
                .min(combatant.max_hp().saturating_sub(combatant.hp));
            combatant.hp += healed;
            ActionResult::LickedWounds { healed }
        }
        Action::Rest => ActionResult::Rested { stamina: 0.0 },
        Action::Retreat => {
            let combatant = &mut state.combatants[actor];
            if !combatant.capabilities.retreat {
                return not_permitted(format!("{} cannot retreat", combatant.name()));
            }
            combatant.retreated = true;
            ActionResult::Retreated
        }
    }
}

fn not_permitted(reason: String) -> ActionResult {
    ActionResult::NotPermitted { reason }
}

fn attack(state: &mut CombatState, actor: usize, target: usize, config: &CombatConfig) -> ActionResult {
    let valid_target = state
        .combatants
        .get(target)
        .is_some_and(|t| t.is_fighting() && t.side != state.combatants[actor].side);
    if !valid_target {
        return not_permitted(format!("combatant {} is not a valid target", target));
    }

    let attacker = &state.combatants[actor];
    let cost = attacker.attack_cost(config);
    if attacker.stamina < cost {
        return ActionResult::Exhausted {
            required: cost,
            available: attacker.stamina,
        };
    }

    let damage = attack_damage(attacker, &state.combatants[target], config);
    let aimed = attacker.aim > 1.0;
    let dodged = state.combatants[target].dodge;

    let attacker = &mut state.combatants[actor];
    attacker.stamina -= cost;
    attacker.aim = 1.0;
    state.combatants[target].dodge = 0.0;

    let revived = apply_damage(state, target, damage);
    ActionResult::Hit {
        target,
        damage,
        aimed,
        dodged,
        target_hp: state.combatants[target].hp,
        revived,
    }
}

/// Subtracts HP, clamped at zero. Players holding a revive item come back
/// instead of dying. Returns whether a revive was used.
fn apply_damage(state: &mut CombatState, target: usize, damage: u32) -> bool {
    let fraction = state.config.revive_hp_fraction;
    let combatant = &mut state.combatants[target];
    combatant.hp = combatant.hp.saturating_sub(damage);
    if combatant.hp > 0 || combatant.kind != CombatantKind::Player {
        return false;
    }
    let Some(slot) = combatant.revive_item() else {
        return false;
    };
    combatant.satchel.remove(slot);
    combatant.hp = ((combatant.max_hp() as f64 * fraction) as u32).clamp(1, combatant.max_hp());
    tracing::debug!(combatant = %combatant.name(), hp = combatant.hp, "revived");
    true
}

fn check_winner(state: &CombatState, retreated: Option<Side>) -> Option<Side> {
    if let Some(side) = retreated {
        return Some(side.opponent());
    }
    let attackers = state.fighting(Side::Attacker).next().is_some();
    let defenders = state.fighting(Side::Defender).next().is_some();
    match (attackers, defenders) {
        (true, true) => None,
        (true, false) => Some(Side::Attacker),
        // Simultaneous defeat goes to the defender
        (false, _) => Some(Side::Defender),
    }
}

fn round_order(state: &CombatState) -> Vec<usize> {
    let mut order: Vec<usize> = state
        .combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_fighting())
        .map(|(i, _)| i)
        .collect();
    order.sort_by_key(|&i| (state.combatants[i].initiative(), i));
    order
}

/// Starts the next round, applying sudden death once the turn limit is passed.
fn begin_round(state: &mut CombatState) -> Option<u32> {
    state.round += 1;
    state.cursor = 0;

    let mut sudden_death = None;
    if state.round > state.config.max_turns {
        let overtime = state.round - state.config.max_turns;
        let damage = state.config.sudden_death_damage.saturating_mul(overtime);
        for i in 0..state.combatants.len() {
            if state.combatants[i].is_fighting() {
                apply_damage(state, i, damage);
            }
        }
        sudden_death = Some(damage);
        state.winner = check_winner(state, None);
    }

    state.order = round_order(state);
    sudden_death
}

fn advance(state: &mut CombatState) -> Option<u32> {
    state.cursor += 1;
    while state.cursor < state.order.len() && !state.combatants[state.order[state.cursor]].is_fighting() {
        state.cursor += 1;
    }
    if state.cursor >= state.order.len() {
        begin_round(state)
    } else {
        None
    }
}

/// Picks the action for `actor`. Players below the auto-heal line drink a
/// healing item if they have one; everything else is up to the policy.
pub fn choose_action(
    state: &CombatState,
    actor: usize,
    policy: &mut dyn CombatPolicy,
    rng: &mut impl Rng,
) -> Action {
    let combatant = &state.combatants[actor];
    if combatant.capabilities.use_consumables {
        let threshold = combatant.max_hp() as f64 * state.config.auto_heal_hp_fraction;
        if (combatant.hp as f64) < threshold {
            if let Some(slot) = combatant.healing_item() {
                return Action::UseConsumable(slot);
            }
        }
    }
    policy.choose_action(state, actor, rng)
}

/// Runs an encounter to the end. Players act through `player_policy`,
/// monsters and pets through `creature_policy`.
pub fn run_encounter(
    mut state: CombatState,
    player_policy: &mut dyn CombatPolicy,
    creature_policy: &mut dyn CombatPolicy,
    rng: &mut impl Rng,
) -> (CombatState, Vec<TurnEvent>) {
    let mut events = Vec::new();
    while let Some(actor) = state.current_actor() {
        let policy: &mut dyn CombatPolicy = match state.combatants[actor].kind {
            CombatantKind::Player => &mut *player_policy,
            CombatantKind::Monster | CombatantKind::Pet => &mut *creature_policy,
        };
        let action = choose_action(&state, actor, policy, rng);
        let (next, event) = step(state, action);
        state = next;
        events.push(event);
    }
    (state, events)
}

/// XP and money each surviving winner earns from the defeated opponents.
///
/// Each defeated opponent is worth `(per_level + per_level_gap × gap) × loser level`,
/// where `gap` is how many levels the loser was above the winner.
pub fn combat_rewards(
    state: &CombatState,
    artifact_chance: f64,
    rng: &mut impl Rng,
) -> Vec<CombatReward> {
    let Some(winner) = state.winner else {
        return Vec::new();
    };
    let config = &state.config;
    let defeated: Vec<&Combatant> = state
        .combatants
        .iter()
        .filter(|c| c.side == winner.opponent() && !c.is_alive())
        .collect();

    state
        .combatants
        .iter()
        .enumerate()
        .filter(|(_, c)| c.side == winner && c.is_fighting())
        .map(|(index, c)| {
            let base: u64 = defeated
                .iter()
                .map(|loser| {
                    let gap = loser.level().saturating_sub(c.level()) as u64;
                    (config.reward_per_level + config.reward_per_level_gap * gap) * loser.level() as u64
                })
                .sum();
            let scaled = (base as f64 * c.stats.modifiers.combat_rewards_mult.max(0.0)) as u64;
            let artifact_piece = !defeated.is_empty() && rng.gen_bool(artifact_chance.clamp(0.0, 1.0));
            CombatReward {
                combatant: index,
                xp: scaled,
                money: scaled,
                artifact_piece,
            }
        })
        .collect()
}

/// Extracts the outcome of a finished encounter.
pub fn finish(state: &CombatState, artifact_chance: f64, rng: &mut impl Rng) -> Result<CombatOutcome> {
    let winner = state
        .winner
        .ok_or_else(|| GameError::ActionNotPermitted("encounter is still running".to_string()))?;
    Ok(CombatOutcome {
        winner,
        turns: state.turn,
        rounds: state.round,
        retreat: state.combatants.iter().any(|c| c.retreated),
        survivors: state
            .combatants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, c)| (i, c.hp))
            .collect(),
        rewards: combat_rewards(state, artifact_chance, rng),
    })
}
