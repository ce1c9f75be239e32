//! Action selection. The engine never decides what a combatant does; a
//! policy does, given a read-only view of the encounter.

use rand::{Rng, RngCore};

use super::types::{Action, CombatState, Combatant};
use crate::character::derived_stats::Stance;

pub trait CombatPolicy {
    fn choose_action(&mut self, state: &CombatState, actor: usize, rng: &mut dyn RngCore) -> Action;
}

fn attack_or_rest(state: &CombatState, actor: usize, combatant: &Combatant) -> Action {
    if combatant.stamina < combatant.attack_cost(&state.config) {
        return Action::Rest;
    }
    match state.first_opponent(actor) {
        Some(target) => Action::Attack(target),
        None => Action::Rest,
    }
}

fn hp_fraction(combatant: &Combatant) -> f64 {
    combatant.hp as f64 / combatant.max_hp().max(1) as f64
}

/// Player behaviour driven by the character's stance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StancePolicy;

impl CombatPolicy for StancePolicy {
    fn choose_action(&mut self, state: &CombatState, actor: usize, rng: &mut dyn RngCore) -> Action {
        let me = &state.combatants[actor];
        match me.stats.stance {
            Stance::Reckless => attack_or_rest(state, actor, me),
            Stance::Balanced => {
                if me.aim <= 1.0 && rng.gen_bool(0.2) {
                    Action::Aim
                } else if rng.gen_bool(0.2) {
                    Action::Dodge
                } else {
                    attack_or_rest(state, actor, me)
                }
            }
            Stance::Safe => {
                if me.capabilities.lick_wounds && hp_fraction(me) < 0.3 {
                    Action::LickWounds
                } else if me.dodge < state.config.max_dodge_reduction && rng.gen_bool(0.4) {
                    Action::Dodge
                } else {
                    attack_or_rest(state, actor, me)
                }
            }
        }
    }
}

/// Behaviour for monsters and pets.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonsterPolicy;

impl CombatPolicy for MonsterPolicy {
    fn choose_action(&mut self, state: &CombatState, actor: usize, rng: &mut dyn RngCore) -> Action {
        let me = &state.combatants[actor];
        if me.capabilities.lick_wounds && hp_fraction(me) < 0.25 && rng.gen_bool(0.3) {
            return Action::LickWounds;
        }
        let roll: f64 = rng.gen();
        if roll < 0.15 && me.aim <= 1.0 {
            Action::Aim
        } else if roll < 0.3 {
            Action::Dodge
        } else {
            attack_or_rest(state, actor, me)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::derived_stats::{effective_stats, BaseCharacter};
    use crate::combat::logic::start_encounter;
    use crate::combat::types::Side;
    use crate::core::config::{CombatConfig, GameConfig};
    use crate::items::Equipment;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn combatant(stance: Stance, side: Side) -> Combatant {
        let mut base = BaseCharacter::new("Ada", 3);
        base.stance = stance;
        let stats = effective_stats(&base, &Equipment::new(), &[], &GameConfig::default()).unwrap();
        Combatant::player(stats, side, vec![])
    }

    #[test]
    fn test_reckless_always_attacks() {
        let state = start_encounter(
            vec![combatant(Stance::Reckless, Side::Attacker), combatant(Stance::Balanced, Side::Defender)],
            &CombatConfig::default(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(StancePolicy.choose_action(&state, 0, &mut rng), Action::Attack(1));
        }
    }

    #[test]
    fn test_tired_combatants_rest() {
        let mut tired = combatant(Stance::Reckless, Side::Attacker);
        tired.stamina = 0.0;
        let state = start_encounter(
            vec![tired, combatant(Stance::Balanced, Side::Defender)],
            &CombatConfig::default(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(StancePolicy.choose_action(&state, 0, &mut rng), Action::Rest);
    }

    #[test]
    fn test_monster_policy_targets_opponents_only() {
        let state = start_encounter(
            vec![
                combatant(Stance::Balanced, Side::Attacker),
                combatant(Stance::Balanced, Side::Defender),
                combatant(Stance::Balanced, Side::Defender),
            ],
            &CombatConfig::default(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            if let Action::Attack(target) = MonsterPolicy.choose_action(&state, 1, &mut rng) {
                assert_eq!(target, 0);
            }
        }
    }
}
