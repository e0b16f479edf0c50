//! Combat resolution for a single action.
//!
//! The `CombatResolver` applies one ability from a caster to a target:
//! - Reaction abilities narrate and change nothing
//! - Healing abilities roll the die plus the stat modifier and heal
//! - Damaging abilities roll to hit, roll damage, adjust for the target's
//!   affinities and apply the result
//!
//! # Hit and Damage
//!
//! ```text
//! attack = d20 + modifier(caster.stat) + proficiency(caster)
//! AC     = 10 + modifier(target.dexterity)
//! hit    = natural 20 || attack >= AC
//! damage = max(1, sum(count (x2 on crit) rolls of d(sides)) + modifier(caster.stat))
//! ```
//!
//! Affinities are then applied with priority immune (0) > resistant (half,
//! floored) > vulnerable (double).

use tracing::debug;

use crate::ability::{Ability, AbilityEffect};
use crate::character::{Affinities, Character, EffectType, Reaction};
use crate::dice::{DiceRoller, Die};
use crate::stats::StatKind;

/// Natural roll that always hits and doubles the damage dice.
pub const CRITICAL_ROLL: i32 = 20;

/// Base armor class before the dexterity modifier.
pub const BASE_ARMOR_CLASS: i32 = 10;

/// Outcome of a d20 attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRoll {
    /// Face shown on the d20.
    pub natural: i32,
    /// Natural roll plus stat modifier plus proficiency.
    pub total: i32,
    /// True on a natural 20.
    pub crit: bool,
}

impl HitRoll {
    /// Builds a hit roll from a natural face and a flat bonus.
    #[must_use]
    pub const fn new(natural: i32, bonus: i32) -> Self {
        Self {
            natural,
            total: natural + bonus,
            crit: natural == CRITICAL_ROLL,
        }
    }

    /// True if this roll lands against the given armor class.
    #[must_use]
    pub const fn hits(&self, armor_class: i32) -> bool {
        self.crit || self.total >= armor_class
    }
}

/// Stateless combat math.
///
/// # Example
///
/// ```
/// use boss_battles_core::abilities::StrikeAbility;
/// use boss_battles_core::battle::CombatResolver;
/// use boss_battles_core::character::{BossKind, Character};
/// use boss_battles_core::dice::ScriptedDice;
///
/// let fighter = Character::fighter("mrgallo");
/// let mut squirrel = BossKind::Squirrel.spawn();
///
/// // natural 20, then two d2 faces of 2
/// let mut dice = ScriptedDice::new([20, 2, 2]);
/// let message = CombatResolver::resolve(&fighter, &StrikeAbility::punch(), &mut squirrel, &mut dice);
///
/// assert!(message.contains("mrgallo inflicts 7 (CRIT)"));
/// assert!(!squirrel.is_conscious());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Rolls a d20 attack using the caster's modifier for `stat`.
    pub fn hit_roll(caster: &Character, stat: StatKind, dice: &mut dyn DiceRoller) -> HitRoll {
        let natural = i32::try_from(dice.d20()).unwrap_or(i32::MAX);
        HitRoll::new(
            natural,
            caster.stat_modifier(stat) + caster.proficiency_bonus(),
        )
    }

    /// Armor class of a target.
    #[must_use]
    pub const fn armor_class(target: &Character) -> i32 {
        BASE_ARMOR_CLASS + target.stat_modifier(StatKind::Dexterity)
    }

    /// Rolls damage: doubled dice on a crit, plus the modifier, floored at 1.
    pub fn damage_roll(die: Die, modifier: i32, crit: bool, dice: &mut dyn DiceRoller) -> i32 {
        let die = if crit { die.doubled() } else { die };
        die.roll_sum(dice).saturating_add(modifier).max(1)
    }

    /// Adjusts damage for a target's affinities.
    #[must_use]
    pub fn adjust_damage(affinities: &Affinities, damage: i32, effect: EffectType) -> (i32, Reaction) {
        let reaction = affinities.reaction_to(effect);
        let adjusted = match reaction {
            Reaction::Immune => 0,
            Reaction::Resistant => damage.div_euclid(2),
            Reaction::Vulnerable => damage.saturating_mul(2),
            Reaction::Normal => damage,
        };
        (adjusted, reaction)
    }

    /// Resolves one ability use and returns the combat log line.
    ///
    /// Mutates only `target`. The caster is borrowed immutably, so a caster
    /// targeting itself must be passed as a copy.
    pub fn resolve(
        caster: &Character,
        ability: &dyn Ability,
        target: &mut Character,
        dice: &mut dyn DiceRoller,
    ) -> String {
        let declaration = ability.declaration();
        match declaration.effect {
            AbilityEffect::Reaction => {
                format!("{} uses {}", caster.name(), declaration.name)
            }
            AbilityEffect::Healing => {
                let amount = Self::damage_roll(
                    declaration.die,
                    caster.stat_modifier(declaration.stat),
                    false,
                    dice,
                );
                target.heal(amount);
                debug!(caster = caster.name(), target = target.name(), amount, "heal");
                format!(
                    "{} heals {} for {} with {} ({}/{})",
                    caster.name(),
                    target.name(),
                    amount,
                    declaration.name,
                    target.current_health(),
                    target.max_health()
                )
            }
            AbilityEffect::Damage => Self::resolve_damage(caster, ability, target, dice),
        }
    }

    fn resolve_damage(
        caster: &Character,
        ability: &dyn Ability,
        target: &mut Character,
        dice: &mut dyn DiceRoller,
    ) -> String {
        let declaration = ability.declaration();
        let roll = Self::hit_roll(caster, declaration.stat, dice);
        let armor_class = Self::armor_class(target);
        debug!(
            caster = caster.name(),
            target = target.name(),
            natural = roll.natural,
            total = roll.total,
            armor_class,
            "attack roll"
        );

        if !roll.hits(armor_class) {
            return format!(
                "{}'s {} MISSES {}",
                caster.name(),
                declaration.name,
                target.name()
            );
        }

        let rolled = Self::damage_roll(
            declaration.die,
            caster.stat_modifier(declaration.stat),
            roll.crit,
            dice,
        );
        let (damage, reaction) =
            Self::adjust_damage(target.affinities(), rolled, declaration.effect_type);
        target.take_damage(damage);
        debug!(rolled, damage, ?reaction, "damage");

        let mut message = format!(
            "{} inflicts {}{} {} damage on {} with {}",
            caster.name(),
            damage,
            if roll.crit { " (CRIT)" } else { "" },
            declaration.effect_type,
            target.name(),
            declaration.name
        );
        match reaction {
            Reaction::Immune => message.push_str(&format!(" ({} is immune)", target.name())),
            Reaction::Resistant => message.push_str(&format!(" ({} resists)", target.name())),
            Reaction::Vulnerable => {
                message.push_str(&format!(" ({} is vulnerable)", target.name()));
            }
            Reaction::Normal => {}
        }
        if !target.is_conscious() {
            message.push_str(&format!(". {} is defeated!", target.name()));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{ChallengeAbility, Cower, StrikeAbility};
    use crate::character::BossKind;
    use crate::dice::ScriptedDice;
    use proptest::prelude::*;

    mod hit_tests {
        use super::*;

        #[test]
        fn natural_twenty_always_hits() {
            let roll = HitRoll::new(20, -10);
            assert!(roll.crit);
            assert!(roll.hits(99));
        }

        #[test]
        fn nineteen_is_not_a_crit() {
            let roll = HitRoll::new(19, 1);
            assert!(!roll.crit);
            assert!(!roll.hits(22));
            assert!(roll.hits(20));
        }

        #[test]
        fn armor_class_uses_dexterity() {
            // dex 50 -> +20
            assert_eq!(CombatResolver::armor_class(&BossKind::Squirrel.spawn()), 30);
            // dex 0 -> -5
            assert_eq!(CombatResolver::armor_class(&BossKind::PracticeDummy.spawn()), 5);
        }

        #[test]
        fn hit_roll_adds_modifier_and_proficiency() {
            let fighter = Character::fighter("a");
            let mut dice = ScriptedDice::new([10]);
            let roll = CombatResolver::hit_roll(&fighter, StatKind::Strength, &mut dice);
            assert_eq!(roll.total, 15);
        }
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn damage_floors_at_one() {
            let mut dice = ScriptedDice::new([1]);
            assert_eq!(CombatResolver::damage_roll(Die::new(1, 1), -5, false, &mut dice), 1);
        }

        #[test]
        fn crit_doubles_dice_not_modifier() {
            let mut dice = ScriptedDice::new([2, 2]);
            assert_eq!(CombatResolver::damage_roll(Die::new(1, 2), 3, true, &mut dice), 7);
            assert_eq!(dice.rolled(), 2);
        }

        #[test]
        fn affinity_adjustments() {
            let affinities = Affinities::default()
                .immune_to(EffectType::Poison)
                .resist(EffectType::Fire)
                .vulnerable_to(EffectType::Cold);
            let adjust = |effect| CombatResolver::adjust_damage(&affinities, 7, effect);

            assert_eq!(adjust(EffectType::Poison), (0, Reaction::Immune));
            assert_eq!(adjust(EffectType::Fire), (3, Reaction::Resistant));
            assert_eq!(adjust(EffectType::Cold), (14, Reaction::Vulnerable));
            assert_eq!(adjust(EffectType::Acid), (7, Reaction::Normal));
        }

        proptest! {
            #[test]
            fn damage_roll_is_never_below_one(
                count in 0u32..4,
                sides in 0u32..12,
                modifier in -20i32..20,
                crit in any::<bool>(),
                seed in any::<u64>(),
            ) {
                let mut dice = crate::dice::SeededDice::new(seed);
                let damage = CombatResolver::damage_roll(Die::new(count, sides), modifier, crit, &mut dice);
                prop_assert!(damage >= 1);
            }

            #[test]
            fn resistance_halves_with_floor(damage in 0i32..1000) {
                let affinities = Affinities::default().resist(EffectType::Fire);
                let (adjusted, _) = CombatResolver::adjust_damage(&affinities, damage, EffectType::Fire);
                prop_assert_eq!(adjusted, damage / 2);
            }
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn punch_against_dummy() {
            let fighter = Character::fighter("test");
            let mut dummy = BossKind::PracticeDummy.spawn();
            let mut dice = ScriptedDice::new([10, 1]);

            let message =
                CombatResolver::resolve(&fighter, &StrikeAbility::punch(), &mut dummy, &mut dice);

            assert!(message.contains("test inflicts 4"), "{message}");
            assert_eq!(dummy.current_health(), 496);
        }

        #[test]
        fn miss_leaves_target_untouched() {
            let fighter = Character::fighter("test");
            let mut squirrel = BossKind::Squirrel.spawn();
            let mut dice = ScriptedDice::new([1]);

            let message =
                CombatResolver::resolve(&fighter, &StrikeAbility::punch(), &mut squirrel, &mut dice);

            assert_eq!(message, "test's Punch MISSES squirrel");
            assert_eq!(squirrel.current_health(), squirrel.max_health());
        }

        #[test]
        fn defeat_is_announced() {
            let fighter = Character::fighter("test");
            let mut squirrel = BossKind::Squirrel.spawn();
            let mut dice = ScriptedDice::new([20, 1, 1]);

            let message =
                CombatResolver::resolve(&fighter, &StrikeAbility::punch(), &mut squirrel, &mut dice);

            assert!(message.contains("(CRIT)"));
            assert!(message.ends_with("squirrel is defeated!"), "{message}");
        }

        #[test]
        fn immune_target_takes_nothing() {
            let fighter = Character::fighter("test");
            let mut dummy = BossKind::PracticeDummy
                .spawn()
                .with_affinities(Affinities::default().immune_to(EffectType::Bludgeoning));
            let mut dice = ScriptedDice::new([15, 2]);

            let message =
                CombatResolver::resolve(&fighter, &StrikeAbility::punch(), &mut dummy, &mut dice);

            assert!(message.contains("dummy is immune"), "{message}");
            assert_eq!(dummy.current_health(), 500);
        }

        #[test]
        fn cower_changes_nothing() {
            let squirrel = BossKind::Squirrel.spawn();
            let mut fighter = Character::fighter("test");
            let mut dice = ScriptedDice::new([]);

            let message = CombatResolver::resolve(&squirrel, &Cower::new(), &mut fighter, &mut dice);

            assert_eq!(message, "squirrel uses Cower");
            assert_eq!(fighter.current_health(), 12);
            assert_eq!(dice.rolled(), 0);
        }

        #[test]
        fn heal_skips_the_hit_roll() {
            let cleric = Character::with_class("cleric", crate::character::CharacterClass::Cleric);
            let mut ally = Character::fighter("ally");
            ally.take_damage(10);
            // 1d8 rolls 4, wis 16 -> +3
            let mut dice = ScriptedDice::new([4]);

            let message =
                CombatResolver::resolve(&cleric, &ChallengeAbility::heal(), &mut ally, &mut dice);

            assert_eq!(ally.current_health(), 9);
            assert_eq!(dice.rolled(), 1);
            assert!(message.contains("heals ally for 7"), "{message}");
        }
    }
}
