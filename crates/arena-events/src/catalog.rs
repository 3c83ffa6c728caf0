//! The immutable, weighted event catalog and its transition functions.
//!
//! Every event is a `(weight, transition)` pair. The weight is a relative
//! selection likelihood; the transition reads and mutates player state
//! through an [`EventScope`] and returns the narrative [`EventOutcome`].
//! The catalog is validated once at construction and never changes at
//! runtime -- it is passed around explicitly (as `Arc<EventCatalog>`), so
//! tests can substitute their own catalogs.

use arena_types::{EventOutcome, Player};

use crate::error::EventError;
use crate::scope::EventScope;

/// A state-transition function applied to one player during their turn.
pub type Transition = fn(&mut EventScope<'_>) -> EventOutcome;

/// Base win weight for a fight combatant before flag adjustments.
const FIGHT_BASE_WEIGHT: u32 = 10;

/// Win-weight bonus for holding armor.
const FIGHT_ARMOR_BONUS: u32 = 6;

/// Win-weight bonus for holding protection.
const FIGHT_PROTECTION_BONUS: u32 = 3;

/// Win-weight penalty for carrying an injury.
const FIGHT_INJURY_PENALTY: u32 = 5;

/// Probability that a fight's loser escapes with an injury instead of dying.
const LOSER_SPARED_CHANCE: f64 = 0.20;

/// Probability that a fight's winner picks up an injury regardless.
const WINNER_INJURED_CHANCE: f64 = 0.15;

/// One entry in the event catalog.
#[derive(Debug, Clone, Copy)]
pub struct EventDef {
    /// Stable name used in logs and configuration errors.
    pub name: &'static str,
    /// Relative selection likelihood. Zero is a configuration error.
    pub weight: u32,
    /// The state transition executed when this event is drawn.
    pub transition: Transition,
}

/// A fixed, ordered, validated collection of event definitions.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    defs: Vec<EventDef>,
    weights: Vec<u32>,
}

impl EventCatalog {
    /// Build a catalog from definitions, rejecting empty catalogs and
    /// zero weights.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::EmptyCatalog`] for an empty definition list
    /// and [`EventError::Configuration`] for any zero-weight entry.
    pub fn new(defs: Vec<EventDef>) -> Result<Self, EventError> {
        if defs.is_empty() {
            return Err(EventError::EmptyCatalog);
        }
        for def in &defs {
            if def.weight == 0 {
                return Err(EventError::Configuration {
                    event: def.name,
                    reason: "weight must be a positive integer".to_owned(),
                });
            }
        }
        let weights = defs.iter().map(|def| def.weight).collect();
        Ok(Self { defs, weights })
    }

    /// The standard catalog shipped with the engine.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` comes from the shared
    /// validation in [`EventCatalog::new`].
    pub fn standard() -> Result<Self, EventError> {
        Self::new(vec![
            EventDef {
                name: "quiet_day",
                weight: 10,
                transition: quiet_day,
            },
            EventDef {
                name: "wild_animal",
                weight: 3,
                transition: wild_animal,
            },
            EventDef {
                name: "poison",
                weight: 3,
                transition: poison,
            },
            EventDef {
                name: "supply_cache",
                weight: 5,
                transition: supply_cache,
            },
            EventDef {
                name: "fight",
                weight: 6,
                transition: fight,
            },
            EventDef {
                name: "sponsor_gift",
                weight: 2,
                transition: sponsor_gift,
            },
        ])
    }

    /// Selection weights, index-aligned with [`EventCatalog::get`].
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Look up a definition by index.
    pub fn get(&self, index: usize) -> Option<&EventDef> {
        self.defs.get(index)
    }

    /// Number of event definitions.
    pub const fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog holds no definitions (never true for a
    /// constructed catalog).
    pub const fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Passive flavor: nothing happens.
fn quiet_day(scope: &mut EventScope<'_>) -> EventOutcome {
    let mention = scope.player.mention();
    let text = match scope.rng.below(3) {
        0 => format!("{mention} didn't do anything interesting today."),
        1 => format!("{mention} kept to the treeline and stayed out of sight."),
        _ => format!("{mention} spent the day gathering firewood."),
    };
    EventOutcome::passive(text)
}

/// Hazard: lethal unless protection is held (and then consumed).
fn wild_animal(scope: &mut EventScope<'_>) -> EventOutcome {
    let mention = scope.player.mention();
    if scope.player.is_protected {
        scope.player.is_protected = false;
        EventOutcome::positive(format!(
            "{mention} was attacked by a wild animal, but their charm scared it off."
        ))
    } else {
        scope.player.mark_dead("a wild animal");
        EventOutcome::negative(format!(
            "{mention} got into a fight with a wild animal and died."
        ))
    }
}

/// Hazard with partial mitigation: protection saves outright, otherwise a
/// coin flip decides between an injury and death.
fn poison(scope: &mut EventScope<'_>) -> EventOutcome {
    let mention = scope.player.mention();
    if scope.player.is_protected {
        scope.player.is_protected = false;
        return EventOutcome::positive(format!(
            "{mention} ate poisonous berries, but their charm purged the toxin."
        ));
    }
    if scope.rng.chance(0.5) {
        scope.player.is_injured = true;
        EventOutcome::negative(format!(
            "{mention} ate poisonous berries and fell violently ill."
        ))
    } else {
        scope.player.mark_dead("poison");
        EventOutcome::negative(format!("{mention} ate poisonous berries and died."))
    }
}

/// Loot: half the time a useful pickup, half the time a trap.
fn supply_cache(scope: &mut EventScope<'_>) -> EventOutcome {
    let mention = scope.player.mention();
    if scope.rng.chance(0.5) {
        if scope.player.is_injured {
            scope.player.is_injured = false;
            EventOutcome::positive(format!(
                "{mention} found a medkit in a supply cache and patched up their wounds."
            ))
        } else if !scope.player.is_protected {
            scope.player.is_protected = true;
            EventOutcome::positive(format!(
                "{mention} found a protective charm in a supply cache."
            ))
        } else if !scope.player.is_armored {
            scope.player.is_armored = true;
            EventOutcome::positive(format!(
                "{mention} found body armor in a supply cache."
            ))
        } else {
            EventOutcome::passive(format!(
                "{mention} found a supply cache, but nothing in it was of any use."
            ))
        }
    } else if scope.player.is_armored {
        scope.player.is_armored = false;
        EventOutcome::positive(format!(
            "{mention} opened a booby-trapped supply cache; their armor absorbed the blast."
        ))
    } else {
        scope.player.mark_dead("a booby-trapped supply cache");
        EventOutcome::negative(format!(
            "{mention} opened a booby-trapped supply cache and was killed by the blast."
        ))
    }
}

/// Two-player interaction: a weighted duel against a random living rival.
#[allow(clippy::too_many_lines)]
fn fight(scope: &mut EventScope<'_>) -> EventOutcome {
    let rival_total = scope.rival_count();
    let mention = scope.player.mention();
    if rival_total == 0 {
        return EventOutcome::passive(format!(
            "{mention} stalked the arena looking for a fight, but found no one."
        ));
    }

    let pick = scope.rng.below(u64::try_from(rival_total).unwrap_or(u64::MAX));
    let index = usize::try_from(pick).unwrap_or(0);
    let Some((rival_id, rival_mention, rival_weight)) = scope
        .rival(index)
        .map(|rival| (rival.id, rival.mention(), win_weight(rival)))
    else {
        return EventOutcome::passive(format!(
            "{mention} stalked the arena looking for a fight, but found no one."
        ));
    };

    let player_id = scope.player.id;
    let player_weight = win_weight(scope.player);
    let player_wins = matches!(
        scope.rng.weighted(&[player_weight, rival_weight]),
        Some(0)
    );
    let loser_spared = scope.rng.chance(LOSER_SPARED_CHANCE);
    let winner_injured = scope.rng.chance(WINNER_INJURED_CHANCE);

    if player_wins {
        let mut text;
        if loser_spared {
            if let Some(rival) = scope.rival_mut(index) {
                rival.is_injured = true;
            }
            text = format!("{mention} beat {rival_mention} bloody and left them wounded in the dust.");
        } else {
            let cause = format!("a fight with {mention}");
            if let Some(rival) = scope.rival_mut(index) {
                rival.mark_dead(cause);
            }
            scope.player.kills.push(rival_id);
            text = format!("{mention} fought {rival_mention} to the death and won.");
        }
        if winner_injured {
            scope.player.is_injured = true;
            text.push_str(" The victory came at the price of an injury.");
        }
        EventOutcome::positive(text)
    } else {
        if winner_injured {
            if let Some(rival) = scope.rival_mut(index) {
                rival.is_injured = true;
            }
        }
        if loser_spared {
            scope.player.is_injured = true;
            EventOutcome::negative(format!(
                "{mention} picked a fight with {rival_mention} and barely crawled away alive."
            ))
        } else {
            scope.player.mark_dead(format!("a fight with {rival_mention}"));
            if let Some(rival) = scope.rival_mut(index) {
                rival.kills.push(player_id);
            }
            EventOutcome::negative(format!(
                "{mention} picked a fight with {rival_mention} and lost their life."
            ))
        }
    }
}

/// Positive grant: one-shot protection, if not already held.
fn sponsor_gift(scope: &mut EventScope<'_>) -> EventOutcome {
    let mention = scope.player.mention();
    if scope.player.is_protected {
        EventOutcome::passive(format!(
            "{mention} received a sponsor parachute, but already carried a charm."
        ))
    } else {
        scope.player.is_protected = true;
        EventOutcome::positive(format!(
            "{mention} received a protective charm from a sponsor."
        ))
    }
}

/// Relative win weight of a fight combatant, derived from status flags.
fn win_weight(player: &Player) -> u32 {
    let mut weight = FIGHT_BASE_WEIGHT;
    if player.is_armored {
        weight = weight.saturating_add(FIGHT_ARMOR_BONUS);
    }
    if player.is_protected {
        weight = weight.saturating_add(FIGHT_PROTECTION_BONUS);
    }
    if player.is_injured {
        weight = weight.saturating_sub(FIGHT_INJURY_PENALTY);
    }
    weight.max(1)
}
