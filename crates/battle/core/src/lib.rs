//! Deterministic battle and stat rules shared by every node.
//!
//! `battle-core` owns the canonical arithmetic: five-layer stat aggregation,
//! the weighted option sampler used by crafting, and the decaying-priority
//! battle scheduler that records a [`BattleLog`]. Nothing here performs I/O;
//! tables arrive through the oracle traits in [`env`] and randomness through
//! [`RandomSource`], so identical inputs give byte-identical outputs.
pub mod battle;
pub mod config;
pub mod crafting;
pub mod env;
pub mod error;
pub mod item;
pub mod log;
pub mod stats;

pub use battle::{
    AvatarDigest, BattleReport, BattleSimulator, Combatant, CombatantId, CombatantSpec, Encounter,
    EncounterKind, Priority, Side, TurnQueue, simulate,
};
pub use config::{BattleConfig, CombatRules};
pub use crafting::{
    CraftError, CraftOutcome, EmptySelection, OptionSelection, Selection, WeightedSelector,
    combine_equipment, select_options,
};
pub use env::{
    CharacterOracle, CostumeOracle, CraftingOracle, EncounterOracle, OracleError, PcgRandom,
    RandomSource, SetEffectOracle, SkillOracle, TablesOracle, TablesSnapshot, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use item::{Consumable, Costume, Equipment, ItemUid, SkillInstance};
pub use log::{BattleEvent, BattleEventKind, BattleLog, BattleOutcome, SkillHit};
pub use stats::{
    CharacterStats, LayeredStats, ModifierOp, StatBundle, StatLayer, StatModifier, StatType,
    recompute,
};
