//! Battle resolution: combatants, the decaying turn queue and the loop that
//! drives them.
//!
//! # Architecture
//!
//! - **encounter**: builds the player and enemy waves from tables
//! - **priority / queue**: fixed-point min-priority scheduling with decay
//! - **skill**: pure hit, critical and damage arithmetic
//! - **simulator**: the state machine that records a [`BattleLog`](crate::log::BattleLog)
mod combatant;
mod encounter;
mod priority;
mod queue;
mod simulator;
mod skill;

pub use combatant::{ActiveBuff, Combatant, CombatantId, CombatantSpec, Side, Targets};
pub use encounter::{AvatarDigest, Encounter, EncounterKind};
pub use priority::Priority;
pub use queue::{QueueEntry, TurnQueue};
pub use simulator::{BattleReport, BattleSimulator, simulate};
pub use skill::{
    Strike, calculate_damage, choose_skill, critical_chance, heal_amount, hit_chance,
    resolve_strike,
};
