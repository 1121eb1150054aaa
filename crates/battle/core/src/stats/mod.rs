//! Stat system: five ordered layers folded into one bundle.
//!
//! # Architecture
//!
//! ```text
//! [ Level ] → [ Equipment ] → [ Consumable ] → [ Buff ] → [ Optional ] → Total
//! ```
//!
//! ## Principles
//!
//! 1. **Cascade**: a layer only reads the cumulative sum of the layers below it
//! 2. **Pure recompute**: [`recompute`] takes every source and returns fresh layers
//! 3. **Clamp once**: only the total is raised to zero, never an intermediate layer
//! 4. **Deterministic**: integer arithmetic, no I/O or randomness
pub mod bundle;
pub mod character;
pub mod layers;
pub mod modifier;
pub mod stat_map;

pub use bundle::{StatBundle, StatFlags, StatType};
pub use character::{CharacterStats, StatSources};
pub use layers::{LayerSources, LayeredStats, StatLayer, recompute};
pub use modifier::{ModifierOp, StatModifier, apply_modifiers};
pub use stat_map::{StatMap, StatMapEntry};
