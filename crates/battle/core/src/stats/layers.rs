//! The five ordered stat layers and the pure recompute pipeline.
//!
//! ```text
//! [ Level      ]  table lookup, no modifiers
//!      ↓
//! [ Equipment  ]  modifiers vs Level
//!      ↓
//! [ Consumable ]  modifiers vs Level + Equipment
//!      ↓
//! [ Buff       ]  modifiers vs Level + Equipment + Consumable
//!      ↓
//! [ Optional   ]  modifiers vs all of the above
//!      ↓
//! [ Total      ]  channel-wise sum, clamped to >= 0
//! ```
//!
//! Each layer depends only on its own modifiers and the cumulative sum of the
//! strictly lower layers. Recomputing a layer always recomputes every layer
//! above it. Intermediate layers may be negative; only the total is clamped.

use super::bundle::StatBundle;
use super::modifier::{StatModifier, apply_modifiers};

/// One of the five contribution sources, in application order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatLayer {
    Level,
    Equipment,
    Consumable,
    Buff,
    Optional,
}

impl StatLayer {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Modifier inputs for the four modifier-driven layers.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayerSources<'a> {
    pub equipment: &'a [StatModifier],
    pub consumable: &'a [StatModifier],
    pub buff: &'a [StatModifier],
    pub optional: &'a [StatModifier],
}

impl<'a> LayerSources<'a> {
    fn modifiers(&self, layer: StatLayer) -> &'a [StatModifier] {
        match layer {
            StatLayer::Level => &[],
            StatLayer::Equipment => self.equipment,
            StatLayer::Consumable => self.consumable,
            StatLayer::Buff => self.buff,
            StatLayer::Optional => self.optional,
        }
    }
}

/// Result of running the pipeline: every layer plus the clamped total.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayeredStats {
    layers: [StatBundle; StatLayer::COUNT],
    total: StatBundle,
}

impl LayeredStats {
    pub fn layer(&self, layer: StatLayer) -> &StatBundle {
        &self.layers[layer.index()]
    }

    /// Clamped total used for display and combat.
    pub fn total(&self) -> &StatBundle {
        &self.total
    }

    /// Channel-wise sum of all five layers before clamping.
    pub fn raw_total(&self) -> StatBundle {
        StatBundle::sum(self.layers.iter())
    }

    /// Recomputes `from` and every higher layer, keeping lower layers intact.
    ///
    /// `level_stats` is only read when `from` is [`StatLayer::Level`].
    pub fn recompute_from(
        &mut self,
        from: StatLayer,
        level_stats: &StatBundle,
        sources: &LayerSources<'_>,
    ) {
        let start = from.index();
        if start == StatLayer::Level.index() {
            self.layers[0] = *level_stats;
        }

        for index in start.max(1)..StatLayer::COUNT {
            let base = StatBundle::sum(self.layers[..index].iter());
            let layer = LAYER_ORDER[index];
            self.layers[index] = apply_modifiers(sources.modifiers(layer), &base);
        }

        self.total = self.raw_total().clamped_non_negative();
    }
}

const LAYER_ORDER: [StatLayer; StatLayer::COUNT] = [
    StatLayer::Level,
    StatLayer::Equipment,
    StatLayer::Consumable,
    StatLayer::Buff,
    StatLayer::Optional,
];

/// Pure, side-effect free recompute of every layer.
///
/// Same inputs always give the same bundle; nothing here depends on the order
/// in which a caller happened to mutate its sources.
pub fn recompute(level_stats: &StatBundle, sources: &LayerSources<'_>) -> LayeredStats {
    let mut stats = LayeredStats::default();
    stats.recompute_from(StatLayer::Level, level_stats, sources);
    stats
}
