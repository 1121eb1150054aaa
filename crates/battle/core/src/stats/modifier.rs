//! Stat modifiers and how a list of them becomes one layer.

use super::bundle::{StatBundle, StatType};

/// How a modifier's magnitude is turned into a contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierOp {
    /// Contributes the magnitude as is.
    Add,
    /// Contributes `base * magnitude / 100` of the designated base bundle.
    Percentage,
}

/// A single `(channel, operation, magnitude)` contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatType,
    pub op: ModifierOp,
    pub value: i32,
}

impl StatModifier {
    pub const fn new(stat: StatType, op: ModifierOp, value: i32) -> Self {
        Self { stat, op, value }
    }

    pub const fn add(stat: StatType, value: i32) -> Self {
        Self::new(stat, ModifierOp::Add, value)
    }

    pub const fn percentage(stat: StatType, value: i32) -> Self {
        Self::new(stat, ModifierOp::Percentage, value)
    }

    /// The amount this modifier adds on top of `base_value`.
    ///
    /// Percentages are computed in i64 and truncated toward zero, so
    /// `-150 * 10 / 100 == -15` and `7 * 50 / 100 == 3`.
    pub fn part(&self, base_value: i32) -> i32 {
        match self.op {
            ModifierOp::Add => self.value,
            ModifierOp::Percentage => {
                let part = i64::from(base_value) * i64::from(self.value) / 100;
                part.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
        }
    }
}

/// Builds one layer from its modifiers.
///
/// Every modifier is evaluated against `base` independently and the parts are
/// summed per channel; the running total of this layer never feeds back into
/// another modifier of the same layer. Channels without a modifier stay unset.
pub fn apply_modifiers<'a>(
    modifiers: impl IntoIterator<Item = &'a StatModifier>,
    base: &StatBundle,
) -> StatBundle {
    let mut layer = StatBundle::empty();
    for modifier in modifiers {
        layer.add(modifier.stat, modifier.part(base.get(modifier.stat)));
    }
    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ignores_base() {
        assert_eq!(StatModifier::add(StatType::HP, 20).part(1000), 20);
    }

    #[test]
    fn percentage_truncates_toward_zero() {
        assert_eq!(StatModifier::percentage(StatType::ATK, 50).part(7), 3);
        assert_eq!(StatModifier::percentage(StatType::ATK, -50).part(7), -3);
        assert_eq!(StatModifier::percentage(StatType::DEF, 100).part(40), 40);
    }

    #[test]
    fn percentages_use_base_not_running_total() {
        let base = StatBundle::empty().with(StatType::ATK, 100);
        let modifiers = [
            StatModifier::percentage(StatType::ATK, 10),
            StatModifier::percentage(StatType::ATK, 10),
        ];

        // Compounding would give 10 + 11; the base rule gives 10 + 10.
        let layer = apply_modifiers(&modifiers, &base);
        assert_eq!(layer.atk(), 20);
        assert!(!layer.has(StatType::HP));
    }

    #[test]
    fn percentage_of_unset_base_is_zero_but_set() {
        let layer = apply_modifiers(
            &[StatModifier::percentage(StatType::CRI, 30)],
            &StatBundle::empty(),
        );
        assert!(layer.has(StatType::CRI));
        assert_eq!(layer.cri(), 0);
    }
}
