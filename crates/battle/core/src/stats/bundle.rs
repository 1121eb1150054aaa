//! Stat channels and the six-channel bundle every layer produces.

use strum::IntoEnumIterator;

/// The six combat channels a character carries.
///
/// - **HP**: Maximum health
/// - **ATK**: Attack power
/// - **DEF**: Damage reduction
/// - **CRI**: Critical chance (percent)
/// - **HIT**: Accuracy, compared against the defender's HIT
/// - **SPD**: Turn speed; drives scheduling priority
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum StatType {
    HP,
    ATK,
    DEF,
    CRI,
    HIT,
    SPD,
}

impl StatType {
    /// Number of channels in a [`StatBundle`].
    pub const COUNT: usize = 6;

    /// Position of this channel inside a bundle.
    pub const fn index(self) -> usize {
        match self {
            StatType::HP => 0,
            StatType::ATK => 1,
            StatType::DEF => 2,
            StatType::CRI => 3,
            StatType::HIT => 4,
            StatType::SPD => 5,
        }
    }

    /// Flag bit recording that this channel was explicitly set.
    pub const fn flag(self) -> StatFlags {
        match self {
            StatType::HP => StatFlags::HP,
            StatType::ATK => StatFlags::ATK,
            StatType::DEF => StatFlags::DEF,
            StatType::CRI => StatFlags::CRI,
            StatType::HIT => StatFlags::HIT,
            StatType::SPD => StatFlags::SPD,
        }
    }
}

bitflags::bitflags! {
    /// Channels that were explicitly written.
    ///
    /// A cleared bit means "does not contribute", which is distinct from a set
    /// bit with value zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatFlags: u8 {
        const HP = 1 << 0;
        const ATK = 1 << 1;
        const DEF = 1 << 2;
        const CRI = 1 << 3;
        const HIT = 1 << 4;
        const SPD = 1 << 5;
    }
}

/// Six named channels, each with a value and a "was explicitly set" flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBundle {
    values: [i32; StatType::COUNT],
    set: StatFlags,
}

impl StatBundle {
    /// Bundle with every channel unset.
    pub const fn empty() -> Self {
        Self {
            values: [0; StatType::COUNT],
            set: StatFlags::empty(),
        }
    }

    /// Bundle with every channel set to the given values.
    pub fn new(hp: i32, atk: i32, def: i32, cri: i32, hit: i32, spd: i32) -> Self {
        Self {
            values: [hp, atk, def, cri, hit, spd],
            set: StatFlags::all(),
        }
    }

    pub fn get(&self, stat: StatType) -> i32 {
        self.values[stat.index()]
    }

    pub fn has(&self, stat: StatType) -> bool {
        self.set.contains(stat.flag())
    }

    pub fn flags(&self) -> StatFlags {
        self.set
    }

    /// Overwrites a channel and marks it set.
    pub fn set(&mut self, stat: StatType, value: i32) {
        self.values[stat.index()] = value;
        self.set.insert(stat.flag());
    }

    /// Adds to a channel and marks it set.
    pub fn add(&mut self, stat: StatType, value: i32) {
        let slot = &mut self.values[stat.index()];
        *slot = slot.saturating_add(value);
        self.set.insert(stat.flag());
    }

    /// Builder form of [`StatBundle::set`].
    pub fn with(mut self, stat: StatType, value: i32) -> Self {
        self.set(stat, value);
        self
    }

    /// Channel-wise sum. A channel is set in the result if it is set in any input.
    pub fn sum<'a>(bundles: impl IntoIterator<Item = &'a StatBundle>) -> Self {
        bundles
            .into_iter()
            .fold(Self::empty(), |mut acc, bundle| {
                for stat in StatType::iter() {
                    let i = stat.index();
                    acc.values[i] = acc.values[i].saturating_add(bundle.values[i]);
                }
                acc.set |= bundle.set;
                acc
            })
    }

    /// Copy with every negative channel raised to zero. Flags are preserved.
    pub fn clamped_non_negative(&self) -> Self {
        let mut out = *self;
        for value in out.values.iter_mut() {
            *value = (*value).max(0);
        }
        out
    }

    /// Iterates `(channel, value)` over all six channels.
    pub fn iter(&self) -> impl Iterator<Item = (StatType, i32)> + '_ {
        StatType::iter().map(move |stat| (stat, self.get(stat)))
    }

    /// Iterates `(channel, value)` over explicitly set channels only.
    pub fn iter_set(&self) -> impl Iterator<Item = (StatType, i32)> + '_ {
        self.iter().filter(move |(stat, _)| self.has(*stat))
    }

    pub fn hp(&self) -> i32 {
        self.get(StatType::HP)
    }

    pub fn atk(&self) -> i32 {
        self.get(StatType::ATK)
    }

    pub fn def(&self) -> i32 {
        self.get(StatType::DEF)
    }

    pub fn cri(&self) -> i32 {
        self.get(StatType::CRI)
    }

    pub fn hit(&self) -> i32 {
        self.get(StatType::HIT)
    }

    pub fn spd(&self) -> i32 {
        self.get(StatType::SPD)
    }
}
