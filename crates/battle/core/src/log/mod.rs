//! Append-only battle log.
//!
//! The simulator records every observable step as a [`BattleEvent`]. Callers
//! only read the log; a finished log is a pure function of the battle inputs
//! and can be compared across nodes through [`BattleLog::digest`].

use crate::battle::{CombatantId, Side};
use crate::env::{BuffId, CharacterId, SkillId, SkillKind};

/// Terminal state of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Win,
    Lose,
    TimeOver,
}

/// Effect of a skill on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillHit {
    pub target: CombatantId,
    pub hit: bool,
    pub critical: bool,
    /// HP removed, or restored for heals.
    pub amount: i32,
    pub remaining_hp: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum_discriminants(
    name(BattleEventKind),
    derive(Hash, strum::Display),
    strum(serialize_all = "snake_case")
)]
pub enum BattleEvent {
    WaveStart {
        wave: u32,
    },
    Spawn {
        id: CombatantId,
        side: Side,
        character_id: CharacterId,
        level: u32,
        hp: i32,
    },
    SkillCast {
        caster: CombatantId,
        skill_id: SkillId,
        kind: SkillKind,
        hits: Vec<SkillHit>,
    },
    BuffApplied {
        target: CombatantId,
        buff_id: BuffId,
    },
    BuffExpired {
        target: CombatantId,
        buff_id: BuffId,
    },
    Dead {
        id: CombatantId,
    },
    TurnEnd {
        turn: u32,
        actor: CombatantId,
    },
    WaveCleared {
        wave: u32,
    },
}

impl BattleEvent {
    pub fn kind(&self) -> BattleEventKind {
        BattleEventKind::from(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    stage_id: u32,
    wave_count: u32,
    events: Vec<BattleEvent>,
    result: Option<BattleOutcome>,
    cleared_wave_number: u32,
}

impl BattleLog {
    pub fn new(stage_id: u32, wave_count: u32) -> Self {
        Self {
            stage_id,
            wave_count,
            ..Self::default()
        }
    }

    pub fn stage_id(&self) -> u32 {
        self.stage_id
    }

    pub fn wave_count(&self) -> u32 {
        self.wave_count
    }

    /// Appends an event. A finished log is frozen and ignores it.
    pub(crate) fn push(&mut self, event: BattleEvent) {
        if self.result.is_none() {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count_of(&self, kind: BattleEventKind) -> usize {
        self.events.iter().filter(|event| event.kind() == kind).count()
    }

    pub fn result(&self) -> Option<BattleOutcome> {
        self.result
    }

    pub fn cleared_wave_number(&self) -> u32 {
        self.cleared_wave_number
    }

    pub(crate) fn set_cleared_wave_number(&mut self, wave: u32) {
        if self.result.is_none() {
            self.cleared_wave_number = wave;
        }
    }

    /// Records the outcome once; later calls keep the first one.
    pub(crate) fn finish(&mut self, outcome: BattleOutcome) {
        if self.result.is_none() {
            self.result = Some(outcome);
        }
    }

    /// Won with every wave cleared.
    pub fn is_clear(&self) -> bool {
        self.result == Some(BattleOutcome::Win)
            && self.wave_count > 0
            && self.cleared_wave_number >= self.wave_count
    }

    /// SHA-256 over the bincode encoding of the header and every event in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the bincode error if the header or an event fails to encode.
    /// No partial digest is ever produced.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        let header = (
            self.stage_id,
            self.wave_count,
            self.result,
            self.cleared_wave_number,
        );
        hasher.update(bincode::serialize(&header)?);
        for event in &self.events {
            hasher.update(bincode::serialize(event)?);
        }
        Ok(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_clear_requires_every_wave() {
        let mut full = BattleLog::new(1, 3);
        full.set_cleared_wave_number(3);
        full.finish(BattleOutcome::Win);
        assert!(full.is_clear());

        let mut partial = BattleLog::new(1, 3);
        partial.set_cleared_wave_number(1);
        partial.finish(BattleOutcome::Win);
        assert!(!partial.is_clear());

        assert!(!BattleLog::default().is_clear());
    }

    #[test]
    fn counts_by_kind() {
        let mut log = BattleLog::new(0, 1);
        log.push(BattleEvent::WaveStart { wave: 1 });
        log.push(BattleEvent::TurnEnd {
            turn: 1,
            actor: CombatantId::PLAYER,
        });
        log.push(BattleEvent::TurnEnd {
            turn: 2,
            actor: CombatantId(1),
        });

        assert_eq!(log.count_of(BattleEventKind::TurnEnd), 2);
        assert_eq!(log.count_of(BattleEventKind::Dead), 0);
        assert_eq!(BattleEventKind::WaveCleared.to_string(), "wave_cleared");
    }

    #[test]
    fn finished_log_is_frozen() {
        let mut log = BattleLog::new(1, 2);
        log.push(BattleEvent::WaveStart { wave: 1 });
        log.set_cleared_wave_number(1);
        log.finish(BattleOutcome::Lose);

        log.push(BattleEvent::Dead { id: CombatantId(1) });
        log.set_cleared_wave_number(2);
        log.finish(BattleOutcome::Win);

        assert_eq!(log.len(), 1);
        assert_eq!(log.cleared_wave_number(), 1);
        assert_eq!(log.result(), Some(BattleOutcome::Lose));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_tracks_content() {
        let mut a = BattleLog::new(7, 1);
        let b = a.clone();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());

        a.push(BattleEvent::Dead { id: CombatantId(2) });
        let digest = a.digest().unwrap();
        assert_ne!(digest, b.digest().unwrap());
        assert_eq!(hex::encode(digest).len(), 64);

        // the terminal outcome is part of the header
        let mut finished = a.clone();
        finished.finish(BattleOutcome::Win);
        assert_ne!(finished.digest().unwrap(), digest);
    }
}
