//! Arbitration between the pan, pinch and tap recognizers.
//!
//! DESIGN
//! ======
//! Each recognizer has a phase. Continuous gestures go
//! `Possible → Active → Ended`; discrete ones go `Possible → Recognized`.
//! Either may end in `Failed` (never claimed the input) or `Cancelled`
//! (claimed it, then was interrupted).
//!
//! Who may claim input is declared, not coded into each recognizer:
//!
//! - `Simultaneous(a, b)`: `a` and `b` never block each other.
//! - `RequiresFailure { gesture, of }`: `gesture` may only be recognized once
//!   `of` has failed; if `of` claims the input, `gesture` fails.
//! - The race group: the first member to claim the input wins and every other
//!   member still `Possible` fails.
//!
//! The coordinator only tracks phases. Recognizers keep their own tracking
//! data and ask before they act.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GestureKind {
    Pan,
    Pinch,
    SingleTap,
    DoubleTap,
}

impl GestureKind {
    pub const ALL: [GestureKind; 4] = [Self::Pan, Self::Pinch, Self::SingleTap, Self::DoubleTap];

    fn index(self) -> usize {
        match self {
            Self::Pan => 0,
            Self::Pinch => 1,
            Self::SingleTap => 2,
            Self::DoubleTap => 3,
        }
    }

    /// Discrete gestures are recognized once instead of running.
    #[must_use]
    pub fn is_discrete(self) -> bool {
        matches!(self, Self::SingleTap | Self::DoubleTap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Possible,
    Active,
    Ended,
    Recognized,
    Failed,
    Cancelled,
}

impl Phase {
    /// The recognizer has finished with the current input sequence.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Recognized | Self::Failed | Self::Cancelled)
    }

    /// The recognizer claimed the input at some point in this sequence.
    #[must_use]
    pub fn has_claimed(self) -> bool {
        matches!(self, Self::Active | Self::Ended | Self::Recognized)
    }

    #[must_use]
    pub fn has_failed(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Simultaneous(GestureKind, GestureKind),
    RequiresFailure { gesture: GestureKind, of: GestureKind },
}

#[derive(Debug, Clone)]
pub struct GestureCoordinator {
    phases: [Phase; 4],
    relations: Vec<Relation>,
    race: Vec<GestureKind>,
}

impl Default for GestureCoordinator {
    /// Pinch runs alongside everything; single tap waits for double tap and
    /// pan to fail; single tap, double tap and pan race for the input.
    fn default() -> Self {
        use GestureKind::{DoubleTap, Pan, Pinch, SingleTap};
        Self::new(
            vec![
                Relation::Simultaneous(Pinch, Pan),
                Relation::Simultaneous(Pinch, SingleTap),
                Relation::Simultaneous(Pinch, DoubleTap),
                Relation::RequiresFailure { gesture: SingleTap, of: DoubleTap },
                Relation::RequiresFailure { gesture: SingleTap, of: Pan },
            ],
            vec![SingleTap, DoubleTap, Pan],
        )
    }
}

impl GestureCoordinator {
    #[must_use]
    pub fn new(relations: Vec<Relation>, race: Vec<GestureKind>) -> Self {
        Self { phases: [Phase::Possible; 4], relations, race }
    }

    #[must_use]
    pub fn phase(&self, kind: GestureKind) -> Phase {
        self.phases[kind.index()]
    }

    fn set(&mut self, kind: GestureKind, phase: Phase) {
        self.phases[kind.index()] = phase;
    }

    #[must_use]
    pub fn is_simultaneous(&self, a: GestureKind, b: GestureKind) -> bool {
        self.relations.iter().any(|r| match *r {
            Relation::Simultaneous(x, y) => (x == a && y == b) || (x == b && y == a),
            Relation::RequiresFailure { .. } => false,
        })
    }

    fn rivals(&self, kind: GestureKind) -> impl Iterator<Item = GestureKind> + '_ {
        let racing = self.race.contains(&kind);
        self.race.iter().copied().filter(move |&other| racing && other != kind && !self.is_simultaneous(kind, other))
    }

    fn requirements(&self, kind: GestureKind) -> impl Iterator<Item = GestureKind> + '_ {
        self.relations.iter().filter_map(move |r| match *r {
            Relation::RequiresFailure { gesture, of } if gesture == kind => Some(of),
            _ => None,
        })
    }

    /// Whether `kind` is still waiting on a gesture that has neither failed
    /// nor claimed the input.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_waiting(&self, kind: GestureKind) -> bool {
        self.requirements(kind).any(|of| self.phase(of) == Phase::Possible || self.phase(of) == Phase::Active)
            && self.phase(kind) == Phase::Possible
    }

    /// Let `kind` claim the input: `Active` for continuous gestures,
    /// `Recognized` for discrete ones.
    ///
    /// Returns `false` when a race rival or a required-to-fail gesture holds
    /// the input (and `kind` fails), or when a requirement is still pending
    /// (and `kind` stays `Possible`).
    pub fn claim(&mut self, kind: GestureKind) -> bool {
        if self.phase(kind) != Phase::Possible {
            return false;
        }
        if self.rivals(kind).any(|rival| self.phase(rival).has_claimed()) {
            self.set(kind, Phase::Failed);
            return false;
        }
        let mut pending = false;
        let mut blocked = false;
        for of in self.requirements(kind) {
            let phase = self.phase(of);
            if phase.has_claimed() {
                blocked = true;
            } else if !phase.has_failed() {
                pending = true;
            }
        }
        if blocked {
            self.set(kind, Phase::Failed);
            return false;
        }
        if pending {
            return false;
        }

        self.set(kind, if kind.is_discrete() { Phase::Recognized } else { Phase::Active });
        let losers: Vec<GestureKind> = self.rivals(kind).filter(|&r| self.phase(r) == Phase::Possible).collect();
        for loser in losers {
            self.set(loser, Phase::Failed);
        }
        true
    }

    /// `Possible → Failed`. Claimed gestures are left alone.
    pub fn fail(&mut self, kind: GestureKind) {
        if self.phase(kind) == Phase::Possible {
            self.set(kind, Phase::Failed);
        }
    }

    /// `Active → Ended`.
    pub fn end(&mut self, kind: GestureKind) {
        if self.phase(kind) == Phase::Active {
            self.set(kind, Phase::Ended);
        }
    }

    /// `Active → Cancelled`, `Possible → Failed`.
    pub fn cancel(&mut self, kind: GestureKind) {
        match self.phase(kind) {
            Phase::Active => self.set(kind, Phase::Cancelled),
            Phase::Possible => self.set(kind, Phase::Failed),
            _ => {}
        }
    }

    /// Cancel every running gesture and fail every undecided one.
    /// Returns the gestures that were running.
    pub fn cancel_all(&mut self) -> Vec<GestureKind> {
        let mut running = Vec::new();
        for kind in GestureKind::ALL {
            match self.phase(kind) {
                Phase::Active => {
                    self.set(kind, Phase::Cancelled);
                    running.push(kind);
                }
                Phase::Possible => self.set(kind, Phase::Failed),
                _ => {}
            }
        }
        running
    }

    /// Start a new input sequence: every finished recognizer becomes
    /// `Possible` again. Undecided ones keep their phase.
    pub fn begin_sequence(&mut self) {
        for phase in &mut self.phases {
            if phase.is_terminal() {
                *phase = Phase::Possible;
            }
        }
    }

    /// No recognizer is running.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_idle(&self) -> bool {
        !self.phases.contains(&Phase::Active)
    }
}
