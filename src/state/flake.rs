/// Position of a participant within an event's fixed two-party structure.
///
/// Assignment is decided at creation time (creator first, invitee second)
/// and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The participant who created the event.
    First,
    /// The participant who was invited.
    Second,
}

impl Slot {
    /// The opposite slot of the pair.
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

/// The pair of per-participant flake flags for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlakePair {
    /// Flake flag of the first participant.
    pub first: bool,
    /// Flake flag of the second participant.
    pub second: bool,
}

impl FlakePair {
    /// Read one slot's flag.
    pub fn get(self, slot: Slot) -> bool {
        match slot {
            Slot::First => self.first,
            Slot::Second => self.second,
        }
    }

    /// Flip exactly one slot's flag, leaving the other untouched.
    ///
    /// This is a toggle, not a set: applying it twice to the same slot
    /// returns the original pair.
    pub fn toggle(self, slot: Slot) -> Self {
        match slot {
            Slot::First => Self {
                first: !self.first,
                ..self
            },
            Slot::Second => Self {
                second: !self.second,
                ..self
            },
        }
    }

    /// Collapse the pair into its aggregate status.
    pub fn aggregate(self) -> FlakeAggregate {
        match (self.first, self.second) {
            (false, false) => FlakeAggregate::BothCalm,
            (true, false) => FlakeAggregate::OneFlaked(Slot::First),
            (false, true) => FlakeAggregate::OneFlaked(Slot::Second),
            (true, true) => FlakeAggregate::BothFlaked,
        }
    }
}

/// Aggregate status of the two flake flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlakeAggregate {
    /// Neither participant wants to cancel.
    BothCalm,
    /// Exactly one participant has flaked.
    OneFlaked(Slot),
    /// Both participants have flaked; the mutual-cancel condition holds.
    BothFlaked,
}

/// Whether a toggle just crossed the edge into [`FlakeAggregate::BothFlaked`].
///
/// The trigger is edge-triggered on purpose: merely observing an event that
/// already sits in `BothFlaked` must never fire, while flaking out and back
/// in while the other side stays flaked is a fresh edge and fires again.
/// There is deliberately no stored "already notified" flag.
pub fn entered_both_flaked(old: FlakeAggregate, new: FlakeAggregate) -> bool {
    old != FlakeAggregate::BothFlaked && new == FlakeAggregate::BothFlaked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pair_is_both_calm() {
        assert_eq!(FlakePair::default().aggregate(), FlakeAggregate::BothCalm);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        for first in [false, true] {
            for second in [false, true] {
                let pair = FlakePair { first, second };
                for slot in [Slot::First, Slot::Second] {
                    assert_eq!(pair.toggle(slot).toggle(slot), pair);
                }
            }
        }
    }

    #[test]
    fn toggle_leaves_other_slot_untouched() {
        let pair = FlakePair {
            first: false,
            second: true,
        };
        assert_eq!(pair.toggle(Slot::First).second, pair.second);
        assert_eq!(pair.toggle(Slot::Second).first, pair.first);
    }

    #[test]
    fn aggregate_reports_which_slot_flaked() {
        let pair = FlakePair::default().toggle(Slot::Second);
        assert_eq!(pair.aggregate(), FlakeAggregate::OneFlaked(Slot::Second));
        assert_eq!(
            pair.toggle(Slot::First).aggregate(),
            FlakeAggregate::BothFlaked
        );
    }

    #[test]
    fn both_flaked_is_not_absorbing() {
        let both = FlakePair {
            first: true,
            second: true,
        };
        let back_in = both.toggle(Slot::First);
        assert_eq!(back_in.aggregate(), FlakeAggregate::OneFlaked(Slot::Second));
    }

    #[test]
    fn edge_fires_only_on_entry() {
        let calm = FlakeAggregate::BothCalm;
        let one = FlakeAggregate::OneFlaked(Slot::First);
        let both = FlakeAggregate::BothFlaked;

        assert!(entered_both_flaked(one, both));
        assert!(entered_both_flaked(calm, both));
        assert!(!entered_both_flaked(both, both));
        assert!(!entered_both_flaked(both, one));
        assert!(!entered_both_flaked(calm, one));
    }

    #[test]
    fn flake_unflake_flake_cycle_fires_twice() {
        // Second participant stays flaked while the first cycles out and back.
        let mut pair = FlakePair {
            first: true,
            second: true,
        };
        let mut edges = 0;

        for _ in 0..2 {
            let old = pair.aggregate();
            pair = pair.toggle(Slot::First);
            if entered_both_flaked(old, pair.aggregate()) {
                edges += 1;
            }
        }

        // Out of BothFlaked, then back in: exactly one new edge.
        assert_eq!(edges, 1);
    }
}
