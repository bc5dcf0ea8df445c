use crate::wheel::layout::{Point, RadialLayout};
use crate::wheel::month::MonthId;
use crate::wheel::store::GoalStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub slot: MonthId,
    pub origin: Point,
    /// Where the marker is drawn while in flight. Never reaches the store.
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// Released outside every slice; the goal was cleared.
    Removed(MonthId),
    /// Released over the slot's own slice; the marker goes back to `origin`.
    Reset { slot: MonthId, origin: Point },
    Swapped { source: MonthId, target: MonthId },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Begins a drag of `slot`'s marker, currently shown at `position`.
    /// Returns `false` if another drag is still in progress or `slot` holds no
    /// goal, since an empty slot has no marker to carry.
    pub fn gesture_start(&mut self, slot: MonthId, position: Point, store: &GoalStore) -> bool {
        if !store.slot(slot).has_goal() {
            log::debug!("Ignoring drag of empty slot {}", slot);
            return false;
        }
        if let DragState::Dragging(active) = &self.state {
            log::warn!(
                "Ignoring drag of {} while {} is still being dragged",
                slot,
                active.slot
            );
            return false;
        }

        self.state = DragState::Dragging(DragSession {
            slot,
            origin: position,
            position,
        });
        true
    }

    pub fn gesture_move(&mut self, position: Point) {
        if let DragState::Dragging(session) = &mut self.state {
            session.position = position;
        }
    }

    /// Resolves the release at `release` and returns to idle. `None` when no
    /// drag was active.
    pub fn gesture_end(
        &mut self,
        release: Point,
        layout: &RadialLayout,
        store: &mut GoalStore,
    ) -> Option<DropOutcome> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            log::debug!("Gesture end without an active drag");
            return None;
        };

        let outcome = match layout.hit_test(release) {
            None => {
                store.clear(session.slot);
                DropOutcome::Removed(session.slot)
            }
            Some(target) if target == session.slot => DropOutcome::Reset {
                slot: session.slot,
                origin: session.origin,
            },
            Some(target) => {
                store.swap(session.slot, target);
                DropOutcome::Swapped {
                    source: session.slot,
                    target,
                }
            }
        };

        log::debug!("Drop of {} resolved to {:?}", session.slot, outcome);
        Some(outcome)
    }
}
