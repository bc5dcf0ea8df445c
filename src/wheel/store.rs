use crate::wheel::month::{Goal, MonthId, Slot, SlotCollection};

/// Sole owner of the slot collection. Every operation is total: conditions
/// like a full board or an empty swap partner are no-ops rather than errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalStore {
    slots: SlotCollection,
}

impl GoalStore {
    pub fn new(slots: SlotCollection) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &SlotCollection {
        &self.slots
    }

    pub fn slot(&self, id: MonthId) -> &Slot {
        &self.slots[id]
    }

    pub fn goal(&self, id: MonthId) -> &Goal {
        &self.slots[id].goal
    }

    /// Puts `text` into the first empty slot in calendar order. Returns `None`
    /// when the board is full or `text` is blank.
    pub fn assign_first_available(&mut self, text: impl Into<String>) -> Option<MonthId> {
        let text = text.into();
        if text.trim().is_empty() {
            log::debug!("Ignoring blank goal");
            return None;
        }

        let Some(slot) = self.slots.slots_mut().find(|slot| !slot.has_goal()) else {
            log::debug!("No free slot for goal '{}'", text);
            return None;
        };

        slot.goal = Goal::new(text);
        log::debug!("Assigned '{}' to {}", slot.goal, slot.id);
        Some(slot.id)
    }

    /// Exchanges the goals of two slots; a move when one of them is empty.
    pub fn swap(&mut self, source: MonthId, target: MonthId) {
        if source == target {
            return;
        }
        let moved = std::mem::take(&mut self.slots.slot_mut(source).goal);
        let displaced = std::mem::replace(&mut self.slots.slot_mut(target).goal, moved);
        self.slots.slot_mut(source).goal = displaced;
        log::debug!("Swapped goals of {} and {}", source, target);
    }

    pub fn clear(&mut self, id: MonthId) {
        let slot = self.slots.slot_mut(id);
        if slot.has_goal() {
            log::debug!("Cleared '{}' from {}", slot.goal, id);
            slot.goal = Goal::empty();
        }
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Slot::has_goal)
    }

    /// Takes names and colors from `roster`, keeping the current goals.
    pub fn restyle(&mut self, roster: &SlotCollection) {
        for slot in self.slots.slots_mut() {
            let styled = &roster[slot.id];
            slot.display_name = styled.display_name.clone();
            slot.color = styled.color;
        }
    }
}
