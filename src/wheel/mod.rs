use strum::EnumCount;

pub mod drag;
pub mod layout;
pub mod month;
pub mod scene;
pub mod store;

pub use drag::{DragController, DragSession, DragState, DropOutcome};
pub use layout::{LayoutConstants, LayoutError, Point, RadialLayout, TextAlign};
pub use month::{DisplayName, Goal, MonthId, Slot, SlotCollection};
pub use scene::{Drawable, Scene};
pub use store::GoalStore;

pub const SLOT_COUNT: usize = MonthId::COUNT;
pub const FULL_TURN_DEG: f64 = 360.0;
pub const DEFAULT_CENTER_X: f64 = 400.0;
pub const DEFAULT_CENTER_Y: f64 = 300.0;
pub const DEFAULT_OUTER_RADIUS: f64 = 200.0;
pub const DEFAULT_INITIAL_ROTATION_DEG: f64 = -90.0; // first slice starts at 12 o'clock
pub const LABEL_PADDING: f64 = 10.0; // gap between rim and month name
pub const LABEL_WIDTH: f64 = 100.0;
pub const MARKER_RADIUS_FRACTION: f64 = 0.6;
pub const MARKER_GRAB_FRACTION: f64 = 0.15; // pick-up distance around a marker

/// The wheel as a host sees it: geometry, goals and the drag in progress.
#[derive(Debug, Clone, Default)]
pub struct Wheel {
    layout: RadialLayout,
    store: GoalStore,
    drag: DragController,
}

impl Wheel {
    pub fn new(layout: RadialLayout, store: GoalStore) -> Self {
        Self {
            layout,
            store,
            drag: DragController::new(),
        }
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    pub fn store(&self) -> &GoalStore {
        &self.store
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    /// First-fit insertion of a typed goal. Refused while a marker is in
    /// flight so the dragged slot cannot change under the pointer.
    pub fn submit_goal(&mut self, text: impl Into<String>) -> Option<MonthId> {
        if let Some(session) = self.drag.session() {
            log::warn!("Not adding a goal while {} is being dragged", session.slot);
            return None;
        }
        self.store.assign_first_available(text)
    }

    /// Picks up the marker under `pointer`, if any. `text_half_width` is the
    /// host's measure of a goal's drawn half-length.
    pub fn begin_drag(
        &mut self,
        pointer: Point,
        text_half_width: impl Fn(&Goal) -> f64,
    ) -> Option<MonthId> {
        let id = self
            .layout
            .marker_at(pointer, self.store.slots(), text_half_width)?;
        self.drag
            .gesture_start(id, self.layout.marker(id).anchor, &self.store)
            .then_some(id)
    }

    /// Moves the dragged marker to its origin shifted by the pointer offset.
    pub fn drag_by(&mut self, dx: f64, dy: f64) {
        if let Some(origin) = self.drag.session().map(|s| s.origin) {
            self.drag.gesture_move(origin.offset(dx, dy));
        }
    }

    pub fn end_drag(&mut self, dx: f64, dy: f64) -> Option<DropOutcome> {
        let release = self.drag.session()?.origin.offset(dx, dy);
        self.drag.gesture_end(release, &self.layout, &mut self.store)
    }

    /// Applies new geometry and slot styling; goals and any drag survive.
    pub fn reconfigure(&mut self, layout: RadialLayout, roster: &SlotCollection) {
        self.layout = layout;
        self.store.restyle(roster);
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.layout, &self.store, &self.drag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_slice_angle_covers_turn() {
        assert_eq!(SLOT_COUNT, 12);
        assert_relative_eq!(
            RadialLayout::default().slice_angle() * SLOT_COUNT as f64,
            FULL_TURN_DEG
        );
    }

    #[test]
    fn test_add_then_drag_out_removes() {
        let mut slots = SlotCollection::default();
        slots.slot_mut(MonthId::Mar).goal = Goal::from("Run 5k");
        let mut wheel = Wheel::new(RadialLayout::default(), GoalStore::new(slots));

        let grab = wheel.layout().marker(MonthId::Mar).anchor.offset(4.0, 1.0);
        assert_eq!(wheel.begin_drag(grab, |_| 0.0), Some(MonthId::Mar));

        let outcome = wheel.end_drag(wheel.layout().outer_radius() * 2.0, 0.0);
        assert_eq!(outcome, Some(DropOutcome::Removed(MonthId::Mar)));
        assert_eq!(wheel.store().goal(MonthId::Mar).as_str(), "");
    }

    #[test]
    fn test_small_drag_resets_marker() {
        let mut wheel = Wheel::default();
        wheel.submit_goal("Run 5k");
        let origin = wheel.layout().marker(MonthId::Jan).anchor;

        wheel.begin_drag(origin, |_| 0.0);
        wheel.drag_by(6.0, -4.0);
        assert_eq!(
            wheel.scene().foreground.first().map(Drawable::id),
            Some(MonthId::Jan)
        );

        let outcome = wheel.end_drag(3.0, 3.0);
        assert_eq!(
            outcome,
            Some(DropOutcome::Reset {
                slot: MonthId::Jan,
                origin
            })
        );
        assert_eq!(wheel.store().goal(MonthId::Jan).as_str(), "Run 5k");
        assert!(wheel.scene().foreground.is_empty());
    }

    #[test]
    fn test_drag_onto_other_slice_swaps() {
        let mut wheel = Wheel::default();
        wheel.submit_goal("Run 5k");
        wheel.submit_goal("Learn X");

        let from = wheel.layout().marker(MonthId::Jan).anchor;
        let to = wheel.layout().marker(MonthId::Feb).anchor;
        wheel.begin_drag(from, |_| 0.0);
        wheel.end_drag(to.x - from.x, to.y - from.y);

        assert_eq!(wheel.store().goal(MonthId::Jan).as_str(), "Learn X");
        assert_eq!(wheel.store().goal(MonthId::Feb).as_str(), "Run 5k");
    }

    #[test]
    fn test_begin_drag_on_empty_area_does_nothing() {
        let mut wheel = Wheel::default();
        wheel.submit_goal("Run 5k");

        assert_eq!(wheel.begin_drag(wheel.layout().center(), |_| 0.0), None);
        assert!(!wheel.drag().is_dragging());
        assert_eq!(wheel.end_drag(0.0, 0.0), None);
    }

    #[test]
    fn test_submit_refused_while_dragging() {
        let mut wheel = Wheel::default();
        wheel.submit_goal("Run 5k");
        wheel.begin_drag(wheel.layout().marker(MonthId::Jan).anchor, |_| 0.0);

        assert_eq!(wheel.submit_goal("Learn X"), None);
        wheel.end_drag(0.0, 0.0);
        assert_eq!(wheel.submit_goal("Learn X"), Some(MonthId::Feb));
    }

    #[test]
    fn test_reconfigure_keeps_goals() {
        let mut wheel = Wheel::default();
        wheel.submit_goal("Run 5k");

        let constants = LayoutConstants::new(Point::new(0.0, 0.0), 50.0, 0.0).unwrap();
        let roster = SlotCollection::default().with_name(MonthId::Jan, DisplayName::from("Jan"));
        wheel.reconfigure(RadialLayout::new(constants), &roster);

        assert_relative_eq!(wheel.layout().outer_radius(), 50.0);
        assert_eq!(wheel.store().slot(MonthId::Jan).display_name.as_str(), "Jan");
        assert_eq!(wheel.store().goal(MonthId::Jan).as_str(), "Run 5k");
    }
}
