use crate::wheel::month::{Goal, MonthId, SlotCollection};
use crate::wheel::{
    DEFAULT_CENTER_X, DEFAULT_CENTER_Y, DEFAULT_INITIAL_ROTATION_DEG, DEFAULT_OUTER_RADIUS,
    FULL_TURN_DEG, LABEL_PADDING, LABEL_WIDTH, MARKER_GRAB_FRACTION, MARKER_RADIUS_FRACTION,
    SLOT_COUNT,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Projects `distance` from `self` along `angle_deg`.
    pub fn project(&self, angle_deg: f64, distance: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self::new(
            self.x + rad.cos() * distance,
            self.y + rad.sin() * distance,
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Layout constant '{0}' must be finite")]
    NotFinite(&'static str),
    #[error("Outer radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("Slices of {slice_angle} degrees do not cover a full turn with {slot_count} slots")]
    IncompleteTurn { slice_angle: f64, slot_count: usize },
}

/// Wheel placement. Only constructible through [`LayoutConstants::new`], so every
/// value in circulation has already been checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    center: Point,
    outer_radius: f64,
    initial_rotation_deg: f64,
}

impl LayoutConstants {
    pub fn new(
        center: Point,
        outer_radius: f64,
        initial_rotation_deg: f64,
    ) -> Result<Self, LayoutError> {
        for (name, value) in [
            ("center_x", center.x),
            ("center_y", center.y),
            ("outer_radius", outer_radius),
            ("initial_rotation_deg", initial_rotation_deg),
        ] {
            if !value.is_finite() {
                return Err(LayoutError::NotFinite(name));
            }
        }
        if outer_radius <= 0.0 {
            return Err(LayoutError::NonPositiveRadius(outer_radius));
        }

        let slice_angle = FULL_TURN_DEG / SLOT_COUNT as f64;
        if (slice_angle * SLOT_COUNT as f64 - FULL_TURN_DEG).abs() > 1e-9 {
            return Err(LayoutError::IncompleteTurn {
                slice_angle,
                slot_count: SLOT_COUNT,
            });
        }

        Ok(Self {
            center,
            outer_radius,
            initial_rotation_deg,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn initial_rotation_deg(&self) -> f64 {
        self.initial_rotation_deg
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            center: Point::new(DEFAULT_CENTER_X, DEFAULT_CENTER_Y),
            outer_radius: DEFAULT_OUTER_RADIUS,
            initial_rotation_deg: DEFAULT_INITIAL_ROTATION_DEG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometry {
    pub start_deg: f64,
    pub sweep_deg: f64,
}

impl SliceGeometry {
    pub fn end_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg
    }

    pub fn bisector_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

/// Top-left corner of a text box of `width`, rotated around that corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub anchor: Point,
    pub rotation_deg: f64,
    pub align: TextAlign,
    pub width: f64,
}

/// Centre of the goal text, rotated around that centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPlacement {
    pub anchor: Point,
    pub rotation_deg: f64,
}

impl MarkerPlacement {
    /// `point` relative to the anchor, as (along the text, across the text).
    pub fn local_offset(&self, point: Point) -> (f64, f64) {
        let (dx, dy) = (point.x - self.anchor.x, point.y - self.anchor.y);
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        (dx * cos + dy * sin, dy * cos - dx * sin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub slice: SliceGeometry,
    pub label: LabelPlacement,
    pub marker: MarkerPlacement,
}

/// Pure geometry of the wheel. Nothing here is cached; every call derives its
/// answer from the slot index and the constants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialLayout {
    constants: LayoutConstants,
}

impl RadialLayout {
    pub fn new(constants: LayoutConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    pub fn center(&self) -> Point {
        self.constants.center
    }

    pub fn outer_radius(&self) -> f64 {
        self.constants.outer_radius
    }

    pub fn slice_angle(&self) -> f64 {
        FULL_TURN_DEG / SLOT_COUNT as f64
    }

    fn is_second_half(id: MonthId) -> bool {
        id.as_index() >= SLOT_COUNT / 2
    }

    pub fn slice(&self, id: MonthId) -> SliceGeometry {
        SliceGeometry {
            start_deg: self.constants.initial_rotation_deg
                + id.as_index() as f64 * self.slice_angle(),
            sweep_deg: self.slice_angle(),
        }
    }

    pub fn label(&self, id: MonthId) -> LabelPlacement {
        let bisector = self.slice(id).bisector_deg();
        let base = self.constants.outer_radius + LABEL_PADDING;

        // text painted outside the wheel is flipped on the lower/left half
        let (distance, rotation_deg, align) = if Self::is_second_half(id) {
            (base + LABEL_WIDTH, bisector + 180.0, TextAlign::Right)
        } else {
            (base, bisector, TextAlign::Left)
        };

        LabelPlacement {
            anchor: self.constants.center.project(bisector, distance),
            rotation_deg,
            align,
            width: LABEL_WIDTH,
        }
    }

    pub fn marker(&self, id: MonthId) -> MarkerPlacement {
        let bisector = self.slice(id).bisector_deg();
        let flip = if Self::is_second_half(id) { 180.0 } else { 0.0 };

        MarkerPlacement {
            anchor: self
                .constants
                .center
                .project(bisector, self.constants.outer_radius * MARKER_RADIUS_FRACTION),
            rotation_deg: bisector + flip,
        }
    }

    pub fn geometry(&self, id: MonthId) -> SlotGeometry {
        SlotGeometry {
            slice: self.slice(id),
            label: self.label(id),
            marker: self.marker(id),
        }
    }

    /// Distance from the centre and angle in `[0, 360)`.
    pub fn to_polar(&self, point: Point) -> (f64, f64) {
        let (dx, dy) = (point.x - self.constants.center.x, point.y - self.constants.center.y);
        (dx.hypot(dy), normalize_deg(dy.atan2(dx).to_degrees()))
    }

    fn slice_index_at(&self, angle_deg: f64) -> usize {
        let offset = normalize_deg(angle_deg - self.constants.initial_rotation_deg);
        ((offset / self.slice_angle()).floor() as usize).min(SLOT_COUNT - 1)
    }

    /// Whether `angle_deg` falls in the `[start, start + sweep)` range of `id`,
    /// taken modulo 360 so the slice across the 0/360 seam wraps.
    pub fn slice_contains(&self, id: MonthId, angle_deg: f64) -> bool {
        self.slice_index_at(angle_deg) == id.as_index()
    }

    /// Slice under `point`, or `None` outside the outer radius. Labels are not
    /// hit targets, so a point over a label resolves to the slice beneath it.
    pub fn hit_test(&self, point: Point) -> Option<MonthId> {
        let (radius, angle) = self.to_polar(point);
        if radius > self.constants.outer_radius {
            return None;
        }
        MonthId::from_index(self.slice_index_at(angle))
    }

    /// Nearest occupied marker whose text covers `point`. `half_width` gives
    /// the drawn half-length of a goal's text along the marker axis; the grab
    /// band is never narrower than `MARKER_GRAB_FRACTION` of the radius.
    pub fn marker_at(
        &self,
        point: Point,
        slots: &SlotCollection,
        half_width: impl Fn(&Goal) -> f64,
    ) -> Option<MonthId> {
        let reach = self.constants.outer_radius * MARKER_GRAB_FRACTION;

        slots
            .iter()
            .filter(|slot| slot.has_goal())
            .filter_map(|slot| {
                let marker = self.marker(slot.id);
                let (along, across) = marker.local_offset(point);
                let span = half_width(&slot.goal).max(reach);
                (along.abs() <= span && across.abs() <= reach)
                    .then(|| (slot.id, marker.anchor.distance_to(point)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN_DEG);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    fn layout() -> RadialLayout {
        RadialLayout::default()
    }

    fn bisector_point(layout: &RadialLayout, id: MonthId, distance: f64) -> Point {
        layout
            .center()
            .project(layout.slice(id).bisector_deg(), distance)
    }

    #[test]
    fn test_slices_cover_full_turn() {
        let layout = layout();
        let total: f64 = MonthId::iter().map(|id| layout.slice(id).sweep_deg).sum();
        assert_relative_eq!(total, 360.0);

        for pair in MonthId::ALL.windows(2) {
            assert_relative_eq!(layout.slice(pair[0]).end_deg(), layout.slice(pair[1]).start_deg);
        }
        assert_relative_eq!(
            layout.slice(MonthId::Dec).end_deg() - 360.0,
            layout.slice(MonthId::Jan).start_deg
        );
    }

    #[test]
    fn test_first_slice_starts_at_top() {
        let slice = layout().slice(MonthId::Jan);
        assert_relative_eq!(slice.start_deg, -90.0);
        assert_relative_eq!(slice.sweep_deg, 30.0);
        assert_relative_eq!(slice.bisector_deg(), -75.0);
    }

    #[test]
    fn test_bisector_hits_own_slice() {
        let layout = layout();
        for id in MonthId::iter() {
            let point = bisector_point(&layout, id, layout.outer_radius() / 2.0);
            assert_eq!(layout.hit_test(point), Some(id), "slice {id}");
        }
    }

    #[test]
    fn test_seam_straddling_slice() {
        // mar spans -15 .. 15 with this rotation
        let layout = RadialLayout::new(
            LayoutConstants::new(Point::new(0.0, 0.0), 100.0, -75.0).unwrap(),
        );
        assert_eq!(
            layout.hit_test(Point::new(0.0, 0.0).project(-1.0, 50.0)),
            Some(MonthId::Mar)
        );
        assert_eq!(
            layout.hit_test(Point::new(0.0, 0.0).project(1.0, 50.0)),
            Some(MonthId::Mar)
        );
        assert!(layout.slice_contains(MonthId::Mar, 359.5));
        assert!(layout.slice_contains(MonthId::Mar, 0.5));
        assert!(!layout.slice_contains(MonthId::Feb, 0.5));
    }

    #[test]
    fn test_outside_wheel_misses() {
        let layout = layout();
        let point = bisector_point(&layout, MonthId::Apr, layout.outer_radius() + 0.5);
        assert_eq!(layout.hit_test(point), None);

        let edge = bisector_point(&layout, MonthId::Apr, layout.outer_radius() - 1e-6);
        assert_eq!(layout.hit_test(edge), Some(MonthId::Apr));
    }

    #[test]
    fn test_center_hits_a_slice() {
        let layout = layout();
        assert!(layout.hit_test(layout.center()).is_some());
    }

    #[test]
    fn test_label_placement_flips_second_half() {
        let layout = layout();

        let jan = layout.label(MonthId::Jan);
        assert_eq!(jan.align, TextAlign::Left);
        assert_relative_eq!(jan.rotation_deg, -75.0);
        assert_relative_eq!(
            jan.anchor.distance_to(layout.center()),
            DEFAULT_OUTER_RADIUS + LABEL_PADDING,
            epsilon = 1e-9
        );

        let jul = layout.label(MonthId::Jul);
        assert_eq!(jul.align, TextAlign::Right);
        assert_relative_eq!(jul.rotation_deg, 105.0 + 180.0);
        assert_relative_eq!(
            jul.anchor.distance_to(layout.center()),
            DEFAULT_OUTER_RADIUS + LABEL_PADDING + LABEL_WIDTH,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_labels_sit_outside_wheel() {
        let layout = layout();
        for id in MonthId::iter() {
            let label = layout.label(id);
            assert!(label.anchor.distance_to(layout.center()) > layout.outer_radius());
            assert_eq!(layout.hit_test(label.anchor), None);
        }
    }

    #[test]
    fn test_marker_placement() {
        let layout = layout();

        let mar = layout.marker(MonthId::Mar);
        assert_relative_eq!(mar.anchor.distance_to(layout.center()), 120.0, epsilon = 1e-9);
        assert_relative_eq!(mar.rotation_deg, -15.0);
        assert_eq!(layout.hit_test(mar.anchor), Some(MonthId::Mar));

        let oct = layout.marker(MonthId::Oct);
        assert_relative_eq!(oct.rotation_deg, 195.0 + 180.0);
        assert_eq!(layout.hit_test(oct.anchor), Some(MonthId::Oct));
    }

    #[test]
    fn test_marker_at_ignores_empty_slots() {
        let layout = layout();
        let mut slots = SlotCollection::default();
        let anchor = layout.marker(MonthId::May).anchor;

        assert_eq!(layout.marker_at(anchor, &slots, |_| 0.0), None);

        slots.slot_mut(MonthId::May).goal = Goal::from("Paint");
        assert_eq!(
            layout.marker_at(anchor.offset(3.0, -2.0), &slots, |_| 0.0),
            Some(MonthId::May)
        );
        assert_eq!(layout.marker_at(layout.center(), &slots, |_| 0.0), None);
    }

    #[test]
    fn test_marker_at_covers_long_text() {
        let layout = layout();
        let mut slots = SlotCollection::default();
        slots.slot_mut(MonthId::Mar).goal = Goal::from("Finish the long-distance cycling route");
        let marker = layout.marker(MonthId::Mar);
        let text_half_width = |_: &Goal| 80.0;

        // near the end of the text, well beyond the grab radius of 30
        let tail = marker.anchor.project(marker.rotation_deg, 70.0);
        assert_eq!(layout.marker_at(tail, &slots, |_| 0.0), None);
        assert_eq!(layout.marker_at(tail, &slots, text_half_width), Some(MonthId::Mar));

        let head = marker.anchor.project(marker.rotation_deg + 180.0, 70.0);
        assert_eq!(layout.marker_at(head, &slots, text_half_width), Some(MonthId::Mar));

        // the same distance across the text is still a miss
        let beside = marker.anchor.project(marker.rotation_deg + 90.0, 70.0);
        assert_eq!(layout.marker_at(beside, &slots, text_half_width), None);
    }

    #[test]
    fn test_local_offset_follows_rotation() {
        let marker = MarkerPlacement {
            anchor: Point::new(10.0, 10.0),
            rotation_deg: 90.0,
        };
        let (along, across) = marker.local_offset(Point::new(10.0, 15.0));
        assert_relative_eq!(along, 5.0, epsilon = 1e-9);
        assert_relative_eq!(across, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_constants_rejected() {
        let origin = Point::default();
        assert_eq!(
            LayoutConstants::new(origin, 0.0, -90.0),
            Err(LayoutError::NonPositiveRadius(0.0))
        );
        assert_eq!(
            LayoutConstants::new(origin, -5.0, -90.0),
            Err(LayoutError::NonPositiveRadius(-5.0))
        );
        assert_eq!(
            LayoutConstants::new(Point::new(f64::NAN, 0.0), 10.0, 0.0),
            Err(LayoutError::NotFinite("center_x"))
        );
        assert_eq!(
            LayoutConstants::new(origin, 10.0, f64::INFINITY),
            Err(LayoutError::NotFinite("initial_rotation_deg"))
        );
    }

    fn constants_strategy() -> impl Strategy<Value = LayoutConstants> {
        (-500.0..500.0f64, -500.0..500.0f64, 1.0..1000.0f64, -720.0..720.0f64).prop_map(
            |(x, y, r, rot)| LayoutConstants::new(Point::new(x, y), r, rot).unwrap(),
        )
    }

    proptest! {
        #[test]
        fn prop_slices_partition_the_turn(constants in constants_strategy()) {
            let layout = RadialLayout::new(constants);
            let total: f64 = MonthId::iter().map(|id| layout.slice(id).sweep_deg).sum();
            prop_assert!((total - 360.0).abs() < 1e-9);
            for pair in MonthId::ALL.windows(2) {
                prop_assert!((layout.slice(pair[0]).end_deg() - layout.slice(pair[1]).start_deg).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_bisectors_resolve_to_own_slice(constants in constants_strategy()) {
            let layout = RadialLayout::new(constants);
            for id in MonthId::iter() {
                let point = bisector_point(&layout, id, layout.outer_radius() / 2.0);
                prop_assert_eq!(layout.hit_test(point), Some(id));
            }
        }

        #[test]
        fn prop_points_inside_hit_the_enclosing_slice(
            constants in constants_strategy(),
            angle in 0.0..360.0f64,
            fraction in 0.01..0.999f64,
        ) {
            let layout = RadialLayout::new(constants);
            let point = layout.center().project(angle, layout.outer_radius() * fraction);
            let hit = layout.hit_test(point);
            prop_assert!(hit.is_some());

            let slice = layout.slice(hit.unwrap());
            let (_, polar) = layout.to_polar(point);
            let from_bisector = ((polar - slice.bisector_deg() + 180.0).rem_euclid(360.0) - 180.0).abs();
            prop_assert!(from_bisector <= slice.sweep_deg / 2.0 + 1e-6);
        }

        #[test]
        fn prop_points_outside_miss(
            constants in constants_strategy(),
            angle in 0.0..360.0f64,
            factor in 1.001..5.0f64,
        ) {
            let layout = RadialLayout::new(constants);
            let point = layout.center().project(angle, layout.outer_radius() * factor);
            prop_assert_eq!(layout.hit_test(point), None);
        }
    }
}
