use crate::wheel::drag::DragController;
use crate::wheel::layout::{LabelPlacement, Point, RadialLayout, SliceGeometry};
use crate::wheel::month::{DisplayName, Goal, MonthId};
use crate::wheel::store::GoalStore;
use palette::Srgb;

#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Slice {
        id: MonthId,
        center: Point,
        radius: f64,
        geometry: SliceGeometry,
        color: Srgb<u8>,
    },
    Label {
        id: MonthId,
        text: DisplayName,
        placement: LabelPlacement,
    },
    Marker {
        id: MonthId,
        text: Goal,
        position: Point,
        rotation_deg: f64,
    },
}

impl Drawable {
    pub fn id(&self) -> MonthId {
        match self {
            Self::Slice { id, .. } | Self::Label { id, .. } | Self::Marker { id, .. } => *id,
        }
    }
}

/// Everything needed to paint the wheel. `background` is painted first;
/// `foreground` holds the marker in flight so slices never cover it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub background: Vec<Drawable>,
    pub foreground: Vec<Drawable>,
}

impl Scene {
    pub fn build(layout: &RadialLayout, store: &GoalStore, drag: &DragController) -> Self {
        let session = drag.session();
        let mut scene = Self::default();

        for slot in store.slots().iter() {
            let geometry = layout.geometry(slot.id);
            scene.background.push(Drawable::Slice {
                id: slot.id,
                center: layout.center(),
                radius: layout.outer_radius(),
                geometry: geometry.slice,
                color: slot.color,
            });
            scene.background.push(Drawable::Label {
                id: slot.id,
                text: slot.display_name.clone(),
                placement: geometry.label,
            });
        }

        for slot in store.slots().iter().filter(|s| s.has_goal()) {
            let marker = layout.marker(slot.id);
            match session.filter(|s| s.slot == slot.id) {
                Some(active) => scene.foreground.push(Drawable::Marker {
                    id: slot.id,
                    text: slot.goal.clone(),
                    position: active.position,
                    rotation_deg: marker.rotation_deg,
                }),
                None => scene.background.push(Drawable::Marker {
                    id: slot.id,
                    text: slot.goal.clone(),
                    position: marker.anchor,
                    rotation_deg: marker.rotation_deg,
                }),
            }
        }

        scene
    }

    pub fn markers(&self) -> impl Iterator<Item = &Drawable> {
        self.background
            .iter()
            .chain(&self.foreground)
            .filter(|d| matches!(d, Drawable::Marker { .. }))
    }
}
