use crate::wheel::SLOT_COUNT;
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::ops::Index;
use strum::{Display as StrumDisplay, EnumCount, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    EnumCount,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MonthId {
    #[strum(to_string = "jan", serialize = "January", serialize = "1")]
    Jan,
    #[strum(to_string = "feb", serialize = "February", serialize = "2")]
    Feb,
    #[strum(to_string = "mar", serialize = "March", serialize = "3")]
    Mar,
    #[strum(to_string = "apr", serialize = "April", serialize = "4")]
    Apr,
    #[strum(to_string = "may", serialize = "5")]
    May,
    #[strum(to_string = "jun", serialize = "June", serialize = "6")]
    Jun,
    #[strum(to_string = "jul", serialize = "July", serialize = "7")]
    Jul,
    #[strum(to_string = "aug", serialize = "August", serialize = "8")]
    Aug,
    #[strum(to_string = "sep", serialize = "September", serialize = "9")]
    Sep,
    #[strum(to_string = "oct", serialize = "October", serialize = "10")]
    Oct,
    #[strum(to_string = "nov", serialize = "November", serialize = "11")]
    Nov,
    #[strum(to_string = "dec", serialize = "December", serialize = "12")]
    Dec,
}

impl MonthId {
    /// Canonical calendar order.
    pub const ALL: [MonthId; SLOT_COUNT] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::iter().nth(idx)
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Jan => "January",
            Self::Feb => "February",
            Self::Mar => "March",
            Self::Apr => "April",
            Self::May => "May",
            Self::Jun => "June",
            Self::Jul => "July",
            Self::Aug => "August",
            Self::Sep => "September",
            Self::Oct => "October",
            Self::Nov => "November",
            Self::Dec => "December",
        }
    }

    // diverging blue -> yellow -> red ramp
    pub fn default_color(&self) -> Srgb<u8> {
        let (r, g, b) = match self {
            Self::Jan => (0x00, 0x42, 0x9d),
            Self::Feb => (0x50, 0x5b, 0xa0),
            Self::Mar => (0x78, 0x77, 0xa1),
            Self::Apr => (0x9a, 0x94, 0x9e),
            Self::May => (0xb8, 0xb3, 0x96),
            Self::Jun => (0xd1, 0xd5, 0x83),
            Self::Jul => (0xe0, 0xd2, 0x37),
            Self::Aug => (0xe7, 0xa5, 0x47),
            Self::Sep => (0xe3, 0x79, 0x4d),
            Self::Oct => (0xd4, 0x4d, 0x4c),
            Self::Nov => (0xba, 0x21, 0x46),
            Self::Dec => (0x93, 0x00, 0x3a),
        };
        Srgb::new(r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct DisplayName(String);

crate::impl_string_newtype!(DisplayName);

/// Goal text attached to a slot. The empty string means unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct Goal(String);

crate::impl_string_newtype!(Goal);

impl Goal {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: MonthId,
    pub display_name: DisplayName,
    pub color: Srgb<u8>,
    pub goal: Goal,
}

impl Slot {
    pub fn new(id: MonthId) -> Self {
        Self {
            id,
            display_name: DisplayName::from(id.default_name()),
            color: id.default_color(),
            goal: Goal::empty(),
        }
    }

    pub fn has_goal(&self) -> bool {
        self.goal.is_assigned()
    }
}

/// The twelve slots in calendar order, addressed directly by [`MonthId`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCollection([Slot; SLOT_COUNT]);

impl Default for SlotCollection {
    fn default() -> Self {
        Self(MonthId::ALL.map(Slot::new))
    }
}

impl SlotCollection {
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.0.iter()
    }

    pub fn with_name(mut self, id: MonthId, name: DisplayName) -> Self {
        self.0[id.as_index()].display_name = name;
        self
    }

    pub fn with_color(mut self, id: MonthId, color: Srgb<u8>) -> Self {
        self.0[id.as_index()].color = color;
        self
    }

    pub(crate) fn slot_mut(&mut self, id: MonthId) -> &mut Slot {
        &mut self.0[id.as_index()]
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.0.iter_mut()
    }
}

impl Index<MonthId> for SlotCollection {
    type Output = Slot;

    fn index(&self, id: MonthId) -> &Slot {
        &self.0[id.as_index()]
    }
}
