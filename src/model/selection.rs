//! Mid-gesture selection and render emphasis.
//!
//! Editing modes collect up to three points before they commit an edit. Each
//! collected point remembers whether the current gesture created it, so an
//! aborted gesture can remove exactly the points it added.

use std::collections::BTreeSet;

use crate::model::keys::PointIndex;

/// Where a selected point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrigin {
    /// The point existed before the gesture started
    PreExisting,
    /// The gesture created the point; aborting the gesture erases it
    CreatedThisGesture,
}

/// One occupied selection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSlot {
    pub index: PointIndex,
    pub origin: SlotOrigin,
}

impl SelectionSlot {
    pub fn existing(index: PointIndex) -> Self {
        Self {
            index,
            origin: SlotOrigin::PreExisting,
        }
    }

    pub fn created(index: PointIndex) -> Self {
        Self {
            index,
            origin: SlotOrigin::CreatedThisGesture,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.origin == SlotOrigin::CreatedThisGesture
    }
}

/// Number of selection slots.
pub const SLOT_COUNT: usize = 3;

/// Selected points of the gesture in progress, plus hover and highlight state.
///
/// Occupied slots are always packed to the front: `a` before `b` before `c`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTracker {
    slots: [Option<SelectionSlot>; SLOT_COUNT],
    hover: Option<PointIndex>,
    highlighted: BTreeSet<PointIndex>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a(&self) -> Option<SelectionSlot> {
        self.slots[0]
    }

    pub fn b(&self) -> Option<SelectionSlot> {
        self.slots[1]
    }

    pub fn c(&self) -> Option<SelectionSlot> {
        self.slots[2]
    }

    /// Indices of the occupied slots, in slot order.
    pub fn indices(&self) -> Vec<PointIndex> {
        self.slots.iter().flatten().map(|s| s.index).collect()
    }

    /// Number of occupied slots.
    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Select a point, or deselect it if it already occupies a slot.
    ///
    /// Matching is by index alone, whatever the origin tag. Selecting into a
    /// full tracker is ignored.
    pub fn toggle(&mut self, slot: SelectionSlot) {
        let occupied: Vec<SelectionSlot> = self.slots.iter().flatten().copied().collect();
        if occupied.iter().any(|s| s.index == slot.index) {
            let remaining: Vec<SelectionSlot> = occupied
                .into_iter()
                .filter(|s| s.index != slot.index)
                .collect();
            self.fill(&remaining);
            self.highlighted.remove(&slot.index);
        } else {
            if occupied.len() == SLOT_COUNT {
                return;
            }
            let mut next = occupied;
            next.push(slot);
            self.fill(&next);
            self.highlighted.insert(slot.index);
        }
    }

    fn fill(&mut self, occupied: &[SelectionSlot]) {
        self.slots = [None; SLOT_COUNT];
        for (target, slot) in self.slots.iter_mut().zip(occupied) {
            *target = Some(*slot);
        }
    }

    /// End a gesture: empty every slot and drop hover and highlight emphasis.
    pub fn clear(&mut self) {
        self.slots = [None; SLOT_COUNT];
        self.hover = None;
        self.highlighted.clear();
    }

    /// End a gesture but keep `index` emphasized as the hovered point.
    pub fn clear_with_hover(&mut self, index: PointIndex) {
        self.clear();
        self.hover = Some(index);
    }

    /// End the gesture and start a new one holding only `slot`.
    pub fn restart_with(&mut self, slot: SelectionSlot) {
        self.clear();
        self.toggle(slot);
    }

    /// Indices the current gesture created.
    pub fn fresh_indices(&self) -> Vec<PointIndex> {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.is_fresh())
            .map(|s| s.index)
            .collect()
    }

    pub fn hover(&self) -> Option<PointIndex> {
        self.hover
    }

    pub fn set_hover(&mut self, index: Option<PointIndex>) {
        self.hover = index;
    }

    pub fn is_highlighted(&self, index: PointIndex) -> bool {
        self.highlighted.contains(&index)
    }

    /// Whether a point is drawn with emphasis (hovered or highlighted).
    pub fn is_emphasized(&self, index: PointIndex) -> bool {
        self.hover == Some(index) || self.highlighted.contains(&index)
    }

    /// Follow a point to its new index.
    pub fn relabel(&mut self, old: PointIndex, new: PointIndex) {
        for slot in self.slots.iter_mut().flatten() {
            if slot.index == old {
                slot.index = new;
            }
        }
        if self.hover == Some(old) {
            self.hover = Some(new);
        }
        if self.highlighted.remove(&old) {
            self.highlighted.insert(new);
        }
    }

    /// Drop every reference to an erased point.
    pub fn forget(&mut self, index: PointIndex) {
        let remaining: Vec<SelectionSlot> = self
            .slots
            .iter()
            .flatten()
            .filter(|s| s.index != index)
            .copied()
            .collect();
        self.fill(&remaining);
        if self.hover == Some(index) {
            self.hover = None;
        }
        self.highlighted.remove(&index);
    }
}
