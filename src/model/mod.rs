//! Annotation data model: the point graph, gesture selection and editing modes.

mod graph;
mod keys;
mod mode;
mod selection;

pub use graph::{AnnotatedPoint, AnnotationGraph, RelabelError};
pub use keys::{AngleKey, CircleKey, LineKey, PointIndex};
pub use mode::{
    EventKind, LabelMode, ModeContext, MouseButton, PointerEvent, cancel_gesture, handle_event,
};
pub use selection::{SLOT_COUNT, SelectionSlot, SelectionTracker, SlotOrigin};
