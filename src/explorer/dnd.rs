//! Drag-and-drop reassignment of a note's parent folder.

use std::time::{Duration, Instant};

use crate::mutation::Mutation;

/// Mouse drags start once the pointer has travelled this far.
pub const MOUSE_ACTIVATION_DISTANCE: f32 = 10.0;
/// Touch drags start after holding this long...
pub const TOUCH_ACTIVATION_DELAY: Duration = Duration::from_millis(250);
/// ...without drifting further than this.
pub const TOUCH_TOLERANCE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Still could be a click or tap.
    Pending,
    /// The gesture is a drag.
    Activated,
    /// The gesture is something else (e.g. a touch scroll).
    Aborted,
}

/// Tells a click from a drag for one press.
#[derive(Debug, Clone, Copy)]
pub struct Gesture {
    sensor: Sensor,
    origin: Point,
    pressed_at: Instant,
    status: Activation,
}

impl Gesture {
    pub const fn press(sensor: Sensor, at: Point, now: Instant) -> Self {
        Self {
            sensor,
            origin: at,
            pressed_at: now,
            status: Activation::Pending,
        }
    }

    pub const fn status(&self) -> Activation {
        self.status
    }

    pub fn pointer_moved(&mut self, to: Point, now: Instant) -> Activation {
        if self.status != Activation::Pending {
            return self.status;
        }

        let travelled = self.origin.distance_to(to);
        match self.sensor {
            Sensor::Mouse => {
                if travelled >= MOUSE_ACTIVATION_DISTANCE {
                    self.status = Activation::Activated;
                }
            }
            Sensor::Touch => {
                if travelled > TOUCH_TOLERANCE {
                    self.status = Activation::Aborted;
                } else {
                    return self.elapsed(now);
                }
            }
        }
        self.status
    }

    /// Advances time without movement; only touch presses care.
    pub fn elapsed(&mut self, now: Instant) -> Activation {
        if self.status == Activation::Pending
            && self.sensor == Sensor::Touch
            && now.duration_since(self.pressed_at) >= TOUCH_ACTIVATION_DELAY
        {
            self.status = Activation::Activated;
        }
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    Folder(i64),
    /// The dedicated zone that moves notes out of any folder.
    Root,
}

impl DropTarget {
    const fn folder_id(self) -> Option<i64> {
        match self {
            Self::Folder(id) => Some(id),
            Self::Root => None,
        }
    }
}

/// The note being dragged, as shown in the overlay preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggedNote {
    pub id: i64,
    pub title: String,
    /// Folder the note currently lives in.
    pub origin: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DraggedNote),
    OverTarget(DraggedNote, DropTarget),
}

#[derive(Debug, Default)]
pub struct DragAndDrop {
    state: DragState,
}

impl DragAndDrop {
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    pub fn start(&mut self, note: DraggedNote) {
        if matches!(self.state, DragState::Idle) {
            self.state = DragState::Dragging(note);
        }
    }

    /// Reports what is under the pointer. The note's current container is
    /// not a valid target and never gets highlighted.
    pub fn hover(&mut self, target: Option<DropTarget>) {
        let note = match std::mem::take(&mut self.state) {
            DragState::Idle => return,
            DragState::Dragging(note) | DragState::OverTarget(note, _) => note,
        };

        self.state = match target {
            Some(target) if target.folder_id() != note.origin => {
                DragState::OverTarget(note, target)
            }
            _ => DragState::Dragging(note),
        };
    }

    /// Ends the drag. A move is produced only when released over a valid
    /// target.
    pub fn release(&mut self) -> Option<Mutation> {
        match std::mem::take(&mut self.state) {
            DragState::OverTarget(note, target) => Some(Mutation::MoveNote {
                id: note.id,
                folder_id: target.folder_id(),
            }),
            DragState::Idle | DragState::Dragging(_) => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    pub const fn overlay(&self) -> Option<&DraggedNote> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(note) | DragState::OverTarget(note, _) => Some(note),
        }
    }

    pub const fn highlighted(&self) -> Option<DropTarget> {
        match &self.state {
            DragState::OverTarget(_, target) => Some(*target),
            _ => None,
        }
    }

    pub const fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }
}
