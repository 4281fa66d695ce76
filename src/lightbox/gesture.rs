// SPDX-License-Identifier: MPL-2.0
//! Swipe and pull-to-dismiss drag tracking.
//!
//! A drag locks to whichever axis first moves past the lock distance, so a
//! diagonal swipe never both navigates and dismisses.

/// Distances governing drag recognition, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub axis_lock: f32,
    pub swipe: f32,
    pub dismiss: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Undecided,
    Horizontal,
    Vertical,
}

/// Visual feedback while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragFeedback {
    None,
    /// Track offset along x.
    Horizontal(f32),
    /// Downward pull (never negative).
    Vertical(f32),
}

/// What a released drag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Released before locking to an axis.
    None,
    Next,
    Prev,
    Dismiss,
    /// Under threshold; animate back to rest.
    SnapBack,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: (f32, f32),
    delta: (f32, f32),
    axis: Axis,
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    thresholds: Thresholds,
    drag: Option<Drag>,
}

impl DragTracker {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            drag: None,
        }
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.drag = Some(Drag {
            start: (x, y),
            delta: (0.0, 0.0),
            axis: Axis::Undecided,
        });
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn update(&mut self, x: f32, y: f32) -> DragFeedback {
        let lock = self.thresholds.axis_lock;
        let Some(drag) = self.drag.as_mut() else {
            return DragFeedback::None;
        };
        let dx = x - drag.start.0;
        let dy = y - drag.start.1;
        drag.delta = (dx, dy);
        if drag.axis == Axis::Undecided {
            if dx.abs() > lock && dx.abs() >= dy.abs() {
                drag.axis = Axis::Horizontal;
            } else if dy.abs() > lock {
                drag.axis = Axis::Vertical;
            }
        }
        match drag.axis {
            Axis::Undecided => DragFeedback::None,
            Axis::Horizontal => DragFeedback::Horizontal(dx),
            Axis::Vertical => DragFeedback::Vertical(dy.max(0.0)),
        }
    }

    pub fn end(&mut self) -> Gesture {
        let Some(drag) = self.drag.take() else {
            return Gesture::None;
        };
        let (dx, dy) = drag.delta;
        match drag.axis {
            Axis::Undecided => Gesture::None,
            Axis::Horizontal if dx <= -self.thresholds.swipe => Gesture::Next,
            Axis::Horizontal if dx >= self.thresholds.swipe => Gesture::Prev,
            Axis::Vertical if dy >= self.thresholds.dismiss => Gesture::Dismiss,
            _ => Gesture::SnapBack,
        }
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}
