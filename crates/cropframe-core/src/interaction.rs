//! Exclusive pointer drag sessions.
//!
//! Once a pointer starts dragging the crop window, it owns the gesture
//! until it is released. Events from any other pointer (a second finger,
//! a pen hovering nearby) are ignored for as long as the drag lasts.

/// Identity of a pointer as reported by the input system.
pub type PointerId = i32;

/// Drag state of the crop editor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerSession {
    #[default]
    Idle,
    Dragging {
        owner: PointerId,
        last_x: f64,
        last_y: f64,
    },
}

impl PointerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerSession::Dragging { .. })
    }

    /// The pointer currently holding the drag, if any.
    pub fn owner(&self) -> Option<PointerId> {
        match self {
            PointerSession::Idle => None,
            PointerSession::Dragging { owner, .. } => Some(*owner),
        }
    }

    /// Start dragging with `pointer` at surface position `(x, y)`.
    ///
    /// Returns `false` and changes nothing if another drag is in progress.
    pub fn begin(&mut self, pointer: PointerId, x: f64, y: f64) -> bool {
        if self.is_dragging() {
            log::debug!("pointer {pointer} ignored: drag already owned by {:?}", self.owner());
            return false;
        }
        *self = PointerSession::Dragging {
            owner: pointer,
            last_x: x,
            last_y: y,
        };
        true
    }

    /// Feed a move event and get the delta since the previous one.
    ///
    /// Returns `None` unless `pointer` owns the current drag.
    pub fn update(&mut self, pointer: PointerId, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            PointerSession::Dragging {
                owner,
                last_x,
                last_y,
            } if *owner == pointer => {
                let delta = (x - *last_x, y - *last_y);
                *last_x = x;
                *last_y = y;
                Some(delta)
            }
            _ => None,
        }
    }

    /// Release the drag. Only the owning pointer can end it.
    pub fn end(&mut self, pointer: PointerId) -> bool {
        if self.owner() == Some(pointer) {
            *self = PointerSession::Idle;
            true
        } else {
            false
        }
    }

    /// Drop the drag regardless of owner (lost capture, session teardown).
    pub fn cancel(&mut self) {
        *self = PointerSession::Idle;
    }
}
