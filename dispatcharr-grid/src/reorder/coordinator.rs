//! Drag state machine.

use dispatcharr_lib::model::Actor;
use dispatcharr_lib::model::RowId;
use log::debug;
use log::warn;

use super::collision::RowRect;
use super::collision::closest_center;
use super::array_move;

/// Errors from drag events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("Reordering requires admin privileges")]
    Unauthorized,

    #[error("A previous reorder is still being saved")]
    Busy,

    #[error("A row is already being dragged")]
    AlreadyDragging,

    #[error("Row {0} is not in the table")]
    UnknownRow(RowId),

    #[error("No drag in progress")]
    NotDragging,

    #[error("No reorder is being saved")]
    NotCommitting,

    #[error("The loaded rows are out of date; reload and try again")]
    OutOfSync,
}

/// An active drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub source: RowId,
    /// Index the row was grabbed at.
    pub from: usize,
    /// Index the row would be dropped at.
    pub over: usize,
    pub candidate_order: Vec<RowId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    /// The dropped order is applied locally and waiting for the server.
    Committing { order: Vec<RowId> },
}

/// `Idle → Dragging → Committing → Idle`, or `Dragging → Idle` on cancel.
///
/// The coordinator owns the displayed row order. A failed save leaves the
/// optimistic order in place and raises [`is_unsaved`](Self::is_unsaved);
/// the last order the server accepted stays available through
/// [`confirmed_order`](Self::confirmed_order).
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    state: DragState,
    order: Vec<RowId>,
    confirmed: Vec<RowId>,
    unsaved: bool,
}

impl DragCoordinator {
    pub fn new(order: Vec<RowId>) -> Self {
        Self {
            state: DragState::Idle,
            confirmed: order.clone(),
            order,
            unsaved: false,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// The order to display: the candidate order while dragging.
    pub fn order(&self) -> &[RowId] {
        match &self.state {
            DragState::Dragging(session) => &session.candidate_order,
            _ => &self.order,
        }
    }

    /// The last order known to be stored on the server.
    pub fn confirmed_order(&self) -> &[RowId] {
        &self.confirmed
    }

    /// Whether the displayed order failed to save.
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    /// The dragged row, if any.
    pub fn dragging(&self) -> Option<RowId> {
        match &self.state {
            DragState::Dragging(session) => Some(session.source),
            _ => None,
        }
    }

    /// Adopt a freshly fetched server order.
    ///
    /// Ignored unless idle. Returns `true` if the order was adopted.
    pub fn sync(&mut self, order: Vec<RowId>) -> bool {
        if !self.is_idle() {
            debug!("Ignoring order sync during {:?}", self.state);
            return false;
        }
        self.confirmed = order.clone();
        self.order = order;
        self.unsaved = false;
        true
    }

    pub fn grab(&mut self, actor: &Actor, id: RowId) -> Result<(), DragError> {
        match self.state {
            DragState::Committing { .. } => return Err(DragError::Busy),
            DragState::Dragging(_) => return Err(DragError::AlreadyDragging),
            DragState::Idle => {}
        }
        if !actor.is_admin() {
            warn!("{} may not reorder rows", actor.username);
            return Err(DragError::Unauthorized);
        }
        let from = self
            .order
            .iter()
            .position(|r| *r == id)
            .ok_or(DragError::UnknownRow(id))?;

        self.state = DragState::Dragging(DragSession {
            source: id,
            from,
            over: from,
            candidate_order: self.order.clone(),
        });
        Ok(())
    }

    /// Move the pointer to `pointer_y` over rows laid out as `rects`.
    /// Returns the candidate insertion index.
    pub fn move_to(&mut self, pointer_y: f32, rects: &[RowRect]) -> Result<usize, DragError> {
        let target = closest_center(rects, pointer_y);
        let over = target.and_then(|id| self.order.iter().position(|r| *r == id));
        let DragState::Dragging(session) = &mut self.state else {
            return Err(DragError::NotDragging);
        };
        Ok(match over {
            Some(over) => Self::retarget(session, &self.order, over),
            None => session.over,
        })
    }

    /// Move the insertion point by `delta` rows, for keyboard dragging.
    pub fn move_by(&mut self, delta: isize) -> Result<usize, DragError> {
        let last = self.order.len().saturating_sub(1);
        let DragState::Dragging(session) = &mut self.state else {
            return Err(DragError::NotDragging);
        };
        let over = session.over.saturating_add_signed(delta).min(last);
        Ok(Self::retarget(session, &self.order, over))
    }

    /// Abandon the gesture without saving.
    pub fn cancel(&mut self) -> Result<(), DragError> {
        self.session_mut()?;
        self.state = DragState::Idle;
        Ok(())
    }

    /// Finish the gesture.
    ///
    /// Returns the new order to persist, or `None` if the row was dropped
    /// where it started (back to idle, nothing to save).
    pub fn drop(&mut self) -> Result<Option<Vec<RowId>>, DragError> {
        let session = self.session_mut()?;
        if session.from == session.over {
            self.state = DragState::Idle;
            return Ok(None);
        }
        let order = std::mem::take(&mut session.candidate_order);
        self.order = order.clone();
        self.state = DragState::Committing {
            order: order.clone(),
        };
        Ok(Some(order))
    }

    /// The server accepted the committed order.
    pub fn ack(&mut self) -> Result<(), DragError> {
        if !matches!(self.state, DragState::Committing { .. }) {
            return Err(DragError::NotCommitting);
        }
        if let DragState::Committing { order } = std::mem::take(&mut self.state) {
            self.confirmed = order;
        }
        self.unsaved = false;
        Ok(())
    }

    /// The server rejected the committed order. The optimistic order stays.
    pub fn nack(&mut self) -> Result<(), DragError> {
        if !matches!(self.state, DragState::Committing { .. }) {
            return Err(DragError::NotCommitting);
        }
        self.state = DragState::Idle;
        self.unsaved = true;
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut DragSession, DragError> {
        match &mut self.state {
            DragState::Dragging(session) => Ok(session),
            _ => Err(DragError::NotDragging),
        }
    }

    fn retarget(session: &mut DragSession, order: &[RowId], over: usize) -> usize {
        if session.over != over {
            session.over = over;
            session.candidate_order = array_move(order, session.from, over);
        }
        over
    }
}
