use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use dispatcharr_lib::api::Gateway;
use dispatcharr_lib::model::Actor;
use dispatcharr_lib::model::RowId;
use log::error;
use log::info;
use log::warn;

use super::DragCoordinator;
use super::DragError;
use super::DragState;
use super::RowRect;
use crate::query::FetchOutcome;
use crate::query::QueryController;

/// Result of a completed drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped where it started; nothing was sent.
    Unchanged,
    /// The server stored the new order and the table was refetched.
    Saved,
    /// The server rejected the new order. It is still displayed.
    Unsaved,
}

/// Drag reordering for the rows of one parent entity.
///
/// Cheap to clone; clones share the drag state.
pub struct Reorderer<G: Gateway> {
    table: QueryController<G>,
    parent: RowId,
    coordinator: Arc<Mutex<DragCoordinator>>,
}

impl<G: Gateway> Clone for Reorderer<G> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            parent: self.parent,
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<G: Gateway + 'static> Reorderer<G> {
    /// Reorder the rows `table` shows for `parent`.
    pub fn new(table: QueryController<G>, parent: RowId) -> Self {
        let coordinator = DragCoordinator::new(table.row_ids());
        Self {
            table,
            parent,
            coordinator: Arc::new(Mutex::new(coordinator)),
        }
    }

    pub fn table(&self) -> &QueryController<G> {
        &self.table
    }

    pub fn parent(&self) -> RowId {
        self.parent
    }

    fn lock(&self) -> MutexGuard<'_, DragCoordinator> {
        self.coordinator.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn state(&self) -> DragState {
        self.lock().state().clone()
    }

    /// The row order to display.
    pub fn order(&self) -> Vec<RowId> {
        self.lock().order().to_vec()
    }

    pub fn confirmed_order(&self) -> Vec<RowId> {
        self.lock().confirmed_order().to_vec()
    }

    /// Whether the displayed order failed to save.
    pub fn is_unsaved(&self) -> bool {
        self.lock().is_unsaved()
    }

    pub fn dragging(&self) -> Option<RowId> {
        self.lock().dragging()
    }

    /// Start dragging `id`.
    ///
    /// Picks up rows loaded by the table since the last sync.
    pub fn grab(&self, actor: &Actor, id: RowId) -> Result<(), DragError> {
        let rows = self.table.row_ids();
        let mut coordinator = self.lock();
        if coordinator.is_idle() && coordinator.order() != rows.as_slice() {
            coordinator.sync(rows);
        }
        coordinator.grab(actor, id)
    }

    pub fn move_to(&self, pointer_y: f32, rects: &[RowRect]) -> Result<usize, DragError> {
        self.lock().move_to(pointer_y, rects)
    }

    pub fn move_by(&self, delta: isize) -> Result<usize, DragError> {
        self.lock().move_by(delta)
    }

    pub fn cancel(&self) -> Result<(), DragError> {
        self.lock().cancel()
    }

    /// Drop the dragged row.
    ///
    /// The new order is shown immediately, then the full order of the parent
    /// (with this page spliced in) is sent to the gateway. If the page cannot
    /// be placed in the full order, nothing is sent, the table is reloaded and
    /// [`DragError::OutOfSync`] is returned. Privilege is not
    /// checked again here; it was checked by [`grab`](Self::grab).
    pub async fn drop(&self) -> Result<DropOutcome, DragError> {
        let dropped = DragCoordinator::drop(&mut self.lock())?;
        let Some(order) = dropped else {
            return Ok(DropOutcome::Unchanged);
        };

        if !self.table.apply_local_order(&order) {
            warn!("Not saving a partial order under {}", self.parent);
            {
                let mut coordinator = self.lock();
                coordinator.nack()?;
                coordinator.sync(self.table.row_ids());
            }
            self.refresh().await;
            return Err(DragError::OutOfSync);
        }
        let full = self.table.all_ids();

        match self.table.gateway().mutate_order(self.parent, &full).await {
            Ok(()) => {
                self.lock().ack()?;
                info!("Saved order of {} rows under {}", full.len(), self.parent);
                self.refresh().await;
                Ok(DropOutcome::Saved)
            }
            Err(e) => {
                error!("Saving order under {} failed: {}", self.parent, e);
                self.lock().nack()?;
                Ok(DropOutcome::Unsaved)
            }
        }
    }

    /// Refetch the table and adopt the server order.
    pub async fn refresh(&self) -> FetchOutcome {
        let outcome = self.table.fetch().await;
        if outcome == FetchOutcome::Applied {
            let rows = self.table.row_ids();
            self.lock().sync(rows);
        }
        outcome
    }
}
