//! Local mirror of one remote sub-board.

use crate::board::{BoardId, BoardState, GridIndex, Mark, Outcome};
use crate::remote::{BoardService, MoveError};
use crate::sequencer::IllegalMoveReason;
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument};

/// A rejected or failed move submission.
#[derive(Debug, Display, Error, From)]
pub enum MoveRejected {
    /// Locally detected illegality; the remote was never contacted.
    #[display("{_0}")]
    Illegal(IllegalMoveReason),
    /// The remote round trip failed or the collaborator refused.
    #[display("{_0}")]
    Remote(MoveError),
}

/// Confirmation of an accepted move.
#[derive(Debug, Clone, Copy)]
pub struct MoveReceipt {
    /// Set the first time the board's outcome turns terminal; the
    /// one-shot "decided" notification, emitted at most once per
    /// session lifetime. The orchestrator treats it as the signal that
    /// a decision exists; delivery into the meta-board is driven off
    /// mirror state, so a forward that fails can be re-delivered later.
    pub newly_decided: Option<Outcome>,
}

/// One sub-board's local mirror of remote state.
///
/// The mirror lags the remote source of truth by exactly one round
/// trip: a move is never applied speculatively, only by adopting the
/// collaborator's confirmed response.
#[derive(Debug, Clone)]
pub struct SubBoardSession {
    index: GridIndex,
    board_id: BoardId,
    cells: [Option<Mark>; 9],
    outcome: Outcome,
    decision_taken: bool,
}

impl SubBoardSession {
    /// Opens a fresh remote board for the given sub-board slot.
    #[instrument(skip(service), fields(index = index.get()))]
    pub async fn open(
        service: &dyn BoardService,
        index: GridIndex,
        starting_mark: Mark,
    ) -> Result<Self, MoveError> {
        let state = service.create(starting_mark).await?;
        info!(board_id = %state.id, "sub-board opened");
        Ok(Self {
            index,
            board_id: state.id.clone(),
            cells: state.cells,
            outcome: state.outcome(),
            decision_taken: false,
        })
    }

    /// This sub-board's slot in the meta grid.
    pub fn index(&self) -> GridIndex {
        self.index
    }

    /// Remote identity of the mirrored board.
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// The mirrored cells, row-major.
    pub fn cells(&self) -> &[Option<Mark>; 9] {
        &self.cells
    }

    /// The mirrored cell at the given index.
    pub fn cell(&self, cell: GridIndex) -> Option<Mark> {
        self.cells[cell.get()]
    }

    /// The mirrored outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Sends a move to the collaborator and reconciles the mirror with
    /// the authoritative response.
    ///
    /// # Errors
    ///
    /// `BoardAlreadyDecided` and `CellOccupied` are pre-checked locally
    /// to avoid a wasted round trip. `Network`/`RemoteRejected` come
    /// from the round trip itself. In every failure case the mirror is
    /// left untouched.
    #[instrument(skip(self, service), fields(index = self.index.get(), cell = cell.get()))]
    pub async fn request_move(
        &mut self,
        service: &dyn BoardService,
        cell: GridIndex,
        mark: Mark,
    ) -> Result<MoveReceipt, MoveRejected> {
        if self.outcome.is_decided() {
            return Err(IllegalMoveReason::BoardAlreadyDecided.into());
        }
        if self.cells[cell.get()].is_some() {
            return Err(IllegalMoveReason::CellOccupied.into());
        }

        let state = service.apply_move(&self.board_id, cell, mark).await?;
        Ok(self.reconcile(state))
    }

    /// Re-reads the remote board and reconciles the mirror.
    #[instrument(skip(self, service), fields(index = self.index.get()))]
    pub async fn refresh(
        &mut self,
        service: &dyn BoardService,
    ) -> Result<MoveReceipt, MoveError> {
        let state = service.fetch(&self.board_id).await?;
        Ok(self.reconcile(state))
    }

    /// Replaces the mirror with a confirmed remote state.
    fn reconcile(&mut self, state: BoardState) -> MoveReceipt {
        self.cells = state.cells;
        self.outcome = state.outcome();

        let newly_decided = if self.outcome.is_decided() && !self.decision_taken {
            self.decision_taken = true;
            info!(index = self.index.get(), outcome = ?self.outcome, "sub-board decided");
            Some(self.outcome)
        } else {
            None
        };

        debug!(index = self.index.get(), outcome = ?self.outcome, "mirror reconciled");
        MoveReceipt { newly_decided }
    }
}
