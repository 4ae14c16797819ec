//! The meta-board: a tenth remote board whose cells are sub-board
//! outcomes.

use crate::board::{BoardId, GridIndex, Mark, Outcome};
use crate::remote::{BoardService, MoveError};
use tracing::{debug, info, instrument, warn};

/// Mirror of the meta game.
///
/// Cell *i* is filled when sub-board *i* is won; the winning mark is
/// forwarded to the remote collaborator through the same `apply_move`
/// contract a sub-board uses, and the meta outcome is whatever the
/// collaborator confirms. A drawn sub-board leaves its meta-cell empty
/// permanently but still counts as decided.
#[derive(Debug, Clone)]
pub struct MetaBoard {
    board_id: BoardId,
    cells: [Option<Mark>; 9],
    decided: [bool; 9],
    outcome: Outcome,
}

impl MetaBoard {
    /// Opens the remote meta game.
    #[instrument(skip(service))]
    pub async fn open(
        service: &dyn BoardService,
        starting_mark: Mark,
    ) -> Result<Self, MoveError> {
        let state = service.create(starting_mark).await?;
        info!(board_id = %state.id, "meta-board opened");
        Ok(Self {
            board_id: state.id.clone(),
            cells: state.cells,
            decided: [false; 9],
            outcome: state.outcome(),
        })
    }

    /// Remote identity of the meta game.
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// The mirrored meta cells; non-empty iff the matching sub-board
    /// was won.
    pub fn cells(&self) -> &[Option<Mark>; 9] {
        &self.cells
    }

    /// The collaborator-confirmed meta outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether sub-board `index`'s decision has been recorded here.
    pub fn is_decided(&self, index: GridIndex) -> bool {
        self.decided[index.get()]
    }

    /// Whether all nine sub-boards are decided (wins and draws alike).
    pub fn all_decided(&self) -> bool {
        self.decided.iter().all(|d| *d)
    }

    /// Records a sub-board's terminal outcome.
    ///
    /// Idempotent per index: duplicate notifications are ignored. A win
    /// is forwarded to the collaborator and the authoritative meta
    /// response adopted; the decided flag is set only after the round
    /// trip succeeds, so a failed forward can be retried. A draw marks
    /// the cell decided without a remote call. A `Pending` outcome is
    /// not a decision and is ignored.
    #[instrument(skip(self, service), fields(index = index.get()))]
    pub async fn record_decision(
        &mut self,
        service: &dyn BoardService,
        index: GridIndex,
        outcome: Outcome,
    ) -> Result<(), MoveError> {
        if self.decided[index.get()] {
            debug!("duplicate decision ignored");
            return Ok(());
        }

        match outcome {
            Outcome::Win(mark) => {
                let state = service.apply_move(&self.board_id, index, mark).await?;
                self.cells = state.cells;
                self.outcome = state.outcome();
                self.decided[index.get()] = true;
                info!(%mark, meta_outcome = ?self.outcome, "meta-cell filled");
            }
            Outcome::Draw => {
                self.decided[index.get()] = true;
                info!("drawn sub-board recorded, meta-cell stays empty");
            }
            Outcome::Pending => {
                warn!("pending outcome is not a decision");
            }
        }

        Ok(())
    }
}
