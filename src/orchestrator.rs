//! Match-level composition of the sequencer, the nine sub-boards, and
//! the meta-board.

use crate::board::{GridIndex, Mark, Outcome};
use crate::meta::MetaBoard;
use crate::remote::{BoardService, MoveError};
use crate::sequencer::{IllegalMoveReason, TurnSequencer};
use crate::session::{MoveRejected, SubBoardSession};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Terminal condition of the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    /// Match is still being played.
    InProgress,
    /// The meta-board was won by the given mark.
    Won(Mark),
    /// Meta draw, or every sub-board decided with no meta winner.
    Drawn,
}

/// Snapshot of one sub-board within a [`MatchSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    /// Slot in the meta grid (0..=8).
    pub index: usize,
    /// Mirrored cells, row-major.
    pub cells: [Option<Mark>; 9],
    /// Mirrored outcome.
    pub outcome: Outcome,
}

/// Unified match state returned to the outer application.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    /// All nine sub-boards.
    pub boards: [BoardSnapshot; 9],
    /// Meta-board cells; non-empty iff the matching sub-board was won.
    pub meta_cells: [Option<Mark>; 9],
    /// Collaborator-confirmed meta outcome.
    pub meta_outcome: Outcome,
    /// Mark to move next.
    pub current_mark: Mark,
    /// Active-board constraint for the next move.
    pub active_board: Option<GridIndex>,
    /// Terminal condition of the match.
    pub outcome: MatchOutcome,
}

/// Owns one match: a turn sequencer, nine sub-board sessions, and the
/// meta-board, all advanced through a shared remote collaborator.
///
/// Sub-boards never reference each other; every cross-board effect
/// flows through this type. `submit_move` and `reset` take `&mut self`,
/// so a second submission cannot interleave with an in-flight round
/// trip, and dropping an in-flight `submit_move` future discards the
/// result without partial mutation (mirrors are written only after the
/// collaborator confirms).
pub struct MatchOrchestrator {
    service: Arc<dyn BoardService>,
    sequencer: TurnSequencer,
    boards: [SubBoardSession; 9],
    meta: MetaBoard,
    outcome: MatchOutcome,
    starting_mark: Mark,
}

impl MatchOrchestrator {
    /// Starts a fresh match: nine remote sub-boards plus the meta game.
    #[instrument(skip(service))]
    pub async fn start(
        service: Arc<dyn BoardService>,
        starting_mark: Mark,
    ) -> Result<Self, MoveError> {
        info!(%starting_mark, "starting match");

        let mut boards = Vec::with_capacity(9);
        for index in GridIndex::ALL {
            boards.push(SubBoardSession::open(service.as_ref(), index, starting_mark).await?);
        }
        let boards: [SubBoardSession; 9] = match boards.try_into() {
            Ok(boards) => boards,
            Err(_) => unreachable!("opened exactly nine sub-boards"),
        };

        let meta = MetaBoard::open(service.as_ref(), starting_mark).await?;

        Ok(Self {
            service,
            sequencer: TurnSequencer::new(starting_mark),
            boards,
            meta,
            outcome: MatchOutcome::InProgress,
            starting_mark,
        })
    }

    /// Submits a player-intent move to sub-board `board`, cell `cell`.
    ///
    /// On success the turn advances, the active board is re-derived,
    /// any new sub-board decision is propagated into the meta-board,
    /// and the unified snapshot is returned. On any rejection the turn
    /// does not advance and no local state changes.
    ///
    /// A meta-board forward that fails after the move itself was
    /// confirmed does not reject the move; the decision is re-delivered
    /// on the next accepted move.
    #[instrument(skip(self), fields(board = board.get(), cell = cell.get()))]
    pub async fn submit_move(
        &mut self,
        board: GridIndex,
        cell: GridIndex,
    ) -> Result<MatchSnapshot, MoveRejected> {
        if self.outcome != MatchOutcome::InProgress {
            return Err(IllegalMoveReason::MatchAlreadyOver.into());
        }

        self.sequencer.check_move(board, cell, &self.boards)?;

        let mark = self.sequencer.current_mark();
        let receipt = self.boards[board.get()]
            .request_move(self.service.as_ref(), cell, mark)
            .await?;

        // The move is confirmed; from here on the turn has advanced.
        let next = self.sequencer.record_move(cell, &self.boards);
        self.sequencer.apply(next);
        debug!(%mark, active = ?next.active_board, "turn advanced");

        if let Some(decided) = receipt.newly_decided {
            info!(board = board.get(), outcome = ?decided, "propagating decision");
        }
        // The move stands even if the meta forward fails; the decision
        // is still undelivered and gets swept up on the next accepted move.
        if let Err(error) = self.reconcile_meta().await {
            warn!(%error, "meta forward failed");
        }
        self.outcome = self.compute_outcome();

        Ok(self.current_snapshot())
    }

    /// Replaces every sub-board, the meta-board, and the sequencer with
    /// fresh instances; no history survives.
    #[instrument(skip(self))]
    pub async fn reset(&mut self) -> Result<MatchSnapshot, MoveError> {
        info!("resetting match");
        *self = Self::start(Arc::clone(&self.service), self.starting_mark).await?;
        Ok(self.current_snapshot())
    }

    /// Read-only unified snapshot of the match.
    pub fn current_snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            boards: std::array::from_fn(|i| {
                let session = &self.boards[i];
                BoardSnapshot {
                    index: i,
                    cells: *session.cells(),
                    outcome: session.outcome(),
                }
            }),
            meta_cells: *self.meta.cells(),
            meta_outcome: self.meta.outcome(),
            current_mark: self.sequencer.current_mark(),
            active_board: self.sequencer.active_board(),
            outcome: self.outcome,
        }
    }

    /// Current terminal condition.
    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// Delivers every decided sub-board the meta-board has not recorded
    /// yet. Covers the normal single-decision case and re-delivers a
    /// decision whose meta round trip previously failed; the
    /// meta-board's per-index idempotency makes duplicates harmless.
    async fn reconcile_meta(&mut self) -> Result<(), MoveError> {
        for board in &self.boards {
            let outcome = board.outcome();
            if outcome.is_decided() && !self.meta.is_decided(board.index()) {
                self.meta
                    .record_decision(self.service.as_ref(), board.index(), outcome)
                    .await?;
            }
        }
        Ok(())
    }

    /// Derives the match outcome from the meta mirror and the session
    /// outcomes.
    fn compute_outcome(&self) -> MatchOutcome {
        match self.meta.outcome() {
            Outcome::Win(mark) => MatchOutcome::Won(mark),
            Outcome::Draw => MatchOutcome::Drawn,
            Outcome::Pending => {
                if self.boards.iter().all(|b| b.outcome().is_decided()) {
                    MatchOutcome::Drawn
                } else {
                    MatchOutcome::InProgress
                }
            }
        }
    }
}
