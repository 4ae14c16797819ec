//! Turn sequencing and the send-to legality rule.

use crate::board::{GridIndex, Mark};
use crate::session::SubBoardSession;
use derive_more::{Display, Error};
use tracing::debug;

/// Locally detected reasons a move is illegal.
///
/// These never reach the remote collaborator; they are cheap checks
/// returned synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum IllegalMoveReason {
    /// A different sub-board is active and still undecided.
    #[display("a different sub-board is active")]
    WrongBoard,
    /// The target cell already holds a mark.
    #[display("cell is already occupied")]
    CellOccupied,
    /// The target sub-board has already been won or drawn.
    #[display("sub-board is already decided")]
    BoardAlreadyDecided,
    /// The match reached a terminal outcome; no further moves.
    #[display("match is already over")]
    MatchAlreadyOver,
}

/// The turn state that follows an accepted move, computed by
/// [`TurnSequencer::record_move`] and applied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextTurn {
    /// Mark to move next.
    pub mark: Mark,
    /// The sub-board the next move is constrained to, or `None` when
    /// any undecided sub-board is legal.
    pub active_board: Option<GridIndex>,
}

/// Single source of truth for whose turn it is and which sub-board is
/// active.
///
/// Holds no board cells of its own: legality is checked against the
/// caller-supplied session snapshot, and the active board is a pure
/// function of the last accepted move.
#[derive(Debug, Clone, Copy)]
pub struct TurnSequencer {
    current_mark: Mark,
    active_board: Option<GridIndex>,
}

impl TurnSequencer {
    /// Creates a sequencer with no active-board constraint.
    pub fn new(starting_mark: Mark) -> Self {
        Self {
            current_mark: starting_mark,
            active_board: None,
        }
    }

    /// Mark to move next.
    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    /// Current active-board constraint.
    pub fn active_board(&self) -> Option<GridIndex> {
        self.active_board
    }

    /// Checks whether a move is legal given the session snapshot.
    ///
    /// Mutates nothing: checking legality never alternates the turn or
    /// touches the active board.
    ///
    /// # Errors
    ///
    /// `WrongBoard` when an undecided active board mandates a different
    /// target; `CellOccupied` when the target cell holds a mark.
    pub fn check_move(
        &self,
        board: GridIndex,
        cell: GridIndex,
        sessions: &[SubBoardSession; 9],
    ) -> Result<(), IllegalMoveReason> {
        if let Some(active) = self.active_board {
            // A decided active board releases the constraint for this turn.
            if active != board && sessions[active.get()].outcome().is_pending() {
                debug!(target = board.get(), active = active.get(), "wrong board");
                return Err(IllegalMoveReason::WrongBoard);
            }
        }

        if sessions[board.get()].cell(cell).is_some() {
            return Err(IllegalMoveReason::CellOccupied);
        }

        Ok(())
    }

    /// Computes the turn state after an accepted move into `cell`.
    ///
    /// Pure: the send-to rule makes sub-board `cell` active, collapsing
    /// to unconstrained when that target is already decided. The caller
    /// applies the result with [`TurnSequencer::apply`].
    pub fn record_move(&self, cell: GridIndex, sessions: &[SubBoardSession; 9]) -> NextTurn {
        let target_decided = sessions[cell.get()].outcome().is_decided();
        NextTurn {
            mark: self.current_mark.opponent(),
            active_board: if target_decided { None } else { Some(cell) },
        }
    }

    /// Applies a computed next turn.
    pub fn apply(&mut self, next: NextTurn) {
        self.current_mark = next.mark;
        self.active_board = next.active_board;
    }
}
