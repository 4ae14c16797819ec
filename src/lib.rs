//! Ultimate tic-tac-toe match orchestration.
//!
//! Nine independent 3x3 sub-boards plus one meta-board, advanced
//! through a single remote board-evaluation service. The remote
//! collaborator owns all single-board rules (move validation, win and
//! draw detection); this crate composes ten such board instances into
//! one turn-taking protocol:
//!
//! - **[`TurnSequencer`]**: whose turn it is and which sub-board the
//!   send-to rule makes active.
//! - **[`SubBoardSession`]** (x9): local mirror of one remote board,
//!   updated only from confirmed responses.
//! - **[`MetaBoard`]**: a tenth remote board whose cells are sub-board
//!   outcomes.
//! - **[`MatchOrchestrator`]**: the only entry point the outer
//!   application talks to.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ultimate_tictactoe::{GridIndex, HttpBoardClient, Mark, MatchOrchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = Arc::new(HttpBoardClient::from_env());
//! let mut game = MatchOrchestrator::start(service, Mark::X).await?;
//!
//! let board = GridIndex::new(4).unwrap();
//! let cell = GridIndex::new(1).unwrap();
//! let snapshot = game.submit_move(board, cell).await?;
//! println!("next active board: {:?}", snapshot.active_board);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod meta;
mod orchestrator;
mod remote;
mod sequencer;
mod session;

pub use board::{BoardId, BoardState, GridIndex, Mark, Outcome};
pub use meta::MetaBoard;
pub use orchestrator::{BoardSnapshot, MatchOrchestrator, MatchOutcome, MatchSnapshot};
pub use remote::{API_URL_VAR, BoardService, HttpBoardClient, MoveError};
pub use sequencer::{IllegalMoveReason, NextTurn, TurnSequencer};
pub use session::{MoveReceipt, MoveRejected, SubBoardSession};
