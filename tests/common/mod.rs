#![allow(dead_code)]
//! Shared in-memory fake of the remote board-evaluation collaborator.
//!
//! Implements the same contract as the real service: create, apply a
//! move with occupancy/terminality validation, line-scan win detection.
//! Tests can rig the next confirmed move to decide a board instantly or
//! to fail, which keeps multi-board scenarios short and deterministic.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};
use ultimate_tictactoe::{BoardService, BoardState, GridIndex, Mark, MoveError};

/// How the fake resolves an `apply_move`. Rigs queue in FIFO order and
/// each call consumes one; with the queue empty the fake plays normally.
/// Because the orchestrator forwards a sub-board move before any meta
/// move, a single rig queued just before `submit_move` affects only the
/// sub-board, and a second one lands on the meta forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rig {
    /// Normal play with real win/draw detection.
    Play,
    /// The move instantly wins the board for the mover.
    WinForMover,
    /// The move instantly draws the board.
    Draw,
    /// The move is rejected; the board is untouched.
    Reject,
}

#[derive(Debug, Clone)]
struct FakeBoard {
    cells: [Option<Mark>; 9],
    winner: Option<Mark>,
    is_draw: bool,
}

impl FakeBoard {
    fn decided(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }

    fn state(&self, id: &str) -> BoardState {
        BoardState {
            id: id.to_string(),
            cells: self.cells,
            winner: self.winner,
            is_draw: self.is_draw,
            status: String::new(),
        }
    }
}

/// In-memory collaborator double.
pub struct FakeBoardService {
    boards: Mutex<HashMap<String, FakeBoard>>,
    next_id: Mutex<usize>,
    rig: Mutex<VecDeque<Rig>>,
}

impl FakeBoardService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            boards: Mutex::new(HashMap::new()),
            next_id: Mutex::new(0),
            rig: Mutex::new(VecDeque::new()),
        })
    }

    /// Queues a rig for an upcoming `apply_move`.
    pub fn rig_next(&self, rig: Rig) {
        self.rig.lock().unwrap().push_back(rig);
    }

    /// Mutates a board behind the engine's back, as a remote authority
    /// would; visible to mirrors only through a fetch.
    pub fn force_winner(&self, board_id: &str, mark: Mark) {
        let mut boards = self.boards.lock().unwrap();
        let board = boards.get_mut(board_id).expect("unknown board id");
        board.winner = Some(mark);
    }

    fn take_rig(&self) -> Rig {
        self.rig.lock().unwrap().pop_front().unwrap_or(Rig::Play)
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

fn line_winner(cells: &[Option<Mark>; 9]) -> Option<Mark> {
    for [a, b, c] in LINES {
        if cells[a].is_some() && cells[a] == cells[b] && cells[b] == cells[c] {
            return cells[a];
        }
    }
    None
}

#[async_trait]
impl BoardService for FakeBoardService {
    async fn create(&self, _starting_mark: Mark) -> Result<BoardState, MoveError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            format!("board-{}", *next_id)
        };
        let board = FakeBoard {
            cells: [None; 9],
            winner: None,
            is_draw: false,
        };
        let state = board.state(&id);
        self.boards.lock().unwrap().insert(id, board);
        Ok(state)
    }

    async fn apply_move(
        &self,
        board_id: &str,
        cell: GridIndex,
        mark: Mark,
    ) -> Result<BoardState, MoveError> {
        let rig = self.take_rig();
        if rig == Rig::Reject {
            return Err(MoveError::RemoteRejected("injected rejection".to_string()));
        }

        let mut boards = self.boards.lock().unwrap();
        let board = boards
            .get_mut(board_id)
            .ok_or_else(|| MoveError::RemoteRejected("unknown board".to_string()))?;

        if board.decided() {
            return Err(MoveError::RemoteRejected("board is decided".to_string()));
        }
        if board.cells[cell.get()].is_some() {
            return Err(MoveError::RemoteRejected("cell is occupied".to_string()));
        }

        board.cells[cell.get()] = Some(mark);
        match rig {
            Rig::Play => {
                board.winner = line_winner(&board.cells);
                board.is_draw =
                    board.winner.is_none() && board.cells.iter().all(|c| c.is_some());
            }
            Rig::WinForMover => board.winner = Some(mark),
            Rig::Draw => board.is_draw = true,
            Rig::Reject => unreachable!(),
        }

        Ok(board.state(board_id))
    }

    async fn fetch(&self, board_id: &str) -> Result<BoardState, MoveError> {
        let boards = self.boards.lock().unwrap();
        boards
            .get(board_id)
            .map(|board| board.state(board_id))
            .ok_or_else(|| MoveError::RemoteRejected("unknown board".to_string()))
    }
}

/// Shorthand for a checked grid index in test bodies.
pub fn gi(index: usize) -> GridIndex {
    GridIndex::new(index).expect("index in 0..=8")
}

/// Installs a tracing subscriber once per test binary, honoring
/// `RUST_LOG` for diagnosing failures.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
