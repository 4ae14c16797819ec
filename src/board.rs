//! Core domain types shared across the match engine.

use serde::{Deserialize, Serialize};

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Player X (goes first by convention).
    X,
    /// Player O.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Terminal state of a board or of the whole match.
///
/// Transitions `Pending` to either terminal variant exactly once;
/// terminal states never change afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Board is still being played.
    Pending,
    /// Board was won by the given mark.
    Win(Mark),
    /// Board filled with no winner.
    Draw,
}

impl Outcome {
    /// Whether this outcome is terminal (win or draw).
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    /// Whether this outcome is still pending.
    pub fn is_pending(self) -> bool {
        matches!(self, Outcome::Pending)
    }

    /// The winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Win(mark) => Some(mark),
            _ => None,
        }
    }
}

/// Row-major index into a 3x3 grid (0..=8).
///
/// The same index space addresses a cell within a sub-board and a
/// sub-board within the meta grid; the send-to rule is a direct copy
/// from one to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridIndex(usize);

impl GridIndex {
    /// All nine indices in row-major order.
    pub const ALL: [GridIndex; 9] = [
        GridIndex(0),
        GridIndex(1),
        GridIndex(2),
        GridIndex(3),
        GridIndex(4),
        GridIndex(5),
        GridIndex(6),
        GridIndex(7),
        GridIndex(8),
    ];

    /// Creates an index, rejecting anything outside 0..=8.
    pub fn new(index: usize) -> Option<Self> {
        (index < 9).then_some(Self(index))
    }

    /// Returns the raw index.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for GridIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a board instance held by the remote collaborator.
pub type BoardId = String;

/// Authoritative single-board state returned by the remote collaborator.
///
/// Field names follow the wire format: the cell array is named `board`,
/// cells are `"X"`, `"O"`, or `null` in row-major order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardState {
    /// Remote identity of this board.
    pub id: BoardId,
    /// The nine cells, row-major.
    #[serde(rename = "board")]
    pub cells: [Option<Mark>; 9],
    /// Winner, if the board is won.
    pub winner: Option<Mark>,
    /// Whether the board ended in a draw.
    pub is_draw: bool,
    /// Human-readable status line from the collaborator.
    #[serde(default)]
    pub status: String,
}

impl BoardState {
    /// Derives the outcome from the authoritative winner/draw fields.
    pub fn outcome(&self) -> Outcome {
        match self.winner {
            Some(mark) => Outcome::Win(mark),
            None if self.is_draw => Outcome::Draw,
            None => Outcome::Pending,
        }
    }
}
