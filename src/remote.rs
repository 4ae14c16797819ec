//! Remote board-evaluation collaborator: trait seam and HTTP client.
//!
//! The collaborator owns all single-board rules. This crate never
//! computes a 3x3 win or draw itself; it mirrors whatever the
//! collaborator confirms.

use crate::board::{BoardState, GridIndex, Mark};
use async_trait::async_trait;
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument, warn};

/// Environment variable naming the collaborator's base URL.
pub const API_URL_VAR: &str = "ULTIMATE_TTT_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Errors from the remote round trip.
///
/// Local mirrors are never mutated on either variant; the caller may
/// retry the identical request.
#[derive(Debug, Display, Error, From)]
pub enum MoveError {
    /// Transport-level failure reaching the collaborator.
    #[display("network error: {_0}")]
    Network(reqwest::Error),
    /// The collaborator refused the request (occupied cell, decided
    /// board, or unknown/stale board identity).
    #[display("remote rejected request: {_0}")]
    RemoteRejected(#[error(not(source))] String),
}

/// The authoritative single-board collaborator.
///
/// Consumed identically for all nine sub-boards and the meta-board;
/// the meta-board treats `apply_move` as "record that sub-board *i*
/// was won by mark *m*".
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Creates a fresh board and returns its initial state.
    async fn create(&self, starting_mark: Mark) -> Result<BoardState, MoveError>;

    /// Applies a move and returns the authoritative post-move board.
    async fn apply_move(
        &self,
        board_id: &str,
        cell: GridIndex,
        mark: Mark,
    ) -> Result<BoardState, MoveError>;

    /// Fetches the current state of an existing board.
    async fn fetch(&self, board_id: &str) -> Result<BoardState, MoveError>;
}

/// HTTP client for the board-evaluation service.
#[derive(Debug, Clone)]
pub struct HttpBoardClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBoardClient {
    /// Creates a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from `ULTIMATE_TTT_API_URL`, falling back to
    /// `http://localhost:8000`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turns a non-2xx response into a rejection, preserving the
    /// server's `detail` message when one is present.
    async fn rejection(response: reqwest::Response) -> MoveError {
        let status = response.status();
        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));
        warn!(%status, detail = %detail, "collaborator rejected request");
        MoveError::RemoteRejected(detail)
    }
}

#[async_trait]
impl BoardService for HttpBoardClient {
    #[instrument(skip(self))]
    async fn create(&self, starting_mark: Mark) -> Result<BoardState, MoveError> {
        debug!("creating remote board");
        let response = self
            .client
            .post(format!("{}/tictactoe/new", self.base_url))
            .json(&serde_json::json!({ "starting_player": starting_mark }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let state: BoardState = response.json().await?;
        info!(board_id = %state.id, "remote board created");
        Ok(state)
    }

    #[instrument(skip(self), fields(cell = cell.get()))]
    async fn apply_move(
        &self,
        board_id: &str,
        cell: GridIndex,
        mark: Mark,
    ) -> Result<BoardState, MoveError> {
        debug!(board_id, %mark, "sending move");
        let response = self
            .client
            .post(format!("{}/tictactoe/{}/move", self.base_url, board_id))
            .json(&serde_json::json!({ "index": cell.get(), "player": mark }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let state: BoardState = response.json().await?;
        debug!(board_id, winner = ?state.winner, is_draw = state.is_draw, "move confirmed");
        Ok(state)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, board_id: &str) -> Result<BoardState, MoveError> {
        let response = self
            .client
            .get(format!("{}/tictactoe/{}", self.base_url, board_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpBoardClient::new("http://game.example/");
        assert_eq!(client.base_url(), "http://game.example");
    }
}
