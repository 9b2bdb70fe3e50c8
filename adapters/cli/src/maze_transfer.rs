use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_duel_core::{MazeLayout, BOARD_SIZE};
use thiserror::Error;

/// Identifier prefix emitted before the encoded maze payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";

/// Encodes a maze layout into a single-line string suitable for sharing.
pub(crate) fn encode(layout: &MazeLayout) -> Result<String, MazeStringError> {
    let json = serde_json::to_vec(layout)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SNAPSHOT_HEADER}:{}:{encoded}", board_label()))
}

/// Decodes a maze layout from its string representation.
///
/// Only the structure is checked here. Endpoint and connectivity rules are
/// enforced when the layout is turned into a maze.
pub(crate) fn decode(value: &str) -> Result<MazeLayout, MazeStringError> {
    let fields: Vec<&str> = value.trim().split(':').collect();
    let [domain, version, board, payload] = fields.as_slice() else {
        return Err(MazeStringError::Malformed);
    };

    let header = format!("{domain}:{version}");
    if header != SNAPSHOT_HEADER {
        return Err(MazeStringError::UnsupportedHeader(header));
    }
    if *board != board_label() {
        return Err(MazeStringError::UnsupportedBoard((*board).to_owned()));
    }

    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn board_label() -> String {
    format!("{BOARD_SIZE}x{BOARD_SIZE}")
}

/// Reasons a maze string cannot be read back.
#[derive(Debug, Error)]
pub(crate) enum MazeStringError {
    /// The string does not have the four `:`-separated fields.
    #[error("expected a string shaped like maze:v1:8x8:<payload>")]
    Malformed,
    /// Prefix or version other than the one this build writes.
    #[error("maze strings starting with '{0}' are not supported")]
    UnsupportedHeader(String),
    /// A board other than 8x8.
    #[error("only 8x8 boards are supported (received {0})")]
    UnsupportedBoard(String),
    /// The payload is not valid base64.
    #[error("could not decode maze payload: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// The payload is not a maze layout.
    #[error("could not parse maze payload: {0}")]
    Payload(#[from] serde_json::Error),
}
