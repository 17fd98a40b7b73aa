//! Single-line share codes carrying a whole session.
//!
//! A code looks like `cats:v1:5x5:<payload>` where the payload is the
//! session blob in unpadded base64.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use run_from_cats_core::GameError;
use run_from_cats_world::GameSession;

const SHARE_DOMAIN: &str = "cats";
const SHARE_VERSION: &str = "v1";

/// Prefix emitted before the field dimensions and payload.
pub(crate) const SHARE_HEADER: &str = "cats:v1";
/// Separates the prefix, field dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the session into a code that can be pasted elsewhere.
pub(crate) fn encode(session: &GameSession) -> Result<String, ShareCodeError> {
    let blob = session.serialize().map_err(ShareCodeError::InvalidSession)?;
    let grid = session.grid();
    Ok(format!(
        "{SHARE_HEADER}:{}x{}:{}",
        grid.width(),
        grid.height(),
        STANDARD_NO_PAD.encode(blob)
    ))
}

/// Decodes a session from a share code.
pub(crate) fn decode(value: &str) -> Result<GameSession, ShareCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShareCodeError::EmptyCode);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(ShareCodeError::MissingPrefix)?;
    let version = parts.next().ok_or(ShareCodeError::MissingVersion)?;
    let dimensions = parts.next().ok_or(ShareCodeError::MissingDimensions)?;
    let payload = parts.next().ok_or(ShareCodeError::MissingPayload)?;
    if parts.next().is_some() {
        return Err(ShareCodeError::TrailingSegments);
    }

    if domain != SHARE_DOMAIN {
        return Err(ShareCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(ShareCodeError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let blob = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(ShareCodeError::InvalidEncoding)?;
    let session = GameSession::deserialize(&blob).map_err(ShareCodeError::InvalidSession)?;

    let grid = session.grid();
    if (grid.width(), grid.height()) != (width, height) {
        return Err(ShareCodeError::InvalidDimensions(dimensions.to_owned()));
    }
    Ok(session)
}

/// Errors that can occur while reading share codes.
#[derive(Debug)]
pub(crate) enum ShareCodeError {
    /// The code was empty or only whitespace.
    EmptyCode,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The field dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// Further segments followed the payload.
    TrailingSegments,
    /// The code used an unexpected prefix.
    InvalidPrefix(String),
    /// The code used an unsupported version.
    UnsupportedVersion(String),
    /// The dimensions were malformed or disagree with the payload.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload is not a valid session.
    InvalidSession(GameError),
}

impl fmt::Display for ShareCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "share code was empty"),
            Self::MissingPrefix => write!(f, "share code is missing the prefix"),
            Self::MissingVersion => write!(f, "share code is missing the version"),
            Self::MissingDimensions => write!(f, "share code is missing the field dimensions"),
            Self::MissingPayload => write!(f, "share code is missing the payload"),
            Self::TrailingSegments => write!(f, "share code has segments after the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "share code prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share code version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "share code dimensions '{dimensions}' do not match its session")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode share code payload: {error}"),
            Self::InvalidSession(error) => write!(f, "share code does not hold a session: {error}"),
        }
    }
}

impl Error for ShareCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidSession(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), ShareCodeError> {
    let invalid = || ShareCodeError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}
