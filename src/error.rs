use reqwest::StatusCode;

/// Why an episode lookup produced no link.
///
/// Callers of [`crate::animeworld::AnimeWorld::video_url`] only ever see
/// `None`; the variant is what ends up in the logs.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("missing required parameter: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("failed to fetch episode page: {0}")]
    Status(StatusCode),

    #[error("redirect without a location header")]
    RedirectWithoutLocation,

    #[error("player frame not found in episode page")]
    PlayerNotFound,

    #[error("player url has no data parameter")]
    MissingData,

    #[error("data parameter is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("data parameter is not a valid option list")]
    Json(#[from] serde_json::Error),

    #[error("language option {index} out of range ({available} available)")]
    OptionOutOfRange { index: usize, available: usize },

    #[error("language option {index} has no link")]
    EmptyLink { index: usize },
}
