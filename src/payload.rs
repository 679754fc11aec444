use std::sync::LazyLock;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ExtractError;

/// The first player tab on an episode page embeds the player API URL,
/// whose `data` parameter carries every language variant.
static PLAYER_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div id="options-1"[^>]*>.*?<iframe[^>]*data-src="([^"]+)"[^>]*>.*?</div>"#)
        .unwrap()
});

static SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://short\.icu/[A-Za-z0-9_-]+").unwrap());

static VIDEO_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>]*\.(?:mp4|webm|m3u8)"#).unwrap()
});

// Standard alphabet, decoded as leniently as a browser's atob: padding is
// optional and stray bits in the last symbol are ignored.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageLink {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub link: String,
}

/// Returns the player API URL embedded in an episode page.
pub fn locate_player_url(html: &str) -> Option<&str> {
    PLAYER_FRAME
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
}

/// Looser scan used when the player frame is missing: a short.icu link
/// wins over any direct video file URL.
pub fn locate_direct_link(html: &str) -> Option<&str> {
    SHORT_LINK
        .find(html)
        .or_else(|| VIDEO_FILE.find(html))
        .map(|value| value.as_str())
}

pub fn decode_options(data: &str) -> Result<Vec<LanguageLink>, ExtractError> {
    // form decoding of the query string turns '+' into ' '
    let data = data.trim().replace(' ', "+");
    let bytes = PAYLOAD_ENGINE.decode(data)?;
    let options: Vec<LanguageLink> = serde_json::from_slice(&bytes)?;
    Ok(options)
}

pub fn options_from_player_url(player_url: &str) -> Result<Vec<LanguageLink>, ExtractError> {
    let url = Url::parse(player_url)?;
    let data = url
        .query_pairs()
        .find(|(key, _)| key == "data")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(ExtractError::MissingData)?;
    decode_options(&data)
}

pub fn select_option(
    mut options: Vec<LanguageLink>,
    index: usize,
) -> Result<LanguageLink, ExtractError> {
    let available = options.len();
    if index >= available {
        return Err(ExtractError::OptionOutOfRange { index, available });
    }
    let option = options.swap_remove(index);
    if option.link.trim().is_empty() {
        return Err(ExtractError::EmptyLink { index });
    }
    Ok(option)
}

pub fn option_from_player_url(
    player_url: &str,
    index: usize,
) -> Result<LanguageLink, ExtractError> {
    let options = options_from_player_url(player_url)?;
    select_option(options, index)
}
