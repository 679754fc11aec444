use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::redirect::Policy;
use reqwest::{Client, header};
use url::Url;

use crate::error::ExtractError;
use crate::payload;

pub const DEFAULT_BASE_URL: &str = "https://watchanimeworld.in";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Index 1 is the second entry of the decoded list (Tamil on the current site).
pub const DEFAULT_LANGUAGE_OPTION: usize = 1;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone)]
pub struct EpisodeRequest {
    pub title: String,
    pub season: u32,
    pub episode: u32,
    pub language_option: usize,
}

impl EpisodeRequest {
    pub fn new(title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            title: title.into(),
            season,
            episode,
            language_option: DEFAULT_LANGUAGE_OPTION,
        }
    }

    pub fn with_language_option(mut self, language_option: usize) -> Self {
        self.language_option = language_option;
        self
    }

    fn check_present(&self) -> Result<(), ExtractError> {
        if self.title.trim().is_empty() {
            return Err(ExtractError::MissingInput("title"));
        }
        if self.season == 0 {
            return Err(ExtractError::MissingInput("season"));
        }
        if self.episode == 0 {
            return Err(ExtractError::MissingInput("episode"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
    pub url: String,
    /// `None` when the link came from the direct link scan.
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirects {
    /// Let the HTTP client follow up to ten hops.
    Automatic,
    /// Follow a single `Location` by hand; a second redirect fails the lookup.
    FollowOnce,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub redirects: Redirects,
    pub direct_link_fallback: bool,
}

impl Settings {
    pub fn server(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            redirects: Redirects::Automatic,
            direct_link_fallback: false,
        }
    }

    pub fn cli(base_url: Url, timeout: Duration) -> Self {
        Self {
            base_url,
            timeout: Some(timeout),
            redirects: Redirects::FollowOnce,
            direct_link_fallback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimeWorld {
    base_url: Url,
    client: Client,
    redirects: Redirects,
    direct_link_fallback: bool,
}

impl AnimeWorld {
    pub fn new(settings: Settings) -> Result<Self, ExtractError> {
        let policy = match settings.redirects {
            Redirects::Automatic => Policy::limited(10),
            Redirects::FollowOnce => Policy::none(),
        };
        let mut builder = Client::builder().user_agent(USER_AGENT).redirect(policy);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        let mut base_url = settings.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
            redirects: settings.redirects,
            direct_link_fallback: settings.direct_link_fallback,
        })
    }

    pub fn episode_url(&self, request: &EpisodeRequest) -> Result<Url, ExtractError> {
        request.check_present()?;
        let slug = episode_slug(&request.title, request.season, request.episode);
        Ok(self.base_url.join(&format!("episode/{}/", slug))?)
    }

    pub async fn fetch_page(&self, url: Url) -> Result<String, ExtractError> {
        let mut response = self.client.get(url.clone()).send().await?;

        if self.redirects == Redirects::FollowOnce && response.status().is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or(ExtractError::RedirectWithoutLocation)?;
            let target = url.join(location)?;
            tracing::info!(from = %url, to = %target, "following redirect");
            response = self.client.get(target).send().await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status(status));
        }
        Ok(response.text().await?)
    }

    /// Runs the whole lookup and reports why it failed.
    pub async fn find_video(&self, request: &EpisodeRequest) -> Result<VideoLink, ExtractError> {
        let url = self.episode_url(request)?;
        tracing::info!(
            title = %request.title,
            season = request.season,
            episode = request.episode,
            url = %url,
            "fetching episode"
        );

        let html = self.fetch_page(url).await?;

        if let Some(player_url) = payload::locate_player_url(&html) {
            let option = payload::option_from_player_url(player_url, request.language_option)?;
            tracing::info!(language = %option.language, "found language option");
            return Ok(VideoLink {
                url: option.link,
                language: Some(option.language),
            });
        }

        if self.direct_link_fallback
            && let Some(link) = payload::locate_direct_link(&html)
        {
            tracing::info!(link, "found direct video link");
            return Ok(VideoLink {
                url: link.to_string(),
                language: None,
            });
        }

        Err(ExtractError::PlayerNotFound)
    }

    /// Like [`AnimeWorld::find_video`], with every failure logged and
    /// collapsed into `None`.
    pub async fn video_link(&self, request: &EpisodeRequest) -> Option<VideoLink> {
        match self.find_video(request).await {
            Ok(link) => Some(link),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    title = %request.title,
                    season = request.season,
                    episode = request.episode,
                    option = request.language_option,
                    "video url not found"
                );
                None
            }
        }
    }

    pub async fn video_url(&self, request: &EpisodeRequest) -> Option<String> {
        self.video_link(request).await.map(|link| link.url)
    }
}

/// `"One Piece", 1, 5` becomes `one-piece-1x5`.
pub fn episode_slug(title: &str, season: u32, episode: u32) -> String {
    let title = WHITESPACE.replace_all(&title.to_lowercase(), "-").into_owned();
    format!("{}-{}x{}", title, season, episode)
}
