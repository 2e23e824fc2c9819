//! `SessionClient` over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use guesser_core::answer::{AnswerRequest, AnswerResponse};
use guesser_core::catalog::Playlist;
use guesser_core::client::SessionClient;
use guesser_core::error::ClientError;
use guesser_core::session::{
    GameSettings, GameStateResponse, RemoteSummary, SessionCreated, SessionId,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::dto::{
    AnswerBody, AnswerResponseDto, CreateGameBody, ErrorBody, GameResponseDto, GameSessionDto,
    PlaylistDto, SummaryDto,
};

/// Per-request timeout unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the game service rooted at `base_url` (e.g.
/// `http://localhost:8000/api`).
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    http: Client,
    base_url: String,
}

impl HttpSessionClient {
    /// Creates a client with [`DEFAULT_REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP stack cannot be
    /// initialised.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP stack cannot be
    /// initialised.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// Root every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Genres with enough songs to build a game from.
    ///
    /// # Errors
    ///
    /// Returns the mapped `ClientError` if the request fails.
    #[instrument(skip(self))]
    pub async fn genres(&self) -> Result<Vec<String>, ClientError> {
        self.send(self.http.get(self.url("songs/genres"))).await
    }

    /// Predefined playlists a game can be restricted to.
    ///
    /// # Errors
    ///
    /// Returns the mapped `ClientError` if the request fails.
    #[instrument(skip(self))]
    pub async fn playlists(&self) -> Result<Vec<Playlist>, ClientError> {
        let playlists: Vec<PlaylistDto> = self.send(self.http.get(self.url("playlists"))).await?;
        Ok(playlists.into_iter().map(Playlist::from).collect())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        debug!(url = %response.url(), %status, "game service responded");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(error_message(response).await));
        }
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(%status, %message, "game service rejected request");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Extracts the service's `detail` message, falling back to the raw body and
/// then to the status reason.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if let Ok(error) = serde_json::from_str::<ErrorBody>(&body) {
        return error.into_message();
    }
    if body.trim().is_empty() {
        status.canonical_reason().unwrap_or_default().to_owned()
    } else {
        body
    }
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    #[instrument(skip(self, settings), fields(song_count = settings.song_count))]
    async fn create_session(&self, settings: &GameSettings) -> Result<SessionCreated, ClientError> {
        let request = self
            .http
            .post(self.url("game/create"))
            .json(&CreateGameBody::from(settings));
        let session: GameSessionDto = self.send(request).await?;
        Ok(session.into())
    }

    #[instrument(skip(self), fields(%session_id))]
    async fn start_session(&self, session_id: SessionId) -> Result<GameStateResponse, ClientError> {
        let request = self.http.post(self.url(&format!("game/start/{session_id}")));
        let state: GameResponseDto = self.send(request).await?;
        Ok(state.into())
    }

    #[instrument(skip(self), fields(%session_id))]
    async fn get_state(&self, session_id: SessionId) -> Result<GameStateResponse, ClientError> {
        let request = self.http.get(self.url(&format!("game/state/{session_id}")));
        let state: GameResponseDto = self.send(request).await?;
        Ok(state.into())
    }

    #[instrument(
        skip(self, request),
        fields(session_id = %request.session_id, question_index = request.question_index)
    )]
    async fn submit_answer(&self, request: &AnswerRequest) -> Result<AnswerResponse, ClientError> {
        let http_request = self
            .http
            .post(self.url("game/answer"))
            .json(&AnswerBody::from(request));
        let response: AnswerResponseDto = self.send(http_request).await?;
        Ok(response.into())
    }

    #[instrument(skip(self), fields(%session_id))]
    async fn get_summary(&self, session_id: SessionId) -> Result<RemoteSummary, ClientError> {
        let request = self.http.get(self.url(&format!("game/summary/{session_id}")));
        let summary: SummaryDto = self.send(request).await?;
        Ok(summary.into())
    }
}
