// Thin reqwest client for the game authority's read/write endpoints.

use crate::domain::{
    AuthorityError, BulletSnapshot, EnemySnapshot, GameAuthority, GlobalConfig, PlayerSnapshot,
    SegmentId, UserId,
};
use crate::interface_adapters::protocol::{
    BulletDto, ConfigDto, CreateBulletRequest, EnemyDto, ErrorResponse, PlayerDto,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub enum AuthorityClientError {
    InvalidBaseUrl(url::ParseError),
    Build(reqwest::Error),
}

impl fmt::Display for AuthorityClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityClientError::InvalidBaseUrl(err) => {
                write!(f, "invalid authority base url: {err}")
            }
            AuthorityClientError::Build(err) => write!(f, "failed to build http client: {err}"),
        }
    }
}

impl std::error::Error for AuthorityClientError {}

#[derive(Clone)]
pub struct AuthorityClient {
    http: Client,
    base_url: Url,
}

impl AuthorityClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthorityClientError> {
        // Endpoints are joined relative to the base, which therefore must end with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(AuthorityClientError::InvalidBaseUrl)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuthorityClientError::Build)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, segment: Option<SegmentId>) -> Result<Url, AuthorityError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;
        if let Some(segment) = segment {
            url.query_pairs_mut()
                .append_pair("displayNumber", &segment.to_string());
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AuthorityError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;
        decode(response).await
    }
}

// Keep upstream status/message so callers can tell rejections from outages.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AuthorityError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|payload| payload.message);
        return Err(AuthorityError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| AuthorityError::Decode(err.to_string()))
}

#[async_trait]
impl GameAuthority for AuthorityClient {
    async fn fetch_players(
        &self,
        segment: SegmentId,
    ) -> Result<Vec<PlayerSnapshot>, AuthorityError> {
        let url = self.endpoint("player", Some(segment))?;
        let players: Vec<PlayerDto> = self.get_json(url).await?;
        Ok(players.into_iter().map(PlayerSnapshot::from).collect())
    }

    async fn fetch_enemies(&self) -> Result<Vec<EnemySnapshot>, AuthorityError> {
        let url = self.endpoint("enemy", None)?;
        let enemies: Vec<EnemyDto> = self.get_json(url).await?;
        Ok(enemies.into_iter().map(EnemySnapshot::from).collect())
    }

    async fn fetch_bullets(
        &self,
        segment: SegmentId,
    ) -> Result<Vec<BulletSnapshot>, AuthorityError> {
        let url = self.endpoint("bullet", Some(segment))?;
        let bullets: Vec<BulletDto> = self.get_json(url).await?;
        Ok(bullets.into_iter().map(BulletSnapshot::from).collect())
    }

    async fn fetch_config(&self) -> Result<GlobalConfig, AuthorityError> {
        let url = self.endpoint("config", None)?;
        let config: ConfigDto = self.get_json(url).await?;
        Ok(GlobalConfig::from(config))
    }

    async fn create_bullet(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BulletSnapshot>, AuthorityError> {
        let url = self.endpoint("bullet", None)?;
        let response = self
            .http
            .post(url)
            .json(&CreateBulletRequest {
                user_id: &user_id.0,
            })
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;

        // A `null` body means the authority declined to create a bullet.
        let bullet: Option<BulletDto> = decode(response).await?;
        Ok(bullet.map(BulletSnapshot::from))
    }
}
