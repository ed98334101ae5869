// Wire DTOs for the game authority's HTTP API and their conversions into domain snapshots.

use crate::domain::{
    BulletId, BulletSnapshot, EnemyId, EnemySnapshot, GlobalConfig, PlayerSnapshot, Position,
    UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
}

/// Player as served by `GET player`. Unknown fields are kept for the presentation layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub user_id: String,
    pub pos: PositionDto,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDto {
    pub enemy_id: String,
    pub pos: PositionDto,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletDto {
    pub bullet_id: String,
    pub pos: PositionDto,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST bullet`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBulletRequest<'a> {
    pub user_id: &'a str,
}

/// `GET config` answers with a bare count (possibly `null`) or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConfigDto {
    Count(Option<u32>),
    #[serde(rename_all = "camelCase")]
    Object { total_segments: Option<u32> },
}

/// Error body the authority sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl From<PositionDto> for Position {
    fn from(pos: PositionDto) -> Self {
        Position::new(pos.x, pos.y)
    }
}

impl From<PlayerDto> for PlayerSnapshot {
    fn from(dto: PlayerDto) -> Self {
        Self {
            user_id: UserId(dto.user_id),
            position: dto.pos.into(),
            attributes: dto.extra,
        }
    }
}

impl From<EnemyDto> for EnemySnapshot {
    fn from(dto: EnemyDto) -> Self {
        Self {
            enemy_id: EnemyId(dto.enemy_id),
            position: dto.pos.into(),
            attributes: dto.extra,
        }
    }
}

impl From<BulletDto> for BulletSnapshot {
    fn from(dto: BulletDto) -> Self {
        Self {
            bullet_id: BulletId(dto.bullet_id),
            position: dto.pos.into(),
            attributes: dto.extra,
        }
    }
}

impl From<ConfigDto> for GlobalConfig {
    fn from(dto: ConfigDto) -> Self {
        let total_segments = match dto {
            ConfigDto::Count(count) => count,
            ConfigDto::Object { total_segments } => total_segments,
        };
        total_segments
            .map(|total_segments| GlobalConfig { total_segments })
            .unwrap_or_default()
    }
}
