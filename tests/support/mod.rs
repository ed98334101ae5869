// Stub game authority served over real HTTP for integration tests.
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

// World state the test rewrites while the view is polling.
#[derive(Default)]
pub struct StubWorld {
    // Players and bullets are keyed by segment; enemies are global.
    pub players: HashMap<u32, Vec<Value>>,
    pub enemies: Vec<Value>,
    pub bullets: HashMap<u32, Vec<Value>>,
    pub config: Value,
    pub fail_enemies: bool,
    pub accept_bullets: bool,
    // Every `displayNumber` the stub was asked for, in arrival order.
    pub requested_segments: Vec<u32>,
}

pub type SharedWorld = Arc<Mutex<StubWorld>>;

pub struct StubAuthority {
    pub base_url: String,
    pub world: SharedWorld,
}

impl StubAuthority {
    pub fn update(&self, f: impl FnOnce(&mut StubWorld)) {
        let mut guard = self.world.lock().expect("world mutex poisoned");
        f(&mut guard);
    }

    pub fn requested_segments(&self) -> Vec<u32> {
        let guard = self.world.lock().expect("world mutex poisoned");
        guard.requested_segments.clone()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayQuery {
    display_number: u32,
}

pub fn entity(id_field: &str, id: &str, x: f64, y: f64) -> Value {
    json!({ id_field: id, "pos": { "x": x, "y": y } })
}

async fn players(
    State(world): State<SharedWorld>,
    Query(query): Query<DisplayQuery>,
) -> Json<Value> {
    let mut guard = world.lock().expect("world mutex poisoned");
    guard.requested_segments.push(query.display_number);
    let players = guard
        .players
        .get(&query.display_number)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(players))
}

async fn enemies(
    State(world): State<SharedWorld>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let guard = world.lock().expect("world mutex poisoned");
    if guard.fail_enemies {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "simulation paused" })),
        ));
    }
    Ok(Json(Value::Array(guard.enemies.clone())))
}

async fn bullets(
    State(world): State<SharedWorld>,
    Query(query): Query<DisplayQuery>,
) -> Json<Value> {
    let mut guard = world.lock().expect("world mutex poisoned");
    guard.requested_segments.push(query.display_number);
    let bullets = guard
        .bullets
        .get(&query.display_number)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(bullets))
}

async fn create_bullet(State(world): State<SharedWorld>, Json(body): Json<Value>) -> Json<Value> {
    let mut guard = world.lock().expect("world mutex poisoned");
    if !guard.accept_bullets {
        return Json(Value::Null);
    }
    let user_id = body["userId"].as_str().unwrap_or_default().to_string();
    let bullets = guard.bullets.entry(0).or_default();
    let bullet = json!({
        "bulletId": format!("{user_id}-{}", bullets.len()),
        "pos": { "x": 0.0, "y": 0.0 },
        "ownerId": user_id,
    });
    bullets.push(bullet.clone());
    Json(bullet)
}

async fn config(State(world): State<SharedWorld>) -> Json<Value> {
    let guard = world.lock().expect("world mutex poisoned");
    Json(guard.config.clone())
}

// Serve a fresh stub on an ephemeral port so tests never share world state.
pub async fn spawn_authority(total_segments: u32) -> StubAuthority {
    let world: SharedWorld = Arc::new(Mutex::new(StubWorld {
        config: json!(total_segments),
        ..StubWorld::default()
    }));
    let app = Router::new()
        .route("/api/player", get(players))
        .route("/api/enemy", get(enemies))
        .route("/api/bullet", get(bullets).post(create_bullet))
        .route("/api/config", get(config))
        .with_state(world.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("stub authority failed");
    });

    StubAuthority {
        base_url: format!("http://{addr}/api"),
        world,
    }
}
