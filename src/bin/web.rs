//! JSON web service hosting live alliance selections and their playoff brackets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, BRACKET_FINALS (best_of_three | single_final), AUTO_ADVANCE_BYES.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use frc_alliance_draft::{
    export_file_name, export_selection, generate_test_rankings, read_rankings_csv,
    write_alliances_csv, Advance, BracketConfig, FinalsFormat, MatchId, SelectionError,
    SelectionSession, SessionId, Side, Team, TeamNumber,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: selection data + last activity time (for auto-cleanup).
struct SessionEntry {
    session: SelectionSession,
    last_activity: Instant,
}

/// In-memory state: one live selection per session id. The write lock is the single writer
/// for every draft and bracket edit.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

/// Bracket settings applied to new sessions.
type Defaults = Data<BracketConfig>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    event: String,
    rankings: Vec<Team>,
    #[serde(default)]
    bracket: Option<BracketConfig>,
}

#[derive(Deserialize)]
struct EventQuery {
    event: String,
}

#[derive(Deserialize)]
struct PickBody {
    team_number: TeamNumber,
}

#[derive(Deserialize)]
struct SetWinnerBody {
    match_id: MatchId,
    side: Side,
}

#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

#[derive(Deserialize)]
struct SlotPath {
    id: SessionId,
    alliance: usize,
    pick: usize,
}

/// Session plus an optional message for the scout (e.g. "No more teams available").
#[derive(Serialize)]
struct SessionResponse<'a> {
    #[serde(flatten)]
    session: &'a SelectionSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

fn notice_for(advance: &Advance) -> Option<String> {
    match advance {
        Advance::Exhausted => Some(SelectionError::DraftExhausted.to_string()),
        Advance::Complete => Some("Alliance selection complete!".to_string()),
        Advance::CaptainPromoted(_) | Advance::OnTheClock(_) => None,
    }
}

fn error_response(e: &SelectionError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No selection session" }))
}

/// Run `f` against a session under the write lock and answer with the session (or the error).
fn with_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut SelectionSession) -> Result<Option<String>, SelectionError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let s = &mut entry.session;
    match f(s) {
        Ok(notice) => HttpResponse::Ok().json(SessionResponse { session: s, notice }),
        Err(e) => {
            log::debug!("session {} rejected request: {}", id, e);
            error_response(&e)
        }
    }
}

fn insert_session(state: &AppState, session: SelectionSession) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let id = session.id;
    log::info!(
        "created selection session {} for {} ({} teams)",
        id,
        session.event,
        session.rankings.len()
    );
    let entry = g.entry(id).or_insert(SessionEntry {
        session,
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(SessionResponse {
        session: &entry.session,
        notice: None,
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "frc-alliance-draft",
    })
}

/// Start a selection from JSON rankings.
#[post("/api/selections")]
async fn api_create_session(
    state: AppState,
    defaults: Defaults,
    body: Json<CreateSessionBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let config = body.bracket.unwrap_or(*defaults.get_ref());
    match SelectionSession::new(body.event, body.rankings, config) {
        Ok(session) => insert_session(&state, session),
        Err(e) => error_response(&e),
    }
}

/// Start a selection from a CSV upload (`rank,team_number,nickname`).
#[post("/api/selections/csv")]
async fn api_create_session_csv(
    state: AppState,
    defaults: Defaults,
    query: Query<EventQuery>,
    body: Bytes,
) -> HttpResponse {
    let created = read_rankings_csv(body.as_ref()).and_then(|rankings| {
        SelectionSession::new(query.event.clone(), rankings, *defaults.get_ref())
    });
    match created {
        Ok(session) => insert_session(&state, session),
        Err(e) => error_response(&e),
    }
}

/// Start a selection for a generated test event (keys ending in test1, test2 or test3).
#[post("/api/selections/test-event")]
async fn api_create_test_session(
    state: AppState,
    defaults: Defaults,
    query: Query<EventQuery>,
) -> HttpResponse {
    let rankings = generate_test_rankings(&query.event);
    match SelectionSession::new(query.event.clone(), rankings, *defaults.get_ref()) {
        Ok(session) => insert_session(&state, session),
        Err(e) => error_response(&e),
    }
}

/// Get a session by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/selections/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |_| Ok(None))
}

/// Pick for the alliance on the clock.
#[post("/api/selections/{id}/picks")]
async fn api_pick(state: AppState, path: Path<SessionPath>, body: Json<PickBody>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.pick(body.team_number).map(|a| notice_for(&a))
    })
}

/// Place a team into a specific slot (tap or drop on the slot).
#[put("/api/selections/{id}/alliances/{alliance}/picks/{pick}")]
async fn api_pick_into_slot(
    state: AppState,
    path: Path<SlotPath>,
    body: Json<PickBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.pick_into_slot(path.alliance, path.pick, body.team_number)
            .map(|a| notice_for(&a))
    })
}

/// Remove a pick; removing a first-round pick also dissolves every later alliance.
#[delete("/api/selections/{id}/alliances/{alliance}/picks/{pick}")]
async fn api_remove_pick(state: AppState, path: Path<SlotPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        let freed = s.remove_pick(path.alliance, path.pick)?;
        Ok((freed.len() > 1).then(|| {
            format!(
                "Removed pick and dissolved later alliances; {} team(s) returned to the pool",
                freed.len()
            )
        }))
    })
}

#[post("/api/selections/{id}/reset")]
async fn api_reset(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.reset()?;
        Ok(Some("Alliance selection has been reset.".to_string()))
    })
}

/// Seed the playoff bracket (draft must be complete).
#[post("/api/selections/{id}/bracket")]
async fn api_start_bracket(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| s.start_bracket().map(|_| None))
}

/// Record a match result; choosing the current winner again clears it.
#[put("/api/selections/{id}/bracket/winner")]
async fn api_set_winner(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SetWinnerBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.set_match_winner(body.match_id, body.side).map(|_| None)
    })
}

fn attachment(file_name: &str) -> (&'static str, String) {
    (
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", file_name),
    )
}

/// Download the draft (and playoffs, once started) as JSON.
#[get("/api/selections/{id}/export")]
async fn api_export(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    let s = &entry.session;
    let now = chrono::Utc::now();
    let prefix = if s.bracket.is_some() {
        "playoff-results"
    } else {
        "alliance-selection"
    };
    let doc = export_selection(&s.event, &s.draft, s.bracket.as_ref(), now);
    HttpResponse::Ok()
        .insert_header(attachment(&export_file_name(
            prefix,
            &s.event,
            now.date_naive(),
            "json",
        )))
        .json(doc)
}

/// Download alliance rosters as CSV.
#[get("/api/selections/{id}/export.csv")]
async fn api_export_csv(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    let s = &entry.session;
    let mut buf = Vec::new();
    if let Err(e) = write_alliances_csv(&s.draft, &mut buf) {
        return error_response(&e);
    }
    let file_name = export_file_name(
        "alliance-selection",
        &s.event,
        chrono::Utc::now().date_naive(),
        "csv",
    );
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment(&file_name))
        .body(buf)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Bracket defaults from BRACKET_FINALS / AUTO_ADVANCE_BYES, falling back to `BracketConfig::default()`.
fn bracket_config_from_env() -> BracketConfig {
    let mut config = BracketConfig::default();
    if let Ok(raw) = std::env::var("BRACKET_FINALS") {
        match raw.parse::<FinalsFormat>() {
            Ok(finals) => config.finals = finals,
            Err(e) => log::warn!("ignoring BRACKET_FINALS: {}", e),
        }
    }
    if let Ok(raw) = std::env::var("AUTO_ADVANCE_BYES") {
        match raw.trim().parse::<bool>() {
            Ok(v) => config.auto_advance_byes = v,
            Err(_) => log::warn!("ignoring AUTO_ADVANCE_BYES={:?}; expected true or false", raw),
        }
    }
    config
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    let bracket_defaults = bracket_config_from_env();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Bracket defaults: {:?}", bracket_defaults);

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));
    let defaults = Data::new(bracket_defaults);

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive selection session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(defaults.clone())
            .service(api_health)
            .service(api_create_session)
            .service(api_create_session_csv)
            .service(api_create_test_session)
            .service(api_get_session)
            .service(api_pick)
            .service(api_pick_into_slot)
            .service(api_remove_pick)
            .service(api_reset)
            .service(api_start_bracket)
            .service(api_set_winner)
            .service(api_export)
            .service(api_export_csv)
    })
    .bind(bind)?
    .run()
    .await
}
