//! Single binary web server: HTML shell from templates/, static from /static,
//! tournament engine via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use beach_tennis_web::{
    bracket_view, cancel_match, discard_group_stage, discard_knockout_bracket,
    generate_group_stage_matches, generate_groups, generate_knockout_bracket, group_standings,
    rank_group, record_match_result, record_tie_draw, schedule_match, start_match, GroupId,
    GroupStanding, RecordedScore, ScoringConfig, TeamId, Tournament, TournamentError,
    TournamentId,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. The write lock is what serializes
/// result recording and the one-shot generation operations per tournament.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    title: String,
    #[serde(default)]
    scoring: Option<ScoringConfig>,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    name: String,
    player1: String,
    player2: String,
    #[serde(default)]
    ranking_points: u32,
}

#[derive(Deserialize)]
struct TieDrawBody {
    /// Explicit drawn order (best first). Omitted = random draw over the
    /// currently tied teams.
    #[serde(default)]
    order: Option<Vec<TeamId>>,
}

#[derive(Deserialize)]
struct ScheduleBody {
    #[serde(default)]
    scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    court: Option<String>,
}

/// One team row the CSV importer accepts: name,player1,player2,ranking_points
#[derive(Deserialize)]
struct CsvTeamRow {
    name: String,
    player1: String,
    player2: String,
    #[serde(default)]
    ranking_points: u32,
}

#[derive(Serialize)]
struct StandingRow {
    position: usize,
    team_name: String,
    #[serde(flatten)]
    standing: GroupStanding,
}

/// Standings for one group as the "Grupos" display consumes them. When a tie
/// needs a manual draw the rows fall back to aggregate order and
/// `tied_team_ids` names the teams to draw.
#[derive(Serialize)]
struct GroupStandingsView {
    group_id: GroupId,
    group_name: String,
    ranked: bool,
    tied_team_ids: Option<Vec<TeamId>>,
    rows: Vec<StandingRow>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentGroupPath {
    id: TournamentId,
    group_id: Uuid,
}

#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Map an engine error to a response. Unbreakable standings ties get their
/// own status and payload so the UI can prompt for the draw instead of
/// showing a generic failure.
fn error_response(e: TournamentError) -> HttpResponse {
    match &e {
        TournamentError::TiedPositionRequiresDraw { group_id, team_ids } => {
            HttpResponse::Conflict().json(serde_json::json!({
                "error": e.to_string(),
                "group_id": group_id,
                "tied_team_ids": team_ids,
            }))
        }
        _ => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Run a mutation against one tournament under the write lock and respond
/// with the updated tournament. Keeps the handlers thin.
fn mutate(
    state: &AppState,
    id: TournamentId,
    f: impl FnOnce(&mut Tournament) -> Result<(), TournamentError>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match f(&mut entry.tournament) {
        Ok(()) => HttpResponse::Ok().json(&entry.tournament),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "beach-tennis-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let scoring = body.scoring.unwrap_or_default();
    let tournament = Tournament::new(body.title.trim(), scoring);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g[&id].tournament)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found(),
    }
}

/// Register a team (Registration only).
#[post("/api/tournaments/{id}/teams")]
async fn api_register_team(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterTeamBody>,
) -> HttpResponse {
    mutate(&state, path.id, |t| {
        t.register_team(&body.name, &body.player1, &body.player2, body.ranking_points)
            .map(|_| ())
    })
}

/// Remove a team by id (Registration only).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    mutate(&state, path.id, |t| t.remove_team(path.team_id))
}

/// Bulk roster import: CSV body with header name,player1,player2,ranking_points.
#[post("/api/tournaments/{id}/teams/import")]
async fn api_import_teams(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    let mut rows: Vec<CsvTeamRow> = Vec::new();
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({ "error": format!("CSV parse error: {}", e) }))
            }
        }
    }
    // All or nothing: a bad row must not leave a partial roster behind.
    mutate(&state, path.id, |t| {
        t.register_teams(rows.iter().map(|r| {
            (r.name.as_str(), r.player1.as_str(), r.player2.as_str(), r.ranking_points)
        }))
        .map(|_| ())
    })
}

/// Draw the groups from the confirmed teams (Registration only; one-shot).
#[post("/api/tournaments/{id}/groups")]
async fn api_generate_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, generate_groups)
}

/// Discard the draw and group-stage matches (only before any result).
#[delete("/api/tournaments/{id}/groups")]
async fn api_discard_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, discard_group_stage)
}

/// Live standings tables for the "Grupos" display.
#[get("/api/tournaments/{id}/groups/standings")]
async fn api_group_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get(&path.id) {
        Some(e) => &e.tournament,
        None => return not_found(),
    };

    let mut views = Vec::with_capacity(t.groups.len());
    for group in &t.groups {
        let (rows, ranked, tied) = match rank_group(t, group.id) {
            Ok(rows) => (rows, true, None),
            Err(TournamentError::TiedPositionRequiresDraw { team_ids, .. }) => {
                match group_standings(t, group.id) {
                    Ok(rows) => (rows, false, Some(team_ids)),
                    Err(e) => return error_response(e),
                }
            }
            Err(e) => return error_response(e),
        };
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, standing)| StandingRow {
                position: i + 1,
                team_name: t
                    .team(standing.team_id)
                    .map(|team| team.name.clone())
                    .unwrap_or_default(),
                standing,
            })
            .collect();
        views.push(GroupStandingsView {
            group_id: group.id,
            group_name: group.name.clone(),
            ranked,
            tied_team_ids: tied,
            rows,
        });
    }
    HttpResponse::Ok().json(views)
}

/// Resolve a standings tie by draw: explicit order in the body, or a random
/// draw over the currently tied teams when omitted.
#[post("/api/tournaments/{id}/groups/{group_id}/draw")]
async fn api_tie_draw(
    state: AppState,
    path: Path<TournamentGroupPath>,
    body: Json<TieDrawBody>,
) -> HttpResponse {
    let explicit = body.order.clone();
    mutate(&state, path.id, |t| {
        let order = match explicit {
            Some(order) => order,
            None => match rank_group(t, path.group_id) {
                Err(TournamentError::TiedPositionRequiresDraw { mut team_ids, .. }) => {
                    team_ids.shuffle(&mut rand::thread_rng());
                    team_ids
                }
                Err(e) => return Err(e),
                // Nothing to draw for.
                Ok(_) => return Err(TournamentError::InvalidDrawOrder),
            },
        };
        record_tie_draw(t, path.group_id, order)
    })
}

/// Generate the round-robin matches for every group (one-shot).
#[post("/api/tournaments/{id}/matches")]
async fn api_generate_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, generate_group_stage_matches)
}

/// All matches in match_number order (the "Resultados" display).
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(&entry.tournament.matches),
        None => not_found(),
    }
}

/// Record (or correct) a match result. Body is the score: either
/// {"games":{"team1":6,"team2":3}} or {"walkover":"team1"}.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordedScore>,
) -> HttpResponse {
    mutate(&state, path.id, |t| {
        record_match_result(t, path.match_id, *body)
    })
}

/// Mark a match as in progress.
#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    mutate(&state, path.id, |t| start_match(t, path.match_id))
}

/// Cancel a group-stage match (excluded from standings).
#[post("/api/tournaments/{id}/matches/{match_id}/cancel")]
async fn api_cancel_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    mutate(&state, path.id, |t| cancel_match(t, path.match_id))
}

/// Set court / time metadata on a match.
#[put("/api/tournaments/{id}/matches/{match_id}/schedule")]
async fn api_schedule_match(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ScheduleBody>,
) -> HttpResponse {
    let ScheduleBody {
        scheduled_time,
        court,
    } = body.into_inner();
    mutate(&state, path.id, |t| {
        schedule_match(t, path.match_id, scheduled_time, court)
    })
}

/// Build the knockout bracket from the finalized group standings (one-shot).
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, generate_knockout_bracket)
}

/// Discard the knockout bracket and return to the group stage.
#[delete("/api/tournaments/{id}/bracket")]
async fn api_discard_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, discard_knockout_bracket)
}

/// The knockout display: quarterfinals, semifinals, final, champion.
#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get(&path.id) {
        Some(e) => &e.tournament,
        None => return not_found(),
    };
    match bracket_view(t) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
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
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
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
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_register_team)
            .service(api_remove_team)
            .service(api_import_teams)
            .service(api_generate_groups)
            .service(api_discard_groups)
            .service(api_group_standings)
            .service(api_tie_draw)
            .service(api_generate_matches)
            .service(api_list_matches)
            .service(api_record_result)
            .service(api_start_match)
            .service(api_cancel_match)
            .service(api_schedule_match)
            .service(api_generate_bracket)
            .service(api_discard_bracket)
            .service(api_get_bracket)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
