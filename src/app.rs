use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::board::{Board, BumpOutcome};
use crate::config::Config;
use crate::error::BoardError;
use crate::record::CounterField;
use crate::store::{self, CsvWorksheet};

pub struct AppState {
    board: Mutex<Board>,
    snapshot_path: PathBuf,
}

#[derive(Deserialize)]
struct AdjustRequest {
    index: usize,
    field: String,
    delta: i64,
}

#[derive(Deserialize)]
struct SelectRequest {
    index: usize,
    field: String,
}

#[derive(Deserialize)]
struct BumpRequest {
    delta: i64,
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = CsvWorksheet::new(&config.sheet_path);
    let mut board = Board::new(Box::new(sheet));

    // First load cycle. An unreachable worksheet at startup is fatal —
    // there is nothing to render without it.
    board.reload()?;
    info!(
        "loaded {} records from {}",
        board.table().len(),
        config.sheet_path.display()
    );

    let app_state = Arc::new(AppState {
        board: Mutex::new(board),
        snapshot_path: config.snapshot_path.clone(),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/board", get(get_board))
        .route("/api/adjust", post(adjust_field))
        .route("/api/select", post(select_field))
        .route("/api/bump", post(bump_selected))
        .route("/api/export", get(export_csv))
        .route("/api/snapshot", post(save_snapshot))
        .route("/api/restore", post(restore_snapshot))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

async fn get_board(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut board = state.board.lock().unwrap();

    // Every render cycle starts from fresh sheet contents.
    match board.reload() {
        Ok(()) => Json(board_json(&board)).into_response(),
        Err(e) => failure(&e, &board),
    }
}

async fn adjust_field(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdjustRequest>,
) -> impl IntoResponse {
    let field = match CounterField::from_name(&payload.field) {
        Some(field) => field,
        None => {
            let e = BoardError::NotAdjustable(payload.field);
            let board = state.board.lock().unwrap();
            return failure(&e, &board);
        }
    };

    let mut board = state.board.lock().unwrap();
    match board.adjust(payload.index, field, payload.delta) {
        Ok(value) => Json(serde_json::json!({
            "status": "ok",
            "value": value,
            "board": board_json(&board),
        }))
        .into_response(),
        Err(e) => failure(&e, &board),
    }
}

async fn select_field(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectRequest>,
) -> impl IntoResponse {
    let field = match CounterField::from_name(&payload.field) {
        Some(field) => field,
        None => {
            let e = BoardError::NotAdjustable(payload.field);
            let board = state.board.lock().unwrap();
            return failure(&e, &board);
        }
    };

    let mut board = state.board.lock().unwrap();
    match board.select(payload.index, field) {
        Ok(true) => Json(serde_json::json!({
            "status": "ok",
            "board": board_json(&board),
        }))
        .into_response(),
        Ok(false) => Json(serde_json::json!({
            "status": "ok",
            "message": "threshold is read-only; selection cleared",
            "board": board_json(&board),
        }))
        .into_response(),
        Err(e) => failure(&e, &board),
    }
}

async fn bump_selected(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BumpRequest>,
) -> impl IntoResponse {
    let mut board = state.board.lock().unwrap();

    match board.bump_selected(payload.delta) {
        Ok(BumpOutcome::Applied { value }) => Json(serde_json::json!({
            "status": "ok",
            "value": value,
            "board": board_json(&board),
        }))
        .into_response(),
        Ok(BumpOutcome::NothingSelected) => Json(serde_json::json!({
            "status": "noop",
            "message": "nothing selected",
            "board": board_json(&board),
        }))
        .into_response(),
        Err(e) => failure(&e, &board),
    }
}

async fn export_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let board = state.board.lock().unwrap();
    let csv = store::to_csv(board.table());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"lineboard.csv\"",
        )
        .body(axum::body::Body::from(csv))
        .unwrap()
}

async fn save_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let board = state.board.lock().unwrap();

    match board.save_snapshot(&state.snapshot_path) {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "path": state.snapshot_path.display().to_string(),
        }))
        .into_response(),
        Err(e) => failure(&e, &board),
    }
}

async fn restore_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut board = state.board.lock().unwrap();

    match board.restore_snapshot(&state.snapshot_path) {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "board": board_json(&board),
        }))
        .into_response(),
        Err(e) => failure(&e, &board),
    }
}

// The payload every handler hands the page: records with derived columns,
// the selection target, and when the sheet was last fetched.
fn board_json(board: &Board) -> serde_json::Value {
    let selection = board
        .selection()
        .target()
        .map(|(index, field)| serde_json::json!({ "index": index, "field": field.as_str() }));

    serde_json::json!({
        "records": board.table().records(),
        "selection": selection,
        "refreshed_at": board.refreshed_at().map(|t| t.to_rfc3339()),
    })
}

fn failure(e: &BoardError, board: &Board) -> Response {
    error!("{e}");

    let status = match e {
        BoardError::StoreUnreachable(_) | BoardError::WriteFailed(_) => StatusCode::BAD_GATEWAY,
        BoardError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
        BoardError::NoSuchRecord(_) => StatusCode::NOT_FOUND,
        BoardError::NotAdjustable(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    // A failed write-back leaves the board holding an edit the sheet never
    // saw; send the table along so the page can show it with the warning.
    let body = if e.leaves_local_edit() {
        serde_json::json!({
            "status": "error",
            "message": format!("{e}; your change is kept on screen but the sheet may be stale"),
            "board": board_json(board),
        })
    } else {
        serde_json::json!({
            "status": "error",
            "message": e.to_string(),
        })
    };

    (status, Json(body)).into_response()
}
