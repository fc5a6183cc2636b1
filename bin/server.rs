// Life Dashboard - Web Server
// REST API with Axum over the shared SQLite connection

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use log::{error, info};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use life_dashboard::db::finance::FinanceEntryFilter;
use life_dashboard::db::journal::JournalListFilter;
use life_dashboard::db::sport::DateFilter;
use life_dashboard::entities::{
    FinanceEntryUpdate, HabitUpdate, JournalEntryUpdate, JournalSearch, NewCompletion,
    NewFinanceBudget, NewFinanceCategory, NewFinanceEntry, NewHabit, NewJournalEntry,
    NewSportFood, NewSportWater, NewSportWorkout, NewVisitedCountry, NewWaterEntry,
    NewWishlistCountry, SportGoalsUpdate, TransactionKind, UserId, WaterEntryUpdate,
    WaterGoalUpdate,
};
use life_dashboard::{setup_database, Dashboard, DashboardError, LogReporter, Paging, Settings};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    settings: Arc<Settings>,
}

impl AppState {
    fn new(conn: Connection, settings: Settings) -> Self {
        AppState {
            db: Arc::new(Mutex::new(conn)),
            settings: Arc::new(settings),
        }
    }

    /// Run one service call while holding the connection.
    fn with_dashboard<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Dashboard<'_>) -> Result<T, DashboardError>,
    {
        let conn = self
            .db
            .lock()
            .map_err(|_| ApiError::internal("database lock poisoned"))?;
        let dashboard = Dashboard::new(&conn, &self.settings, &LogReporter);
        Ok(f(&dashboard)?)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

fn created<T>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

// ============================================================================
// Errors
// ============================================================================

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: &str) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        let status = match &err {
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::Conflict(_) => StatusCode::BAD_REQUEST,
            DashboardError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Storage(source) => {
                error!("Storage failure: {:#}", source);
                return ApiError::internal("internal storage error");
            }
        };
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::failure(self.message))).into_response()
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Caller identity, set by the upstream auth proxy in `x-user-id`.
struct CurrentUser(UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        };

        let raw = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| unauthorized("missing x-user-id header"))?
            .to_str()
            .map_err(|_| unauthorized("x-user-id is not valid text"))?;

        match raw.trim().parse::<UserId>() {
            Ok(user) if user > 0 => Ok(CurrentUser(user)),
            _ => Err(unauthorized("x-user-id must be a positive integer")),
        }
    }
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Deserialize)]
struct HabitListQuery {
    #[serde(default)]
    active_only: bool,
}

#[derive(Deserialize)]
struct DateQuery {
    date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_history_days")]
    days: u32,
}

fn default_history_days() -> u32 {
    7
}

#[derive(Deserialize)]
struct WeatherQuery {
    weather: Option<String>,
}

#[derive(Deserialize)]
struct CategoryQuery {
    #[serde(rename = "type")]
    kind: Option<TransactionKind>,
}

#[derive(Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

#[derive(Deserialize)]
struct ContinentQuery {
    continent: Option<String>,
}

#[derive(Deserialize)]
struct PeriodQuery {
    #[serde(default)]
    period: String,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<u32>,
}

// ============================================================================
// General Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/overview - Habits, water and finance at a glance
async fn overview(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    match state.with_dashboard(|d| d.overview(user)) {
        Ok(overview) => (StatusCode::OK, Json(ApiResponse::ok(overview))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/activity - The caller's audit trail
async fn activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<LimitQuery>,
) -> impl IntoResponse {
    match state.with_dashboard(|d| d.activity(user, q.limit)) {
        Ok(events) => (StatusCode::OK, Json(ApiResponse::ok(events))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/totals/:source?period=week - One record stream over a named period
async fn period_totals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(source): Path<String>,
    Query(q): Query<PeriodQuery>,
) -> impl IntoResponse {
    state
        .with_dashboard(|d| d.period_totals(user, &source, &q.period))
        .and_then(ok)
}

// ============================================================================
// Habit Handlers
// ============================================================================

async fn list_habits(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<HabitListQuery>,
    Query(paging): Query<Paging>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_habits(user, filter.active_only, paging)).and_then(ok)
}

async fn create_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(habit): Json<NewHabit>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.create_habit(user, &habit)).and_then(created)
}

async fn get_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.get_habit(user, id)).and_then(ok)
}

async fn update_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<HabitUpdate>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.update_habit(user, id, &update)).and_then(ok)
}

async fn delete_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_habit(user, id)).and_then(ok)
}

async fn complete_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(completion): Json<NewCompletion>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.complete_habit(user, id, &completion)).and_then(created)
}

async fn uncomplete_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, date)): Path<(i64, NaiveDate)>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.uncomplete_habit(user, id, date)).and_then(ok)
}

async fn habit_stats(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.habit_stats(user)).and_then(ok)
}

// ============================================================================
// Water Handlers
// ============================================================================

async fn list_water_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<DateQuery>,
    Query(paging): Query<Paging>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_water_entries(user, q.date, paging)).and_then(ok)
}

async fn add_water_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(entry): Json<NewWaterEntry>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.add_water_entry(user, &entry)).and_then(created)
}

async fn update_water_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<WaterEntryUpdate>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.update_water_entry(user, id, &update)).and_then(ok)
}

async fn delete_water_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_water_entry(user, id)).and_then(ok)
}

async fn water_today(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.water_today(user)).and_then(ok)
}

async fn water_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<HistoryQuery>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.water_history(user, q.days)).and_then(ok)
}

async fn water_dashboard(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.water_dashboard(user)).and_then(ok)
}

async fn water_goal(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.water_goal(user)).and_then(ok)
}

async fn update_water_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<WaterGoalUpdate>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.update_water_goal(user, &update)).and_then(ok)
}

async fn water_recommendation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<WeatherQuery>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.water_recommendation(user, q.weather.as_deref())).and_then(ok)
}

// ============================================================================
// Finance Handlers
// ============================================================================

async fn list_finance_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<FinanceEntryFilter>,
    Query(paging): Query<Paging>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_finance_entries(user, &filter, paging)).and_then(ok)
}

async fn create_finance_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(entry): Json<NewFinanceEntry>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.create_finance_entry(user, &entry)).and_then(created)
}

async fn get_finance_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.get_finance_entry(user, id)).and_then(ok)
}

async fn update_finance_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<FinanceEntryUpdate>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.update_finance_entry(user, id, &update)).and_then(ok)
}

async fn delete_finance_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_finance_entry(user, id)).and_then(ok)
}

async fn list_finance_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<CategoryQuery>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_finance_categories(user, q.kind)).and_then(ok)
}

async fn create_finance_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(category): Json<NewFinanceCategory>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.create_finance_category(user, &category)).and_then(created)
}

async fn list_finance_budgets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<YearQuery>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_finance_budgets(user, q.year)).and_then(ok)
}

async fn create_finance_budget(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(budget): Json<NewFinanceBudget>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.create_finance_budget(user, &budget)).and_then(created)
}

async fn finance_summary(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.finance_summary(user)).and_then(ok)
}

// ============================================================================
// Sport Handlers
// ============================================================================

async fn add_sport_water(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(water): Json<NewSportWater>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.add_sport_water(user, &water)).and_then(created)
}

async fn list_sport_water(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<DateFilter>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_sport_water(user, filter)).and_then(ok)
}

async fn delete_sport_water(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_sport_water(user, id)).and_then(ok)
}

async fn add_sport_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(food): Json<NewSportFood>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.add_sport_food(user, &food)).and_then(created)
}

async fn list_sport_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<DateFilter>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_sport_food(user, filter)).and_then(ok)
}

async fn delete_sport_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_sport_food(user, id)).and_then(ok)
}

async fn add_sport_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(workout): Json<NewSportWorkout>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.add_sport_workout(user, &workout)).and_then(created)
}

async fn list_sport_workouts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<DateFilter>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_sport_workouts(user, filter)).and_then(ok)
}

async fn delete_sport_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_sport_workout(user, id)).and_then(ok)
}

async fn sport_goals(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.sport_goals(user)).and_then(ok)
}

async fn update_sport_goals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<SportGoalsUpdate>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.update_sport_goals(user, &update)).and_then(ok)
}

async fn sport_today(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.sport_today(user)).and_then(ok)
}

async fn sport_week(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.sport_week(user)).and_then(ok)
}

async fn sport_overview(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.sport_overview(user)).and_then(ok)
}

// ============================================================================
// Journal Handlers
// ============================================================================

async fn list_journal_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<JournalListFilter>,
    Query(paging): Query<Paging>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_journal_entries(user, &filter, paging)).and_then(ok)
}

async fn create_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(entry): Json<NewJournalEntry>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.create_journal_entry(user, &entry)).and_then(created)
}

async fn get_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.get_journal_entry(user, id)).and_then(ok)
}

async fn update_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<JournalEntryUpdate>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.update_journal_entry(user, id, &update)).and_then(ok)
}

async fn delete_journal_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.delete_journal_entry(user, id)).and_then(ok)
}

async fn search_journal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(paging): Query<Paging>,
    Json(search): Json<JournalSearch>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.search_journal(user, &search, paging)).and_then(ok)
}

async fn journal_stats(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.journal_stats(user)).and_then(ok)
}

async fn journal_dashboard(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.journal_dashboard(user)).and_then(ok)
}

// ============================================================================
// Travel Handlers
// ============================================================================

async fn list_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<ContinentQuery>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_wishlist(user, q.continent.as_deref())).and_then(ok)
}

async fn add_to_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(country): Json<NewWishlistCountry>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.add_to_wishlist(user, &country)).and_then(created)
}

async fn remove_from_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.remove_from_wishlist(user, &code)).and_then(ok)
}

async fn list_visited(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.list_visited(user)).and_then(ok)
}

async fn mark_visited(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(country): Json<NewVisitedCountry>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.mark_visited(user, &country)).and_then(created)
}

async fn remove_visited(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
) -> impl IntoResponse {
    state.with_dashboard(|d| d.remove_visited(user, &code)).and_then(ok)
}

async fn travel_stats(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.travel_stats(user)).and_then(ok)
}

async fn travel_dashboard(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> impl IntoResponse {
    state.with_dashboard(|d| d.travel_dashboard(user)).and_then(ok)
}

// ============================================================================
// Router
// ============================================================================

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/overview", get(overview))
        .route("/activity", get(activity))
        .route("/totals/:source", get(period_totals))
        // Habits
        .route("/habits", get(list_habits).post(create_habit))
        .route("/habits/stats", get(habit_stats))
        .route("/habits/:id", get(get_habit).put(update_habit).delete(delete_habit))
        .route("/habits/:id/complete", post(complete_habit))
        .route("/habits/:id/complete/:date", delete(uncomplete_habit))
        // Water
        .route("/water/entries", get(list_water_entries).post(add_water_entry))
        .route("/water/entries/:id", put(update_water_entry).delete(delete_water_entry))
        .route("/water/today", get(water_today))
        .route("/water/history", get(water_history))
        .route("/water/dashboard", get(water_dashboard))
        .route("/water/goal", get(water_goal).put(update_water_goal))
        .route("/water/recommendation", get(water_recommendation))
        // Finance
        .route("/finance/entries", get(list_finance_entries).post(create_finance_entry))
        .route(
            "/finance/entries/:id",
            get(get_finance_entry).put(update_finance_entry).delete(delete_finance_entry),
        )
        .route("/finance/categories", get(list_finance_categories).post(create_finance_category))
        .route("/finance/budgets", get(list_finance_budgets).post(create_finance_budget))
        .route("/finance/summary", get(finance_summary))
        // Sport
        .route("/sport/water", get(list_sport_water).post(add_sport_water))
        .route("/sport/water/:id", delete(delete_sport_water))
        .route("/sport/food", get(list_sport_food).post(add_sport_food))
        .route("/sport/food/:id", delete(delete_sport_food))
        .route("/sport/workouts", get(list_sport_workouts).post(add_sport_workout))
        .route("/sport/workouts/:id", delete(delete_sport_workout))
        .route("/sport/goals", get(sport_goals).put(update_sport_goals))
        .route("/sport/today", get(sport_today))
        .route("/sport/week", get(sport_week))
        .route("/sport/overview", get(sport_overview))
        // Journal
        .route("/journal/entries", get(list_journal_entries).post(create_journal_entry))
        .route(
            "/journal/entries/:id",
            get(get_journal_entry).put(update_journal_entry).delete(delete_journal_entry),
        )
        .route("/journal/search", post(search_journal))
        .route("/journal/stats", get(journal_stats))
        .route("/journal/dashboard", get(journal_dashboard))
        // Travel
        .route("/travel/wishlist", get(list_wishlist).post(add_to_wishlist))
        .route("/travel/wishlist/:code", delete(remove_from_wishlist))
        .route("/travel/visited", get(list_visited).post(mark_visited))
        .route("/travel/visited/:code", delete(remove_visited))
        .route("/travel/stats", get(travel_stats))
        .route("/travel/dashboard", get(travel_dashboard))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = life_dashboard::config::init()?;

    info!("Opening database {}", settings.db_path);
    let conn = Connection::open(&settings.db_path)?;
    setup_database(&conn)?;

    let bind_addr = settings.bind_addr.clone();
    let router = app(AppState::new(conn, settings));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("🚀 Life Dashboard API listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;

    Ok(())
}
