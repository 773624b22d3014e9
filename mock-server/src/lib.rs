use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Phone number accepted by the login endpoint.
pub const OBSERVER_PHONE: &str = "0722000000";
/// PIN accepted by the login endpoint.
pub const OBSERVER_PIN: &str = "1234";
/// Id of the only form that has sections.
pub const FORM_ID: i64 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
    pub unique_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StationUpdate {
    #[serde(rename = "idPollingStation")]
    pub id_polling_station: i64,
    #[serde(rename = "countyCode")]
    pub county_code: String,
    #[serde(rename = "urbanArea")]
    pub urban_area: bool,
    #[serde(rename = "observerArrivalTime")]
    pub observer_arrival_time: Option<String>,
    #[serde(rename = "observerLeaveTime")]
    pub observer_leave_time: Option<String>,
    #[serde(rename = "isPollingStationPresidentFemale")]
    pub is_polling_station_president_female: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub option_id: i64,
    pub value: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub polling_station_number: i64,
    pub county_code: String,
    pub question_id: i64,
    pub options: Vec<AnswerOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnswerUpload {
    pub answers: Vec<Answer>,
}

/// A note as received over multipart, with every field kept as text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReceivedNote {
    pub county_code: String,
    pub polling_station_number: String,
    pub question_id: String,
    pub text: String,
    pub file_name: Option<String>,
    pub file_content_type: Option<String>,
    pub file_len: usize,
}

#[derive(Debug, Default)]
pub struct Store {
    pub tokens: HashSet<String>,
    pub devices: Vec<String>,
    pub station_updates: Vec<StationUpdate>,
    pub notes: Vec<ReceivedNote>,
    pub answers: Vec<Answer>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Router sharing `db` with the caller, so tests can inspect uploads.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/v1/access/authorize", post(login))
        .route(
            "/v1/polling-station",
            get(list_polling_stations).post(update_polling_station),
        )
        .route("/v1/form", get(list_forms))
        .route("/v1/form/{id}", get(form_sections))
        .route("/v1/note/upload", post(upload_note))
        .route("/v1/answer", post(upload_answers))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_db(listener, Db::default()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if db.read().await.tokens.contains(token) {
        Ok(())
    } else {
        tracing::debug!("rejecting unknown token");
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Response {
    if input.user != OBSERVER_PHONE || input.password != OBSERVER_PIN {
        tracing::info!(user = %input.user, "login rejected");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid phone number or PIN"})),
        )
            .into_response();
    }
    let token = Uuid::new_v4().to_string();
    let mut store = db.write().await;
    store.tokens.insert(token.clone());
    store.devices.push(input.unique_id);
    tracing::info!(user = %input.user, "login accepted");
    Json(json!({"access_token": token, "expires_in": 86400})).into_response()
}

async fn list_polling_stations(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers).await?;
    Ok(Json(json!([
        {"id": 1, "name": "Bucuresti", "code": "B", "numberOfPollingStations": 1300, "diaspora": false, "order": 1},
        {"id": 2, "name": "Cluj", "code": "CJ", "numberOfPollingStations": 720, "diaspora": false, "order": 2},
        {"id": 3, "name": "Diaspora", "code": "D", "numberOfPollingStations": 440, "diaspora": true, "order": 3}
    ])))
}

async fn list_forms(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers).await?;
    Ok(Json(json!({
        "forms": [
            {"id": FORM_ID, "code": "A", "ver": 2, "description": "Opening", "order": 1, "diaspora": false},
            {"id": 2, "code": "C", "ver": 1, "description": "Counting", "order": 2, "diaspora": false}
        ]
    })))
}

async fn form_sections(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorize(&db, &headers).await?;
    if id != FORM_ID {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!([
        {
            "uniqueId": "A-1",
            "code": "A1",
            "description": "Before opening",
            "questions": [
                {
                    "id": 11,
                    "code": "A1.1",
                    "text": "Were the ballot boxes sealed?",
                    "questionType": 0,
                    "options": [
                        {"id": 101, "text": "Yes", "isFreeText": false},
                        {"id": 102, "text": "No, explain", "isFreeText": true}
                    ]
                }
            ]
        }
    ])))
}

async fn update_polling_station(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<StationUpdate>,
) -> Result<StatusCode, StatusCode> {
    authorize(&db, &headers).await?;
    db.write().await.station_updates.push(input);
    Ok(StatusCode::OK)
}

async fn upload_note(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<StatusCode, Response> {
    authorize(&db, &headers)
        .await
        .map_err(IntoResponse::into_response)?;

    let mut note = ReceivedNote::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            note.file_name = field.file_name().map(str::to_string);
            note.file_content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(IntoResponse::into_response)?;
            note.file_len = data.len();
            continue;
        }
        let value = field.text().await.map_err(IntoResponse::into_response)?;
        match name.as_str() {
            "CountyCode" => note.county_code = value,
            "PollingStationNumber" => note.polling_station_number = value,
            "QuestionId" => note.question_id = value,
            "Text" => note.text = value,
            _ => return Err(StatusCode::BAD_REQUEST.into_response()),
        }
    }

    db.write().await.notes.push(note);
    Ok(StatusCode::OK)
}

async fn upload_answers(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AnswerUpload>,
) -> Result<StatusCode, StatusCode> {
    authorize(&db, &headers).await?;
    db.write().await.answers.extend(input.answers);
    Ok(StatusCode::OK)
}
