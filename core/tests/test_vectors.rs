//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! `requests.json` describes the request each operation must produce;
//! `responses.json` describes simulated outcomes and how they must be
//! classified. Comparing parsed JSON (not raw strings) avoids false negatives
//! from field-ordering differences.

use bytes::Bytes;
use observer_core::{
    AnswerBatch, ApiError, Credential, HttpMethod, HttpRequest, HttpResponse, LoginRequest,
    MultipartPart, Note, ObserverClient, PartContent, PollingStationUpdate, TransportError,
};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ObserverClient {
    ObserverClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn credential(case: &Value) -> Credential {
    Credential {
        access_token: case["token"].as_str().map(str::to_string),
        device_id: "device-1".to_string(),
    }
}

fn build(case: &Value) -> HttpRequest {
    let c = client();
    let credential = credential(case);
    let input = case["input"].clone();
    match case["operation"].as_str().unwrap() {
        "login" => c.build_login(&serde_json::from_value::<LoginRequest>(input).unwrap()),
        "list_polling_stations" => c.build_list_polling_stations(&credential),
        "list_forms" => c.build_list_forms(&credential),
        "form_sections" => c.build_form_sections(&credential, case["form_id"].as_i64().unwrap()),
        "update_polling_station" => {
            let input: PollingStationUpdate = serde_json::from_value(input).unwrap();
            c.build_update_polling_station(&credential, &input)
        }
        "upload_answers" => {
            let input: AnswerBatch = serde_json::from_value(input).unwrap();
            c.build_upload_answers(&credential, &input)
        }
        "upload_note" => c.build_upload_note(&credential, &note(&input)),
        other => panic!("unknown operation: {other}"),
    }
}

/// `Note` has no wire form of its own; vectors describe it field by field.
fn note(input: &Value) -> Note {
    Note {
        county_code: input["countyCode"].as_str().unwrap().to_string(),
        polling_station_id: input["pollingStationId"].as_i64(),
        question_id: input["questionId"].as_i64(),
        text: input["text"].as_str().unwrap().to_string(),
        image: input["image"]
            .as_str()
            .map(|data| Bytes::copy_from_slice(data.as_bytes())),
    }
}

/// Render a multipart part in the shape used by the vectors.
fn part_json(part: &MultipartPart) -> Value {
    match &part.content {
        PartContent::Text(value) => json!({"name": part.name, "text": value}),
        PartContent::File {
            file_name,
            mime_type,
            data,
        } => json!({
            "name": part.name,
            "file_name": file_name,
            "mime_type": mime_type,
            "data": String::from_utf8_lossy(data),
        }),
    }
}

/// Run the parser for `case`, returning the success value as JSON.
fn parse(case: &Value) -> Result<Value, ApiError> {
    let c = client();
    let outcome = match case.get("transport_error") {
        Some(message) => Err(TransportError::Connection(message.as_str().unwrap().to_string())),
        None => {
            let sim = &case["simulated_response"];
            Ok(HttpResponse::new(
                sim["status"].as_u64().unwrap() as u16,
                sim["body"].as_str().unwrap().to_string(),
            ))
        }
    };
    match case["operation"].as_str().unwrap() {
        "list_polling_stations" => c.parse_list_polling_stations(outcome).map(to_json),
        "list_forms" => c.parse_list_forms(outcome).map(to_json),
        "form_sections" => c.parse_form_sections(outcome).map(to_json),
        "upload" => c.parse_upload(outcome).map(|()| Value::Null),
        "login" => c.parse_login(outcome).map(Value::String),
        other => panic!("unknown operation: {other}"),
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap()
}

fn assert_error(name: &str, err: &ApiError, expected: &Value) {
    let kind = expected["kind"].as_str().unwrap();
    let matches_kind = match kind {
        "Unauthorized" => matches!(err, ApiError::Unauthorized),
        "MalformedResponse" => matches!(err, ApiError::MalformedResponse { .. }),
        "Generic" => matches!(err, ApiError::Generic { .. }),
        "LoginFailed" => matches!(err, ApiError::LoginFailed { .. }),
        other => panic!("{name}: unknown expected error kind: {other}"),
    };
    assert!(matches_kind, "{name}: expected {kind}, got {err:?}");
    if let Some(reason) = expected.get("reason") {
        assert_eq!(err.reason(), reason.as_str(), "{name}: reason");
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let req = build(case);

        let method = parse_method(expected_req["method"].as_str().unwrap());
        assert_eq!(req.method, method, "{name}: method");
        let url = format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap());
        assert_eq!(req.url, url, "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match (req.body.as_json(), req.body.as_multipart()) {
            (Some(json), _) => {
                let body: Value = serde_json::from_str(json).unwrap();
                assert_eq!(body, expected_req["body"], "{name}: body");
            }
            (None, Some(parts)) => {
                let parts: Vec<Value> = parts.iter().map(part_json).collect();
                assert_eq!(Value::from(parts), expected_req["parts"], "{name}: parts");
            }
            (None, None) => {
                assert!(req.body.is_empty(), "{name}: body should be empty");
                assert!(expected_req["body"].is_null(), "{name}: expected a body");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = parse(case);

        match (case.get("expected_error"), result) {
            (Some(expected), Err(err)) => assert_error(name, &err, expected),
            (Some(_), Ok(value)) => panic!("{name}: expected an error, got {value}"),
            (None, Ok(value)) => {
                assert_eq!(value, case["expected_result"], "{name}: parsed result")
            }
            (None, Err(err)) => panic!("{name}: unexpected error {err:?}"),
        }
    }
}
