//! AWS Lambda HTTP handler
//!
//! Accepts a JSON scenario (any `ScenarioParams` field, all optional) plus an
//! optional `config` object, and returns the projected series and summary.
//! Validation failures come back as 422 with the error message.

use chrono::Local;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};

use wealth_projection::{ProjectionConfig, ProjectionEngine, ScenarioParams};

#[derive(Debug, Deserialize)]
struct ProjectionRequest {
    #[serde(flatten)]
    params: ScenarioParams,
    #[serde(default)]
    config: ProjectionConfig,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Parse a request body; absent fields fall back to scenario defaults
fn parse_request(body: &[u8]) -> Result<ProjectionRequest, serde_json::Error> {
    serde_json::from_slice(body)
}

async fn handle(event: Request) -> Result<Response<Body>, Error> {
    let body: &[u8] = event.body().as_ref();
    if body.is_empty() {
        return json_response(400, &error_body("expected a JSON body"));
    }
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(e) => return json_response(400, &error_body(e)),
    };

    let input = request.params.to_input(Local::now().date_naive());
    let engine = ProjectionEngine::new(request.config);

    match engine.project(&input) {
        Ok(result) => json_response(200, &result),
        Err(e) => {
            log::warn!("Rejected projection request: {}", e);
            json_response(422, &error_body(e))
        }
    }
}

fn error_body(e: impl ToString) -> ErrorBody {
    ErrorBody { error: e.to_string() }
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    let json = serde_json::to_string(body)?;
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(json))?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handle)).await
}
