//! AWS Lambda handler for running household simulations
//!
//! Accepts a simulation request as JSON and returns the full report
//! (table, drawdown, capital fund, risk trajectory, recommendations).
//!
//! Works with direct invocation (the payload is the request) and with
//! Lambda Function URLs (the request is the string `body` of the event).

use health_strategy::{LoadError, ScenarioRunner, SimulationRequest};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde_json::{json, Value};

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

fn error_response(status: u16, message: &str) -> Value {
    json!({
        "statusCode": status,
        "headers": cors_headers(),
        "body": json!({ "error": message }).to_string(),
    })
}

/// HTTP method for Function URL events, None for direct invocation
fn http_method(event: &Value) -> Option<&str> {
    event
        .pointer("/requestContext/http/method")
        .and_then(Value::as_str)
}

/// Build the response for one event
fn respond(runner: &ScenarioRunner, event: Value) -> Value {
    let start = std::time::Instant::now();

    if http_method(&event) == Some("OPTIONS") {
        return json!({ "statusCode": 200, "headers": cors_headers(), "body": "" });
    }

    let parsed = match event.get("body").cloned() {
        Some(Value::String(body)) => SimulationRequest::from_json_str(&body),
        Some(Value::Null) | None if http_method(&event).is_some() => {
            return error_response(400, "Missing request body");
        }
        _ => serde_json::from_value::<SimulationRequest>(event).map_err(LoadError::from),
    };

    let request = match parsed {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected request: {}", e);
            return error_response(400, &format!("Invalid request: {}", e));
        }
    };

    let report = match runner.run(&request) {
        Ok(r) => r,
        Err(e) => {
            warn!("Projection failed: {}", e);
            return error_response(422, &e.to_string());
        }
    };

    let body = match serde_json::to_string(&report) {
        Ok(b) => b,
        Err(e) => return error_response(500, &format!("Failed to encode report: {}", e)),
    };

    info!(
        "Projected {} years for age {} in {:?}",
        report.table.len(),
        request.profile.age,
        start.elapsed()
    );

    json!({ "statusCode": 200, "headers": cors_headers(), "body": body })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    // Rate tables are loaded once per cold start
    let runner = match std::env::var("RATES_DIR") {
        Ok(dir) => ScenarioRunner::from_csv_path(std::path::Path::new(&dir))?,
        Err(_) => ScenarioRunner::new(),
    };
    let runner = &runner;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<Value, Error>(respond(runner, event.payload))
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json() -> Value {
        json!({
            "profile": {
                "age": 45,
                "gender": "female",
                "health_status": "chronic",
                "family_status": "single",
                "insurance_type": "employer"
            }
        })
    }

    fn body_of(response: &Value) -> Value {
        serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
    }

    #[test]
    fn test_direct_invocation() {
        let response = respond(&ScenarioRunner::new(), request_json());
        assert_eq!(response["statusCode"], 200);
        let body = body_of(&response);
        assert_eq!(body["request"]["profile"]["age"], 45);
        assert_eq!(body["table"]["age"].as_array().unwrap().len(), 85 - 45 + 1);
    }

    #[test]
    fn test_function_url_body() {
        let event = json!({
            "requestContext": { "http": { "method": "POST" } },
            "body": request_json().to_string(),
        });
        let response = respond(&ScenarioRunner::new(), event);
        assert_eq!(response["statusCode"], 200);
    }

    #[test]
    fn test_preflight() {
        let event = json!({ "requestContext": { "http": { "method": "OPTIONS" } } });
        let response = respond(&ScenarioRunner::new(), event);
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["body"], "");
    }

    #[test]
    fn test_invalid_requests() {
        let runner = ScenarioRunner::new();

        let response = respond(&runner, json!({ "profile": { "age": 45 } }));
        assert_eq!(response["statusCode"], 400);

        let mut bad_age = request_json();
        bad_age["profile"]["age"] = json!(0);
        let response = respond(&runner, bad_age);
        assert_eq!(response["statusCode"], 422);
        assert!(body_of(&response)["error"].is_string());
    }
}
