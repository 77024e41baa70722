// src/echo/mod.rs

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use warp::{http::StatusCode, hyper::body::Bytes, reply::Reply, Filter};

/// Default listen port of the echo server.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Serialize)]
struct EchoResponse {
    status: &'static str,
    data: Value,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// `POST /api/sensor`: answer with the JSON body that was received.
pub fn routes() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "sensor")
        .and(warp::post())
        .and(warp::body::bytes())
        .map(echo_sensor_data)
}

fn echo_sensor_data(body: Bytes) -> warp::reply::WithStatus<warp::reply::Json> {
    match serde_json::from_slice::<Value>(&body) {
        Ok(data) if !data.is_null() => {
            info!("Received data: {}", data);
            warp::reply::with_status(
                warp::reply::json(&EchoResponse {
                    status: "success",
                    data,
                }),
                StatusCode::OK,
            )
        }
        parsed => {
            warn!(bytes = body.len(), error = ?parsed.err(), "rejecting body without JSON");
            warp::reply::with_status(
                warp::reply::json(&ErrorResponse {
                    error: "JSON body required".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            )
        }
    }
}
