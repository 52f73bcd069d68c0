// Copyright Rivtower Technologies LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Liveness endpoint polled by the registry.
//!
//! Answers 200 whenever the process can serve requests. Registration outcome
//! and downstream dependencies play no part in the answer.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::{identity::ServiceIdentity, payload::HEALTH_CHECK_PATH, restful};

#[derive(Debug, Serialize)]
struct Liveness<'a> {
    id: &'a str,
}

pub fn router(identity: ServiceIdentity) -> Router {
    Router::new()
        .route(HEALTH_CHECK_PATH, get(check))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn(restful::handle_http_error))
        .with_state(identity)
}

async fn check(State(identity): State<ServiceIdentity>) -> Response {
    trace!("health check for {identity}");
    restful::ok(Liveness {
        id: identity.as_str(),
    })
    .into_response()
}
