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

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Rewrites any response other than 200/500 into the `{code, message}` envelope.
pub async fn handle_http_error(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status_code = response.status();
    match status_code {
        StatusCode::OK | StatusCode::INTERNAL_SERVER_ERROR => response,
        _ => (
            status_code,
            Json(json!({
                "code": status_code.as_u16(),
                "message": status_code.canonical_reason().unwrap_or_default(),
            })),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct RESTfulResponse<T: Serialize> {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> IntoResponse for RESTfulResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn ok<T: Serialize>(data: T) -> RESTfulResponse<T> {
    RESTfulResponse {
        code: 200,
        message: "OK".to_owned(),
        data: Some(data),
    }
}
