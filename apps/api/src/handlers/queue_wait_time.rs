use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use queuewait_application::QueueWaitTimeLookup;
use queuewait_core::AppError;
use tracing::warn;

use crate::dto::{QueueWaitTimeQuery, QueueWaitTimeResponse};
use crate::error::{ApiResult, ErrorResponse};
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn queue_wait_time_handler(
    State(state): State<AppState>,
    query: Result<Query<QueueWaitTimeQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected queue wait time query");
        AppError::Validation(
            QueueWaitTimeLookup::MissingQueueSid
                .error_message()
                .unwrap_or_default(),
        )
    })?;

    let lookup = state
        .queue_wait_time_reader
        .lookup(query.queue_sid.as_deref())
        .await?;

    let response = match lookup {
        QueueWaitTimeLookup::Found { waittime } => {
            Json(QueueWaitTimeResponse { waittime }).into_response()
        }
        lookup => {
            let status = StatusCode::from_u16(lookup.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let message = lookup.error_message().unwrap_or_default();
            (status, Json(ErrorResponse::new(message))).into_response()
        }
    };

    Ok(response)
}
