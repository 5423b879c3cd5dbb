//! Roll API routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{require_user, store_error};
use crate::application::dto::{
    FieldErrors, FieldErrorsDto, RollHistoryDto, RollRequestDto, RollRowDto,
};
use crate::application::ports::outbound::ListQuery;
use crate::application::services::{RollServiceError, SubmissionError};
use crate::domain::entities::RollRecord;
use crate::domain::services::RollError;
use crate::infrastructure::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRollsParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
}

fn field_errors(errors: FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(FieldErrorsDto { errors }),
    )
        .into_response()
}

/// Roll the dice and record the result
pub async fn create_roll(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RollRequestDto>,
) -> Result<(StatusCode, Json<RollRecord>), Response> {
    require_user(&state).await.map_err(IntoResponse::into_response)?;

    let (request, notes) = req.into_request().map_err(field_errors)?;

    let record = state
        .roll_service
        .submit_roll(&request, notes)
        .await
        .map_err(|e| match e {
            RollServiceError::Validation(e) => {
                let field = match e {
                    RollError::MissingTarget => "target",
                    RollError::ModifierOutOfRange => "modifier",
                };
                field_errors(FieldErrors::from([(field.to_string(), e.to_string())]))
            }
            RollServiceError::Submission(SubmissionError::Store(e)) => {
                store_error(e).into_response()
            }
        })?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// List recorded rolls, newest first by default
pub async fn list_rolls(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRollsParams>,
) -> Result<Json<RollHistoryDto>, (StatusCode, String)> {
    require_user(&state).await?;

    let defaults = state.roll_service.default_query();
    let query = ListQuery {
        page: params.page.unwrap_or(defaults.page).max(1),
        per_page: params.per_page.unwrap_or(defaults.per_page).max(1),
        sort: params.sort.unwrap_or_else(|| defaults.sort.clone()),
    };

    let page = state
        .roll_service
        .list_rolls(&query)
        .await
        .map_err(store_error)?;

    Ok(Json(page.map_items(RollRowDto::from)))
}

/// Get a roll by ID
pub async fn get_roll(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RollRecord>, (StatusCode, String)> {
    require_user(&state).await?;

    let record = state
        .roll_service
        .get_roll(&id)
        .await
        .map_err(store_error)?;

    Ok(Json(record))
}
