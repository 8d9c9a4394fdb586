use axum::{response::IntoResponse, http::StatusCode, Json};

/// JSON response with a success payload `T` and an error payload `E`.
///
/// Every variant maps to exactly one status code, which also makes the enum
/// usable as a utoipa `IntoResponses` source for generated docs.
#[derive(utoipa::IntoResponses)]
pub enum CoreResponse<T, E>
where T: serde::Serialize + utoipa::ToSchema,
      E: serde::Serialize + utoipa::ToSchema
{
    #[response(status = 200, description = "Ok")]
    Ok(T),

    #[response(status = 201, description = "Created")]
    Created(T),

    #[response(status = 400, description = "Bad request")]
    BadRequest(E),

    #[response(status = 401, description = "Unauthorized")]
    Unauthorized(E),

    #[response(status = 404, description = "Not found")]
    NotFound(E),

    #[response(status = 409, description = "Conflict")]
    Conflict(E),

    #[response(status = 500, description = "Internal server error")]
    InternalServerError(E),
}

impl<T, E> CoreResponse<T, E>
where T: serde::Serialize + utoipa::ToSchema,
      E: serde::Serialize + utoipa::ToSchema
{
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ok(_) => StatusCode::OK,
            Self::Created(_) => StatusCode::CREATED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<T, E> IntoResponse for CoreResponse<T, E>
where T: serde::Serialize + utoipa::ToSchema,
      E: serde::Serialize + utoipa::ToSchema
{
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        match self {
            Self::Ok(data) | Self::Created(data) => (status, Json(data)).into_response(),
            Self::BadRequest(error)
            | Self::Unauthorized(error)
            | Self::NotFound(error)
            | Self::Conflict(error)
            | Self::InternalServerError(error) => (status, Json(error)).into_response(),
        }
    }
}
