use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

pub(crate) enum StaticOrOwnedString {
    Static(&'static str),
    Owned(String),
}

impl Serialize for StaticOrOwnedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            StaticOrOwnedString::Static(s) => serializer.serialize_str(s),
            StaticOrOwnedString::Owned(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&'static str> for StaticOrOwnedString {
    fn from(val: &'static str) -> Self {
        StaticOrOwnedString::Static(val)
    }
}

impl From<String> for StaticOrOwnedString {
    fn from(val: String) -> Self {
        StaticOrOwnedString::Owned(val)
    }
}

#[derive(Serialize, ToSchema, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ErrorKind {
    EmptyInput,
    InvalidK,
    InvalidRequest,
}

impl ErrorKind {
    pub(crate) fn status(self) -> StatusCode {
        match self {
            ErrorKind::EmptyInput | ErrorKind::InvalidK => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidRequest => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub(crate) struct AppError {
    pub kind: ErrorKind,
    #[schema(value_type = String)]
    pub message: StaticOrOwnedString,
}

impl AppError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<StaticOrOwnedString>) -> Json<AppError> {
        Json(AppError {
            kind,
            message: message.into(),
        })
    }

    /// Responds with the status belonging to `kind`.
    pub(crate) fn respond(kind: ErrorKind, message: impl Into<StaticOrOwnedString>) -> Response {
        (kind.status(), AppError::new(kind, message)).into_response()
    }

    /// Responds with an explicit status, for rejections produced by extractors.
    pub(crate) fn respond_with(
        status: StatusCode,
        kind: ErrorKind,
        message: impl Into<StaticOrOwnedString>,
    ) -> Response {
        (status, AppError::new(kind, message)).into_response()
    }
}
