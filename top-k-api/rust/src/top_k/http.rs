use std::{collections::HashSet, fmt, num::NonZeroUsize};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{
    de::{self, Unexpected, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorKind};

use super::{
    ranker::{self, RankError, Ranking},
    value::Value,
};

#[derive(Deserialize, ToSchema)]
pub(crate) struct TopKRequest {
    pub nums: Vec<Value>,
    #[schema(value_type = i64)]
    pub k: RequestedK,
}

/// `k` as sent by the client. Integers of any width are accepted, values
/// past `i128` saturate, so an oversized `k` still reaches the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RequestedK(i128);

struct RequestedKVisitor;

impl<'de> Visitor<'de> for RequestedKVisitor {
    type Value = RequestedK;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RequestedK, E> {
        Ok(RequestedK(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RequestedK, E> {
        Ok(RequestedK(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<RequestedK, E> {
        Ok(RequestedK(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<RequestedK, E> {
        Ok(RequestedK(i128::try_from(v).unwrap_or(i128::MAX)))
    }

    // serde_json hands integers beyond u64 over as floats.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RequestedK, E> {
        if v.is_finite() && v.fract() == 0.0 {
            Ok(RequestedK(v as i128))
        } else {
            Err(E::invalid_type(Unexpected::Float(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for RequestedK {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RequestedKVisitor)
    }
}

#[derive(Serialize, ToSchema)]
pub(crate) struct TopKResponse {
    pub top_k: Vec<Value>,
    /// Count per distinct value, keyed by its string form.
    #[schema(value_type = Object)]
    pub frequencies: FrequencyMap,
}

/// String keyed frequencies, serialized as a JSON object in first-seen order.
pub(crate) struct FrequencyMap(Vec<(String, usize)>);

impl Serialize for FrequencyMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub(crate) enum RequestError {
    #[error("k must be greater than 0, got {0}")]
    NonPositiveK(i128),
    #[error("nums contains an integer and a string that both map to the frequency key \"{0}\"")]
    AmbiguousKey(String),
}

/// Positive values wider than `usize` are capped, which the ranker then
/// reports as exceeding the distinct count.
fn parse_k(RequestedK(k): RequestedK) -> Result<NonZeroUsize, RequestError> {
    if k <= 0 {
        return Err(RequestError::NonPositiveK(k));
    }

    let k = usize::try_from(k).unwrap_or(usize::MAX);
    NonZeroUsize::new(k).ok_or(RequestError::NonPositiveK(0))
}

impl TryFrom<Ranking<Value>> for TopKResponse {
    type Error = RequestError;

    fn try_from(ranking: Ranking<Value>) -> Result<Self, Self::Error> {
        let (top_k, frequencies) = ranking.into_parts();

        let entries: Vec<(String, usize)> = frequencies
            .iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();

        let mut seen = HashSet::with_capacity(entries.len());
        if let Some((key, _)) = entries.iter().find(|(key, _)| !seen.insert(key.as_str())) {
            return Err(RequestError::AmbiguousKey(key.clone()));
        }

        Ok(TopKResponse {
            top_k,
            frequencies: FrequencyMap(entries),
        })
    }
}

impl From<RankError> for ErrorKind {
    fn from(err: RankError) -> Self {
        match err {
            RankError::EmptyInput => ErrorKind::EmptyInput,
            RankError::InvalidK { .. } => ErrorKind::InvalidK,
        }
    }
}

pub(crate) const PATH: &str = "/top-k-frequent";

pub(crate) fn router() -> Router {
    Router::new().route("/", post(post_top_k))
}

#[utoipa::path(
    post,
    path = "/top-k-frequent",
    request_body = TopKRequest,
    responses(
        (status = 200, description = "The k most frequent values and the full frequency table", body = TopKResponse),
        (status = 400, description = "nums is empty, or k exceeds the number of distinct values", body = AppError),
        (status = 422, description = "The request body is not a valid top-k request: a field is missing, \
a value is neither an integer nor a string, k is not positive, or nums holds an integer and a string \
with the same text (such as 1 and \"1\"), which would share one frequency key", body = AppError)
    )
)]
#[axum_macros::debug_handler]
pub(crate) async fn post_top_k(payload: Result<Json<TopKRequest>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            info!(error = %rejection, "rejected malformed top-k request");
            return AppError::respond_with(rejection.status(), ErrorKind::InvalidRequest, rejection.body_text());
        }
    };

    let k = match parse_k(request.k) {
        Ok(k) => k,
        Err(err) => {
            info!(error = %err, "rejected top-k request");
            return AppError::respond(ErrorKind::InvalidRequest, err.to_string());
        }
    };

    let ranking = match ranker::rank(&request.nums, k) {
        Ok(ranking) => ranking,
        Err(err) => {
            info!(error = %err, "rejected top-k request");
            let message = err.to_string();
            return AppError::respond(err.into(), message);
        }
    };

    debug!(
        values = request.nums.len(),
        k = k.get(),
        distinct = ranking.frequencies().len(),
        "ranked values"
    );

    match TopKResponse::try_from(ranking) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            info!(error = %err, "rejected top-k request");
            AppError::respond(ErrorKind::InvalidRequest, err.to_string())
        }
    }
}
