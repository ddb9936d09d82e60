use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    error::{AppError, ErrorKind},
    top_k::{TopKRequest, TopKResponse, Value},
};

#[derive(OpenApi)]
#[openapi(
    paths(crate::top_k::http::post_top_k),
    components(schemas(TopKRequest, TopKResponse, Value, AppError, ErrorKind))
)]
pub struct ApiDoc;

pub(crate) const PATH: &str = "/openapi.json";

pub(crate) fn router() -> Router {
    Router::new().route("/", get(get_document))
}

pub fn document() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Top K Frequent Elements API".to_string();
    doc
}

async fn get_document() -> Json<utoipa::openapi::OpenApi> {
    Json(document())
}
