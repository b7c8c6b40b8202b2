use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::web::pages;

pub async fn unauthorized() -> impl IntoResponse {
    Html(pages::unauthorized())
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found()))
}
