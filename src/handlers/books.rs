use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::models::{BookFields, BuyRequest, ListQuery};
use crate::store::Store;

pub async fn list(
    query: web::Query<ListQuery>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let books = store.list_books(query.into_inner().name).await?;
    Ok(HttpResponse::Ok().json(books))
}

pub async fn get(
    id: web::Path<i32>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let book = store
        .get_book(id.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(book))
}

pub async fn create(
    fields: web::Json<BookFields>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let id = store.insert_book(fields.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}

// Full replace; answers ok even when the id matches nothing.
pub async fn update(
    id: web::Path<i32>,
    fields: web::Json<BookFields>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    store.update_book(id.into_inner(), fields.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

pub async fn delete(
    id: web::Path<i32>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    store.delete_book(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

pub async fn clear(store: web::Data<dyn Store>) -> Result<HttpResponse, ApiError> {
    store.clear_books().await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Price quote only: reads the book, multiplies, mutates nothing. The total
/// is plain f64 arithmetic with no currency rounding.
pub async fn buy(
    request: web::Json<BuyRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let book = store.get_book(request.id).await?.ok_or(ApiError::NotFound)?;
    let total = book.price * request.quantity as f64;
    Ok(HttpResponse::Ok().json(json!({ "total": total })))
}
