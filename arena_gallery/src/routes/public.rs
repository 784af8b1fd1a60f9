use crate::helper::filter_helpers::Filter;
use crate::helper::render_helpers;
use crate::models::Region;
use crate::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct BlocksQuery {
    filter: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/is_server_active", web::get().to(is_server_active))
            .route("/channel", web::get().to(get_channel))
            .route("/profile", web::get().to(get_profile))
            .route("/blocks", web::get().to(get_blocks))
            .route("/blocks/{id}", web::get().to(get_block_by_id)),
    );
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}

/// 503 for a region that has not produced data.
fn not_ready<T>(region: &Region<T>, what: &str) -> HttpResponse {
    match region {
        Region::Failed(e) => {
            log::error!("API request for {} while region is failed: {}", what, e);
            HttpResponse::ServiceUnavailable().json(json!({ "success": false, "error": e.to_string() }))
        }
        _ => HttpResponse::ServiceUnavailable().json(json!({ "success": false, "error": format!("{} is still loading", what) })),
    }
}

async fn get_channel(state: web::Data<AppState>) -> impl Responder {
    let channel = state.channel();
    match &*channel {
        Region::Ready(c) => HttpResponse::Ok().json(c),
        other => not_ready(other, "channel"),
    }
}

async fn get_profile(state: web::Data<AppState>) -> impl Responder {
    let profile = state.profile();
    match &*profile {
        Region::Ready(user) => HttpResponse::Ok().json(user),
        other => not_ready(other, "profile"),
    }
}

async fn get_blocks(state: web::Data<AppState>, query: web::Query<BlocksQuery>) -> impl Responder {
    let filter = match query.filter.as_deref().map(str::parse::<Filter>) {
        None => Filter::All,
        Some(Ok(filter)) => filter,
        Some(Err(e)) => return HttpResponse::BadRequest().json(json!({ "success": false, "error": e.to_string() })),
    };
    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    let blocks = state.blocks();
    match &*blocks {
        Region::Ready(all) => {
            let page: Vec<_> = all
                .iter()
                .filter(|b| filter.matches(render_helpers::category(b)))
                .skip(offset)
                .take(limit)
                .collect();
            HttpResponse::Ok().json(page)
        }
        other => not_ready(other, "blocks"),
    }
}

async fn get_block_by_id(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let blocks = state.blocks();
    match &*blocks {
        Region::Ready(all) => match all.iter().find(|b| b.id() == id.as_str()) {
            Some(block) => HttpResponse::Ok().json(block),
            None => HttpResponse::NotFound().json(json!({ "success": false, "error": format!("block {} not found", id) })),
        },
        other => not_ready(other, "blocks"),
    }
}
