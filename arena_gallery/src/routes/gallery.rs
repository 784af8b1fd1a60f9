use crate::config::Config;
use crate::helper::filter_helpers::Filter;
use crate::helper::page_helpers::{self, GalleryPage};
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::Deserialize;
use tera::{Context, Tera};

#[derive(Deserialize)]
pub struct GalleryQuery {
    filter: Option<String>,
}

pub fn config_pages(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(show_gallery))
        .route("/blocks/{id}", web::get().to(show_block));
}

fn render_page(tera: &Tera, page: &GalleryPage) -> HttpResponse {
    let ctx = match Context::from_serialize(page) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Failed to build template context: {}", e);
            return HttpResponse::InternalServerError().body("Template error");
        }
    };

    let status = if page.missing_block.is_some() { StatusCode::NOT_FOUND } else { StatusCode::OK };
    match tera.render("gallery.html", &ctx) {
        Ok(rendered) => HttpResponse::build(status).content_type("text/html; charset=utf-8").body(rendered),
        Err(err) => {
            log::error!("Template rendering error: {}", err);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

async fn show_gallery(
    tera: web::Data<Tera>,
    config: web::Data<Config>,
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> impl Responder {
    let filter = Filter::from_query(query.filter.as_deref());
    let page = page_helpers::build_gallery_page(&state, &config, filter, None);
    render_page(&tera, &page)
}

/// The gallery with the detail dialog opened on one block.
async fn show_block(
    id: web::Path<String>,
    tera: web::Data<Tera>,
    config: web::Data<Config>,
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> impl Responder {
    let filter = Filter::from_query(query.filter.as_deref());
    let page = page_helpers::build_gallery_page(&state, &config, filter, Some(id.as_str()));
    render_page(&tera, &page)
}
