//! HTTP surface: pricing page, checkout, confirmation pages, contact form.

use crate::{
    catalog::Catalog,
    checkout::{CheckoutInitiator, CheckoutResponse},
    config::CheckoutSettings,
    contact::{ContactClient, ContactMessage},
    orchestrator::{CheckoutOutcome, Notification, PageRegistry},
    pages::{Pages, PricingView},
};
use actix_web::{
    http::{header, StatusCode},
    web, HttpResponse, Responder,
};
use log::{debug, error};
use serde::Deserialize;
use std::sync::Arc;

pub type SettingsSource = Arc<dyn Fn() -> CheckoutSettings + Send + Sync>;

/// Shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub pages: Pages,
    pub registry: PageRegistry,
    pub initiator: CheckoutInitiator,
    pub contact: ContactClient,
    /// Read on every checkout so configuration is validated at call time.
    pub checkout_settings: SettingsSource,
    pub home_href: String,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        http: reqwest::Client,
        contact_endpoint: &str,
        checkout_settings: SettingsSource,
        home_href: Option<String>,
    ) -> Result<Self, tera::Error> {
        let initiator = CheckoutInitiator::new(http.clone());
        Ok(Self {
            catalog: Arc::new(catalog),
            pages: Pages::new()?,
            registry: PageRegistry::new(initiator.clone()),
            initiator,
            contact: ContactClient::new(http, contact_endpoint),
            checkout_settings,
            home_href: home_href.unwrap_or_else(|| "/".to_string()),
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pricing_page))
        .route("/checkout", web::post().to(checkout_form))
        .route("/contact", web::post().to(contact_form))
        .route("/success", web::get().to(success_page))
        .route("/cancel", web::get().to(cancel_page))
        .route("/api/checkout", web::post().to(checkout_api))
        .route("/api/packages", web::get().to(list_packages))
        .route("/api/keep-alive", web::get().to(health))
        .route("/health", web::get().to(health));
}

fn html(status: StatusCode, rendered: Result<String, tera::Error>) -> HttpResponse {
    match rendered {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Template rendering failed: {:?}", e);
            HttpResponse::InternalServerError().body("Template rendering failed")
        }
    }
}

async fn render_pricing(
    state: &AppState,
    page_id: &str,
    selected: Option<&str>,
    notification: Option<Notification>,
    status: StatusCode,
) -> HttpResponse {
    let in_flight = match state.registry.get(page_id).await {
        Some(orchestrator) => orchestrator.in_flight().await,
        None => Vec::new(),
    };
    let view = PricingView::new(&state.catalog, page_id, selected, &in_flight, notification);
    html(status, state.pages.pricing(&view))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    pub package: Option<String>,
}

async fn pricing_page(state: web::Data<AppState>, query: web::Query<PricingQuery>) -> HttpResponse {
    let (page_id, _) = state.registry.open().await;
    render_pricing(&state, &page_id, query.package.as_deref(), None, StatusCode::OK).await
}

#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub page: Option<String>,
    pub offering: String,
}

async fn checkout_form(state: web::Data<AppState>, form: web::Form<CheckoutForm>) -> HttpResponse {
    let form = form.into_inner();
    let (page_id, orchestrator) = state.registry.get_or_open(form.page.as_deref()).await;

    let offering = match state.catalog.require(&form.offering) {
        Ok(offering) => offering.clone(),
        Err(e) => {
            let notification = Notification::checkout_error(&e.to_string());
            return render_pricing(&state, &page_id, None, Some(notification), StatusCode::NOT_FOUND)
                .await;
        }
    };

    let settings = (state.checkout_settings)();
    match orchestrator.trigger(&settings, &offering).await {
        CheckoutOutcome::Redirect(url) => {
            state.registry.close(&page_id).await;
            HttpResponse::SeeOther()
                .insert_header((header::LOCATION, url))
                .finish()
        }
        CheckoutOutcome::Notify(notification) => {
            render_pricing(&state, &page_id, Some(&offering.name), Some(notification), StatusCode::OK)
                .await
        }
        CheckoutOutcome::Ignored => {
            debug!("Duplicate checkout for {} on page {}", offering.name, page_id);
            render_pricing(&state, &page_id, Some(&offering.name), None, StatusCode::CONFLICT).await
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutApiRequest {
    pub name: String,
}

/// Runs the initiator directly and answers with the result's JSON shape.
async fn checkout_api(state: web::Data<AppState>, body: web::Json<CheckoutApiRequest>) -> HttpResponse {
    let offering = match state.catalog.require(&body.name) {
        Ok(offering) => offering,
        Err(e) => return HttpResponse::NotFound().json(CheckoutResponse::failure(e.to_string())),
    };

    let settings = (state.checkout_settings)();
    match state.initiator.initiate(&settings, offering).await {
        Ok(result) => HttpResponse::Ok().json(CheckoutResponse::from(result)),
        Err(e) if e.is_config() => {
            error!("Checkout is not configured: {}", e);
            HttpResponse::InternalServerError().json(CheckoutResponse::failure(e.to_string()))
        }
        Err(e) => {
            error!("Checkout could not start: {}", e);
            HttpResponse::BadGateway().json(CheckoutResponse::failure(e.failure_message()))
        }
    }
}

async fn list_packages(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.catalog.offerings())
}

async fn success_page(state: web::Data<AppState>) -> HttpResponse {
    html(StatusCode::OK, state.pages.success(&state.home_href))
}

async fn cancel_page(state: web::Data<AppState>) -> HttpResponse {
    html(StatusCode::OK, state.pages.cancel())
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: Option<String>,
    pub package: Option<String>,
}

async fn contact_form(state: web::Data<AppState>, form: web::Form<ContactForm>) -> HttpResponse {
    let form = form.into_inner();
    let message = ContactMessage {
        name: form.name,
        email: form.email,
        message: form.message,
    };
    let notification = state.contact.submit_and_notify(&message).await;
    let (page_id, _) = state.registry.open().await;
    render_pricing(
        &state,
        &page_id,
        form.package.as_deref(),
        Some(notification),
        StatusCode::OK,
    )
    .await
}
