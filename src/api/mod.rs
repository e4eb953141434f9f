//! HTTP scan API
//!
//! `POST /api/scan` runs a scan and answers with a [`ScanReport`];
//! `GET /` serves the operator console.

mod error;

pub use error::ApiError;

use actix_web::{
    get, http::StatusCode, middleware, post, web, App, HttpRequest, HttpResponse, HttpServer,
    Responder,
};
use serde::Serialize;
use serde_json::Value;

use crate::output::ScanReport;
use crate::service::{ScanRequest, ScanService};

const CONSOLE_HTML: &str = include_str!("../../static/index.html");

pub struct Response<T>(pub T);

impl<T> Responder for Response<T>
where
    T: Serialize,
{
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _: &HttpRequest) -> HttpResponse {
        HttpResponse::build(StatusCode::OK).json(self.0)
    }
}

pub type ApiResult<T> = std::result::Result<Response<T>, ApiError>;

#[post("/api/scan")]
async fn scan(body: web::Bytes, service: web::Data<ScanService>) -> ApiResult<ScanReport> {
    let request = parse_request(&body)?;
    let result = service.run_scan(request).await?;
    Ok(Response(ScanReport::from(&result)))
}

#[get("/")]
async fn console() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(CONSOLE_HTML)
}

/// Anything but a JSON object is treated as a request without parameters
fn parse_request(body: &[u8]) -> Result<ScanRequest, ApiError> {
    let missing = || ApiError(StatusCode::BAD_REQUEST, "Missing required parameters".to_owned());

    let value: Value = serde_json::from_slice(body).map_err(|_| missing())?;
    if !value.is_object() {
        return Err(missing());
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(scan).service(console);
}

/// Run the HTTP server until it is shut down
pub async fn serve(bind: &str, service: ScanService) -> std::io::Result<()> {
    let data = web::Data::new(service);

    log::info!("Serving scan API on http://{}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(config)
    })
    .bind(bind)?
    .run()
    .await
}
