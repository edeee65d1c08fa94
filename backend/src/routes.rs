use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use shared::ErrorResponse;

use crate::config::StorageConfig;
use crate::page::{IndexPage, RESULTS_URL, UPLOADS_URL, render_error};
use crate::pipeline::{Rejection, ScanError, ScanService, Submission};
use crate::storage::StorageError;
use crate::upload::{UploadError, read_file_field};

pub fn configure_routes(cfg: &mut web::ServiceConfig, storage: &StorageConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict_tumor)))
        .service(
            web::resource("/")
                .route(web::get().to(index))
                .route(web::post().to(upload_scan)),
        )
        .service(Files::new(UPLOADS_URL, &storage.upload_dir))
        .service(Files::new(RESULTS_URL, &storage.results_dir));
}

async fn predict_tumor(service: web::Data<ScanService>, payload: Multipart) -> HttpResponse {
    let upload = match read_file_field(payload, service.max_upload_bytes()).await {
        Ok(upload) => upload,
        Err(e @ UploadError::TooLarge { .. }) => {
            warn!("Rejected oversized upload on /predict: {:?}", e);
            return HttpResponse::PayloadTooLarge().json(ErrorResponse::new(e.to_string()));
        }
        Err(e) => {
            warn!("Malformed upload on /predict: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
        }
    };

    match service.predict(upload).await {
        Ok(prediction) => {
            info!(
                "Prediction for {}: has_tumor={} confidence={}",
                prediction.filename, prediction.has_tumor, prediction.confidence
            );
            HttpResponse::Ok().json(prediction)
        }
        Err(e @ ScanError::MissingFile) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()))
        }
        Err(e @ ScanError::Storage(StorageError::UnsafeFilename(_))) => {
            warn!("Rejected upload on /predict: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()))
        }
        Err(e) => {
            error!("Prediction failed: {:?}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}

async fn index() -> HttpResponse {
    html(IndexPage::empty())
}

async fn upload_scan(service: web::Data<ScanService>, payload: Multipart) -> HttpResponse {
    let upload = match read_file_field(payload, service.max_upload_bytes()).await {
        Ok(upload) => upload,
        Err(UploadError::TooLarge { .. }) => return redirect_home(Rejection::TooLarge),
        Err(UploadError::Multipart(message)) => {
            return redirect_home(Rejection::Malformed(message));
        }
    };

    match service.analyze(upload).await {
        Ok(Submission::Rendered(page)) => html(page),
        Ok(Submission::Rejected(rejection)) => redirect_home(rejection),
        Err(e) => {
            error!("Scan analysis failed: {:?}", e);
            HttpResponse::InternalServerError()
                .content_type(ContentType::html())
                .body(render_error(e.summary()))
        }
    }
}

fn html(page: IndexPage) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page.render())
}

fn redirect_home(rejection: Rejection) -> HttpResponse {
    info!("Upload rejected: {:?}", rejection);
    HttpResponse::Found()
        .append_header((header::LOCATION, "/"))
        .finish()
}
