use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::export::{to_csv, OutputFormat};
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{web, App, HttpResponse, HttpServer};
use futures_util::TryStreamExt;
use rasarx_descriptors::{prepare, DescriptorGenerator, DescriptorSource, Table};
use rasarx_rasar::{RasarConfig, RasarEngine, RasarReport};
use rasarx_similarity::Kernel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Shared state of the HTTP workers
#[derive(Clone)]
pub struct AppState {
    config: ServerConfig,
    generator: Option<Arc<dyn DescriptorGenerator>>,
}

impl AppState {
    pub fn new(config: ServerConfig, generator: Option<Arc<dyn DescriptorGenerator>>) -> Self {
        Self { config, generator }
    }
}

#[derive(Deserialize)]
struct FormatQuery {
    format: Option<String>,
}

#[derive(Default)]
struct Upload {
    train: Option<Vec<u8>>,
    test: Option<Vec<u8>>,
    method: Option<String>,
    descriptor_type: Option<String>,
}

#[derive(Serialize)]
struct ReportResponse<'a> {
    request_id: &'a str,
    descriptor_type: &'static str,
    dropped: &'a [String],
    #[serde(flatten)]
    report: &'a RasarReport,
}

#[derive(Serialize)]
struct CsvResponse<'a> {
    request_id: &'a str,
    train_csv: String,
    test_csv: String,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        config: ServerConfig,
        generator: Option<Arc<dyn DescriptorGenerator>>,
    ) -> std::io::Result<()> {
        let bind = (config.host.clone(), config.port);
        let state = web::Data::new(AppState::new(config, generator));

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(routes)
        })
        .bind(bind)?
        .run()
        .await
    }
}

/// Register the HTTP routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/calculate_rasar", web::post().to(calculate_rasar));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn calculate_rasar(
    state: web::Data<AppState>,
    query: web::Query<FormatQuery>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let format = match query.format.as_deref() {
        Some(f) => f.parse::<OutputFormat>()?,
        None => OutputFormat::Json,
    };

    let upload = read_upload(payload, state.config.max_upload_bytes).await?;
    let (train, test) = match (upload.train, upload.test) {
        (Some(train), Some(test)) => (train, test),
        _ => {
            return Err(ApiError::BadRequest(
                "Both training and test files are required".to_string(),
            ))
        }
    };
    let kernel: Kernel = upload
        .method
        .as_deref()
        .unwrap_or(Kernel::Gaussian.label())
        .parse()?;
    let source: DescriptorSource = upload
        .descriptor_type
        .as_deref()
        .unwrap_or(DescriptorSource::UserDefined.label())
        .parse()?;
    if source.needs_generator() && state.generator.is_none() {
        return Err(ApiError::BadRequest(format!(
            "descriptor type '{}' is not available on this server",
            source
        )));
    }

    let reference = Table::from_bytes(&train)?;
    let queries = Table::from_bytes(&test)?;
    if reference.is_empty() || queries.is_empty() {
        return Err(ApiError::BadRequest(
            "Uploaded files are empty or invalid".to_string(),
        ));
    }
    for (what, table) in [("train_file", &reference), ("test_file", &queries)] {
        if table.n_rows() > state.config.max_items {
            return Err(ApiError::TooLarge {
                what: format!("{} row count", what),
                limit: state.config.max_items,
            });
        }
    }

    info!(
        request_id = %request_id,
        kernel = %kernel,
        descriptor_type = %source,
        references = reference.n_rows(),
        queries = queries.n_rows(),
        "calculating RASAR descriptors"
    );

    let engine = RasarEngine::new(RasarConfig {
        kernel,
        ..RasarConfig::default()
    })?;
    let generator = state.generator.clone();
    let work = web::block(move || -> rasarx_core::Result<(RasarReport, Vec<String>)> {
        let input = prepare(&reference, &queries, source, generator.as_deref())?;
        let report = engine.evaluate(&input.reference, &input.query)?;
        Ok((report, input.dropped))
    });

    let (report, dropped) = match tokio::time::timeout(state.config.timeout(), work).await {
        Err(_) => {
            warn!(request_id = %request_id, "computation timed out");
            return Err(ApiError::Timeout(state.config.timeout_secs));
        }
        Ok(Err(e)) => return Err(ApiError::Internal(e.to_string())),
        Ok(Ok(result)) => result.map_err(|e| {
            debug!(request_id = %request_id, error = %e, "computation rejected");
            e
        })?,
    };

    info!(
        request_id = %request_id,
        response_kind = %report.response_kind,
        train_rows = report.train.len(),
        test_rows = report.test.len(),
        "RASAR descriptors ready"
    );

    let response = match format {
        OutputFormat::Json => HttpResponse::Ok().json(ReportResponse {
            request_id: &request_id,
            descriptor_type: source.label(),
            dropped: &dropped,
            report: &report,
        }),
        OutputFormat::Csv => HttpResponse::Ok().json(CsvResponse {
            request_id: &request_id,
            train_csv: to_csv(&report.train, report.response_kind)?,
            test_csv: to_csv(&report.test, report.response_kind)?,
        }),
    };
    Ok(response)
}

/// Collect form parts, enforcing the per-part size limit while streaming.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if data.len() + chunk.len() > limit {
                return Err(ApiError::TooLarge {
                    what: name,
                    limit,
                });
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "train_file" => upload.train = Some(data),
            "test_file" => upload.test = Some(data),
            "method" => upload.method = Some(form_text(&name, data)?),
            "descriptor_type" => upload.descriptor_type = Some(form_text(&name, data)?),
            _ => debug!(field = %name, "ignoring unknown form field"),
        }
    }

    Ok(upload)
}

fn form_text(name: &str, data: Vec<u8>) -> Result<String, ApiError> {
    String::from_utf8(data)
        .map(|s| s.trim().to_string())
        .map_err(|_| ApiError::BadRequest(format!("form field '{}' is not valid UTF-8", name)))
}
