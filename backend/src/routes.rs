use std::path::{Path, PathBuf};

use actix_files::{Files, NamedFile};
use actix_multipart::{Multipart, MultipartError};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::error::InternalError;
use actix_web::{Error, HttpRequest, HttpResponse, mime, web};
use futures::TryStreamExt;
use log::{error, info};
use shared::{ErrorResponse, HealthResponse};

use crate::classify::{ClassifyError, MediaKind, UploadClassifier};
use crate::config::Config;
use crate::live::LiveState;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/live-classification").route(web::get().to(live_classification)))
        .service(web::resource("/classify").route(web::post().to(classify)))
        .service(web::resource("/stream/{file}").route(web::get().to(stream_file)))
        .service(frontend_files(frontend_dir));
}

/// Static frontend bundle. Paths that match no file get `index.html` so the
/// client-side router can take over.
fn frontend_files(frontend_dir: PathBuf) -> Files {
    let index = frontend_dir.join("index.html");
    Files::new("/", frontend_dir)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(&index).await?;
                let res = file.into_response(&req);
                Ok(ServiceResponse::new(req, res))
            }
        }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
    })
}

async fn live_classification(state: web::Data<LiveState>) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot().to_live_response())
}

fn error_json(message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        error: message.into(),
    }
}

fn bad_multipart(e: MultipartError) -> Error {
    let response = HttpResponse::BadRequest().json(error_json(format!("Invalid upload: {}", e)));
    InternalError::from_response(e, response).into()
}

async fn classify(
    uploads: web::Data<UploadClassifier>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = payload.try_next().await.map_err(bad_multipart)? {
        if upload.is_some() || field.name() != Some("file") {
            while field.try_next().await.map_err(bad_multipart)?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
            data.extend_from_slice(&chunk);
        }
        upload = Some((filename, data));
    }

    let Some((filename, data)) = upload else {
        return Ok(HttpResponse::BadRequest().json(error_json("No file provided")));
    };

    let kind = MediaKind::from_filename(&filename);
    let service = uploads.clone();
    let upload_dir = config.upload_dir.clone();
    let name = filename.clone();
    let outcome = web::block(move || service.classify_upload(&upload_dir, &name, kind, &data))
        .await
        .map_err(|e| ClassifyError::Blocking(e.to_string()))?;

    match outcome {
        Ok(verdict) => {
            info!("Classified upload {:?} ({:?}) as {}", filename, kind, verdict);
            Ok(HttpResponse::Ok().json(verdict.into_response()))
        }
        Err(e) => {
            error!("Failed to classify upload {:?}: {}", filename, e);
            Err(e.into())
        }
    }
}

/// Serves HLS playlists and segments from the live segment directory.
async fn stream_file(
    req: HttpRequest,
    config: web::Data<Config>,
    file: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let name = file.into_inner();
    if name.starts_with('.') || name.contains(['/', '\\']) {
        return Ok(HttpResponse::NotFound().json(error_json("File not found")));
    }

    let path = config.segments_dir.join(&name);
    let named = match NamedFile::open_async(&path).await {
        Ok(named) => named,
        Err(_) => return Ok(HttpResponse::NotFound().json(error_json("File not found"))),
    };

    let named = match stream_content_type(&path) {
        Some(content_type) => named.set_content_type(content_type),
        None => named,
    };
    Ok(named.into_response(&req))
}

fn stream_content_type(path: &Path) -> Option<mime::Mime> {
    let content_type = match path.extension().and_then(|ext| ext.to_str())? {
        "m3u8" => "application/vnd.apple.mpegurl",
        "ts" => "video/MP2T",
        _ => return None,
    };
    content_type.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ClassificationResult;
    use crate::test_support::{FailingDecoder, LabelFromRed, ScriptedDecoder, frame_for, frames_of};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use image::ImageFormat;
    use serde_json::Value;
    use shared::ClassLabel;
    use std::fs;
    use std::io::{Cursor, Write};
    use std::sync::Arc;

    const BOUNDARY: &str = "----anomalytestboundary";

    struct Harness {
        upload_dir: tempfile::TempDir,
        frontend_dir: tempfile::TempDir,
        segments_dir: tempfile::TempDir,
        state: LiveState,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                upload_dir: tempfile::tempdir().unwrap(),
                frontend_dir: tempfile::tempdir().unwrap(),
                segments_dir: tempfile::tempdir().unwrap(),
                state: LiveState::new(),
            }
        }

        fn config(&self) -> Config {
            Config {
                upload_dir: self.upload_dir.path().to_path_buf(),
                frontend_dir: self.frontend_dir.path().to_path_buf(),
                segments_dir: self.segments_dir.path().to_path_buf(),
                ..Config::default()
            }
        }

        fn uploads_left(&self) -> usize {
            fs::read_dir(self.upload_dir.path()).unwrap().count()
        }
    }

    macro_rules! app {
        ($harness:expr, $decoder:expr) => {{
            let config = $harness.config();
            let uploads = UploadClassifier::new(Arc::new(LabelFromRed), Arc::new($decoder), 10);
            let frontend_dir = config.frontend_dir.clone();
            test::init_service(
                App::new()
                    .app_data(web::Data::new($harness.state.clone()))
                    .app_data(web::Data::new(uploads))
                    .app_data(web::Data::new(config))
                    .configure(|cfg| configure_routes(cfg, frontend_dir)),
            )
            .await
        }};
    }

    fn multipart(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        write!(
            body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .unwrap();
        body.extend_from_slice(content);
        write!(body, "\r\n--{BOUNDARY}--\r\n").unwrap();
        body
    }

    fn classify_request(body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/classify")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
    }

    fn png_bytes(label: ClassLabel) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        frame_for(label).write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[actix_web::test]
    async fn health_is_always_ok() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"status": "OK"}));
    }

    #[actix_web::test]
    async fn live_classification_starts_at_default() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let req = test::TestRequest::get().uri("/live-classification").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "NormalVideos");
        assert_eq!(body["confidence"], 0.0);
        assert!(body["timestamp"].as_f64().unwrap() > 0.0);
    }

    #[actix_web::test]
    async fn live_classification_reflects_published_results() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let published = ClassificationResult::new(ClassLabel::Explosion, 0.5, chrono::Utc::now());
        harness.state.publish(published);

        let req = test::TestRequest::get().uri("/live-classification").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "Explosion");
        assert_eq!(body["confidence"], 0.5);
        assert_eq!(
            body["timestamp"].as_f64().unwrap(),
            published.to_live_response().timestamp
        );
    }

    #[actix_web::test]
    async fn classify_without_file_is_bad_request() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let req = classify_request(multipart("attachment", "still.png", b"abc")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No file provided");
        assert!(body.get("result").is_none());
        assert_eq!(harness.uploads_left(), 0);
    }

    #[actix_web::test]
    async fn classify_non_multipart_is_bad_request() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let req = test::TestRequest::post()
            .uri("/classify")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn classify_image_returns_one_label_and_cleans_up() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let png = png_bytes(ClassLabel::Burglary);
        let req = classify_request(multipart("file", "snapshot.png", &png)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"result": "Burglary"}));
        assert_eq!(harness.uploads_left(), 0);
    }

    #[actix_web::test]
    async fn classify_video_reports_the_majority_anomaly() {
        let harness = Harness::new();
        let mut frames = frames_of(ClassLabel::NormalVideos, 40);
        frames[9] = frame_for(ClassLabel::Robbery);
        frames[19] = frame_for(ClassLabel::Robbery);
        frames[39] = frame_for(ClassLabel::Arson);
        let app = app!(harness, ScriptedDecoder::new(frames));

        let req = classify_request(multipart("file", "clip.MP4", b"fake video bytes")).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "Robbery");
        assert_eq!(harness.uploads_left(), 0);
    }

    #[actix_web::test]
    async fn classify_all_normal_video_is_normal() {
        let harness = Harness::new();
        let app = app!(harness, ScriptedDecoder::new(frames_of(ClassLabel::NormalVideos, 30)));

        let req = classify_request(multipart("file", "hallway.avi", b"fake")).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "NormalVideos");
    }

    #[actix_web::test]
    async fn classify_short_video_is_unclassifiable() {
        let harness = Harness::new();
        let app = app!(harness, ScriptedDecoder::new(frames_of(ClassLabel::Abuse, 9)));

        let req = classify_request(multipart("file", "blip.mov", b"fake")).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], "unable to classify the content.");
        assert_eq!(harness.uploads_left(), 0);
    }

    #[actix_web::test]
    async fn corrupt_media_is_an_error_and_still_cleans_up() {
        let harness = Harness::new();
        let app = app!(harness, FailingDecoder);

        let req = classify_request(multipart("file", "broken.png", b"not an image")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
        assert!(body.get("result").is_none());
        assert_eq!(harness.uploads_left(), 0);

        let req = classify_request(multipart("file", "broken.mkv", b"not a video")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(harness.uploads_left(), 0);
    }

    #[actix_web::test]
    async fn frontend_serves_assets_and_falls_back_to_index() {
        let harness = Harness::new();
        fs::write(harness.frontend_dir.path().join("index.html"), "<html>app</html>").unwrap();
        fs::write(harness.frontend_dir.path().join("app.js"), "console.log(1)").unwrap();
        let app = app!(harness, FailingDecoder);

        let req = test::TestRequest::get().uri("/app.js").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "console.log(1)");

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "<html>app</html>");

        let req = test::TestRequest::get().uri("/live/camera-1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "<html>app</html>");
    }

    #[actix_web::test]
    async fn stream_serves_hls_files_with_their_content_types() {
        let harness = Harness::new();
        fs::write(harness.segments_dir.path().join("index.m3u8"), "#EXTM3U").unwrap();
        fs::write(harness.segments_dir.path().join("index0.ts"), [0x47u8; 188]).unwrap();
        let app = app!(harness, FailingDecoder);

        let req = test::TestRequest::get().uri("/stream/index.m3u8").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.apple.mpegurl"
        );

        let req = test::TestRequest::get().uri("/stream/index0.ts").to_request();
        let resp = test::call_service(&app, req).await;
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().eq_ignore_ascii_case("video/mp2t"));

        let req = test::TestRequest::get().uri("/stream/missing.ts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
