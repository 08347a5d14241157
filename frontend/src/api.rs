use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use shared::{ClassifyResponse, ErrorResponse, HealthResponse, LiveClassification};

pub async fn check_health() -> bool {
    match Request::get("/health").send().await {
        Ok(response) if response.ok() => response
            .json::<HealthResponse>()
            .await
            .map(|health| health.status == "OK")
            .unwrap_or(false),
        _ => false,
    }
}

pub async fn fetch_live() -> Result<LiveClassification, String> {
    let response = Request::get("/live-classification")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(server_error(response).await);
    }
    response
        .json::<LiveClassification>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn classify(file: &GlooFile) -> Result<ClassifyResponse, String> {
    let form_data =
        web_sys::FormData::new().map_err(|_| "Failed to build upload form.".to_string())?;
    form_data
        .append_with_blob_and_filename("file", file.as_ref(), &file.name())
        .map_err(|_| "Failed to attach file.".to_string())?;

    let response = Request::post("/classify")
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(server_error(response).await);
    }
    response
        .json::<ClassifyResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn server_error(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    format!("Server error: {} - {}", status, message)
}
