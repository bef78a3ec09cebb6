use serde::Serialize;

/// References of the staged uploads, in request order.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = json!(["/assets/uploads/20240101/9f86d081884c7d65.jpg"]))]
    pub files: Vec<String>,
}
