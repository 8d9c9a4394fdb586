use std::path::Path;

use axum::Json;
use tokio::io::AsyncWriteExt;
use utoipa::OpenApi;

use crate::app::controller::{AuthControllerApi, DashboardControllerApi, LoginRequest, SignupRequest};
use crate::app::response::{AuthResponse, DashboardResponse, SimpleResponse, UserResponse};

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        SimpleResponse,
        UserResponse,
        AuthResponse,
        DashboardResponse,
        SignupRequest,
        LoginRequest
    )),
    tags((name = "auth", description = "Account signup, login and the authenticated dashboard")),
    info(title = "Budget Tracker API", description = "API Docs")
)]
pub struct MainApiDoc;

/// All controller paths merged at the root, the way the router mounts them.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    MainApiDoc::openapi()
        .merge_from(AuthControllerApi::openapi())
        .merge_from(DashboardControllerApi::openapi())
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc())
}

pub async fn generate_docs(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path.as_ref())
        .await?;

    let docs = api_doc().to_pretty_json()?;

    file.write_all(docs.as_bytes()).await?;

    tracing::info!("wrote API docs to {}", path.as_ref().display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_auth_route() {
        let doc = api_doc();

        for path in ["/signup", "/login", "/dashboard"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn writes_pretty_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.json");

        generate_docs(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert!(parsed["paths"]["/login"]["post"].is_object());
    }
}
