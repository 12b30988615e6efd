//! Request handlers: public render endpoints and the admin API

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::assemble::RenderModel;
use crate::schema::{Document, PageId, ResourceId};
use crate::store::{BlogPost, PostMeta, UploadedFile};

pub type ApiResult<T> = Result<T, ApiError>;

/// Run blocking store work off the async runtime
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Worker failed: {}", e)))?
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

// Public

pub async fn page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Json<RenderModel>> {
    let page: PageId = page
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Page `{}` not found", page)))?;
    let assembler = state.assembler;
    blocking(move || Ok(Json(assembler.assemble(page)))).await
}

pub async fn service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<RenderModel>> {
    let assembler = state.assembler;
    blocking(move || Ok(Json(assembler.assemble_service(&slug)?))).await
}

pub async fn blog_index(State(state): State<AppState>) -> ApiResult<Json<RenderModel>> {
    let assembler = state.assembler;
    blocking(move || Ok(Json(assembler.assemble_blog_index()))).await
}

pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<RenderModel>> {
    let assembler = state.assembler;
    blocking(move || Ok(Json(assembler.assemble_post(&slug)?))).await
}

// Admin: content documents

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn get_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> ApiResult<Json<Document>> {
    let token = query.kind.ok_or_else(|| ApiError::missing("type"))?;
    let resource: ResourceId = token
        .parse()
        .map_err(|e: crate::schema::UnknownResource| ApiError::BadRequest(e.to_string()))?;
    let admin = state.admin;
    blocking(move || Ok(Json(admin.load_for_edit(resource)?))).await
}

#[derive(Debug, Deserialize)]
pub struct SaveContent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<Value>,
}

pub async fn save_content(
    State(state): State<AppState>,
    payload: Result<Json<SaveContent>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let body = json_body(payload)?;
    let kind = body.kind.ok_or_else(|| ApiError::missing("type"))?;
    let data = body.data.ok_or_else(|| ApiError::missing("data"))?;
    let admin = state.admin;
    blocking(move || {
        admin.commit_value(&kind, data)?;
        Ok(Json(json!({ "success": true, "type": kind })))
    })
    .await
}

// Admin: blog

pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<BlogPost>>> {
    let admin = state.admin;
    blocking(move || Ok(Json(admin.list_posts()?))).await
}

/// Either raw Markdown under `slug`, or front matter fields plus `title`
/// from which the slug is derived
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePost {
    pub slug: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub is_edit: bool,
    #[serde(flatten)]
    pub meta: PostMeta,
}

pub async fn save_post(
    State(state): State<AppState>,
    payload: Result<Json<SavePost>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let body = json_body(payload)?;
    let content = body.content.ok_or_else(|| ApiError::missing("content"))?;
    let admin = state.admin;

    let post = match body.slug.filter(|s| !s.trim().is_empty()) {
        Some(slug) => {
            blocking(move || Ok(admin.save_post_markdown(&slug, &content, body.is_edit)?)).await?
        }
        None => {
            if body.meta.title.trim().is_empty() {
                return Err(ApiError::missing("slug"));
            }
            let title = body.meta.title.clone();
            let meta = body.meta;
            let is_edit = body.is_edit;
            blocking(move || Ok(admin.create_or_update_post(&title, &content, meta, is_edit)?))
                .await?
        }
    };
    Ok(Json(json!({ "success": true, "slug": post.slug })))
}

#[derive(Debug, Default, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

pub async fn delete_post(
    State(state): State<AppState>,
    Query(query): Query<SlugQuery>,
) -> ApiResult<Json<Value>> {
    let slug = query.slug.ok_or_else(|| ApiError::missing("slug"))?;
    let admin = state.admin;
    blocking(move || {
        admin.delete_post(&slug)?;
        Ok(Json(json!({ "success": true, "slug": slug })))
    })
    .await
}

// Admin: uploads

pub async fn list_uploads(State(state): State<AppState>) -> ApiResult<Json<Vec<UploadedFile>>> {
    let admin = state.admin;
    blocking(move || Ok(Json(admin.list_uploads()?))).await
}

/// Multipart form: `file`, optional `type`
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut kind: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                kind = Some(text);
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| ApiError::missing("file"))?;
    let admin = state.admin;
    let uploaded = blocking(move || Ok(admin.upload_image(kind.as_deref(), &filename, &bytes)?)).await?;
    Ok(Json(json!({
        "success": true,
        "path": uploaded.path,
        "filename": uploaded.filename,
        "type": uploaded.kind,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct FilenameQuery {
    pub filename: Option<String>,
}

pub async fn delete_upload(
    State(state): State<AppState>,
    Query(query): Query<FilenameQuery>,
) -> ApiResult<Json<Value>> {
    let filename = query.filename.ok_or_else(|| ApiError::missing("filename"))?;
    let admin = state.admin;
    blocking(move || {
        let deletion = admin.delete_uploaded_image(&filename)?;
        Ok(Json(json!({
            "success": true,
            "filename": deletion.filename,
            "cleared": deletion.cleared,
        })))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::PageContent;
    use crate::store::ContentStore;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(ContentStore::new(dir.path()), None);
        (dir, state)
    }

    fn content_query(kind: &str) -> Query<ContentQuery> {
        Query(ContentQuery {
            kind: Some(kind.to_string()),
        })
    }

    #[tokio::test]
    async fn test_content_round_trip() {
        let (_dir, state) = state();
        let saved = save_content(
            State(state.clone()),
            Ok(Json(SaveContent {
                kind: Some("navigation".to_string()),
                data: Some(json!({"header": [{"label": "Home", "href": "/"}]})),
            })),
        )
        .await
        .unwrap();
        assert_eq!(saved.0["success"], true);

        let Json(doc) = get_content(State(state), content_query("navigation"))
            .await
            .unwrap();
        let value = doc.to_value().unwrap();
        assert_eq!(value["header"][0]["label"], "Home");
        assert_eq!(value["cta"]["href"], "/contact");
    }

    #[tokio::test]
    async fn test_content_errors() {
        let (_dir, state) = state();
        let err = get_content(State(state.clone()), Query(ContentQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = get_content(State(state.clone()), content_query("pricing"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = save_content(
            State(state),
            Ok(Json(SaveContent {
                kind: Some("home".to_string()),
                data: None,
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blog_duplicate_and_delete() {
        let (_dir, state) = state();
        let request = || SavePost {
            slug: Some("furnace-tips".to_string()),
            content: Some("---\ntitle: Furnace Tips\n---\nBody".to_string()),
            is_edit: false,
            meta: PostMeta::default(),
        };

        save_post(State(state.clone()), Ok(Json(request())))
            .await
            .unwrap();
        let err = save_post(State(state.clone()), Ok(Json(request())))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let Json(posts) = list_posts(State(state.clone())).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].meta.title, "Furnace Tips");

        let slug = |s: &str| {
            Query(SlugQuery {
                slug: Some(s.to_string()),
            })
        };
        delete_post(State(state.clone()), slug("furnace-tips"))
            .await
            .unwrap();
        let err = delete_post(State(state), slug("furnace-tips"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_post_from_title() {
        let (_dir, state) = state();
        let Json(body) = save_post(
            State(state.clone()),
            Ok(Json(SavePost {
                slug: None,
                content: Some("Check your filters.".to_string()),
                is_edit: false,
                meta: PostMeta {
                    title: "Spring Checklist".to_string(),
                    ..Default::default()
                },
            })),
        )
        .await
        .unwrap();
        assert_eq!(body["slug"], "spring-checklist");

        let Json(model) = blog_post(State(state), Path("spring-checklist".to_string()))
            .await
            .unwrap();
        assert!(matches!(model.content, PageContent::BlogPost { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_upload() {
        let (_dir, state) = state();
        let err = delete_upload(
            State(state),
            Query(FilenameQuery {
                filename: Some("ghost.jpg".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_public_pages() {
        let (_dir, state) = state();
        let Json(model) = page(State(state.clone()), Path("plan".to_string()))
            .await
            .unwrap();
        assert_eq!(model.page, "plan");

        let err = page(State(state.clone()), Path("pricing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = service(State(state), Path("heating-repair".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
