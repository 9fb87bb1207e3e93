use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::session::current_user;
use crate::core::{extract_video_id, markup};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct GenerateBlogRequest {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateBlogResponse<'a> {
    title: &'a str,
    content: &'a str,
    blog_id: i32,
}

/// The generate pipeline: validate input, resolve the video id, fetch the
/// transcript, generate and convert the article, persist the record. Any
/// failed step short-circuits and nothing is persisted.
pub async fn generate_blog(
    state: web::Data<AppState>,
    session: Session,
    payload: web::Json<GenerateBlogRequest>,
) -> Result<HttpResponse> {
    let Some(actor) = current_user(&session) else {
        return Err(Error::PermissionDenied);
    };

    let link = payload.link.as_deref().map(str::trim).unwrap_or_default();
    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    if link.is_empty() || title.is_empty() {
        return Err(Error::validation("both link and title are required"));
    }

    let video_id =
        extract_video_id(link).ok_or_else(|| Error::validation("unrecognized video link"))?;

    let transcript_text = state
        .transcripts
        .fetch_transcript(&video_id)
        .await
        .ok_or_else(|| Error::upstream("transcript is unavailable for this video"))?;

    let generated = match state.generator.generate(&transcript_text).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("content generation failed for {video_id}: {e}");
            return Err(Error::upstream("content generation failed"));
        }
    };

    let content = markup::to_html(&generated);
    let record = state.blogs.create(Some(&actor), title, link, &content).await?;

    Ok(HttpResponse::Ok().json(GenerateBlogResponse {
        title: &record.youtube_title,
        content: &record.generated_content,
        blog_id: record.id,
    }))
}

pub async fn method_not_allowed() -> Result<HttpResponse> {
    Err(Error::MethodNotAllowed)
}

pub async fn delete_blog(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let Some(actor) = current_user(&session) else {
        return Err(Error::PermissionDenied);
    };

    match state.blogs.delete(path.into_inner(), Some(&actor)).await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true }))),
        // Whether the record never existed or belongs to someone else is
        // not revealed to the caller.
        Err(Error::PermissionDenied) => Err(Error::NotFound),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::init_test_app;
    use crate::service::Actor;
    use crate::web::test_support;

    const WATCH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    /// Signs up through the real handler and yields the session cookie.
    macro_rules! signup_cookie {
        ($app:expr, $username:expr) => {{
            let resp = test::call_service(
                $app,
                test::TestRequest::post()
                    .uri("/signup")
                    .set_form([
                        ("username", $username),
                        ("email", "user@example.com"),
                        ("password", "pw-123456"),
                        ("repeat_password", "pw-123456"),
                    ])
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::FOUND);
            resp.response()
                .cookies()
                .next()
                .expect("session cookie")
                .into_owned()
        }};
    }

    fn actor(id: i32, username: &str) -> Actor {
        Actor {
            id,
            username: username.to_string(),
        }
    }

    #[actix_web::test]
    async fn wrong_method_is_405() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/generate-blog").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn unauthenticated_generate_is_403() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .set_json(json!({ "link": WATCH_URL, "title": "T" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn missing_fields_are_400() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;
        let cookie = signup_cookie!(&app, "alice");

        for payload in [
            json!({ "title": "T" }),
            json!({ "link": WATCH_URL }),
            json!({ "link": "", "title": "T" }),
        ] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/generate-blog")
                    .cookie(cookie.clone())
                    .set_json(payload)
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn unrecognized_link_is_400_and_persists_nothing() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;
        let cookie = signup_cookie!(&app, "alice");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .cookie(cookie)
                .set_json(json!({ "link": "not-a-url", "title": "T" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());

        let count = state.blogs.count(Some(&actor(1, "alice"))).await.unwrap();
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn transcript_failure_is_500_and_persists_nothing() {
        let state = test_support::state(None, false).await;
        let app = init_test_app!(state).await;
        let cookie = signup_cookie!(&app, "alice");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .cookie(cookie)
                .set_json(json!({ "link": WATCH_URL, "title": "T" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let count = state.blogs.count(Some(&actor(1, "alice"))).await.unwrap();
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn generation_failure_is_500_and_persists_nothing() {
        let state = test_support::state(Some("hello world"), true).await;
        let app = init_test_app!(state).await;
        let cookie = signup_cookie!(&app, "alice");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .cookie(cookie)
                .set_json(json!({ "link": WATCH_URL, "title": "T" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let count = state.blogs.count(Some(&actor(1, "alice"))).await.unwrap();
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn generate_persists_and_returns_the_record() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;
        let cookie = signup_cookie!(&app, "alice");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .cookie(cookie)
                .set_json(json!({ "link": WATCH_URL, "title": "Never Gonna" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Never Gonna");
        assert!(body["blog_id"].is_number());
        let content = body["content"].as_str().unwrap();
        assert!(content.contains("<h1>Summary</h1>"));
        assert!(content.contains("hello world"));

        let count = state.blogs.count(Some(&actor(1, "alice"))).await.unwrap();
        assert_eq!(count, 1);
    }

    #[actix_web::test]
    async fn unauthenticated_delete_is_403() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/delete-blog/1/")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn delete_succeeds_once_then_404s() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;
        let cookie = signup_cookie!(&app, "alice");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .cookie(cookie.clone())
                .set_json(json!({ "link": WATCH_URL, "title": "T" }))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        let blog_id = body["blog_id"].as_i64().unwrap();

        let uri = format!("/delete-blog/{blog_id}/");
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_of_another_users_record_is_404_and_keeps_it() {
        let state = test_support::state(Some("hello world"), false).await;
        let app = init_test_app!(state).await;
        let alice = signup_cookie!(&app, "alice");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/generate-blog")
                .cookie(alice)
                .set_json(json!({ "link": WATCH_URL, "title": "T" }))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        let blog_id = body["blog_id"].as_i64().unwrap();

        let bob = signup_cookie!(&app, "bob");
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/delete-blog/{blog_id}/"))
                .cookie(bob)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let count = state.blogs.count(Some(&actor(1, "alice"))).await.unwrap();
        assert_eq!(count, 1);
    }
}
