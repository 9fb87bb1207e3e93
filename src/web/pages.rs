use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tera::{Context, Tera};

use super::AppState;
use super::session::{current_user, sign_in, sign_out};
use crate::error::{Error, Result};
use crate::service::Actor;

fn render(tera: &Tera, name: &str, context: &Context) -> Result<HttpResponse> {
    let body = tera.render(name, context)?;
    Ok(HttpResponse::Ok()
        .content_type(header::ContentType::html())
        .body(body))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn page_context(user: Option<&Actor>) -> Context {
    let mut context = Context::new();
    if let Some(user) = user {
        context.insert("user", user);
    }
    context
}

pub async fn home(
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    session: Session,
) -> Result<HttpResponse> {
    let user = current_user(&session);
    let mut context = page_context(user.as_ref());
    if user.is_some() {
        let blog_count = state.blogs.count(user.as_ref()).await?;
        context.insert("blog_count", &blog_count);
    }
    render(&tera, "home.html", &context)
}

pub async fn index(tera: web::Data<Tera>, session: Session) -> Result<HttpResponse> {
    let Some(user) = current_user(&session) else {
        return Ok(redirect("/login"));
    };
    render(&tera, "index.html", &page_context(Some(&user)))
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login_page(tera: web::Data<Tera>) -> Result<HttpResponse> {
    render(&tera, "login.html", &Context::new())
}

pub async fn login(
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    match state
        .auth
        .authenticate(&form.username, &form.password)
        .await?
    {
        Some(account) => {
            sign_in(&session, &Actor::from(&account))?;
            Ok(redirect("/"))
        }
        None => {
            let mut context = Context::new();
            context.insert("error_message", "Invalid username or password");
            render(&tera, "login.html", &context)
        }
    }
}

#[derive(Deserialize)]
pub struct SignupForm {
    username: String,
    email: String,
    password: String,
    repeat_password: String,
}

pub async fn signup_page(tera: web::Data<Tera>) -> Result<HttpResponse> {
    render(&tera, "signup.html", &Context::new())
}

pub async fn signup(
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    session: Session,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse> {
    if form.password != form.repeat_password {
        let mut context = Context::new();
        context.insert("error_message", "Passwords do not match");
        return render(&tera, "signup.html", &context);
    }

    match state
        .auth
        .signup(&form.username, &form.email, &form.password)
        .await
    {
        Ok(account) => {
            sign_in(&session, &Actor::from(&account))?;
            Ok(redirect("/"))
        }
        Err(Error::Validation { message }) => {
            let mut context = Context::new();
            context.insert("error_message", &message);
            render(&tera, "signup.html", &context)
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(session: Session) -> Result<HttpResponse> {
    sign_out(&session);
    Ok(redirect("/"))
}

#[derive(Deserialize)]
pub struct ListQuery {
    q: Option<String>,
}

pub async fn blog_list(
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let Some(user) = current_user(&session) else {
        return Ok(redirect("/login"));
    };

    let q = query.q.as_deref().unwrap_or("").trim();
    let blogs = if q.is_empty() {
        state.blogs.list_for(Some(&user)).await?
    } else {
        state.blogs.search(Some(&user), q).await?
    };

    let mut context = page_context(Some(&user));
    context.insert("blogs", &blogs);
    context.insert("query", q);
    render(&tera, "blog_list.html", &context)
}

pub async fn blog_details(
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    session: Session,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let Some(user) = current_user(&session) else {
        return Ok(redirect("/"));
    };

    match state.blogs.get(path.into_inner(), Some(&user)).await {
        Ok(blog) => {
            let mut context = page_context(Some(&user));
            context.insert("blog", &blog);
            render(&tera, "blog_details.html", &context)
        }
        Err(Error::NotFound | Error::PermissionDenied) => Ok(redirect("/")),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use crate::init_test_app;
    use crate::web::test_support;

    #[actix_web::test]
    async fn index_redirects_anonymous_users_to_login() {
        let state = test_support::state(Some("transcript"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/index").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get("location").unwrap().to_str().unwrap(),
            "/login"
        );
    }

    #[actix_web::test]
    async fn login_with_bad_credentials_rerenders_the_form() {
        let state = test_support::state(Some("transcript"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form([("username", "ghost"), ("password", "nope")])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Invalid username or password"));
    }

    #[actix_web::test]
    async fn signup_with_mismatched_passwords_rerenders_the_form() {
        let state = test_support::state(Some("transcript"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/signup")
                .set_form([
                    ("username", "alice"),
                    ("email", "alice@example.com"),
                    ("password", "one-password"),
                    ("repeat_password", "another-password"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Passwords do not match"));
    }

    #[actix_web::test]
    async fn signup_signs_in_and_redirects_home() {
        let state = test_support::state(Some("transcript"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/signup")
                .set_form([
                    ("username", "alice"),
                    ("email", "alice@example.com"),
                    ("password", "pw-123456"),
                    ("repeat_password", "pw-123456"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get("location").unwrap().to_str().unwrap(),
            "/"
        );
        assert!(resp.response().cookies().next().is_some());
    }

    #[actix_web::test]
    async fn blog_details_redirects_anonymous_users_home() {
        let state = test_support::state(Some("transcript"), false).await;
        let app = init_test_app!(state).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/blog-details/1").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get("location").unwrap().to_str().unwrap(),
            "/"
        );
    }
}
