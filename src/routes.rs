use std::time::Duration;

use actix_web::{HttpResponse, get, http::header, http::header::ContentType, post, web};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::time::timeout;

use crate::{AppState, error::AppError, fsops, gate::Authenticated};

/// Upper bound on any single filesystem operation; past it the request fails
/// instead of hanging on a stuck mount.
const FS_OP_TIMEOUT: Duration = Duration::from_secs(10);

const INDEX_PAGE: &str = r#"
		<h1>Mist</h1>
		<h3>Login</h3>
		<form method="post" action="/login">
    	<label for="name">Username</label>
    	<input type="text" id="name" name="name">
    	<label for="password">Password</label>
    	<input type="password" id="password" name="password">
    	<button type="submit">Login</button>
		</form>"#;

const TEST_PAGE: &str = "<h1>Hello from test</h1>";

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(index_page)
        .service(login)
        .service(logout)
        .service(internal_page)
        .service(list_directory)
        .service(file_content);
}

/// Diagnostic surface for the `--test` flag: only the placeholder endpoint
/// exists, so nothing here ever consults the session gate.
pub fn register_test(cfg: &mut web::ServiceConfig) {
    cfg.service(test_page).service(test_root);
}

#[get("/dir{tail:.*}")]
async fn list_directory(
    _auth: Authenticated,
    tail: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let remainder = tail.into_inner();
    let resolver = state.resolver.clone();
    let listing = timeout(
        FS_OP_TIMEOUT,
        web::block(move || {
            let resolved = resolver.resolve(&remainder)?;
            fsops::list_dir(&resolved)
        }),
    )
    .await
    .map_err(|_| AppError::Timeout)?
    .map_err(|_| AppError::Internal)??;

    indented_json(&listing)
}

#[get("/file{tail:.*}")]
async fn file_content(
    _auth: Authenticated,
    tail: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let remainder = tail.into_inner();
    let resolver = state.resolver.clone();
    let record = timeout(
        FS_OP_TIMEOUT,
        web::block(move || {
            let target = resolver.resolve_file(&remainder)?;
            fsops::access_file(&target)
        }),
    )
    .await
    .map_err(|_| AppError::Timeout)?
    .map_err(|_| AppError::Internal)??;

    indented_json(&record)
}

#[derive(Deserialize)]
struct LoginForm {
    name: String,
    password: String,
}

#[post("/login")]
async fn login(form: web::Form<LoginForm>, state: web::Data<AppState>) -> HttpResponse {
    let LoginForm { name, password } = form.into_inner();
    match state.authority.issue(&name, &password) {
        Ok(cookie) => HttpResponse::Found()
            .cookie(cookie)
            .insert_header((header::LOCATION, "/internal"))
            .finish(),
        Err(_) => HttpResponse::Found()
            .insert_header((header::LOCATION, "/"))
            .finish(),
    }
}

#[post("/logout")]
async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Found()
        .cookie(state.authority.revoke())
        .insert_header((header::LOCATION, "/"))
        .finish()
}

#[get("/internal")]
async fn internal_page(auth: Authenticated) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(internal_page_html(&auth.0.username))
}

#[get("/")]
async fn index_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_PAGE)
}

#[get("/test")]
async fn test_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(TEST_PAGE)
}

#[get("/")]
async fn test_root() -> HttpResponse {
    HttpResponse::NotFound().finish()
}

fn internal_page_html(username: &str) -> String {
    format!(
        r#"
		<h1>Mist</h1>
		<h3>Dashboard</h3>
		<hr>
		<small>User: {username}</small>
		<form method="post" action="/logout">
    	<button type="submit">Logout</button>
		</form>"#
    )
}

/// Tab-indented JSON body.
fn indented_json<T: Serialize>(value: &T) -> Result<HttpResponse, AppError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(buf))
}
