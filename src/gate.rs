use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::{
    AppState,
    error::AppError,
    session::{SESSION_COOKIE, Session},
};

/// Extractor marking a handler as session-gated. Extraction either yields the
/// validated session or fails the request with a redirect to the login page,
/// so a handler taking `Authenticated` cannot run unauthenticated.
#[derive(Debug)]
pub struct Authenticated(pub Session);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(AppError::Internal)?;
    let cookie = req.cookie(SESSION_COOKIE).ok_or(AppError::InvalidSession)?;
    let session = state.authority.validate(cookie.value())?;
    Ok(Authenticated(session))
}
