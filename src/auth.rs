use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar};
use serde::Deserialize;
use tracing::info;

use crate::{db::Database, error::AppError, models::user::User};

pub const SESSION_COOKIE: &str = "tourley_session";

/// The email stored in the session cookie, if someone is logged in.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|never: Infallible| -> AppError { match never {} })?;
        let email = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|email| !email.is_empty());
        Ok(Self(email))
    }
}

impl CurrentUser {
    pub fn require_email(&self) -> Result<&str, AppError> {
        self.0.as_deref().ok_or(AppError::Unauthorized)
    }

    pub fn is_logged_in(&self) -> bool {
        self.0.is_some()
    }
}

pub fn start_session(jar: PrivateCookieJar, email: &str) -> PrivateCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, email.to_string()))
            .path("/")
            .http_only(true),
    )
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    Created(i64),
    EmailTaken,
    MissingFields,
    PasswordMismatch,
}

/// Validates a sign-up form and creates the account.
///
/// The existing-email check runs first so a taken address is reported even
/// when other fields are blank.
pub async fn register_user(db: &Database, form: &SignUp) -> Result<SignUpOutcome, AppError> {
    if db.get_user_by_email(&form.email).await?.is_some() {
        return Ok(SignUpOutcome::EmailTaken);
    }
    if [&form.name, &form.email, &form.password, &form.confirm_password]
        .iter()
        .any(|field| field.is_empty())
    {
        return Ok(SignUpOutcome::MissingFields);
    }
    if form.password != form.confirm_password {
        return Ok(SignUpOutcome::PasswordMismatch);
    }

    match db
        .create_user(&form.name, &form.email, &form.password)
        .await?
    {
        Some(id) => Ok(SignUpOutcome::Created(id)),
        None => Ok(SignUpOutcome::EmailTaken),
    }
}

/// Looks the user up by email and compares the password verbatim.
///
/// Passwords are kept as plain text; this is where hashing has to land before
/// the app holds real credentials.
pub async fn authenticate_user(
    db: &Database,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = db
        .get_user_by_email(email)
        .await?
        .filter(|user| user.password == password);
    if user.is_some() {
        info!(email, "login succeeded");
    } else {
        info!(email, "login failed");
    }
    Ok(user)
}
