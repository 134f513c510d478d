use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    auth::{self, CurrentUser, SignUp, SignUpOutcome},
    error::AppError,
    flash::{self, Flash},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_form).post(login_submit))
        .route("/sign_up", get(sign_up_form).post(sign_up_submit))
        .route("/logout", get(logout))
}

async fn index(current: CurrentUser) -> Redirect {
    if current.is_logged_in() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    flash: Option<Flash>,
    email: String,
}

async fn login_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        AskamaTemplateResponse::into_response(LoginTemplate {
            flash,
            email: String::new(),
        }),
    )
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match auth::authenticate_user(&state.db, &form.email, &form.password).await? {
        Some(user) => {
            let jar = auth::start_session(jar, &user.email);
            let jar = flash::push(jar, Flash::success("Login successful!"));
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        None => Ok(AskamaTemplateResponse::into_response(LoginTemplate {
            flash: Some(Flash::error("Invalid email or password")),
            email: form.email,
        })),
    }
}

#[derive(Template)]
#[template(path = "sign_up.html")]
pub struct SignUpTemplate {
    flash: Option<Flash>,
}

async fn sign_up_form(jar: PrivateCookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        AskamaTemplateResponse::into_response(SignUpTemplate { flash }),
    )
}

async fn sign_up_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignUp>,
) -> Result<(PrivateCookieJar, Redirect), AppError> {
    let (message, target) = match auth::register_user(&state.db, &form).await? {
        SignUpOutcome::Created(_) => (Flash::success("Sign up successful!"), "/login"),
        SignUpOutcome::EmailTaken => (Flash::error("Email already exists"), "/sign_up"),
        SignUpOutcome::MissingFields => (Flash::error("Please fill in all fields"), "/sign_up"),
        SignUpOutcome::PasswordMismatch => (Flash::error("Passwords do not match"), "/sign_up"),
    };
    Ok((flash::push(jar, message), Redirect::to(target)))
}

async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    let jar = auth::end_session(jar);
    let jar = flash::push(jar, Flash::info("You have been logged out"));
    (jar, Redirect::to("/login"))
}
