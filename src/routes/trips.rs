use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{
    auth::CurrentUser,
    error::AppError,
    flash::{self, Flash},
    models::{
        trip::{NewTrip, Trip, TripChanges},
        user::User,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/add_trip", get(add_trip_form).post(add_trip_submit))
        .route(
            "/edit_trip/:trip_index",
            get(edit_trip_form).post(edit_trip_submit),
        )
        .route("/delete_trip/:trip_index", get(delete_trip))
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    flash: Option<Flash>,
    user: User,
    trips: Vec<Trip>,
}

async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let email = current.require_email()?;
    let Some(user) = state.db.get_user_by_email(email).await? else {
        return Ok(user_not_found(jar));
    };
    let trips = state.db.get_user_trips(user.id).await?;

    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        AskamaTemplateResponse::into_response(DashboardTemplate { flash, user, trips }),
    )
        .into_response())
}

#[derive(Template)]
#[template(path = "add_trip.html")]
struct AddTripTemplate {
    flash: Option<Flash>,
}

async fn add_trip_form(
    current: CurrentUser,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, AppError> {
    current.require_email()?;
    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        AskamaTemplateResponse::into_response(AddTripTemplate { flash }),
    ))
}

async fn add_trip_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: PrivateCookieJar,
    Form(trip): Form<NewTrip>,
) -> Result<Response, AppError> {
    let email = current.require_email()?;
    let Some(user_id) = state.db.get_user_id_by_email(email).await? else {
        return Ok(user_not_found(jar));
    };
    state.db.create_trip(user_id, &trip).await?;

    let jar = flash::push(jar, Flash::success("Trip added successfully!"));
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

#[derive(Template)]
#[template(path = "edit_trip.html")]
struct EditTripTemplate {
    flash: Option<Flash>,
    trip: Trip,
    trip_index: usize,
}

async fn edit_trip_form(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: PrivateCookieJar,
    Path(trip_index): Path<usize>,
) -> Result<Response, AppError> {
    let email = current.require_email()?;
    let trip = match listed_trip(&state, email, trip_index).await? {
        Listed::Found(trip) => trip,
        Listed::Missing => return Ok(trip_not_found(jar)),
        Listed::NoUser => return Ok(user_not_found(jar)),
    };

    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        AskamaTemplateResponse::into_response(EditTripTemplate {
            flash,
            trip,
            trip_index,
        }),
    )
        .into_response())
}

async fn edit_trip_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: PrivateCookieJar,
    Path(trip_index): Path<usize>,
    Form(edited): Form<NewTrip>,
) -> Result<Response, AppError> {
    let email = current.require_email()?;
    let trip = match listed_trip(&state, email, trip_index).await? {
        Listed::Found(trip) => trip,
        Listed::Missing => return Ok(trip_not_found(jar)),
        Listed::NoUser => return Ok(user_not_found(jar)),
    };
    state
        .db
        .update_trip(trip.id, &TripChanges::from(edited))
        .await?;

    let jar = flash::push(jar, Flash::success("Trip updated successfully!"));
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

async fn delete_trip(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: PrivateCookieJar,
    Path(trip_index): Path<usize>,
) -> Result<Response, AppError> {
    let email = current.require_email()?;
    let trip = match listed_trip(&state, email, trip_index).await? {
        Listed::Found(trip) => trip,
        Listed::Missing => return Ok(trip_not_found(jar)),
        Listed::NoUser => return Ok(user_not_found(jar)),
    };
    state.db.delete_trip(trip.id).await?;

    let jar = flash::push(jar, Flash::success("Trip deleted successfully!"));
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

enum Listed {
    Found(Trip),
    Missing,
    NoUser,
}

/// Resolves a position in the user's newest-first listing to the stored trip.
async fn listed_trip(state: &AppState, email: &str, index: usize) -> Result<Listed, AppError> {
    let Some(user_id) = state.db.get_user_id_by_email(email).await? else {
        return Ok(Listed::NoUser);
    };
    let trips = state.db.get_user_trips(user_id).await?;
    let Some(listed) = trips.get(index) else {
        return Ok(Listed::Missing);
    };
    Ok(match state.db.get_trip_by_id(listed.id).await? {
        Some(trip) => Listed::Found(trip),
        None => Listed::Missing,
    })
}

fn user_not_found(jar: PrivateCookieJar) -> Response {
    let jar = flash::push(jar, Flash::error("User not found"));
    (jar, Redirect::to("/login")).into_response()
}

fn trip_not_found(jar: PrivateCookieJar) -> Response {
    let jar = flash::push(jar, Flash::error("Trip not found"));
    (jar, Redirect::to("/dashboard")).into_response()
}
