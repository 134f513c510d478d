use std::fmt;

use anyhow::Context;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;
use tourley::{
    auth::{self, SignUp, SignUpOutcome},
    db::Database,
    models::{trip::NewTrip, user::UserChanges},
};

#[derive(Debug, cucumber::World, Default)]
struct TravelWorld {
    state: Option<TestState>,
    last_sign_up: Option<SignUpOutcome>,
    current_user: Option<i64>,
}

impl TravelWorld {
    fn db(&self) -> &Database {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .db()
    }

    fn user_id(&self) -> i64 {
        self.current_user
            .expect("a user must be signed up before this step")
    }
}

struct TestState {
    db: Database,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db = Database::open(root.path().join("bdd.sqlite"))
            .await
            .context("open bdd database")?;
        Ok(Self { db, _root: root })
    }

    fn db(&self) -> &Database {
        &self.db
    }
}

#[given("a fresh travel log")]
async fn given_fresh_log(world: &mut TravelWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.last_sign_up = None;
    world.current_user = None;
}

#[given(
    regex = r#"^a registered user \"([^\"]+)\" with email \"([^\"]+)\" and password \"([^\"]+)\"$"#
)]
async fn given_registered_user(world: &mut TravelWorld, name: String, email: String, password: String) {
    sign_up(world, name, email, password.clone(), password).await;
    assert!(matches!(world.last_sign_up, Some(SignUpOutcome::Created(_))));
}

#[when(
    regex = r#"^I sign up as \"([^\"]*)\" with email \"([^\"]*)\", password \"([^\"]*)\" and confirmation \"([^\"]*)\"$"#
)]
async fn when_sign_up(
    world: &mut TravelWorld,
    name: String,
    email: String,
    password: String,
    confirm: String,
) {
    sign_up(world, name, email, password, confirm).await;
}

#[then(regex = r"^the sign-up is (created|rejected as taken|rejected as incomplete|rejected as mismatched)$")]
async fn then_sign_up_outcome(world: &mut TravelWorld, expected: String) {
    let outcome = world.last_sign_up.expect("a sign-up must have been attempted");
    let matches = match expected.as_str() {
        "created" => matches!(outcome, SignUpOutcome::Created(_)),
        "rejected as taken" => outcome == SignUpOutcome::EmailTaken,
        "rejected as incomplete" => outcome == SignUpOutcome::MissingFields,
        _ => outcome == SignUpOutcome::PasswordMismatch,
    };
    assert!(matches, "unexpected sign-up outcome {outcome:?}");
}

#[then(regex = r#"^I can log in as \"([^\"]+)\" using password \"([^\"]+)\"$"#)]
async fn then_can_log_in(world: &mut TravelWorld, email: String, password: String) {
    let user = auth::authenticate_user(world.db(), &email, &password)
        .await
        .expect("authentication")
        .expect("credentials accepted");
    assert_eq!(user.email, email);
}

#[then(regex = r#"^logging in as \"([^\"]+)\" using password \"([^\"]+)\" fails$"#)]
async fn then_log_in_fails(world: &mut TravelWorld, email: String, password: String) {
    let user = auth::authenticate_user(world.db(), &email, &password)
        .await
        .expect("authentication");
    assert!(user.is_none());
}

#[when(regex = r#"^I record a (\w+) trip to \"([^\"]+)\", \"([^\"]+)\", \"([^\"]+)\" from (\S+) to (\S+)$"#)]
async fn when_record_trip(
    world: &mut TravelWorld,
    trip_type: String,
    city: String,
    state: String,
    country: String,
    start: String,
    end: String,
) {
    let user_id = world.user_id();
    world
        .db()
        .create_trip(user_id, &NewTrip::new(city, state, country, start, end, trip_type))
        .await
        .expect("create trip");
}

#[when(regex = r#"^I rename myself to \"([^\"]*)\"$"#)]
async fn when_rename(world: &mut TravelWorld, name: String) {
    let user_id = world.user_id();
    world
        .db()
        .update_user(user_id, &UserChanges::default().name(name))
        .await
        .expect("update user");
}

#[when("I delete my account")]
async fn when_delete_account(world: &mut TravelWorld) {
    let user_id = world.user_id();
    world.db().delete_user(user_id).await.expect("delete user");
}

#[then(regex = r#"^my name is \"([^\"]+)\"$"#)]
async fn then_name_is(world: &mut TravelWorld, expected: String) {
    let user = world
        .db()
        .get_user_by_id(world.user_id())
        .await
        .expect("lookup")
        .expect("user exists");
    assert_eq!(user.name, expected);
}

#[then(regex = r#"^my trips are listed as \"([^\"]*)\"$"#)]
async fn then_trips_listed(world: &mut TravelWorld, expected: String) {
    let trips = world
        .db()
        .get_user_trips(world.user_id())
        .await
        .expect("list trips");
    let cities: Vec<_> = trips.iter().map(|trip| trip.city.as_str()).collect();
    assert_eq!(cities.join(", "), expected);
}

#[then(regex = r"^I have (\d+) stored trips$")]
async fn then_trip_count(world: &mut TravelWorld, expected: usize) {
    let trips = world
        .db()
        .get_user_trips(world.user_id())
        .await
        .expect("list trips");
    assert_eq!(trips.len(), expected);
}

async fn sign_up(
    world: &mut TravelWorld,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
) {
    let form = SignUp {
        name,
        email,
        password,
        confirm_password,
    };
    let outcome = auth::register_user(world.db(), &form)
        .await
        .expect("register user");
    if let SignUpOutcome::Created(id) = outcome {
        world.current_user = Some(id);
    }
    world.last_sign_up = Some(outcome);
}

#[tokio::main]
async fn main() {
    TravelWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
