//! [`User`]-related definitions.

use axum::Json;
use common::DateTime;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::user,
    query,
};
use uuid::Uuid;

use crate::{define_error, AsError, Context, Error, Session};

/// A marketplace user.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier of this `User`.
    pub id: Uuid,

    /// Name of this `User`.
    pub name: String,

    /// Login of this `User`.
    pub login: String,

    /// Email address of this `User`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number of this `User`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Indicator whether this `User` is an administrator.
    pub is_admin: bool,

    /// `DateTime` when this `User` was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: DateTime,
}

impl From<service::domain::User> for User {
    fn from(user: service::domain::User) -> Self {
        Self {
            id: user.id.into(),
            name: user.name.to_string(),
            login: user.login.to_string(),
            email: user.email.map(|e| e.to_string()),
            phone: user.phone.map(|p| p.to_string()),
            is_admin: user.is_admin,
            created_at: user.created_at.coerce(),
        }
    }
}

/// Body of the [`signup()`] handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Name of a new `User`.
    pub name: String,

    /// Login of a new `User`.
    pub login: String,

    /// Password of a new `User`.
    pub password: String,

    /// Email address of a new `User`.
    pub email: Option<String>,

    /// Phone number of a new `User`.
    pub phone: Option<String>,
}

/// Body of the [`signin()`] handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    /// Login of the `User`.
    pub login: String,

    /// Password of the `User`.
    pub password: String,
}

/// Response of the [`signup()`] and [`signin()`] handlers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Authentication token of the created session.
    pub token: String,

    /// `DateTime` when the session expires.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub expires_at: DateTime,

    /// The authenticated `User`.
    pub user: User,
}

impl From<command::create_user_session::Output> for SessionResponse {
    fn from(output: command::create_user_session::Output) -> Self {
        Self {
            token: output.token.to_string(),
            expires_at: output.expires_at.coerce(),
            user: output.user.into(),
        }
    }
}

/// Handles the `POST /users` request.
///
/// Creates a new `User` with the provided credentials and contact info, and
/// signs it in right away.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_*` - some field of the body is malformed;
/// - `NO_CONTACT_INFO` - neither email nor phone is provided;
/// - `LOGIN_OCCUPIED` - the provided login is occupied by another `User`.
#[tracing::instrument(skip_all, fields(http.route = "POST /users"))]
pub async fn signup(
    ctx: Context,
    Json(req): Json<SignupRequest>,
) -> Result<(http::StatusCode, Json<SessionResponse>), Error> {
    let SignupRequest {
        name,
        login,
        password,
        email,
        phone,
    } = req;

    let password =
        user::Password::new(password).ok_or(InputError::Password)?;
    let user = ctx
        .service()
        .execute(command::CreateUser {
            name: user::Name::new(name).ok_or(InputError::Name)?,
            login: user::Login::new(login).ok_or(InputError::Login)?,
            password: SecretBox::init_with(move || password),
            email: email
                .map(|e| user::Email::new(e).ok_or(InputError::Email))
                .transpose()?,
            phone: phone
                .map(|p| user::Phone::new(p).ok_or(InputError::Phone))
                .transpose()?,
        })
        .await
        .map_err(AsError::into_error)?;

    let output = ctx
        .service()
        .execute(command::CreateUserSession::ByUserId(user.id))
        .await
        .map_err(AsError::into_error)?;

    ctx.set_current_session(Session {
        user_id: output.user.id,
        is_admin: output.user.is_admin,
        token: output.token.clone(),
        expires_at: output.expires_at.coerce(),
    })
    .await;

    Ok((http::StatusCode::CREATED, Json(output.into())))
}

/// Handles the `POST /users/sessions` request.
///
/// # Errors
///
/// Possible error codes:
/// - `WRONG_CREDENTIALS` - the provided credentials don't match any `User`.
#[tracing::instrument(skip_all, fields(http.route = "POST /users/sessions"))]
pub async fn signin(
    ctx: Context,
    Json(req): Json<SigninRequest>,
) -> Result<Json<SessionResponse>, Error> {
    let SigninRequest { login, password } = req;

    let password =
        user::Password::new(password).ok_or(InputError::Password)?;
    let output = ctx
        .service()
        .execute(command::CreateUserSession::ByCredentials {
            login: user::Login::new(login).ok_or(InputError::Login)?,
            password: SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;

    ctx.set_current_session(Session {
        user_id: output.user.id,
        is_admin: output.user.is_admin,
        token: output.token.clone(),
        expires_at: output.expires_at.coerce(),
    })
    .await;

    Ok(Json(output.into()))
}

/// Handles the `GET /users/me` request.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `USER_NOT_EXISTS` - the authenticated `User` no longer exists.
#[tracing::instrument(skip_all, fields(http.route = "GET /users/me"))]
pub async fn me(ctx: Context) -> Result<Json<User>, Error> {
    let my_id = ctx.current_session().await?.user_id;

    ctx.service()
        .execute(query::user::ById::by(my_id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| UserError::NotExists.into())
        .map(|u| Json(u.into()))
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LoginOccupied(_) => Some(UserError::LoginOccupied.into()),
            Self::NoContactInfo => Some(UserError::NoContactInfo.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::WrongCredentials => Some(UserError::WrongCredentials.into()),
            // `ByUserId` is only ever used right after a successful signup,
            // so a missing `User` here is an internal inconsistency.
            Self::JsonWebTokenEncodeError(_) | Self::UserNotExists(_) => None,
        }
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "User does not exist"]
        NotExists,

        #[code = "LOGIN_OCCUPIED"]
        #[status = BAD_REQUEST]
        #[message = "Provided login is occupied by another user"]
        LoginOccupied,

        #[code = "NO_CONTACT_INFO"]
        #[status = BAD_REQUEST]
        #[message = "Either email or phone must be provided"]
        NoContactInfo,

        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong user credentials"]
        WrongCredentials,
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Invalid user name"]
        Name,

        #[code = "INVALID_LOGIN"]
        #[status = BAD_REQUEST]
        #[message = "Invalid user login"]
        Login,

        #[code = "INVALID_PASSWORD"]
        #[status = BAD_REQUEST]
        #[message = "Invalid user password"]
        Password,

        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid email address"]
        Email,

        #[code = "INVALID_PHONE"]
        #[status = BAD_REQUEST]
        #[message = "Invalid phone number"]
        Phone,
    }
}
