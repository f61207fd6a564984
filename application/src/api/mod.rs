//! REST API definitions.

pub mod listing;
pub mod user;

use axum::{
    routing::{get, post},
    Router,
};

use crate::define_error;

pub use self::{listing::Listing, user::User};

/// Builds the [`Router`] of the REST API.
///
/// The [`Service`] is expected to be attached as an [`Extension`] layer.
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/listings", get(listing::list).post(listing::create))
        .route("/listings/recent", get(listing::recent))
        .route("/listings/stats", get(listing::stats))
        .route("/listings/bulk-approve", post(listing::bulk_approve))
        .route(
            "/listings/:id",
            get(listing::by_id)
                .post(listing::update)
                .delete(listing::delete),
        )
        .route("/listings/:id/approve", post(listing::approve))
        .route("/listings/:id/reject", post(listing::reject))
        .route("/users", post(user::signup))
        .route("/users/sessions", post(user::signin))
        .route("/users/me", get(user::me))
}

define_error! {
    enum PrivilegeError {
        #[code = "NOT_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an administrator"]
        Admin,

        #[code = "NOT_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must own the `Listing` or be an \
                     administrator"]
        Owner,

        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authenticated `User` no longer exists"]
        Session,
    }
}
