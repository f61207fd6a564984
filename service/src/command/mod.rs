//! [`Command`] definition.

pub mod approve_listing;
pub mod authorize_user_session;
pub mod bulk_approve_listings;
pub mod create_listing;
pub mod create_user;
pub mod create_user_session;
pub mod delete_listing;
pub mod reject_listing;
pub mod update_listing;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_listing::ApproveListing,
    authorize_user_session::AuthorizeUserSession,
    bulk_approve_listings::BulkApproveListings,
    create_listing::CreateListing, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_listing::DeleteListing,
    reject_listing::RejectListing, update_listing::UpdateListing,
};
