//! Domain definitions.

pub mod listing;
pub mod user;
pub mod viewer;

pub use self::{listing::Listing, user::User, viewer::Viewer};
