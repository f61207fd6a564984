//! [`Viewer`] definitions.

use crate::domain::user;
#[cfg(doc)]
use crate::domain::{Listing, User};

/// Identity a request is performed under.
///
/// Derived from a `Session` token per request and never persisted. A request
/// carrying no (or an unusable) token is performed by the
/// [`Viewer::ANONYMOUS`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Viewer {
    /// ID of the authenticated [`User`], if any.
    pub id: Option<user::Id>,

    /// Indicator whether the authenticated [`User`] is an administrator.
    ///
    /// Always `false` for the [`Viewer::ANONYMOUS`].
    pub is_admin: bool,
}

impl Viewer {
    /// [`Viewer`] of a request carrying no valid `Session`.
    pub const ANONYMOUS: Self = Self {
        id: None,
        is_admin: false,
    };

    /// Creates a new authenticated [`Viewer`].
    #[must_use]
    pub fn authenticated(id: user::Id, is_admin: bool) -> Self {
        Self {
            id: Some(id),
            is_admin,
        }
    }

    /// Indicates whether this [`Viewer`] is the owner of the [`Listing`] with
    /// the provided [`user::Id`].
    #[must_use]
    pub fn owns(&self, owner_id: user::Id) -> bool {
        self.id == Some(owner_id)
    }
}
