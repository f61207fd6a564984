//! [`Query`] collection related to the multiple [`Listing`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Listing, Query};

use super::DatabaseQuery;

/// Queries a page of [`Listing`]s visible within a
/// [`read::listing::list::Selector`].
pub type List =
    DatabaseQuery<By<read::listing::list::Page, read::listing::list::Selector>>;

/// Queries the total count of [`Listing`]s matching a
/// [`read::listing::list::Selector`] disregarding its pagination.
///
/// Shares the selector (and therefore the rendered predicate) with [`List`],
/// so page counts cannot disagree with the listed data.
pub type TotalCount = DatabaseQuery<
    By<read::listing::list::TotalCount, read::listing::list::Selector>,
>;

/// Queries the aggregate [`read::listing::Stats`] of all [`Listing`]s.
pub type Stats = DatabaseQuery<By<read::listing::Stats, ()>>;
