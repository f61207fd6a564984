//! Abstractions for offset-based pagination.

use derive_more::{Display, Into};

/// Number of items returned by a single page of a listing.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Limit(usize);

impl Limit {
    /// Default [`Limit`] applied when a caller doesn't specify one.
    pub const DEFAULT: Self = Self(9);

    /// Maximum allowed [`Limit`] a caller may request.
    pub const MAX: Self = Self(100);

    /// Creates a new [`Limit`] from the provided value, clamping it into the
    /// `1..=`[`Limit::MAX`] range.
    ///
    /// Zero or negative values fall back to [`Limit::DEFAULT`].
    #[must_use]
    pub fn new<Num>(num: Num) -> Self
    where
        Num: TryInto<usize>,
    {
        match num.try_into() {
            Ok(0) | Err(_) => Self::DEFAULT,
            Ok(n) => Self(n.min(Self::MAX.0)),
        }
    }

    /// Returns this [`Limit`] as a [`usize`].
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of items skipped before the first returned one.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Offset(usize);

impl Offset {
    /// Creates a new [`Offset`] from the provided value.
    ///
    /// Negative values fall back to `0`.
    #[must_use]
    pub fn new<Num>(num: Num) -> Self
    where
        Num: TryInto<usize>,
    {
        Self(num.try_into().unwrap_or(0))
    }

    /// Returns this [`Offset`] as a [`usize`].
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Pagination arguments of a list selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Arguments {
    /// [`Limit`] of the selection.
    pub limit: Limit,

    /// [`Offset`] of the selection.
    pub offset: Offset,
}

impl Arguments {
    /// Creates new [`Arguments`] from the provided optional raw values,
    /// falling back to the defaults for absent ones.
    #[must_use]
    pub fn new<L, O>(limit: Option<L>, offset: Option<O>) -> Self
    where
        L: TryInto<usize>,
        O: TryInto<usize>,
    {
        Self {
            limit: limit.map_or(Limit::DEFAULT, Limit::new),
            offset: offset.map_or_else(Offset::default, Offset::new),
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Limit, Offset};

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(Limit::new(5_i64).get(), 5);
        assert_eq!(Limit::new(0_i64), Limit::DEFAULT);
        assert_eq!(Limit::new(-3_i64), Limit::DEFAULT);
        assert_eq!(Limit::new(10_000_i64), Limit::MAX);
        assert_eq!(Limit::default().get(), 9);
    }

    #[test]
    fn offset_defaults() {
        assert_eq!(Offset::new(7_i64).get(), 7);
        assert_eq!(Offset::new(-1_i64).get(), 0);
        assert_eq!(Offset::default().get(), 0);
    }

    #[test]
    fn arguments_fall_back_to_defaults() {
        let args = Arguments::new(None::<i64>, None::<i64>);
        assert_eq!(args.limit, Limit::DEFAULT);
        assert_eq!(args.offset.get(), 0);

        let args = Arguments::new(Some(5_i64), Some(18_i64));
        assert_eq!(args.limit.get(), 5);
        assert_eq!(args.offset.get(), 18);
    }
}
