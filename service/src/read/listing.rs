//! [`Listing`]-related read definitions.

use derive_more::{Deref, From, Into};
use rust_decimal::Decimal;

#[cfg(doc)]
use crate::domain::Listing;

/// Count of [`Listing`]s changed by a bulk approval sweep.
#[derive(Clone, Copy, Debug, Deref, Eq, From, Hash, Into, PartialEq)]
pub struct BulkApproval(pub u64);

impl PartialEq<u64> for BulkApproval {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

/// Aggregate counters of [`Listing`]s for moderation dashboards.
///
/// Computed by a single selection whose approval predicates are the very
/// expressions the [`list::Scope`] renders, so dashboard numbers cannot
/// drift from actual query results.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stats {
    /// Total number of [`Listing`]s.
    pub total: i64,

    /// Number of approved [`Listing`]s.
    pub approved: i64,

    /// Number of [`Listing`]s awaiting moderation.
    pub pending: i64,

    /// Number of rejected [`Listing`]s.
    pub rejected: i64,

    /// Number of [`Listing`]s placed for rent.
    pub rent: i64,

    /// Number of [`Listing`]s placed for sale.
    pub sale: i64,

    /// Sum of regular prices of approved [`Listing`]s.
    pub approved_price_sum: Decimal,
}

pub mod list {
    //! [`Listing`] list definitions.

    use common::pagination;
    use derive_more::{From, Into};

    use crate::domain::{listing, user, Viewer};
    #[cfg(doc)]
    use crate::domain::Listing;

    /// Selection of a [`Listing`]s page.
    ///
    /// Built once per request and shared verbatim between the page query and
    /// its [`TotalCount`] companion, keeping both derived from a single
    /// predicate.
    #[derive(Clone, Debug)]
    pub struct Selector {
        /// Visibility [`Scope`] of the selection.
        pub scope: Scope,

        /// [`Filter`] clauses of the selection.
        pub filter: Filter,

        /// [`Sort`]ing of the selection.
        pub sort: Sort,

        /// Pagination [`Arguments`] of the selection.
        ///
        /// [`Arguments`]: pagination::Arguments
        pub arguments: pagination::Arguments,
    }

    impl Selector {
        /// Creates a new [`Selector`] for the provided [`Viewer`].
        ///
        /// This is the single entry point deriving a visibility [`Scope`]
        /// from the request: an owner filter matching the [`Viewer`] itself
        /// upgrades the selection to the [`Scope::Owner`] one (and leaves
        /// the [`Filter`] without the redundant owner clause), while any
        /// other owner filter stays a plain clause within the [`Viewer`]'s
        /// scope.
        #[must_use]
        pub fn new(
            viewer: &Viewer,
            approved: Option<bool>,
            mut filter: Filter,
            sort: Sort,
            arguments: pagination::Arguments,
        ) -> Self {
            let scope = Scope::new(viewer, filter.owner_id, approved);
            if matches!(scope, Scope::Owner(_)) {
                filter.owner_id = None;
            }
            Self {
                scope,
                filter,
                sort,
                arguments,
            }
        }
    }

    /// Visibility scope of a [`Listing`]s selection.
    ///
    /// Query-form mirror of [`Listing::is_visible_to()`]: the rendered
    /// clause must keep the result set exactly at the listings the viewer is
    /// permitted to retrieve, without fetching and filtering rows in memory.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Scope {
        /// Administrator selection: every [`Listing`], optionally constrained
        /// to an explicitly requested approval state.
        Admin {
            /// Explicitly requested approval state, if any.
            approved: Option<bool>,
        },

        /// Owner selection: every [`Listing`] of the owner regardless of its
        /// approval state.
        Owner(user::Id),

        /// Public selection: approved [`Listing`]s only.
        Public,
    }

    impl Scope {
        /// Creates a new [`Scope`] for the provided [`Viewer`].
        ///
        /// A requested `owner` yields the [`Scope::Owner`] one only when it
        /// is the authenticated [`Viewer`] itself: anyone else asking for
        /// some user's listings is served the public subset. A requested
        /// `approved` state is honored for administrators only and ignored
        /// otherwise.
        #[must_use]
        pub fn new(
            viewer: &Viewer,
            owner: Option<user::Id>,
            approved: Option<bool>,
        ) -> Self {
            if viewer.is_admin {
                return Self::Admin { approved };
            }
            match owner {
                Some(o) if viewer.owns(o) => Self::Owner(o),
                Some(_) | None => Self::Public,
            }
        }

        /// Indicates whether a [`Listing`] belongs to this [`Scope`].
        ///
        /// In-memory twin of the SQL clause this [`Scope`] renders to. Must
        /// stay in sync with [`Listing::is_visible_to()`].
        #[must_use]
        pub fn allows(&self, listing: &listing::Listing) -> bool {
            match self {
                Self::Admin { approved } => approved
                    .map_or(true, |a| listing.moderation.is_approved() == a),
                Self::Owner(id) => listing.owner_id == *id,
                Self::Public => listing.moderation.is_approved(),
            }
        }
    }

    /// Filter for a [`Listing`]s [`Selector`].
    ///
    /// Every clause is optional and the present ones compose by logical AND.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Owner of the [`Listing`]s to select.
        pub owner_id: Option<user::Id>,

        /// Select discounted [`Listing`]s only.
        pub offer: bool,

        /// Select furnished [`Listing`]s only.
        pub furnished: bool,

        /// Select [`Listing`]s with a parking spot only.
        pub parking: bool,

        /// [`listing::Kind`] of the [`Listing`]s to select.
        ///
        /// [`None`] selects both kinds (the `all` sentinel of the HTTP
        /// layer).
        pub kind: Option<listing::Kind>,

        /// [`listing::Name`] (or its part) to fuzzy search for,
        /// case-insensitively.
        pub name: Option<listing::Name>,
    }

    impl Filter {
        /// Indicates whether a [`Listing`] matches this [`Filter`].
        ///
        /// In-memory twin of the SQL clauses this [`Filter`] renders to.
        #[must_use]
        pub fn matches(&self, listing: &listing::Listing) -> bool {
            self.owner_id.map_or(true, |id| listing.owner_id == id)
                && (!self.offer || listing.offer)
                && (!self.furnished || listing.furnished)
                && (!self.parking || listing.parking)
                && self.kind.map_or(true, |k| listing.kind == k)
                && self.name.as_ref().map_or(true, |n| {
                    AsRef::<str>::as_ref(&listing.name)
                        .to_lowercase()
                        .contains(&AsRef::<str>::as_ref(n).to_lowercase())
                })
        }
    }

    /// Sorting of a [`Listing`]s [`Selector`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Sort {
        /// Field to sort by.
        pub field: Field,

        /// [`Direction`] to sort in.
        pub direction: Direction,
    }

    impl Sort {
        /// Creates a new [`Sort`] from the provided raw parameters.
        ///
        /// An absent or unrecognized field falls back to [`Field::CreatedAt`]
        /// (most recent first). The direction is ascending for the literal
        /// `asc` only and descending otherwise.
        #[must_use]
        pub fn new(field: Option<&str>, direction: Option<&str>) -> Self {
            Self {
                field: field.and_then(Field::from_param).unwrap_or_default(),
                direction: match direction {
                    Some("asc") => Direction::Ascending,
                    Some(_) | None => Direction::Descending,
                },
            }
        }
    }

    impl Default for Sort {
        fn default() -> Self {
            Self::new(None, None)
        }
    }

    /// Field of a [`Listing`] to sort a selection by.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Field {
        /// Sort by the creation [`DateTime`] of a [`Listing`].
        ///
        /// [`DateTime`]: common::DateTime
        #[default]
        CreatedAt,

        /// Sort by the regular [`listing::Price`] of a [`Listing`].
        RegularPrice,
    }

    impl Field {
        /// Parses a [`Field`] from the provided HTTP parameter.
        #[must_use]
        pub fn from_param(param: &str) -> Option<Self> {
            match param {
                "createdAt" | "created_at" => Some(Self::CreatedAt),
                "regularPrice" | "regular_price" => Some(Self::RegularPrice),
                _ => None,
            }
        }
    }

    /// Direction of a [`Sort`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Direction {
        /// Smallest values first.
        Ascending,

        /// Largest values first.
        Descending,
    }

    impl Direction {
        /// Returns the SQL representation of this [`Direction`].
        #[must_use]
        pub fn sql(self) -> &'static str {
            match self {
                Self::Ascending => "ASC",
                Self::Descending => "DESC",
            }
        }
    }

    /// Page of a [`Listing`]s selection.
    ///
    /// Always a (possibly empty) ordered sequence, never an absent value.
    pub type Page = Vec<listing::Listing>;

    /// Total count of [`Listing`]s matching a [`Selector`] disregarding its
    /// pagination.
    #[derive(Clone, Copy, Debug, Eq, From, Into, PartialEq)]
    pub struct TotalCount(i64);

    impl PartialEq<i64> for TotalCount {
        fn eq(&self, other: &i64) -> bool {
            self.0 == *other
        }
    }

    #[cfg(test)]
    mod spec {
        use common::pagination;
        use rust_decimal::Decimal;

        use crate::domain::{listing, user, Viewer};

        use super::{Direction, Field, Filter, Scope, Selector, Sort};

        fn listing(
            owner_id: user::Id,
            moderation: listing::Moderation,
        ) -> listing::Listing {
            listing::Listing {
                id: listing::Id::new(),
                owner_id,
                moderation,
                name: listing::Name::new("Sunny loft").unwrap(),
                description: "Sunny loft in the city center".parse().unwrap(),
                address: "12 Main St".parse().unwrap(),
                kind: listing::Kind::Rent,
                regular_price: listing::Price::new(Decimal::from(1200))
                    .unwrap(),
                discount_price: None,
                offer: false,
                furnished: false,
                parking: false,
                bedrooms: 2,
                bathrooms: 1,
                image_urls: listing::ImageUrls::new(vec![
                    listing::ImageUrl::new("https://img.example.org/1.jpg")
                        .unwrap(),
                ])
                .unwrap(),
                created_at: listing::CreationDateTime::UNIX_EPOCH,
            }
        }

        #[test]
        fn public_scope_ignores_requested_approval() {
            let scope = Scope::new(&Viewer::ANONYMOUS, None, Some(false));
            assert_eq!(scope, Scope::Public);

            let user = Viewer::authenticated(user::Id::new(), false);
            assert_eq!(Scope::new(&user, None, Some(false)), Scope::Public);
        }

        #[test]
        fn admin_scope_honors_requested_approval() {
            let admin = Viewer::authenticated(user::Id::new(), true);

            assert_eq!(
                Scope::new(&admin, None, None),
                Scope::Admin { approved: None },
            );
            assert_eq!(
                Scope::new(&admin, None, Some(false)),
                Scope::Admin {
                    approved: Some(false),
                },
            );
        }

        #[test]
        fn owner_scope_requires_matching_viewer() {
            let me = user::Id::new();
            let viewer = Viewer::authenticated(me, false);

            assert_eq!(Scope::new(&viewer, Some(me), None), Scope::Owner(me));

            // Someone else's listings are served as the public subset.
            let other = user::Id::new();
            assert_eq!(Scope::new(&viewer, Some(other), None), Scope::Public);
            assert_eq!(
                Scope::new(&Viewer::ANONYMOUS, Some(other), None),
                Scope::Public,
            );
        }

        #[test]
        fn selector_drops_owner_clause_for_owner_scope() {
            let me = user::Id::new();
            let viewer = Viewer::authenticated(me, false);

            let selector = Selector::new(
                &viewer,
                None,
                Filter {
                    owner_id: Some(me),
                    ..Filter::default()
                },
                Sort::default(),
                pagination::Arguments::default(),
            );
            assert_eq!(selector.scope, Scope::Owner(me));
            assert_eq!(selector.filter.owner_id, None);

            let other = user::Id::new();
            let selector = Selector::new(
                &viewer,
                None,
                Filter {
                    owner_id: Some(other),
                    ..Filter::default()
                },
                Sort::default(),
                pagination::Arguments::default(),
            );
            assert_eq!(selector.scope, Scope::Public);
            assert_eq!(selector.filter.owner_id, Some(other));
        }

        #[test]
        fn scope_agrees_with_visibility_predicate() {
            let owner = user::Id::new();
            let viewers = [
                Viewer::ANONYMOUS,
                Viewer::authenticated(owner, false),
                Viewer::authenticated(user::Id::new(), false),
                Viewer::authenticated(user::Id::new(), true),
            ];
            let states = [
                listing::Moderation::Pending,
                listing::Moderation::Approved,
                listing::Moderation::Rejected {
                    reason: listing::RejectionReason::or_default(None),
                },
            ];

            for viewer in viewers {
                for moderation in &states {
                    let l = listing(owner, moderation.clone());
                    let owner_filter =
                        viewer.id.filter(|id| *id == owner);
                    let scope = Scope::new(&viewer, owner_filter, None);
                    assert_eq!(
                        scope.allows(&l),
                        l.is_visible_to(&viewer),
                        "scope {scope:?} disagrees with visibility of \
                         {moderation:?} for {viewer:?}",
                    );
                }
            }
        }

        #[test]
        fn public_scope_never_allows_unapproved() {
            let scope = Scope::new(&Viewer::ANONYMOUS, None, None);
            let l = listing(user::Id::new(), listing::Moderation::Pending);
            assert!(!scope.allows(&l));
        }

        #[test]
        fn filter_composes_by_logical_and() {
            let owner = user::Id::new();
            let mut l = listing(owner, listing::Moderation::Approved);
            l.offer = true;
            l.furnished = true;

            let filter = Filter {
                offer: true,
                furnished: true,
                kind: Some(listing::Kind::Rent),
                name: Some(listing::Name::new("LOFT").unwrap()),
                ..Filter::default()
            };
            assert!(filter.matches(&l));

            let filter = Filter {
                parking: true,
                ..filter
            };
            assert!(!filter.matches(&l));
        }

        #[test]
        fn name_filter_is_case_insensitive() {
            let l = listing(user::Id::new(), listing::Moderation::Approved);

            for term in ["loft", "LOFT", "Sunny l"] {
                let filter = Filter {
                    name: Some(listing::Name::new(term).unwrap()),
                    ..Filter::default()
                };
                assert!(filter.matches(&l), "term `{term}` should match");
            }

            let filter = Filter {
                name: Some(listing::Name::new("villa").unwrap()),
                ..Filter::default()
            };
            assert!(!filter.matches(&l));
        }

        #[test]
        fn sort_defaults_to_most_recent_first() {
            assert_eq!(
                Sort::default(),
                Sort {
                    field: Field::CreatedAt,
                    direction: Direction::Descending,
                },
            );

            assert_eq!(
                Sort::new(Some("regularPrice"), Some("asc")),
                Sort {
                    field: Field::RegularPrice,
                    direction: Direction::Ascending,
                },
            );

            // Anything but the literal `asc` sorts descending, and an
            // unknown field falls back to the creation time.
            assert_eq!(Sort::new(Some("__proto__"), Some("desc")), Sort::default());
            assert_eq!(
                Sort::new(Some("created_at"), Some("ASC")).direction,
                Direction::Descending,
            );
        }
    }
}
