//! [`Listing`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{user, Viewer};

/// Property listing placed on the marketplace.
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// ID of the [`User`] who created this [`Listing`].
    ///
    /// Immutable after creation.
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// [`Moderation`] state of this [`Listing`].
    pub moderation: Moderation,

    /// [`Name`] of this [`Listing`].
    pub name: Name,

    /// [`Description`] of this [`Listing`].
    pub description: Description,

    /// [`Address`] of this [`Listing`].
    pub address: Address,

    /// [`Kind`] of this [`Listing`].
    pub kind: Kind,

    /// Regular [`Price`] of this [`Listing`].
    pub regular_price: Price,

    /// Discounted [`Price`] of this [`Listing`].
    ///
    /// Meaningful only when `offer` is set, and must not exceed the
    /// `regular_price`.
    pub discount_price: Option<Price>,

    /// Indicator whether this [`Listing`] has an active discount offer.
    pub offer: bool,

    /// Indicator whether the property is furnished.
    pub furnished: bool,

    /// Indicator whether the property has a parking spot.
    pub parking: bool,

    /// Number of bedrooms in the property.
    pub bedrooms: RoomCount,

    /// Number of bathrooms in the property.
    pub bathrooms: RoomCount,

    /// [`ImageUrls`] of this [`Listing`].
    ///
    /// The first one is the cover image.
    pub image_urls: ImageUrls,

    /// [`DateTime`] when this [`Listing`] was created.
    pub created_at: CreationDateTime,
}

impl Listing {
    /// Indicates whether the provided [`Viewer`] is permitted to retrieve
    /// this [`Listing`].
    ///
    /// An approved [`Listing`] is visible to everyone. An unapproved one is
    /// visible to its owner and to administrators only.
    #[must_use]
    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        self.moderation.is_approved()
            || viewer.owns(self.owner_id)
            || viewer.is_admin
    }
}

/// Moderation state of a [`Listing`].
///
/// Persisted as the `approved` flag (the single source of truth for public
/// visibility) alongside an optional rejection reason: an unapproved
/// [`Listing`] carrying a reason is [`Rejected`], one without is [`Pending`].
///
/// [`Pending`]: Moderation::Pending
/// [`Rejected`]: Moderation::Rejected
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Moderation {
    /// [`Listing`] awaits an administrator's decision.
    Pending,

    /// [`Listing`] is publicly visible.
    Approved,

    /// [`Listing`] was rejected by an administrator.
    Rejected {
        /// Reason of the rejection, shown to the owner.
        reason: RejectionReason,
    },
}

impl Moderation {
    /// Returns the initial [`Moderation`] state of a newly created
    /// [`Listing`].
    ///
    /// Listings authored by administrators need no review.
    #[must_use]
    pub fn initial(by_admin: bool) -> Self {
        if by_admin {
            Self::Approved
        } else {
            Self::Pending
        }
    }

    /// Transitions this [`Moderation`] state into [`Moderation::Approved`].
    ///
    /// Clears any rejection reason.
    #[must_use]
    pub fn approve(self) -> Self {
        Self::Approved
    }

    /// Transitions this [`Moderation`] state into [`Moderation::Rejected`]
    /// with the provided reason.
    ///
    /// Re-rejection overwrites a previous reason.
    #[must_use]
    pub fn reject(self, reason: RejectionReason) -> Self {
        Self::Rejected { reason }
    }

    /// Applies a raw `approved` flag to this [`Moderation`] state.
    ///
    /// Approving clears any rejection reason, while revoking an approval
    /// keeps an existing rejection intact and turns anything else into
    /// [`Moderation::Pending`].
    #[must_use]
    pub fn with_approved(self, approved: bool) -> Self {
        match (approved, self) {
            (true, Self::Pending | Self::Approved | Self::Rejected { .. }) => {
                Self::Approved
            }
            (false, r @ Self::Rejected { .. }) => r,
            (false, Self::Pending | Self::Approved) => Self::Pending,
        }
    }

    /// Indicates whether this [`Moderation`] state is
    /// [`Moderation::Approved`].
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns the [`RejectionReason`] of this [`Moderation`] state, if any.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&RejectionReason> {
        match self {
            Self::Rejected { reason } => Some(reason),
            Self::Pending | Self::Approved => None,
        }
    }
}

/// ID of a [`Listing`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Description of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Address of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Listing`] placement."]
    enum Kind {
        #[doc = "Property placed for rent."]
        Rent = 1,

        #[doc = "Property placed for sale."]
        Sale = 2,
    }
}

/// Price of a [`Listing`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `amount` is positive.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a new [`Price`] if the given `amount` is positive.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount > Decimal::ZERO).then_some(Self(amount))
    }

    /// Returns the amount of this [`Price`].
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }
}

/// URL of a [`Listing`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `url` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && !url.is_empty() && url.len() <= 2048
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Ordered non-empty collection of [`ImageUrl`]s of a [`Listing`].
#[derive(AsRef, Clone, Debug, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref([ImageUrl])]
pub struct ImageUrls(Vec<ImageUrl>);

impl ImageUrls {
    /// Creates new [`ImageUrls`] if the given `urls` are not empty.
    #[must_use]
    pub fn new(urls: Vec<ImageUrl>) -> Option<Self> {
        (!urls.is_empty()).then_some(Self(urls))
    }

    /// Returns the cover [`ImageUrl`] of a [`Listing`].
    #[expect(clippy::missing_panics_doc, reason = "cannot be empty")]
    #[must_use]
    pub fn cover(&self) -> &ImageUrl {
        self.0.first().expect("cannot be empty")
    }
}

/// Rejection reason of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct RejectionReason(String);

impl RejectionReason {
    /// [`RejectionReason`] used when an administrator provides none.
    pub const DEFAULT: &'static str = "Rejected by administrator";

    /// Creates a new [`RejectionReason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reason` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Creates a new [`RejectionReason`] if the given `reason` is valid.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        Self::check(&reason).then_some(Self(reason))
    }

    /// Creates a new [`RejectionReason`] from the provided optional `reason`,
    /// falling back to the [`RejectionReason::DEFAULT`] one when it's absent,
    /// empty or malformed.
    #[must_use]
    pub fn or_default(reason: Option<String>) -> Self {
        reason
            .and_then(Self::new)
            .unwrap_or(Self(Self::DEFAULT.to_owned()))
    }

    /// Checks whether the given `reason` is a valid [`RejectionReason`].
    fn check(reason: impl AsRef<str>) -> bool {
        let reason = reason.as_ref();
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 512
    }
}

impl FromStr for RejectionReason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RejectionReason`")
    }
}

/// Number of rooms of some sort in a [`Listing`].
pub type RoomCount = u16;

/// [`DateTime`] when a [`Listing`] was created.
pub type CreationDateTime = DateTimeOf<(Listing, unit::Creation)>;

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::{user, Viewer};

    use super::{
        CreationDateTime, Id, ImageUrl, ImageUrls, Kind, Listing, Moderation,
        Name, Price, RejectionReason,
    };

    fn listing(owner_id: user::Id, moderation: Moderation) -> Listing {
        Listing {
            id: Id::new(),
            owner_id,
            moderation,
            name: Name::new("Sunny loft").unwrap(),
            description: "Sunny loft in the city center".parse().unwrap(),
            address: "12 Main St".parse().unwrap(),
            kind: Kind::Rent,
            regular_price: Price::new(Decimal::from(1200)).unwrap(),
            discount_price: None,
            offer: false,
            furnished: true,
            parking: false,
            bedrooms: 2,
            bathrooms: 1,
            image_urls: ImageUrls::new(vec![ImageUrl::new(
                "https://img.example.org/1.jpg",
            )
            .unwrap()])
            .unwrap(),
            created_at: CreationDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn anonymous_sees_approved_only() {
        let owner = user::Id::new();

        for (moderation, expected) in [
            (Moderation::Pending, false),
            (Moderation::Approved, true),
            (
                Moderation::Rejected {
                    reason: RejectionReason::new("poor photos").unwrap(),
                },
                false,
            ),
        ] {
            let l = listing(owner, moderation.clone());
            assert_eq!(
                l.is_visible_to(&Viewer::ANONYMOUS),
                expected,
                "anonymous visibility of {moderation:?}",
            );
            assert_eq!(
                l.is_visible_to(&Viewer::ANONYMOUS),
                l.moderation.is_approved(),
            );
        }
    }

    #[test]
    fn owner_always_sees_own_listing() {
        let owner = user::Id::new();

        for moderation in [
            Moderation::Pending,
            Moderation::Approved,
            Moderation::Rejected {
                reason: RejectionReason::or_default(None),
            },
        ] {
            let l = listing(owner, moderation);
            assert!(l.is_visible_to(&Viewer::authenticated(owner, false)));
        }
    }

    #[test]
    fn admin_always_sees_everything() {
        let l = listing(user::Id::new(), Moderation::Pending);
        let admin = Viewer::authenticated(user::Id::new(), true);
        assert!(l.is_visible_to(&admin));
    }

    #[test]
    fn other_user_sees_approved_only() {
        let other = Viewer::authenticated(user::Id::new(), false);

        let l = listing(user::Id::new(), Moderation::Pending);
        assert!(!l.is_visible_to(&other));

        let l = listing(user::Id::new(), Moderation::Approved);
        assert!(l.is_visible_to(&other));
    }

    #[test]
    fn initial_state_depends_on_author_role() {
        assert_eq!(Moderation::initial(true), Moderation::Approved);
        assert_eq!(Moderation::initial(false), Moderation::Pending);
    }

    #[test]
    fn approval_clears_rejection_reason() {
        let rejected = Moderation::Pending
            .reject(RejectionReason::new("poor photos").unwrap());
        assert_eq!(
            rejected.rejection_reason().map(AsRef::as_ref),
            Some("poor photos"),
        );

        let approved = rejected.approve();
        assert_eq!(approved, Moderation::Approved);
        assert_eq!(approved.rejection_reason(), None);
    }

    #[test]
    fn rejection_overwrites_previous_reason() {
        let state = Moderation::Approved
            .reject(RejectionReason::new("first").unwrap())
            .reject(RejectionReason::new("second").unwrap());
        assert_eq!(
            state.rejection_reason().map(AsRef::as_ref),
            Some("second"),
        );
    }

    #[test]
    fn raw_approved_flag_keeps_rejection() {
        let rejected = Moderation::Pending
            .reject(RejectionReason::new("poor photos").unwrap());

        assert_eq!(
            rejected.clone().with_approved(false),
            rejected,
            "revoking approval of a rejected listing keeps the reason",
        );
        assert_eq!(rejected.with_approved(true), Moderation::Approved);
        assert_eq!(
            Moderation::Approved.with_approved(false),
            Moderation::Pending,
        );
    }

    #[test]
    fn rejection_reason_falls_back_to_default() {
        assert_eq!(
            AsRef::<str>::as_ref(&RejectionReason::or_default(None)),
            RejectionReason::DEFAULT,
        );
        assert_eq!(
            AsRef::<str>::as_ref(&RejectionReason::or_default(Some(String::new()))),
            RejectionReason::DEFAULT,
        );
        assert_eq!(
            AsRef::<str>::as_ref(&RejectionReason::or_default(Some("spam".to_owned()))),
            "spam",
        );
    }

    #[test]
    fn image_urls_cannot_be_empty() {
        assert!(ImageUrls::new(vec![]).is_none());

        let urls = ImageUrls::new(vec![
            ImageUrl::new("https://img.example.org/cover.jpg").unwrap(),
            ImageUrl::new("https://img.example.org/2.jpg").unwrap(),
        ])
        .unwrap();
        assert_eq!(AsRef::<str>::as_ref(urls.cover()), "https://img.example.org/cover.jpg");
    }

    #[test]
    fn price_must_be_positive() {
        assert!(Price::new(Decimal::from(100)).is_some());
        assert!(Price::new(Decimal::ZERO).is_none());
        assert!(Price::new(Decimal::from(-5)).is_none());
    }

    #[test]
    fn id_is_random() {
        assert_ne!(Uuid::from(Id::new()), Uuid::from(Id::new()));
    }
}
