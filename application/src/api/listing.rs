//! [`Listing`]-related definitions.

use axum::{
    extract::{Path, Query},
    Json,
};
use common::{pagination, DateTime};
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{listing, user, Viewer},
    query, read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// A property listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique identifier of this `Listing`.
    pub id: Uuid,

    /// Identifier of the `User` owning this `Listing`.
    pub owner_id: Uuid,

    /// Indicator whether this `Listing` is publicly visible.
    pub approved: bool,

    /// Reason of the rejection of this `Listing`.
    ///
    /// Serialized for the owner and administrators only, never in public
    /// views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Name of this `Listing`.
    pub name: String,

    /// Description of this `Listing`.
    pub description: String,

    /// Address of this `Listing`.
    pub address: String,

    /// Kind of this `Listing` placement.
    #[serde(rename = "type")]
    pub kind: Kind,

    /// Regular price of this `Listing`.
    pub regular_price: f64,

    /// Discounted price of this `Listing`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,

    /// Indicator whether this `Listing` has an active discount offer.
    pub offer: bool,

    /// Indicator whether the property is furnished.
    pub furnished: bool,

    /// Indicator whether the property has a parking spot.
    pub parking: bool,

    /// Number of bedrooms in the property.
    pub bedrooms: u16,

    /// Number of bathrooms in the property.
    pub bathrooms: u16,

    /// Image URLs of this `Listing`, the first one being the cover.
    pub image_urls: Vec<String>,

    /// `DateTime` when this `Listing` was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: DateTime,
}

impl Listing {
    /// Creates a new [`Listing`] representation of the provided
    /// [`listing::Listing`] for the provided [`Viewer`].
    ///
    /// Moderation internals (the rejection reason) are serialized only when
    /// the [`Viewer`] is the owner or an administrator.
    fn new(listing: service::domain::Listing, viewer: &Viewer) -> Self {
        let moderator_view =
            viewer.is_admin || viewer.owns(listing.owner_id);

        Self {
            id: listing.id.into(),
            owner_id: listing.owner_id.into(),
            approved: listing.moderation.is_approved(),
            rejection_reason: moderator_view
                .then(|| {
                    listing
                        .moderation
                        .rejection_reason()
                        .map(ToString::to_string)
                })
                .flatten(),
            name: listing.name.to_string(),
            description: listing.description.to_string(),
            address: listing.address.to_string(),
            kind: listing.kind.into(),
            regular_price: listing
                .regular_price
                .amount()
                .to_f64()
                .unwrap_or_default(),
            discount_price: listing
                .discount_price
                .map(|p| p.amount().to_f64().unwrap_or_default()),
            offer: listing.offer,
            furnished: listing.furnished,
            parking: listing.parking,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            image_urls: Vec::from(listing.image_urls)
                .into_iter()
                .map(Into::into)
                .collect(),
            created_at: listing.created_at.coerce(),
        }
    }
}

/// Kind of a `Listing` placement.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Property placed for rent.
    Rent,

    /// Property placed for sale.
    Sale,
}

impl Kind {
    /// Parses a [`Kind`] from the provided HTTP parameter.
    fn from_param(param: &str) -> Option<Self> {
        match param {
            "rent" => Some(Self::Rent),
            "sale" => Some(Self::Sale),
            _ => None,
        }
    }
}

impl From<listing::Kind> for Kind {
    fn from(kind: listing::Kind) -> Self {
        match kind {
            listing::Kind::Rent => Self::Rent,
            listing::Kind::Sale => Self::Sale,
        }
    }
}

impl From<Kind> for listing::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Rent => Self::Rent,
            Kind::Sale => Self::Sale,
        }
    }
}

/// Query parameters of the [`list()`] handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Requested approval state (`true`/`false`), honored for
    /// administrators only.
    pub approved: Option<String>,

    /// Identifier of the `User` whose `Listing`s to select.
    pub user_ref: Option<Uuid>,

    /// Select discounted `Listing`s only.
    pub offer: Option<bool>,

    /// Select furnished `Listing`s only.
    pub furnished: Option<bool>,

    /// Select `Listing`s with a parking spot only.
    pub parking: Option<bool>,

    /// Kind of `Listing`s to select, with `all` selecting both.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Term to fuzzy search `Listing` names for.
    pub search_term: Option<String>,

    /// Field to sort the selection by.
    pub sort: Option<String>,

    /// Direction to sort the selection in (`asc`/`desc`).
    pub order: Option<String>,

    /// Number of `Listing`s to return.
    pub limit: Option<i64>,

    /// Number of `Listing`s to skip.
    pub start_index: Option<i64>,
}

impl ListParams {
    /// Builds a [`read::listing::list::Selector`] out of these [`ListParams`]
    /// on behalf of the provided [`Viewer`].
    ///
    /// # Errors
    ///
    /// Errors if some parameter is malformed.
    fn into_selector(
        self,
        viewer: &Viewer,
    ) -> Result<read::listing::list::Selector, Error> {
        let approved = match self.approved.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) | None => None,
        };

        let kind = match self.kind.as_deref() {
            None | Some("all") => None,
            Some(param) => Some(
                Kind::from_param(param).ok_or(InputError::Type)?.into(),
            ),
        };

        let name = match self.search_term.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(term) => Some(
                listing::Name::new(term).ok_or(InputError::SearchTerm)?,
            ),
        };

        let filter = read::listing::list::Filter {
            owner_id: self.user_ref.map(Into::into),
            offer: self.offer == Some(true),
            furnished: self.furnished == Some(true),
            parking: self.parking == Some(true),
            kind,
            name,
        };
        let sort = read::listing::list::Sort::new(
            self.sort.as_deref(),
            self.order.as_deref(),
        );
        let arguments =
            pagination::Arguments::new(self.limit, self.start_index);

        Ok(read::listing::list::Selector::new(
            viewer, approved, filter, sort, arguments,
        ))
    }
}

/// Response of the [`list()`] handler.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    /// Page of the selected `Listing`s.
    pub listings: Vec<Listing>,

    /// Total count of `Listing`s matching the selection disregarding its
    /// pagination.
    pub total_count: i64,
}

/// Handles the `GET /listings` request.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_TYPE` - unrecognized `type` parameter;
/// - `INVALID_SEARCH_TERM` - malformed `searchTerm` parameter.
#[tracing::instrument(skip_all, fields(http.route = "GET /listings"))]
pub async fn list(
    ctx: Context,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, Error> {
    let viewer = ctx.viewer().await;
    let selector = params.into_selector(&viewer)?;

    let listings = ctx
        .service()
        .execute(query::listings::List::by(selector.clone()))
        .await
        .map_err(AsError::into_error)?;
    let total_count = ctx
        .service()
        .execute(query::listings::TotalCount::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(ListResponse {
        listings: listings
            .into_iter()
            .map(|l| Listing::new(l, &viewer))
            .collect(),
        total_count: total_count.into(),
    }))
}

/// Handles the `GET /listings/recent` request.
///
/// Returns the most recently created `Listing`s visible to the requester:
/// administrators see every moderation state, everyone else the approved
/// ones only.
#[tracing::instrument(skip_all, fields(http.route = "GET /listings/recent"))]
pub async fn recent(ctx: Context) -> Result<Json<Vec<Listing>>, Error> {
    /// Number of `Listing`s returned by the recent selection.
    const LIMIT: i64 = 5;

    let viewer = ctx.viewer().await;
    let selector = read::listing::list::Selector::new(
        &viewer,
        None,
        read::listing::list::Filter::default(),
        read::listing::list::Sort::default(),
        pagination::Arguments::new(Some(LIMIT), None::<i64>),
    );

    let listings = ctx
        .service()
        .execute(query::listings::List::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(
        listings
            .into_iter()
            .map(|l| Listing::new(l, &viewer))
            .collect(),
    ))
}

/// Aggregate counters of `Listing`s.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Total number of `Listing`s.
    pub total: i64,

    /// Number of approved `Listing`s.
    pub approved: i64,

    /// Number of `Listing`s awaiting moderation.
    pub pending: i64,

    /// Number of rejected `Listing`s.
    pub rejected: i64,

    /// Number of `Listing`s placed for rent.
    pub rent: i64,

    /// Number of `Listing`s placed for sale.
    pub sale: i64,

    /// Sum of regular prices of approved `Listing`s.
    pub approved_price_sum: f64,
}

/// Handles the `GET /listings/stats` request.
#[tracing::instrument(skip_all, fields(http.route = "GET /listings/stats"))]
pub async fn stats(ctx: Context) -> Result<Json<Stats>, Error> {
    let stats = ctx
        .service()
        .execute(query::listings::Stats::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Stats {
        total: stats.total,
        approved: stats.approved,
        pending: stats.pending,
        rejected: stats.rejected,
        rent: stats.rent,
        sale: stats.sale,
        approved_price_sum: stats
            .approved_price_sum
            .to_f64()
            .unwrap_or_default(),
    }))
}

/// Handles the `GET /listings/:id` request.
///
/// # Errors
///
/// Possible error codes:
/// - `LISTING_NOT_EXISTS` - the `Listing` is absent or not visible to the
///                          requester.
#[tracing::instrument(skip_all, fields(listing.id = %id))]
pub async fn by_id(
    ctx: Context,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, Error> {
    let viewer = ctx.viewer().await;

    // An invisible `Listing` is indistinguishable from an absent one, so
    // pending and rejected content never leaks through probing.
    let listing = ctx
        .service()
        .execute(query::listing::ById::by(id.into()))
        .await
        .map_err(AsError::into_error)?
        .filter(|l| l.is_visible_to(&viewer))
        .ok_or(ListingError::NotExists)?;

    Ok(Json(Listing::new(listing, &viewer)))
}

/// Body of the [`create()`] handler.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Name of a new `Listing`.
    pub name: String,

    /// Description of a new `Listing`.
    pub description: String,

    /// Address of a new `Listing`.
    pub address: String,

    /// Kind of a new `Listing` placement.
    #[serde(rename = "type")]
    pub kind: Kind,

    /// Regular price of a new `Listing`.
    pub regular_price: f64,

    /// Discounted price of a new `Listing`.
    pub discount_price: Option<f64>,

    /// Indicator whether a new `Listing` has an active discount offer.
    #[serde(default)]
    pub offer: bool,

    /// Indicator whether the property is furnished.
    #[serde(default)]
    pub furnished: bool,

    /// Indicator whether the property has a parking spot.
    #[serde(default)]
    pub parking: bool,

    /// Number of bedrooms in the property.
    pub bedrooms: u16,

    /// Number of bathrooms in the property.
    pub bathrooms: u16,

    /// Image URLs of a new `Listing`.
    pub image_urls: Vec<String>,
}

impl CreateRequest {
    /// Builds a [`command::CreateListing`] out of this [`CreateRequest`].
    ///
    /// # Errors
    ///
    /// Errors if some field is malformed.
    fn into_command(
        self,
        author_id: user::Id,
    ) -> Result<command::CreateListing, Error> {
        Ok(command::CreateListing {
            author_id,
            name: listing::Name::new(self.name).ok_or(InputError::Name)?,
            description: listing::Description::new(self.description)
                .ok_or(InputError::Description)?,
            address: listing::Address::new(self.address)
                .ok_or(InputError::Address)?,
            kind: self.kind.into(),
            regular_price: price(self.regular_price)?,
            discount_price: self.discount_price.map(price).transpose()?,
            offer: self.offer,
            furnished: self.furnished,
            parking: self.parking,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            image_urls: image_urls(self.image_urls)?,
        })
    }
}

/// Handles the `POST /listings` request.
///
/// The initial moderation state is decided by the author's verified role:
/// any `approved` field in the body is ignored.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `INVALID_*` - some field of the body is malformed;
/// - `EMPTY_IMAGE_URLS` - the image list is empty;
/// - `DISCOUNT_ABOVE_REGULAR_PRICE` - the discounted price exceeds the
///                                    regular one.
#[tracing::instrument(skip_all, fields(http.route = "POST /listings"))]
pub async fn create(
    ctx: Context,
    Json(req): Json<CreateRequest>,
) -> Result<(http::StatusCode, Json<Listing>), Error> {
    let session = ctx.current_session().await?;

    let listing = ctx
        .service()
        .execute(req.into_command(session.user_id)?)
        .await
        .map_err(AsError::into_error)?;

    Ok((
        http::StatusCode::CREATED,
        Json(Listing::new(listing, &session.viewer())),
    ))
}

/// Body of the [`update()`] handler.
///
/// Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// New name of the `Listing`.
    pub name: Option<String>,

    /// New description of the `Listing`.
    pub description: Option<String>,

    /// New address of the `Listing`.
    pub address: Option<String>,

    /// New kind of the `Listing` placement.
    #[serde(rename = "type")]
    pub kind: Option<Kind>,

    /// New regular price of the `Listing`.
    pub regular_price: Option<f64>,

    /// New discounted price of the `Listing`, with an explicit `null`
    /// removing the discount.
    #[serde(default, deserialize_with = "some")]
    pub discount_price: Option<Option<f64>>,

    /// New discount offer indicator of the `Listing`.
    pub offer: Option<bool>,

    /// New furnished indicator of the `Listing`.
    pub furnished: Option<bool>,

    /// New parking indicator of the `Listing`.
    pub parking: Option<bool>,

    /// New number of bedrooms in the property.
    pub bedrooms: Option<u16>,

    /// New number of bathrooms in the property.
    pub bathrooms: Option<u16>,

    /// New image URLs of the `Listing`.
    pub image_urls: Option<Vec<String>>,

    /// New raw approval state of the `Listing`.
    ///
    /// Honored for administrators and silently dropped otherwise.
    pub approved: Option<bool>,
}

impl UpdateRequest {
    /// Builds a [`command::update_listing::Patch`] out of this
    /// [`UpdateRequest`].
    ///
    /// # Errors
    ///
    /// Errors if some field is malformed.
    fn into_patch(self) -> Result<command::update_listing::Patch, Error> {
        Ok(command::update_listing::Patch {
            name: self
                .name
                .map(|n| listing::Name::new(n).ok_or(InputError::Name))
                .transpose()?,
            description: self
                .description
                .map(|d| {
                    listing::Description::new(d)
                        .ok_or(InputError::Description)
                })
                .transpose()?,
            address: self
                .address
                .map(|a| listing::Address::new(a).ok_or(InputError::Address))
                .transpose()?,
            kind: self.kind.map(Into::into),
            regular_price: self.regular_price.map(price).transpose()?,
            discount_price: self
                .discount_price
                .map(|p| p.map(price).transpose())
                .transpose()?,
            offer: self.offer,
            furnished: self.furnished,
            parking: self.parking,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            image_urls: self.image_urls.map(image_urls).transpose()?,
            approved: self.approved,
        })
    }
}

/// Handles the `POST /listings/:id` request.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `NOT_OWNER` - the requester neither owns the `Listing` nor is an
///                 administrator;
/// - `LISTING_NOT_EXISTS` - the `Listing` is absent;
/// - `INVALID_*`, `EMPTY_IMAGE_URLS`, `DISCOUNT_ABOVE_REGULAR_PRICE` - some
///   field of the body is malformed.
#[tracing::instrument(skip_all, fields(listing.id = %id))]
pub async fn update(
    ctx: Context,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Listing>, Error> {
    let session = ctx.current_session().await?;

    let listing = ctx
        .service()
        .execute(command::UpdateListing {
            listing_id: id.into(),
            initiator: session.user_id,
            patch: req.into_patch()?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Listing::new(listing, &session.viewer())))
}

/// Handles the `DELETE /listings/:id` request.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `NOT_OWNER` - the requester neither owns the `Listing` nor is an
///                 administrator;
/// - `LISTING_NOT_EXISTS` - the `Listing` is absent.
#[tracing::instrument(skip_all, fields(listing.id = %id))]
pub async fn delete(
    ctx: Context,
    Path(id): Path<Uuid>,
) -> Result<http::StatusCode, Error> {
    let session = ctx.current_session().await?;

    ctx.service()
        .execute(command::DeleteListing {
            listing_id: id.into(),
            initiator: session.user_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(http::StatusCode::NO_CONTENT)
}

/// Handles the `POST /listings/:id/approve` request.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `NOT_ADMIN` - the requester is not an administrator;
/// - `LISTING_NOT_EXISTS` - the `Listing` is absent.
#[tracing::instrument(skip_all, fields(listing.id = %id))]
pub async fn approve(
    ctx: Context,
    Path(id): Path<Uuid>,
) -> Result<Json<Listing>, Error> {
    let session = ctx.current_session().await?;

    let listing = ctx
        .service()
        .execute(command::ApproveListing {
            listing_id: id.into(),
            initiator: session.user_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Listing::new(listing, &session.viewer())))
}

/// Body of the [`reject()`] handler.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    /// Reason of the rejection.
    pub reason: Option<String>,
}

/// Handles the `POST /listings/:id/reject` request.
///
/// An absent or empty reason falls back to the default one.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `NOT_ADMIN` - the requester is not an administrator;
/// - `LISTING_NOT_EXISTS` - the `Listing` is absent.
#[tracing::instrument(skip_all, fields(listing.id = %id))]
pub async fn reject(
    ctx: Context,
    Path(id): Path<Uuid>,
    req: Option<Json<RejectRequest>>,
) -> Result<Json<Listing>, Error> {
    let session = ctx.current_session().await?;

    let listing = ctx
        .service()
        .execute(command::RejectListing {
            listing_id: id.into(),
            initiator: session.user_id,
            reason: req.and_then(|Json(r)| r.reason),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Listing::new(listing, &session.viewer())))
}

/// Response of the [`bulk_approve()`] handler.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveResponse {
    /// Number of `Listing`s changed by the sweep.
    pub modified_count: u64,
}

/// Handles the `POST /listings/bulk-approve` request.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `NOT_ADMIN` - the requester is not an administrator.
#[tracing::instrument(
    skip_all,
    fields(http.route = "POST /listings/bulk-approve"),
)]
pub async fn bulk_approve(
    ctx: Context,
) -> Result<Json<BulkApproveResponse>, Error> {
    let session = ctx.current_session().await?;

    let approved = ctx
        .service()
        .execute(command::BulkApproveListings {
            initiator: session.user_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(BulkApproveResponse {
        modified_count: approved.into(),
    }))
}

/// Converts the provided raw price into a [`listing::Price`].
fn price(value: f64) -> Result<listing::Price, Error> {
    Decimal::from_f64(value)
        .and_then(listing::Price::new)
        .ok_or_else(|| InputError::Price.into())
}

/// Converts the provided raw URLs into [`listing::ImageUrls`].
fn image_urls(urls: Vec<String>) -> Result<listing::ImageUrls, Error> {
    let urls = urls
        .into_iter()
        .map(|u| listing::ImageUrl::new(u).ok_or(InputError::ImageUrl))
        .collect::<Result<Vec<_>, _>>()?;
    listing::ImageUrls::new(urls).ok_or_else(|| InputError::ImageUrls.into())
}

/// Deserializes an explicitly provided value, distinguishing it from an
/// absent one when combined with `#[serde(default)]`.
fn some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl AsError for command::create_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::AuthorNotExists(_) => {
                Some(api::PrivilegeError::Session.into())
            }
            Self::DiscountAboveRegularPrice => {
                Some(InputError::DiscountPrice.into())
            }
        }
    }
}

impl AsError for command::update_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DiscountAboveRegularPrice => {
                Some(InputError::DiscountPrice.into())
            }
            Self::InitiatorNotExists(_) => {
                Some(api::PrivilegeError::Session.into())
            }
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotOwner(_) => Some(api::PrivilegeError::Owner.into()),
        }
    }
}

impl AsError for command::delete_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InitiatorNotExists(_) => {
                Some(api::PrivilegeError::Session.into())
            }
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotOwner(_) => Some(api::PrivilegeError::Owner.into()),
        }
    }
}

impl AsError for command::approve_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InitiatorNotExists(_) => {
                Some(api::PrivilegeError::Session.into())
            }
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotAdmin(_) => Some(api::PrivilegeError::Admin.into()),
        }
    }
}

impl AsError for command::reject_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InitiatorNotExists(_) => {
                Some(api::PrivilegeError::Session.into())
            }
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotAdmin(_) => Some(api::PrivilegeError::Admin.into()),
        }
    }
}

impl AsError for command::bulk_approve_listings::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InitiatorNotExists(_) => {
                Some(api::PrivilegeError::Session.into())
            }
            Self::NotAdmin(_) => Some(api::PrivilegeError::Admin.into()),
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "LISTING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Listing does not exist"]
        NotExists,
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Invalid listing name"]
        Name,

        #[code = "INVALID_DESCRIPTION"]
        #[status = BAD_REQUEST]
        #[message = "Invalid listing description"]
        Description,

        #[code = "INVALID_ADDRESS"]
        #[status = BAD_REQUEST]
        #[message = "Invalid listing address"]
        Address,

        #[code = "INVALID_TYPE"]
        #[status = BAD_REQUEST]
        #[message = "Invalid listing type"]
        Type,

        #[code = "INVALID_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must be a positive number"]
        Price,

        #[code = "DISCOUNT_ABOVE_REGULAR_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Discounted price exceeds the regular one"]
        DiscountPrice,

        #[code = "INVALID_IMAGE_URL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid image URL"]
        ImageUrl,

        #[code = "EMPTY_IMAGE_URLS"]
        #[status = BAD_REQUEST]
        #[message = "At least one image URL must be provided"]
        ImageUrls,

        #[code = "INVALID_SEARCH_TERM"]
        #[status = BAD_REQUEST]
        #[message = "Invalid search term"]
        SearchTerm,
    }
}
