//! [`Command`] for updating a [`Listing`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::listing::{
    Address, Description, ImageUrls, Kind, Moderation, Name, Price,
};
use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Listing`].
///
/// Permitted to the owner of the [`Listing`] and to administrators. An
/// approval state carried by the [`Patch`] is applied for administrators
/// only and silently dropped otherwise, so owners cannot flip their own
/// visibility.
#[derive(Clone, Debug)]
pub struct UpdateListing {
    /// ID of the [`Listing`] to update.
    pub listing_id: listing::Id,

    /// ID of the [`User`] performing the update.
    pub initiator: user::Id,

    /// [`Patch`] to apply to the [`Listing`].
    pub patch: Patch,
}

/// Set of changes applied to a [`Listing`] by the [`UpdateListing`]
/// [`Command`].
///
/// Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`Name`] of the [`Listing`].
    pub name: Option<listing::Name>,

    /// New [`Description`] of the [`Listing`].
    pub description: Option<listing::Description>,

    /// New [`Address`] of the [`Listing`].
    pub address: Option<listing::Address>,

    /// New [`Kind`] of the [`Listing`].
    pub kind: Option<listing::Kind>,

    /// New regular [`Price`] of the [`Listing`].
    pub regular_price: Option<listing::Price>,

    /// New discounted [`Price`] of the [`Listing`].
    ///
    /// The outer [`Option`] distinguishes "leave untouched" from "remove the
    /// discount".
    pub discount_price: Option<Option<listing::Price>>,

    /// New discount offer indicator of the [`Listing`].
    pub offer: Option<bool>,

    /// New furnished indicator of the [`Listing`].
    pub furnished: Option<bool>,

    /// New parking indicator of the [`Listing`].
    pub parking: Option<bool>,

    /// New number of bedrooms in the property.
    pub bedrooms: Option<listing::RoomCount>,

    /// New number of bathrooms in the property.
    pub bathrooms: Option<listing::RoomCount>,

    /// New [`ImageUrls`] of the [`Listing`].
    pub image_urls: Option<listing::ImageUrls>,

    /// New raw approval state of the [`Listing`].
    ///
    /// Honored for administrators only. See
    /// [`Moderation::with_approved()`] for how the flag maps onto the
    /// moderation state.
    pub approved: Option<bool>,
}

impl Patch {
    /// Applies this [`Patch`] to the provided [`Listing`].
    ///
    /// The approval state is touched only when the patch is applied
    /// `as_admin`; otherwise it's dropped without an error.
    fn apply(self, listing: &mut Listing, as_admin: bool) {
        let Self {
            name,
            description,
            address,
            kind,
            regular_price,
            discount_price,
            offer,
            furnished,
            parking,
            bedrooms,
            bathrooms,
            image_urls,
            approved,
        } = self;

        if let Some(name) = name {
            listing.name = name;
        }
        if let Some(description) = description {
            listing.description = description;
        }
        if let Some(address) = address {
            listing.address = address;
        }
        if let Some(kind) = kind {
            listing.kind = kind;
        }
        if let Some(regular_price) = regular_price {
            listing.regular_price = regular_price;
        }
        if let Some(discount_price) = discount_price {
            listing.discount_price = discount_price;
        }
        if let Some(offer) = offer {
            listing.offer = offer;
        }
        if let Some(furnished) = furnished {
            listing.furnished = furnished;
        }
        if let Some(parking) = parking {
            listing.parking = parking;
        }
        if let Some(bedrooms) = bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = bathrooms {
            listing.bathrooms = bathrooms;
        }
        if let Some(image_urls) = image_urls {
            listing.image_urls = image_urls;
        }
        if as_admin {
            if let Some(approved) = approved {
                listing.moderation =
                    listing.moderation.clone().with_approved(approved);
            }
        }
    }
}

impl<Db> Command<UpdateListing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Listing, listing::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateListing {
            listing_id,
            initiator,
            patch,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Privilege is re-verified against the database on every
        // state-changing operation, not trusted from the `Session` claims.
        let initiator = tx
            .execute(Select(By::<Option<User>, _>::new(initiator)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InitiatorNotExists(initiator))
            .map_err(tracerr::wrap!())?;

        // Avoid concurrent actions upon the same `Listing`.
        tx.execute(Lock(By::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing_id))
            .map_err(tracerr::wrap!())?;

        if !initiator.is_admin && listing.owner_id != initiator.id {
            return Err(tracerr::new!(E::NotOwner(initiator.id)));
        }

        patch.apply(&mut listing, initiator.is_admin);

        if let Some(discount) = listing.discount_price {
            if discount > listing.regular_price {
                return Err(tracerr::new!(E::DiscountAboveRegularPrice));
            }
        }

        tx.execute(Update(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(listing)
    }
}

/// Error of [`UpdateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Discounted [`Price`] exceeds the regular one.
    ///
    /// [`Price`]: listing::Price
    #[display("Discounted price exceeds the regular one")]
    DiscountAboveRegularPrice,

    /// [`User`] performing the update does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    InitiatorNotExists(#[error(not(source))] user::Id),

    /// [`Listing`] to update does not exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] performing the update neither owns the [`Listing`] nor is an
    /// administrator.
    #[display("`User(id: {_0})` is not permitted to change the `Listing`")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::domain::{listing, user, Listing};

    use super::Patch;

    fn listing(moderation: listing::Moderation) -> Listing {
        Listing {
            id: listing::Id::new(),
            owner_id: user::Id::new(),
            moderation,
            name: listing::Name::new("Sunny loft").unwrap(),
            description: "Sunny loft in the city center".parse().unwrap(),
            address: "12 Main St".parse().unwrap(),
            kind: listing::Kind::Rent,
            regular_price: listing::Price::new(Decimal::from(1200)).unwrap(),
            discount_price: None,
            offer: false,
            furnished: false,
            parking: false,
            bedrooms: 2,
            bathrooms: 1,
            image_urls: listing::ImageUrls::new(vec![listing::ImageUrl::new(
                "https://img.example.org/1.jpg",
            )
            .unwrap()])
            .unwrap(),
            created_at: listing::CreationDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn non_admin_patch_never_flips_approval() {
        let mut l = listing(listing::Moderation::Pending);

        Patch {
            approved: Some(true),
            ..Patch::default()
        }
        .apply(&mut l, false);

        assert_eq!(l.moderation, listing::Moderation::Pending);
    }

    #[test]
    fn admin_patch_flips_approval() {
        let mut l = listing(listing::Moderation::Pending);

        Patch {
            approved: Some(true),
            ..Patch::default()
        }
        .apply(&mut l, true);

        assert_eq!(l.moderation, listing::Moderation::Approved);
    }

    #[test]
    fn absent_fields_are_left_untouched() {
        let mut l = listing(listing::Moderation::Approved);
        let before = l.clone();

        Patch::default().apply(&mut l, true);

        assert_eq!(l.name, before.name);
        assert_eq!(l.regular_price, before.regular_price);
        assert_eq!(l.moderation, before.moderation);
    }

    #[test]
    fn discount_can_be_removed_explicitly() {
        let mut l = listing(listing::Moderation::Approved);
        l.offer = true;
        l.discount_price =
            Some(listing::Price::new(Decimal::from(900)).unwrap());

        Patch {
            discount_price: Some(None),
            offer: Some(false),
            ..Patch::default()
        }
        .apply(&mut l, false);

        assert_eq!(l.discount_price, None);
        assert!(!l.offer);
    }
}
