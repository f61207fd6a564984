//! [`Command`] for creating a new [`Listing`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::listing::{
    Address, Description, ImageUrls, Kind, Name, Price,
};
use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Listing`].
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// ID of the [`User`] creating the [`Listing`].
    pub author_id: user::Id,

    /// [`Name`] of a new [`Listing`].
    pub name: listing::Name,

    /// [`Description`] of a new [`Listing`].
    pub description: listing::Description,

    /// [`Address`] of a new [`Listing`].
    pub address: listing::Address,

    /// [`Kind`] of a new [`Listing`].
    pub kind: listing::Kind,

    /// Regular [`Price`] of a new [`Listing`].
    pub regular_price: listing::Price,

    /// Discounted [`Price`] of a new [`Listing`].
    pub discount_price: Option<listing::Price>,

    /// Indicator whether a new [`Listing`] has an active discount offer.
    pub offer: bool,

    /// Indicator whether the property is furnished.
    pub furnished: bool,

    /// Indicator whether the property has a parking spot.
    pub parking: bool,

    /// Number of bedrooms in the property.
    pub bedrooms: listing::RoomCount,

    /// Number of bathrooms in the property.
    pub bathrooms: listing::RoomCount,

    /// [`ImageUrls`] of a new [`Listing`].
    pub image_urls: listing::ImageUrls,
}

impl<Db> Command<CreateListing> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Listing>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateListing {
            author_id,
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
        } = cmd;

        if let Some(discount) = discount_price {
            if discount > regular_price {
                return Err(tracerr::new!(E::DiscountAboveRegularPrice));
            }
        }

        // The author's privilege is read from the database rather than from
        // the `Session` claims: only a present-day administrator skips the
        // review queue.
        let author = self
            .database()
            .execute(Select(By::new(author_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AuthorNotExists(author_id))
            .map_err(tracerr::wrap!())?;

        let listing = Listing {
            id: listing::Id::new(),
            owner_id: author.id,
            moderation: listing::Moderation::initial(author.is_admin),
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
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`User`] creating the [`Listing`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    AuthorNotExists(#[error(not(source))] user::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Discounted [`Price`] exceeds the regular one.
    ///
    /// [`Price`]: listing::Price
    #[display("Discounted price exceeds the regular one")]
    DiscountAboveRegularPrice,
}
