//! [`Command`] for rejecting a [`Listing`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::listing::RejectionReason;
use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for rejecting a [`Listing`], hiding it from the public and
/// recording the reason for its owner.
#[derive(Clone, Debug)]
pub struct RejectListing {
    /// ID of the [`Listing`] to reject.
    pub listing_id: listing::Id,

    /// ID of the [`User`] performing the rejection.
    pub initiator: user::Id,

    /// Raw reason of the rejection.
    ///
    /// Falls back to the [`RejectionReason::DEFAULT`] one when absent or
    /// empty.
    pub reason: Option<String>,
}

impl<Db> Command<RejectListing> for Service<Db>
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

    async fn execute(&self, cmd: RejectListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectListing {
            listing_id,
            initiator,
            reason,
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
        if !initiator.is_admin {
            return Err(tracerr::new!(E::NotAdmin(initiator.id)));
        }

        // Avoid concurrent moderation of the same `Listing`.
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

        listing.moderation = listing
            .moderation
            .reject(listing::RejectionReason::or_default(reason));
        tx.execute(Update(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(listing)
    }
}

/// Error of [`RejectListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] performing the rejection does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    InitiatorNotExists(#[error(not(source))] user::Id),

    /// [`Listing`] to reject does not exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] performing the rejection is not an administrator.
    #[display("`User(id: {_0})` is not an administrator")]
    #[from(ignore)]
    NotAdmin(#[error(not(source))] user::Id),
}
