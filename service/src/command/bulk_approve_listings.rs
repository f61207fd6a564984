//! [`Command`] for approving every pending [`Listing`] at once.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    read, Service,
};
#[cfg(doc)]
use crate::domain::Listing;

use super::Command;

/// [`Command`] for approving every not-yet-approved [`Listing`] in a single
/// storage operation.
///
/// Issued as one update over the whole matched set, so a concurrent failure
/// cannot leave a partially approved sweep behind. Idempotent: a repeated
/// execution reports zero changed [`Listing`]s.
#[derive(Clone, Copy, Debug, From)]
pub struct BulkApproveListings {
    /// ID of the [`User`] performing the approval.
    pub initiator: user::Id,
}

impl<Db> Command<BulkApproveListings> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Update<By<read::listing::BulkApproval, ()>>,
            Ok = read::listing::BulkApproval,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::listing::BulkApproval;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: BulkApproveListings,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let BulkApproveListings { initiator } = cmd;

        // Privilege is re-verified against the database on every
        // state-changing operation, not trusted from the `Session` claims.
        let initiator = self
            .database()
            .execute(Select(By::new(initiator)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InitiatorNotExists(initiator))
            .map_err(tracerr::wrap!())?;
        if !initiator.is_admin {
            return Err(tracerr::new!(E::NotAdmin(initiator.id)));
        }

        let approved = self
            .database()
            .execute(Update(By::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("bulk approval changed {} `Listing`s", *approved);

        Ok(approved)
    }
}

/// Error of [`BulkApproveListings`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] performing the approval does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    InitiatorNotExists(#[error(not(source))] user::Id),

    /// [`User`] performing the approval is not an administrator.
    #[display("`User(id: {_0})` is not an administrator")]
    #[from(ignore)]
    NotAdmin(#[error(not(source))] user::Id),
}
