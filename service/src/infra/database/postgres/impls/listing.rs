//! [`Listing`]-related [`Database`] implementations.

use std::{collections::HashMap, fmt::Write as _};

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{listing, Listing},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `listings` table, in the order [`listing_from_row()`]
/// expects them.
const COLUMNS: &str = "\
    id, owner_id, \
    approved, rejection_reason, \
    name, description, address, \
    kind, \
    regular_price, discount_price, offer, \
    furnished, parking, \
    bedrooms, bathrooms, \
    image_urls, \
    created_at";

/// SQL predicate of a publicly visible [`Listing`].
const APPROVED_SQL: &str = "approved";

/// SQL predicate of a [`Listing`] awaiting moderation.
const PENDING_SQL: &str = "NOT approved AND rejection_reason IS NULL";

/// SQL predicate of a rejected [`Listing`].
const REJECTED_SQL: &str = "NOT approved AND rejection_reason IS NOT NULL";

/// Reconstructs a [`Listing`] from the provided [`Row`] of [`COLUMNS`].
fn listing_from_row(row: &Row) -> Listing {
    let moderation = match (
        row.get::<_, bool>("approved"),
        row.get::<_, Option<listing::RejectionReason>>("rejection_reason"),
    ) {
        (true, _) => listing::Moderation::Approved,
        (false, Some(reason)) => listing::Moderation::Rejected { reason },
        (false, None) => listing::Moderation::Pending,
    };

    Listing {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        moderation,
        name: row.get("name"),
        description: row.get("description"),
        address: row.get("address"),
        kind: row.get("kind"),
        regular_price: row.get("regular_price"),
        discount_price: row.get("discount_price"),
        offer: row.get("offer"),
        furnished: row.get("furnished"),
        parking: row.get("parking"),
        bedrooms: u16::try_from(row.get::<_, i32>("bedrooms"))
            .expect("`bedrooms` overflow"),
        bathrooms: u16::try_from(row.get::<_, i32>("bathrooms"))
            .expect("`bathrooms` overflow"),
        image_urls: row.get("image_urls"),
        created_at: row.get("created_at"),
    }
}

/// Renders the `WHERE` clause of the provided [`Scope`] and [`Filter`],
/// collecting its parameters into `ps`.
///
/// Single rendering point shared by the page and the total count selections:
/// both are derived from one predicate, so their results cannot disagree.
///
/// [`Filter`]: read::listing::list::Filter
/// [`Scope`]: read::listing::list::Scope
fn selection_sql<'p>(
    scope: &'p read::listing::list::Scope,
    filter: &'p read::listing::list::Filter,
    name_pattern: Option<&'p FuzzPattern>,
    ps: &mut Vec<&'p (dyn ToSql + Sync)>,
) -> String {
    use crate::read::listing::list::Scope;

    let mut sql = String::with_capacity(256);

    match scope {
        Scope::Admin { approved: None } => sql.push_str("TRUE"),
        Scope::Admin {
            approved: Some(approved),
        } => {
            ps.push(approved);
            _ = write!(sql, "{APPROVED_SQL} = ${}::BOOL", ps.len());
        }
        Scope::Owner(owner_id) => {
            ps.push(owner_id);
            _ = write!(sql, "owner_id = ${}::UUID", ps.len());
        }
        Scope::Public => sql.push_str(APPROVED_SQL),
    }

    if let Some(owner_id) = &filter.owner_id {
        ps.push(owner_id);
        _ = write!(sql, " AND owner_id = ${}::UUID", ps.len());
    }
    if filter.offer {
        sql.push_str(" AND offer");
    }
    if filter.furnished {
        sql.push_str(" AND furnished");
    }
    if filter.parking {
        sql.push_str(" AND parking");
    }
    if let Some(kind) = &filter.kind {
        ps.push(kind);
        _ = write!(sql, " AND kind = ${}::INT2", ps.len());
    }
    if let Some(pattern) = name_pattern {
        ps.push(pattern);
        _ = write!(
            sql,
            " AND LOWER(name) SIMILAR TO LOWER(${}::VARCHAR)",
            ps.len(),
        );
    }

    sql
}

/// Renders the `ORDER BY` expression of the provided [`Sort`].
///
/// [`Sort`]: read::listing::list::Sort
fn sort_sql(sort: read::listing::list::Sort) -> String {
    use crate::read::listing::list::Field;

    let field = match sort.field {
        Field::CreatedAt => "created_at",
        Field::RegularPrice => "regular_price",
    };
    let direction = sort.direction.sql();

    format!("{field} {direction}, id {direction}")
}

impl<C, IDs> Database<Select<By<HashMap<listing::Id, Listing>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[listing::Id]>,
{
    type Ok = HashMap<listing::Id, Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<listing::Id, Listing>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[listing::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM listings \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let listing = listing_from_row(&row);
                (listing.id, listing)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Listing>, listing::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<listing::Id, Listing>, [listing::Id; 1]>>,
        Ok = HashMap<listing::Id, Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Listing>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(listing))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Listing>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let Listing {
            id,
            owner_id,
            moderation,
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
            created_at,
        } = listing;

        let approved = moderation.is_approved();
        let rejection_reason = moderation.rejection_reason();
        let bedrooms = i32::from(bedrooms);
        let bathrooms = i32::from(bathrooms);

        const SQL: &str = "\
            INSERT INTO listings (\
                id, owner_id, \
                approved, rejection_reason, \
                name, description, address, \
                kind, \
                regular_price, discount_price, offer, \
                furnished, parking, \
                bedrooms, bathrooms, \
                image_urls, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::BOOL, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::INT2, \
                $9::NUMERIC, $10::NUMERIC, $11::BOOL, \
                $12::BOOL, $13::BOOL, \
                $14::INT4, $15::INT4, \
                $16::VARCHAR[], \
                $17::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET approved = EXCLUDED.approved, \
                rejection_reason = EXCLUDED.rejection_reason, \
                name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                address = EXCLUDED.address, \
                kind = EXCLUDED.kind, \
                regular_price = EXCLUDED.regular_price, \
                discount_price = EXCLUDED.discount_price, \
                offer = EXCLUDED.offer, \
                furnished = EXCLUDED.furnished, \
                parking = EXCLUDED.parking, \
                bedrooms = EXCLUDED.bedrooms, \
                bathrooms = EXCLUDED.bathrooms, \
                image_urls = EXCLUDED.image_urls";
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &approved,
                &rejection_reason,
                &name,
                &description,
                &address,
                &kind,
                &regular_price,
                &discount_price,
                &offer,
                &furnished,
                &parking,
                &bedrooms,
                &bathrooms,
                &image_urls,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Listing, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM listings \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Listing, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO listings_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::listing::list::Page, read::listing::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::listing::list::Page, read::listing::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Selector {
            scope,
            filter,
            sort,
            arguments,
        } = by.into_inner();

        let limit = i64::try_from(arguments.limit.get()).unwrap();
        let offset = i64::try_from(arguments.offset.get()).unwrap();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &offset];

        let name_pattern =
            filter.name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let selection =
            selection_sql(&scope, &filter, name_pattern.as_ref(), &mut ps);

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM listings \
             WHERE {selection} \
             ORDER BY {sorting} \
             LIMIT $1::INT8 \
             OFFSET $2::INT8",
            sorting = sort_sql(sort),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(listing_from_row)
            .collect())
    }
}

impl<C>
    Database<
        Select<
            By<read::listing::list::TotalCount, read::listing::list::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::listing::list::TotalCount, read::listing::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Selector {
            scope,
            filter,
            sort: _,
            arguments: _,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let name_pattern =
            filter.name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let selection =
            selection_sql(&scope, &filter, name_pattern.as_ref(), &mut ps);

        let sql = format!(
            "SELECT COUNT(*)::INT8 \
             FROM listings \
             WHERE {selection}",
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i64>(0).into())
    }
}

impl<C> Database<Select<By<read::listing::Stats, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::listing::Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT COUNT(*)::INT8 AS total, \
                    COUNT(*) FILTER (WHERE {APPROVED_SQL})::INT8 \
                        AS approved, \
                    COUNT(*) FILTER (WHERE {PENDING_SQL})::INT8 \
                        AS pending, \
                    COUNT(*) FILTER (WHERE {REJECTED_SQL})::INT8 \
                        AS rejected, \
                    COUNT(*) FILTER (WHERE kind = $1::INT2)::INT8 AS rent, \
                    COUNT(*) FILTER (WHERE kind = $2::INT2)::INT8 AS sale, \
                    COALESCE(\
                        SUM(regular_price) FILTER (WHERE {APPROVED_SQL}), \
                        0\
                    )::NUMERIC AS approved_price_sum \
             FROM listings",
        );
        self.query_opt(&sql, &[&listing::Kind::Rent, &listing::Kind::Sale])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                let row = row.expect("always exists");
                read::listing::Stats {
                    total: row.get("total"),
                    approved: row.get("approved"),
                    pending: row.get("pending"),
                    rejected: row.get("rejected"),
                    rent: row.get("rent"),
                    sale: row.get("sale"),
                    approved_price_sum: row.get("approved_price_sum"),
                }
            })
    }
}

impl<C> Database<Update<By<read::listing::BulkApproval, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::listing::BulkApproval;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(_): Update<By<read::listing::BulkApproval, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        // A single statement over the whole matched set: either every
        // not-yet-approved `Listing` becomes approved, or none does.
        const SQL: &str = "\
            UPDATE listings \
            SET approved = TRUE, \
                rejection_reason = NULL \
            WHERE NOT approved";
        self.exec(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(Into::into)
    }
}
