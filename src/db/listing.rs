//! Listing storage: CRUD plus the catalog search query.

use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Integer, Nullable};
use diesel::{sql_query, PgConnection};

use super::schema::imoveis;
use crate::fotos::PhotoList;
use crate::models::listing::{Listing, NewListing, UpdateListing};
use crate::query::{sort_listings, ListingQuery, SortKey};

pub fn insert(conn: &mut PgConnection, novo: &NewListing) -> QueryResult<Listing> {
    diesel::insert_into(imoveis::table)
        .values(novo)
        .get_result(conn)
}

pub fn get(conn: &mut PgConnection, listing_id: i32) -> QueryResult<Option<Listing>> {
    imoveis::table
        .find(listing_id)
        .first::<Listing>(conn)
        .optional()
}

pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Listing>> {
    imoveis::table.order(imoveis::id.asc()).load(conn)
}

/// Compose the catalog read query. Filters are conjunctive; a filter whose
/// input was dropped at parse time simply never appears in the WHERE clause.
///
/// Blank counts are stored as NULL and compared as 0, matching the original
/// "treat non-numeric as 0" semantics. Price ordering is applied by the
/// caller over the loaded rows (see [`crate::query::sort_listings`]); for
/// those keys the query keeps the newest-first order so the stable sort
/// breaks ties predictably.
pub fn search_query(filtro: &ListingQuery) -> imoveis::BoxedQuery<'static, Pg> {
    let mut q = imoveis::table.into_boxed();

    if let Some(texto) = filtro.texto() {
        let padrao = format!("%{texto}%");
        q = q.filter(
            imoveis::titulo
                .ilike(padrao.clone())
                .or(imoveis::descricao.ilike(padrao)),
        );
    }

    if filtro.somente_destaque {
        q = q.filter(imoveis::destaque.eq(true));
    }

    if let Some(min) = filtro.min_dormitorios {
        q = q.filter(sql::<Bool>("COALESCE(dormitorios, 0) >= ").bind::<Integer, _>(min));
    }

    if let Some(min) = filtro.min_banheiros {
        q = q.filter(sql::<Bool>("COALESCE(banheiros, 0) >= ").bind::<Integer, _>(min));
    }

    match filtro.ordenar {
        SortKey::AreaDesc => q.order(sql::<Integer>("COALESCE(area, 0)").desc()),
        SortKey::DestaquePrimeiro => q
            .order(imoveis::destaque.desc())
            .then_order_by(imoveis::id.desc()),
        SortKey::PrecoAsc | SortKey::PrecoDesc | SortKey::Padrao => q.order(imoveis::id.desc()),
    }
}

pub fn search(conn: &mut PgConnection, filtro: &ListingQuery) -> QueryResult<Vec<Listing>> {
    let mut rows: Vec<Listing> = search_query(filtro).load(conn)?;
    sort_listings(&mut rows, filtro.ordenar);
    Ok(rows)
}

pub fn update(
    conn: &mut PgConnection,
    listing_id: i32,
    mudancas: &UpdateListing,
) -> QueryResult<usize> {
    diesel::update(imoveis::table.find(listing_id))
        .set(mudancas)
        .execute(conn)
}

/// Write back only the photo list, used by the migration utility.
pub fn update_fotos(
    conn: &mut PgConnection,
    listing_id: i32,
    lista: &PhotoList,
) -> QueryResult<usize> {
    diesel::update(imoveis::table.find(listing_id))
        .set((
            imoveis::fotos.eq(lista.encode()),
            imoveis::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(conn)
}

pub fn delete(conn: &mut PgConnection, listing_id: i32) -> QueryResult<usize> {
    diesel::delete(imoveis::table.find(listing_id)).execute(conn)
}

#[derive(QueryableByName, Debug)]
struct TableStats {
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = Nullable<Integer>)]
    ultimo_id: Option<i32>,
}

#[derive(QueryableByName, Debug)]
struct SequenceRow {
    #[diesel(sql_type = BigInt)]
    last_value: i64,
    #[diesel(sql_type = Bool)]
    is_called: bool,
}

/// Snapshot of the table counters for the `db-info` diagnostic.
#[derive(Debug)]
pub struct DbInfo {
    pub total: i64,
    pub ultimo_id: Option<i32>,
    /// Internal auto-increment counter ("max id ever issued").
    pub contador: i64,
    pub proximo_id: i64,
}

pub fn info(conn: &mut PgConnection) -> QueryResult<DbInfo> {
    let stats: TableStats =
        sql_query("SELECT COUNT(*) AS total, MAX(id) AS ultimo_id FROM imoveis").get_result(conn)?;
    let seq: SequenceRow =
        sql_query("SELECT last_value, is_called FROM imoveis_id_seq").get_result(conn)?;

    let proximo_id = if seq.is_called {
        seq.last_value + 1
    } else {
        seq.last_value
    };

    Ok(DbInfo {
        total: stats.total,
        ultimo_id: stats.ultimo_id,
        contador: seq.last_value,
        proximo_id,
    })
}
