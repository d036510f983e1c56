//! Catalog search parameters.
//!
//! Translates the query string of the public listing page into a typed
//! filter set. Every filter is optional and they always combine with AND;
//! malformed numeric input drops the filter instead of erroring.

use serde::Deserialize;
use std::cmp::Reverse;

use crate::models::listing::Listing;

/// Raw query parameters as they arrive on `GET /`.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListParams {
    pub busca: Option<String>,
    pub dormitorios: Option<String>,
    pub banheiros: Option<String>,
    pub ordenar: Option<String>,
    pub destaque: Option<String>,
}

/// Search text, after the direct-ID shortcut has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Busca {
    /// `#` followed only by digits: resolve a single listing by identity,
    /// short-circuiting every other filter. Holds the digits as typed; a
    /// value past the id column's range matches nothing rather than
    /// degrading into a text search.
    PorId(String),
    /// Substring match against titulo and descricao.
    Texto(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PrecoAsc,
    PrecoDesc,
    AreaDesc,
    DestaquePrimeiro,
    /// Newest first (`ORDER BY id DESC`). Also used for unrecognized keys.
    Padrao,
}

impl SortKey {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("preco_asc") => SortKey::PrecoAsc,
            Some("preco_desc") => SortKey::PrecoDesc,
            Some("area") => SortKey::AreaDesc,
            Some("destaque") => SortKey::DestaquePrimeiro,
            _ => SortKey::Padrao,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub busca: Option<Busca>,
    pub min_dormitorios: Option<i32>,
    pub min_banheiros: Option<i32>,
    pub somente_destaque: bool,
    pub ordenar: SortKey,
}

impl ListingQuery {
    pub fn from_params(params: &ListParams) -> Self {
        ListingQuery {
            busca: parse_busca(params.busca.as_deref()),
            min_dormitorios: parse_minimum(params.dormitorios.as_deref()),
            min_banheiros: parse_minimum(params.banheiros.as_deref()),
            somente_destaque: params.destaque.as_deref().map(str::trim) == Some("1"),
            ordenar: SortKey::parse(params.ordenar.as_deref()),
        }
    }

    /// The target digits when the search text is a `#id` lookup.
    pub fn busca_por_id(&self) -> Option<&str> {
        match &self.busca {
            Some(Busca::PorId(alvo)) => Some(alvo.as_str()),
            _ => None,
        }
    }

    pub fn texto(&self) -> Option<&str> {
        match &self.busca {
            Some(Busca::Texto(t)) => Some(t.as_str()),
            _ => None,
        }
    }
}

fn parse_busca(raw: Option<&str>) -> Option<Busca> {
    let texto = raw.map(str::trim).unwrap_or_default();
    if texto.is_empty() {
        return None;
    }
    if let Some(rest) = texto.strip_prefix('#') {
        let rest = rest.trim();
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return Some(Busca::PorId(rest.to_string()));
        }
    }
    Some(Busca::Texto(texto.to_string()))
}

/// Minimum-count filters ignore anything that does not parse as a
/// non-negative integer.
fn parse_minimum(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse::<i32>().ok())
        .filter(|n| *n >= 0)
}

/// Collapse a free-form price string ("R$ 250.000") to a comparable integer
/// by keeping only its digits. Lossy and locale-naive: well-formed Brazilian
/// prices order correctly, anything else orders by whatever digits remain
/// (0 when none). Malformed input never errors.
pub fn normalize_price(preco: &str) -> i64 {
    let digits: String = preco.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Apply price ordering over already-filtered rows.
///
/// Postgres aborts a query when CAST meets non-numeric text, so the price
/// keys cannot be ordered in SQL over a free-form column. The rows arrive
/// newest-first and the sort is stable, so equal prices keep that order.
/// The remaining keys are ordered by the database and pass through untouched.
pub fn sort_listings(rows: &mut [Listing], ordenar: SortKey) {
    match ordenar {
        SortKey::PrecoAsc => rows.sort_by_key(|l| normalize_price(&l.preco)),
        SortKey::PrecoDesc => rows.sort_by_key(|l| Reverse(normalize_price(&l.preco))),
        _ => {}
    }
}
