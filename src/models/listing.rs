use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable};
use serde::Serialize;

use crate::db::schema::imoveis;
use crate::fotos::PhotoList;

/// One property record ("imóvel"). Field order matches the table definition.
#[derive(Debug, Clone, Queryable, Serialize)]
#[diesel(table_name = imoveis)]
pub struct Listing {
    pub id: i32,
    pub titulo: String,
    pub descricao: String,
    pub preco: String,
    pub dormitorios: Option<i32>,
    pub banheiros: Option<i32>,
    pub vagas: Option<i32>,
    pub area: Option<i32>,
    pub destaque: bool,
    pub fotos: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub descricao_html: Option<String>,
}

impl Listing {
    pub fn fotos(&self) -> PhotoList {
        PhotoList::from_column(self.fotos.as_deref())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = imoveis)]
pub struct NewListing {
    pub titulo: String,
    pub descricao: String,
    pub descricao_html: Option<String>,
    pub preco: String,
    pub dormitorios: Option<i32>,
    pub banheiros: Option<i32>,
    pub vagas: Option<i32>,
    pub area: Option<i32>,
    pub destaque: bool,
    pub fotos: Option<String>,
}

/// Full-row update from the edit form. `treat_none_as_null` so clearing a
/// count writes NULL instead of silently keeping the old value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = imoveis)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateListing {
    pub titulo: String,
    pub descricao: String,
    pub descricao_html: Option<String>,
    pub preco: String,
    pub dormitorios: Option<i32>,
    pub banheiros: Option<i32>,
    pub vagas: Option<i32>,
    pub area: Option<i32>,
    pub destaque: bool,
    pub fotos: Option<String>,
    pub updated_at: DateTime<Utc>,
}
