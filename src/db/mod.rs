pub mod listing;
pub mod schema;

use anyhow::{Context, Result};
use diesel::{sql_query, Connection, PgConnection, RunQueryDsl};

use crate::config::Config;

pub fn connect(config: &Config) -> Result<PgConnection> {
    PgConnection::establish(&config.database_url)
        .with_context(|| format!("error connecting to {}", config.database_url))
}

/// Create the table and apply column additions. Every statement is a no-op
/// when already applied, so running this on an existing database is safe.
pub fn init_schema(conn: &mut PgConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE IF NOT EXISTS imoveis (
            id SERIAL PRIMARY KEY,
            titulo TEXT NOT NULL,
            descricao TEXT NOT NULL,
            preco TEXT NOT NULL,
            dormitorios INTEGER,
            banheiros INTEGER,
            vagas INTEGER,
            area INTEGER,
            destaque BOOLEAN NOT NULL DEFAULT FALSE,
            fotos TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(conn)
    .context("creating imoveis table")?;

    // Schema evolution: long-form rich description, added later.
    sql_query("ALTER TABLE imoveis ADD COLUMN IF NOT EXISTS descricao_html TEXT")
        .execute(conn)
        .context("adding descricao_html column")?;

    Ok(())
}
