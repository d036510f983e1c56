//! Diagnostic: row count, last issued id, the auto-increment counter and the
//! predicted next id.

use anyhow::Result;
use celo_imoveis::{config, db, logger};

fn main() -> Result<()> {
    logger::setup_logger()?;
    let config = config::read_config();
    let mut conn = db::connect(&config)?;
    let info = db::listing::info(&mut conn)?;

    println!("INFORMAÇÕES DO BANCO DE DADOS");
    println!("────────────────────────────────────");
    println!("Total de imóveis cadastrados: {}", info.total);
    match info.ultimo_id {
        Some(id) => println!("Último ID existente: {id}"),
        None => println!("Nenhum imóvel cadastrado ainda."),
    }
    println!("Contador interno (imoveis_id_seq): {}", info.contador);
    println!("Próximo ID previsto: {}", info.proximo_id);
    println!("────────────────────────────────────");

    Ok(())
}
