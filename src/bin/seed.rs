//! Seed a fresh database with a few sample listings. No-op when the table
//! already has rows.

use anyhow::Result;
use celo_imoveis::models::listing::NewListing;
use celo_imoveis::{config, db, logger};
use log::info;

fn main() -> Result<()> {
    logger::setup_logger()?;
    let config = config::read_config();

    let mut conn = db::connect(&config)?;
    db::init_schema(&mut conn)?;

    let atual = db::listing::info(&mut conn)?;
    if atual.total > 0 {
        info!("table already has {} listings, nothing to do", atual.total);
        return Ok(());
    }

    for novo in sample_listings() {
        let criado = db::listing::insert(&mut conn, &novo)?;
        info!("seeded listing {}: {}", criado.id, criado.titulo);
    }

    Ok(())
}

fn sample_listings() -> Vec<NewListing> {
    vec![
        NewListing {
            titulo: "Casa com quintal no centro".to_string(),
            descricao: "Casa ampla com quintal, próxima ao comércio.".to_string(),
            descricao_html: None,
            preco: "R$ 250.000".to_string(),
            dormitorios: Some(3),
            banheiros: Some(2),
            vagas: Some(2),
            area: Some(120),
            destaque: true,
            fotos: Some("casa1_1.jpg,casa1_2.jpg,casa1_3.jpg".to_string()),
        },
        NewListing {
            titulo: "Apartamento 2 dormitórios".to_string(),
            descricao: "Apartamento reformado, andar alto, sol da manhã.".to_string(),
            descricao_html: None,
            preco: "R$ 180.000".to_string(),
            dormitorios: Some(2),
            banheiros: Some(1),
            vagas: Some(1),
            area: Some(64),
            destaque: false,
            fotos: Some("apto2_1.jpg,apto2_2.jpg".to_string()),
        },
        NewListing {
            titulo: "Terreno 300m² pronto para construir".to_string(),
            descricao: "Terreno plano, escriturado, rua asfaltada.".to_string(),
            descricao_html: None,
            preco: "R$ 95.000".to_string(),
            dormitorios: None,
            banheiros: None,
            vagas: None,
            area: Some(300),
            destaque: false,
            fotos: None,
        },
    ]
}
