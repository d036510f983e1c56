//! Upload every locally-stored listing photo to the remote image host and
//! swap the stored filename for the returned URL.
//!
//! Per photo: already-remote tokens are kept, missing files are dropped with
//! a warning, and a failed upload keeps the local token so a later run can
//! retry. One failure never stops the rest of the batch.

use std::path::Path;

use anyhow::{bail, Result};
use celo_imoveis::fotos::PhotoList;
use celo_imoveis::uploads::ImageHost;
use celo_imoveis::{config, db, logger};
use colored::Colorize;
use log::{error, info, warn};

#[derive(Default)]
struct Relatorio {
    imoveis: usize,
    fotos: usize,
    ja_remotas: usize,
    enviadas: usize,
    falhas: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::setup_logger()?;
    let config = config::read_config();

    let Some(host_config) = config.image_host.as_ref() else {
        bail!("image_host is not configured; nothing to migrate to");
    };
    let host = ImageHost::new(host_config);
    let upload_dir = config.upload_dir().to_string();

    let mut conn = db::connect(&config)?;
    let imoveis = db::listing::get_all(&mut conn)?;

    let mut relatorio = Relatorio {
        imoveis: imoveis.len(),
        ..Relatorio::default()
    };

    for imovel in &imoveis {
        let lista = imovel.fotos();
        if lista.is_empty() {
            continue;
        }

        let mut nova = PhotoList::new();
        let mut mudou = false;

        for token in lista.iter() {
            relatorio.fotos += 1;

            if PhotoList::is_remote(token) {
                relatorio.ja_remotas += 1;
                nova.append([token.to_string()]);
                continue;
            }

            let caminho = Path::new(&upload_dir).join(token);
            if !caminho.exists() {
                warn!("listing {}: file not found: {}", imovel.id, caminho.display());
                relatorio.falhas += 1;
                mudou = true;
                continue;
            }

            info!("uploading {token} ...");
            match host.upload_path(&caminho).await {
                Ok(url) => {
                    relatorio.enviadas += 1;
                    mudou = true;
                    nova.append([url]);
                }
                Err(e) => {
                    error!("listing {}: upload of {token} failed: {e:#}", imovel.id);
                    relatorio.falhas += 1;
                    nova.append([token.to_string()]);
                }
            }
        }

        if mudou {
            db::listing::update_fotos(&mut conn, imovel.id, &nova)?;
        }
    }

    imprime_relatorio(&relatorio);
    Ok(())
}

fn imprime_relatorio(r: &Relatorio) {
    println!();
    println!("{}", "RELATÓRIO DE MIGRAÇÃO".bold());
    println!("────────────────────────────────────");
    println!("Imóveis processados: {}", r.imoveis);
    println!("Total de fotos analisadas: {}", r.fotos);
    println!("{} {}", "Já no host remoto:".blue(), r.ja_remotas);
    println!("{} {}", "Enviadas agora:".green(), r.enviadas);
    println!("{} {}", "Falhas ou ausentes:".red(), r.falhas);
    println!("────────────────────────────────────");
}
