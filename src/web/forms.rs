//! Admin listing form, received as multipart so photo files ride along with
//! the text fields.

use axum::extract::Multipart;
use chrono::Utc;

use super::error::AppError;
use crate::fotos::PhotoList;
use crate::models::listing::{NewListing, UpdateListing};
use crate::uploads::UploadedPhoto;

#[derive(Debug, Default)]
pub struct ListingForm {
    pub titulo: String,
    pub descricao: String,
    pub descricao_html: Option<String>,
    pub preco: String,
    pub dormitorios: Option<i32>,
    pub banheiros: Option<i32>,
    pub vagas: Option<i32>,
    pub area: Option<i32>,
    pub destaque: bool,
    /// 1-based positions of existing photos to drop (edit form only).
    pub remover_fotos: Vec<usize>,
    pub fotos: Vec<UploadedPhoto>,
}

impl ListingForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ListingForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let nome = field.name().unwrap_or_default().to_string();

            if nome == "fotos" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part when no file was chosen.
                if !filename.is_empty() && !bytes.is_empty() {
                    form.fotos.push(UploadedPhoto {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let valor = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            match nome.as_str() {
                "titulo" => form.titulo = valor.trim().to_string(),
                "descricao" => form.descricao = valor.trim().to_string(),
                "descricao_html" => form.descricao_html = non_empty(&valor),
                "preco" => form.preco = valor.trim().to_string(),
                "dormitorios" => form.dormitorios = parse_count(&valor),
                "banheiros" => form.banheiros = parse_count(&valor),
                "vagas" => form.vagas = parse_count(&valor),
                "area" => form.area = parse_count(&valor),
                // Checkbox: only submitted when checked.
                "destaque" => form.destaque = true,
                "remover_fotos" => form.remover_fotos = parse_indices(&valor),
                _ => {}
            }
        }

        if form.titulo.is_empty() {
            return Err(AppError::BadRequest("titulo é obrigatório".to_string()));
        }
        if form.descricao.is_empty() {
            return Err(AppError::BadRequest("descricao é obrigatória".to_string()));
        }

        Ok(form)
    }

    pub fn new_listing(&self, lista: &PhotoList) -> NewListing {
        NewListing {
            titulo: self.titulo.clone(),
            descricao: self.descricao.clone(),
            descricao_html: self.descricao_html.clone(),
            preco: self.preco.clone(),
            dormitorios: self.dormitorios,
            banheiros: self.banheiros,
            vagas: self.vagas,
            area: self.area,
            destaque: self.destaque,
            fotos: Some(lista.encode()),
        }
    }

    pub fn update_listing(&self, lista: &PhotoList) -> UpdateListing {
        UpdateListing {
            titulo: self.titulo.clone(),
            descricao: self.descricao.clone(),
            descricao_html: self.descricao_html.clone(),
            preco: self.preco.clone(),
            dormitorios: self.dormitorios,
            banheiros: self.banheiros,
            vagas: self.vagas,
            area: self.area,
            destaque: self.destaque,
            fotos: Some(lista.encode()),
            updated_at: Utc::now(),
        }
    }
}

fn non_empty(valor: &str) -> Option<String> {
    let valor = valor.trim();
    if valor.is_empty() {
        None
    } else {
        Some(valor.to_string())
    }
}

/// Counts are stored loosely: anything unparseable becomes NULL.
fn parse_count(valor: &str) -> Option<i32> {
    valor.trim().parse::<i32>().ok().filter(|n| *n >= 0)
}

fn parse_indices(valor: &str) -> Vec<usize> {
    valor
        .split(',')
        .filter_map(|t| t.trim().parse::<usize>().ok())
        .collect()
}
