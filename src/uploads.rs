//! Photo binary storage: local upload directory plus an optional remote
//! image host.
//!
//! The rule for a batch of uploaded files: each file independently ends up
//! remote, or local when the remote upload fails, or skipped when both fail.
//! The photo list is only ever extended with references whose binary content
//! is already persisted, and one bad file never aborts the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{error, warn};

use crate::config::ImageHostConfig;
use crate::fotos::PhotoList;

/// A file received through the admin form, not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Strip any path components a client may have smuggled into the filename.
pub fn sanitize_filename(nome: &str) -> Option<String> {
    Path::new(nome)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty() && n != "." && n != "..")
}

/// Persist bytes under the upload directory, returning the stored filename
/// (the reference token for a local photo).
pub fn save_local(upload_dir: &str, filename: &str, bytes: &[u8]) -> Result<String> {
    let nome = sanitize_filename(filename).ok_or_else(|| anyhow!("invalid filename {filename}"))?;
    fs::create_dir_all(upload_dir)
        .with_context(|| format!("creating upload dir {upload_dir}"))?;
    let destino: PathBuf = Path::new(upload_dir).join(&nome);
    fs::write(&destino, bytes).with_context(|| format!("writing {}", destino.display()))?;
    Ok(nome)
}

/// Public URL for a stored photo reference. Remote entries are already
/// absolute; local filenames resolve under the upload directory, which the
/// static file route serves (so it must live inside `static/`).
pub fn public_url(upload_dir: &str, entry: &str) -> String {
    if PhotoList::is_remote(entry) {
        entry.to_string()
    } else {
        format!("/{}/{}", upload_dir.trim_matches('/'), entry)
    }
}

/// Delete the local files a listing referenced. Called on listing delete;
/// remote URLs are left alone and already-missing files are not an error.
pub fn remove_local(upload_dir: &str, lista: &PhotoList) {
    for nome in lista.locals() {
        let Some(nome) = sanitize_filename(nome) else {
            continue;
        };
        let caminho = Path::new(upload_dir).join(nome);
        match fs::remove_file(&caminho) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove {}: {e}", caminho.display()),
        }
    }
}

/// Client for a Cloudinary-style unsigned upload endpoint. The response is
/// expected to carry the stable URL in `secure_url`.
pub struct ImageHost {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
    folder: Option<String>,
}

impl ImageHost {
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        }
    }

    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let resposta = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("posting {filename} to {}", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("image host rejected {filename}"))?;

        let body: serde_json::Value = resposta.json().await.context("decoding upload response")?;
        body.get("secure_url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("upload response for {filename} missing secure_url"))
    }

    /// Upload an already-persisted local file, used by the photo migration.
    pub async fn upload_path(&self, caminho: &Path) -> Result<String> {
        let bytes = fs::read(caminho).with_context(|| format!("reading {}", caminho.display()))?;
        let nome = caminho
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "foto".to_string());
        self.upload(&nome, bytes).await
    }
}

/// Persist a batch of form uploads and return the reference tokens to append
/// to the listing's photo list, in submission order.
pub async fn store_batch(
    image_host: Option<&ImageHost>,
    upload_dir: &str,
    fotos: Vec<UploadedPhoto>,
) -> Vec<String> {
    let mut referencias = Vec::with_capacity(fotos.len());

    for foto in fotos {
        if let Some(host) = image_host {
            match host.upload(&foto.filename, foto.bytes.clone()).await {
                Ok(url) => {
                    referencias.push(url);
                    continue;
                }
                Err(e) => {
                    error!("remote upload of {} failed, keeping local copy: {e:#}", foto.filename);
                }
            }
        }
        match save_local(upload_dir, &foto.filename, &foto.bytes) {
            Ok(nome) => referencias.push(nome),
            Err(e) => error!("skipping {}: {e:#}", foto.filename),
        }
    }

    referencias
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(sanitize_filename("casa1_1.jpg").as_deref(), Some("casa1_1.jpg"));
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename(".."), None);
    }

    #[test]
    fn public_url_follows_the_configured_upload_dir() {
        assert_eq!(
            public_url("static/uploads", "casa.jpg"),
            "/static/uploads/casa.jpg"
        );
        assert_eq!(public_url("static/fotos/", "casa.jpg"), "/static/fotos/casa.jpg");
        assert_eq!(
            public_url("static/uploads", "https://img.example/casa.jpg"),
            "https://img.example/casa.jpg"
        );
    }

    #[test]
    fn save_and_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().to_str().unwrap();

        let nome = save_local(upload_dir, "casa1_1.jpg", b"jpeg").unwrap();
        assert_eq!(nome, "casa1_1.jpg");
        assert!(dir.path().join("casa1_1.jpg").exists());

        let lista = PhotoList::decode("casa1_1.jpg,https://img.example/casa.jpg,perdida.jpg");
        remove_local(upload_dir, &lista);
        assert!(!dir.path().join("casa1_1.jpg").exists());
    }
}
