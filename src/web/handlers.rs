//! Route handlers. Database access is synchronous diesel called directly
//! from the async handlers; every request is one connection, used to
//! completion, exactly one read or one write per operation.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{Datelike, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tera::Context;

use super::error::AppError;
use super::forms::ListingForm;
use super::AppState;
use crate::auth;
use crate::db;
use crate::fotos::PhotoList;
use crate::models::listing::Listing;
use crate::query::{ListParams, ListingQuery};
use crate::uploads;

/// Catalog/admin row: the listing plus its decoded photo list, so templates
/// never touch the stored comma-joined form.
#[derive(Serialize)]
struct ListingCard {
    #[serde(flatten)]
    imovel: Listing,
    foto_capa: Option<String>,
    total_fotos: usize,
}

impl ListingCard {
    fn new(imovel: Listing, upload_dir: &str) -> Self {
        let fotos = imovel.fotos();
        let foto_capa = fotos
            .entries()
            .first()
            .map(|e| uploads::public_url(upload_dir, e));
        let total_fotos = fotos.len();
        Self {
            imovel,
            foto_capa,
            total_fotos,
        }
    }
}

/// A photo on the edit page: the stored reference and where it is served.
#[derive(Serialize)]
struct FotoView {
    nome: String,
    url: String,
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Result<Html<String>, AppError> {
    Ok(Html(state.tera.render(template, ctx)?))
}

fn require_operator(jar: &SignedCookieJar) -> Result<(), AppError> {
    if auth::is_authenticated(jar) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn base_context(jar: &SignedCookieJar) -> Context {
    let mut ctx = Context::new();
    ctx.insert("current_year", &Utc::now().year());
    ctx.insert("autenticado", &auth::is_authenticated(jar));
    // Pages without a flash still render the base template.
    ctx.insert("mensagem", &Option::<String>::None);
    ctx
}

/// GET / — public catalog with filters and sorting.
pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let filtro = ListingQuery::from_params(&params);
    let mut conn = db::connect(&state.config)?;

    // "#id" resolves a single listing by identity and ignores every filter.
    // Digits past the id column's range cannot match a row, so they take
    // the not-found path.
    if let Some(alvo) = filtro.busca_por_id() {
        let existente = match alvo.parse::<i32>() {
            Ok(id) => db::listing::get(&mut conn, id)?,
            Err(_) => None,
        };
        return Ok(match existente {
            Some(imovel) => {
                (jar, Redirect::to(&format!("/imovel/{}", imovel.id))).into_response()
            }
            None => {
                let jar = auth::flash(jar, &format!("Nenhum imóvel encontrado com o ID #{alvo}."));
                (jar, Redirect::to("/")).into_response()
            }
        });
    }

    let imoveis: Vec<ListingCard> = db::listing::search(&mut conn, &filtro)?
        .into_iter()
        .map(|l| ListingCard::new(l, state.config.upload_dir()))
        .collect();
    let (jar, mensagem) = auth::take_flash(jar);

    let mut ctx = base_context(&jar);
    ctx.insert("imoveis", &imoveis);
    ctx.insert("mensagem", &mensagem);
    // Current filter values, so the form keeps what was typed.
    ctx.insert("busca", params.busca.as_deref().unwrap_or(""));
    ctx.insert("f_dormitorios", params.dormitorios.as_deref().unwrap_or(""));
    ctx.insert("f_banheiros", params.banheiros.as_deref().unwrap_or(""));
    ctx.insert("ordenar", params.ordenar.as_deref().unwrap_or(""));
    ctx.insert("somente_destaque", &filtro.somente_destaque);
    let pagina = render(&state, "index.html", &ctx)?;
    Ok((jar, pagina).into_response())
}

/// GET /imovel/{id} — detail view.
pub async fn detalhes(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let mut conn = db::connect(&state.config)?;
    let imovel = db::listing::get(&mut conn, id)?.ok_or(AppError::NotFound)?;
    let fotos: Vec<String> = imovel
        .fotos()
        .iter()
        .map(|e| uploads::public_url(state.config.upload_dir(), e))
        .collect();

    let mut ctx = base_context(&jar);
    ctx.insert("imovel", &imovel);
    ctx.insert("fotos", &fotos);
    render(&state, "detalhes.html", &ctx)
}

#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login
pub async fn login_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, mensagem) = auth::take_flash(jar);
    let mut ctx = base_context(&jar);
    ctx.insert("mensagem", &mensagem);
    let pagina = render(&state, "login.html", &ctx)?;
    Ok((jar, pagina).into_response())
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if state.credentials.verify(&form.username, &form.password) {
        info!("operator {} logged in", form.username);
        let jar = auth::start_session(jar, &form.username);
        Ok((jar, Redirect::to("/admin")).into_response())
    } else {
        warn!("failed login attempt");
        let jar = auth::flash(jar, "Usuário ou senha incorretos");
        Ok((jar, Redirect::to("/login")).into_response())
    }
}

/// GET /logout
pub async fn logout(jar: SignedCookieJar) -> Response {
    let jar = auth::end_session(jar);
    (jar, Redirect::to("/")).into_response()
}

/// GET /admin — full table plus the add form.
pub async fn admin(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    require_operator(&jar)?;
    let mut conn = db::connect(&state.config)?;
    let imoveis: Vec<ListingCard> = db::listing::get_all(&mut conn)?
        .into_iter()
        .map(|l| ListingCard::new(l, state.config.upload_dir()))
        .collect();
    let (jar, mensagem) = auth::take_flash(jar);

    let mut ctx = base_context(&jar);
    ctx.insert("imoveis", &imoveis);
    ctx.insert("mensagem", &mensagem);
    let pagina = render(&state, "admin.html", &ctx)?;
    Ok((jar, pagina).into_response())
}

/// POST /add — create a listing, persisting photos before the list is built.
pub async fn add_imovel(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response, AppError> {
    require_operator(&jar)?;
    let mut form = ListingForm::from_multipart(multipart).await?;

    let referencias = uploads::store_batch(
        state.image_host.as_deref(),
        state.config.upload_dir(),
        std::mem::take(&mut form.fotos),
    )
    .await;
    let mut lista = PhotoList::new();
    lista.append(referencias);

    let mut conn = db::connect(&state.config)?;
    let criado = db::listing::insert(&mut conn, &form.new_listing(&lista))?;
    info!("listing {} created", criado.id);

    Ok((jar, Redirect::to("/admin")).into_response())
}

/// GET /edit/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    require_operator(&jar)?;
    let mut conn = db::connect(&state.config)?;
    let imovel = db::listing::get(&mut conn, id)?.ok_or(AppError::NotFound)?;
    let fotos: Vec<FotoView> = imovel
        .fotos()
        .iter()
        .map(|e| FotoView {
            nome: e.to_string(),
            url: uploads::public_url(state.config.upload_dir(), e),
        })
        .collect();

    let mut ctx = base_context(&jar);
    ctx.insert("imovel", &imovel);
    ctx.insert("fotos", &fotos);
    let pagina = render(&state, "edit_imovel.html", &ctx)?;
    Ok((jar, pagina).into_response())
}

/// POST /edit/{id} — update fields and the photo list (removals first, then
/// newly uploaded photos appended).
pub async fn edit_imovel(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    require_operator(&jar)?;
    let mut conn = db::connect(&state.config)?;
    let imovel = db::listing::get(&mut conn, id)?.ok_or(AppError::NotFound)?;

    let mut form = ListingForm::from_multipart(multipart).await?;

    let mut lista = imovel.fotos();
    let invalidos = lista.remove_indices(&form.remover_fotos);
    if !invalidos.is_empty() {
        warn!("listing {id}: ignoring invalid photo positions {invalidos:?}");
    }

    let referencias = uploads::store_batch(
        state.image_host.as_deref(),
        state.config.upload_dir(),
        std::mem::take(&mut form.fotos),
    )
    .await;
    lista.append(referencias);

    db::listing::update(&mut conn, id, &form.update_listing(&lista))?;
    info!("listing {id} updated");

    Ok((jar, Redirect::to("/admin")).into_response())
}

/// GET /delete/{id} — remove the row and release its local photo files.
pub async fn delete_imovel(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    require_operator(&jar)?;
    let mut conn = db::connect(&state.config)?;
    let imovel = db::listing::get(&mut conn, id)?.ok_or(AppError::NotFound)?;

    uploads::remove_local(state.config.upload_dir(), &imovel.fotos());
    db::listing::delete(&mut conn, id)?;
    info!("listing {id} deleted");

    Ok((jar, Redirect::to("/admin")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing(fotos: Option<&str>) -> Listing {
        Listing {
            id: 1,
            titulo: "Casa".to_string(),
            descricao: "teste".to_string(),
            preco: "R$ 1".to_string(),
            dormitorios: None,
            banheiros: None,
            vagas: None,
            area: None,
            destaque: false,
            fotos: fotos.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            descricao_html: None,
        }
    }

    #[test]
    fn card_counts_come_from_the_decoded_list() {
        // Empty tokens in the stored form are not photos.
        let card = ListingCard::new(listing(Some("a.jpg,,b.jpg")), "static/uploads");
        assert_eq!(card.total_fotos, 2);
        assert_eq!(card.foto_capa.as_deref(), Some("/static/uploads/a.jpg"));

        let card = ListingCard::new(listing(None), "static/uploads");
        assert_eq!(card.total_fotos, 0);
        assert_eq!(card.foto_capa, None);
    }

    #[test]
    fn cover_photo_skips_blank_tokens_and_keeps_remote_urls() {
        let card = ListingCard::new(listing(Some(" , b.jpg")), "static/uploads");
        assert_eq!(card.foto_capa.as_deref(), Some("/static/uploads/b.jpg"));

        let card = ListingCard::new(listing(Some("https://img.example/c.jpg")), "static/uploads");
        assert_eq!(card.foto_capa.as_deref(), Some("https://img.example/c.jpg"));
    }
}
