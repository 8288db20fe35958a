//! Camper roster HTTP handlers.
//!
//! ```text
//! POST   /campers            Register a camper (multipart, optional photo)
//! GET    /campers            Full roster, newest-first
//! GET    /campers/overview   Filtered view plus roster-wide counts
//! GET    /campers/{id}       Single camper
//! PATCH  /campers/{id}       Partial update (JSON, optional CAS token)
//! PUT    /campers/{id}       Full update (multipart, optional new photo)
//! DELETE /campers/{id}       Delete a camper and its photo
//! ```

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Camper, CamperPatch, Error, Projection, RegisterCamper, RosterCounts, RosterFilter, Upload,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    optional_text, parse_age, parse_camper_id, parse_payment, require_text,
};

/// Multipart form shared by registration and full update.
///
/// Every field is optional at the extractor level so missing-field failures
/// surface through the domain error envelope instead of an opaque 400.
#[derive(Debug, MultipartForm)]
pub struct CamperForm {
    name: Option<Text<String>>,
    age: Option<Text<String>>,
    #[multipart(rename = "phoneNumber")]
    phone_number: Option<Text<String>>,
    area: Option<Text<String>>,
    team: Option<Text<String>>,
    school: Option<Text<String>>,
    remarks: Option<Text<String>>,
    payment: Option<Text<String>>,
    image: Option<TempFile>,
}

/// Response payload for a single camper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CamperResponse {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub phone_number: String,
    pub area: String,
    pub team: String,
    pub school: String,
    pub remarks: Option<String>,
    pub payment: Option<f64>,
    pub image_ref: Option<String>,
    pub arrived_for_bus: bool,
    pub arrived_camp_site: bool,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Camper> for CamperResponse {
    fn from(value: Camper) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            age: value.age,
            phone_number: value.phone_number,
            area: value.area,
            team: value.team,
            school: value.school,
            remarks: value.remarks,
            payment: value.payment,
            image_ref: value.image_ref.map(|reference| reference.to_string()),
            arrived_for_bus: value.arrived_for_bus,
            arrived_camp_site: value.arrived_camp_site,
            version: value.version,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for the overview endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub campers: Vec<CamperResponse>,
    pub counts: RosterCounts,
}

impl From<Projection> for OverviewResponse {
    fn from(value: Projection) -> Self {
        Self {
            campers: value.campers.into_iter().map(CamperResponse::from).collect(),
            counts: value.counts,
        }
    }
}

/// Deletion confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

async fn read_upload(file: Option<TempFile>) -> Result<Option<Upload>, Error> {
    let Some(file) = file else {
        return Ok(None);
    };
    // A part with no filename (or no content) is "no new photo", not an
    // empty photo; replacing the image on that basis would erase it.
    let Some(original_name) = file.file_name.clone().filter(|name| !name.is_empty()) else {
        return Ok(None);
    };
    if file.size == 0 {
        return Ok(None);
    }
    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(|error| Error::internal(format!("failed to read uploaded file: {error}")))?;
    Ok(Some(Upload {
        bytes,
        original_name,
    }))
}

async fn parse_camper_form(form: CamperForm) -> Result<(RegisterCamper, Option<Upload>), Error> {
    let request = RegisterCamper {
        name: require_text(form.name.map(|field| field.0), "name")?,
        age: parse_age(form.age.map(|field| field.0))?,
        phone_number: require_text(form.phone_number.map(|field| field.0), "phoneNumber")?,
        area: require_text(form.area.map(|field| field.0), "area")?,
        team: require_text(form.team.map(|field| field.0), "team")?,
        school: require_text(form.school.map(|field| field.0), "school")?,
        remarks: optional_text(form.remarks.map(|field| field.0)),
        payment: parse_payment(form.payment.map(|field| field.0))?,
    };
    let upload = read_upload(form.image).await?;
    Ok((request, upload))
}

/// Register a new camper.
#[utoipa::path(
    post,
    path = "/campers",
    responses(
        (status = 201, description = "Camper registered", body = CamperResponse),
        (status = 400, description = "Validation failure", body = crate::domain::Error),
        (status = 500, description = "Storage failure", body = crate::domain::Error)
    ),
    tags = ["campers"],
    operation_id = "registerCamper"
)]
#[post("/campers")]
pub async fn register_camper(
    state: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<CamperForm>,
) -> ApiResult<HttpResponse> {
    let (request, upload) = parse_camper_form(form).await?;
    let camper = state.roster.register(request, upload).await?;
    Ok(HttpResponse::Created().json(CamperResponse::from(camper)))
}

/// The full roster, newest-first.
#[utoipa::path(
    get,
    path = "/campers",
    responses(
        (status = 200, description = "All campers, newest first", body = [CamperResponse])
    ),
    tags = ["campers"],
    operation_id = "listCampers"
)]
#[get("/campers")]
pub async fn list_campers(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CamperResponse>>> {
    let roster = state.roster.list().await?;
    Ok(web::Json(
        roster.into_iter().map(CamperResponse::from).collect(),
    ))
}

/// Filtered roster view plus group-by counts over the unfiltered roster.
#[utoipa::path(
    get,
    path = "/campers/overview",
    params(RosterFilter),
    responses(
        (status = 200, description = "Filtered campers and counts", body = OverviewResponse)
    ),
    tags = ["campers"],
    operation_id = "rosterOverview"
)]
#[get("/campers/overview")]
pub async fn roster_overview(
    state: web::Data<HttpState>,
    filter: web::Query<RosterFilter>,
) -> ApiResult<web::Json<OverviewResponse>> {
    let projection = state.roster.overview(&filter).await?;
    Ok(web::Json(OverviewResponse::from(projection)))
}

/// Fetch a single camper.
#[utoipa::path(
    get,
    path = "/campers/{id}",
    params(("id" = String, Path, description = "Camper identifier")),
    responses(
        (status = 200, description = "The camper", body = CamperResponse),
        (status = 404, description = "Unknown camper", body = crate::domain::Error)
    ),
    tags = ["campers"],
    operation_id = "getCamper"
)]
#[get("/campers/{id}")]
pub async fn get_camper(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CamperResponse>> {
    let id = parse_camper_id(&path)?;
    let camper = state.roster.fetch(id).await?;
    Ok(web::Json(CamperResponse::from(camper)))
}

/// Partial update: merge the supplied fields into the camper.
#[utoipa::path(
    patch,
    path = "/campers/{id}",
    params(("id" = String, Path, description = "Camper identifier")),
    request_body = CamperPatch,
    responses(
        (status = 200, description = "Updated camper", body = CamperResponse),
        (status = 400, description = "Validation failure", body = crate::domain::Error),
        (status = 404, description = "Unknown camper", body = crate::domain::Error),
        (status = 409, description = "Version conflict", body = crate::domain::Error)
    ),
    tags = ["campers"],
    operation_id = "amendCamper"
)]
#[patch("/campers/{id}")]
pub async fn amend_camper(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CamperPatch>,
) -> ApiResult<web::Json<CamperResponse>> {
    let id = parse_camper_id(&path)?;
    let camper = state.roster.amend(id, payload.into_inner()).await?;
    Ok(web::Json(CamperResponse::from(camper)))
}

/// Full update; the photo is replaced only when a new file part is present.
#[utoipa::path(
    put,
    path = "/campers/{id}",
    params(("id" = String, Path, description = "Camper identifier")),
    responses(
        (status = 200, description = "Updated camper", body = CamperResponse),
        (status = 400, description = "Validation failure", body = crate::domain::Error),
        (status = 404, description = "Unknown camper", body = crate::domain::Error),
        (status = 500, description = "Storage failure", body = crate::domain::Error)
    ),
    tags = ["campers"],
    operation_id = "replaceCamper"
)]
#[put("/campers/{id}")]
pub async fn replace_camper(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    MultipartForm(form): MultipartForm<CamperForm>,
) -> ApiResult<web::Json<CamperResponse>> {
    let id = parse_camper_id(&path)?;
    let (request, upload) = parse_camper_form(form).await?;
    let camper = state.roster.replace(id, request, upload).await?;
    Ok(web::Json(CamperResponse::from(camper)))
}

/// Delete a camper; its stored photo is discarded as part of the deletion.
#[utoipa::path(
    delete,
    path = "/campers/{id}",
    params(("id" = String, Path, description = "Camper identifier")),
    responses(
        (status = 200, description = "Deletion confirmation", body = DeleteResponse),
        (status = 404, description = "Unknown camper", body = crate::domain::Error)
    ),
    tags = ["campers"],
    operation_id = "deleteCamper"
)]
#[delete("/campers/{id}")]
pub async fn delete_camper(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let id = parse_camper_id(&path)?;
    state.roster.remove(id).await?;
    Ok(web::Json(DeleteResponse {
        id: id.to_string(),
        deleted: true,
    }))
}
