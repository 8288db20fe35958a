//! Serves stored camper photos.
//!
//! References are opaque tokens handed out at registration time; the handler
//! resolves them through the roster service so the HTTP layer never touches
//! the filesystem directly.

use actix_web::{HttpResponse, get, web};

use crate::domain::AssetRef;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Fetch a stored photo by its reference.
#[utoipa::path(
    get,
    path = "/assets/{reference}",
    params(("reference" = String, Path, description = "Opaque asset reference")),
    responses(
        (status = 200, description = "The photo bytes"),
        (status = 404, description = "Unknown reference", body = crate::domain::Error)
    ),
    tags = ["assets"],
    operation_id = "getAsset"
)]
#[get("/assets/{reference}")]
pub async fn get_asset(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let reference = path.into_inner();
    let bytes = state.roster.asset(&AssetRef::new(&reference)).await?;
    let mime = mime_guess::from_path(&reference).first_or_octet_stream();
    Ok(HttpResponse::Ok()
        .content_type(mime.as_ref())
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::campers::tests::{
        multipart_body, multipart_content_type, nimal_fields, test_state,
    };
    use crate::inbound::http::campers::register_camper;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    #[actix_web::test]
    async fn uploaded_photo_round_trips_with_its_mime_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&dir).await))
                .service(register_camper)
                .service(get_asset),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/campers")
            .insert_header(("content-type", multipart_content_type()))
            .set_payload(multipart_body(&nimal_fields(), Some(("me.png", b"png-bytes"))))
            .to_request();
        let created: Value = actix_test::call_and_read_body_json(&app, request).await;
        let reference = created
            .get("imageRef")
            .and_then(Value::as_str)
            .expect("image ref");

        let request = actix_test::TestRequest::get()
            .uri(&format!("/assets/{reference}"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("image/png")
        );
        let body = actix_test::read_body(response).await;
        assert_eq!(body.as_ref(), b"png-bytes");
    }

    #[actix_web::test]
    async fn unknown_reference_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&dir).await))
                .service(get_asset),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/assets/12345-nope.jpg")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
