//! Routes mutating the principal. Every change is saved to the session, then
//! the browser is sent back to `/`.

use actix_web::http::header;
use actix_web::{get, web, HttpResponse};

use actix_access_control_core::http::access::Principal;

fn back_home() -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/"))
        .finish()
}

/// Grants a role and logs the principal in if needed.
#[get("/add/{credential}")]
pub async fn add(
    principal: Principal,
    credential: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let credential = credential.into_inner();
    principal.grant(credential.as_str()).await?;
    if !principal.is_logged_in() {
        principal.login().await?;
    }
    log::info!("granted '{}', roles now {:?}", credential, principal.roles());
    Ok(back_home())
}

/// Revokes a role; logs out once no role is left.
#[get("/remove/{credential}")]
pub async fn remove(
    principal: Principal,
    credential: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let credential = credential.into_inner();
    principal.revoke(credential.as_str()).await?;
    if principal.roles().is_empty() {
        principal.logout().await?;
    }
    log::info!("revoked '{}', roles now {:?}", credential, principal.roles());
    Ok(back_home())
}

#[get("/logout")]
pub async fn logout(principal: Principal) -> actix_web::Result<HttpResponse> {
    principal.logout().await?;
    log::info!("principal logged out");
    Ok(back_home())
}

#[cfg(test)]
mod tests {
    use actix_session::storage::CookieSessionStore;
    use actix_session::SessionMiddleware;
    use actix_web::cookie::Key;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use actix_access_control_core::http::access::AccessControl;

    use super::*;

    #[actix_web::test]
    async fn test_credential_routes_redirect_home() {
        let app = test::init_service(
            App::new()
                .wrap(AccessControl::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .service(add)
                .service(remove)
                .service(logout),
        )
        .await;

        for uri in ["/add/admin", "/remove/admin", "/logout"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
            assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/", "{}", uri);
        }
    }
}
