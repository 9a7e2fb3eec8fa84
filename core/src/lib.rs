//! # Actix Access Control
//!
//! Role based access control for Actix Web.
//!
//! A request passes through the [`AccessControl`](http::access::AccessControl)
//! middleware, which loads the caller's credentials, attaches a
//! [`Principal`](http::access::Principal) to the request and applies the
//! global login/role gates to secured paths. Individual routes can add their
//! own gates with [`Secure`](http::access::Secure).
//!
//! ## Example
//!
//! ```rust,ignore
//! use actix_web::{web, App, HttpResponse};
//! use actix_access_control_core::roles;
//! use actix_access_control_core::http::access::{AccessControl, AccessControlConfig, Principal, Secure};
//!
//! let access = AccessControl::new(
//!     AccessControlConfig::default()
//!         .secured_path("/admin")
//!         .required_roles("admin"),
//! );
//!
//! App::new()
//!     .wrap(access)
//!     .service(
//!         web::resource("/moderation")
//!             .wrap(Secure::has(roles!["admin", ["moderator", "editor"]]))
//!             .to(|| async { HttpResponse::Ok().finish() }),
//!     )
//!     .route("/promote", web::post().to(|principal: Principal| async move {
//!         principal.grant("moderator").await?;
//!         Ok::<_, actix_web::Error>(HttpResponse::Ok().finish())
//!     }));
//! ```

pub mod http;
