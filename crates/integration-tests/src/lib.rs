//! Integration tests for Flavors Express.
//!
//! Both sites are driven in-process through their routers, with the
//! in-memory catalog, an in-memory session store and a temporary upload
//! directory standing in for `PostgreSQL` and the real disk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p flavors-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `storefront_cart` - Cart, menu and WhatsApp checkout flows
//! - `admin_menu` - Sign-in and menu item management

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use flavors_admin::config::{AdminConfig, AdminCredentials, UploadsConfig};
use flavors_admin::images::{ImageError, ImageStore, LocalImageStore};
use flavors_core::{
    Currency, Email, MemoryCatalog, MenuItem, MenuItemId, MenuPrice, MenuSnapshot,
    OrderDestination,
};
use flavors_storefront::config::{RestaurantConfig, StorefrontConfig};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// Owner account used by the admin tests.
pub const ADMIN_EMAIL: &str = "owner@flavorsexpress.in";
pub const ADMIN_PASSWORD: &str = "tandoori-nights";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "----flavors-test-boundary";

/// Build a menu item. Prices are in whole currency units.
#[must_use]
pub fn dish(name: &str, category: &str, full: i64, half: Option<i64>) -> MenuItem {
    let price = match half {
        Some(half) => MenuPrice::with_half(Decimal::new(full, 0), Decimal::new(half, 0)),
        None => MenuPrice::full_only(Decimal::new(full, 0)),
    };

    MenuItem {
        id: MenuItemId::generate(),
        name: name.to_string(),
        description: format!("{name}, made fresh to order."),
        category: category.to_string(),
        price,
        has_half_quantity: half.is_some(),
        is_available: true,
        is_featured: false,
        image_url: None,
    }
}

/// Storefront router with a fixed menu and in-memory sessions.
#[must_use]
pub fn storefront(items: Vec<MenuItem>, phone: Option<&str>) -> Router {
    let config = StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/flavors_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        restaurant: RestaurantConfig {
            name: "Flavors Express".to_string(),
            phone: phone.map(|p| OrderDestination::parse(p).unwrap()),
            currency: Currency::INR,
        },
        menu_refresh: Duration::from_secs(15),
        uploads_dir: PathBuf::from("uploads"),
        sentry_dsn: None,
        sentry_environment: None,
    };

    let snapshot = MenuSnapshot::from_items(
        items
            .iter()
            .filter(|i| i.is_available)
            .cloned()
            .collect(),
    );
    let catalog = Arc::new(MemoryCatalog::with_items(items));
    let menu = flavors_storefront::feed::fixed(snapshot);
    let state = flavors_storefront::state::AppState::new(config, catalog, menu);

    flavors_storefront::router(state).layer(
        flavors_storefront::middleware::create_session_layer(MemoryStore::default(), false),
    )
}

/// Admin panel wired to an in-memory catalog and a temporary upload dir.
pub struct AdminHarness {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub uploads: TempDir,
}

impl AdminHarness {
    #[must_use]
    pub fn new(items: Vec<MenuItem>) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let images = Arc::new(LocalImageStore::new(uploads.path(), "/uploads"));
        Self::build(items, uploads, images)
    }

    /// Harness whose image store keeps uploads but never manages to delete.
    #[must_use]
    pub fn with_stuck_images(items: Vec<MenuItem>) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let images = Arc::new(StuckImageStore(LocalImageStore::new(
            uploads.path(),
            "/uploads",
        )));
        Self::build(items, uploads, images)
    }

    fn build(items: Vec<MenuItem>, uploads: TempDir, images: Arc<dyn ImageStore>) -> Self {
        let password_hash = flavors_admin::services::hash_password(ADMIN_PASSWORD).unwrap();

        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/flavors_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            credentials: AdminCredentials {
                email: Email::parse(ADMIN_EMAIL).unwrap(),
                password_hash: SecretString::from(password_hash),
            },
            currency: Currency::INR,
            uploads: UploadsConfig {
                dir: uploads.path().to_path_buf(),
                url_prefix: "/uploads".to_string(),
                max_bytes: 64 * 1024,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let catalog = Arc::new(MemoryCatalog::with_items(items));
        let state = flavors_admin::state::AppState::new(config, catalog.clone(), images);
        let router = flavors_admin::router(state).layer(
            flavors_admin::middleware::create_session_layer(MemoryStore::default(), false),
        );

        Self {
            router,
            catalog,
            uploads,
        }
    }

    /// Sign in as the owner and return the session cookie.
    pub async fn login(&self) -> String {
        let response = send(
            &self.router,
            form_request(
                "/auth/login",
                &format!("email={ADMIN_EMAIL}&password={ADMIN_PASSWORD}"),
                None,
            ),
        )
        .await;
        assert_eq!(location(&response), Some("/dashboard"));
        session_cookie(&response).unwrap()
    }

    /// On-disk path for an image URL issued under `/uploads`.
    #[must_use]
    pub fn upload_path(&self, url: &str) -> PathBuf {
        self.uploads
            .path()
            .join(url.trim_start_matches("/uploads/"))
    }
}

/// Image store whose deletes always fail with an I/O error.
struct StuckImageStore(LocalImageStore);

#[async_trait]
impl ImageStore for StuckImageStore {
    async fn upload(&self, bytes: &[u8], filename_hint: &str) -> Result<String, ImageError> {
        self.0.upload(bytes, filename_hint).await
    }

    async fn delete(&self, _url: &str) -> Result<(), ImageError> {
        Err(ImageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only upload volume",
        )))
    }
}

/// Send one request through a router.
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

/// `GET uri`, optionally with a cookie.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// URL-encoded `POST uri`.
#[must_use]
pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Encode parts as `multipart/form-data` with [`BOUNDARY`].
#[must_use]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Multipart `POST uri` with a session cookie.
#[must_use]
pub fn multipart_request(uri: &str, parts: &[Part<'_>], cookie: &str) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// `name=value` of the session cookie set by a response.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_string)
}

/// The redirect target of a response.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response.headers().get(header::LOCATION)?.to_str().ok()
}

/// Read a response body as UTF-8.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
