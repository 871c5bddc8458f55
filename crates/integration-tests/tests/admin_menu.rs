//! Integration tests for admin sign-in and menu management.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use flavors_core::{CatalogReader, MenuQuery};
use flavors_integration_tests::{
    ADMIN_EMAIL, AdminHarness, Part, body_string, dish, form_request, get, location,
    multipart_request, send, session_cookie,
};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-bytes";

fn item_parts<'a>(name: &'a str, full_price: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("name", name),
        Part::Text("description", "Smoky, slow-roasted and generously spiced."),
        Part::Text("category", "Starters"),
        Part::Text("full_price", full_price),
        Part::Text("half_price", "120"),
        Part::Text("has_half_quantity", "on"),
        Part::Text("is_available", "on"),
    ]
}

#[tokio::test]
async fn test_dashboard_requires_login() {
    let admin = AdminHarness::new(Vec::new());

    let response = send(&admin.router, get("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));

    let response = send(&admin.router, get("/", None)).await;
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let admin = AdminHarness::new(Vec::new());

    let response = send(
        &admin.router,
        form_request(
            "/auth/login",
            &format!("email={ADMIN_EMAIL}&password=not-the-password"),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(response).await.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_login_then_logout() {
    let admin = AdminHarness::new(vec![dish("Paneer Tikka", "Starters", 240, Some(140))]);
    let cookie = admin.login().await;
    assert!(cookie.starts_with("fx_admin_session="));

    let response = send(&admin.router, get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("Paneer Tikka"));
    assert!(page.contains("₹140.00"));
    assert!(page.contains(ADMIN_EMAIL));

    let response = send(&admin.router, form_request("/auth/logout", "", Some(&cookie))).await;
    assert_eq!(location(&response), Some("/auth/login"));

    let response = send(&admin.router, get("/dashboard", Some(&cookie))).await;
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn test_create_item_with_image() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;

    let mut parts = item_parts("Tandoori Chicken", "220");
    parts.push(Part::File {
        name: "image",
        filename: "tandoori chicken.png",
        content_type: "image/png",
        bytes: PNG,
    });

    let response = send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));

    let items = admin.catalog.list(&MenuQuery::all()).await.unwrap();
    assert_eq!(items.len(), 1);
    let item = items.first().unwrap();
    assert_eq!(item.name, "Tandoori Chicken");
    assert_eq!(item.half_price().map(|p| p.to_string()), Some("120".to_string()));
    assert!(!item.is_featured);

    let url = item.image_url.as_deref().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with("-tandoori_chicken.png"));
    assert_eq!(std::fs::read(admin.upload_path(url)).unwrap(), PNG);

    // The image is served back under its URL
    let response = send(&admin.router, get(url, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_string(send(&admin.router, get("/dashboard", Some(&cookie))).await).await;
    assert!(page.contains("was added to the menu."));
}

#[tokio::test]
async fn test_create_invalid_item_shows_errors() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;

    let parts = vec![
        Part::Text("name", "X"),
        Part::Text("description", "Too short"),
        Part::Text("category", "Mains"),
        Part::Text("full_price", "-5"),
        Part::Text("has_half_quantity", "on"),
    ];
    let response = send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let page = body_string(response).await;
    assert!(page.contains("Name must be at least 2 characters."));
    assert!(page.contains("Description must be at least 10 characters."));
    assert!(page.contains("Price must be a positive number."));
    assert!(page.contains("Half price is required when half quantity is enabled."));
    assert!(admin.catalog.list(&MenuQuery::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_non_image_upload() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;

    let mut parts = item_parts("Masala Papad", "60");
    parts.push(Part::File {
        name: "image",
        filename: "menu.html",
        content_type: "text/html",
        bytes: b"<html></html>",
    });

    let response = send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("Please choose an image file."));
    assert!(admin.catalog.list(&MenuQuery::all()).await.unwrap().is_empty());
    assert_eq!(std::fs::read_dir(admin.uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_create_rejects_oversized_image() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;

    let big = vec![0_u8; 64 * 1024 + 1];
    let mut parts = item_parts("Masala Papad", "60");
    parts.push(Part::File {
        name: "image",
        filename: "huge.png",
        content_type: "image/png",
        bytes: &big,
    });

    let response = send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("Image must be at most 64 KB."));
}

#[tokio::test]
async fn test_edit_keeps_image_unless_replaced() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;

    let mut parts = item_parts("Seekh Kebab", "260");
    parts.push(Part::File {
        name: "image",
        filename: "kebab.png",
        content_type: "image/png",
        bytes: PNG,
    });
    send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    let item = admin.catalog.list(&MenuQuery::all()).await.unwrap().remove(0);
    let first_image = item.image_url.clone().unwrap();

    let form = send(
        &admin.router,
        get(&format!("/dashboard/edit/{}", item.id), Some(&cookie)),
    )
    .await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body_string(form).await.contains("Seekh Kebab"));

    // No new file: the image stays
    let response = send(
        &admin.router,
        multipart_request(
            &format!("/dashboard/edit/{}", item.id),
            &item_parts("Seekh Kebab Platter", "300"),
            &cookie,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let updated = admin.catalog.get(item.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "Seekh Kebab Platter");
    assert_eq!(updated.image_url.as_deref(), Some(first_image.as_str()));

    // A new file replaces the old one, which is removed from disk
    let mut parts = item_parts("Seekh Kebab Platter", "300");
    parts.push(Part::File {
        name: "image",
        filename: "platter.png",
        content_type: "image/png",
        bytes: PNG,
    });
    send(
        &admin.router,
        multipart_request(&format!("/dashboard/edit/{}", item.id), &parts, &cookie),
    )
    .await;
    let updated = admin.catalog.get(item.id).await.unwrap().unwrap();
    let second_image = updated.image_url.unwrap();
    assert!(second_image.ends_with("-platter.png"));
    assert!(admin.upload_path(&second_image).exists());
    assert!(!admin.upload_path(&first_image).exists());
}

#[tokio::test]
async fn test_edit_unknown_item_is_not_found() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;
    let missing = dish("Ghost Curry", "Mains", 100, None);

    let response = send(
        &admin.router,
        get(&format!("/dashboard/edit/{}", missing.id), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("No such menu item."));
}

#[tokio::test]
async fn test_delete_removes_item_and_image() {
    let admin = AdminHarness::new(Vec::new());
    let cookie = admin.login().await;

    let mut parts = item_parts("Gulab Jamun", "90");
    parts.push(Part::File {
        name: "image",
        filename: "jamun.png",
        content_type: "image/png",
        bytes: PNG,
    });
    send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    let item = admin.catalog.list(&MenuQuery::all()).await.unwrap().remove(0);
    let image = item.image_url.clone().unwrap();

    let response = send(
        &admin.router,
        form_request(&format!("/dashboard/delete/{}", item.id), "", Some(&cookie)),
    )
    .await;
    assert_eq!(location(&response), Some("/dashboard"));
    assert!(admin.catalog.get(item.id).await.unwrap().is_none());
    assert!(!admin.upload_path(&image).exists());

    let page = body_string(send(&admin.router, get("/dashboard", Some(&cookie))).await).await;
    assert!(page.contains("was deleted."));
    assert!(!page.contains("Gulab Jamun</td>"));
}

#[tokio::test]
async fn test_delete_succeeds_when_image_cleanup_fails() {
    let admin = AdminHarness::with_stuck_images(Vec::new());
    let cookie = admin.login().await;

    let mut parts = item_parts("Rasmalai", "110");
    parts.push(Part::File {
        name: "image",
        filename: "rasmalai.png",
        content_type: "image/png",
        bytes: PNG,
    });
    send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    let item = admin.catalog.list(&MenuQuery::all()).await.unwrap().remove(0);
    let image = item.image_url.clone().unwrap();

    let response = send(
        &admin.router,
        form_request(&format!("/dashboard/delete/{}", item.id), "", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
    assert!(admin.catalog.get(item.id).await.unwrap().is_none());
    assert!(admin.upload_path(&image).exists());

    let page = body_string(send(&admin.router, get("/dashboard", Some(&cookie))).await).await;
    assert!(page.contains("was deleted, but its image could not be removed."));
}

#[tokio::test]
async fn test_edit_succeeds_when_old_image_cleanup_fails() {
    let admin = AdminHarness::with_stuck_images(Vec::new());
    let cookie = admin.login().await;

    let mut parts = item_parts("Tandoori Chicken", "320");
    parts.push(Part::File {
        name: "image",
        filename: "tandoori.png",
        content_type: "image/png",
        bytes: PNG,
    });
    send(
        &admin.router,
        multipart_request("/dashboard/new", &parts, &cookie),
    )
    .await;
    let item = admin.catalog.list(&MenuQuery::all()).await.unwrap().remove(0);
    let first_image = item.image_url.clone().unwrap();

    let mut parts = item_parts("Tandoori Chicken", "340");
    parts.push(Part::File {
        name: "image",
        filename: "tandoori-new.png",
        content_type: "image/png",
        bytes: PNG,
    });
    let response = send(
        &admin.router,
        multipart_request(&format!("/dashboard/edit/{}", item.id), &parts, &cookie),
    )
    .await;
    assert_eq!(location(&response), Some("/dashboard"));

    let updated = admin.catalog.get(item.id).await.unwrap().unwrap();
    let second_image = updated.image_url.unwrap();
    assert_ne!(second_image, first_image);
    assert!(second_image.ends_with("-tandoori-new.png"));
    assert!(admin.upload_path(&first_image).exists());

    let page = body_string(send(&admin.router, get("/dashboard", Some(&cookie))).await).await;
    assert!(page.contains("was updated, but its previous image could not be removed."));
}

#[tokio::test]
async fn test_session_cookie_is_not_reused_across_login() {
    let admin = AdminHarness::new(Vec::new());

    let response = send(&admin.router, get("/auth/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let before = session_cookie(&response);

    let after = admin.login().await;
    assert_ne!(before.as_deref(), Some(after.as_str()));
}
