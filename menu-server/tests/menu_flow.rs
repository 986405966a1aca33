//! End-to-end flows against an in-memory database: repository CRUD,
//! the menu pipeline, and the HTTP router with auth middleware.

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tower::ServiceExt;

use menu_server::auth::{AdminCredentials, JwtConfig, JwtService};
use menu_server::core::{Config, ServerState, build_router};
use menu_server::db::DbService;
use menu_server::db::models::{
    CategoryCreate, CategoryUpdate, DishCreate, DishUpdate, LocalizedText,
};
use menu_server::menu::{CategorySelection, FuzzyMatcher, MenuQuery, compute_menu};

async fn test_state() -> ServerState {
    test_state_in("/tmp/menu-server-test").await
}

async fn test_state_in(work_dir: &str) -> ServerState {
    let db = Surreal::new::<Mem>(()).await.expect("mem engine");
    let db_service = DbService::from_connection(db).await.expect("namespace");

    let mut config = Config::with_overrides(work_dir, 0);
    config.admin_username = "admin".to_string();
    config.jwt = JwtConfig {
        secret: "integration-test-secret-32-chars-min!".to_string(),
        expiration_minutes: 60,
        issuer: "menu-server".to_string(),
        audience: "menu-admin".to_string(),
    };

    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
    let admin = Arc::new(AdminCredentials::new("admin", "test-password").expect("hash"));

    ServerState::new(config, db_service.connection(), jwt_service, admin)
}

fn localized(pt: &str, en: &str) -> LocalizedText {
    LocalizedText::new(pt, en)
}

fn category_payload(slug: &str, order: i32) -> CategoryCreate {
    CategoryCreate {
        name: localized(slug, slug),
        slug: slug.to_string(),
        order,
        active: true,
    }
}

fn dish_payload(name: &str, category: Option<&str>, display_order: i32) -> DishCreate {
    DishCreate {
        name: localized(name, name),
        description: LocalizedText::default(),
        category: category.map(|c| c.to_string()),
        price: dec!(9.50),
        compare_at_price: None,
        images: Vec::new(),
        dietary_info: Default::default(),
        allergens: Vec::new(),
        spice_level: 0,
        badges: Vec::new(),
        search_tags: Vec::new(),
        display_order,
        available: true,
    }
}

#[tokio::test]
async fn category_crud_and_delete_guard() {
    let state = test_state().await;
    let categories = state.categories();
    let dishes = state.dishes();

    let starters = categories
        .create(category_payload("starters", 1))
        .await
        .expect("create");
    assert_eq!(
        starters.canonical_id().as_deref(),
        Some("category:starters")
    );

    // duplicate slug refused
    assert!(categories.create(category_payload("starters", 2)).await.is_err());

    // update order and name
    let updated = categories
        .update(
            "starters",
            CategoryUpdate {
                order: Some(5),
                name: Some(localized("Entradas", "Starters")),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.order, 5);
    assert_eq!(updated.name.en, "Starters");
    assert_eq!(updated.slug, "starters");

    // a referencing dish blocks deletion
    dishes
        .create(dish_payload("Samosas", Some("starters"), 1))
        .await
        .expect("dish");
    assert!(categories.delete("starters").await.is_err());

    // unreferenced category deletes fine
    categories
        .create(category_payload("drinks", 9))
        .await
        .expect("create");
    assert!(categories.delete("category:drinks").await.expect("delete"));
    assert!(categories.find_by_id("drinks").await.expect("find").is_none());
}

#[tokio::test]
async fn dish_lifecycle() {
    let state = test_state().await;
    state
        .categories()
        .create(category_payload("mains", 1))
        .await
        .expect("category");
    let dishes = state.dishes();

    // unknown category refused
    assert!(dishes
        .create(dish_payload("Ghost", Some("nope"), 1))
        .await
        .is_err());

    let mut payload = dish_payload("Vindaloo", Some("mains"), 1);
    payload.spice_level = 9; // clamped to the supported maximum
    payload.compare_at_price = Some(dec!(-1)); // nonsense promo dropped
    let created = dishes.create(payload).await.expect("create");
    assert_eq!(created.spice_level, 4);
    assert!(created.compare_at_price.is_none());
    assert_eq!(
        created.category.resolved_id().as_deref(),
        Some("category:mains")
    );

    let id = created.id.as_ref().expect("id").to_string();

    // set a promo price, then clear it with an explicit null
    let updated = dishes
        .update(
            &id,
            DishUpdate {
                compare_at_price: Some(Some(dec!(12.90))),
                ..Default::default()
            },
        )
        .await
        .expect("set promo");
    assert_eq!(updated.compare_at_price, Some(dec!(12.90)));

    let cleared = dishes
        .update(
            &id,
            DishUpdate {
                compare_at_price: Some(None),
                available: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("clear promo");
    assert!(cleared.compare_at_price.is_none());
    assert!(!cleared.available);
    // untouched fields survive the merge
    assert_eq!(cleared.name.en, "Vindaloo");
    assert_eq!(cleared.spice_level, 4);

    // unavailable dishes drop out of the customer listing
    assert!(dishes.find_available().await.expect("available").is_empty());
    assert_eq!(dishes.find_all().await.expect("all").len(), 1);

    // uncategorize via explicit null
    let uncategorized = dishes
        .update(
            &id,
            DishUpdate {
                category: Some(None),
                ..Default::default()
            },
        )
        .await
        .expect("uncategorize");
    assert!(uncategorized.category.resolved_id().is_none());

    assert!(dishes.delete(&id).await.expect("delete"));
    assert!(dishes.delete(&id).await.is_err());
}

#[tokio::test]
async fn menu_pipeline_over_stored_data() {
    let state = test_state().await;
    let categories = state.categories();
    let dishes = state.dishes();

    categories
        .create(category_payload("drinks", 2))
        .await
        .expect("drinks");
    categories
        .create(category_payload("starters", 1))
        .await
        .expect("starters");

    let mut samosa = dish_payload("Samosas", Some("starters"), 1);
    samosa.spice_level = 2;
    samosa.dietary_info.vegetarian = true;
    dishes.create(samosa).await.expect("samosa");

    dishes
        .create(dish_payload("Cola", Some("drinks"), 1))
        .await
        .expect("cola");

    let mut hidden = dish_payload("Secret", Some("drinks"), 2);
    hidden.available = false;
    dishes.create(hidden).await.expect("hidden");

    let stored = dishes.find_available().await.expect("available");
    let active = categories.find_active().await.expect("active");
    assert_eq!(stored.len(), 2);

    // all view: starters (order 1) before drinks (order 2)
    let all = compute_menu(
        stored.clone(),
        &active,
        &MenuQuery::default(),
        &FuzzyMatcher::default(),
    );
    let names: Vec<_> = all.iter().map(|d| d.name.en.as_str()).collect();
    assert_eq!(names, vec!["Samosas", "Cola"]);

    // typo search narrows to the samosas
    let query = MenuQuery {
        search: Some("samossa".to_string()),
        ..Default::default()
    };
    let found = compute_menu(stored.clone(), &active, &query, &FuzzyMatcher::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.en, "Samosas");

    // spice filter keeps the level-2 dish only
    let query = MenuQuery {
        spice_levels: HashSet::from([2]),
        ..Default::default()
    };
    let spicy = compute_menu(stored.clone(), &active, &query, &FuzzyMatcher::default());
    assert_eq!(spicy.len(), 1);

    // category scoping
    let query = MenuQuery {
        category: CategorySelection::parse(Some("drinks")),
        ..Default::default()
    };
    let drinks = compute_menu(stored, &active, &query, &FuzzyMatcher::default());
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0].name.en, "Cola");
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn router_auth_flow() {
    let state = test_state().await;
    let app = build_router(state);

    // health is public
    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // menu is public
    let response = app
        .clone()
        .oneshot(Request::get("/api/menu").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["dishes"].as_array().is_some());
    assert!(body["categories"].as_array().is_some());

    // admin listing requires a session
    let response = app
        .clone()
        .oneshot(Request::get("/api/dishes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // an oversized password never reaches the hash function
    let long_password = "x".repeat(200);
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"username": "admin", "password": "{long_password}"}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // wrong password rejected
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username": "admin", "password": "wrong"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // successful login returns a cookie and a token
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username": "admin", "password": "test-password"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token").to_string();

    // bearer token unlocks the admin API
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/dishes")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // so does the session cookie
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/dishes")
                .header(header::COOKIE, cookie.split(';').next().unwrap())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // auth check reflects both states
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/auth/check")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["username"], "admin");

    let response = app
        .clone()
        .oneshot(Request::get("/api/auth/check").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn router_admin_crud_and_qrcode() {
    let state = test_state().await;
    let app = build_router(state.clone());
    let token = state.jwt_service.generate_token("admin").expect("token");
    let auth = format!("Bearer {token}");

    // create a category through the API
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/categories")
                .header(header::AUTHORIZATION, &auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name": {"pt": "Entradas", "en": "Starters"}, "slug": "starters", "order": 1}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "category:starters");

    // invalid slug rejected up front
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/categories")
                .header(header::AUTHORIZATION, &auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name": {"pt": "X", "en": "X"}, "slug": "Bad Slug"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // a dish without a description is refused
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/dishes")
                .header(header::AUTHORIZATION, &auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name": {"pt": "Chamuças", "en": "Samosas"}, "category": "starters", "price": 4.5}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // create a dish; the response carries the expanded category
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/dishes")
                .header(header::AUTHORIZATION, &auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name": {"pt": "Chamuças", "en": "Samosas"}, "description": {"pt": "Crocantes", "en": "Crispy"}, "category": "starters", "price": 4.5}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["category"]["slug"], "starters");

    // public category listing shows the new category
    let response = app
        .clone()
        .oneshot(Request::get("/api/categories").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // QR code endpoints require the session too
    let response = app
        .clone()
        .oneshot(Request::get("/api/qrcode").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/qrcode")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/qrcode?format=svg&size=128")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
}

#[tokio::test]
async fn inactive_categories_hidden_from_public() {
    let state = test_state().await;
    state
        .categories()
        .create(category_payload("mains", 1))
        .await
        .expect("mains");
    let mut seasonal = category_payload("seasonal", 2);
    seasonal.active = false;
    state.categories().create(seasonal).await.expect("seasonal");

    let app = build_router(state.clone());
    let token = state.jwt_service.generate_token("admin").expect("token");

    // anonymous callers never see inactive categories, even with all=true
    for uri in ["/api/categories", "/api/categories?all=true"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let slugs: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["slug"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(slugs, vec!["mains"], "anonymous {uri}");
    }

    // an admin session widens the listing
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/categories?all=true")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

fn png_bytes(shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([shade, 64, 32]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .expect("png");
    buffer
}

fn multipart_request(filename: &str, bytes: &[u8], auth: Option<&str>) -> Request<Body> {
    let boundary = "axum-body-7f92aa31";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut request = Request::post("/api/upload").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={boundary}"),
    );
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    request.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn upload_reencodes_dedupes_and_serves() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state_in(dir.path().to_str().expect("utf8 path")).await;
    let app = build_router(state.clone());
    let token = state.jwt_service.generate_token("admin").expect("token");
    let auth = format!("Bearer {token}");
    let photo = png_bytes(200);

    // uploads are admin-only
    let response = app
        .clone()
        .oneshot(multipart_request("dish.png", &photo, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // unsupported extension refused before decoding
    let response = app
        .clone()
        .oneshot(multipart_request("notes.txt", &photo, Some(auth.as_str())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // a valid upload lands on disk as a JPEG
    let response = app
        .clone()
        .oneshot(multipart_request("dish.png", &photo, Some(auth.as_str())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let filename = body["filename"].as_str().expect("filename").to_string();
    assert!(filename.ends_with(".jpg"));
    assert_eq!(body["url"], format!("/api/image/{filename}"));
    assert!(dir.path().join("uploads/images").join(&filename).exists());

    // identical bytes come back as the already stored file
    let response = app
        .clone()
        .oneshot(multipart_request("copy.png", &photo, Some(auth.as_str())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["filename"], filename.as_str());
    assert_eq!(body["original_name"], "copy.png");

    // different content gets its own file
    let response = app
        .clone()
        .oneshot(multipart_request("other.png", &png_bytes(10), Some(auth.as_str())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_ne!(body["filename"], filename.as_str());

    // the stored file serves back through the public image route
    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/image/{filename}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/image/missing.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
