//! API integration tests

use axum::http::{header, Method, StatusCode};
use serde_json::{json, Value};

use libros_server::config::AuditConfig;

use crate::common::{session_cookie, TestApp, ADMIN_USERNAME};

async fn history(app: &TestApp, cookie: &str, id: i64) -> Vec<Value> {
    let response = app
        .request(Method::GET, &format!("/api/logs/libros/{}", id), None, Some(cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"].as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], true);
    assert!(response.body["ts"].is_string());

    let response = app.request(Method::GET, "/ready", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_errors() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "error": "Contraseña incorrecta" }));
    assert!(session_cookie(&response.headers).is_none());

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "nadie", "password": "x" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Usuario no encontrado");

    let response = app
        .request(Method::POST, "/api/login", Some(json!({ "username": "admin" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Faltan credenciales");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "No autorizado");

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "admin", "password": "admin123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["user"]["username"], ADMIN_USERNAME);

    let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("libros.sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    let cookie = session_cookie(&response.headers).unwrap();

    let response = app.request(Method::GET, "/api/me", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "id": app.admin_id, "username": ADMIN_USERNAME })
    );

    let response = app.request(Method::POST, "/api/logout", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    let response = app.request(Method::GET, "/api/me", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_and_log_routes_require_session() {
    let app = TestApp::new().await;

    for (method, uri) in [
        (Method::GET, "/api/libros"),
        (Method::GET, "/api/libros/1"),
        (Method::DELETE, "/api/libros/1"),
        (Method::GET, "/api/logs"),
        (Method::GET, "/api/logs/libros/1"),
    ] {
        let response = app.request(method.clone(), uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }

    let response = app
        .request(
            Method::POST,
            "/api/libros",
            Some(json!({ "titulo": "Dune", "autor": "Herbert" })),
            Some("libros.sid=forged"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_soft_delete_scenario() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let book = app
        .create_book(&cookie, json!({ "titulo": "Dune", "autor": "Herbert" }))
        .await;
    assert_eq!(book["estado"], "disponible");
    assert_eq!(book["created_at"], book["updated_at"]);
    let id = book["id"].as_i64().unwrap();

    let response = app
        .request(Method::DELETE, &format!("/api/libros/{}", id), None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "deleted": true }));

    let response = app.request(Method::GET, "/api/libros", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 0);
    assert_eq!(response.body["data"], json!([]));

    let response = app
        .request(Method::GET, "/api/libros?includeBaja=true", None, Some(&cookie))
        .await;
    assert_eq!(response.body["total"], 1);

    let response = app
        .request(Method::GET, &format!("/api/libros/{}", id), None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["estado"], "baja");
    assert_eq!(response.body["titulo"], "Dune");
}

#[tokio::test]
async fn test_create_round_trip() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let book = app
        .create_book(
            &cookie,
            json!({
                "isbn": "978-0441013593",
                "titulo": "  Dune ",
                "autor": "Frank Herbert",
                "editorial": "Ace",
                "anio": "1965",
                "categoria": "Ciencia ficción",
                "ubicacion": "A-3",
                "stock": 4,
                "precio": "12.50",
                "estado": "prestado",
                "notas": ""
            }),
        )
        .await;

    assert_eq!(book["titulo"], "Dune");
    assert_eq!(book["anio"], 1965);
    assert_eq!(book["precio"], 12.5);
    assert_eq!(book["estado"], "prestado");
    assert_eq!(book["notas"], Value::Null);

    let response = app
        .request(
            Method::GET,
            &format!("/api/libros/{}", book["id"]),
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(response.body, book);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .request(
            Method::POST,
            "/api/libros",
            Some(json!({ "titulo": "Dune", "stock": -1, "estado": "perdido" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Campo requerido: autor, stock ≥ 0, estado inválido (disponible|prestado|baja)"
    );

    let response = app
        .request(
            Method::POST,
            "/api/libros",
            Some(json!({ "titulo": "Dune", "autor": "Herbert", "anio": 1700 })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("anio entre 1800 y "));

    let response = app
        .request(Method::GET, "/api/libros?limit=muchos", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    let response = app.request(Method::GET, "/api/logs", None, Some(&cookie)).await;
    assert_eq!(response.body["total"], 0);
}

#[tokio::test]
async fn test_empty_patch_is_rejected_without_audit() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let book = app
        .create_book(&cookie, json!({ "titulo": "Emma", "autor": "Austen" }))
        .await;
    let id = book["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/libros/{}", id),
            Some(json!({ "editorial": "  ", "desconocido": 1 })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Sin cambios");

    let response = app
        .request(Method::GET, &format!("/api/libros/{}", id), None, Some(&cookie))
        .await;
    assert_eq!(response.body, book);

    let entries = history(&app, &cookie, id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "create");
}

#[tokio::test]
async fn test_missing_books() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let body = json!({ "titulo": "Dune", "autor": "Herbert" });

    for method in [Method::GET, Method::DELETE] {
        let response = app
            .request(method, "/api/libros/999", None, Some(&cookie))
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["error"], "No encontrado");
    }

    for method in [Method::PUT, Method::PATCH] {
        let response = app
            .request(method, "/api/libros/999", Some(body.clone()), Some(&cookie))
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    let response = app.request(Method::GET, "/api/nada", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "No encontrado");
}

#[tokio::test]
async fn test_pagination() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app.request(Method::GET, "/api/libros", None, Some(&cookie)).await;
    assert_eq!(response.body["total"], 0);
    assert_eq!(response.body["totalPages"], 1);

    for i in 0..25 {
        app.create_book(
            &cookie,
            json!({ "titulo": format!("Libro {:02}", i), "autor": "Autor" }),
        )
        .await;
    }

    let response = app.request(Method::GET, "/api/libros", None, Some(&cookie)).await;
    assert_eq!(response.body["limit"], 10);
    assert_eq!(response.body["total"], 25);
    assert_eq!(response.body["totalPages"], 3);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 10);
    // Newest first by default
    assert_eq!(response.body["data"][0]["titulo"], "Libro 24");

    let response = app
        .request(
            Method::GET,
            "/api/libros?page=3&limit=10&sortBy=titulo&sortDir=asc",
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(response.body["page"], 3);
    let data = response.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["titulo"], "Libro 20");

    let response = app
        .request(Method::GET, "/api/libros?page=0&limit=0", None, Some(&cookie))
        .await;
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["limit"], 1);
    assert_eq!(response.body["totalPages"], 25);
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.create_book(
        &cookie,
        json!({ "titulo": "Dune", "autor": "Frank Herbert", "categoria": "Ciencia ficción" }),
    )
    .await;
    app.create_book(
        &cookie,
        json!({ "titulo": "Emma", "autor": "Jane Austen", "categoria": "Novela" }),
    )
    .await;
    let foundation = app
        .create_book(
            &cookie,
            json!({ "titulo": "Fundación", "autor": "Isaac Asimov", "categoria": "Ciencia ficción" }),
        )
        .await;

    let titles = |body: &Value| -> Vec<String> {
        let mut titles: Vec<String> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["titulo"].as_str().unwrap().to_string())
            .collect();
        titles.sort();
        titles
    };

    let response = app
        .request(Method::GET, "/api/libros?search=CIENCIA", None, Some(&cookie))
        .await;
    assert_eq!(titles(&response.body), vec!["Dune", "Fundación"]);

    let response = app
        .request(Method::GET, "/api/libros?search=austen", None, Some(&cookie))
        .await;
    assert_eq!(titles(&response.body), vec!["Emma"]);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/libros/{}", foundation["id"]),
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(Method::GET, "/api/libros?search=ciencia", None, Some(&cookie))
        .await;
    assert_eq!(titles(&response.body), vec!["Dune"]);
    assert_eq!(response.body["total"], 1);
}

fn sorted_titles(body: &Value) -> Vec<String> {
    let mut titles: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["titulo"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_search_folds_accented_letters() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.create_book(
        &cookie,
        json!({ "titulo": "Ángeles y demonios", "autor": "Dan Brown", "categoria": "Suspense" }),
    )
    .await;
    app.create_book(&cookie, json!({ "titulo": "Dune", "autor": "Frank Herbert" }))
        .await;

    // ángeles
    let response = app
        .request(Method::GET, "/api/libros?search=%C3%A1ngeles", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(sorted_titles(&response.body), vec!["Ángeles y demonios"]);

    // ÁNGELES
    let response = app
        .request(Method::GET, "/api/libros?search=%C3%81NGELES", None, Some(&cookie))
        .await;
    assert_eq!(sorted_titles(&response.body), vec!["Ángeles y demonios"]);

    // The folded copy follows updates
    let book = app
        .create_book(&cookie, json!({ "titulo": "Otro", "autor": "Anónimo" }))
        .await;
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/libros/{}", book["id"]),
            Some(json!({ "autor": "ÓSCAR Wilde" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // óscar
    let response = app
        .request(Method::GET, "/api/libros?search=%C3%B3scar", None, Some(&cookie))
        .await;
    assert_eq!(sorted_titles(&response.body), vec!["Otro"]);
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.create_book(&cookie, json!({ "titulo": "100 años de soledad", "autor": "García Márquez" }))
        .await;
    app.create_book(&cookie, json!({ "titulo": "100% Vegano", "autor": "Varios" }))
        .await;
    app.create_book(&cookie, json!({ "titulo": "Dune", "autor": "Frank Herbert" }))
        .await;

    // 100%
    let response = app
        .request(Method::GET, "/api/libros?search=100%25", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(sorted_titles(&response.body), vec!["100% Vegano"]);
    assert_eq!(response.body["total"], 1);

    let response = app
        .request(Method::GET, "/api/libros?search=_", None, Some(&cookie))
        .await;
    assert!(sorted_titles(&response.body).is_empty());
    assert_eq!(response.body["total"], 0);

    app.create_book(&cookie, json!({ "titulo": "snake_case", "autor": "Varios" }))
        .await;
    let response = app
        .request(Method::GET, "/api/libros?search=_", None, Some(&cookie))
        .await;
    assert_eq!(sorted_titles(&response.body), vec!["snake_case"]);
}

#[tokio::test]
async fn test_full_update_restores_defaults() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let book = app
        .create_book(
            &cookie,
            json!({ "titulo": "Dune", "autor": "Herbert", "stock": 5, "estado": "prestado", "editorial": "Ace" }),
        )
        .await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/libros/{}", book["id"]),
            Some(json!({ "titulo": "Dune Messiah", "autor": "Herbert" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["titulo"], "Dune Messiah");
    assert_eq!(response.body["stock"], 0);
    assert_eq!(response.body["estado"], "disponible");
    assert_eq!(response.body["editorial"], Value::Null);
    assert_eq!(response.body["created_at"], book["created_at"]);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/libros/{}", book["id"]),
            Some(json!({ "titulo": "Sin autor" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Campo requerido: autor");
}

#[tokio::test]
async fn test_every_mutation_is_audited() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let book = app
        .create_book(&cookie, json!({ "titulo": "Dune", "autor": "Herbert" }))
        .await;
    let id = book["id"].as_i64().unwrap();
    let uri = format!("/api/libros/{}", id);

    let response = app
        .request(Method::PATCH, &uri, Some(json!({ "ubicacion": "B-1" })), Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ubicacion"], "B-1");

    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "titulo": "Dune", "autor": "Frank Herbert" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request(Method::DELETE, &uri, None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    // Deleting again is a no-op
    let response = app.request(Method::DELETE, &uri, None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "deleted": true }));

    let entries = history(&app, &cookie, id).await;
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["delete", "update", "update", "create"]);

    for entry in &entries {
        assert_eq!(entry["entity"], "book");
        assert_eq!(entry["entity_id"], id);
        assert_eq!(entry["changed_by"], app.admin_id);
        assert_eq!(entry["ip"], "203.0.113.7");
        assert_eq!(entry["user_agent"], "libros-tests");
        assert!(entry["after"].is_object());
    }

    let create = &entries[3];
    assert_eq!(create["before"], Value::Null);
    assert_eq!(create["after"]["titulo"], "Dune");

    let patch = &entries[2];
    assert_eq!(patch["before"]["ubicacion"], Value::Null);
    assert_eq!(patch["after"]["ubicacion"], "B-1");

    let delete = &entries[0];
    assert_eq!(delete["before"]["estado"], "disponible");
    assert_eq!(delete["after"]["estado"], "baja");
}

#[tokio::test]
async fn test_stock_changes_get_their_own_entry() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let book = app
        .create_book(&cookie, json!({ "titulo": "Dune", "autor": "Herbert", "stock": 3 }))
        .await;
    let id = book["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/libros/{}", id),
            Some(json!({ "stock": "5" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["stock"], 5);

    let response = app
        .request(
            Method::GET,
            &format!("/api/logs?entity=book_stock&entityId={}", id),
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["limit"], 20);
    let entry = &response.body["data"][0];
    assert_eq!(entry["before"], json!({ "stock": 3 }));
    assert_eq!(entry["after"], json!({ "stock": 5, "delta": 2 }));

    // The book history keeps one entry per mutation
    assert_eq!(history(&app, &cookie, id).await.len(), 2);

    let response = app.request(Method::GET, "/api/logs", None, Some(&cookie)).await;
    assert_eq!(response.body["total"], 3);
}

#[tokio::test]
async fn test_stock_tracking_can_be_disabled() {
    let app = TestApp::with_audit(AuditConfig {
        transactional: false,
        track_stock_changes: false,
    })
    .await;
    let cookie = app.login().await;

    let book = app
        .create_book(&cookie, json!({ "titulo": "Dune", "autor": "Herbert" }))
        .await;
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/libros/{}", book["id"]),
            Some(json!({ "stock": 7 })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(Method::GET, "/api/logs?entity=book_stock", None, Some(&cookie))
        .await;
    assert_eq!(response.body["total"], 0);
}

#[tokio::test]
async fn test_transactional_audit_mode() {
    let app = TestApp::with_audit(AuditConfig {
        transactional: true,
        track_stock_changes: true,
    })
    .await;
    let cookie = app.login().await;

    let book = app
        .create_book(&cookie, json!({ "titulo": "Dune", "autor": "Herbert", "stock": 1 }))
        .await;
    let id = book["id"].as_i64().unwrap();
    let uri = format!("/api/libros/{}", id);

    let response = app
        .request(Method::PATCH, &uri, Some(json!({ "stock": 2 })), Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request(Method::DELETE, &uri, None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request(Method::DELETE, &uri, None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request(Method::GET, &uri, None, Some(&cookie)).await;
    assert_eq!(response.body["estado"], "baja");
    assert_eq!(response.body["stock"], 2);

    let actions: Vec<String> = history(&app, &cookie, id)
        .await
        .iter()
        .map(|e| e["action"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(actions, vec!["delete", "update", "create"]);
}

async fn book_count(app: &TestApp) -> i64 {
    app.db
        .query("SELECT COUNT(*) AS total FROM books", &[])
        .await
        .unwrap()
        .scalar_i64("total")
}

#[tokio::test]
async fn test_audit_failure_rolls_back_in_transactional_mode() {
    let app = TestApp::with_audit(AuditConfig {
        transactional: true,
        track_stock_changes: true,
    })
    .await;
    let cookie = app.login().await;

    app.db.query("DROP TABLE audit_logs", &[]).await.unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/libros",
            Some(json!({ "titulo": "Dune", "autor": "Herbert" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Error interno del servidor");
    assert_eq!(book_count(&app).await, 0);
}

#[tokio::test]
async fn test_audit_failure_keeps_the_mutation_in_best_effort_mode() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    app.db.query("DROP TABLE audit_logs", &[]).await.unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/libros",
            Some(json!({ "titulo": "Dune", "autor": "Herbert" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["titulo"], "Dune");
    assert_eq!(book_count(&app).await, 1);
}

#[tokio::test]
async fn test_malformed_body_is_a_bad_request() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .request(Method::POST, "/api/libros", Some(json!("not an object")), Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}
