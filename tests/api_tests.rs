use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use campusd::config::Config;
use campusd::models::Role;
use campusd::services::TokenService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const TEST_SECRET: &str = "campusd-integration-test-secret";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = TEST_SECRET.to_string();

    let state = campusd::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    campusd::api::router(state)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn upload(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    field_name: &str,
    filename: Option<&str>,
    bytes: &[u8],
) -> (StatusCode, Value) {
    const BOUNDARY: &str = "----campusd-test-boundary";

    let mut body = Vec::new();
    let disposition = filename.map_or_else(
        || format!("Content-Disposition: form-data; name=\"{field_name}\"\r\n"),
        |name| {
            format!("Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{name}\"\r\n")
        },
    );
    body.extend_from_slice(format!("--{BOUNDARY}\r\n{disposition}").as_bytes());
    body.extend_from_slice(
        format!("Content-Type: {}\r\n\r\n", mime::APPLICATION_OCTET_STREAM).as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Creates an admin account and returns a bearer token for it.
async fn admin_token(app: &Router) -> String {
    let (status, _) = request(
        app,
        "POST",
        "/api/v1/admin/create-admin",
        None,
        Some(json!({
            "name": "Root Admin",
            "email": "root@example.edu",
            "password": "root-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        app,
        "POST",
        "/api/v1/admin/login",
        None,
        Some(json!({ "email": "root@example.edu", "password": "root-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().unwrap().to_string()
}

async fn create_student(app: &Router, token: &str, username: &str, section: &str) {
    let (status, _) = request(
        app,
        "POST",
        "/api/v1/admin/create-student",
        Some(token),
        Some(json!({
            "username": username,
            "name": format!("Student {username}"),
            "email": format!("{username}@example.edu"),
            "section": section,
            "dept": "CSE",
            "password": "student-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn welcome_route_answers() {
    let app = spawn_app().await;

    let (status, body) = request(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the API");
}

#[tokio::test]
async fn create_admin_rejects_duplicates_and_bad_input() {
    let app = spawn_app().await;

    let payload = json!({
        "name": "Root Admin",
        "email": "root@example.edu",
        "password": "root-password"
    });

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-admin",
        None,
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Admin created successfully");
    assert_eq!(body["admin"]["email"], "root@example.edu");
    assert_eq!(body["admin"]["role"], "admin");
    assert!(body["admin"].get("password").is_none());
    assert!(body["admin"].get("passwordHash").is_none());

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-admin",
        None,
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Admin already exists");

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/admin/create-admin",
        None,
        Some(json!({ "name": "X", "email": "not-an-email", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-admin",
        None,
        Some(json!({ "name": "", "email": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn admin_login_distinguishes_unknown_account_from_bad_password() {
    let app = spawn_app().await;
    admin_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/login",
        None,
        Some(json!({ "email": "nobody@example.edu", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Admin not found");

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/login",
        None,
        Some(json!({ "email": "root@example.edu", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid password");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    // No token at all.
    let (status, body) = request(&app, "GET", "/api/v1/admin/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied. No token provided.");

    // Malformed header (not Bearer-shaped).
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/admin/profile")
                .header("Authorization", format!("Token {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Tampered signature.
    let tampered = format!("{token}xx");
    let (status, body) =
        request(&app, "GET", "/api/v1/admin/profile", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    // The real token still works.
    let (status, body) = request(&app, "GET", "/api/v1/admin/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin details fetched successfully");
    assert_eq!(body["admin"]["email"], "root@example.edu");
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let app = spawn_app().await;
    let live_token = admin_token(&app).await;

    // Same secret, expiry an hour in the past.
    let expired = TokenService::with_expiry_hours(TEST_SECRET, -1)
        .issue(1, Role::Admin)
        .unwrap();

    let (status, body) = request(&app, "GET", "/api/v1/admin/profile", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let (status, _) = request(&app, "GET", "/api/v1/admin/profile", Some(&live_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn role_gates_hold_even_with_a_valid_token() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;
    create_student(&app, &token, "s1", "A").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/student/login",
        None,
        Some(json!({ "username": "s1", "password": "student-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let student_token = body["token"].as_str().unwrap().to_string();

    // A student token is not an admin token.
    let (status, body) = request(
        &app,
        "GET",
        "/api/v1/admin/profile",
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized: Admin not authenticated");

    // And an admin token is not a student token.
    let (status, body) =
        request(&app, "GET", "/api/v1/student/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized: Student not authenticated");

    let (status, body) = request(
        &app,
        "GET",
        "/api/v1/student/profile",
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["username"], "s1");
    assert!(body["student"].get("password").is_none());
}

#[tokio::test]
async fn empty_listings_answer_not_found() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) =
        request(&app, "GET", "/api/v1/admin/all-students", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No students found");

    let (status, body) =
        request(&app, "GET", "/api/v1/admin/all-faculty", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No faculty found");

    create_student(&app, &token, "s1", "A").await;

    let (status, body) =
        request(&app, "GET", "/api/v1/admin/all-students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);
    assert!(body["students"][0].get("password").is_none());
}

#[tokio::test]
async fn duplicate_student_creation_conflicts_and_persists_nothing() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;
    create_student(&app, &token, "s1", "A").await;

    // Same username, different email.
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-student",
        Some(&token),
        Some(json!({
            "username": "s1",
            "name": "Other",
            "email": "other@example.edu",
            "section": "B",
            "dept": "ECE",
            "password": "pw"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student already exists");

    // Same email, different username.
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/admin/create-student",
        Some(&token),
        Some(json!({
            "username": "s2",
            "name": "Other",
            "email": "s1@example.edu",
            "section": "B",
            "dept": "ECE",
            "password": "pw"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request(&app, "GET", "/api/v1/admin/all-students", Some(&token), None).await;
    assert_eq!(body["students"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn partial_update_skips_empty_fields() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;
    create_student(&app, &token, "s1", "A").await;

    let (_, body) = request(&app, "GET", "/api/v1/admin/all-students", Some(&token), None).await;
    let id = body["students"][0]["id"].as_i64().unwrap();
    let original_email = body["students"][0]["email"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/v1/admin/update-student/{id}"),
        Some(&token),
        Some(json!({ "name": "Renamed Student", "email": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["name"], "Renamed Student");
    // The empty email must not have cleared the stored one.
    assert_eq!(body["student"]["email"], original_email);

    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/admin/update-student/9999",
        Some(&token),
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn change_password_requires_the_old_one() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/admin/change-password",
        Some(&token),
        Some(json!({ "oldPassword": "wrong", "newPassword": "next-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid old password");

    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/admin/change-password",
        Some(&token),
        Some(json!({ "oldPassword": "root-password", "newPassword": "next-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully");

    // Old credentials are dead, new ones work.
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/admin/login",
        None,
        Some(json!({ "email": "root@example.edu", "password": "root-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/admin/login",
        None,
        Some(json!({ "email": "root@example.edu", "password": "next-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn faculty_sees_only_their_own_section() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    create_student(&app, &token, "sa1", "A").await;
    create_student(&app, &token, "sa2", "A").await;
    create_student(&app, &token, "sb1", "B").await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/admin/create-faculty",
        Some(&token),
        Some(json!({
            "username": "prof1",
            "name": "Prof One",
            "email": "prof1@example.edu",
            "section": "A",
            "dept": "CSE",
            "password": "faculty-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/faculty/login",
        None,
        Some(json!({ "username": "prof1", "password": "faculty-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Coordinator defaults to the string "false".
    assert_eq!(body["faculty"]["coordinator"], "false");
    let faculty_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "GET",
        "/api/v1/faculty/section-students",
        Some(&faculty_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let students = body["students"].as_array().unwrap();
    assert_eq!(students.len(), 2);
    for student in students {
        assert_eq!(student["section"], "A");
    }
}

#[tokio::test]
async fn student_upload_imports_every_row_and_normalizes() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = upload(
        &app,
        "/api/v1/admin/upload-student",
        Some(&token),
        "file",
        Some("students.xlsx"),
        include_bytes!("fixtures/students_ok.xlsx"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let report = &body["report"];
    assert_eq!(report["totalRows"], 3);
    assert_eq!(report["successCount"], 3);
    assert_eq!(report["errorCount"], 0);
    assert!(report["errors"].as_array().unwrap().is_empty());

    // Trim + case normalization: name/section/dept uppercased, email
    // lowercased.
    let first = &report["successfulRecords"][0];
    assert_eq!(first["name"], "ANITA RAO");
    assert_eq!(first["email"], "anita.rao@example.edu");
    assert_eq!(first["section"], "A");
    assert_eq!(first["dept"], "CSE");
    assert!(first.get("password").is_none());

    // Imported rows are real accounts: the password was hashed, not
    // stored verbatim, and the student can log in.
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/student/login",
        None,
        Some(json!({ "username": "s2023001", "password": "pw-anita" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["name"], "ANITA RAO");
}

#[tokio::test]
async fn student_upload_reports_partial_success_per_row() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    // Pre-existing student that spreadsheet row 5 collides with.
    create_student(&app, &token, "existing01", "A").await;

    let (status, body) = upload(
        &app,
        "/api/v1/admin/upload-student",
        Some(&token),
        "file",
        Some("students.xlsx"),
        include_bytes!("fixtures/students_mixed.xlsx"),
    )
    .await;
    assert_eq!(status, StatusCode::MULTI_STATUS);

    let report = &body["report"];
    assert_eq!(report["totalRows"], 4);
    assert_eq!(report["successCount"], 2);
    assert_eq!(report["errorCount"], 2);

    let errors = report["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);

    // Spreadsheet row 3 is missing its email.
    assert_eq!(errors[0]["row"], 3);
    assert!(errors[0]["reason"].as_str().unwrap().contains("email"));
    assert_eq!(errors[0]["data"]["username"], "s2023102");

    // Spreadsheet row 5 duplicates an existing username.
    assert_eq!(errors[1]["row"], 5);
    assert!(errors[1]["reason"].as_str().unwrap().contains("already exists"));
    assert_eq!(errors[1]["data"]["username"], "existing01");

    // 1 pre-existing + 2 imported.
    let (_, body) = request(&app, "GET", "/api/v1/admin/all-students", Some(&token), None).await;
    assert_eq!(body["students"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn upload_rejects_bad_requests_before_touching_the_store() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    // Wrong extension.
    let (status, body) = upload(
        &app,
        "/api/v1/admin/upload-student",
        Some(&token),
        "file",
        Some("roster.csv"),
        b"username,name\n",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only Excel files (.xlsx, .xls) are allowed");

    // Header-only workbook.
    let (status, body) = upload(
        &app,
        "/api/v1/admin/upload-student",
        Some(&token),
        "file",
        Some("empty.xlsx"),
        include_bytes!("fixtures/header_only.xlsx"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Uploaded file contains no data rows");

    // Multipart without a `file` part.
    let (status, body) = upload(
        &app,
        "/api/v1/admin/upload-student",
        Some(&token),
        "attachment",
        Some("students.xlsx"),
        include_bytes!("fixtures/students_ok.xlsx"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");

    // No token at all.
    let (status, _) = upload(
        &app,
        "/api/v1/admin/upload-student",
        None,
        "file",
        Some("students.xlsx"),
        include_bytes!("fixtures/students_ok.xlsx"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing got persisted along the way.
    let (status, _) = request(&app, "GET", "/api/v1/admin/all-students", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn faculty_upload_lowercases_the_coordinator_flag() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = upload(
        &app,
        "/api/v1/admin/upload-faculty",
        Some(&token),
        "file",
        Some("faculty.xlsx"),
        include_bytes!("fixtures/faculty_ok.xlsx"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let report = &body["report"];
    assert_eq!(report["successCount"], 2);
    assert_eq!(report["successfulRecords"][0]["coordinator"], "true");
    assert_eq!(report["successfulRecords"][1]["coordinator"], "false");

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/faculty/login",
        None,
        Some(json!({ "username": "f001", "password": "pw-harini" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn event_creation_and_coordinator_assignment() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-event",
        Some(&token),
        Some(json!({
            "short_name": "csp",
            "name": "Community Service Project",
            "max_team_size": 4
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["short_name"], "csp");
    assert_eq!(body["event"]["isEnabled"], true);
    assert!(body["event"]["coordinators"].as_array().unwrap().is_empty());
    let event_id = body["event"]["id"].as_i64().unwrap();

    // Duplicate short name.
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-event",
        Some(&token),
        Some(json!({ "short_name": "csp", "name": "Again", "max_team_size": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event already exists");

    // Missing required fields.
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/admin/create-event",
        Some(&token),
        Some(json!({ "short_name": "x", "name": "No size" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Short name, name, and max team size are required."
    );

    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/admin/assign-coordinators",
        Some(&token),
        Some(json!({ "eventId": event_id, "coordinators": ["prof1", "prof2"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Coordinators assigned successfully");
    assert_eq!(body["event"]["coordinators"], json!(["prof1", "prof2"]));

    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/admin/assign-coordinators",
        Some(&token),
        Some(json!({ "eventId": 9999, "coordinators": ["ghost"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found.");
}
