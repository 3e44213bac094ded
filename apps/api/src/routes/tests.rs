use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::build_router;
use crate::models::profile::UserRole;
use crate::search::fixtures::{id, salary_fixture};
use crate::test_support::{FakeAuthProvider, TestApp};

const BOUNDARY: &str = "X-JOBBOARD-BOUNDARY";

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(app.state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn multipart_upload(token: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/documents")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

fn posting(title: &str) -> Value {
    json!({
        "title": title,
        "company": { "name": "Ferrous Systems", "rating": 4.6, "reviewCount": 12 },
        "location": "Remote",
        "isRemote": true,
        "salary": { "min": 120000, "max": 150000 },
        "jobType": "full-time",
        "experienceLevel": "senior",
        "description": "Async services in Rust.",
        "skills": ["Rust", "Tokio"]
    })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(vec![]);
    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_job_search_salary_overlap() {
    let app = TestApp::new(salary_fixture());
    let (status, page) = send(
        &app,
        request(
            Method::GET,
            "/api/v1/jobs?salaryMin=120000&salaryMax=999999",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let expected: Vec<String> = [1, 2, 4, 5].iter().map(|n| id(*n).to_string()).collect();
    assert_eq!(ids(&page), expected);
    assert_eq!(page["total"], 4);
    assert_eq!(page["hasMore"], false);
}

#[tokio::test]
async fn test_job_search_sort_and_load_more() {
    let app = TestApp::new(salary_fixture());
    let (_, page) = send(
        &app,
        request(
            Method::GET,
            "/api/v1/jobs?sort=salary-high&pageSize=2",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(ids(&page), vec![id(4).to_string(), id(1).to_string()]);
    assert_eq!(page["hasMore"], true);

    let (_, more) = send(
        &app,
        request(
            Method::GET,
            "/api/v1/jobs?sort=salary-high&pageSize=2&page=2",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(ids(&more).len(), 4);
    assert_eq!(ids(&more)[..2], ids(&page)[..]);
}

#[tokio::test]
async fn test_unknown_job_is_404() {
    let app = TestApp::new(salary_fixture());
    let uri = format!("/api/v1/jobs/{}", id(99));
    let (status, body) = send(&app, request(Method::GET, &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_authenticated_routes_reject_missing_token() {
    let app = TestApp::new(vec![]);
    for uri in ["/api/v1/applications", "/api/v1/documents", "/api/v1/profile"] {
        let (status, body) = send(&app, request(Method::GET, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
    let (status, _) = send(
        &app,
        request(Method::GET, "/api/v1/applications", Some("stale-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_session_and_logout() {
    let app = TestApp::new(vec![]);
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "Robin",
                "email": "Robin@Example.com",
                "password": "hunter2hunter2",
                "confirmPassword": "hunter2hunter2",
                "role": "recruiter"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "signed-in");
    assert_eq!(body["redirectTo"], "/dashboard/recruiter");
    let token = body["token"].as_str().unwrap().to_string();

    let (_, session) = send(&app, request(Method::GET, "/api/v1/session", Some(&token), None)).await;
    assert_eq!(session["user"]["email"], "robin@example.com");
    assert_eq!(session["user"]["role"], "recruiter");

    let (status, _) = send(&app, request(Method::POST, "/api/v1/auth/logout", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, session) = send(&app, request(Method::GET, "/api/v1/session", Some(&token), None)).await;
    assert_eq!(session["user"], Value::Null);
    assert_eq!(session["redirectTo"], "/login");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "robin@example.com", "password": "hunter2hunter2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "recruiter");
}

#[tokio::test]
async fn test_register_validation_and_provider_errors() {
    let app = TestApp::new(vec![]);
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "Robin", "email": "robin@example.com", "password": "short" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "password");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "whatever1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid login credentials");
}

#[tokio::test]
async fn test_register_awaiting_confirmation() {
    let auth = FakeAuthProvider::requiring_confirmation();
    let app = TestApp::with_auth(vec![], auth);
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "Kai", "email": "kai@example.com", "password": "longenough" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "confirmation-required");
}

#[tokio::test]
async fn test_oauth_url_and_callback() {
    let app = TestApp::new(vec![]);
    let (status, body) = send(
        &app,
        request(
            Method::GET,
            "/api/v1/auth/oauth/linkedin?redirectTo=/callback",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["url"].as_str().unwrap().contains("provider=linkedin_oidc"));

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/auth/oauth/callback",
            None,
            Some(json!({ "accessToken": "token-unknown" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_application_lifecycle_end_to_end() {
    let app = TestApp::new(vec![]);
    let (recruiter, _) = app.sign_in_as(UserRole::Recruiter).await;
    let (seeker, _) = app.sign_in_as(UserRole::JobSeeker).await;

    let (status, job) = send(
        &app,
        request(Method::POST, "/api/v1/jobs", Some(&recruiter), Some(posting("Rust Engineer"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let job_id = job["id"].as_str().unwrap().to_string();

    // Seekers cannot post.
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/v1/jobs", Some(&seeker), Some(posting("Nope"))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/applications",
            Some(&seeker),
            Some(json!({ "jobId": job_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "coverLetter");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/applications/quick-apply",
            Some(&seeker),
            Some(json!({ "jobId": job_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["applications"].as_array().unwrap().len(), 1);
    let application_id = body["application"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/applications/quick-apply",
            Some(&seeker),
            Some(json!({ "jobId": job_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, listing) = send(
        &app,
        request(Method::GET, &format!("/api/v1/jobs/{job_id}"), Some(&seeker), None),
    )
    .await;
    assert_eq!(listing["hasApplied"], true);

    let status_uri = format!("/api/v1/applications/{application_id}/status");
    let (status, body) = send(
        &app,
        request(
            Method::PATCH,
            &status_uri,
            Some(&recruiter),
            Some(json!({ "status": "shortlisted" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["status"], "shortlisted");

    let (status, _) = send(
        &app,
        request(
            Method::PATCH,
            &status_uri,
            Some(&recruiter),
            Some(json!({ "status": "applied" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &format!("/api/v1/applications/{application_id}/interview"),
            Some(&recruiter),
            Some(json!({
                "interviewDate": "2999-01-01T10:00:00Z",
                "interviewType": "video",
                "notes": "Meet the team"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["status"], "interview-scheduled");

    let (_, page) = send(
        &app,
        request(
            Method::GET,
            "/api/v1/applications?status=interview-scheduled",
            Some(&seeker),
            None,
        ),
    )
    .await;
    assert_eq!(page["total"], 1);

    let (_, stats) = send(
        &app,
        request(Method::GET, "/api/v1/dashboard/stats", Some(&recruiter), None),
    )
    .await;
    assert_eq!(stats["role"], "recruiter");
    assert_eq!(stats["activePostings"], 1);
    assert_eq!(stats["upcomingInterviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_and_unsave_job() {
    let app = TestApp::new(salary_fixture());
    let (seeker, _) = app.sign_in_as(UserRole::JobSeeker).await;
    let uri = format!("/api/v1/jobs/{}/save", id(3));

    let (status, job) = send(&app, request(Method::POST, &uri, Some(&seeker), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["isSaved"], true);

    let (_, stats) = send(
        &app,
        request(Method::GET, "/api/v1/dashboard/stats", Some(&seeker), None),
    )
    .await;
    assert_eq!(stats["savedJobs"], 1);

    let (_, job) = send(&app, request(Method::DELETE, &uri, Some(&seeker), None)).await;
    assert_eq!(job["isSaved"], false);
}

#[tokio::test]
async fn test_document_upload_list_delete() {
    let app = TestApp::new(vec![]);
    let (seeker, _) = app.sign_in_as(UserRole::JobSeeker).await;

    let (status, body) = send(
        &app,
        multipart_upload(
            &seeker,
            &[("file", Some("cv.pdf"), "%PDF-1.7"), ("documentType", None, "resume")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["document"]["type"], "resume");
    let doc_id = body["document"]["id"].as_str().unwrap().to_string();
    let path = body["document"]["storagePath"].as_str().unwrap().to_string();
    assert!(app.storage.contains(&path).await);
    assert!(body["document"]["downloadUrl"]
        .as_str()
        .unwrap()
        .ends_with("?download=cv.pdf"));

    let (_, list) = send(&app, request(Method::GET, "/api/v1/documents", Some(&seeker), None)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, remaining) = send(
        &app,
        request(
            Method::DELETE,
            &format!("/api/v1/documents/{doc_id}"),
            Some(&seeker),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(remaining.as_array().unwrap().is_empty());
    assert!(!app.storage.contains(&path).await);
}

#[tokio::test]
async fn test_document_upload_without_type_stores_nothing() {
    let app = TestApp::new(vec![]);
    let (seeker, _) = app.sign_in_as(UserRole::JobSeeker).await;

    let (status, body) = send(
        &app,
        multipart_upload(&seeker, &[("file", Some("cv.pdf"), "%PDF-1.7")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "documentType");
    assert_eq!(app.storage.len().await, 0);
}

#[tokio::test]
async fn test_preferences_and_profile() {
    let app = TestApp::new(vec![]);
    let (token, _) = app.sign_in_as(UserRole::JobSeeker).await;

    let (_, prefs) = send(
        &app,
        request(Method::GET, "/api/v1/session/preferences", Some(&token), None),
    )
    .await;
    assert_eq!(prefs["fontSize"], "medium");

    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/v1/session/preferences",
            Some(&token),
            Some(json!({ "fontSize": "large", "highContrast": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, prefs) = send(
        &app,
        request(Method::GET, "/api/v1/session/preferences", Some(&token), None),
    )
    .await;
    assert_eq!(prefs["fontSize"], "large");
    assert_eq!(prefs["reducedMotion"], false);

    let (status, profile) = send(
        &app,
        request(
            Method::PUT,
            "/api/v1/profile",
            Some(&token),
            Some(json!({ "name": "Jordan Lee" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Jordan Lee");

    let (_, session) = send(&app, request(Method::GET, "/api/v1/session", Some(&token), None)).await;
    assert_eq!(session["user"]["name"], "Jordan Lee");
}

#[tokio::test]
async fn test_quick_actions_by_role() {
    let app = TestApp::new(vec![]);
    let (seeker, _) = app.sign_in_as(UserRole::JobSeeker).await;

    let (status, target) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/dashboard/actions",
            Some(&seeker),
            Some(json!({ "action": "upload-resume" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(target["navigateTo"], "/documents?type=resume");

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/v1/dashboard/actions",
            Some(&seeker),
            Some(json!({ "action": "post-job" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, actions) = send(
        &app,
        request(Method::GET, "/api/v1/dashboard/actions", Some(&seeker), None),
    )
    .await;
    assert_eq!(actions.as_array().unwrap().len(), 4);
    assert_eq!(actions[0]["action"], "search-jobs");
}
