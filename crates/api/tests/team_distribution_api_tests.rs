use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

mod test_utils;
use test_utils::TestApp;

fn distribution_body(start_offset_days: i64, end_offset_days: i64) -> Value {
    let now = Utc::now();
    json!({
        "name": "Final project teams",
        "description": "Form teams of two to four",
        "description_url": "https://example.org/teams",
        "start_date": now + Duration::days(start_offset_days),
        "end_date": now + Duration::days(end_offset_days),
        "min_team_size": 2,
        "max_team_size": 4,
        "strict_team_size": 3,
        "min_total_score": 50
    })
}

async fn create_open_distribution(app: &TestApp) -> i64 {
    let (status, body) = app
        .post(
            &app.course_path("/team-distribution"),
            &app.manager.token,
            distribution_body(-1, 7),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

fn status_of(body: &Value, id: i64) -> String {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["id"] == id)
        .map(|item| item["registration_status"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_only_managers_and_admins_create() -> Result<()> {
    let app = TestApp::spawn().await?;
    let uri = app.course_path("/team-distribution");

    let (status, _) = app.post(&uri, &app.student.token, distribution_body(-1, 7)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post(&uri, &app.admin.token, distribution_body(-1, 7)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["course_id"], app.course.id);
    assert_eq!(body["data"]["min_total_score"], 50);
    Ok(())
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() -> Result<()> {
    let app = TestApp::spawn().await?;
    let uri = app.course_path("/team-distribution");

    let mut body = distribution_body(-1, 7);
    body["min_team_size"] = json!(0);
    body["name"] = json!("");
    let (status, response) = app.post(&uri, &app.manager.token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["type"], "VALIDATION_ERROR");

    // End before start passes field checks but fails the domain rules.
    let (status, _) = app.post(&uri, &app.manager.token, distribution_body(7, 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = distribution_body(-1, 7);
    body["min_team_size"] = json!(5);
    let (status, _) = app.post(&uri, &app.manager.token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_create_rejects_malformed_bodies() -> Result<()> {
    let app = TestApp::spawn().await?;
    let uri = app.course_path("/team-distribution");

    let mut missing_start = distribution_body(-1, 7);
    missing_start.as_object_mut().unwrap().remove("start_date");
    let mut wrong_type = distribution_body(-1, 7);
    wrong_type["min_team_size"] = json!("two");

    for body in [missing_start, wrong_type, json!("not an object")] {
        let (status, response) = app.post(&uri, &app.manager.token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["type"], "BAD_REQUEST");
        assert_eq!(response["error"]["code"], 400);
    }

    let (status, response) = app
        .get(&app.course_path("/team-distribution/abc/detailed"), &app.manager.token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["type"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn test_students_list_handles_extreme_pages() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = create_open_distribution(&app).await;
    let base = app.course_path(&format!("/team-distribution/{id}/students"));

    let (status, body) = app
        .get(&format!("{base}?pageSize=10&current={}", i64::MAX), &app.manager.token)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["items"], json!([]));

    let (status, response) = app
        .get(&format!("{base}?current=first"), &app.manager.token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["type"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn test_registration_status_per_student() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = create_open_distribution(&app).await;
    let list = app.course_path("/team-distribution");

    let (status, body) = app.get(&list, &app.student.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(status_of(&body, id), "available");

    let (_, body) = app.get(&list, &app.weak_student.token).await;
    assert_eq!(status_of(&body, id), "unavailable");

    // Staff without a student record only see the dates.
    let (_, body) = app.get(&list, &app.mentor.token).await;
    assert_eq!(status_of(&body, id), "available");

    let (status, body) = app
        .post(&app.course_path("/team-distribution"), &app.manager.token, distribution_body(3, 10))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let future_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = app.get(&list, &app.student.token).await;
    assert_eq!(status_of(&body, future_id), "future");
    Ok(())
}

#[tokio::test]
async fn test_register_and_unregister() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = create_open_distribution(&app).await;
    let registry = app.course_path(&format!("/team-distribution/{id}/registry"));
    let list = app.course_path("/team-distribution");

    let (status, _) = app.post(&registry, &app.student.token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&list, &app.student.token).await;
    assert_eq!(status_of(&body, id), "completed");

    // Below the minimum score.
    let (status, _) = app.post(&registry, &app.weak_student.token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Managers have no student record to register.
    let (status, _) = app.post(&registry, &app.manager.token, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::DELETE, &registry, Some(&app.student.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&list, &app.student.token).await;
    assert_eq!(status_of(&body, id), "available");
    Ok(())
}

#[tokio::test]
async fn test_registration_outside_window_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (_, body) = app
        .post(&app.course_path("/team-distribution"), &app.manager.token, distribution_body(2, 9))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            &app.course_path(&format!("/team-distribution/{id}/registry")),
            &app.student.token,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn test_detailed_and_students_require_registration() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = create_open_distribution(&app).await;
    let detailed = app.course_path(&format!("/team-distribution/{id}/detailed"));
    let students = app.course_path(&format!("/team-distribution/{id}/students?pageSize=10&current=1"));

    let (status, _) = app.get(&detailed, &app.student.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.post(
        &app.course_path(&format!("/team-distribution/{id}/registry")),
        &app.student.token,
        json!({}),
    )
    .await;

    let (status, body) = app.get(&detailed, &app.student.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["teams_count"], 0);
    assert_eq!(body["data"]["students_without_team_count"], 1);
    assert!(body["data"]["my_team"].is_null());

    let (status, body) = app.get(&students, &app.manager.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["page_size"], 10);
    assert_eq!(body["data"]["items"][0]["id"], app.student.student_id.unwrap());

    // Mentors are not part of this guard.
    let (status, _) = app.get(&students, &app.mentor.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn test_team_creation_distributes_students() -> Result<()> {
    let app = TestApp::spawn().await?;
    let student_id = app.student.student_id.unwrap();
    let team = json!({
        "name": "Team Rocket",
        "chat_link": "https://t.me/team-rocket",
        "student_ids": [student_id]
    });

    // min_team_size is 2 here, so a single student is not a team.
    let pairs_id = create_open_distribution(&app).await;
    app.post(
        &app.course_path(&format!("/team-distribution/{pairs_id}/registry")),
        &app.student.token,
        json!({}),
    )
    .await;
    let (status, body) = app
        .post(
            &app.course_path(&format!("/team-distribution/{pairs_id}/teams")),
            &app.manager.token,
            team.clone(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "VALIDATION_ERROR");

    let mut solo = distribution_body(-1, 7);
    solo["min_team_size"] = json!(1);
    let (status, body) = app
        .post(&app.course_path("/team-distribution"), &app.manager.token, solo)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["data"]["id"].as_i64().unwrap();
    app.post(
        &app.course_path(&format!("/team-distribution/{id}/registry")),
        &app.student.token,
        json!({}),
    )
    .await;
    let teams = app.course_path(&format!("/team-distribution/{id}/teams"));
    let (status, _) = app.post(&teams, &app.student.token, team.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post(&teams, &app.manager.token, team.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["team"]["name"], "Team Rocket");
    assert_eq!(body["data"]["students"][0]["id"], student_id);

    // A student can only be in one team per distribution.
    let (status, _) = app.post(&teams, &app.manager.token, team).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unregistered students cannot be placed.
    let (status, _) = app
        .post(
            &teams,
            &app.manager.token,
            json!({"name": "Ghosts", "student_ids": [app.weak_student.student_id.unwrap()]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get(&app.course_path("/team-distribution"), &app.student.token).await;
    assert_eq!(status_of(&body, id), "distributed");

    let (_, body) = app
        .get(&app.course_path(&format!("/team-distribution/{id}/detailed")), &app.student.token)
        .await;
    assert_eq!(body["data"]["teams_count"], 1);
    assert_eq!(body["data"]["students_without_team_count"], 0);
    assert_eq!(body["data"]["my_team"]["team"]["name"], "Team Rocket");
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = create_open_distribution(&app).await;
    let uri = app.course_path(&format!("/team-distribution/{id}"));

    let (status, _) = app
        .request(Method::PUT, &uri, Some(&app.student.token), Some(json!({"name": "Mine"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&app.manager.token),
            Some(json!({"name": "Renamed", "description_url": ""})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert!(body["data"]["description_url"].is_null());
    assert_eq!(body["data"]["max_team_size"], 4);

    // The update is rejected as a whole when it breaks the size rules.
    let (status, _) = app
        .request(
            Method::PUT,
            &uri,
            Some(&app.manager.token),
            Some(json!({"name": "Broken", "min_team_size": 9})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(Method::DELETE, &uri, Some(&app.manager.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("{uri}/detailed"), &app.manager.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, &uri, Some(&app.admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
