use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use course_domain::entities::NewCourseTask;
use course_domain::repositories::CourseTaskRepository;
use course_infrastructure::SqliteCourseTaskRepository;

mod test_utils;
use test_utils::TestApp;

fn names(body: &Value, field: &str) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_links_follow_roles() -> Result<()> {
    let app = TestApp::spawn().await?;
    let uri = app.course_path("/links");

    let (status, body) = app.get(&uri, &app.admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 13);

    let (_, body) = app.get(&uri, &app.student.token).await;
    assert_eq!(
        names(&body, "name"),
        vec![
            "Dashboard",
            "Score",
            "Schedule",
            "Cross-Check: Submit",
            "Cross-Check: Review",
            "Interviews",
            "Auto-Test",
            "Team Distributions",
            "Course Statistics",
        ]
    );
    assert_eq!(
        body["data"][0]["url"],
        format!("/course/student/dashboard?course={}", app.course.alias)
    );

    let (_, body) = app.get(&uri, &app.mentor.token).await;
    assert_eq!(
        names(&body, "name"),
        vec![
            "Dashboard",
            "Score",
            "Schedule",
            "My Students",
            "Interviews",
            "Expel/Unassign Student",
            "Course Statistics",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_navigation_matches_links() -> Result<()> {
    let app = TestApp::spawn().await?;

    let (_, links) = app.get(&app.course_path("/links"), &app.manager.token).await;
    let (status, navigation) = app
        .get(&app.course_path("/navigation"), &app.manager.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&navigation, "label"), names(&links, "name"));
    assert!(names(&navigation, "label").contains(&"Team Distributions".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_unknown_course_is_not_found_for_admin() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (status, body) = app.get("/api/courses/4242/links", &app.admin.token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);
    Ok(())
}

#[tokio::test]
async fn test_tasks_expose_cross_check_flags() -> Result<()> {
    let app = TestApp::spawn().await?;
    let tasks = SqliteCourseTaskRepository::new(app.db.pool().clone());
    let now = Utc::now();

    let closed = tasks
        .create(&NewCourseTask {
            course_id: app.course.id,
            name: "Submission closed".to_string(),
            student_start_date: Some(now - Duration::days(10)),
            student_end_date: Some(now - Duration::days(1)),
            cross_check_end_date: Some(now + Duration::days(6)),
        })
        .await?;
    tasks
        .create(&NewCourseTask {
            course_id: app.course.id,
            name: "Submission open".to_string(),
            student_start_date: Some(now - Duration::days(1)),
            student_end_date: Some(now + Duration::days(1)),
            cross_check_end_date: None,
        })
        .await?;

    let (status, body) = app.get(&app.course_path("/tasks"), &app.student.token).await;
    assert_eq!(status, StatusCode::OK);

    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], closed.id);
    assert_eq!(items[0]["cross_check_status"], "initial");
    assert_eq!(items[0]["needs_to_start"], true);
    assert_eq!(items[0]["needs_to_finish"], false);
    assert_eq!(items[1]["needs_to_start"], false);
    Ok(())
}

#[tokio::test]
async fn test_interview_registration() -> Result<()> {
    let app = TestApp::spawn().await?;
    let task = SqliteCourseTaskRepository::new(app.db.pool().clone())
        .create(&NewCourseTask {
            course_id: app.course.id,
            name: "Technical screening".to_string(),
            student_start_date: None,
            student_end_date: None,
            cross_check_end_date: None,
        })
        .await?;
    let registration = app.course_path(&format!("/interviews/{}/registration", task.id));
    let students = app.course_path(&format!("/interviews/{}/students", task.id));

    let (status, body) = app.post(&registration, &app.student.token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["student_id"], app.student.student_id.unwrap());
    assert_eq!(body["data"]["course_task_id"], task.id);

    let (status, body) = app.post(&registration, &app.student.token, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "CONFLICT");

    let (status, _) = app.post(&registration, &app.mentor.token, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get(&students, &app.mentor.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.get(&students, &app.student.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(&app.course_path("/interviews/777/registration"), &app.student.token, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
