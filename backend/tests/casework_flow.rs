//! Complaints, service requests, notifications and announcements end to end.

mod suvidha_support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::{Value, json};

use suvidha_support::{admin_login, citizen_login, init_app, send, send_as};

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|item| item["id"].as_str().expect("id"))
        .collect()
}

#[actix_web::test]
async fn resolving_a_complaint_is_visible_to_its_citizen() {
    let app = init_app().await;
    let admin = admin_login(&app).await;
    let (citizen, citizen_id) = citizen_login(&app, "9810000001", Some("Meera")).await;

    let (status, receipt) = send_as(
        &app,
        &citizen,
        TestRequest::post().uri("/api/complaints").set_json(json!({
            "category": "water",
            "description": "  Pipe leaking near the main gate ",
            "location": "Ward 4"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{receipt}");
    assert_eq!(receipt["message"], "Complaint filed successfully");
    let complaint_id = receipt["complaint_id"].as_str().expect("id").to_owned();
    let uri = format!("/api/complaints/{complaint_id}");

    let (_, filed) = send_as(&app, &citizen, TestRequest::get().uri(&uri)).await;
    assert_eq!(filed["status"], "submitted");
    assert_eq!(filed["priority"], "medium");
    assert_eq!(filed["description"], "Pipe leaking near the main gate");
    assert_eq!(filed["resolved_at"], Value::Null);

    let (_, queue) = send_as(&app, &admin, TestRequest::get().uri("/api/admin/complaints")).await;
    assert_eq!(queue[0]["citizen_name"], "Meera");
    assert_eq!(queue[0]["citizen_id"], citizen_id.as_str());

    let (status, ack) = send_as(
        &app,
        &admin,
        TestRequest::put().uri(&format!("/api/admin/complaints/{complaint_id}")).set_json(
            json!({ "status": "resolved", "resolution_remarks": "Pipe replaced" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["message"], "Complaint updated successfully");

    let (_, resolved) = send_as(&app, &citizen, TestRequest::get().uri(&uri)).await;
    assert_eq!(resolved["status"], "resolved");
    assert_eq!(resolved["resolution_remarks"], "Pipe replaced");
    assert!(resolved["resolved_at"].is_string());

    let (status, _) = send_as(
        &app,
        &admin,
        TestRequest::put()
            .uri(&format!("/api/admin/complaints/{complaint_id}"))
            .set_json(json!({ "status": "escalated" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn complaints_are_private_to_their_author() {
    let app = init_app().await;
    let (author, _) = citizen_login(&app, "9810000002", None).await;
    let (other, _) = citizen_login(&app, "9810000003", None).await;
    let (_, receipt) = send_as(
        &app,
        &author,
        TestRequest::post().uri("/api/complaints").set_json(json!({
            "category": "sanitation",
            "description": "Garbage not collected",
            "priority": "high"
        })),
    )
    .await;
    let uri = format!(
        "/api/complaints/{}",
        receipt["complaint_id"].as_str().expect("id")
    );

    let (status, _) = send_as(&app, &other, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = send_as(&app, &other, TestRequest::get().uri("/api/complaints")).await;
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn service_requests_move_through_review() {
    let app = init_app().await;
    let admin = admin_login(&app).await;
    let (citizen, _) = citizen_login(&app, "9810000004", None).await;

    let (status, receipt) = send_as(
        &app,
        &citizen,
        TestRequest::post().uri("/api/service-requests").set_json(json!({
            "request_type": "new_connection",
            "service_type": "gas",
            "description": "New kitchen line"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{receipt}");
    assert!(
        receipt["acknowledgment_number"]
            .as_str()
            .expect("ack number")
            .starts_with("SR")
    );
    let request_id = receipt["request_id"].as_str().expect("id").to_owned();

    let (status, _) = send_as(
        &app,
        &admin,
        TestRequest::put()
            .uri(&format!("/api/admin/service-requests/{request_id}"))
            .set_json(json!({ "status": "approved", "remarks": "Site survey booked" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, request) = send_as(
        &app,
        &citizen,
        TestRequest::get().uri(&format!("/api/service-requests/{request_id}")),
    )
    .await;
    assert_eq!(request["status"], "approved");
    assert_eq!(request["remarks"], "Site survey booked");
    assert_eq!(request["service_type"], "gas");

    let (status, body) = send_as(
        &app,
        &citizen,
        TestRequest::post().uri("/api/service-requests").set_json(json!({
            "request_type": "teleportation",
            "service_type": "gas"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["context"]["field"], "request_type");
}

#[actix_web::test]
async fn broadcasts_reach_everyone_and_targeted_notices_one_citizen() {
    let app = init_app().await;
    let admin = admin_login(&app).await;
    let (first, first_id) = citizen_login(&app, "9810000005", None).await;
    let (second, _) = citizen_login(&app, "9810000006", None).await;

    let (status, broadcast) = send_as(
        &app,
        &admin,
        TestRequest::post().uri("/api/admin/notifications").set_json(json!({
            "title": "Water outage",
            "message": "Supply off 10:00-14:00",
            "type": "alert"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(broadcast["target_all"], true);
    let broadcast_id = broadcast["notification_id"].as_str().expect("id").to_owned();

    let (_, targeted) = send_as(
        &app,
        &admin,
        TestRequest::post().uri("/api/admin/notifications").set_json(json!({
            "citizen_id": first_id,
            "title": "Bill due",
            "message": "Electricity bill due Friday",
            "type": "bill_reminder"
        })),
    )
    .await;
    assert_eq!(targeted["target_all"], false);
    let targeted_id = targeted["notification_id"].as_str().expect("id").to_owned();

    let (_, first_inbox) = send_as(&app, &first, TestRequest::get().uri("/api/notifications")).await;
    let mut first_ids = ids(&first_inbox);
    first_ids.sort_unstable();
    let mut expected = vec![broadcast_id.as_str(), targeted_id.as_str()];
    expected.sort_unstable();
    assert_eq!(first_ids, expected);

    let (_, second_inbox) =
        send_as(&app, &second, TestRequest::get().uri("/api/notifications")).await;
    assert_eq!(ids(&second_inbox), vec![broadcast_id.as_str()]);

    let (status, _) = send_as(
        &app,
        &second,
        TestRequest::put().uri(&format!("/api/notifications/{targeted_id}/read")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn marking_a_broadcast_read_is_per_citizen_and_idempotent() {
    let app = init_app().await;
    let admin = admin_login(&app).await;
    let (reader, _) = citizen_login(&app, "9810000007", None).await;
    let (bystander, _) = citizen_login(&app, "9810000008", None).await;
    let (_, sent) = send_as(
        &app,
        &admin,
        TestRequest::post().uri("/api/admin/notifications").set_json(json!({
            "title": "Holiday",
            "message": "Offices closed Monday"
        })),
    )
    .await;
    let read_uri = format!(
        "/api/notifications/{}/read",
        sent["notification_id"].as_str().expect("id")
    );

    for _ in 0..2 {
        let (status, ack) = send_as(&app, &reader, TestRequest::put().uri(&read_uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack["message"], "Notification marked as read");
    }

    let (_, inbox) = send_as(&app, &reader, TestRequest::get().uri("/api/notifications")).await;
    assert_eq!(inbox[0]["is_read"], true);
    assert_eq!(inbox[0]["type"], "notice");
    let (_, inbox) = send_as(&app, &bystander, TestRequest::get().uri("/api/notifications")).await;
    assert_eq!(inbox[0]["is_read"], false);
}

#[actix_web::test]
async fn withdrawn_announcements_leave_the_public_board() {
    let app = init_app().await;
    let admin = admin_login(&app).await;

    let (status, created) = send_as(
        &app,
        &admin,
        TestRequest::post().uri("/api/admin/announcements").set_json(json!({
            "title": "Planned maintenance",
            "message": "Ward 4 water supply off",
            "type": "maintenance",
            "service_type": "water"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let id = created["announcement_id"].as_str().expect("id").to_owned();

    let (status, board) = send(&app, TestRequest::get().uri("/api/announcements")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&board), vec![id.as_str()]);

    let delete_uri = format!("/api/admin/announcements/{id}");
    let (status, _) = send_as(&app, &admin, TestRequest::delete().uri(&delete_uri)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, board) = send(&app, TestRequest::get().uri("/api/announcements")).await;
    assert_eq!(board, json!([]));
    let (_, all) = send_as(
        &app,
        &admin,
        TestRequest::get().uri("/api/admin/announcements"),
    )
    .await;
    assert_eq!(all[0]["is_active"], false);
}

#[actix_web::test]
async fn announcements_outside_their_window_are_hidden() {
    let app = init_app().await;
    let admin = admin_login(&app).await;
    let (status, _) = send_as(
        &app,
        &admin,
        TestRequest::post().uri("/api/admin/announcements").set_json(json!({
            "title": "Old outage",
            "message": "Resolved",
            "type": "outage",
            "start_date": "2020-01-01",
            "end_date": "2020-01-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, board) = send(&app, TestRequest::get().uri("/api/announcements")).await;
    assert_eq!(board, json!([]));
}
