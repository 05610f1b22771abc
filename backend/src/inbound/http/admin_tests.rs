//! Tests for administrator handlers.

use super::*;
use crate::domain::{
    Announcement, AnnouncementKind, Bill, BillStatus, FixedPoint, Notification,
    Principal, ReferenceCode,
};
use crate::inbound::http::test_utils::{TestPorts, gate_resolving};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
        .single()
        .expect("valid instant")
}

fn admin_ports() -> (TestPorts, Uuid) {
    let admin = Uuid::new_v4();
    let mut ports = TestPorts::default();
    ports.auth = gate_resolving(Principal::new(admin, crate::domain::Role::Admin));
    (ports, admin)
}

async fn call(ports: TestPorts, req: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        ports.into_app().service(
            web::scope("/api")
                .service(dashboard)
                .service(list_citizens)
                .service(list_all_bills)
                .service(create_bill)
                .service(list_all_payments)
                .service(list_all_complaints)
                .service(update_complaint)
                .service(list_all_service_requests)
                .service(update_service_request)
                .service(list_all_announcements)
                .service(create_announcement)
                .service(delete_announcement)
                .service(send_notification),
        ),
    )
    .await;
    let res = actix_test::call_service(
        &app,
        req.insert_header(("Authorization", "Bearer token"))
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/api/admin/dashboard"))]
#[case(actix_test::TestRequest::get().uri("/api/admin/citizens"))]
#[case(actix_test::TestRequest::get().uri("/api/admin/bills"))]
#[case(actix_test::TestRequest::delete().uri("/api/admin/announcements/6f9619ff-8b86-4011-b42d-00c04fc964ff"))]
#[actix_web::test]
async fn citizens_are_forbidden(#[case] req: actix_test::TestRequest) {
    let mut ports = TestPorts::default();
    ports.auth = gate_resolving(Principal::citizen(CitizenId::random()));
    let (status, body) = call(ports, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Admin access required");
}

#[actix_web::test]
async fn dashboard_nests_counts_by_record() {
    let (mut ports, _) = admin_ports();
    ports.dashboard.expect_summary().times(1).returning(|| {
        Ok(DashboardSummary {
            citizens_total: 3,
            bills_total: 5,
            bills_pending: 2,
            payments_total: 3,
            payments_revenue: FixedPoint::from_hundredths(250_050),
            complaints_total: 4,
            complaints_pending: 1,
            complaints_in_progress: 2,
            complaints_resolved: 1,
            service_requests_total: 2,
            service_requests_pending: 1,
        })
    });
    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri("/api/admin/dashboard"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["citizens"]["total"], 3);
    assert_eq!(body["bills"], json!({"total": 5, "pending": 2}));
    assert_eq!(body["payments"]["revenue"], 2500.5);
    assert_eq!(body["complaints"]["in_progress"], 2);
    assert_eq!(body["service_requests"]["pending"], 1);
}

#[actix_web::test]
async fn creating_a_bill_converts_the_body() {
    let (mut ports, _) = admin_ports();
    let citizen = CitizenId::random();
    ports
        .bills
        .expect_create_bill()
        .withf(move |draft| {
            draft.citizen_id == citizen
                && draft.service_type == ServiceType::Gas
                && draft.amount.hundredths() == 125_050
                && draft.due_date == NaiveDate::from_ymd_opt(2025, 2, 15).expect("date")
                && draft.billing_period.as_deref() == Some("Jan 2025")
                && draft.consumer_number.is_none()
                && draft.units_consumed.map(FixedPoint::hundredths) == Some(4_200)
        })
        .times(1)
        .returning(|draft| {
            Ok(Bill {
                id: crate::domain::BillId::random(),
                citizen_id: draft.citizen_id,
                service_type: draft.service_type,
                bill_number: ReferenceCode::from_stored("BILL4827103"),
                amount: draft.amount,
                due_date: draft.due_date,
                billing_period: draft.billing_period,
                status: BillStatus::Pending,
                consumer_number: draft.consumer_number,
                meter_reading: draft.meter_reading,
                units_consumed: draft.units_consumed,
                created_at: instant(),
            })
        });
    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/admin/bills")
            .set_json(json!({
                "citizen_id": citizen.to_string(),
                "service_type": "gas",
                "amount": 1250.5,
                "due_date": "2025-02-15",
                "billing_period": "Jan 2025",
                "consumer_number": "  ",
                "units_consumed": 42.0
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["bill_number"], "BILL4827103");
    assert_eq!(body["message"], "Bill created successfully");
}

#[rstest]
#[case(json!({"citizen_id": "nope", "service_type": "gas", "amount": 10.0, "due_date": "2025-02-15"}), "citizen_id")]
#[case(json!({"citizen_id": "6f9619ff-8b86-4011-b42d-00c04fc964ff", "service_type": "steam", "amount": 10.0, "due_date": "2025-02-15"}), "service_type")]
#[case(json!({"citizen_id": "6f9619ff-8b86-4011-b42d-00c04fc964ff", "service_type": "gas", "amount": -1.0, "due_date": "2025-02-15"}), "amount")]
#[case(json!({"citizen_id": "6f9619ff-8b86-4011-b42d-00c04fc964ff", "service_type": "gas", "amount": 10.0, "due_date": "15/02/2025"}), "due_date")]
#[actix_web::test]
async fn malformed_bill_bodies_name_the_field(#[case] payload: Value, #[case] field: &str) {
    let (mut ports, _) = admin_ports();
    ports.bills.expect_create_bill().never();
    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/admin/bills")
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["context"]["field"], field);
}

#[actix_web::test]
async fn complaint_updates_pass_status_and_remarks() {
    let (mut ports, admin) = admin_ports();
    let id = ComplaintId::random();
    ports
        .complaints
        .expect_update_status()
        .withf(move |principal, complaint, status, remarks| {
            principal.subject_id() == admin
                && *complaint == id
                && *status == ComplaintStatus::Resolved
                && remarks.as_deref() == Some("Pipe replaced")
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));
    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/admin/complaints/{id}"))
            .set_json(json!({"status": "resolved", "resolution_remarks": "Pipe replaced"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Complaint updated successfully");
}

#[actix_web::test]
async fn unknown_complaint_status_is_rejected() {
    let (mut ports, _) = admin_ports();
    ports.complaints.expect_update_status().never();
    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/admin/complaints/{}", ComplaintId::random()))
            .set_json(json!({"status": "escalated"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["context"]["code"], "invalid_choice");
}

#[actix_web::test]
async fn missing_service_request_is_not_found() {
    let (mut ports, _) = admin_ports();
    ports
        .service_requests
        .expect_update_status()
        .returning(|_, _, _, _| Err(Error::not_found("Service request not found")));
    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!(
                "/api/admin/service-requests/{}",
                ServiceRequestId::random()
            ))
            .set_json(json!({"status": "approved", "remarks": "ok"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn announcements_are_authored_by_the_caller() {
    let (mut ports, admin) = admin_ports();
    ports
        .announcements
        .expect_create()
        .withf(move |author, draft| {
            *author.as_uuid() == admin
                && draft.kind == AnnouncementKind::Outage
                && draft.service_type.as_deref() == Some("water")
        })
        .times(1)
        .returning(|author, draft| {
            Ok(draft.into_announcement(AnnouncementId::random(), Some(*author), instant()))
        });
    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/admin/announcements")
            .set_json(json!({
                "title": "Water outage",
                "message": "Supply off 10:00-14:00",
                "type": "outage",
                "service_type": "water",
                "start_date": "2025-01-15",
                "end_date": "2025-01-16T00:00:00Z"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Announcement created successfully");
    assert!(body["announcement_id"].as_str().is_some());
}

#[actix_web::test]
async fn admin_listing_includes_inactive_announcements() {
    let (mut ports, _) = admin_ports();
    ports
        .announcements
        .expect_list_all_announcements()
        .returning(|| {
            Ok(vec![Announcement {
                id: AnnouncementId::random(),
                title: "Old".into(),
                message: "Withdrawn".into(),
                kind: AnnouncementKind::General,
                service_type: None,
                start_date: None,
                end_date: None,
                is_active: false,
                created_by: None,
                created_at: instant(),
            }])
        });
    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri("/api/admin/announcements"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["is_active"], false);
    assert_eq!(body[0]["type"], "general");
}

#[actix_web::test]
async fn deleting_an_unknown_announcement_is_not_found() {
    let (mut ports, _) = admin_ports();
    ports
        .announcements
        .expect_deactivate()
        .returning(|_| Err(Error::not_found("Announcement not found")));
    let (status, _) = call(
        ports,
        actix_test::TestRequest::delete().uri(&format!(
            "/api/admin/announcements/{}",
            AnnouncementId::random()
        )),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn sent(draft: NotificationDraft) -> Notification {
    Notification {
        id: crate::domain::NotificationId::random(),
        audience: draft.audience,
        title: draft.title,
        message: draft.message,
        kind: draft.kind,
        is_read: false,
        created_at: instant(),
    }
}

#[actix_web::test]
async fn notifications_without_a_citizen_are_broadcast() {
    let (mut ports, _) = admin_ports();
    ports
        .notifications
        .expect_send()
        .withf(|draft| draft.audience == Audience::Everyone && draft.kind == NotificationKind::Notice)
        .times(1)
        .returning(|draft| Ok(sent(draft)));
    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/admin/notifications")
            .set_json(json!({"title": "Holiday", "message": "Offices closed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target_all"], true);
    assert_eq!(body["message"], "Notification sent successfully");
}

#[actix_web::test]
async fn targeted_notifications_carry_the_citizen() {
    let (mut ports, _) = admin_ports();
    let citizen = CitizenId::random();
    ports
        .notifications
        .expect_send()
        .withf(move |draft| {
            draft.audience == Audience::Citizen(citizen)
                && draft.kind == NotificationKind::BillReminder
        })
        .times(1)
        .returning(|draft| Ok(sent(draft)));
    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/admin/notifications")
            .set_json(json!({
                "citizen_id": citizen.to_string(),
                "title": "Bill due",
                "message": "Pay by Friday",
                "type": "bill_reminder"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target_all"], false);
}

#[actix_web::test]
async fn blank_notification_title_is_rejected() {
    let (mut ports, _) = admin_ports();
    ports.notifications.expect_send().never();
    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/admin/notifications")
            .set_json(json!({"title": " ", "message": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
