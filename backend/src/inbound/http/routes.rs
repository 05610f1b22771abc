//! Route table for the `/api` scope.

use actix_web::web;

use super::{
    admin, announcements, bills, citizen, complaints, health, login, notifications, payments,
    service_requests,
};

/// Register every `/api` endpoint on `cfg`.
///
/// `/bills/pending` is registered ahead of `/bills/{id}` so the literal
/// segment is not captured as an id.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::banner)
            .service(health::api_health)
            .service(login::send_otp)
            .service(login::verify_otp)
            .service(login::admin_login)
            .service(citizen::get_profile)
            .service(citizen::update_profile)
            .service(bills::list_bills)
            .service(bills::list_pending_bills)
            .service(bills::get_bill)
            .service(payments::pay_bill)
            .service(payments::list_payments)
            .service(payments::get_receipt)
            .service(service_requests::submit_service_request)
            .service(service_requests::list_service_requests)
            .service(service_requests::get_service_request)
            .service(complaints::file_complaint)
            .service(complaints::list_complaints)
            .service(complaints::get_complaint)
            .service(notifications::list_notifications)
            .service(notifications::mark_notification_read)
            .service(announcements::list_announcements)
            .service(admin::dashboard)
            .service(admin::list_citizens)
            .service(admin::list_all_bills)
            .service(admin::create_bill)
            .service(admin::list_all_payments)
            .service(admin::list_all_complaints)
            .service(admin::update_complaint)
            .service(admin::list_all_service_requests)
            .service(admin::update_service_request)
            .service(admin::list_all_announcements)
            .service(admin::create_announcement)
            .service(admin::delete_announcement)
            .service(admin::send_notification),
    );
}

/// Register the orchestration probes, which live outside `/api`.
pub fn configure_probes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillFilter, CitizenId, Principal};
    use crate::inbound::http::test_utils::{TestPorts, gate_resolving};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    #[actix_web::test]
    async fn pending_bills_are_not_captured_as_an_id() {
        let mut ports = TestPorts::default();
        ports.auth = gate_resolving(Principal::citizen(CitizenId::random()));
        ports
            .bills
            .expect_list_bills()
            .withf(|_, filter| *filter == BillFilter::Outstanding)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        ports.bills.expect_bill().never();
        let app = actix_test::init_service(ports.into_app().configure(configure_api)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/bills/pending")
                .insert_header(("Authorization", "Bearer token"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
