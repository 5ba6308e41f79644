use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::workflows::ledger::profile::DonorSources;
use crate::workflows::ledger::router::profile_router;
use crate::workflows::ledger::service::{DonorProfileService, FixedClock};

pub(super) fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub(super) fn service() -> Arc<DonorProfileService<FixedClock>> {
    Arc::new(DonorProfileService::new(Arc::new(FixedClock(
        reference_now(),
    ))))
}

pub(super) fn router() -> axum::Router {
    profile_router(service())
}

pub(super) fn sources_payload() -> Value {
    json!({
        "hospitalDonations": [
            {
                "_id": "h-1",
                "status": "completed",
                "bloodInfo": { "bloodType": "O+", "quantity": 450 },
                "submittedAt": "2025-05-20T12:00:00Z",
                "donationCenter": "Riverside Blood Bank"
            },
            {
                "_id": "h-2",
                "status": "pending",
                "bloodInfo": { "bloodType": "O+", "quantity": 450 },
                "createdAt": "2025-05-28T08:00:00Z"
            }
        ],
        "registrations": [
            { "_id": "r-1", "isActive": true, "registeredAt": "2025-01-05", "bloodInfo": "O+" }
        ],
        "payments": [
            { "transactionId": "t-1", "amount": 30, "status": "SUCCESS", "createdAt": "2025-05-30T09:00:00Z" },
            { "transactionId": "t-2", "amount": 30, "status": "FAILED", "createdAt": "2025-05-31T09:00:00Z" }
        ]
    })
}

pub(super) fn sources() -> DonorSources {
    serde_json::from_value(sources_payload()).expect("valid sources")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
