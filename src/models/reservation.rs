use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Payment state as tracked on the reservation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Paid,
    Refunded,
    Failed,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
    pub total_price: f64,
    pub status: ReservationStatus,
    pub payment_status: PaymentState,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// True if this reservation holds rooms on any night of `[check_in, check_out)`
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.status != ReservationStatus::Cancelled
            && self.check_in < check_out
            && check_in < self.check_out
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub user_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
    pub status: Option<ReservationStatus>,
}

impl Record for Reservation {
    type Filter = ReservationFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &ReservationFilter) -> bool {
        filter.user_id.map_or(true, |id| self.user_id == id)
            && filter.hotel_id.map_or(true, |id| self.hotel_id == id)
            && filter.status.map_or(true, |status| self.status == status)
    }
}
