use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    BankTransfer,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    pub user_id: Option<Uuid>,
    pub reservation_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

impl Record for Payment {
    type Filter = PaymentFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &PaymentFilter) -> bool {
        filter.user_id.map_or(true, |id| self.user_id == id)
            && filter.reservation_id.map_or(true, |id| self.reservation_id == id)
            && filter.status.map_or(true, |status| self.status == status)
    }
}
