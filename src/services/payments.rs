use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Payment, PaymentFilter, PaymentMethod, PaymentState, PaymentStatus, ReservationStatus,
        User,
    },
    services::reservations::get_reservation,
    store::Store,
};

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub reservation_id: Uuid,
    pub method: PaymentMethod,
}

pub async fn get_payment(store: &Store, id: Uuid) -> AppResult<Payment> {
    store
        .payments
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {}", id)))
}

async fn set_reservation_payment(
    store: &Store,
    reservation_id: Uuid,
    payment_status: PaymentState,
    status: Option<ReservationStatus>,
) -> AppResult<()> {
    let mut reservation = get_reservation(store, reservation_id).await?;
    reservation.payment_status = payment_status;
    if let Some(status) = status {
        reservation.status = status;
    }
    reservation.updated_at = Utc::now();
    store.reservations.update(reservation).await?;
    Ok(())
}

/// Pays the full amount of one of the caller's reservations
pub async fn pay(store: &Store, user: &User, request: PaymentRequest) -> AppResult<Payment> {
    let reservation = get_reservation(store, request.reservation_id).await?;

    if reservation.user_id != user.id {
        return Err(AppError::Forbidden(
            "Reservation belongs to another user".to_string(),
        ));
    }
    if reservation.status == ReservationStatus::Cancelled {
        return Err(AppError::InvalidInput(
            "Cannot pay for a cancelled reservation".to_string(),
        ));
    }
    if reservation.payment_status == PaymentState::Paid {
        return Err(AppError::Conflict("Reservation is already paid".to_string()));
    }

    let payment = Payment {
        id: Uuid::new_v4(),
        reservation_id: reservation.id,
        user_id: user.id,
        amount: reservation.total_price,
        method: request.method,
        status: PaymentStatus::Completed,
        transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
        created_at: Utc::now(),
    };

    // At most one completed payment per reservation, checked under the store lock
    let unique = PaymentFilter {
        reservation_id: Some(reservation.id),
        status: Some(PaymentStatus::Completed),
        ..Default::default()
    };
    let payment = store
        .payments
        .insert_unique(payment, &unique, "Reservation is already paid".to_string())
        .await?;
    set_reservation_payment(
        store,
        reservation.id,
        PaymentState::Paid,
        Some(ReservationStatus::Confirmed),
    )
    .await?;

    tracing::info!(
        payment_id = %payment.id,
        reservation_id = %reservation.id,
        amount = payment.amount,
        "Payment completed"
    );
    Ok(payment)
}

/// Overrides a payment status, mirroring it on the reservation
pub async fn set_status(store: &Store, id: Uuid, status: PaymentStatus) -> AppResult<Payment> {
    let mut payment = get_payment(store, id).await?;
    payment.status = status;
    let payment = store
        .payments
        .update(payment)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {}", id)))?;

    let mirrored = match status {
        PaymentStatus::Pending => PaymentState::Pending,
        PaymentStatus::Completed => PaymentState::Paid,
        PaymentStatus::Failed => PaymentState::Failed,
        PaymentStatus::Refunded => PaymentState::Refunded,
    };
    set_reservation_payment(store, payment.reservation_id, mirrored, None).await?;

    Ok(payment)
}

/// Refunds a completed payment and cancels its reservation
pub async fn refund(store: &Store, id: Uuid) -> AppResult<Payment> {
    let mut payment = get_payment(store, id).await?;
    if payment.status != PaymentStatus::Completed {
        return Err(AppError::InvalidInput(format!(
            "Only completed payments can be refunded, payment is {:?}",
            payment.status
        )));
    }

    payment.status = PaymentStatus::Refunded;
    let payment = store
        .payments
        .update(payment)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {}", id)))?;

    set_reservation_payment(
        store,
        payment.reservation_id,
        PaymentState::Refunded,
        Some(ReservationStatus::Cancelled),
    )
    .await?;

    tracing::info!(payment_id = %payment.id, amount = payment.amount, "Payment refunded");
    Ok(payment)
}

/// Sum of completed payments
pub async fn total_revenue(store: &Store) -> AppResult<f64> {
    let filter = PaymentFilter {
        status: Some(PaymentStatus::Completed),
        ..Default::default()
    };
    Ok(store
        .payments
        .find(&filter)
        .await?
        .iter()
        .map(|p| p.amount)
        .sum())
}
