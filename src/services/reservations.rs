use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Hotel, HotelStatus, PaymentState, Reservation, ReservationFilter, ReservationStatus, User,
    },
    store::{InsertGuard, Store},
};

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRequest {
    pub hotel_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "one")]
    pub guests: u32,
    #[serde(default = "one")]
    pub rooms: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    /// Rooms still free for the whole stay
    pub rooms: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub hotel_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    #[serde(default = "one")]
    pub rooms: u32,
    #[serde(default)]
    pub special_requests: Option<String>,
}

fn one() -> u32 {
    1
}

fn validate_stay(check_in: NaiveDate, check_out: NaiveDate, guests: u32, rooms: u32) -> AppResult<()> {
    if check_out <= check_in {
        return Err(AppError::InvalidInput(
            "check_out must be after check_in".to_string(),
        ));
    }
    if guests == 0 {
        return Err(AppError::InvalidInput("guests must be at least 1".to_string()));
    }
    if rooms == 0 {
        return Err(AppError::InvalidInput("rooms must be at least 1".to_string()));
    }
    Ok(())
}

async fn load_hotel(store: &Store, hotel_id: Uuid) -> AppResult<Hotel> {
    store
        .hotels
        .get(hotel_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hotel {}", hotel_id)))
}

/// Rooms out of `total` not held by an overlapping, non-cancelled reservation
fn rooms_left(
    total: u32,
    reservations: &[&Reservation],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> u32 {
    let held: u32 = reservations
        .iter()
        .filter(|r| r.overlaps(check_in, check_out))
        .map(|r| r.rooms)
        .sum();
    total.saturating_sub(held)
}

async fn free_rooms(
    store: &Store,
    hotel: &Hotel,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> AppResult<u32> {
    let filter = ReservationFilter {
        hotel_id: Some(hotel.id),
        ..Default::default()
    };
    let reservations = store.reservations.find(&filter).await?;
    let held: Vec<&Reservation> = reservations.iter().collect();
    Ok(rooms_left(hotel.rooms, &held, check_in, check_out))
}

pub async fn check_availability(
    store: &Store,
    request: AvailabilityRequest,
) -> AppResult<Availability> {
    validate_stay(request.check_in, request.check_out, request.guests, request.rooms)?;
    let hotel = load_hotel(store, request.hotel_id).await?;

    if hotel.status != HotelStatus::Active {
        return Ok(Availability {
            available: false,
            rooms: 0,
        });
    }

    let rooms = free_rooms(store, &hotel, request.check_in, request.check_out).await?;
    Ok(Availability {
        available: rooms >= request.rooms,
        rooms,
    })
}

/// Books a stay for `user`, priced at `nights * rooms * price_per_night`
pub async fn create_reservation(
    store: &Store,
    user: &User,
    request: CreateReservationRequest,
) -> AppResult<Reservation> {
    validate_stay(request.check_in, request.check_out, request.guests, request.rooms)?;
    let hotel = load_hotel(store, request.hotel_id).await?;

    if hotel.status != HotelStatus::Active {
        return Err(AppError::InvalidInput(format!(
            "Hotel {} is not accepting reservations",
            hotel.name
        )));
    }

    let nights = (request.check_out - request.check_in).num_days();
    let now = Utc::now();
    let reservation = Reservation {
        id: Uuid::new_v4(),
        user_id: user.id,
        hotel_id: hotel.id,
        check_in: request.check_in,
        check_out: request.check_out,
        guests: request.guests,
        rooms: request.rooms,
        total_price: nights as f64 * request.rooms as f64 * hotel.price_per_night,
        status: ReservationStatus::Pending,
        payment_status: PaymentState::Pending,
        special_requests: request.special_requests,
        created_at: now,
        updated_at: now,
    };

    // Capacity is checked and the stay recorded under one store lock
    let scope = ReservationFilter {
        hotel_id: Some(hotel.id),
        ..Default::default()
    };
    let (total, check_in, check_out, wanted) =
        (hotel.rooms, request.check_in, request.check_out, request.rooms);
    let guard: InsertGuard<Reservation> = Box::new(move |existing: &[&Reservation]| {
        let free = rooms_left(total, existing, check_in, check_out);
        if free < wanted {
            return Err(AppError::Conflict(format!(
                "Only {} room(s) left for the requested dates",
                free
            )));
        }
        Ok(())
    });
    let reservation = store
        .reservations
        .insert_checked(reservation, &scope, guard)
        .await?;
    tracing::info!(
        reservation_id = %reservation.id,
        hotel_id = %hotel.id,
        user_id = %user.id,
        nights,
        total_price = reservation.total_price,
        "Reservation created"
    );
    Ok(reservation)
}

pub async fn get_reservation(store: &Store, id: Uuid) -> AppResult<Reservation> {
    store
        .reservations
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {}", id)))
}

pub async fn set_status(
    store: &Store,
    id: Uuid,
    status: ReservationStatus,
) -> AppResult<Reservation> {
    let mut reservation = get_reservation(store, id).await?;
    reservation.status = status;
    reservation.updated_at = Utc::now();

    store
        .reservations
        .update(reservation)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {}", id)))
}
