use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Hotel, HotelInput},
    store::Store,
};

pub async fn get_hotel(store: &Store, id: Uuid) -> AppResult<Hotel> {
    store
        .hotels
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hotel {}", id)))
}

pub async fn create_hotel(store: &Store, input: HotelInput) -> AppResult<Hotel> {
    input.validate().map_err(AppError::InvalidInput)?;
    let hotel = store.hotels.insert(Hotel::new(input)).await?;
    tracing::info!(hotel_id = %hotel.id, name = %hotel.name, "Hotel created");
    Ok(hotel)
}

pub async fn update_hotel(store: &Store, id: Uuid, input: HotelInput) -> AppResult<Hotel> {
    input.validate().map_err(AppError::InvalidInput)?;
    let mut hotel = get_hotel(store, id).await?;
    hotel.apply(input);

    store
        .hotels
        .update(hotel)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hotel {}", id)))
}

pub async fn delete_hotel(store: &Store, id: Uuid) -> AppResult<()> {
    if !store.hotels.delete(id).await? {
        return Err(AppError::NotFound(format!("Hotel {}", id)));
    }
    tracing::info!(hotel_id = %id, "Hotel deleted");
    Ok(())
}
