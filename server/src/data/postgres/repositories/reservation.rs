//! Reservation repository

use super::{decode_all, run};
use crate::core::constants::DEFAULT_RESERVATIONS_LIMIT;
use crate::data::error::DataError;
use crate::data::executor::{QueryExecutor, SqlValue};
use crate::data::types::ReservationRow;

const GUEST_RESERVATIONS: &str = "SELECT reservations.id AS reservation_id,
    reservations.guest_id,
    reservations.start_date,
    reservations.end_date,
    properties.*,
    avg(coalesce(rating, 0)) AS average_rating
FROM reservations
JOIN properties ON properties.id = reservations.property_id
JOIN property_reviews ON property_reviews.property_id = properties.id
WHERE reservations.guest_id = $1
GROUP BY properties.id, reservations.id
ORDER BY reservations.start_date
LIMIT $2";

/// List a guest's reservations with the reserved property and its rating,
/// earliest first. `limit` defaults to [`DEFAULT_RESERVATIONS_LIMIT`].
pub async fn get_all_reservations(
    executor: &dyn QueryExecutor,
    guest_id: i64,
    limit: Option<u32>,
) -> Result<Vec<ReservationRow>, DataError> {
    let limit = limit.unwrap_or(DEFAULT_RESERVATIONS_LIMIT);
    let rows = run(
        executor,
        "get_all_reservations",
        GUEST_RESERVATIONS,
        &[SqlValue::Int(guest_id), SqlValue::from(limit)],
    )
    .await?;
    decode_all(rows)
}
