//! Property repository
//!
//! `search_properties` runs the dynamic search statement built by
//! [`build_property_search`]; `add_property` is a fixed insert.

use super::{decode_returning, run};
use crate::data::error::DataError;
use crate::data::executor::{QueryExecutor, Row, SqlValue};
use crate::data::filters::{PropertyFilter, build_property_search};
use crate::data::types::{NewProperty, PropertyRow};

const INSERT_PROPERTY: &str = "INSERT INTO properties (
    owner_id,
    title,
    description,
    thumbnail_photo_url,
    cover_photo_url,
    cost_per_night,
    street,
    city,
    province,
    post_code,
    country,
    parking_spaces,
    number_of_bathrooms,
    number_of_bedrooms
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
RETURNING *";

/// Search properties, cheapest first.
///
/// Rows are returned exactly as the executor produced them: property columns
/// plus `average_rating`. No match yields an empty vec; an execution failure
/// yields an error.
pub async fn search_properties(
    executor: &dyn QueryExecutor,
    filter: &PropertyFilter,
    limit: Option<u32>,
) -> Result<Vec<Row>, DataError> {
    let query = build_property_search(filter, limit);
    run(
        executor,
        "search_properties",
        &query.sql,
        &query.params.values,
    )
    .await
}

/// Insert a property and return the stored row
pub async fn add_property(
    executor: &dyn QueryExecutor,
    property: &NewProperty,
) -> Result<PropertyRow, DataError> {
    let params = [
        SqlValue::Int(property.owner_id),
        SqlValue::from(property.title.as_str()),
        SqlValue::from(property.description.as_deref()),
        SqlValue::from(property.thumbnail_photo_url.as_str()),
        SqlValue::from(property.cover_photo_url.as_str()),
        SqlValue::Int(property.cost_per_night),
        SqlValue::from(property.street.as_str()),
        SqlValue::from(property.city.as_str()),
        SqlValue::from(property.province.as_str()),
        SqlValue::from(property.post_code.as_str()),
        SqlValue::from(property.country.as_str()),
        SqlValue::from(property.parking_spaces),
        SqlValue::from(property.number_of_bathrooms),
        SqlValue::from(property.number_of_bedrooms),
    ];
    let rows = run(executor, "add_property", INSERT_PROPERTY, &params).await?;
    let created: PropertyRow = decode_returning("add_property", rows)?;
    tracing::debug!(id = created.id, owner_id = created.owner_id, "Property created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::executor::testing::RecordingExecutor;
    use serde_json::json;

    fn new_property() -> NewProperty {
        NewProperty {
            owner_id: 3,
            title: "Cozy cabin".to_string(),
            description: None,
            thumbnail_photo_url: "https://example.com/t.jpg".to_string(),
            cover_photo_url: "https://example.com/c.jpg".to_string(),
            cost_per_night: 12500,
            street: "1 Lake Rd".to_string(),
            city: "Whistler".to_string(),
            province: "BC".to_string(),
            post_code: "V0N".to_string(),
            country: "Canada".to_string(),
            parking_spaces: 2,
            number_of_bathrooms: 1,
            number_of_bedrooms: 3,
        }
    }

    fn stored_property() -> serde_json::Value {
        json!({
            "id": 44, "owner_id": 3, "title": "Cozy cabin", "description": null,
            "thumbnail_photo_url": "https://example.com/t.jpg",
            "cover_photo_url": "https://example.com/c.jpg",
            "cost_per_night": 12500, "parking_spaces": 2,
            "number_of_bathrooms": 1, "number_of_bedrooms": 3,
            "country": "Canada", "street": "1 Lake Rd", "city": "Whistler",
            "province": "BC", "post_code": "V0N", "active": true
        })
    }

    #[tokio::test]
    async fn search_executes_built_statement_once() {
        let executor = RecordingExecutor::empty();
        let filter = PropertyFilter {
            city: Some("Toronto".to_string()),
            minimum_rating: Some(3.0),
            ..Default::default()
        };
        let rows = search_properties(&executor, &filter, Some(5)).await.unwrap();

        assert!(rows.is_empty());
        let expected = build_property_search(&filter, Some(5));
        let (sql, params) = executor.only_call();
        assert_eq!(sql, expected.sql);
        assert_eq!(
            params,
            vec![
                SqlValue::from("%Toronto%"),
                SqlValue::Float(3.0),
                SqlValue::Int(5),
            ]
        );
    }

    #[tokio::test]
    async fn search_returns_rows_unmodified() {
        let row = json!({ "id": 1, "title": "Loft", "average_rating": null, "extra": [1, 2] });
        let executor = RecordingExecutor::returning(vec![row.clone()]);
        let rows = search_properties(&executor, &PropertyFilter::default(), None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(serde_json::Value::Object(rows[0].clone()), row);
    }

    #[tokio::test]
    async fn search_failure_is_distinguishable_from_no_rows() {
        let executor = RecordingExecutor::failing();
        let result = search_properties(&executor, &PropertyFilter::default(), None).await;
        assert!(matches!(result, Err(DataError::Postgres(_))));
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn add_property_binds_fourteen_columns_in_order() {
        let executor = RecordingExecutor::returning(vec![stored_property()]);
        let created = add_property(&executor, &new_property()).await.unwrap();

        assert_eq!(created.id, 44);
        assert_eq!(created.cost_per_night, 12500);

        let (sql, params) = executor.only_call();
        assert!(sql.contains("$14)"));
        assert!(sql.ends_with("RETURNING *"));
        assert_eq!(params.len(), 14);
        assert_eq!(params[0], SqlValue::Int(3));
        assert_eq!(params[2], SqlValue::Null);
        assert_eq!(params[5], SqlValue::Int(12500));
        assert_eq!(params[7], SqlValue::from("Whistler"));
        assert_eq!(params[13], SqlValue::Int(3));
    }
}
