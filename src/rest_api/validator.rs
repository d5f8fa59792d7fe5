//! # Payload Validation
//!
//! Pure checks run on create and update bodies before the store is touched.
//! Both validators stop at the first violation, checking fields in a fixed
//! order (name, price, category, description, inStock) so the reported
//! field is deterministic. A key that is present with `null` counts as
//! present and fails its type check.

use serde_json::{json, Map, Value};

use crate::store::product::normalize_category;
use crate::store::{NewProduct, ProductPatch};

use super::errors::{ApiError, ApiResult};

/// Fields a client may send on update
pub const UPDATABLE_FIELDS: [&str; 5] = ["name", "description", "price", "category", "inStock"];

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 120;
pub const DESCRIPTION_MAX_LEN: usize = 1024;

/// Validate a create body and normalize it into a `NewProduct`.
///
/// `name`, `price` and `category` are required; `description` and
/// `inStock` are optional. Keys outside the product shape are ignored.
pub fn validate_create(payload: &Value) -> ApiResult<NewProduct> {
    let empty = Map::new();
    let body = payload.as_object().unwrap_or(&empty);

    let name = body
        .get("name")
        .ok_or_else(name_error)
        .and_then(check_name)?;
    let price = body
        .get("price")
        .ok_or_else(price_error)
        .and_then(check_price)?;
    let category = match body.get("category") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
        _ => return Err(field_error("category", "Field \"category\" is required")),
    };
    let description = body.get("description").map(check_description).transpose()?;
    let in_stock = body.get("inStock").map(check_in_stock).transpose()?;

    Ok(NewProduct::new(name, description, price, category, in_stock))
}

/// Validate an update body and normalize it into a `ProductPatch`.
///
/// The body must be a non-empty object whose keys all belong to
/// [`UPDATABLE_FIELDS`]. Every field is optional, but a present field must
/// satisfy the same rule as on create.
pub fn validate_update(payload: &Value) -> ApiResult<ProductPatch> {
    let empty = Map::new();
    let body = payload.as_object().unwrap_or(&empty);

    if body.is_empty() {
        return Err(ApiError::bad_request("Request body is empty"));
    }

    if let Some(key) = body.keys().find(|k| !UPDATABLE_FIELDS.contains(&k.as_str())) {
        return Err(ApiError::bad_request(format!("Unknown field: {}", key))
            .with_details(json!({ "field": key })));
    }

    let name = body.get("name").map(check_name).transpose()?;
    let price = body.get("price").map(check_price).transpose()?;
    let category = body
        .get("category")
        .map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Ok(normalize_category(s)),
            _ => Err(field_error(
                "category",
                "Field \"category\" must be a non-empty string",
            )),
        })
        .transpose()?;
    let description = body.get("description").map(check_description).transpose()?;
    let in_stock = body.get("inStock").map(check_in_stock).transpose()?;

    Ok(ProductPatch {
        name: name.map(|n| n.trim().to_string()),
        description: description.map(|d| d.trim().to_string()),
        price,
        category,
        in_stock,
    })
}

fn field_error(field: &str, message: &str) -> ApiError {
    ApiError::validation(message).with_details(json!({ "field": field }))
}

fn name_error() -> ApiError {
    field_error("name", "Field \"name\" must be a string with length >= 2")
}

fn price_error() -> ApiError {
    field_error("price", "Field \"price\" must be a non-negative number")
}

fn check_name(value: &Value) -> ApiResult<&str> {
    let name = value.as_str().ok_or_else(name_error)?;
    let len = name.trim().chars().count();
    if len < NAME_MIN_LEN {
        return Err(name_error());
    }
    if len > NAME_MAX_LEN {
        return Err(field_error(
            "name",
            &format!("Field \"name\" must be at most {} characters", NAME_MAX_LEN),
        ));
    }
    Ok(name)
}

fn check_price(value: &Value) -> ApiResult<f64> {
    match value.as_f64() {
        Some(price) if price >= 0.0 => Ok(price),
        _ => Err(price_error()),
    }
}

fn check_description(value: &Value) -> ApiResult<&str> {
    let description = value
        .as_str()
        .ok_or_else(|| field_error("description", "Field \"description\" must be a string"))?;
    if description.trim().chars().count() > DESCRIPTION_MAX_LEN {
        return Err(field_error(
            "description",
            &format!(
                "Field \"description\" must be at most {} characters",
                DESCRIPTION_MAX_LEN
            ),
        ));
    }
    Ok(description)
}

fn check_in_stock(value: &Value) -> ApiResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| field_error("inStock", "Field \"inStock\" must be a boolean"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest_api::errors::ErrorKind;

    fn failed_field(err: &ApiError) -> Option<&str> {
        err.details().and_then(|d| d["field"].as_str())
    }

    #[test]
    fn test_create_normalizes() {
        let product = validate_create(&json!({
            "name": "  Lamp  ",
            "price": 19.99,
            "category": "Home",
            "description": " warm light ",
        }))
        .unwrap();

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.category, "home");
        assert_eq!(product.description, "warm light");
        assert!(product.in_stock);
    }

    #[test]
    fn test_create_rejects_short_name() {
        let err = validate_create(&json!({"name": " a ", "price": 1, "category": "x"})).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ValidationFailed));
        assert_eq!(failed_field(&err), Some("name"));
    }

    #[test]
    fn test_create_rejects_long_name() {
        let name = "n".repeat(NAME_MAX_LEN + 1);
        let err = validate_create(&json!({"name": name, "price": 1, "category": "x"})).unwrap_err();
        assert_eq!(failed_field(&err), Some("name"));
    }

    #[test]
    fn test_create_price_rules() {
        for price in [json!(-1), json!("10"), json!(null)] {
            let err = validate_create(&json!({"name": "Lamp", "price": price, "category": "home"}))
                .unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::ValidationFailed));
            assert_eq!(failed_field(&err), Some("price"));
        }

        let missing = validate_create(&json!({"name": "Lamp", "category": "home"})).unwrap_err();
        assert_eq!(failed_field(&missing), Some("price"));

        assert!(validate_create(&json!({"name": "Free", "price": 0, "category": "home"})).is_ok());
    }

    #[test]
    fn test_create_requires_category() {
        for body in [
            json!({"name": "Lamp", "price": 1}),
            json!({"name": "Lamp", "price": 1, "category": "   "}),
            json!({"name": "Lamp", "price": 1, "category": 7}),
        ] {
            let err = validate_create(&body).unwrap_err();
            assert_eq!(err.to_string(), "Field \"category\" is required");
        }
    }

    #[test]
    fn test_create_optional_field_types() {
        let err = validate_create(&json!({
            "name": "Lamp", "price": 1, "category": "home", "description": null
        }))
        .unwrap_err();
        assert_eq!(failed_field(&err), Some("description"));

        let err = validate_create(&json!({
            "name": "Lamp", "price": 1, "category": "home", "inStock": "yes"
        }))
        .unwrap_err();
        assert_eq!(failed_field(&err), Some("inStock"));
    }

    #[test]
    fn test_create_description_length_cap() {
        let long = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        let err = validate_create(&json!({
            "name": "Lamp", "price": 1, "category": "home", "description": long
        }))
        .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ValidationFailed));
        assert_eq!(failed_field(&err), Some("description"));
        assert_eq!(
            err.to_string(),
            "Field \"description\" must be at most 1024 characters"
        );

        let padded = format!("  {}\n", "d".repeat(DESCRIPTION_MAX_LEN));
        let product = validate_create(&json!({
            "name": "Lamp", "price": 1, "category": "home", "description": padded
        }))
        .unwrap();
        assert_eq!(product.description.chars().count(), DESCRIPTION_MAX_LEN);
    }

    #[test]
    fn test_create_reports_first_failure_in_order() {
        let err = validate_create(&json!({"name": 5, "price": -1, "category": null})).unwrap_err();
        assert_eq!(failed_field(&err), Some("name"));

        let err = validate_create(&json!({"name": "Lamp", "price": -1, "inStock": 1})).unwrap_err();
        assert_eq!(failed_field(&err), Some("price"));
    }

    #[test]
    fn test_create_non_object_body() {
        let err = validate_create(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(failed_field(&err), Some("name"));
    }

    #[test]
    fn test_update_empty_body() {
        let err = validate_update(&json!({})).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::BadRequest));
        assert_eq!(err.to_string(), "Request body is empty");
    }

    #[test]
    fn test_update_unknown_field() {
        let err = validate_update(&json!({"price": 5, "color": "red"})).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::BadRequest));
        assert_eq!(err.to_string(), "Unknown field: color");
        assert_eq!(failed_field(&err), Some("color"));
    }

    #[test]
    fn test_update_unknown_field_checked_before_types() {
        let err = validate_update(&json!({"price": -5, "id": "x"})).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::BadRequest));
    }

    #[test]
    fn test_update_negative_price() {
        let err = validate_update(&json!({"price": -1})).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ValidationFailed));
        assert_eq!(failed_field(&err), Some("price"));
    }

    #[test]
    fn test_update_null_name_is_present() {
        let err = validate_update(&json!({"name": null})).unwrap_err();
        assert_eq!(failed_field(&err), Some("name"));
    }

    #[test]
    fn test_update_description_length_cap() {
        let long = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        let err = validate_update(&json!({ "description": long })).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ValidationFailed));
        assert_eq!(failed_field(&err), Some("description"));

        let padded = format!(" {} ", "d".repeat(DESCRIPTION_MAX_LEN));
        let patch = validate_update(&json!({ "description": padded })).unwrap();
        assert_eq!(
            patch.description.map(|d| d.chars().count()),
            Some(DESCRIPTION_MAX_LEN)
        );
    }

    #[test]
    fn test_update_builds_patch() {
        let patch = validate_update(&json!({
            "category": "  Office ",
            "inStock": false,
            "name": " Desk Lamp ",
        }))
        .unwrap();

        assert_eq!(patch.name.as_deref(), Some("Desk Lamp"));
        assert_eq!(patch.category.as_deref(), Some("office"));
        assert_eq!(patch.in_stock, Some(false));
        assert!(patch.price.is_none());
        assert!(patch.description.is_none());
    }
}
