//! Schema Invariant Tests
//!
//! Construction properties of the showcase catalog:
//! - Construction is deterministic
//! - Record mappings reconstruct an equal record
//! - Every field failure is reported, with dotted paths
//! - Aliases, computed fields and inheritance behave consistently

use recordkit::schema::{catalog, ErrorKind, FieldValue, SchemaRegistry, SchemaValidator};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn showcase() -> SchemaRegistry {
    catalog::showcase().unwrap()
}

fn error_paths(registry: &SchemaRegistry, schema: &str, input: &Value) -> Vec<String> {
    let err = registry.construct(schema, input).unwrap_err();
    err.validation()
        .expect("expected a validation failure")
        .errors
        .iter()
        .map(|e| e.path.clone())
        .collect()
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same input constructs the same record every time.
#[test]
fn test_construction_is_deterministic() {
    let registry = showcase();
    let validator = SchemaValidator::new(&registry);
    let input = json!({ "name": "Laptop", "price": "60000", "stock": 3 });

    let first = validator.construct(catalog::PRODUCT, &input).unwrap();
    for _ in 0..100 {
        assert_eq!(validator.construct(catalog::PRODUCT, &input).unwrap(), first);
    }
}

/// Invalid input fails with the same errors every time.
#[test]
fn test_invalid_input_fails_consistently() {
    let registry = showcase();
    let input = json!({ "email": "invalid-email", "password": "123" });

    let first = registry.construct(catalog::SIGNUP, &input).unwrap_err();
    for _ in 0..100 {
        let err = registry.construct(catalog::SIGNUP, &input).unwrap_err();
        assert_eq!(err.validation(), first.validation());
    }
}

// =============================================================================
// Round-trip Tests
// =============================================================================

/// Mappings of every showcase record reconstruct an equal record.
#[test]
fn test_mapping_reconstructs_equal_record() {
    let registry = showcase();
    let inputs = [
        (catalog::USER, json!({ "id": 1, "name": "Sujal" })),
        (catalog::PRODUCT, json!({ "name": "Laptop", "price": 60000 })),
        (
            catalog::ORDER,
            json!({
                "order_id": "ORD101",
                "items": [{ "product": { "name": "Laptop", "price": 60000 }, "quantity": 2 }],
                "metadata": { "channel": "web" }
            }),
        ),
        (catalog::PERSON, json!({ "fullName": "Virat Kohli", "country": "India" })),
        (
            catalog::EMPLOYEE,
            json!({ "first_name": "Rohit", "last_name": "Sharma", "salary": 50000 }),
        ),
        (catalog::ADMIN, json!({ "id": 9, "name": "Admin User" })),
    ];

    for (schema, input) in inputs {
        let record = registry.construct(schema, &input).unwrap();
        for by_alias in [false, true] {
            let mapping = record.to_mapping(by_alias);
            let again = registry.construct(schema, &mapping).unwrap();
            assert_eq!(again, record, "{} by_alias={}", schema, by_alias);
        }
    }
}

// =============================================================================
// Defaults and Constraints
// =============================================================================

#[test]
fn test_product_defaults_stock() {
    let registry = showcase();
    let product = registry
        .construct(catalog::PRODUCT, &json!({ "name": "Laptop", "price": 60000 }))
        .unwrap();

    assert_eq!(product.str("name"), Some("Laptop"));
    assert_eq!(product.float("price"), Some(60000.0));
    assert_eq!(product.int("stock"), Some(0));
}

#[test]
fn test_product_stock_rejects_exponent_string() {
    let registry = showcase();
    let paths = error_paths(
        &registry,
        catalog::PRODUCT,
        &json!({ "name": "Laptop", "price": 10, "stock": "1e3" }),
    );
    assert_eq!(paths, vec!["stock"]);

    let product = registry
        .construct(catalog::PRODUCT, &json!({ "name": "Laptop", "price": 10, "stock": "12" }))
        .unwrap();
    assert_eq!(product.int("stock"), Some(12));
}

#[test]
fn test_product_name_too_short() {
    let registry = showcase();
    let err = registry
        .construct(catalog::PRODUCT, &json!({ "name": "L", "price": 10 }))
        .unwrap_err();
    let v = err.validation().unwrap();

    assert_eq!(v.len(), 1);
    assert_eq!(v.errors[0].path, "name");
    assert_eq!(v.errors[0].kind.code(), "constraint");
}

/// Each failing field is reported once, in declaration order.
#[test]
fn test_errors_are_aggregated() {
    let registry = showcase();
    let paths = error_paths(
        &registry,
        catalog::PRODUCT,
        &json!({ "name": "L", "price": -1, "stock": "many" }),
    );
    assert_eq!(paths, vec!["name", "price", "stock"]);
}

#[test]
fn test_missing_required_fields() {
    let registry = showcase();
    let err = registry.construct(catalog::PRODUCT, &json!({})).unwrap_err();
    let v = err.validation().unwrap();

    assert_eq!(v.len(), 2);
    assert!(v.errors.iter().all(|e| e.kind == ErrorKind::MissingField));
}

// =============================================================================
// Custom Validators
// =============================================================================

#[test]
fn test_signup_reports_both_validators() {
    let registry = showcase();
    let err = registry
        .construct(
            catalog::SIGNUP,
            &json!({ "email": "invalid-email", "password": "123" }),
        )
        .unwrap_err();
    let v = err.validation().unwrap();

    assert_eq!(v.len(), 2);
    assert_eq!(v.errors[0].path, "email");
    assert!(v.errors[0].message.contains("Email must contain @"));
    assert_eq!(v.errors[1].path, "password");
    assert!(v.errors[1].message.contains("at least 6"));
    assert!(v.errors.iter().all(|e| e.kind == ErrorKind::Validator));
    assert_eq!(
        v.pairs(),
        vec![
            ("email", "Email must contain @"),
            ("password", "Password must be at least 6 chars"),
        ]
    );
}

#[test]
fn test_signup_accepts_valid_input() {
    let registry = showcase();
    let signup = registry
        .construct(
            catalog::SIGNUP,
            &json!({ "email": "a@b.com", "password": "secret1" }),
        )
        .unwrap();
    assert_eq!(signup.str("email"), Some("a@b.com"));
}

// =============================================================================
// Nested Paths
// =============================================================================

#[test]
fn test_order_quantity_path() {
    let registry = showcase();
    let paths = error_paths(
        &registry,
        catalog::ORDER,
        &json!({
            "order_id": "ORD1",
            "items": [{ "product": { "name": "Laptop", "price": 10 }, "quantity": 0 }]
        }),
    );
    assert_eq!(paths, vec!["items.0.quantity"]);
}

#[test]
fn test_order_nested_price_path() {
    let registry = showcase();
    let paths = error_paths(
        &registry,
        catalog::ORDER,
        &json!({
            "order_id": "ORD1",
            "items": [
                { "product": { "name": "Laptop", "price": 10 }, "quantity": 1 },
                { "product": { "name": "Mouse", "price": -5 }, "quantity": 1 }
            ]
        }),
    );
    assert_eq!(paths, vec!["items.1.product.price"]);
}

#[test]
fn test_order_nested_records() {
    let registry = showcase();
    let order = registry
        .construct(
            catalog::ORDER,
            &json!({
                "order_id": "ORD101",
                "items": [{ "product": { "name": "Laptop", "price": 60000 }, "quantity": 2 }]
            }),
        )
        .unwrap();

    let items = order.list("items").unwrap();
    assert_eq!(items.len(), 1);
    let item = items[0].as_record().unwrap();
    assert_eq!(item.int("quantity"), Some(2));
    assert_eq!(item.record("product").unwrap().str("name"), Some("Laptop"));
    assert_eq!(order.get("metadata"), Some(&FieldValue::Map(Vec::new())));
}

// =============================================================================
// Aliasing
// =============================================================================

#[test]
fn test_person_accepts_alias_and_name() {
    let registry = showcase();
    let by_alias = registry
        .construct(catalog::PERSON, &json!({ "fullName": "Virat Kohli", "country": "India" }))
        .unwrap();
    let by_name = registry
        .construct(catalog::PERSON, &json!({ "full_name": "Virat Kohli", "country": "India" }))
        .unwrap();

    assert_eq!(by_alias, by_name);
    assert_eq!(
        by_alias.to_mapping(true),
        json!({ "fullName": "Virat Kohli", "country": "India" })
    );
    assert_eq!(
        by_alias.to_mapping(false),
        json!({ "full_name": "Virat Kohli", "country": "India" })
    );
}

#[test]
fn test_person_missing_reports_canonical_name() {
    let registry = showcase();
    let paths = error_paths(&registry, catalog::PERSON, &json!({ "country": "India" }));
    assert_eq!(paths, vec!["full_name"]);
}

// =============================================================================
// Computed Fields
// =============================================================================

#[test]
fn test_employee_computed_fields() {
    let registry = showcase();
    let emp = registry
        .construct(
            catalog::EMPLOYEE,
            &json!({ "first_name": "Rohit", "last_name": "Sharma", "salary": 50000 }),
        )
        .unwrap();

    let mapping = emp.to_mapping(false);
    assert_eq!(mapping["full_name"], "Rohit Sharma");
    assert_eq!(mapping["yearly_salary"].as_f64(), Some(600000.0));
}

#[test]
fn test_employee_rejects_inconsistent_computed_input() {
    let registry = showcase();
    let err = registry
        .construct(
            catalog::EMPLOYEE,
            &json!({
                "first_name": "Rohit",
                "last_name": "Sharma",
                "salary": 50000,
                "full_name": "Someone Else"
            }),
        )
        .unwrap_err();
    let v = err.validation().unwrap();
    assert_eq!(v.errors[0].path, "full_name");
    assert_eq!(v.errors[0].kind, ErrorKind::ComputedInput);
}

#[test]
fn test_employee_salary_overflow_rejected() {
    let registry = showcase();
    let err = registry
        .construct(
            catalog::EMPLOYEE,
            &json!({ "first_name": "Rohit", "last_name": "Sharma", "salary": 1e308 }),
        )
        .unwrap_err();
    let v = err.validation().unwrap();
    assert_eq!(v.pairs(), vec![("yearly_salary", "Computed field 'yearly_salary' is not a finite number")]);
    assert_eq!(v.errors[0].kind, ErrorKind::ComputedValue);
}

#[test]
fn test_employee_computed_input_unchecked_while_salary_fails() {
    let registry = showcase();
    let paths = error_paths(
        &registry,
        catalog::EMPLOYEE,
        &json!({
            "first_name": "Rohit",
            "last_name": "Sharma",
            "salary": "abc",
            "full_name": "Someone Else"
        }),
    );
    assert_eq!(paths, vec!["salary"]);
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_admin_inherits_user_fields() {
    let registry = showcase();
    let admin = registry
        .construct(catalog::ADMIN, &json!({ "id": 9, "name": "Admin User" }))
        .unwrap();

    assert_eq!(
        admin.to_mapping(false),
        json!({
            "id": 9,
            "name": "Admin User",
            "age": null,
            "is_active": true,
            "role": "admin"
        })
    );
}

#[test]
fn test_admin_validates_parent_fields() {
    let registry = showcase();
    let paths = error_paths(&registry, catalog::ADMIN, &json!({ "name": "Admin User" }));
    assert_eq!(paths, vec!["id"]);
}
