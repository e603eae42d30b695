//! Built-in schema catalogs
//!
//! - [`registration`]: the `User` accepted by the registration endpoint
//! - [`showcase`]: products, orders, signup rules, aliasing, computed fields
//!   and inheritance
//!
//! The two catalogs each define their own `User` and are kept in separate
//! registries.

use super::errors::SchemaResult;
use super::registry::SchemaRegistry;
use super::types::{ComputedField, Constraint, FieldDef, FieldType, FieldValidator, Schema};
use super::value::FieldValue;

pub const USER: &str = "User";
pub const PRODUCT: &str = "Product";
pub const ORDER_ITEM: &str = "OrderItem";
pub const ORDER: &str = "Order";
pub const SIGNUP: &str = "Signup";
pub const PERSON: &str = "Person";
pub const EMPLOYEE: &str = "Employee";
pub const ADMIN: &str = "Admin";

/// Minimum password length enforced on signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registry holding the registration `User`.
pub fn registration() -> SchemaResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.register(
        Schema::new(USER)
            .field(FieldDef::string("name").constraint(Constraint::min_length(3)))
            .field(FieldDef::string("email"))
            .field(FieldDef::optional("age", FieldType::Int))
            .field(
                FieldDef::new("skills", FieldType::list(FieldType::String))
                    .default(FieldValue::List(Vec::new())),
            )
            .field(FieldDef::bool("active").default(true)),
    )?;
    Ok(registry)
}

/// Registry holding the showcase schemas.
pub fn showcase() -> SchemaResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    registry.register(
        Schema::new(USER)
            .field(FieldDef::int("id"))
            .field(FieldDef::string("name"))
            .field(FieldDef::optional("age", FieldType::Int))
            .field(FieldDef::bool("is_active").default(true)),
    )?;

    registry.register(
        Schema::new(PRODUCT)
            .field(
                FieldDef::string("name")
                    .constraint(Constraint::min_length(2))
                    .constraint(Constraint::max_length(50)),
            )
            .field(FieldDef::float("price").constraint(Constraint::ge(0.0)))
            .field(FieldDef::int("stock").default(0i64).constraint(Constraint::ge(0.0))),
    )?;

    registry.register(
        Schema::new(ORDER_ITEM)
            .field(FieldDef::new("product", FieldType::model(PRODUCT)))
            .field(FieldDef::int("quantity").constraint(Constraint::gt(0.0))),
    )?;

    registry.register(
        Schema::new(ORDER)
            .field(FieldDef::string("order_id"))
            .field(FieldDef::new("items", FieldType::list(FieldType::model(ORDER_ITEM))))
            .field(
                FieldDef::new("metadata", FieldType::map(FieldType::String))
                    .default(FieldValue::Map(Vec::new())),
            ),
    )?;

    registry.register(
        Schema::new(SIGNUP)
            .field(FieldDef::string("email").validator(FieldValidator::new(
                "check_email",
                |value| {
                    if value.as_str().map_or(false, |email| email.contains('@')) {
                        Ok(value)
                    } else {
                        Err("Email must contain @".to_string())
                    }
                },
            )))
            .field(FieldDef::string("password").validator(FieldValidator::new(
                "strong_password",
                |value| {
                    if value.length().map_or(false, |len| len >= MIN_PASSWORD_LEN) {
                        Ok(value)
                    } else {
                        Err(format!("Password must be at least {} chars", MIN_PASSWORD_LEN))
                    }
                },
            ))),
    )?;

    registry.register(
        Schema::new(PERSON)
            .field(FieldDef::string("full_name").alias("fullName"))
            .field(FieldDef::string("country"))
            .populate_by_name(true),
    )?;

    registry.register(
        Schema::new(EMPLOYEE)
            .field(FieldDef::string("first_name"))
            .field(FieldDef::string("last_name"))
            .field(FieldDef::float("salary"))
            .computed(ComputedField::new("full_name", FieldType::String, |r| {
                FieldValue::Str(format!(
                    "{} {}",
                    r.str("first_name").unwrap_or_default(),
                    r.str("last_name").unwrap_or_default()
                ))
            }))
            .computed(ComputedField::new("yearly_salary", FieldType::Float, |r| {
                FieldValue::Float(r.float("salary").unwrap_or_default() * 12.0)
            })),
    )?;

    registry.register(
        Schema::new(ADMIN)
            .extends(USER)
            .field(FieldDef::string("role").default("admin")),
    )?;

    Ok(registry)
}
