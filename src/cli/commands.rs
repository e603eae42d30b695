//! CLI command implementations

use std::io::{self, Read, Write};
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::http_server::{HttpServer, ServiceConfig};
use crate::observability::{self, log_event, log_event_with_fields, Event};
use crate::schema::{catalog, SchemaError, SchemaRegistry};

use super::args::{CatalogName, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request_from, write_error_to, write_response_to};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            users_file,
        } => serve(config, port, users_file),
        Command::Validate {
            schema,
            catalog,
            by_alias,
        } => validate(&schema, catalog, by_alias),
        Command::Describe { schema, catalog } => describe(&schema, catalog),
        Command::Demo => demo(&mut io::stdout()),
    }
}

/// Build the registry for a catalog name
pub fn load_catalog(name: CatalogName) -> CliResult<SchemaRegistry> {
    let registry = match name {
        CatalogName::Showcase => catalog::showcase()?,
        CatalogName::Registration => catalog::registration()?,
    };
    Ok(registry)
}

/// Resolve configuration from an optional file plus flag overrides
pub fn resolve_config(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    users_file: Option<PathBuf>,
) -> CliResult<ServiceConfig> {
    let mut config = match config_path {
        Some(path) => ServiceConfig::load(&path)?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(users_file) = users_file {
        config.users_file = users_file;
    }
    Ok(config)
}

/// Start the registration server
pub fn serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    users_file: Option<PathBuf>,
) -> CliResult<()> {
    let config = resolve_config(config_path, port, users_file)?;
    observability::init(&config.log_level, config.log_format);
    log_event(Event::BootStart);
    let addr = config.socket_addr();
    log_event_with_fields(Event::ConfigLoaded, &[("addr", addr.as_str())]);

    let server = HttpServer::new(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate one JSON object from stdin
pub fn validate(schema: &str, catalog_name: CatalogName, by_alias: bool) -> CliResult<()> {
    validate_with(schema, catalog_name, by_alias, io::stdin().lock(), &mut io::stdout())
}

/// Validate one JSON object from `input`, writing the envelope to `out`.
///
/// Every failure, including unreadable input and unknown schemas, is written
/// as an error envelope before it is returned.
pub fn validate_with<R: Read, W: Write>(
    schema: &str,
    catalog_name: CatalogName,
    by_alias: bool,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    let registry = match load_catalog(catalog_name) {
        Ok(registry) => registry,
        Err(err) => return fail(out, err),
    };
    let input = match read_request_from(input) {
        Ok(input) => input,
        Err(err) => return fail(out, err),
    };

    match registry.construct(schema, &input) {
        Ok(record) => write_response_to(out, record.to_mapping(by_alias)),
        Err(err) => fail_schema(out, err),
    }
}

/// Print a schema's descriptors
pub fn describe(schema: &str, catalog_name: CatalogName) -> CliResult<()> {
    describe_to(schema, catalog_name, &mut io::stdout())
}

pub fn describe_to<W: Write>(schema: &str, catalog_name: CatalogName, out: &mut W) -> CliResult<()> {
    let registry = match load_catalog(catalog_name) {
        Ok(registry) => registry,
        Err(err) => return fail(out, err),
    };
    match registry.describe(schema) {
        Ok(description) => write_response_to(out, description),
        Err(err) => fail_schema(out, err),
    }
}

fn fail<W: Write>(out: &mut W, err: CliError) -> CliResult<()> {
    write_error_to(out, err.code_str(), err.message(), None::<()>)?;
    Err(err)
}

fn fail_schema<W: Write>(out: &mut W, err: SchemaError) -> CliResult<()> {
    let details = err.validation().map(|v| &v.errors);
    write_error_to(out, err.code(), &err.to_string(), details)?;
    Err(err.into())
}

/// One showcase scenario: a label, a schema and its input
struct Scenario {
    label: &'static str,
    schema: &'static str,
    input: Value,
    by_alias: bool,
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            label: "user",
            schema: catalog::USER,
            input: json!({ "id": 1, "name": "Sujal" }),
            by_alias: false,
        },
        Scenario {
            label: "product",
            schema: catalog::PRODUCT,
            input: json!({ "name": "Laptop", "price": 60000 }),
            by_alias: false,
        },
        Scenario {
            label: "order",
            schema: catalog::ORDER,
            input: json!({
                "order_id": "ORD101",
                "items": [{ "product": { "name": "Laptop", "price": 60000 }, "quantity": 2 }]
            }),
            by_alias: false,
        },
        Scenario {
            label: "signup",
            schema: catalog::SIGNUP,
            input: json!({ "email": "invalid-email", "password": "123" }),
            by_alias: false,
        },
        Scenario {
            label: "person",
            schema: catalog::PERSON,
            input: json!({ "fullName": "Virat Kohli", "country": "India" }),
            by_alias: true,
        },
        Scenario {
            label: "employee",
            schema: catalog::EMPLOYEE,
            input: json!({ "first_name": "Rohit", "last_name": "Sharma", "salary": 50000 }),
            by_alias: false,
        },
        Scenario {
            label: "admin",
            schema: catalog::ADMIN,
            input: json!({ "id": 9, "name": "Admin User" }),
            by_alias: false,
        },
    ]
}

/// Run every showcase scenario, one JSON line each.
///
/// Rejected inputs are part of the showcase and are printed, not returned
/// as errors.
pub fn demo<W: Write>(out: &mut W) -> CliResult<()> {
    let registry = catalog::showcase()?;

    for scenario in scenarios() {
        let line = match registry.construct(scenario.schema, &scenario.input) {
            Ok(record) => json!({
                "scenario": scenario.label,
                "schema": scenario.schema,
                "data": record.to_mapping(scenario.by_alias),
            }),
            Err(SchemaError::Validation(v)) => json!({
                "scenario": scenario.label,
                "schema": scenario.schema,
                "errors": v.errors,
            }),
            Err(other) => return Err(other.into()),
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_config_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recordkit.json");
        fs::write(&path, r#"{ "port": 9000, "users_file": "a.json" }"#).unwrap();

        let config = resolve_config(Some(path), None, Some(PathBuf::from("b.json"))).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.users_file, PathBuf::from("b.json"));

        let config = resolve_config(None, Some(1234), None).unwrap();
        assert_eq!(config.port, 1234);
    }

    #[test]
    fn test_resolve_config_missing_file() {
        let err = resolve_config(Some(PathBuf::from("/nonexistent/recordkit.json")), None, None)
            .unwrap_err();
        assert_eq!(err.code_str(), "CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_load_catalogs() {
        assert!(load_catalog(CatalogName::Showcase).unwrap().contains(catalog::ADMIN));
        assert!(!load_catalog(CatalogName::Registration).unwrap().contains(catalog::ADMIN));
    }

    fn run_validate(schema: &str, input: &str) -> (CliResult<()>, Value) {
        let mut out = Vec::new();
        let result = validate_with(schema, CatalogName::Showcase, true, input.as_bytes(), &mut out);
        let envelope = serde_json::from_slice(&out).unwrap();
        (result, envelope)
    }

    #[test]
    fn test_validate_success_envelope() {
        let (result, envelope) =
            run_validate(catalog::PERSON, r#"{ "full_name": "Virat Kohli", "country": "India" }"#);
        assert!(result.is_ok());
        assert_eq!(envelope["status"], "ok");
        assert_eq!(envelope["data"]["fullName"], "Virat Kohli");
    }

    #[test]
    fn test_validate_rejection_envelope() {
        let (result, envelope) = run_validate(catalog::PRODUCT, r#"{ "name": "L", "price": 1 }"#);
        assert_eq!(result.unwrap_err().code_str(), "CLI_VALIDATION_FAILED");
        assert_eq!(envelope["status"], "error");
        assert_eq!(envelope["code"], "SCHEMA_VALIDATION_FAILED");
        assert_eq!(envelope["details"][0]["path"], "name");
    }

    #[test]
    fn test_validate_unknown_schema_envelope() {
        let (result, envelope) = run_validate("Ghost", r#"{ "x": 1 }"#);
        assert_eq!(result.unwrap_err().code_str(), "CLI_SCHEMA_ERROR");
        assert_eq!(envelope["status"], "error");
        assert_eq!(envelope["code"], "SCHEMA_UNKNOWN");
        assert!(envelope.get("details").is_none());
    }

    #[test]
    fn test_validate_bad_input_envelope() {
        let (result, envelope) = run_validate(catalog::PRODUCT, "not json");
        assert_eq!(result.unwrap_err().code_str(), "CLI_IO_ERROR");
        assert_eq!(envelope["status"], "error");
        assert_eq!(envelope["code"], "CLI_IO_ERROR");

        let (result, envelope) = run_validate(catalog::PRODUCT, "");
        assert!(result.is_err());
        assert_eq!(envelope["message"], "Empty input");
    }

    #[test]
    fn test_describe_envelopes() {
        let mut out = Vec::new();
        describe_to(catalog::ADMIN, CatalogName::Showcase, &mut out).unwrap();
        let envelope: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(envelope["status"], "ok");

        let mut out = Vec::new();
        let err = describe_to(catalog::ADMIN, CatalogName::Registration, &mut out).unwrap_err();
        assert_eq!(err.code_str(), "CLI_SCHEMA_ERROR");
        let envelope: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(envelope["code"], "SCHEMA_UNKNOWN");
    }

    #[test]
    fn test_demo_output() {
        let mut out = Vec::new();
        demo(&mut out).unwrap();
        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 7);

        assert_eq!(lines[1]["data"]["stock"], 0);
        assert_eq!(lines[3]["errors"].as_array().unwrap().len(), 2);
        assert_eq!(lines[4]["data"], json!({ "fullName": "Virat Kohli", "country": "India" }));
        assert_eq!(lines[5]["data"]["full_name"], "Rohit Sharma");
        assert_eq!(lines[6]["data"]["role"], "admin");
    }
}
