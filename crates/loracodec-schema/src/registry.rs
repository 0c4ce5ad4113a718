use std::collections::HashMap;
use std::fs::{DirEntry, File};
use std::io::Read;
use std::path::Path;

use jsonschema::Validator;
use loracodec_layout::port::port_from_name;
use loracodec_layout::{COMMAND, SETTINGS, SPECTRUM_SCAN};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::validator::validate_record;

const SCHEMA_SUFFIX: &str = ".schema.json";
const PORT_PREFIX: &str = "port_";

/// Contracts for every downlink record, embedded at build time.
pub const BUILTIN_SCHEMAS: &[(u8, &str)] = &[
    (SETTINGS, include_str!("../schemas/settings.schema.json")),
    (SPECTRUM_SCAN, include_str!("../schemas/spectrum_scan.schema.json")),
    (COMMAND, include_str!("../schemas/command.schema.json")),
];

/// Port-keyed registry of compiled JSON Schema validators.
pub struct SchemaRegistry {
    validators: HashMap<u8, Validator>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            validators: HashMap::new(),
            config,
        }
    }

    /// Registry holding the built-in downlink contracts.
    pub fn builtin() -> Result<Self> {
        Self::builtin_with_config(RegistryConfig::default())
    }

    /// Built-in downlink contracts with explicit config.
    pub fn builtin_with_config(config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        for (port, schema) in BUILTIN_SCHEMAS {
            registry.register(*port, schema)?;
        }
        Ok(registry)
    }

    /// Register a schema for a port from a JSON string.
    pub fn register(&mut self, port: u8, schema_json: &str) -> Result<()> {
        let schema: Value = serde_json::from_str(schema_json)?;
        self.register_value(port, &schema)
    }

    /// Register a schema for a port from a JSON value. Replaces any earlier schema.
    pub fn register_value(&mut self, port: u8, schema: &Value) -> Result<()> {
        let mut schema_to_compile = schema.clone();
        if self.config.strict_mode {
            apply_strict_mode(&mut schema_to_compile);
        }

        let compiled = jsonschema::validator_for(&schema_to_compile)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;

        if self.validators.insert(port, compiled).is_some() {
            debug!(port, "replaced schema");
        } else {
            debug!(port, "registered schema");
        }
        Ok(())
    }

    /// Load schemas from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load schemas from a directory with explicit config.
    ///
    /// Files are named `port_<n>.schema.json` or `<port name>.schema.json`
    /// (`settings.schema.json`, `spectrum_scan.schema.json`, ...). Other
    /// files are skipped; a `.schema.json` file with an unrecognized name is
    /// an error, as is a symlinked schema.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        let listing = std::fs::read_dir(path).map_err(|err| load_failed(path, err))?;

        let mut loaded = 0usize;
        for entry in listing {
            let entry = entry.map_err(|err| load_failed(path, err))?;
            let Some(port) = schema_port(&entry)? else {
                continue;
            };

            loaded += 1;
            if loaded > config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "{}: more than {} schemas",
                    path.display(),
                    config.max_schemas_from_directory
                )));
            }

            let text = read_capped(&entry.path(), config.max_schema_file_size)?;
            debug!(port, file = %entry.path().display(), "loading schema");
            registry.register(port, &text)?;
        }

        Ok(registry)
    }

    /// Validate a JSON record against the schema of its port.
    pub fn validate(&self, port: u8, record: &Value) -> Result<()> {
        match self.validators.get(&port) {
            Some(validator) => validate_record(port, record, validator),
            None if self.config.fail_on_missing_schema => Err(SchemaError::NoSchema(port)),
            None => Ok(()),
        }
    }

    /// Check if a port has a registered schema.
    pub fn has_schema(&self, port: u8) -> bool {
        self.validators.contains_key(&port)
    }

    /// Ports that have registered schemas, ascending.
    pub fn ports(&self) -> Vec<u8> {
        let mut ports: Vec<u8> = self.validators.keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn load_failed(path: &Path, err: std::io::Error) -> SchemaError {
    SchemaError::LoadFailed(format!("{}: {err}", path.display()))
}

/// Port a directory entry holds a schema for, or `None` for entries to skip.
fn schema_port(entry: &DirEntry) -> Result<Option<u8>> {
    let name = entry.file_name().to_string_lossy().into_owned();
    let is_schema = name.to_ascii_lowercase().ends_with(SCHEMA_SUFFIX);
    let file_type = entry
        .file_type()
        .map_err(|err| load_failed(&entry.path(), err))?;

    if file_type.is_symlink() && is_schema {
        return Err(SchemaError::LoadFailed(format!("schema is a symlink: {name}")));
    }
    if !file_type.is_file() {
        return Ok(None);
    }

    match resolve_port_from_file_name(&name) {
        Some(port) => Ok(Some(port)),
        None if is_schema => Err(SchemaError::LoadFailed(format!(
            "schema file name names no port: {name}"
        ))),
        None => Ok(None),
    }
}

/// Read a schema file, refusing anything over `max_bytes`.
///
/// At most `max_bytes + 1` bytes are read. On unix the opened handle must be
/// the file that was listed.
fn read_capped(path: &Path, max_bytes: usize) -> Result<String> {
    let file = File::open(path).map_err(|err| load_failed(path, err))?;

    #[cfg(unix)]
    {
        let listed = std::fs::symlink_metadata(path).map_err(|err| load_failed(path, err))?;
        let opened = file.metadata().map_err(|err| load_failed(path, err))?;
        if !same_file_identity(&listed, &opened) {
            return Err(SchemaError::LoadFailed(format!(
                "{}: replaced while loading",
                path.display()
            )));
        }
    }

    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    let mut text = String::new();
    file.take(limit.saturating_add(1))
        .read_to_string(&mut text)
        .map_err(|err| load_failed(path, err))?;
    if text.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "{}: larger than {max_bytes} bytes",
            path.display()
        )));
    }

    Ok(text)
}

fn resolve_port_from_file_name(file_name: &str) -> Option<u8> {
    let lower = file_name.to_ascii_lowercase();
    let stem = lower.strip_suffix(SCHEMA_SUFFIX)?;

    match stem.strip_prefix(PORT_PREFIX) {
        Some(number) => number.parse::<u8>().ok(),
        None => port_from_name(stem),
    }
}

fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            recurse_object_schema_children(map);
        }
        Value::Array(items) => {
            for item in items {
                apply_strict_mode(item);
            }
        }
        _ => {}
    }
}

fn recurse_object_schema_children(map: &mut Map<String, Value>) {
    for key in ["properties", "patternProperties", "dependentSchemas", "$defs", "definitions"] {
        if let Some(Value::Object(obj)) = map.get_mut(key) {
            obj.values_mut().for_each(apply_strict_mode);
        }
    }

    for key in [
        "propertyNames",
        "additionalProperties",
        "unevaluatedProperties",
        "items",
        "contains",
        "not",
        "if",
        "then",
        "else",
    ] {
        if let Some(value) = map.get_mut(key) {
            apply_strict_mode(value);
        }
    }

    for key in ["prefixItems", "allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(items)) = map.get_mut(key) {
            items.iter_mut().for_each(apply_strict_mode);
        }
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(kind) if kind == "object")),
        _ => ["properties", "required", "additionalProperties", "propertyNames"]
            .iter()
            .any(|keyword| map.contains_key(*keyword)),
    }
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    const OBJECT_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string" }
        },
        "required": ["id", "name"]
    }"#;

    fn command(reset: bool) -> Value {
        json!({ "command": { "reset": reset } })
    }

    #[test]
    fn register_and_validate() {
        let mut registry = SchemaRegistry::new();
        registry.register(1, OBJECT_SCHEMA).unwrap();

        assert!(registry.validate(1, &json!({"id": 1, "name": "ok"})).is_ok());
        assert!(matches!(
            registry.validate(1, &json!({"id": "bad", "name": "ok"})),
            Err(SchemaError::ValidationFailed { port: 1, .. })
        ));
    }

    #[test]
    fn builtin_covers_downlink_ports() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(registry.ports(), vec![SETTINGS, SPECTRUM_SCAN, COMMAND]);
        assert!(!registry.has_schema(12));
    }

    #[test]
    fn builtin_command_requires_nested_record() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert!(registry.validate(COMMAND, &command(true)).is_ok());
        assert!(registry
            .validate(COMMAND, &json!({"command": {"lora_rejoin": 1}}))
            .is_ok());
        assert!(matches!(
            registry.validate(COMMAND, &json!({"reset": true})),
            Err(SchemaError::ValidationFailed { port: COMMAND, .. })
        ));
        assert!(registry
            .validate(COMMAND, &json!({"command": {"reset": "yes"}}))
            .is_err());
    }

    #[test]
    fn builtin_scan_requires_every_field() {
        let registry = SchemaRegistry::builtin().unwrap();
        let scan = json!({
            "freq_start": 863000000u32,
            "freq_stop": 870000000u32,
            "samples": 1000,
            "power": 14,
            "time": 10,
            "type": 1
        });
        assert!(registry.validate(SPECTRUM_SCAN, &scan).is_ok());

        let mut missing = scan.clone();
        missing.as_object_mut().unwrap().remove("type");
        assert!(registry.validate(SPECTRUM_SCAN, &missing).is_err());

        let mut text = scan;
        text["power"] = json!("14");
        assert!(registry.validate(SPECTRUM_SCAN, &text).is_err());
    }

    #[test]
    fn builtin_schemas_leave_ranges_to_the_encoder() {
        let registry = SchemaRegistry::builtin().unwrap();
        let scan = json!({
            "freq_start": 5_000_000_001u64,
            "freq_stop": -1,
            "samples": 0,
            "power": -10,
            "time": 70000,
            "type": 0
        });
        assert!(registry.validate(SPECTRUM_SCAN, &scan).is_ok());

        let settings = json!({
            "system_status_interval": -1,
            "system_functions": {},
            "lorawan_datarate_adr": { "datarate": 19, "adr": 1 },
            "gps_periodic_interval": 70000,
            "gps_triggered_interval": 0,
            "gps_triggered_threshold": 0,
            "gps_triggered_duration": 0,
            "gps_cold_fix_timeout": 0,
            "gps_hot_fix_timeout": 0,
            "gps_min_fix_time": 0,
            "gps_min_ehpe": 300,
            "gps_hot_fix_retry": 0,
            "gps_cold_fix_retry": 0,
            "gps_fail_retry": 0,
            "gps_settings": {},
            "system_voltage_interval": 0,
            "gps_charge_min": 100,
            "system_charge_min": 9000,
            "system_charge_max": 0,
            "system_input_charge_min": 0
        });
        assert!(registry.validate(SETTINGS, &settings).is_ok());

        let mut no_datarate = settings;
        no_datarate["lorawan_datarate_adr"]
            .as_object_mut()
            .unwrap()
            .remove("datarate");
        assert!(matches!(
            registry.validate(SETTINGS, &no_datarate),
            Err(SchemaError::ValidationFailed { port: SETTINGS, .. })
        ));
    }

    #[test]
    fn missing_schema_permissive_passes() {
        let registry = SchemaRegistry::new();
        assert!(registry.validate(99, &json!({"any": "thing"})).is_ok());
    }

    #[test]
    fn missing_schema_strict_fails() {
        let registry = SchemaRegistry::with_config(RegistryConfig {
            fail_on_missing_schema: true,
            ..RegistryConfig::default()
        });

        assert!(matches!(
            registry.validate(42, &json!({})),
            Err(SchemaError::NoSchema(42))
        ));
    }

    #[test]
    fn strict_mode_rejects_additional_properties() {
        let strict = SchemaRegistry::builtin_with_config(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        })
        .unwrap();
        let permissive = SchemaRegistry::builtin().unwrap();

        let extra = json!({"command": {"reset": true, "reboot": true}});
        assert!(permissive.validate(COMMAND, &extra).is_ok());
        assert!(matches!(
            strict.validate(COMMAND, &extra),
            Err(SchemaError::ValidationFailed { .. })
        ));
        assert!(strict.validate(COMMAND, &command(false)).is_ok());
    }

    #[test]
    fn strict_mode_applies_object_keywords_without_type() {
        let schema = r#"{
            "properties": {
                "id": { "type": "integer" }
            },
            "required": ["id"]
        }"#;

        let mut strict = SchemaRegistry::with_config(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        });
        strict.register(1, schema).unwrap();

        assert!(strict.validate(1, &json!({"id": 1})).is_ok());
        assert!(strict.validate(1, &json!({"id": 1, "extra": true})).is_err());
    }

    #[test]
    fn invalid_schema_fails_compile() {
        let mut registry = SchemaRegistry::new();
        let invalid = r#"{"type":"definitely-not-a-type"}"#;

        assert!(matches!(
            registry.register(1, invalid),
            Err(SchemaError::CompileFailed(_))
        ));
    }

    #[test]
    fn file_name_resolution() {
        assert_eq!(resolve_port_from_file_name("port_3.schema.json"), Some(3));
        assert_eq!(resolve_port_from_file_name("PORT_99.schema.json"), Some(99));
        assert_eq!(resolve_port_from_file_name("settings.schema.json"), Some(SETTINGS));
        assert_eq!(
            resolve_port_from_file_name("spectrum_scan.schema.json"),
            Some(SPECTRUM_SCAN)
        );
        assert_eq!(resolve_port_from_file_name("port_300.schema.json"), None);
        assert_eq!(resolve_port_from_file_name("foo.schema.json"), None);
        assert_eq!(resolve_port_from_file_name("command.json"), None);
    }

    #[test]
    fn from_directory_loads_and_validates() {
        let dir = make_temp_schema_dir("from-directory");

        write_schema(&dir, "port_1.schema.json", OBJECT_SCHEMA);
        write_schema(&dir, "command.schema.json", BUILTIN_SCHEMAS[2].1);
        write_schema(&dir, "notes.txt", "not a schema");

        let registry = SchemaRegistry::from_directory(&dir).unwrap();
        assert_eq!(registry.ports(), vec![1, COMMAND]);
        assert!(registry.validate(1, &json!({"id": 5, "name": "ok"})).is_ok());
        assert!(registry.validate(COMMAND, &json!({})).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_directory_unknown_schema_name_errors() {
        let dir = make_temp_schema_dir("unknown-name");
        write_schema(&dir, "foo.schema.json", OBJECT_SCHEMA);

        let result = SchemaRegistry::from_directory(&dir);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_directory_enforces_limits() {
        let dir = make_temp_schema_dir("limits");
        write_schema(&dir, "port_1.schema.json", OBJECT_SCHEMA);
        write_schema(&dir, "port_2.schema.json", OBJECT_SCHEMA);

        let too_many = SchemaRegistry::from_directory_with_config(
            &dir,
            RegistryConfig {
                max_schemas_from_directory: 1,
                ..RegistryConfig::default()
            },
        );
        assert!(matches!(too_many, Err(SchemaError::LoadFailed(_))));

        let too_large = SchemaRegistry::from_directory_with_config(
            &dir,
            RegistryConfig {
                max_schema_file_size: 16,
                ..RegistryConfig::default()
            },
        );
        assert!(matches!(too_large, Err(SchemaError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn from_directory_refuses_symlinks() {
        let dir = make_temp_schema_dir("symlink");
        let target = dir.join("real.json");
        std::fs::write(&target, OBJECT_SCHEMA).unwrap();
        std::os::unix::fs::symlink(&target, dir.join("port_1.schema.json")).unwrap();

        assert!(matches!(
            SchemaRegistry::from_directory(&dir),
            Err(SchemaError::LoadFailed(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = std::env::temp_dir().join("loracodec-schema-does-not-exist");
        assert!(matches!(
            SchemaRegistry::from_directory(&dir),
            Err(SchemaError::LoadFailed(_))
        ));
    }

    fn make_temp_schema_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "loracodec-schema-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_schema(dir: &Path, file_name: &str, contents: &str) {
        std::fs::write(dir.join(file_name), contents.as_bytes()).unwrap();
    }
}
