/// Options for building a [`SchemaRegistry`](crate::SchemaRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Inject `additionalProperties: false` into every object schema, so a
    /// misspelt flag such as `lora_rejion` is an error instead of `false`.
    pub strict_mode: bool,
    /// Fail with `SchemaError::NoSchema` for ports that have no contract.
    pub fail_on_missing_schema: bool,
    /// Cap on `.schema.json` files accepted from one directory.
    pub max_schemas_from_directory: usize,
    /// Cap on the size of a single schema file, in bytes.
    pub max_schema_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            fail_on_missing_schema: false,
            max_schemas_from_directory: 64,
            max_schema_file_size: 64 * 1024,
        }
    }
}
