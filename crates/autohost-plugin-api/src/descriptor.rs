/// Static plugin metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Plugin version (e.g. "0.1")
    pub version: &'static str,
    /// Minimum host version this plugin is compatible with
    pub required_host_version: &'static str,
    /// Settings the host must load on the plugin's behalf
    pub params: ParamSchema,
}

impl PluginDescriptor {
    /// Descriptor for a plugin without configuration
    pub const fn new(version: &'static str, required_host_version: &'static str) -> Self {
        Self {
            version,
            required_host_version,
            params: ParamSchema::NONE,
        }
    }

    pub const fn with_params(mut self, params: ParamSchema) -> Self {
        self.params = params;
        self
    }
}

/// Declared configuration: host-wide settings and per-preset settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSchema {
    pub global: Option<&'static [ParamSpec]>,
    pub preset: Option<&'static [ParamSpec]>,
}

impl ParamSchema {
    pub const NONE: ParamSchema = ParamSchema {
        global: None,
        preset: None,
    };
}

/// A single declared setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    /// A value is valid if this is empty or any tag accepts it
    pub validators: &'static [ValidatorTag],
}

impl ParamSpec {
    pub const fn new(name: &'static str, validators: &'static [ValidatorTag]) -> Self {
        Self { name, validators }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.validators.is_empty() || self.validators.iter().any(|tag| tag.accepts(value))
    }
}

/// Value types a setting can be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorTag {
    /// Any non-empty value
    NotNull,
    /// A signed integer
    Integer,
    /// `lo-hi` with `lo <= hi`
    IntegerRange,
    /// `0` or `1`
    Bool,
}

impl ValidatorTag {
    pub fn name(&self) -> &'static str {
        match self {
            ValidatorTag::NotNull => "notNull",
            ValidatorTag::Integer => "integer",
            ValidatorTag::IntegerRange => "integerRange",
            ValidatorTag::Bool => "bool",
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ValidatorTag::NotNull => !value.is_empty(),
            ValidatorTag::Integer => value.parse::<i64>().is_ok(),
            ValidatorTag::IntegerRange => parse_integer_range(value).is_some(),
            ValidatorTag::Bool => value == "0" || value == "1",
        }
    }
}

/// Parse a non-negative `lo-hi` range
pub fn parse_integer_range(value: &str) -> Option<(u64, u64)> {
    let (lo, hi) = value.split_once('-')?;
    let lo = lo.parse::<u64>().ok()?;
    let hi = hi.parse::<u64>().ok()?;
    (lo <= hi).then_some((lo, hi))
}
