use anyhow::Result;

/// Trait for building configuration structs
///
/// Implementors read the process environment (after `.env` has been loaded)
/// and produce a fully validated value. The value is then passed around
/// explicitly; nothing caches it globally.
pub trait ConfigBuilder: Clone + Send + Sync + 'static {
    /// Build the configuration instance
    fn build() -> Result<Self>;
}
