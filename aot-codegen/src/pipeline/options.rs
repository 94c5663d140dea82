//! Options read by the pipeline driver itself.

use aotgen_core::ConfigOption;

/// Namespace of driver-level options.
pub const NAMESPACE: &str = "aot";

/// Whether a build-time type without a resolvable location fails the run.
pub const STRICT_CLASSPATH: ConfigOption = ConfigOption::new(
    "aot.classpath.strict",
    "Fail the run when a type needed at build time has no resolvable location",
    "false",
);

/// Crate path generated code uses for runtime optimization slots.
pub const RUNTIME_CRATE: ConfigOption = ConfigOption::new(
    "aot.runtime.crate",
    "Crate providing the runtime optimization slots used by generated code",
    "aotgen_runtime",
);

/// All driver-level options.
pub const DRIVER_OPTIONS: &[ConfigOption] = &[STRICT_CLASSPATH, RUNTIME_CRATE];
