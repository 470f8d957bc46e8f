//! Environment layer: `DESKFS__SECTION__KEY`, e.g. `DESKFS__STORAGE__BACKEND=memory`.

use config::Environment;

pub const ENV_PREFIX: &str = "DESKFS";

pub fn source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
