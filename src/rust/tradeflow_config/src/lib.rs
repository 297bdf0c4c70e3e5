//! Manages the `/etc/tradeflow.conf` file, used by the trade-flow
//! map tools to find their data and tune the generated geometry.

mod etc;

pub use etc::{
    load_config, Config, ConfigError, CurveTuning, StyleTuning, CONFIG_ENV_VAR,
    DEFAULT_CONFIG_PATH,
};
