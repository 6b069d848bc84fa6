//! Provides application configuration options.
//!
//! Configuration options can be parsed from config files in TOML format.

pub mod camera;

use std::env;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

#[doc(inline)]
pub use self::camera::Camera;

/// CLI argument that is responsible for holding application configuration
/// file path.
static APP_CONF_PATH_CMD_ARG_NAME: &str = "--conf";

/// Environment variable that is responsible for holding application
/// configuration file path.
static APP_CONF_PATH_ENV_VAR_NAME: &str = "MEDEA_CAMERA_CONF";

/// Holds application config.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Conf {
    /// Camera access settings.
    pub camera: Camera,
}

impl Conf {
    /// Creates new [`Conf`] and applies values from the following sources
    /// (in the following order):
    /// - default values;
    /// - configuration file, the name of which is given as a command line
    ///   parameter or environment variable;
    /// - environment variables.
    ///
    /// # Errors
    ///
    /// Errors if parsing fails.
    pub fn parse() -> Result<Self, ConfigError> {
        let mut cfg = Config::builder()
            .add_source(Config::try_from(&Self::default())?);

        if let Some(path) = get_conf_file_name(
            env::var(APP_CONF_PATH_ENV_VAR_NAME),
            env::args(),
        ) {
            cfg = cfg.add_source(File::new(&path, FileFormat::Toml));
        }

        cfg.add_source(
            Environment::with_prefix("MEDEA")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
    }
}

/// Returns the path to a configuration file, if it's set via CLI `args`
/// or environment variables.
fn get_conf_file_name<T>(
    env_var: Result<String, env::VarError>,
    cmd_args: T,
) -> Option<String>
where
    T: Iterator<Item = String>,
{
    // First, check CLI arguments as they have the highest priority.
    let mut args = cmd_args.skip_while(|a| a != APP_CONF_PATH_CMD_ARG_NAME);
    if args.next().is_some() {
        return args.next().filter(|v| !v.is_empty());
    }

    // Then check env var.
    env_var.ok().filter(|v| !v.is_empty())
}
