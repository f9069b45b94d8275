// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Switchyard model router.
//!
//! TOML files layered over compiled defaults, `SWITCHYARD_*` environment
//! overrides, strict unknown-key rejection, and miette diagnostics with typo
//! suggestions.
//!
//! ```no_run
//! use switchyard_config::{load_and_validate, render_errors};
//!
//! match load_and_validate() {
//!     Ok(config) => println!("ceiling: {}", config.routing.cost_ceiling_usd),
//!     Err(errors) => render_errors(&errors),
//! }
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SwitchyardConfig;

/// Load from the standard hierarchy and validate.
pub fn load_and_validate() -> Result<SwitchyardConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load from an explicit file (plus env overrides) and validate.
pub fn load_and_validate_path(path: &Path) -> Result<SwitchyardConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load from a TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<SwitchyardConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<SwitchyardConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<diagnostic::TomlSource>,
) -> Result<SwitchyardConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every config file that exists, for diagnostic spans.
fn collect_toml_sources() -> Vec<diagnostic::TomlSource> {
    let mut paths = vec![std::path::PathBuf::from(loader::SYSTEM_CONFIG_PATH)];
    paths.extend(loader::user_config_path());
    paths.push(
        std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_PATH))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.into()),
    );

    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
