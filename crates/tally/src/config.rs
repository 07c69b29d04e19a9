//! Configuration for an [`Aggregator`](crate::Aggregator).
//!
//! [`AggregatorConfig`] implements [`serde::Deserialize`] so the autoraise
//! switch can be loaded from external sources. The catch filter holds code
//! and is always set programmatically through
//! [`with_catch`](AggregatorConfig::with_catch).
//!
//! # Example
//!
//! ```
//! # use std::io;
//! # use tally::{CatchKinds, config::AggregatorConfig};
//! let config = AggregatorConfig::default();
//! assert!(!config.autoraise());
//! assert!(config.catch().catches_all());
//!
//! let config = AggregatorConfig::new(true).with_catch(CatchKinds::only::<io::Error>());
//! assert!(config.autoraise());
//! assert!(!config.catch().catches_all());
//! ```

use serde::Deserialize;

use crate::catch::CatchKinds;

/// Settings fixed for the lifetime of one aggregator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregatorConfig {
    /// Surface the accumulated tree on every recorded failure.
    #[serde(default)]
    autoraise: bool,

    /// Failure kinds intercepted by checked bodies.
    #[serde(skip)]
    catch: CatchKinds,
}

impl AggregatorConfig {
    /// Creates a new [`AggregatorConfig`] that catches every failure kind.
    ///
    /// # Arguments
    ///
    /// * `autoraise` - Return the accumulated tree as an error from every
    ///   recording operation. This turns the aggregator into fail-fast mode
    ///   that still reports everything recorded so far.
    pub fn new(autoraise: bool) -> Self {
        Self {
            autoraise,
            catch: CatchKinds::all(),
        }
    }

    /// Replace the catch filter.
    pub fn with_catch(mut self, catch: CatchKinds) -> Self {
        self.catch = catch;
        self
    }

    /// Returns whether autoraise mode is enabled.
    pub fn autoraise(&self) -> bool {
        self.autoraise
    }

    /// Returns the catch filter.
    pub fn catch(&self) -> &CatchKinds {
        &self.catch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_autoraise() {
        let config: AggregatorConfig = toml::from_str("autoraise = true").unwrap();

        assert!(config.autoraise());
        assert!(config.catch().catches_all());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: AggregatorConfig = toml::from_str("").unwrap();

        assert!(!config.autoraise());
        assert!(config.catch().catches_all());
    }

    #[test]
    fn test_deserialize_nested_section() {
        #[derive(Deserialize)]
        struct Settings {
            aggregator: AggregatorConfig,
        }

        let settings: Settings = toml::from_str("[aggregator]\nautoraise = false\n").unwrap();
        assert!(!settings.aggregator.autoraise());
    }

    #[test]
    fn test_with_catch_keeps_autoraise() {
        let config = AggregatorConfig::new(true).with_catch(CatchKinds::only::<std::fmt::Error>());

        assert!(config.autoraise());
        assert!(!config.catch().catches_all());
    }
}
