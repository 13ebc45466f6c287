//! Centralized configuration for boardkit core.
//!
//! Constants for instance allocation, directory layout and the outbound
//! user agent.

/// Instance registry configuration.
pub struct InstanceConfig;

impl InstanceConfig {
    /// First ID handed out by a fresh registry. `0` is the unset handle.
    pub const FIRST_INSTANCE_ID: i32 = 1;
    /// Scratch directory created under the data directory of each instance.
    pub const TEMP_DIR_NAME: &'static str = "tmp";
}

/// Outbound identification for the package manager.
pub struct UserAgentConfig;

impl UserAgentConfig {
    pub const PRODUCT: &'static str = "boardkit";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Build `"<product>/<version>"` followed by each extra tag.
    pub fn user_agent<S: AsRef<str>>(extra: &[S]) -> String {
        let mut user_agent = format!("{}/{}", Self::PRODUCT, Self::VERSION);
        for tag in extra {
            user_agent.push(' ');
            user_agent.push_str(tag.as_ref());
        }
        user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_without_extras() {
        let ua = UserAgentConfig::user_agent::<&str>(&[]);
        assert_eq!(ua, format!("boardkit/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_user_agent_appends_extras_in_order() {
        let ua = UserAgentConfig::user_agent(&["daemon", "grpc/1.2"]);
        assert!(ua.starts_with("boardkit/"));
        assert!(ua.ends_with(" daemon grpc/1.2"));
    }

    #[test]
    fn test_first_id_is_positive() {
        assert!(InstanceConfig::FIRST_INSTANCE_ID > 0);
    }
}
