//! Cisco IOS / IOS-XE platform definition.
//!
//! ```text
//! router>                 # user exec
//! router#                 # privileged exec
//! router(config-if)#      # configuration (never entered by a sweep)
//! ```
//!
//! `show ip interface brief` works from either exec level, so the session
//! stays wherever the login lands.

use crate::platform::PlatformDefinition;

/// Dialect tag for this platform.
pub const NAME: &str = "cisco_ios";

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(NAME, r"(?m)^[\w.\-@/:]{1,63}(\(config[\w.\-@/:+]{0,32}\))?[>#]\s*$")
        .expect("built-in prompt pattern is valid")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cisco_platform() {
        let platform = platform();
        assert_eq!(platform.name, "cisco_ios");
        assert_eq!(
            platform.on_open_commands,
            vec!["terminal length 0", "terminal width 511"]
        );
    }

    #[test]
    fn test_prompt_match() {
        let platform = platform();
        let prompt = &platform.prompt_pattern;
        assert!(prompt.is_match(b"router>"));
        assert!(prompt.is_match(b"router#"));
        assert!(prompt.is_match(b"core-sw1.lab# "));
        assert!(prompt.is_match(b"router(config-if)#"));
        assert!(prompt.is_match(b"output line\r\nrouter#"));
        assert!(!prompt.is_match(b"Gi0/0  10.0.0.1  YES NVRAM  up  up"));
        assert!(!prompt.is_match(b"Password:"));
    }

    #[test]
    fn test_failed_when_contains() {
        let platform = platform();
        assert!(
            platform
                .failed_when_contains
                .contains(&"% Invalid input".to_string())
        );
    }
}
