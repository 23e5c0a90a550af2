//! Platform definition for dialect-specific session handling.

use memchr::{memchr, memrchr};
use regex::bytes::Regex;

use crate::error::PlatformError;

/// Everything the SSH driver needs to know about one CLI dialect.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Dialect tag (e.g., "cisco_ios").
    pub name: String,

    /// Pattern matching any prompt the session may sit at.
    pub prompt_pattern: Regex,

    /// Output fragments that mean the device rejected the command.
    pub failed_when_contains: Vec<String>,

    /// Commands to run when the session is established (paging, width).
    pub on_open_commands: Vec<String>,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a new platform definition from a name and prompt regex.
    pub fn new(name: impl Into<String>, prompt_pattern: &str) -> Result<Self, PlatformError> {
        let name = name.into();
        let prompt_pattern =
            Regex::new(prompt_pattern).map_err(|e| PlatformError::InvalidDefinition {
                name: name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name,
            prompt_pattern,
            failed_when_contains: vec![],
            on_open_commands: vec![],
            terminal_width: 511,
            terminal_height: 24,
        })
    }

    /// Copy this definition under another dialect tag.
    pub fn aliased(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Strip the command echo and the trailing prompt line from raw output,
    /// and normalize line endings.
    pub fn normalize_output(&self, raw: &[u8], command: &str) -> String {
        let mut body = raw;

        // Echo: first line, if it ends with the command we sent
        if let Some(eol) = memchr(b'\n', body) {
            let first = String::from_utf8_lossy(&body[..eol]);
            if first.trim_end().ends_with(command.trim()) {
                body = &body[eol + 1..];
            }
        }

        // Prompt: last line, if it matches the prompt pattern
        let last_start = memrchr(b'\n', body).map_or(0, |i| i + 1);
        if self.prompt_pattern.is_match(&body[last_start..]) {
            body = &body[..last_start];
        }

        String::from_utf8_lossy(body)
            .replace("\r\n", "\n")
            .replace('\r', "")
            .trim_end_matches('\n')
            .to_string()
    }

    /// Return the first failure pattern found in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> PlatformDefinition {
        PlatformDefinition::new("test", r"(?m)^[\w.\-]{1,63}[>#]\s*$")
            .unwrap()
            .with_failure_pattern("% Invalid input")
    }

    #[test]
    fn test_normalize_strips_echo_and_prompt() {
        let raw = b"show ip interface brief\r\nInterface  IP-Address\r\nGi0/0  10.0.0.1\r\nrouter#";
        let out = platform().normalize_output(raw, "show ip interface brief");
        assert_eq!(out, "Interface  IP-Address\nGi0/0  10.0.0.1");
    }

    #[test]
    fn test_invalid_prompt_pattern() {
        let err = PlatformDefinition::new("broken", r"[>#").unwrap_err();
        assert!(matches!(
            err,
            PlatformError::InvalidDefinition { ref name, .. } if name == "broken"
        ));
    }

    #[test]
    fn test_normalize_without_echo() {
        let raw = b"Gi0/0  10.0.0.1\nrouter>";
        let out = platform().normalize_output(raw, "show ip interface brief");
        assert_eq!(out, "Gi0/0  10.0.0.1");
    }

    #[test]
    fn test_normalize_keeps_non_prompt_last_line() {
        let raw = b"show clock\n*10:00:00.000 UTC Mon Oct 19 2026";
        let out = platform().normalize_output(raw, "show clock");
        assert_eq!(out, "*10:00:00.000 UTC Mon Oct 19 2026");
    }

    #[test]
    fn test_detect_failure() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("% Invalid input detected at '^' marker."),
            Some("% Invalid input")
        );
        assert_eq!(platform.detect_failure("Gi0/0 up up"), None);
    }

    #[test]
    fn test_aliased() {
        let alias = platform().aliased("other");
        assert_eq!(alias.name, "other");
        assert_eq!(alias.failed_when_contains.len(), 1);
    }
}
