//! Parser for `show ip interface brief` style tabular output.
//!
//! ```text
//! Interface              IP-Address      OK? Method Status                Protocol
//! GigabitEthernet0/0     10.1.1.1        YES NVRAM  up                    up
//! GigabitEthernet0/1     unassigned      YES unset  administratively down down
//! ```
//!
//! Device CLI output is not a guaranteed grammar. Lines that do not fit the
//! expected shape are dropped, never guessed at, and never abort the parse.

use std::fmt;

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

/// Token that marks the column header line.
const HEADER_TOKEN: &str = "Interface";

/// IP column placeholder for interfaces without an address.
const UNASSIGNED: &str = "unassigned";

/// First word of the two-word "administratively down" status.
const ADMINISTRATIVELY: &str = "administratively";

/// Minimum number of whitespace-separated columns on a data line.
const MIN_COLUMNS: usize = 6;

/// Link (status column) state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Up,
    Down,
    AdminDown,
}

impl LinkStatus {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::AdminDown => write!(f, "admin_down"),
        }
    }
}

/// Line-protocol state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolStatus {
    Up,
    Down,
}

impl ProtocolStatus {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

impl fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// An interface as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedInterface {
    pub name: String,
    pub ip: Option<String>,
    pub link_status: LinkStatus,
    pub protocol_status: ProtocolStatus,
}

impl ObservedInterface {
    pub fn new(
        name: impl Into<String>,
        ip: Option<String>,
        link_status: LinkStatus,
        protocol_status: ProtocolStatus,
    ) -> Self {
        Self {
            name: name.into(),
            ip,
            link_status,
            protocol_status,
        }
    }

    /// Both link and line protocol are up.
    pub fn is_up(&self) -> bool {
        self.link_status == LinkStatus::Up && self.protocol_status == ProtocolStatus::Up
    }
}

/// Observed interfaces keyed by name, in the order the device listed them.
pub type ObservedInterfaces = IndexMap<String, ObservedInterface>;

/// Parse interface status output into a name-keyed map.
///
/// Never fails: empty or unrecognizable input yields an empty map. A later
/// line for an already-seen name replaces the earlier record.
pub fn parse_interface_status(raw: &str) -> ObservedInterfaces {
    let mut interfaces = ObservedInterfaces::new();

    for line in raw.lines() {
        if line.trim().is_empty() || line.contains(HEADER_TOKEN) {
            continue;
        }

        match parse_line(line) {
            Some(interface) => {
                interfaces.insert(interface.name.clone(), interface);
            }
            None => trace!("dropping unparseable interface line: {:?}", line),
        }
    }

    interfaces
}

/// Parse one data line. `None` means the line does not fit the table shape.
fn parse_line(line: &str) -> Option<ObservedInterface> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_COLUMNS {
        return None;
    }

    let name = tokens[0];
    let ip = match tokens[1] {
        UNASSIGNED => None,
        addr => Some(addr.to_string()),
    };

    // "administratively down" spans two columns and shifts protocol right.
    let (link_status, protocol_token) = if tokens[4].eq_ignore_ascii_case(ADMINISTRATIVELY) {
        let protocol = tokens.get(6)?;
        (LinkStatus::AdminDown, *protocol)
    } else {
        (LinkStatus::from_token(tokens[4])?, tokens[5])
    };

    let protocol_status = ProtocolStatus::from_token(protocol_token)?;

    Some(ObservedInterface::new(name, ip, link_status, protocol_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     10.1.1.1        YES NVRAM  up                    up
GigabitEthernet0/1     unassigned      YES unset  administratively down down
GigabitEthernet0/2     10.1.2.1        YES manual down                  down
Loopback0              192.0.2.1       YES manual up                    up
";

    #[test]
    fn test_parse_sample() {
        let parsed = parse_interface_status(SAMPLE);
        assert_eq!(parsed.len(), 4);

        let gi0 = &parsed["GigabitEthernet0/0"];
        assert_eq!(gi0.ip.as_deref(), Some("10.1.1.1"));
        assert_eq!(gi0.link_status, LinkStatus::Up);
        assert_eq!(gi0.protocol_status, ProtocolStatus::Up);
        assert!(gi0.is_up());

        let gi2 = &parsed["GigabitEthernet0/2"];
        assert_eq!(gi2.link_status, LinkStatus::Down);
        assert!(!gi2.is_up());

        // Device order is kept
        let names: Vec<&str> = parsed.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "GigabitEthernet0/0",
                "GigabitEthernet0/1",
                "GigabitEthernet0/2",
                "Loopback0"
            ]
        );
    }

    #[test]
    fn test_admin_down() {
        let parsed = parse_interface_status(
            "GigabitEthernet0/1  unassigned  YES  unset  administratively down  down",
        );
        assert_eq!(
            parsed["GigabitEthernet0/1"],
            ObservedInterface::new(
                "GigabitEthernet0/1",
                None,
                LinkStatus::AdminDown,
                ProtocolStatus::Down
            )
        );
    }

    #[test]
    fn test_admin_down_case_insensitive() {
        let parsed =
            parse_interface_status("Gi0/3  unassigned  YES  unset  Administratively Down  DOWN");
        assert_eq!(parsed["Gi0/3"].link_status, LinkStatus::AdminDown);
        assert_eq!(parsed["Gi0/3"].protocol_status, ProtocolStatus::Down);
    }

    #[test]
    fn test_status_is_lowercased() {
        let parsed = parse_interface_status("Vlan1  10.0.0.1  YES  NVRAM  UP  Up");
        assert!(parsed["Vlan1"].is_up());
    }

    #[test]
    fn test_malformed_line_dropped() {
        let raw = "GigabitEthernet0/0  10.1.1.1  YES  NVRAM  up  up\nfoo bar baz\n";
        let parsed = parse_interface_status(raw);
        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains_key("GigabitEthernet0/0"));
    }

    #[test]
    fn test_malformed_line_does_not_stop_parsing() {
        let raw = "garbage\nGi0/0 unassigned YES unset up up\n";
        let parsed = parse_interface_status(raw);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["Gi0/0"].ip, None);
    }

    #[test]
    fn test_truncated_admin_down_dropped() {
        // Six tokens, but the status column is split and protocol is missing
        let parsed = parse_interface_status("Gi0/4 unassigned YES unset administratively down");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_unknown_status_dropped() {
        let parsed = parse_interface_status("Tunnel0 unassigned YES unset deleted down");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let raw = "Gi0/0 10.0.0.1 YES NVRAM up up\nGi0/0 10.0.0.2 YES NVRAM down down\n";
        let parsed = parse_interface_status(raw);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["Gi0/0"].ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(parsed["Gi0/0"].link_status, LinkStatus::Down);
    }

    #[test]
    fn test_empty_and_error_output() {
        assert!(parse_interface_status("").is_empty());
        assert!(parse_interface_status("\n\n   \n").is_empty());
        assert!(
            parse_interface_status("% Invalid input detected at '^' marker.").is_empty()
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(parse_interface_status(SAMPLE), parse_interface_status(SAMPLE));
    }
}
