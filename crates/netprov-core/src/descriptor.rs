// ── Provisioning descriptor ──
//
// The per-run inputs: which VLAN goes on which switchport, and which
// client MAC joins which endpoint group. Parsed from JSON; the CLI reads
// the file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Six-octet hardware address, upper-case and colon separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Parse colon-, dash-, or dot-separated forms, or bare hex.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let hex: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::Descriptor {
                message: format!("`{raw}` is not a MAC address"),
            });
        }

        let upper = hex.to_ascii_uppercase();
        let octets: Vec<&str> = (0..6).map(|i| &upper[i * 2..i * 2 + 2]).collect();
        Ok(Self(octets.join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

/// Inputs for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionDescriptor {
    /// VLAN id, 1..=4094.
    pub vlan: u16,
    /// Target switch hostname as known to the intent controller.
    pub switch_name: String,
    /// Interface the VLAN is applied to, e.g. `GigabitEthernet1/0/6`.
    pub switchport: String,
    /// Endpoint group name on the policy controller.
    pub endpoint_group: String,
    pub mac_address: MacAddress,
}

impl ProvisionDescriptor {
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let descriptor: Self = serde_json::from_str(text).map_err(|e| CoreError::Descriptor {
            message: e.to_string(),
        })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=4094).contains(&self.vlan) {
            return Err(CoreError::Descriptor {
                message: format!("vlan {} is outside 1..=4094", self.vlan),
            });
        }
        for (field, value) in [
            ("switchName", &self.switch_name),
            ("switchport", &self.switchport),
            ("endpointGroup", &self.endpoint_group),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Descriptor {
                    message: format!("`{field}` must not be empty"),
                });
            }
        }
        Ok(())
    }
}
