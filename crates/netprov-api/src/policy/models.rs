// Policy controller request and response types
//
// ERS wraps every resource in a single-key object named after its type
// (`EndPointGroup`, `ERSEndPoint`).

use serde::{Deserialize, Serialize};

/// Body of `GET /ers/config/endpointgroup/name/{name}`.
#[derive(Debug, Deserialize)]
pub(crate) struct EndpointGroupEnvelope {
    #[serde(rename = "EndPointGroup")]
    pub group: EndpointGroup,
}

/// A named access-control group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub system_defined: Option<bool>,
}

/// `{"ERSEndPoint": ...}` wrapper, used both ways.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EndpointEnvelope<T> {
    #[serde(rename = "ERSEndPoint")]
    pub endpoint: T,
}

/// An endpoint record, keyed by hardware address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub static_profile_assignment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub static_group_assignment: bool,
}
