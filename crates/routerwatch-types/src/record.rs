//! The router record as stored in the remote document collection.
//!
//! A [`RouterRecord`] is an immutable capture of one router document at one
//! observation instant. Optional fields model document fields that may be
//! absent from the stored document (a half-filled registration form, an
//! older schema version). Wire names are camelCase to match the document
//! store's field naming.

use serde::{Deserialize, Serialize};

use crate::ids::{RouterId, UserId};

/// One router document / snapshot.
///
/// Two records with the same [`id`](Self::id) are comparable field by
/// field; the monitor's change detector consumes pairs of them. Credential
/// fields are carried for the registration UI and never processed by the
/// monitor beyond storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterRecord {
    /// Stable document identifier, assigned by the store on creation.
    pub id: RouterId,

    /// Display name. A record without a name is never diffed or notified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Network address of the router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Admin login user for the router itself. Never diffed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_user: Option<String>,

    /// Admin login secret for the router itself. Never diffed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_secret: Option<String>,

    /// Hardware model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Installed firmware version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,

    /// Reachability flag, absent until the first status probe writes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,

    /// Client devices currently associated with the router. Never diffed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connected_devices: Vec<String>,

    /// Owning user account; the store filters every query and subscription
    /// by this field.
    pub owner_id: UserId,
}

impl RouterRecord {
    /// Create an empty record owned by `owner` (all optional fields absent).
    pub const fn new(id: RouterId, owner_id: UserId) -> Self {
        Self {
            id,
            name: None,
            address: None,
            credential_user: None,
            credential_secret: None,
            model: None,
            firmware_version: None,
            online: None,
            connected_devices: Vec::new(),
            owner_id,
        }
    }
}
