//! Field-level change detection between two observations of one router.
//!
//! [`detect_changes`] is a pure function from a (previous, current) snapshot
//! pair to an ordered [`ChangeDescription`]. The field order is fixed and
//! determines the order of lines in the notification body: name, model,
//! firmware, address, online.
//!
//! # Policy
//!
//! - A current snapshot without a name is never diffed: the whole
//!   description is suppressed, regardless of other field differences.
//! - The name comparison is unconditional on the previous side: a record
//!   that gains a name after having none reports a name change.
//! - Every other field reports a change only when the *current* value is
//!   present and differs from the previous one; an absent previous value
//!   still counts as different. An absent current value is skipped, not an
//!   error.

use core::fmt;

use routerwatch_types::RouterRecord;

/// Placeholder rendered for a previous value that was absent.
const ABSENT: &str = "unknown";

/// One detected field-level difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    /// The display name changed.
    Name {
        /// Previous name, if the record had one.
        previous: Option<String>,
        /// Current name.
        current: String,
    },
    /// The hardware model changed.
    Model {
        /// Previous model, if present.
        previous: Option<String>,
        /// Current model.
        current: String,
    },
    /// The firmware version changed.
    Firmware {
        /// Previous firmware version, if present.
        previous: Option<String>,
        /// Current firmware version.
        current: String,
    },
    /// The network address changed.
    Address {
        /// Previous address, if present.
        previous: Option<String>,
        /// Current address.
        current: String,
    },
    /// The reachability flag flipped.
    Online {
        /// Current reachability.
        current: bool,
    },
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn line(
            f: &mut fmt::Formatter<'_>,
            label: &str,
            previous: Option<&str>,
            current: &str,
        ) -> fmt::Result {
            let previous = previous.unwrap_or(ABSENT);
            write!(f, "{label} changed from {previous} to {current}")
        }

        match self {
            Self::Name { previous, current } => line(f, "Name", previous.as_deref(), current),
            Self::Model { previous, current } => line(f, "Model", previous.as_deref(), current),
            Self::Firmware { previous, current } => {
                line(f, "Firmware", previous.as_deref(), current)
            }
            Self::Address { previous, current } => {
                line(f, "Address", previous.as_deref(), current)
            }
            Self::Online { current: true } => write!(f, "became Online"),
            Self::Online { current: false } => write!(f, "became Offline"),
        }
    }
}

/// Ordered list of field-level differences between two snapshots.
///
/// An empty description means "no notification". `Display` joins the lines
/// with `\n`, ready to be used as a notification body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDescription {
    changes: Vec<FieldChange>,
}

impl ChangeDescription {
    /// Whether no field was flagged.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of flagged fields.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The flagged fields, in detection order.
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    fn push(&mut self, change: FieldChange) {
        self.changes.push(change);
    }
}

impl fmt::Display for ChangeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, change) in self.changes.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{change}")?;
        }
        Ok(())
    }
}

/// Diff two snapshots of the same router.
///
/// `previous` is the monitor's stored snapshot, `current` the incoming
/// observation. Returns the ordered description of flagged fields; empty
/// when nothing changed or when `current` has no name.
pub fn detect_changes(previous: &RouterRecord, current: &RouterRecord) -> ChangeDescription {
    let mut description = ChangeDescription::default();

    // A record without a name is never diffed or notified.
    let Some(current_name) = current.name.as_ref() else {
        return description;
    };

    // Name is compared unconditionally, even against an absent previous.
    if previous.name.as_ref() != Some(current_name) {
        description.push(FieldChange::Name {
            previous: previous.name.clone(),
            current: current_name.clone(),
        });
    }

    if let Some((previous, current)) = scalar_change(&previous.model, &current.model) {
        description.push(FieldChange::Model { previous, current });
    }

    if let Some((previous, current)) =
        scalar_change(&previous.firmware_version, &current.firmware_version)
    {
        description.push(FieldChange::Firmware { previous, current });
    }

    if let Some((previous, current)) = scalar_change(&previous.address, &current.address) {
        description.push(FieldChange::Address { previous, current });
    }

    if let Some(current) = current.online {
        if previous.online != Some(current) {
            description.push(FieldChange::Online { current });
        }
    }

    description
}

/// Change rule for every scalar field other than name: flagged only when
/// the current value is present and differs from the previous one.
fn scalar_change(
    previous: &Option<String>,
    current: &Option<String>,
) -> Option<(Option<String>, String)> {
    let current = current.as_ref()?;
    if previous.as_ref() == Some(current) {
        return None;
    }
    Some((previous.clone(), current.clone()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use routerwatch_types::{RouterId, UserId};

    use super::*;

    fn record(name: Option<&str>) -> RouterRecord {
        RouterRecord {
            name: name.map(str::to_owned),
            ..RouterRecord::new(RouterId::from("r-1"), UserId::from("u-1"))
        }
    }

    #[test]
    fn identical_snapshots_produce_empty_description() {
        let snapshot = RouterRecord {
            address: Some("10.0.0.1".to_owned()),
            model: Some("AX-3000".to_owned()),
            firmware_version: Some("1.2.3".to_owned()),
            online: Some(true),
            ..record(Some("R1"))
        };
        assert!(detect_changes(&snapshot, &snapshot.clone()).is_empty());
    }

    #[test]
    fn absent_current_name_suppresses_everything() {
        let previous = RouterRecord {
            model: Some("A".to_owned()),
            online: Some(false),
            ..record(Some("R1"))
        };
        let current = RouterRecord {
            model: Some("B".to_owned()),
            online: Some(true),
            ..record(None)
        };
        assert!(detect_changes(&previous, &current).is_empty());
    }

    #[test]
    fn model_and_online_change_render_in_order() {
        let previous = RouterRecord {
            model: Some("A".to_owned()),
            online: Some(false),
            ..record(Some("R1"))
        };
        let current = RouterRecord {
            model: Some("B".to_owned()),
            online: Some(true),
            ..record(Some("R1"))
        };

        let description = detect_changes(&previous, &current);
        assert_eq!(description.len(), 2);
        assert_eq!(
            description.to_string(),
            "Model changed from A to B\nbecame Online"
        );
    }

    #[test]
    fn name_gained_after_absence_is_reported() {
        let previous = record(None);
        let current = record(Some("R1"));

        let description = detect_changes(&previous, &current);
        assert_eq!(
            description.changes(),
            &[FieldChange::Name {
                previous: None,
                current: "R1".to_owned(),
            }]
        );
        assert_eq!(description.to_string(), "Name changed from unknown to R1");
    }

    #[test]
    fn absent_previous_scalar_counts_as_different() {
        let previous = record(Some("R1"));
        let current = RouterRecord {
            firmware_version: Some("2.0.0".to_owned()),
            ..record(Some("R1"))
        };

        let description = detect_changes(&previous, &current);
        assert_eq!(
            description.to_string(),
            "Firmware changed from unknown to 2.0.0"
        );
    }

    #[test]
    fn absent_current_scalar_is_skipped() {
        let previous = RouterRecord {
            model: Some("A".to_owned()),
            address: Some("10.0.0.1".to_owned()),
            ..record(Some("R1"))
        };
        let current = record(Some("R1"));

        assert!(detect_changes(&previous, &current).is_empty());
    }

    #[test]
    fn going_offline_renders_became_offline() {
        let previous = RouterRecord {
            online: Some(true),
            ..record(Some("R1"))
        };
        let current = RouterRecord {
            online: Some(false),
            ..record(Some("R1"))
        };

        assert_eq!(detect_changes(&previous, &current).to_string(), "became Offline");
    }

    #[test]
    fn all_fields_flag_in_fixed_order() {
        let previous = RouterRecord {
            address: Some("10.0.0.1".to_owned()),
            model: Some("A".to_owned()),
            firmware_version: Some("1.0".to_owned()),
            online: Some(false),
            ..record(Some("Old"))
        };
        let current = RouterRecord {
            address: Some("10.0.0.2".to_owned()),
            model: Some("B".to_owned()),
            firmware_version: Some("2.0".to_owned()),
            online: Some(true),
            ..record(Some("New"))
        };

        let description = detect_changes(&previous, &current);
        assert_eq!(
            description.to_string(),
            "Name changed from Old to New\n\
             Model changed from A to B\n\
             Firmware changed from 1.0 to 2.0\n\
             Address changed from 10.0.0.1 to 10.0.0.2\n\
             became Online"
        );
    }

    #[test]
    fn credential_and_device_fields_are_never_diffed() {
        let previous = RouterRecord {
            credential_user: Some("admin".to_owned()),
            credential_secret: Some("old".to_owned()),
            connected_devices: vec!["laptop".to_owned()],
            ..record(Some("R1"))
        };
        let current = RouterRecord {
            credential_user: Some("root".to_owned()),
            credential_secret: Some("new".to_owned()),
            connected_devices: vec!["phone".to_owned(), "tv".to_owned()],
            ..record(Some("R1"))
        };

        assert!(detect_changes(&previous, &current).is_empty());
    }
}
