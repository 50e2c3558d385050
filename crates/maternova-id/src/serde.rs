use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
    ser::SerializeMap,
};

use crate::{CounterSnapshot, PatientId, Role};

/// Identifiers travel as their six character text form. A bare number would
/// drop the leading zero of ASHA identifiers.
impl Serialize for PatientId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PatientId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct PatientIdVisitor;

        impl Visitor<'_> for PatientIdVisitor {
            type Value = PatientId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a six digit patient identifier")
            }

            #[inline]
            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                PatientId::parse(v).map_err(|reason| {
                    de::Error::custom(format_args!("invalid patient identifier {v:?}: {reason}"))
                })
            }
        }

        d.deserialize_str(PatientIdVisitor)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// Unrecognised labels deserialize to [`Role::Unknown`], matching how
/// generation treats them.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct RoleVisitor;

        impl Visitor<'_> for RoleVisitor {
            type Value = Role;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a role label")
            }

            #[inline]
            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Role::from_label(v))
            }
        }

        d.deserialize_str(RoleVisitor)
    }
}

impl Serialize for CounterSnapshot {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(Role::COUNT))?;
        for (role, value) in self.iter() {
            map.serialize_entry(role.as_str(), &value)?;
        }
        map.end()
    }
}
