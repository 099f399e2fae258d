use serde::{Deserialize, Serialize};

use super::user::Role;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub owner_ids: Vec<String>,
    #[serde(default)]
    pub admin_ids: Vec<String>,
}

impl Venue {
    /// Whether this venue should appear on the management dashboard of the
    /// given user. Admins match on `adminIds`, everyone else on `ownerIds`.
    pub fn is_managed_by(&self, user_id: &str, role: Role) -> bool {
        match role {
            Role::Admin => self.admin_ids.iter().any(|id| id == user_id),
            _ => self.owner_ids.iter().any(|id| id == user_id),
        }
    }
}

/// Keep only the venues the user manages under the given role.
pub fn filter_managed_venues(venues: &[Venue], user_id: &str, role: Role) -> Vec<Venue> {
    venues
        .iter()
        .filter(|venue| venue.is_managed_by(user_id, role))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(id: &str, owner_ids: &[&str], admin_ids: &[&str]) -> Venue {
        Venue {
            id: id.to_string(),
            name: format!("Venue {}", id),
            address: "12 Shuttle Lane".to_string(),
            owner_ids: owner_ids.iter().map(|s| s.to_string()).collect(),
            admin_ids: admin_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn admin_sees_only_admin_venues() {
        let venues = vec![venue("v1", &["u1"], &[]), venue("v2", &[], &["u1"])];

        let filtered = filter_managed_venues(&venues, "u1", Role::Admin);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "v2");
    }

    #[test]
    fn owner_sees_only_owned_venues() {
        let venues = vec![venue("v1", &["u1"], &[]), venue("v2", &[], &["u1"])];

        let filtered = filter_managed_venues(&venues, "u1", Role::Owner);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "v1");
    }

    #[test]
    fn unrelated_user_sees_nothing() {
        let venues = vec![venue("v1", &["u1"], &[]), venue("v2", &[], &["u1"])];

        assert!(filter_managed_venues(&venues, "u2", Role::Owner).is_empty());
        assert!(filter_managed_venues(&venues, "u2", Role::Admin).is_empty());
    }

    #[test]
    fn venue_deserializes_from_wire_shape() {
        let json = r#"{
            "_id": "64fa",
            "name": "Smash Arena",
            "address": "1 Court St",
            "ownerIds": ["u1"],
            "adminIds": []
        }"#;

        let venue: Venue = serde_json::from_str(json).unwrap();
        assert_eq!(venue.id, "64fa");
        assert_eq!(venue.owner_ids, vec!["u1".to_string()]);
        assert!(venue.admin_ids.is_empty());
    }
}
