//! Reservation Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the organisers stand with a reservant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContactState {
    #[default]
    #[serde(rename = "pas_contacte")]
    NotContacted,
    #[serde(rename = "contacte")]
    Contacted,
    #[serde(rename = "en_discussion")]
    InDiscussion,
    #[serde(rename = "reserve")]
    Reserved,
    #[serde(rename = "liste_jeux_demandee")]
    GameListRequested,
    #[serde(rename = "liste_jeux_obtenue")]
    GameListReceived,
    #[serde(rename = "jeux_recus")]
    GamesReceived,
}

/// Whether the reservant is expected on site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PresenceState {
    #[default]
    #[serde(rename = "non_defini")]
    Undefined,
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "considere_absent")]
    ConsideredAbsent,
    #[serde(rename = "absent")]
    Absent,
}

/// One reservant's booking at one festival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub festival_id: i64,
    /// External organisation id
    pub reservant_id: i64,
    pub contact_state: ContactState,
    pub presence_state: PresenceState,
    /// Electrical outlets requested
    pub outlet_count: u32,
    /// Discount expressed in table equivalents
    pub table_discount: Decimal,
    /// Flat currency discount
    pub amount_discount: Decimal,
    pub notes: Option<String>,
    pub will_animate: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Table count requested from one tariff zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentRequest {
    pub tariff_zone_id: i64,
    pub table_count: u32,
}

impl CommitmentRequest {
    pub fn new(tariff_zone_id: i64, table_count: u32) -> Self {
        Self {
            tariff_zone_id,
            table_count,
        }
    }
}

/// Tables a reservation holds in a tariff zone, with the price at commit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCommitment {
    pub id: i64,
    pub reservation_id: i64,
    pub tariff_zone_id: i64,
    pub table_count: u32,
    /// Snapshot of the zone's table price; later tariff edits never touch it
    pub unit_price: Decimal,
    pub created_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub reservant_id: i64,
    #[serde(default)]
    pub outlet_count: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub will_animate: bool,
    /// Zones committed together with the reservation
    #[serde(default)]
    pub zones: Vec<CommitmentRequest>,
}

impl ReservationCreate {
    pub fn new(reservant_id: i64) -> Self {
        Self {
            reservant_id,
            ..Default::default()
        }
    }
}

/// Update reservation payload (allow-listed fields only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservationUpdate {
    pub contact_state: Option<ContactState>,
    pub presence_state: Option<PresenceState>,
    pub outlet_count: Option<u32>,
    pub table_discount: Option<Decimal>,
    pub amount_discount: Option<Decimal>,
    pub notes: Option<String>,
    pub will_animate: Option<bool>,
}

impl ReservationUpdate {
    pub fn is_empty(&self) -> bool {
        self.contact_state.is_none()
            && self.presence_state.is_none()
            && self.outlet_count.is_none()
            && self.table_discount.is_none()
            && self.amount_discount.is_none()
            && self.notes.is_none()
            && self.will_animate.is_none()
    }
}

/// Budget view of a reservation, recomputed on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationBudget {
    pub reservation_id: i64,
    /// Σ committed tables
    pub budget: u64,
    /// Σ tables of placed game instances
    pub consumed: u64,
    pub remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&ContactState::GameListRequested).unwrap(),
            "\"liste_jeux_demandee\""
        );
        let state: PresenceState = serde_json::from_str("\"considere_absent\"").unwrap();
        assert_eq!(state, PresenceState::ConsideredAbsent);
        assert_eq!(ContactState::default(), ContactState::NotContacted);
        assert_eq!(PresenceState::default(), PresenceState::Undefined);
    }

    #[test]
    fn test_update_is_allow_listed() {
        let result: Result<ReservationUpdate, _> =
            serde_json::from_str(r#"{"notes":"ok","festival_id":3}"#);
        assert!(result.is_err());

        let update: ReservationUpdate =
            serde_json::from_str(r#"{"presence_state":"present"}"#).unwrap();
        assert_eq!(update.presence_state, Some(PresenceState::Present));
        assert!(!update.is_empty());
    }
}
