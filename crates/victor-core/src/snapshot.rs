// ── Trap snapshots ──
//
// The full trap list from one successful poll. Immutable after
// construction; consumers get shared read access only. Two snapshots
// are compared by their sorted id sets -- pure reordering of the same
// device set is never a change.

use std::sync::Arc;

use victor_api::Trap;

/// An immutable trap list produced by one successful poll.
///
/// Cheaply cloneable; clones share the underlying list.
#[derive(Debug, Clone)]
pub struct TrapSnapshot {
    traps: Arc<Vec<Arc<Trap>>>,
}

impl TrapSnapshot {
    pub fn new(traps: Vec<Trap>) -> Self {
        Self {
            traps: Arc::new(traps.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    /// The traps in the order the API returned them.
    pub fn traps(&self) -> &[Arc<Trap>] {
        &self.traps
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Trap>> {
        self.traps.iter()
    }

    /// Look up a trap by its stable id.
    pub fn trap_by_id(&self, trap_id: i64) -> Option<&Arc<Trap>> {
        self.traps.iter().find(|trap| trap.id == trap_id)
    }

    /// Ids sorted ascending -- the comparison key for change detection.
    pub fn sorted_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.traps.iter().map(|trap| trap.id).collect();
        ids.sort_unstable();
        ids
    }
}

impl<'a> IntoIterator for &'a TrapSnapshot {
    type Item = &'a Arc<Trap>;
    type IntoIter = std::slice::Iter<'a, Arc<Trap>>;

    fn into_iter(self) -> Self::IntoIter {
        self.traps.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use victor_api::decode::{UnknownFields, decode};

    use super::*;

    fn trap(id: i64) -> Trap {
        decode(
            UnknownFields::Allow,
            &json!({
                "id": id,
                "url": format!("https://www.victorsmartkill.com/traps/{id}/"),
                "corruption_status": 0,
                "corruption_status_options": null,
                "name": format!("Trap {id}"),
                "ssid": "home-iot",
                "serial_number": format!("SK{id}"),
                "auto_upgrade": false,
                "status": 1,
                "commercial_monitor_mode_enabled": false,
                "trap_type": 1,
                "trap_type_verbose": "Smart-Kill Electronic Mouse Trap",
                "alerts": 0,
                "trapstatistics": {
                    "id": id * 10,
                    "url": format!("https://www.victorsmartkill.com/trapstatistics/{}/", id * 10),
                    "trap": format!("https://www.victorsmartkill.com/traps/{id}/"),
                    "trap_name": format!("Trap {id}"),
                    "install_date": "2023-03-01T10:00:00Z",
                    "owner_name": "Jo",
                    "owner_email": "jo@example.com",
                    "battery_level": 90,
                    "rx_power_level": 100,
                    "firmware_version": "1.0.18",
                    "trap_provisioned": true,
                    "wireless_network_rssi": -60,
                    "error_code": 0,
                    "send_conn_lost_nt": false,
                    "send_empty_trap_nt": false,
                    "board_type": "SK-1",
                },
            }),
        )
        .unwrap()
    }

    #[test]
    fn sorted_ids_ignore_api_ordering() {
        let snapshot = TrapSnapshot::new(vec![trap(3), trap(1), trap(2)]);
        assert_eq!(snapshot.sorted_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn lookup_by_id() {
        let snapshot = TrapSnapshot::new(vec![trap(1), trap(2)]);
        assert_eq!(snapshot.trap_by_id(2).unwrap().id, 2);
        assert!(snapshot.trap_by_id(9).is_none());
    }

    #[test]
    fn clones_share_the_list() {
        let snapshot = TrapSnapshot::new(vec![trap(1)]);
        let clone = snapshot.clone();
        assert!(Arc::ptr_eq(&snapshot.traps, &clone.traps));
    }
}
