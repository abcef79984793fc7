use crate::types::{CellTower, Network, Position, KEY_RSSI};

/// Completeness rule applied when the accumulator is finalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellIdRule {
    /// Any cell id counts as present
    AnyValue,
    /// A zero cell id counts as absent (binary payloads pad with zeros)
    NonZero,
}

/// Collects the partial cellular identity spread over several custom tags
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CellTowerAccumulator {
    tower: CellTower,
}

impl CellTowerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mobile_country_code(&mut self, mcc: i32) {
        self.tower.mobile_country_code = Some(mcc);
    }

    pub fn set_mobile_network_code(&mut self, mnc: i32) {
        self.tower.mobile_network_code = Some(mnc);
    }

    pub fn set_location_area_code(&mut self, lac: i32) {
        self.tower.location_area_code = Some(lac);
    }

    pub fn set_cell_id(&mut self, cell_id: i64) {
        self.tower.cell_id = Some(cell_id);
    }

    pub fn set_signal_strength(&mut self, signal_strength: i32) {
        self.tower.signal_strength = Some(signal_strength);
    }

    pub fn cell_tower(&self) -> &CellTower {
        &self.tower
    }

    fn is_complete(&self, rule: CellIdRule) -> bool {
        let tower = &self.tower;
        let cell_id_present = match (tower.cell_id, rule) {
            (Some(_), CellIdRule::AnyValue) => true,
            (Some(id), CellIdRule::NonZero) => id != 0,
            (None, _) => false,
        };
        tower.mobile_country_code.is_some()
            && tower.mobile_network_code.is_some()
            && tower.location_area_code.is_some()
            && cell_id_present
    }

    /// Write the collected identity back onto the position.
    ///
    /// A complete identity becomes the position's network; otherwise a bare
    /// signal strength becomes the `rssi` attribute; otherwise nothing.
    pub fn finalize(self, position: &mut Position, rule: CellIdRule) {
        if self.is_complete(rule) {
            position.set_network(Network::from_cell_tower(self.tower));
        } else if let Some(signal_strength) = self.tower.signal_strength {
            position.set(KEY_RSSI, signal_strength);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_accumulator(cell_id: i64) -> CellTowerAccumulator {
        let mut acc = CellTowerAccumulator::new();
        acc.set_mobile_country_code(310);
        acc.set_mobile_network_code(26);
        acc.set_location_area_code(10);
        acc.set_cell_id(cell_id);
        acc.set_signal_strength(17);
        acc
    }

    #[test]
    fn test_complete_identity_emits_network() {
        let mut position = Position::new();
        full_accumulator(12345).finalize(&mut position, CellIdRule::NonZero);

        let cell = position.network.as_ref().and_then(|n| n.primary_cell()).unwrap();
        assert_eq!(cell.mobile_country_code, Some(310));
        assert_eq!(cell.mobile_network_code, Some(26));
        assert_eq!(cell.location_area_code, Some(10));
        assert_eq!(cell.cell_id, Some(12345));
        assert_eq!(cell.signal_strength, Some(17));
        assert!(!position.has(KEY_RSSI));
    }

    #[test]
    fn test_zero_cell_id_depends_on_rule() {
        let mut binary = Position::new();
        full_accumulator(0).finalize(&mut binary, CellIdRule::NonZero);
        assert!(binary.network.is_none());
        assert_eq!(binary.get(KEY_RSSI).and_then(|v| v.as_i64()), Some(17));

        let mut text = Position::new();
        full_accumulator(0).finalize(&mut text, CellIdRule::AnyValue);
        assert!(text.network.is_some());
    }

    #[test]
    fn test_partial_identity_falls_back_to_rssi() {
        let mut acc = CellTowerAccumulator::new();
        acc.set_cell_id(99);
        acc.set_signal_strength(-70);
        let mut position = Position::new();
        acc.finalize(&mut position, CellIdRule::AnyValue);
        assert!(position.network.is_none());
        assert_eq!(position.get(KEY_RSSI).and_then(|v| v.as_i64()), Some(-70));
    }

    #[test]
    fn test_empty_accumulator_emits_nothing() {
        let mut position = Position::new();
        CellTowerAccumulator::new().finalize(&mut position, CellIdRule::AnyValue);
        assert_eq!(position, Position::new());
    }
}
