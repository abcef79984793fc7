#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cellular tower identity as reported by the device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellTower {
    pub mobile_country_code: Option<i32>,
    pub mobile_network_code: Option<i32>,
    pub location_area_code: Option<i32>,
    pub cell_id: Option<i64>,
    pub signal_strength: Option<i32>,
}

/// Network information attached to a position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Network {
    pub cell_towers: Vec<CellTower>,
}

impl Network {
    pub fn from_cell_tower(cell_tower: CellTower) -> Self {
        Self {
            cell_towers: vec![cell_tower],
        }
    }

    /// Serving cell, i.e. the first tower in the list
    pub fn primary_cell(&self) -> Option<&CellTower> {
        self.cell_towers.first()
    }
}
