use crate::error::Result;
use crate::parser::catalog::TagCatalog;
use crate::parser::cell::{CellIdRule, CellTowerAccumulator};
use crate::parser::helpers::{parse_form, split_values};
use crate::types::Position;

/// Decode a text custom-field segment using the process-wide catalog
pub fn read_text_custom_data(position: &mut Position, data: &str, form: &str) -> Result<()> {
    read_text_custom_data_with(TagCatalog::global(), position, data, form)
}

/// Decode a text custom-field segment.
///
/// Tags and values are paired positionally; whichever list is longer is
/// truncated to the shorter one. The cell accumulator is finalized only
/// when every pair decoded successfully.
pub fn read_text_custom_data_with(
    catalog: &TagCatalog,
    position: &mut Position,
    data: &str,
    form: &str,
) -> Result<()> {
    let tags = parse_form(form);
    let values = split_values(data);
    let mut cell = CellTowerAccumulator::new();

    if tags.len() != values.len() {
        log::debug!(
            "Form has {} tag(s) but payload has {} value(s), decoding {}",
            tags.len(),
            values.len(),
            tags.len().min(values.len())
        );
    }

    for (tag, value) in tags.iter().zip(values.iter()) {
        if !catalog.contains(tag) {
            log::debug!("Ignoring unsupported text tag {}", tag);
        }
        catalog.lookup(tag)(position, &mut cell, value)?;
    }

    cell.finalize(position, CellIdRule::AnyValue);
    Ok(())
}
