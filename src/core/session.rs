/*
 * This module holds the live color edit session: the style table being
 * edited, the current gallery selection, and the binding between the color
 * picker and a table slot. The session owns the table outright; the app logic
 * and the native shell read it through the session rather than through any
 * global state.
 *
 * Re-seeding discipline: the picker's working value is re-seeded from the
 * bound slot exactly when the binding changes, never on repeated updates with
 * an unchanged selection. Re-seeding each frame would overwrite the user's
 * in-progress edit; never re-seeding would show a stale color after switching
 * selections.
 */
use super::layout::{ControlType, GenericProperty, SelectionError, StyleLayout};
use super::style_table::StyleTable;

/* What the color picker currently writes into. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerBinding {
    /// No complete (control, property) selection and no generic override.
    Unbound,
    /// Bound to the slot of the selected control and property.
    Slot {
        control: ControlType,
        property: usize,
    },
    /// Bound to a generic table property, bypassing the indexer.
    Generic(GenericProperty),
}

#[derive(Debug)]
pub struct EditSession {
    layout: StyleLayout,
    table: StyleTable,
    selected_control: Option<ControlType>,
    selected_property: Option<usize>,
    generic_override: Option<GenericProperty>,
    picker_value: u32,
}

impl EditSession {
    pub fn new() -> Self {
        let layout = StyleLayout::new();
        let table = StyleTable::default_light(&layout);
        EditSession {
            layout,
            table,
            selected_control: None,
            selected_property: None,
            generic_override: None,
            picker_value: 0,
        }
    }

    pub fn layout(&self) -> &StyleLayout {
        &self.layout
    }

    pub fn table(&self) -> &StyleTable {
        &self.table
    }

    pub fn selected_control(&self) -> Option<ControlType> {
        self.selected_control
    }

    pub fn selected_property(&self) -> Option<usize> {
        self.selected_property
    }

    /// The picker's current working value, `0xRRGGBBAA` for color slots.
    pub fn picker_value(&self) -> u32 {
        self.picker_value
    }

    pub fn binding(&self) -> PickerBinding {
        if let Some(generic) = self.generic_override {
            return PickerBinding::Generic(generic);
        }
        match (self.selected_control, self.selected_property) {
            (Some(control), Some(property)) => PickerBinding::Slot { control, property },
            _ => PickerBinding::Unbound,
        }
    }

    /*
     * Applies the gallery selection for this frame. The property position is
     * validated against the selected control's group before anything changes;
     * on rejection the previous selection stays in place. When the validated
     * selection produces a different slot binding than before, the picker is
     * re-seeded from that slot's current value; an unchanged selection leaves
     * the picker's working value alone.
     */
    pub fn set_selection(
        &mut self,
        control: Option<ControlType>,
        property: Option<usize>,
    ) -> Result<(), SelectionError> {
        if let (Some(control), Some(property)) = (control, property) {
            // Validate before any arithmetic or state change.
            self.layout.slot_index(control, property)?;
        }
        let previous_binding = self.binding();
        self.selected_control = control;
        self.selected_property = property;
        let new_binding = self.binding();
        if new_binding != previous_binding {
            log::debug!("EditSession: Picker binding changed to {new_binding:?}.");
            self.reseed_from_binding();
        }
        Ok(())
    }

    /*
     * Switches the picker to a generic property (background, lines) or back
     * to the selected slot (`None`). Entering the override keeps the picker's
     * working value, mirroring the editor toggles that push the current color
     * onto the background; leaving it re-seeds from the selected slot so the
     * override color is not written into the slot by accident.
     */
    pub fn set_generic_override(&mut self, target: Option<GenericProperty>) {
        if self.generic_override == target {
            return;
        }
        self.generic_override = target;
        if target.is_none() {
            self.reseed_from_binding();
        }
        log::debug!("EditSession: Picker binding is now {:?}.", self.binding());
    }

    /*
     * Writes the picker's new working value through the current binding.
     * Returns the table offset written, or `None` when nothing is bound.
     */
    pub fn apply_picker_value(&mut self, value: u32) -> Option<usize> {
        self.picker_value = value;
        let offset = match self.binding() {
            PickerBinding::Unbound => return None,
            PickerBinding::Generic(generic) => self.layout.generic_index(generic),
            PickerBinding::Slot { control, property } => {
                // The binding only exists for selections that validated.
                self.layout.slot_index(control, property).ok()?
            }
        };
        self.table.set(offset, value);
        Some(offset)
    }

    /*
     * Replaces the table wholesale, e.g. after a style file load, and
     * re-seeds the picker from whatever it is currently bound to so the UI
     * does not keep showing a color from the replaced table.
     */
    pub fn replace_table(&mut self, table: StyleTable) {
        self.table = table;
        self.reseed_from_binding();
    }

    fn reseed_from_binding(&mut self) {
        let offset = match self.binding() {
            PickerBinding::Unbound => return,
            PickerBinding::Generic(generic) => self.layout.generic_index(generic),
            PickerBinding::Slot { control, property } => {
                match self.layout.slot_index(control, property) {
                    Ok(offset) => offset,
                    Err(_) => return,
                }
            }
        };
        self.picker_value = self.table.get(offset);
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
