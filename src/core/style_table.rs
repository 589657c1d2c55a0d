/*
 * This module owns the style table: the ordered sequence of fixed-width
 * integer style values the whole editor reads and mutates. Each slot's
 * meaning is fixed by its offset as assigned by `StyleLayout`; the table
 * stores values only and carries no schema of its own, so every offset handed
 * to it must come from the layout. The table is an explicitly owned value
 * (held by the edit session), not a process-wide global.
 *
 * Color slots store `0xRRGGBBAA`; the few non-color slots (text size) store
 * the plain integer.
 */
use super::layout::{ColorRole, GenericProperty, StyleLayout, WidgetState};

// Built-in light palette, the table contents before any style file is loaded.
const BORDER_COLOR_NORMAL: u32 = 0x838383FF;
const BASE_COLOR_NORMAL: u32 = 0xC9C9C9FF;
const TEXT_COLOR_NORMAL: u32 = 0x686868FF;
const BORDER_COLOR_FOCUSED: u32 = 0x5BB2D9FF;
const BASE_COLOR_FOCUSED: u32 = 0xC9EFFEFF;
const TEXT_COLOR_FOCUSED: u32 = 0x6C9BBCFF;
const BORDER_COLOR_PRESSED: u32 = 0x0492C7FF;
const BASE_COLOR_PRESSED: u32 = 0x97E8FFFF;
const TEXT_COLOR_PRESSED: u32 = 0x368BAFFF;
const BORDER_COLOR_DISABLED: u32 = 0xB5C1C2FF;
const BASE_COLOR_DISABLED: u32 = 0xE6E9E9FF;
const TEXT_COLOR_DISABLED: u32 = 0xAEB7B8FF;
const BACKGROUND_COLOR: u32 = 0xF5F5F5FF;
const LINES_COLOR: u32 = 0x90ABB5FF;
const TEXT_SIZE: u32 = 10;

fn default_slot_value(role: ColorRole, state: WidgetState) -> u32 {
    match (role, state) {
        (ColorRole::Border, WidgetState::Normal) => BORDER_COLOR_NORMAL,
        (ColorRole::Base, WidgetState::Normal) => BASE_COLOR_NORMAL,
        (ColorRole::Text, WidgetState::Normal) => TEXT_COLOR_NORMAL,
        (ColorRole::Border, WidgetState::Focused) => BORDER_COLOR_FOCUSED,
        (ColorRole::Base, WidgetState::Focused) => BASE_COLOR_FOCUSED,
        (ColorRole::Text, WidgetState::Focused) => TEXT_COLOR_FOCUSED,
        (ColorRole::Border, WidgetState::Pressed) => BORDER_COLOR_PRESSED,
        (ColorRole::Base, WidgetState::Pressed) => BASE_COLOR_PRESSED,
        (ColorRole::Text, WidgetState::Pressed) => TEXT_COLOR_PRESSED,
        (ColorRole::Border, WidgetState::Disabled) => BORDER_COLOR_DISABLED,
        (ColorRole::Base, WidgetState::Disabled) => BASE_COLOR_DISABLED,
        (ColorRole::Text, WidgetState::Disabled) => TEXT_COLOR_DISABLED,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    slots: Vec<u32>,
}

impl StyleTable {
    /*
     * Builds the table with the built-in light defaults, one slot per layout
     * position. Every color slot is filled from the palette according to its
     * (role, state) meaning; the generic slots get the editor defaults.
     */
    pub fn default_light(layout: &StyleLayout) -> Self {
        let mut slots = vec![0u32; layout.total_slots()];
        slots[layout.generic_index(GenericProperty::BackgroundColor)] = BACKGROUND_COLOR;
        slots[layout.generic_index(GenericProperty::LinesColor)] = LINES_COLOR;
        slots[layout.generic_index(GenericProperty::TextSize)] = TEXT_SIZE;
        for control in super::layout::ControlType::ALL {
            let group = control.property_group();
            for property in 0..group.slot_count() {
                if let (Ok(offset), Some((role, state))) = (
                    layout.slot_index(control, property),
                    group.slot_meaning(property),
                ) {
                    slots[offset] = default_slot_value(role, state);
                }
            }
        }
        StyleTable { slots }
    }

    /// Wraps an already-decoded slot vector, e.g. from a loaded style file.
    pub fn from_slots(slots: Vec<u32>) -> Self {
        StyleTable { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /*
     * Reads a slot. Offsets are trusted to come from `StyleLayout`; the table
     * performs no range check of its own.
     */
    pub fn get(&self, offset: usize) -> u32 {
        self.slots[offset]
    }

    pub fn set(&mut self, offset: usize, value: u32) {
        self.slots[offset] = value;
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::ControlType;

    #[test]
    fn test_default_light_fills_every_slot() {
        let layout = StyleLayout::new();
        let table = StyleTable::default_light(&layout);
        assert_eq!(table.len(), layout.total_slots());
        assert!(
            table.as_slice().iter().all(|v| *v != 0),
            "no slot should be left at the zero placeholder"
        );
    }

    #[test]
    fn test_default_light_generic_values() {
        let layout = StyleLayout::new();
        let table = StyleTable::default_light(&layout);
        assert_eq!(
            table.get(layout.generic_index(GenericProperty::BackgroundColor)),
            0xF5F5F5FF
        );
        assert_eq!(
            table.get(layout.generic_index(GenericProperty::TextSize)),
            10
        );
    }

    #[test]
    fn test_set_then_get_round_trips_one_slot() {
        let layout = StyleLayout::new();
        let mut table = StyleTable::default_light(&layout);
        let offset = layout
            .slot_index(ControlType::Button, 0)
            .expect("BUTTON slot 0 exists");
        table.set(offset, 0x11223344);
        assert_eq!(table.get(offset), 0x11223344);
    }
}
