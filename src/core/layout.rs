/*
 * This module defines the addressing scheme of the style table: the closed set
 * of control types the editor knows about, the three property groups that
 * enumerate each control's style slots, and `StyleLayout`, which assigns every
 * control a contiguous block of slots at a fixed base offset. The layout is
 * built once at startup from the control declarations; nothing else in the
 * crate is allowed to assume a particular enum ordering when computing
 * offsets.
 *
 * All slot arithmetic goes through `StyleLayout::slot_index`, which rejects an
 * out-of-range property position before any offset is formed. The style table
 * itself does not re-validate offsets, so this is the single guard against
 * silently writing into an unrelated control's block.
 */
use std::collections::HashMap;
use std::fmt;

/* A category of widget whose style slots are addressed as one contiguous block. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    Label,
    LabelButton,
    Button,
    ImageButton,
    Toggle,
    ToggleGroup,
    Slider,
    SliderBar,
    ProgressBar,
    CheckBox,
    Spinner,
    ComboBox,
    TextBox,
    ListView,
    ColorPicker,
}

impl ControlType {
    pub const ALL: [ControlType; 15] = [
        ControlType::Label,
        ControlType::LabelButton,
        ControlType::Button,
        ControlType::ImageButton,
        ControlType::Toggle,
        ControlType::ToggleGroup,
        ControlType::Slider,
        ControlType::SliderBar,
        ControlType::ProgressBar,
        ControlType::CheckBox,
        ControlType::Spinner,
        ControlType::ComboBox,
        ControlType::TextBox,
        ControlType::ListView,
        ControlType::ColorPicker,
    ];

    /*
     * Resolves a zero-based gallery row index (as reported by the platform's
     * list control) to a control type. The UI list is populated from
     * `ControlType::ALL`, so the row order and this mapping agree by
     * construction.
     */
    pub fn from_index(index: usize) -> Result<ControlType> {
        ControlType::ALL
            .get(index)
            .copied()
            .ok_or(SelectionError::UnknownControl(index))
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlType::Label => "LABEL",
            ControlType::LabelButton => "LABELBUTTON",
            ControlType::Button => "BUTTON",
            ControlType::ImageButton => "IMAGEBUTTON",
            ControlType::Toggle => "TOGGLE",
            ControlType::ToggleGroup => "TOGGLEGROUP",
            ControlType::Slider => "SLIDER",
            ControlType::SliderBar => "SLIDERBAR",
            ControlType::ProgressBar => "PROGRESSBAR",
            ControlType::CheckBox => "CHECKBOX",
            ControlType::Spinner => "SPINNER",
            ControlType::ComboBox => "COMBOBOX",
            ControlType::TextBox => "TEXTBOX",
            ControlType::ListView => "LISTVIEW",
            ControlType::ColorPicker => "COLORPICKER",
        }
    }

    /*
     * The property group a control exposes in the property gallery. Label-like
     * controls only carry text colors; slider-like controls carry border and
     * base colors; everything else carries the full border/base/text set.
     */
    pub fn property_group(self) -> PropertyGroup {
        match self {
            ControlType::Label | ControlType::LabelButton => PropertyGroup::Text,
            ControlType::Slider
            | ControlType::SliderBar
            | ControlType::ProgressBar
            | ControlType::CheckBox
            | ControlType::ColorPicker => PropertyGroup::BorderBase,
            ControlType::Button
            | ControlType::ImageButton
            | ControlType::Toggle
            | ControlType::ToggleGroup
            | ControlType::Spinner
            | ControlType::ComboBox
            | ControlType::TextBox
            | ControlType::ListView => PropertyGroup::Full,
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// The color a slot stores, within a control's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Border,
    Base,
    Text,
}

// The interaction state a slot's color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Normal,
    Focused,
    Pressed,
    Disabled,
}

const TEXT_SLOT_NAMES: [&str; 4] = [
    "TEXT_COLOR_NORMAL",
    "TEXT_COLOR_FOCUSED",
    "TEXT_COLOR_PRESSED",
    "TEXT_COLOR_DISABLED",
];

const BORDER_BASE_SLOT_NAMES: [&str; 8] = [
    "BORDER_COLOR_NORMAL",
    "BASE_COLOR_NORMAL",
    "BORDER_COLOR_FOCUSED",
    "BASE_COLOR_FOCUSED",
    "BORDER_COLOR_PRESSED",
    "BASE_COLOR_PRESSED",
    "BORDER_COLOR_DISABLED",
    "BASE_COLOR_DISABLED",
];

const FULL_SLOT_NAMES: [&str; 12] = [
    "BORDER_COLOR_NORMAL",
    "BASE_COLOR_NORMAL",
    "TEXT_COLOR_NORMAL",
    "BORDER_COLOR_FOCUSED",
    "BASE_COLOR_FOCUSED",
    "TEXT_COLOR_FOCUSED",
    "BORDER_COLOR_PRESSED",
    "BASE_COLOR_PRESSED",
    "TEXT_COLOR_PRESSED",
    "BORDER_COLOR_DISABLED",
    "BASE_COLOR_DISABLED",
    "TEXT_COLOR_DISABLED",
];

/*
 * One of the three fixed enumerations of property slots. Group membership is
 * determined by the control type (`ControlType::property_group`), never chosen
 * freely, and the slot order within a group is part of the persisted format.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyGroup {
    /// Text colors only (labels).
    Text,
    /// Border and base colors, interleaved per state (sliders, bars, boxes).
    BorderBase,
    /// Border, base and text colors per state (all remaining controls).
    Full,
}

impl PropertyGroup {
    pub fn slot_count(self) -> usize {
        match self {
            PropertyGroup::Text => 4,
            PropertyGroup::BorderBase => 8,
            PropertyGroup::Full => 12,
        }
    }

    pub fn slot_name(self, property: usize) -> Option<&'static str> {
        match self {
            PropertyGroup::Text => TEXT_SLOT_NAMES.get(property).copied(),
            PropertyGroup::BorderBase => BORDER_BASE_SLOT_NAMES.get(property).copied(),
            PropertyGroup::Full => FULL_SLOT_NAMES.get(property).copied(),
        }
    }

    /* The (role, state) meaning of a slot position, used to pick defaults. */
    pub fn slot_meaning(self, property: usize) -> Option<(ColorRole, WidgetState)> {
        if property >= self.slot_count() {
            return None;
        }
        let state_of = |n: usize| match n {
            0 => WidgetState::Normal,
            1 => WidgetState::Focused,
            2 => WidgetState::Pressed,
            _ => WidgetState::Disabled,
        };
        match self {
            PropertyGroup::Text => Some((ColorRole::Text, state_of(property))),
            PropertyGroup::BorderBase => {
                let role = if property % 2 == 0 {
                    ColorRole::Border
                } else {
                    ColorRole::Base
                };
                Some((role, state_of(property / 2)))
            }
            PropertyGroup::Full => {
                let role = match property % 3 {
                    0 => ColorRole::Border,
                    1 => ColorRole::Base,
                    _ => ColorRole::Text,
                };
                Some((role, state_of(property / 3)))
            }
        }
    }
}

/*
 * The small set of global properties that belong to no control block. They
 * occupy the first slots of the style table, before any control block.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericProperty {
    BackgroundColor,
    LinesColor,
    TextSize,
}

impl GenericProperty {
    pub const ALL: [GenericProperty; 3] = [
        GenericProperty::BackgroundColor,
        GenericProperty::LinesColor,
        GenericProperty::TextSize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GenericProperty::BackgroundColor => "DEFAULT_BACKGROUND_COLOR",
            GenericProperty::LinesColor => "DEFAULT_LINES_COLOR",
            GenericProperty::TextSize => "DEFAULT_TEXT_SIZE",
        }
    }
}

#[derive(Debug)]
pub enum SelectionError {
    /// A gallery row index did not correspond to any known control type.
    UnknownControl(usize),
    /// A property position outside the control's group was requested.
    PropertyOutOfRange {
        control: ControlType,
        property: usize,
        group_len: usize,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::UnknownControl(index) => {
                write!(f, "No control type at gallery index {index}")
            }
            SelectionError::PropertyOutOfRange {
                control,
                property,
                group_len,
            } => write!(
                f,
                "Property index {property} is out of range for {control} (group has {group_len} slots)"
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

pub type Result<T> = std::result::Result<T, SelectionError>;

/*
 * The style-table layout: every control's base offset, computed once from the
 * control declarations. Controls sharing a property group still own disjoint
 * blocks; the base offset alone decides where a slot lands.
 */
#[derive(Debug, Clone)]
pub struct StyleLayout {
    base_offsets: [usize; ControlType::ALL.len()],
    total_slots: usize,
}

impl StyleLayout {
    pub fn new() -> Self {
        let mut base_offsets = [0usize; ControlType::ALL.len()];
        // Generic properties come first.
        let mut next_offset = GenericProperty::ALL.len();
        for (position, control) in ControlType::ALL.iter().enumerate() {
            base_offsets[position] = next_offset;
            next_offset += control.property_group().slot_count();
        }
        log::debug!(
            "StyleLayout: Built layout with {} slots for {} controls.",
            next_offset,
            ControlType::ALL.len()
        );
        StyleLayout {
            base_offsets,
            total_slots: next_offset,
        }
    }

    /// Total number of slots a conforming style table holds.
    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    /// First slot index owned by the given control type.
    pub fn base_offset(&self, control: ControlType) -> usize {
        let position = ControlType::ALL
            .iter()
            .position(|c| *c == control)
            .expect("every control type is declared in ControlType::ALL");
        self.base_offsets[position]
    }

    /*
     * Maps a (control, property) selection to a flat table offset. The
     * property position is validated against the control's group size before
     * any arithmetic; an out-of-range position would otherwise land in an
     * unrelated control's block.
     */
    pub fn slot_index(&self, control: ControlType, property: usize) -> Result<usize> {
        let group = control.property_group();
        if property >= group.slot_count() {
            return Err(SelectionError::PropertyOutOfRange {
                control,
                property,
                group_len: group.slot_count(),
            });
        }
        Ok(self.base_offset(control) + property)
    }

    /// Table offset of a generic (non-indexed) property.
    pub fn generic_index(&self, property: GenericProperty) -> usize {
        GenericProperty::ALL
            .iter()
            .position(|p| *p == property)
            .expect("every generic property is declared in GenericProperty::ALL")
    }

    /// Symbolic name of an indexed slot, e.g. `BUTTON_BASE_COLOR_PRESSED`.
    pub fn slot_name(&self, control: ControlType, property: usize) -> Result<String> {
        let group = control.property_group();
        match group.slot_name(property) {
            Some(name) => Ok(format!("{}_{}", control.name(), name)),
            None => Err(SelectionError::PropertyOutOfRange {
                control,
                property,
                group_len: group.slot_count(),
            }),
        }
    }

    /*
     * Symbolic names of all slots in table order, generic properties first.
     * This order is the one the text and image encodings persist slots in.
     */
    pub fn slot_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.total_slots);
        for generic in GenericProperty::ALL {
            names.push(generic.name().to_string());
        }
        for control in ControlType::ALL {
            let group = control.property_group();
            for property in 0..group.slot_count() {
                // slot_name cannot fail for in-range positions.
                names.push(format!(
                    "{}_{}",
                    control.name(),
                    group.slot_name(property).unwrap_or("UNNAMED")
                ));
            }
        }
        names
    }

    /// Reverse mapping from symbolic slot name to table offset.
    pub fn name_to_offset(&self) -> HashMap<String, usize> {
        self.slot_names()
            .into_iter()
            .enumerate()
            .map(|(offset, name)| (name, offset))
            .collect()
    }
}

impl Default for StyleLayout {
    fn default() -> Self {
        Self::new()
    }
}
