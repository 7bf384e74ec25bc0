//! What the modal shows, derived from [`ModalState`].

use serde::Serialize;

use quickbuy_catalog::axis_values;
use quickbuy_core::MoneyFormat;

use crate::state::{LoadedProduct, ModalState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// Color axis: a row of pressable pills.
    Pills,
    /// Every other axis: a dropdown.
    Dropdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub value: String,
    /// `aria-pressed` for pills, `selected` for dropdown options.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorView {
    pub axis: usize,
    pub label: String,
    pub kind: SelectorKind,
    pub choices: Vec<ChoiceView>,
}

/// Rendered modal content. A closed modal is hidden and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub hidden: bool,
    pub title: String,
    pub price: String,
    pub description: String,
    pub image: Option<String>,
    pub selectors: Vec<SelectorView>,
    pub quantity: u32,
    pub sold_out: bool,
    pub note: String,
    pub can_add: bool,
}

impl ModalView {
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    pub fn render(state: &ModalState, money: &MoneyFormat) -> Self {
        let Some(open) = state.open() else {
            return Self::hidden();
        };

        let mut view = Self {
            hidden: false,
            note: open.note.clone().unwrap_or_default(),
            ..Self::default()
        };
        if let Some(loaded) = &open.content {
            view.fill(loaded, money);
        }
        view
    }

    fn fill(&mut self, loaded: &LoadedProduct, money: &MoneyFormat) {
        let product = loaded.product();
        let active = loaded.active_variant();

        self.title = product.title.clone();
        self.description = product.description.clone();
        self.image = product.image_url().map(str::to_string);
        self.price = active
            .map(|v| v.price)
            .or(product.display_price())
            .map(|cents| money.format(cents))
            .unwrap_or_default();
        self.quantity = loaded.quantity().get();
        self.sold_out = active.is_some_and(|v| !v.available);
        self.can_add = active.is_some();

        let color_axis = loaded.axes().color;
        self.selectors = product
            .options
            .iter()
            .enumerate()
            .map(|(axis, option)| {
                let current = loaded.selection().get(axis);
                SelectorView {
                    axis,
                    label: option.name.clone(),
                    kind: if color_axis == Some(axis) {
                        SelectorKind::Pills
                    } else {
                        SelectorKind::Dropdown
                    },
                    choices: axis_values(product, axis)
                        .into_iter()
                        .map(|value| ChoiceView {
                            selected: current == Some(value.as_str()),
                            value,
                        })
                        .collect(),
                }
            })
            .collect();
    }
}
