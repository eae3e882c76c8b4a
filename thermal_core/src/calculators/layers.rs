//! Editable layer list for the composite wall page.
//!
//! Layers have no stable identity: a layer is whatever sits at a given
//! position. Positions are 1-based, matching what the user sees, and always
//! form the contiguous sequence `1..=len`.

use serde::{Deserialize, Serialize};

use crate::errors::{ThermalError, ThermalResult};

/// Raw field text for one wall layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerForm {
    pub thickness: String,
    pub k_value: String,
    pub area: String,
}

impl LayerForm {
    pub fn new(thickness: impl Into<String>, k_value: impl Into<String>, area: impl Into<String>) -> Self {
        LayerForm {
            thickness: thickness.into(),
            k_value: k_value.into(),
            area: area.into(),
        }
    }
}

/// Ordered, user-editable list of layer groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerList {
    groups: Vec<LayerForm>,
}

impl LayerList {
    /// An empty list
    pub fn new() -> Self {
        LayerList::default()
    }

    /// A list holding one blank layer, the state of a freshly opened page.
    pub fn with_blank_layer() -> Self {
        let mut list = LayerList::new();
        list.add();
        list
    }

    /// Append a blank layer and return its position.
    pub fn add(&mut self) -> usize {
        self.push(LayerForm::default())
    }

    /// Append a filled-in layer and return its position.
    pub fn push(&mut self, layer: LayerForm) -> usize {
        self.groups.push(layer);
        self.groups.len()
    }

    /// Remove the layer at `position`. Later layers move up one position.
    pub fn remove(&mut self, position: usize) -> ThermalResult<LayerForm> {
        let index = self.index_of(position)?;
        Ok(self.groups.remove(index))
    }

    pub fn get(&self, position: usize) -> Option<&LayerForm> {
        position.checked_sub(1).and_then(|i| self.groups.get(i))
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut LayerForm> {
        position.checked_sub(1).and_then(move |i| self.groups.get_mut(i))
    }

    /// Replace the fields of the layer at `position`.
    pub fn set(&mut self, position: usize, layer: LayerForm) -> ThermalResult<()> {
        let index = self.index_of(position)?;
        self.groups[index] = layer;
        Ok(())
    }

    /// Display numbers of the current layers.
    pub fn positions(&self) -> Vec<usize> {
        (1..=self.groups.len()).collect()
    }

    /// Layers paired with their display positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &LayerForm)> {
        self.groups.iter().enumerate().map(|(i, layer)| (i + 1, layer))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn index_of(&self, position: usize) -> ThermalResult<usize> {
        if position == 0 || position > self.groups.len() {
            return Err(ThermalError::validation(
                "layers",
                format!("No layer at position {} (have {}).", position, self.groups.len()),
            ));
        }
        Ok(position - 1)
    }
}

impl FromIterator<LayerForm> for LayerList {
    fn from_iter<I: IntoIterator<Item = LayerForm>>(iter: I) -> Self {
        LayerList {
            groups: iter.into_iter().collect(),
        }
    }
}
