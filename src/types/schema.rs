//! Telemetry variable descriptor types

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::VariableType;

/// Descriptor table discovered from the region's header records.
///
/// Lookup is O(1) by name; iteration follows record order. Deserialization
/// goes through [`DescriptorTable::new`], so the same invariants hold.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DescriptorTable {
    /// Map of variable names to their descriptors
    variables: HashMap<String, VariableDescriptor>,
    /// Variable names in header record order
    order: Vec<String>,
}

impl DescriptorTable {
    /// Build a table, rejecting empty and duplicate names.
    pub fn new(descriptors: Vec<VariableDescriptor>) -> crate::Result<Self> {
        let mut variables = HashMap::with_capacity(descriptors.len());
        let mut order = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if descriptor.name.is_empty() {
                return Err(crate::TelemetryError::header_corrupt(
                    descriptor.source_offset,
                    "Empty variable name inside the descriptor table",
                ));
            }

            if variables.contains_key(&descriptor.name) {
                return Err(crate::TelemetryError::header_corrupt(
                    descriptor.source_offset,
                    format!("Duplicate variable name '{}'", descriptor.name),
                ));
            }

            order.push(descriptor.name.clone());
            variables.insert(descriptor.name.clone(), descriptor);
        }

        Ok(Self { variables, order })
    }

    /// Get a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.get(name)
    }

    /// Check if a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the table holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptors in header record order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.order.iter().filter_map(|name| self.variables.get(name))
    }
}

#[derive(Deserialize)]
struct RawDescriptorTable {
    variables: HashMap<String, VariableDescriptor>,
    order: Vec<String>,
}

impl<'de> Deserialize<'de> for DescriptorTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawDescriptorTable { mut variables, order } =
            RawDescriptorTable::deserialize(deserializer)?;

        if variables.len() != order.len() {
            return Err(D::Error::custom(format!(
                "{} descriptors but {} ordered names",
                variables.len(),
                order.len()
            )));
        }

        let descriptors = order
            .iter()
            .map(|name| match variables.remove(name) {
                Some(descriptor) if descriptor.name == *name => Ok(descriptor),
                Some(descriptor) => Err(D::Error::custom(format!(
                    "descriptor '{}' stored under key '{}'",
                    descriptor.name, name
                ))),
                None => Err(D::Error::custom(format!("no descriptor for '{name}'"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(descriptors).map_err(D::Error::custom)
    }
}

/// One telemetry variable as declared by its header record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct VariableDescriptor {
    /// Variable name as declared by the producer
    pub name: String,
    /// Declared data type
    pub var_type: VariableType,
    /// Width in bytes of one value of `var_type`
    pub byte_size: usize,
    /// Byte position of the header record in the region (not the data offset)
    pub source_offset: usize,
    /// Human-readable description, empty when the record carries none
    pub description: String,
    /// Units of measurement (e.g. "m/s"), empty when the record carries none
    pub unit: String,
}

impl VariableDescriptor {
    /// Descriptor with the byte size implied by `var_type`.
    pub fn new(name: impl Into<String>, var_type: VariableType, source_offset: usize) -> Self {
        Self {
            name: name.into(),
            var_type,
            byte_size: var_type.size(),
            source_offset,
            description: String::new(),
            unit: String::new(),
        }
    }
}
