//! The four datasets behind a figure and where each one is drawn.

use crate::{dataset::Dataset, field::FieldKind};

/// A panel position. Variants are declared in row-major layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    RawSst,
    CloudFreeSst,
    RawChlorophyll,
    CloudFreeChlorophyll,
}

impl Role {
    pub fn kind(&self) -> FieldKind {
        match self {
            Role::RawSst | Role::CloudFreeSst => FieldKind::SeaSurfaceTemperature,
            Role::RawChlorophyll | Role::CloudFreeChlorophyll => FieldKind::Chlorophyll,
        }
    }

    pub fn is_cloud_free(&self) -> bool {
        matches!(self, Role::CloudFreeSst | Role::CloudFreeChlorophyll)
    }

    /// e.g. `Original SST (°C)` or `Cloud Free Chl-a (mg/m³)`.
    pub fn panel_title(&self) -> String {
        let source = if self.is_cloud_free() { "Cloud Free" } else { "Original" };
        let quantity = match self.kind() {
            FieldKind::SeaSurfaceTemperature => "SST",
            FieldKind::Chlorophyll => "Chl-a",
        };

        format!("{} {} ({})", source, quantity, self.kind().units())
    }
}

/// An opened dataset and the variable plotted from it.
pub struct Layer {
    pub role: Role,
    pub variable: String,
    pub dataset: Box<dyn Dataset>,
}

impl Layer {
    pub fn new(role: Role, variable: &str, dataset: Box<dyn Dataset>) -> Self {
        Layer {
            role,
            variable: variable.to_string(),
            dataset,
        }
    }

    pub fn label(&self) -> &str {
        self.dataset.label()
    }
}

// -- Tests -------------------------------------------------------------------
