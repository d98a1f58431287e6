//! Product records as they travel between the UI, the catalog and the store.
//!
//! A [`Product`] always carries the id the store assigned to it. A
//! [`ProductDraft`] is the same field set before the store has seen it, and a
//! [`ProductForm`] is the raw text the user typed into the manual form.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Message shown when the manual form is submitted with a blank field.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Complete todos los campos.";

const fn default_active() -> bool {
    true
}

/// A product persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the store
    pub id: i64,
    /// Display name
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    /// Free-text description
    #[serde(rename = "descripcion", alias = "description")]
    pub description: String,
    /// Units in stock
    #[serde(rename = "cantidad", alias = "quantity")]
    pub quantity: u32,
    /// Unit price
    #[serde(rename = "precio", alias = "price")]
    pub price: f64,
    /// Inactive products are hidden by the store
    #[serde(rename = "activo", alias = "active", default = "default_active")]
    pub active: bool,
}

impl Product {
    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// The same fields without the id.
    #[must_use]
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            price: self.price,
            active: self.active,
        }
    }
}

/// A product that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Display name
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    /// Free-text description
    #[serde(rename = "descripcion", alias = "description")]
    pub description: String,
    /// Units in stock
    #[serde(rename = "cantidad", alias = "quantity")]
    pub quantity: u32,
    /// Unit price
    #[serde(rename = "precio", alias = "price")]
    pub price: f64,
    /// Inactive products are hidden by the store
    #[serde(rename = "activo", alias = "active", default = "default_active")]
    pub active: bool,
}

impl ProductDraft {
    /// Builds an active draft, the only kind this client creates.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            quantity,
            price,
            active: true,
        }
    }

    /// Checks the field-level rules every store applies before saving.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if name or description is blank or the
    /// price is negative or not a finite number.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation {
                field: "name",
                message: "El nombre no puede estar vacío.".to_string(),
            });
        }
        if self.description.trim().is_empty() {
            return Err(Error::Validation {
                field: "description",
                message: "La descripción no puede estar vacía.".to_string(),
            });
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::Validation {
                field: "price",
                message: format!("Precio inválido: {}", self.price),
            });
        }
        Ok(())
    }
}

/// The four editable text fields of the manual form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    /// Name as typed
    pub name: String,
    /// Description as typed
    pub description: String,
    /// Price as typed; parsed on submit
    pub price: String,
    /// Quantity as typed; parsed on submit
    pub quantity: String,
}

impl ProductForm {
    /// Fills the form from a persisted product, as selecting a row does.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
        }
    }

    /// Sets one field by name. Returns `false` for an unknown field.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "name" | "nombre" => &mut self.name,
            "description" | "descripcion" => &mut self.description,
            "price" | "precio" => &mut self.price,
            "quantity" | "cantidad" => &mut self.quantity,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// True when every field is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parses the form into a draft.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if any field is blank or the price or
    /// quantity does not parse.
    pub fn to_draft(&self) -> Result<ProductDraft> {
        let fields = [&self.name, &self.description, &self.price, &self.quantity];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::Validation {
                field: "form",
                message: INCOMPLETE_FORM_MESSAGE.to_string(),
            });
        }

        let price: f64 = self.price.trim().parse().map_err(|_| Error::Validation {
            field: "price",
            message: format!("Precio inválido: {}", self.price.trim()),
        })?;
        let quantity: u32 = self.quantity.trim().parse().map_err(|_| Error::Validation {
            field: "quantity",
            message: format!("Cantidad inválida: {}", self.quantity.trim()),
        })?;

        let draft = ProductDraft::new(self.name.trim(), self.description.trim(), quantity, price);
        draft.validate()?;
        Ok(draft)
    }
}
