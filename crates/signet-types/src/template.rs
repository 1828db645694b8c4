//! Reusable document templates
//!
//! A template carries a field layout and a set of fill-in variables, so a
//! document can be drafted with its field assignments already in place
//! before any recipient exists. System templates are shared; custom
//! templates belong to one owner.

use crate::{Field, FileRef, TemplateId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Contract,
    Nda,
    Proposal,
    Invoice,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Text,
    Date,
    Textarea,
}

/// A fill-in variable declared by a template
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    pub label: String,
    pub kind: VariableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub required: bool,
}

/// A reusable field layout plus variables
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    /// System templates are readable by every authenticated owner.
    pub system: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<FileRef>,
    pub fields: Vec<Field>,
    pub variables: Vec<TemplateVariable>,
}

impl Template {
    pub fn custom(
        owner_id: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
        category: TemplateCategory,
    ) -> Self {
        Self {
            id: TemplateId::generate(),
            name: name.into(),
            description: description.into(),
            category,
            system: false,
            owner_id: Some(owner_id),
            pdf_file: None,
            fields: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_variables(mut self, variables: Vec<TemplateVariable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_pdf(mut self, file: FileRef) -> Self {
        self.pdf_file = Some(file);
        self
    }

    /// Whether `user_id` may read this template.
    pub fn readable_by(&self, user_id: &UserId) -> bool {
        self.system || self.owner_id.as_ref() == Some(user_id)
    }

    /// Whether `user_id` may edit or delete this template.
    pub fn editable_by(&self, user_id: &UserId) -> bool {
        !self.system && self.owner_id.as_ref() == Some(user_id)
    }
}
