//! Template operations
//!
//! Templates are the only way a field layout exists before a document
//! does. System templates are shared read-only; custom templates are
//! owner-scoped. Drafting from a template copies the layout, resolves the
//! declared variables against caller values and defaults, and then hands
//! off to the ordinary creation path, so quotas apply identically.

use crate::{Caller, CreateDocument, Engine};
use signet_types::{
    Field, FileRef, SignetError, SignetResult, Template, TemplateCategory, TemplateId,
    TemplateVariable,
};
use std::collections::HashMap;
use tracing::info;

/// Caller-supplied description of a template
#[derive(Clone, Debug)]
pub struct TemplateSpec {
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub pdf_file: Option<FileRef>,
    pub fields: Vec<Field>,
    pub variables: Vec<TemplateVariable>,
}

/// Input to [`Engine::create_document_from_template`]
#[derive(Clone, Debug)]
pub struct DraftFromTemplate {
    pub template_id: TemplateId,
    pub title: String,
    pub variable_values: HashMap<String, String>,
}

impl Engine {
    /// Create a custom template owned by the caller.
    pub async fn create_template(
        &self,
        caller: &Caller,
        spec: TemplateSpec,
    ) -> SignetResult<TemplateId> {
        let user = self.resolve_user(caller).await?;

        let mut template = Template::custom(user.id, spec.name, spec.description, spec.category)
            .with_fields(spec.fields)
            .with_variables(spec.variables);
        if let Some(file) = spec.pdf_file {
            template = template.with_pdf(file);
        }

        let template_id = template.id.clone();
        self.store.insert_template(template).await?;
        info!(template_id = %template_id, "template created");
        Ok(template_id)
    }

    /// Replace a custom template's contents. System templates and other
    /// owners' templates are off-limits.
    pub async fn update_template(
        &self,
        caller: &Caller,
        template_id: &TemplateId,
        spec: TemplateSpec,
    ) -> SignetResult<()> {
        let user = self.resolve_user(caller).await?;
        let mut template = self
            .store
            .template(template_id)
            .await?
            .ok_or_else(|| SignetError::not_found("Template"))?;
        if !template.editable_by(&user.id) {
            return Err(SignetError::unauthorized(
                "Not authorized to modify this template",
            ));
        }

        template.name = spec.name;
        template.description = spec.description;
        template.category = spec.category;
        template.pdf_file = spec.pdf_file;
        template.fields = spec.fields;
        template.variables = spec.variables;
        self.store.update_template(template).await
    }

    /// Delete a custom template.
    pub async fn delete_template(
        &self,
        caller: &Caller,
        template_id: &TemplateId,
    ) -> SignetResult<()> {
        let user = self.resolve_user(caller).await?;
        let template = self
            .store
            .template(template_id)
            .await?
            .ok_or_else(|| SignetError::not_found("Template"))?;
        if !template.editable_by(&user.id) {
            return Err(SignetError::unauthorized(
                "Not authorized to modify this template",
            ));
        }
        self.store.delete_template(template_id).await
    }

    /// Fetch one template the caller may read.
    pub async fn get_template(
        &self,
        caller: &Caller,
        template_id: &TemplateId,
    ) -> SignetResult<Template> {
        let user = self.resolve_user(caller).await?;
        let template = self
            .store
            .template(template_id)
            .await?
            .ok_or_else(|| SignetError::not_found("Template"))?;
        if !template.readable_by(&user.id) {
            return Err(SignetError::not_found("Template"));
        }
        Ok(template)
    }

    /// The shared system template catalog.
    pub async fn list_system_templates(&self, caller: &Caller) -> SignetResult<Vec<Template>> {
        self.resolve_user(caller).await?;
        self.store.system_templates().await
    }

    /// The caller's own custom templates.
    pub async fn list_my_templates(&self, caller: &Caller) -> SignetResult<Vec<Template>> {
        let user = self.resolve_user(caller).await?;
        self.store.templates_by_owner(&user.id).await
    }

    /// Draft a document from a template: the field layout is copied, the
    /// declared variables are resolved against caller values falling back
    /// to defaults, and a missing required variable fails validation.
    pub async fn create_document_from_template(
        &self,
        caller: &Caller,
        request: DraftFromTemplate,
    ) -> SignetResult<signet_types::DocumentId> {
        let template = self.get_template(caller, &request.template_id).await?;

        let pdf_file = template
            .pdf_file
            .clone()
            .ok_or_else(|| SignetError::validation("Template has no PDF attached"))?;

        let mut values = request.variable_values;
        for variable in &template.variables {
            if values.contains_key(&variable.name) {
                continue;
            }
            if let Some(default) = &variable.default_value {
                values.insert(variable.name.clone(), default.clone());
            } else if variable.required {
                return Err(SignetError::validation(format!(
                    "Required variable \"{}\" is not set",
                    variable.label
                )));
            }
        }

        self.create_document(
            caller,
            CreateDocument {
                title: request.title,
                template_id: Some(template.id),
                original_file: pdf_file,
                variable_values: values,
                fields: template.fields,
            },
        )
        .await
    }
}
