//! Validation of edit forms before the pipeline starts
//!
//! Malformed or out-of-range input is rejected here and never reaches the
//! reconciliation core.

use std::collections::HashSet;

use crate::form::DbEditForm;
use crate::reconcile::error::{Error, Result};

/// Minimum number of replicas per component
pub const MIN_REPLICAS: i32 = 1;

/// Maximum number of replicas per component (safety limit)
pub const MAX_REPLICAS: i32 = 20;

/// Minimum data volume size in GiB
pub const MIN_STORAGE_GI: i64 = 1;

/// Maximum data volume size in GiB
pub const MAX_STORAGE_GI: i64 = 300;

/// Maximum database name length (leaves room for generated suffixes on
/// derived resource names)
pub const MAX_NAME_LEN: usize = 30;

/// Validate the whole edit form.
pub fn validate_form(form: &DbEditForm) -> Result<()> {
    validate_name(&form.db_name)?;
    validate_components(form)?;
    for resource in &form.resources {
        validate_allocation(form, &resource.name)?;
    }
    validate_backup(form)?;
    Ok(())
}

/// Validate the database name (DNS-1123 label, bounded length).
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("database name is empty".to_string()));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "database name {name:?} exceeds {MAX_NAME_LEN} characters"
        )));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid_ends = name.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit())
        && name.ends_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit());

    if !valid_chars || !valid_ends {
        return Err(Error::Validation(format!(
            "database name {name:?} must be a lowercase DNS label"
        )));
    }

    Ok(())
}

/// Component names must be unique and belong to the database type.
fn validate_components(form: &DbEditForm) -> Result<()> {
    if form.resources.is_empty() {
        return Err(Error::Validation("no components requested".to_string()));
    }

    let known = form.db_type.components();
    let mut seen = HashSet::new();

    for resource in &form.resources {
        if !known.contains(&resource.name.as_str()) {
            return Err(Error::Validation(format!(
                "component {:?} is not valid for {}",
                resource.name, form.db_type
            )));
        }
        if !seen.insert(resource.name.as_str()) {
            return Err(Error::Validation(format!(
                "duplicate component {:?}",
                resource.name
            )));
        }
    }

    Ok(())
}

/// Validate one component's requested allocation.
fn validate_allocation(form: &DbEditForm, component: &str) -> Result<()> {
    let resource = form
        .resource_for(component)
        .ok_or_else(|| Error::Validation(format!("unknown component {component:?}")))?;

    if resource.cpu <= 0 {
        return Err(Error::Validation(format!(
            "component {component:?}: cpu must be positive"
        )));
    }

    if resource.memory <= 0 {
        return Err(Error::Validation(format!(
            "component {component:?}: memory must be positive"
        )));
    }

    if resource.replicas < MIN_REPLICAS {
        return Err(Error::Validation(format!(
            "component {component:?}: replica count {} is below minimum {MIN_REPLICAS}",
            resource.replicas
        )));
    }

    if resource.replicas > MAX_REPLICAS {
        return Err(Error::Validation(format!(
            "component {component:?}: replica count {} exceeds maximum {MAX_REPLICAS}",
            resource.replicas
        )));
    }

    if resource.storage < MIN_STORAGE_GI {
        return Err(Error::Validation(format!(
            "component {component:?}: storage {}Gi is below minimum {MIN_STORAGE_GI}Gi",
            resource.storage
        )));
    }

    if resource.storage > MAX_STORAGE_GI {
        return Err(Error::Validation(format!(
            "component {component:?}: storage {}Gi exceeds maximum {MAX_STORAGE_GI}Gi",
            resource.storage
        )));
    }

    Ok(())
}

/// Validate the auto-backup schedule when present.
fn validate_backup(form: &DbEditForm) -> Result<()> {
    let Some(backup) = &form.auto_backup else {
        return Ok(());
    };

    if !backup.enabled {
        return Ok(());
    }

    if !form.db_type.supports_auto_backup() {
        return Err(Error::Validation(format!(
            "{} does not support scheduled backups",
            form.db_type
        )));
    }

    if backup.hour > 23 {
        return Err(Error::Validation(format!(
            "backup hour {} out of range",
            backup.hour
        )));
    }

    if backup.minute > 59 {
        return Err(Error::Validation(format!(
            "backup minute {} out of range",
            backup.minute
        )));
    }

    if backup.week.iter().any(|d| *d > 6) {
        return Err(Error::Validation("backup weekday out of range".to_string()));
    }

    if backup.retention_value == 0 {
        return Err(Error::Validation(
            "backup retention must be positive".to_string(),
        ));
    }

    Ok(())
}
