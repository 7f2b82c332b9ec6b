//! Parsing and formatting of Kubernetes resource quantities
//!
//! The console works with plain integers internally (millicores, MiB, GiB)
//! and converts to/from the quantity strings carried by cluster documents
//! ("1500m", "1024Mi", "3Gi").

use crate::reconcile::error::{Error, Result};

/// Parse a CPU quantity into millicores.
///
/// Accepts the millicore form ("1500m") and the decimal core form
/// ("1", "0.5").
pub fn parse_cpu_millis(quantity: &str) -> Result<i64> {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return Err(Error::InvalidQuantity("empty cpu quantity".to_string()));
    }

    if let Some(millis) = quantity.strip_suffix('m') {
        return millis
            .parse::<i64>()
            .map_err(|_| Error::InvalidQuantity(format!("invalid cpu quantity: {quantity}")));
    }

    let cores: f64 = quantity
        .parse()
        .map_err(|_| Error::InvalidQuantity(format!("invalid cpu quantity: {quantity}")))?;
    Ok((cores * 1000.0).round() as i64)
}

/// Parse a memory quantity into mebibytes. Requires a Mi, Gi, or Ti suffix.
pub fn parse_memory_mib(quantity: &str) -> Result<i64> {
    let (value, unit) = split_binary_suffix(quantity)?;
    let mib = match unit {
        "Mi" => value,
        "Gi" => value * 1024.0,
        "Ti" => value * 1024.0 * 1024.0,
        _ => {
            return Err(Error::InvalidQuantity(format!(
                "memory quantity must end with Mi, Gi, or Ti: {quantity}"
            )));
        }
    };
    Ok(mib.round() as i64)
}

/// Parse a storage quantity into gibibytes (rounded up for sub-GiB values).
pub fn parse_storage_gib(quantity: &str) -> Result<i64> {
    let (value, unit) = split_binary_suffix(quantity)?;
    let gib = match unit {
        "Mi" => (value / 1024.0).ceil(),
        "Gi" => value,
        "Ti" => value * 1024.0,
        _ => {
            return Err(Error::InvalidQuantity(format!(
                "storage quantity must end with Mi, Gi, or Ti: {quantity}"
            )));
        }
    };
    Ok(gib.round() as i64)
}

fn split_binary_suffix(quantity: &str) -> Result<(f64, &str)> {
    let quantity = quantity.trim();
    if quantity.len() < 3 {
        return Err(Error::InvalidQuantity(format!(
            "quantity too short: {quantity:?}"
        )));
    }

    let (num_str, unit) = quantity.split_at(quantity.len() - 2);
    let value: f64 = num_str
        .parse()
        .map_err(|_| Error::InvalidQuantity(format!("invalid quantity number: {quantity}")))?;
    Ok((value, unit))
}

/// Format millicores as a CPU quantity string.
pub fn format_cpu(millis: i64) -> String {
    format!("{millis}m")
}

/// Format mebibytes as a memory quantity string.
pub fn format_memory(mib: i64) -> String {
    format!("{mib}Mi")
}

/// Format gibibytes as a storage quantity string.
pub fn format_storage(gib: i64) -> String {
    format!("{gib}Gi")
}
