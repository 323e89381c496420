//! Record addressing for update and delete endpoints.

use std::collections::HashMap;

use anyhow::anyhow;

use dashboard_core::{AppError, parse_id};

/// How a delete request names its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(i64),
    Name(String),
}

fn present<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a String> {
    params.get(key).filter(|v| !v.is_empty())
}

/// Reads `id`, falling back to `name_param`. Empty values count as absent
/// and `id` wins when both are present.
pub fn delete_target(
    params: &HashMap<String, String>,
    name_param: &'static str,
) -> Result<Target, AppError> {
    if let Some(raw) = present(params, "id") {
        return Ok(Target::Id(parse_id(raw)?));
    }
    present(params, name_param)
        .map(|name| Target::Name(name.clone()))
        .ok_or_else(|| AppError::bad_request(anyhow!("ID or {name_param} parameter is required")))
}

/// Reads a mandatory `id` query parameter.
pub fn id_param(params: &HashMap<String, String>) -> Result<i64, AppError> {
    let raw = present(params, "id")
        .ok_or_else(|| AppError::bad_request(anyhow!("ID parameter is required")))?;
    Ok(parse_id(raw)?)
}

/// Rejects update bodies without an `id`.
pub fn required_id(id: Option<i64>) -> Result<i64, AppError> {
    match id {
        Some(id) if id >= 1 => Ok(id),
        Some(_) => Err(AppError::bad_request(anyhow!("Invalid id parameter"))),
        None => Err(AppError::bad_request(anyhow!("ID is required"))),
    }
}
