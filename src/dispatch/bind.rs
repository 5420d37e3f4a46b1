//! Parameter binding module
//!
//! The closed binder set: each declared parameter kind has exactly one
//! binding rule, selected by its tag. Absent values pass through as
//! `None`; a present value that fails numeric parsing is fatal for the
//! request.

use crate::container::handler::{Arg, ParamSpec, ValueKind};
use crate::error::BindError;
use crate::web::WebRequest;

/// Bind every declared parameter, in declaration order.
pub fn bind_args(params: &[ParamSpec], request: &WebRequest) -> Result<Vec<Arg>, BindError> {
    params
        .iter()
        .map(|spec| bind_one(spec, request))
        .collect()
}

fn bind_one(spec: &ParamSpec, request: &WebRequest) -> Result<Arg, BindError> {
    match spec {
        ParamSpec::Request => Ok(Arg::Request),
        ParamSpec::Response => Ok(Arg::Response),
        ParamSpec::Value { kind, .. } => {
            // binding_name() is always present for Value specs
            let name = spec.binding_name().unwrap_or_default();
            let raw = request.parameter(name);
            bind_value(*kind, name, raw)
        }
    }
}

fn bind_value(kind: ValueKind, name: &str, raw: Option<&str>) -> Result<Arg, BindError> {
    match kind {
        ValueKind::Text => Ok(Arg::Text(raw.map(ToString::to_string))),
        ValueKind::Int => raw
            .map(|value| {
                value.parse::<i32>().map_err(|source| BindError::IntCoercion {
                    name: name.to_string(),
                    value: value.to_string(),
                    kind: kind.label(),
                    source,
                })
            })
            .transpose()
            .map(Arg::Int),
        ValueKind::Float => raw
            .map(|value| {
                value.parse::<f32>().map_err(|source| BindError::Coercion {
                    name: name.to_string(),
                    value: value.to_string(),
                    kind: kind.label(),
                    source,
                })
            })
            .transpose()
            .map(Arg::Float),
        ValueKind::Double => raw
            .map(|value| {
                value.parse::<f64>().map_err(|source| BindError::Coercion {
                    name: name.to_string(),
                    value: value.to_string(),
                    kind: kind.label(),
                    source,
                })
            })
            .transpose()
            .map(Arg::Double),
    }
}
