//! Handler declaration module
//!
//! A handler is a route suffix plus an ordered parameter list and an
//! invocation closure. The dispatcher binds arguments from the request
//! according to the parameter kinds, then hands them to the closure
//! through an `Exchange`.

use std::sync::Arc;

use super::catalog::simple_type_name;
use super::registry::BeanRef;
use crate::error::HandlerError;
use crate::web::{WebRequest, WebResponse};

/// Value kinds the binder set supports; nothing else is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Int,
    Float,
    Double,
}

impl ValueKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// One declared handler parameter, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpec {
    /// Bind the live request object.
    Request,
    /// Bind the live response object.
    Response,
    /// Bind a named request parameter value.
    Value {
        /// Declared parameter name.
        name: &'static str,
        /// Explicit binding name; overrides `name` when set.
        bound: Option<&'static str>,
        kind: ValueKind,
    },
}

impl ParamSpec {
    pub const fn request() -> Self {
        Self::Request
    }

    pub const fn response() -> Self {
        Self::Response
    }

    pub const fn text(name: &'static str) -> Self {
        Self::Value {
            name,
            bound: None,
            kind: ValueKind::Text,
        }
    }

    pub const fn int(name: &'static str) -> Self {
        Self::Value {
            name,
            bound: None,
            kind: ValueKind::Int,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self::Value {
            name,
            bound: None,
            kind: ValueKind::Float,
        }
    }

    pub const fn double(name: &'static str) -> Self {
        Self::Value {
            name,
            bound: None,
            kind: ValueKind::Double,
        }
    }

    /// Attach an explicit binding name, like a parameter marker argument.
    #[must_use]
    pub const fn bound_to(self, binding: &'static str) -> Self {
        match self {
            Self::Value { name, kind, .. } => Self::Value {
                name,
                bound: Some(binding),
                kind,
            },
            other => other,
        }
    }

    /// The key used to look up the parameter value in the request.
    pub const fn binding_name(&self) -> Option<&'static str> {
        match *self {
            Self::Value { name, bound, .. } => Some(match bound {
                Some(b) => b,
                None => name,
            }),
            _ => None,
        }
    }
}

/// One bound argument, produced by the dispatcher's binder set
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Placeholder for the live request, read from the exchange.
    Request,
    /// Placeholder for the live response, written through the exchange.
    Response,
    Text(Option<String>),
    Int(Option<i32>),
    Float(Option<f32>),
    Double(Option<f64>),
}

/// Everything a handler invocation sees: the bound argument list plus the
/// live request and response objects.
pub struct Exchange<'a> {
    handler: &'static str,
    args: Vec<Arg>,
    pub request: &'a WebRequest,
    pub response: &'a mut WebResponse,
}

impl<'a> Exchange<'a> {
    pub fn new(
        handler: &'static str,
        args: Vec<Arg>,
        request: &'a WebRequest,
        response: &'a mut WebResponse,
    ) -> Self {
        Self {
            handler,
            args,
            request,
            response,
        }
    }

    fn arg(&self, index: usize) -> Result<&Arg, HandlerError> {
        self.args.get(index).ok_or(HandlerError::ArgIndex {
            handler: self.handler,
            index,
        })
    }

    fn kind_error(&self, index: usize, expected: &'static str) -> HandlerError {
        HandlerError::ArgKind {
            handler: self.handler,
            index,
            expected,
        }
    }

    /// Bound text value at `index`; `None` when the parameter was absent.
    pub fn text(&self, index: usize) -> Result<Option<&str>, HandlerError> {
        match self.arg(index)? {
            Arg::Text(value) => Ok(value.as_deref()),
            _ => Err(self.kind_error(index, "text")),
        }
    }

    pub fn int(&self, index: usize) -> Result<Option<i32>, HandlerError> {
        match self.arg(index)? {
            Arg::Int(value) => Ok(*value),
            _ => Err(self.kind_error(index, "int")),
        }
    }

    pub fn float(&self, index: usize) -> Result<Option<f32>, HandlerError> {
        match self.arg(index)? {
            Arg::Float(value) => Ok(*value),
            _ => Err(self.kind_error(index, "float")),
        }
    }

    pub fn double(&self, index: usize) -> Result<Option<f64>, HandlerError> {
        match self.arg(index)? {
            Arg::Double(value) => Ok(*value),
            _ => Err(self.kind_error(index, "double")),
        }
    }
}

type InvokeFn = Box<dyn Fn(&BeanRef, &mut Exchange<'_>) -> Result<(), HandlerError> + Send + Sync>;

/// One route-mapped method on a controller
pub struct HandlerSpec {
    route: &'static str,
    name: &'static str,
    params: Vec<ParamSpec>,
    invoke: InvokeFn,
}

impl HandlerSpec {
    /// Declare a handler on a controller of type `C`. The closure receives
    /// the downcast bean and the exchange; a wrong bean type is an
    /// invocation error, not a panic.
    pub fn new<C: Send + Sync + 'static>(
        route: &'static str,
        name: &'static str,
        params: Vec<ParamSpec>,
        handler: impl Fn(&C, &mut Exchange<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        let invoke: InvokeFn = Box::new(move |bean, exchange| {
            let bean = bean
                .downcast_ref::<C>()
                .ok_or_else(|| HandlerError::WrongBeanType {
                    handler: exchange.handler,
                    expected: simple_type_name::<C>(),
                })?;
            handler(bean, exchange)
        });
        Arc::new(Self {
            route,
            name,
            params,
            invoke,
        })
    }

    /// Method-level route suffix.
    pub fn route(&self) -> &'static str {
        self.route
    }

    /// Method name, for diagnostics and route logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn invoke(&self, bean: &BeanRef, exchange: &mut Exchange<'_>) -> Result<(), HandlerError> {
        (self.invoke)(bean, exchange)
    }
}

impl std::fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("route", &self.route)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
