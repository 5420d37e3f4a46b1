//! Dispatch module
//!
//! The per-request front controller: normalize the path, look up the
//! route, bind parameters, invoke the handler. Fully synchronous; the
//! async boundary lives in the host adapter. Reads only structures
//! frozen at bootstrap, so concurrent dispatch needs no locking.

mod bind;

pub use bind::bind_args;

use thiserror::Error;

use crate::config::Config;
use crate::container::handler::Exchange;
use crate::container::{BeanRegistry, Container};
use crate::error::{BindError, HandlerError};
use crate::logger;
use crate::routing::{normalize_path, strip_context, RouteEntry, RouteTable};
use crate::web::{WebRequest, WebResponse};

const NOT_FOUND_BODY: &str = "404 NOT FOUND!";
const SERVER_ERROR_BODY: &str = "500!! Server Exception";

/// Anything that aborts one request between lookup and handler return
#[derive(Debug, Error)]
enum DispatchFailure {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// The front controller. Owns the route table and, through the registry,
/// every bean instance for the process lifetime.
pub struct Dispatcher {
    routes: RouteTable,
    #[allow(dead_code)]
    registry: BeanRegistry,
    context_path: String,
    content_type: String,
    server_name: String,
}

impl Dispatcher {
    /// Take ownership of a bootstrapped container and freeze it behind
    /// the request-handling surface.
    pub fn new(container: Container, config: &Config) -> Self {
        Self {
            routes: container.routes,
            registry: container.registry,
            context_path: config.container.context_path.clone(),
            content_type: config.http.default_content_type.clone(),
            server_name: config.http.server_name.clone(),
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Handle one request. Never panics and never returns an error; the
    /// worst outcome is the fixed 500 body for this request only.
    pub fn dispatch(&self, request: &WebRequest) -> WebResponse {
        let mut response = WebResponse::new();
        let path = normalize_path(strip_context(request.path(), &self.context_path));

        let Some(entry) = self.routes.lookup(&path) else {
            response.set_status(404);
            response.write(NOT_FOUND_BODY);
            return response;
        };

        response.set_header("Content-Type", &self.content_type);
        response.set_header("Server", &self.server_name);

        if let Err(err) = Self::invoke(entry, request, &mut response) {
            logger::log_dispatch_error(&path, &err);
            response.set_status(500);
            response.replace_body(SERVER_ERROR_BODY);
        }
        response
    }

    fn invoke(
        entry: &RouteEntry,
        request: &WebRequest,
        response: &mut WebResponse,
    ) -> Result<(), DispatchFailure> {
        let args = bind_args(entry.handler.params(), request)?;
        let mut exchange = Exchange::new(entry.handler.name(), args, request, response);
        entry.handler.invoke(&entry.bean, &mut exchange)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ContainerConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    };
    use crate::container::{
        dependency, Catalog, ComponentDef, HandlerSpec, Injected, ParamSpec,
    };

    struct CounterService {
        step: i32,
    }

    struct CounterController {
        service: Injected<CounterService>,
    }

    fn test_config(context_path: &str) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            container: ContainerConfig {
                scan_package: "app".to_string(),
                context_path: context_path.to_string(),
                strict_wiring: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            http: HttpConfig {
                default_content_type: "text/html; charset=UTF-8".to_string(),
                server_name: "Tokio-Hyper-MVC/1.0".to_string(),
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
            },
        }
    }

    fn counter_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register(
            ComponentDef::service("app.CounterService").provide(|| Ok(CounterService { step: 10 })),
        );
        catalog.register(
            ComponentDef::controller("app.CounterController", "/counter")
                .provide(|| {
                    Ok(CounterController {
                        service: Injected::empty(),
                    })
                })
                .depend(dependency("service", |c: &CounterController| &c.service))
                .handle(HandlerSpec::new(
                    "/add",
                    "add",
                    vec![
                        ParamSpec::request(),
                        ParamSpec::response(),
                        ParamSpec::int("value"),
                    ],
                    |controller: &CounterController, exchange| {
                        let service = controller
                            .service
                            .get()
                            .ok_or_else(|| HandlerError::failed("counterService not wired"))?;
                        let value = exchange.int(2)?.unwrap_or(0);
                        let total = value + service.step;
                        exchange.response.write(&format!("total={total}"));
                        Ok(())
                    },
                ))
                .handle(HandlerSpec::new(
                    "/boom",
                    "boom",
                    vec![ParamSpec::response()],
                    |_: &CounterController, exchange| {
                        exchange.response.write("partial output");
                        Err(HandlerError::failed("exploded"))
                    },
                ))
                .handle(HandlerSpec::new(
                    "/echo",
                    "echo",
                    vec![ParamSpec::text("word").bound_to("w")],
                    |_: &CounterController, exchange| {
                        let word = exchange.text(0)?.unwrap_or("<absent>").to_string();
                        exchange.response.write(&word);
                        Ok(())
                    },
                )),
        );
        catalog
    }

    fn dispatcher(context_path: &str) -> Dispatcher {
        let config = test_config(context_path);
        let container = Container::bootstrap(&counter_catalog(), &config.container).unwrap();
        Dispatcher::new(container, &config)
    }

    #[test]
    fn test_unmapped_path_yields_exact_404_body() {
        let d = dispatcher("");
        let response = d.dispatch(&WebRequest::new("/nope"));
        assert_eq!(response.body(), "404 NOT FOUND!");
        assert_eq!(response.status(), 404);
        assert_eq!(response.header("Content-Type"), None);
    }

    #[test]
    fn test_resolved_route_binds_and_invokes() {
        let d = dispatcher("");
        let request = WebRequest::new("/counter/add").with_param("value", "32");
        let response = d.dispatch(&request);
        assert_eq!(response.body(), "total=42");
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.header("Content-Type"),
            Some("text/html; charset=UTF-8")
        );
        assert_eq!(response.header("Server"), Some("Tokio-Hyper-MVC/1.0"));
    }

    #[test]
    fn test_repeated_separators_normalized_before_lookup() {
        let d = dispatcher("");
        let request = WebRequest::new("//counter///add").with_param("value", "0");
        assert_eq!(d.dispatch(&request).body(), "total=10");
    }

    #[test]
    fn test_context_path_stripped() {
        let d = dispatcher("/app");
        let request = WebRequest::new("/app/counter/add").with_param("value", "5");
        assert_eq!(d.dispatch(&request).body(), "total=15");
    }

    #[test]
    fn test_handler_failure_yields_exact_500_body() {
        let d = dispatcher("");
        let response = d.dispatch(&WebRequest::new("/counter/boom"));
        assert_eq!(response.body(), "500!! Server Exception");
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_coercion_failure_yields_500() {
        let d = dispatcher("");
        let request = WebRequest::new("/counter/add").with_param("value", "forty-two");
        let response = d.dispatch(&request);
        assert_eq!(response.body(), "500!! Server Exception");
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_absent_numeric_parameter_is_not_an_error() {
        let d = dispatcher("");
        assert_eq!(d.dispatch(&WebRequest::new("/counter/add")).body(), "total=10");
    }

    #[test]
    fn test_explicit_binding_name_resolves_parameter() {
        let d = dispatcher("");
        let request = WebRequest::new("/counter/echo").with_param("w", "hello");
        assert_eq!(d.dispatch(&request).body(), "hello");
        // the declared name is not consulted once a binding name is set
        let request = WebRequest::new("/counter/echo").with_param("word", "hello");
        assert_eq!(d.dispatch(&request).body(), "<absent>");
    }

    #[test]
    fn test_dispatch_is_idempotent_for_same_raw_path() {
        let d = dispatcher("");
        let request = WebRequest::new("//counter/add").with_param("value", "1");
        assert_eq!(d.dispatch(&request).body(), d.dispatch(&request).body());
    }
}
