//! User demo components
//!
//! A controller/service pair showing the full wiring surface: a service
//! registered under an explicit bean name, a controller depending on it
//! through an `Injected` slot, and route-mapped handlers with bound
//! parameters.

use serde::Serialize;
use std::sync::Arc;

use crate::container::{
    dependency, Catalog, ComponentDef, Exchange, HandlerSpec, Injected, ParamSpec,
};
use crate::error::HandlerError;

/// Demo credential and profile table
const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("admin", "123456", "Administrator"),
    ("guest", "guest", "Guest Account"),
];

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub nickname: String,
}

/// Account lookup and credential checks against the demo table
pub struct UserService;

impl UserService {
    pub fn login(&self, username: Option<&str>, password: Option<&str>) -> String {
        match (username, password) {
            (Some(username), Some(password))
                if DEMO_USERS
                    .iter()
                    .any(|(u, p, _)| *u == username && *p == password) =>
            {
                format!("welcome, {username}!")
            }
            _ => "login failed: bad credentials".to_string(),
        }
    }

    pub fn find(&self, username: &str) -> Option<UserInfo> {
        DEMO_USERS
            .iter()
            .find(|(u, _, _)| *u == username)
            .map(|(u, _, nick)| UserInfo {
                username: (*u).to_string(),
                nickname: (*nick).to_string(),
            })
    }
}

/// Request handlers under the `/user` prefix
pub struct UserController {
    service: Injected<UserService>,
}

impl UserController {
    fn service(&self) -> Result<&UserService, HandlerError> {
        self.service
            .get()
            .ok_or_else(|| HandlerError::failed("userService not wired"))
    }

    /// `/user/login?username=...&password=...`
    fn login(&self, exchange: &mut Exchange<'_>) -> Result<(), HandlerError> {
        let username = exchange.text(2)?.map(ToString::to_string);
        let password = exchange.text(3)?.map(ToString::to_string);
        let info = self
            .service()?
            .login(username.as_deref(), password.as_deref());
        exchange.response.write(&info);
        Ok(())
    }

    /// `/user/info?username=...` — JSON profile lookup
    fn info(&self, exchange: &mut Exchange<'_>) -> Result<(), HandlerError> {
        let username = exchange.text(1)?.unwrap_or_default().to_string();
        match self.service()?.find(&username) {
            Some(user) => {
                let json = serde_json::to_string(&user)
                    .map_err(|e| HandlerError::failed(format!("serialize profile: {e}")))?;
                exchange.response.set_header("Content-Type", "application/json");
                exchange.response.write(&json);
            }
            None => {
                exchange.response.set_status(404);
                exchange.response.write("no such user");
            }
        }
        Ok(())
    }
}

/// Register the user package's components.
pub(super) fn register(catalog: &mut Catalog) {
    catalog.register(
        ComponentDef::service("modules.user.UserService")
            .named("userService")
            .provide(|| Ok(UserService)),
    );

    catalog.register(
        ComponentDef::controller("modules.user.UserController", "/user")
            .provide(|| {
                Ok(UserController {
                    service: Injected::empty(),
                })
            })
            .depend(
                dependency("service", |c: &UserController| &c.service).qualified("userService"),
            )
            .handle(login_handler())
            .handle(info_handler()),
    );

    // data type with no role marker; discovered by the scanner, skipped by
    // the instantiator
    catalog.register(ComponentDef::plain("modules.user.UserInfo"));
}

fn login_handler() -> Arc<HandlerSpec> {
    HandlerSpec::new(
        "/login",
        "login",
        vec![
            ParamSpec::request(),
            ParamSpec::response(),
            ParamSpec::text("username").bound_to("username"),
            ParamSpec::text("password").bound_to("password"),
        ],
        |controller: &UserController, exchange| controller.login(exchange),
    )
}

fn info_handler() -> Arc<HandlerSpec> {
    HandlerSpec::new(
        "/info",
        "info",
        vec![ParamSpec::response(), ParamSpec::text("username")],
        |controller: &UserController, exchange| controller.info(exchange),
    )
}
