//! Logger module
//!
//! Provides logging utilities for the MVC runtime including:
//! - Bootstrap phase logging (scan, instantiation, wiring, route mapping)
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, route_count: usize) {
    write_info("======================================");
    write_info("MVC runtime started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Scan package: {}",
        config.container.scan_package
    ));
    write_info(&format!("Mapped routes: {route_count}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info("======================================\n");
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

// Bootstrap phase logging

pub fn log_scan_result(root: &str, count: usize) {
    write_info(&format!("[Scan] {count} components under package '{root}'"));
}

pub fn log_bean_registered(bean_name: &str, qualified_name: &str) {
    write_info(&format!("[Bean] {bean_name} <- {qualified_name}"));
}

pub fn log_bean_overwritten(bean_name: &str, qualified_name: &str) {
    write_error(&format!(
        "[WARN] Bean name '{bean_name}' already registered, overwritten by {qualified_name}"
    ));
}

pub fn log_component_skipped(qualified_name: &str, reason: &str) {
    write_error(&format!("[WARN] Skipped {qualified_name}: {reason}"));
}

pub fn log_dependency_unresolved(bean: &str, slot: &str, target: &str) {
    write_error(&format!(
        "[WARN] Bean '{bean}' slot '{slot}' left empty: no bean named '{target}'"
    ));
}

pub fn log_route_mapped(url: &str, handler: &str) {
    write_info(&format!("[Route] {url} -> {handler}"));
}

pub fn log_route_collision(url: &str, winner: &str, loser: &str) {
    write_error(&format!(
        "[WARN] Route '{url}' already mapped to {winner}; ignoring {loser}"
    ));
}

pub fn log_bootstrap_report(report_json: &str) {
    write_info(&format!("[Bootstrap] {report_json}"));
}

// Dispatch phase logging

pub fn log_dispatch_error(path: &str, err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Dispatch failed for '{path}': {err}"));
}
