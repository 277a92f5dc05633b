use std::io;
use env_logger::fmt::Formatter;
use log::Record;
use crate::config::settings::Settings;

tokio::task_local! {
    /// Id of the request whose task is logging, set by the handler.
    pub static REQUEST_ID: String;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|request_id| request_id.clone()).ok()
}

pub fn parse_level(level: &str) -> log::LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

/// ECS line, with the message prefixed by the current task's request id.
fn format(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    match current_request_id() {
        Some(request_id) => ecs_logger::format(
            buf,
            &Record::builder()
                .args(format_args!("[request_id={request_id}] {}", record.args()))
                .level(record.level())
                .target(record.target())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        ),
        None => ecs_logger::format(buf, record),
    }
}

pub fn setup_logger(settings: &Settings) {
    let log_level = settings
        .logger
        .as_ref()
        .map(|logger| parse_level(&logger.level))
        .unwrap_or(log::LevelFilter::Info);

    env_logger::builder()
        .filter_level(log_level)
        .format(format)
        .target(env_logger::Target::Stdout)
        .init();
}
