//! Basic logger usage example
//!
//! Demonstrates leveled logging, runtime settings, derived loggers and the
//! fatal exit path. Output goes to stderr.
//!
//! Run with: cargo run --example basic_usage

use logfmt_logger::prelude::*;
use logfmt_logger::{fields, info};
use std::io;

fn main() {
    let logger = Logger::new();

    // Basic log.
    logger.info("starting app");

    // Enable colored output.
    logger.set_color_output(true);

    // Change verbosity on the fly.
    logger.set_level(LogLevel::Debug);
    logger.debug("meant for debugging app");

    // Add extra keys to the log.
    logger
        .with_fields(fields!["component" => "api", "user" => "karan"])
        .info("logging with some extra metadata");

    // Log with error key.
    let err = io::Error::new(io::ErrorKind::Other, "this is a dummy error");
    logger.with_error(&err).error("error fetching details");

    // Enable the caller key and change the timestamp format.
    logger.set_caller_frame(true, 0);
    logger.set_timestamp_format(TimestampFormat::Rfc3339Nanos);

    // Fields carried by every line of a derived logger.
    let request_logger = logger.with_fields(fields![
        "request_id" => "3MG91VKP",
        "ip" => "1.1.1.1",
        "method" => "method=GET",
    ]);
    request_logger.info("request success");
    request_logger.warn("this isn't supposed to happen");
    info!(request_logger, "served in {}ms", 12);

    // Write the line, flush and exit with status 1.
    logger.fatal("goodbye world");
}
