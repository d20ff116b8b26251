//! Process termination after fatal records

/// Exit status used after a fatal record
pub const FATAL_EXIT_CODE: i32 = 1;

/// Ends the process once a fatal record has been written
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Calls `std::process::exit`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}
