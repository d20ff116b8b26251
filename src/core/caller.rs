//! Call-site resolution for the `caller` key

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Source location reported in the `caller` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl CallSite {
    /// Placeholder used when the call site cannot be resolved: `???:0`
    pub const UNKNOWN: CallSite = CallSite {
        file: Cow::Borrowed("???"),
        line: 0,
    };

    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        CallSite::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Resolves the call site of a log call
///
/// `origin` is the location captured by the `#[track_caller]` logging
/// methods; `skip` is the configured number of extra frames to skip.
/// Returning `None` makes the logger report [`CallSite::UNKNOWN`].
pub trait CallerResolver: Send + Sync {
    fn resolve(&self, origin: &'static Location<'static>, skip: usize) -> Option<CallSite>;
}

/// Default resolver
///
/// With `skip == 0` it reports the location tracked by `#[track_caller]`.
/// Otherwise it walks the native stack, finds the frame of the tracked call
/// and reports the frame `skip` levels above it. Returns `None` when that
/// frame does not exist or carries no debug info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackCallerResolver;

impl CallerResolver for TrackCallerResolver {
    fn resolve(&self, origin: &'static Location<'static>, skip: usize) -> Option<CallSite> {
        if skip == 0 {
            return Some(CallSite::from(origin));
        }
        walk_from(origin, skip)
    }
}

/// Frame `skip` levels above the frame executing `origin`.
fn walk_from(origin: &'static Location<'static>, skip: usize) -> Option<CallSite> {
    let mut remaining: Option<usize> = None;
    let mut found: Option<Option<CallSite>> = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let site = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => Some((file, line)),
                _ => None,
            };
            match remaining {
                None => {
                    if let Some((file, line)) = site {
                        if line == origin.line() && file.ends_with(origin.file()) {
                            remaining = Some(skip);
                        }
                    }
                }
                Some(1) => {
                    found = Some(site.map(|(file, line)| {
                        CallSite::new(file.display().to_string(), line)
                    }));
                }
                Some(n) => remaining = Some(n - 1),
            }
        });
        found.is_none()
    });

    found.flatten()
}

/// Resolve through `resolver`, substituting `???:0` on failure.
pub(crate) fn resolve_or_unknown(
    resolver: &dyn CallerResolver,
    origin: &'static Location<'static>,
    skip: usize,
) -> CallSite {
    resolver
        .resolve(origin, skip)
        .unwrap_or(CallSite::UNKNOWN)
}
