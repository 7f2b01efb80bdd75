//! Process-wide debug switches, mirroring the handful of global booleans a build tool
//! typically exposes through `-d <flag>` command-line switches rather than full config.
//! These are read far from where they're set (deep inside [`crate::Plan`] and [`crate::State`]
//! recomputation), so plain `AtomicBool`s are simpler here than threading a context object
//! through every call site.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::model::EdgeId;

static EXPLAINING: AtomicBool = AtomicBool::new(false);
static KEEP_DEPFILE: AtomicBool = AtomicBool::new(false);
static KEEP_DYNOUT: AtomicBool = AtomicBool::new(false);
static KEEP_RSP: AtomicBool = AtomicBool::new(false);
static EXPERIMENTAL_STATCACHE: AtomicBool = AtomicBool::new(false);

/// Keyed by the edge whose dirty recomputation produced the explanation, so a caller can ask
/// "why is this particular edge about to run" instead of getting an undifferentiated dump.
/// A `Vec` of pairs rather than a `HashMap` because `HashMap::new` isn't `const` and this needs
/// to live in a `static` initializer without pulling in a lazy-init crate.
static EXPLANATIONS: Mutex<Vec<(EdgeId, String)>> = Mutex::new(Vec::new());

pub fn set_explaining(value: bool) {
    EXPLAINING.store(value, Ordering::Relaxed);
}

pub fn is_explaining() -> bool {
    EXPLAINING.load(Ordering::Relaxed)
}

pub fn set_keep_depfile(value: bool) {
    KEEP_DEPFILE.store(value, Ordering::Relaxed);
}

pub fn keep_depfile() -> bool {
    KEEP_DEPFILE.load(Ordering::Relaxed)
}

pub fn set_keep_dynout(value: bool) {
    KEEP_DYNOUT.store(value, Ordering::Relaxed);
}

pub fn keep_dynout() -> bool {
    KEEP_DYNOUT.load(Ordering::Relaxed)
}

pub fn set_keep_rsp(value: bool) {
    KEEP_RSP.store(value, Ordering::Relaxed);
}

pub fn keep_rsp() -> bool {
    KEEP_RSP.load(Ordering::Relaxed)
}

pub fn set_experimental_statcache(value: bool) {
    EXPERIMENTAL_STATCACHE.store(value, Ordering::Relaxed);
}

pub fn experimental_statcache() -> bool {
    EXPERIMENTAL_STATCACHE.load(Ordering::Relaxed)
}

/// Records an explanation line for `edge` if `-d explain` is active; otherwise a no-op. Callers
/// should not pay for string formatting unless explaining is on, so prefer the
/// [`explain!`](crate::explain!) macro over calling this directly with a pre-formatted string.
pub fn record_explanation(edge: EdgeId, message: String) {
    if !is_explaining() {
        return;
    }
    EXPLANATIONS.lock().unwrap().push((edge, message));
}

/// Prints every explanation recorded for `edge` to stderr and removes them from the buffer,
/// leaving explanations recorded for other edges untouched.
pub fn print_explanations(edge: EdgeId) {
    let mut buffer = EXPLANATIONS.lock().unwrap();
    buffer.retain(|(recorded_edge, message)| {
        if *recorded_edge == edge {
            eprintln!("ninja explain: {}", message);
            false
        } else {
            true
        }
    });
}

/// Records an explanation line for a given edge, formatted lazily, only when `-d explain` is
/// active.
#[macro_export]
macro_rules! explain {
    ($edge:expr, $($arg:tt)*) => {
        if $crate::explain::is_explaining() {
            $crate::explain::record_explanation($edge, format!($($arg)*));
        }
    };
}
