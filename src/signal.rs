//! SIGINT handling.
//!
//! The handler only stores into [`INTERRUPTED`]; the transfer loop reads it
//! once per iteration, between a completed write and the next read.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set from signal context when the user asks the relay to stop.
pub static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigint(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the SIGINT handler. `SA_RESTART` keeps an in-flight read or
/// write going; the stop request is picked up at the next loop check.
pub fn install() -> io::Result<&'static AtomicBool> {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handle_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
        action.sa_flags = libc::SA_RESTART;
        if libc::sigemptyset(&mut action.sa_mask) == -1 {
            return Err(io::Error::last_os_error());
        }
        if libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut()) == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(&INTERRUPTED)
}

pub fn is_interrupted(flag: &AtomicBool) -> bool {
    flag.load(Ordering::SeqCst)
}
