// Level macros gated by the `log_*` cargo features. Enabling a level also
// enables every more severe level, e.g. `log_info` turns on info, warn and
// error. Disabled levels still type-check their arguments but emit nothing.
// Records go through the `log` facade; binaries pick the backend.

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        if cfg!(feature = "log_trace") {
            ::log::trace!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if cfg!(any(feature = "log_trace", feature = "log_debug")) {
            ::log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if cfg!(any(
            feature = "log_trace",
            feature = "log_debug",
            feature = "log_info"
        )) {
            ::log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if cfg!(any(
            feature = "log_trace",
            feature = "log_debug",
            feature = "log_info",
            feature = "log_warn"
        )) {
            ::log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if cfg!(any(
            feature = "log_trace",
            feature = "log_debug",
            feature = "log_info",
            feature = "log_warn",
            feature = "log_error"
        )) {
            ::log::error!($($arg)*);
        }
    };
}
