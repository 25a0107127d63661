//! Logging facade.
//!
//! Forwards to `defmt` on hardware builds and to `tracing` on host builds.
//! With neither feature enabled the macros expand to nothing but still
//! borrow their arguments, so call sites never trip unused-variable lints.
//!
//! Format strings must stay within the subset both backends accept:
//! `{}` on integers, `bool` and `&str`, and `{:#x}` on unsigned integers.

#![allow(unused_macros)]

macro_rules! log_at {
    ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($fmt $(, $arg)*);
        #[cfg(feature = "tracing")]
        tracing::$level!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = ($(&$arg,)*);
        }
    }};
}

macro_rules! trace {
    ($($t:tt)*) => { log_at!(trace, $($t)*) };
}

macro_rules! debug {
    ($($t:tt)*) => { log_at!(debug, $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { log_at!(info, $($t)*) };
}

macro_rules! warn {
    ($($t:tt)*) => { log_at!(warn, $($t)*) };
}
