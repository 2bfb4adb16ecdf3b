#[cfg(feature = "tracing")]
macro_rules! wtrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "windowing", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! wtrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! wdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "windowing", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! wdebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! wwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "windowing", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! wwarn {
    ($($tt:tt)*) => {};
}

/// Rejects a float that is negative or not finite, logging the offending call site.
macro_rules! ensure_non_negative {
    ($value:expr, $err:expr) => {{
        let value: f64 = $value;
        if !(value.is_finite() && value >= 0.0) {
            wwarn!(value, "rejected non-finite or negative input");
            return Err($err);
        }
    }};
}
