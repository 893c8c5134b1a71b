/// Development trace output, compiled in only with the `debug-trace` feature.
#[cfg(feature = "debug-trace")]
macro_rules! seq_debug {
    ($($arg:tt)*) => {
        eprintln!("[bioseq] {}", format!($($arg)*))
    };
}

#[cfg(not(feature = "debug-trace"))]
macro_rules! seq_debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}
