//! Feature-gated tracing hooks for the matrix drivers.
//!
//! Call sites write `trace_span!("name", key = value, ..).entered()` and
//! `trace_event!("name", key = value, ..)` unconditionally. With the
//! `tracing` feature these become `info`-level spans and events; without it
//! the field values are still evaluated and the span is a [`Quiet`] guard.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info_span!($name $(, $key = $value)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = $value;)*
        $crate::trace::Quiet
    }};
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:literal $(,)?) => {
        tracing::info!(name: $name, "{}", $name)
    };
    ($name:literal $(, $key:ident = $value:expr)+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        $(let _ = $value;)*
    }};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard of builds without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct Quiet;

#[cfg(not(feature = "tracing"))]
impl Quiet {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
