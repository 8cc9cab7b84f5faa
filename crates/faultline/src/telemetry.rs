//! Logging of failures through `tracing`
//!
//! - [`init_tracing`]: fmt subscriber filtered by `RUST_LOG` (default `info`)
//! - [`install_panic_hook`]: logs every [`Failure`] raise before the previous hook runs
//! - [`report`]: one `error` event carrying a failure's full render

use crate::check::payload_failure;
use crate::failure::Failure;
use std::panic;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Telemetry setup errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed
    #[error("tracing already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global fmt subscriber.
pub fn init_tracing(service_name: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(service = service_name, "tracing initialized");
    Ok(())
}

/// Chain a hook in front of the current panic hook that logs [`Failure`]
/// payloads. The default hook only sees `Box<dyn Any>` for them.
///
/// Panic hooks run before unwinding, so this fires for every raise, including
/// ones a caller later recovers with `catch_unwind`.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Some(failure) = payload_failure(info.payload()) {
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_default();
            tracing::warn!(
                target: "faultline::panic",
                location = %location,
                sentinel = failure.sentinel().map(tracing::field::display),
                "failure raised\n{failure}"
            );
        }
        previous(info);
    }));
}

/// Emit `failure` as a single `error` event.
pub fn report(failure: &Failure) {
    tracing::error!(
        target: "faultline::report",
        sentinel = failure.sentinel().map(tracing::field::display),
        frames = failure.frames().len(),
        "{failure}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::ERR_OVERLOAD;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn report_logs_full_render() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();

        let failure = Failure::wrap_with_message(ERR_OVERLOAD, format_args!("queue full"));
        tracing::subscriber::with_default(subscriber, || report(&failure));

        let text = capture.text();
        assert!(text.contains("ERROR"));
        assert!(text.contains("queue full\nbacktrace:\n"));
        assert!(text.contains("backtrace error:\nservice overload"));
        assert!(text.contains("sentinel=service overload"));
    }

    #[test]
    fn second_init_is_rejected() {
        // Another test may have won the race; either way the second call fails.
        let _ = init_tracing("first");
        assert!(matches!(
            init_tracing("second"),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
