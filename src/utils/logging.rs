use tracing::span::Span;

/// Logs an error inside of a span, so that it carries the span's fields (event, delivery, ...).
pub trait LogError {
    fn log_error<E: Into<anyhow::Error>>(&self, error: E);
}

impl LogError for Span {
    fn log_error<E: Into<anyhow::Error>>(&self, error: E) {
        let error = error.into();
        self.in_scope(|| {
            tracing::error!("Error: {error:?}");
        });
    }
}
