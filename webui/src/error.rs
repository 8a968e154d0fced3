use thiserror::Error;

/// Failures of the report page behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// One of the fixed element ids the report markup must provide is absent.
    #[error("required element #{0} not found")]
    MissingElement(String),
    /// The report table has no `<tbody>` to sort.
    #[error("table #{0} has no body")]
    MissingTableBody(String),
}
