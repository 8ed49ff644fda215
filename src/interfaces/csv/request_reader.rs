use crate::domain::request::PayoutRequest;
use crate::error::{PayoutError, Result};
use std::io::Read;

/// Reads payout requests from a CSV source with a header row.
///
/// Wraps `csv::Reader` and yields one `Result<PayoutRequest>` per row, so a
/// malformed row can be reported and skipped without losing the rest.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes and validates each row.
    pub fn requests(self) -> impl Iterator<Item = Result<PayoutRequest>> {
        self.reader.into_deserialize().map(|result| {
            let request: PayoutRequest = result.map_err(PayoutError::from)?;
            request.validate()?;
            Ok(request)
        })
    }
}
