use crate::domain::request::PayoutRequest;
use crate::error::Result;
use std::io::Write;

/// Writes payout requests as CSV rows, header first.
pub struct RequestWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RequestWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_requests<'a>(
        &mut self,
        requests: impl IntoIterator<Item = &'a PayoutRequest>,
    ) -> Result<usize> {
        let mut written = 0;
        for request in requests {
            self.writer.serialize(request)?;
            written += 1;
        }
        self.writer.flush()?;
        Ok(written)
    }
}
