use std::io::Write;

use pathgraph_model::Quad;

use crate::error::QuadIoError;

/// The write side of the external interface: `write_quad`, a batch form
/// that reports how many quads made it out before a failure, and `close`.
pub trait QuadWriter {
    fn write_quad(&mut self, quad: &Quad) -> Result<(), QuadIoError>;

    /// Writes `batch` in order, stopping at the first failure. Returns the
    /// number of quads actually written and, on failure, the error.
    fn write_quads(&mut self, batch: &[Quad]) -> (usize, Option<QuadIoError>) {
        for (written, quad) in batch.iter().enumerate() {
            if let Err(err) = self.write_quad(quad) {
                return (written, Some(err));
            }
        }
        (batch.len(), None)
    }

    fn close(&mut self) -> Result<(), QuadIoError>;
}

/// Serializes quads one per line as `subject predicate object [label] .`,
/// relying on [`pathgraph_model::Value`]'s `Display` for correct term
/// escaping.
pub struct LineQuadWriter<W> {
    inner: W,
}

impl<W: Write> LineQuadWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> QuadWriter for LineQuadWriter<W> {
    fn write_quad(&mut self, quad: &Quad) -> Result<(), QuadIoError> {
        write!(self.inner, "{} {} {}", quad.subject, quad.predicate, quad.object)?;
        if let Some(label) = &quad.label {
            write!(self.inner, " {label}")?;
        }
        writeln!(self.inner, " .")?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), QuadIoError> {
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathgraph_model::Value;

    #[test]
    fn writes_a_labeled_quad_on_one_line() {
        let mut buf = Vec::new();
        {
            let mut writer = LineQuadWriter::new(&mut buf);
            let quad = Quad::new(
                Value::iri("http://example.test/bob"),
                Value::iri("http://example.test/status"),
                Value::plain("cool"),
                Some(Value::iri("http://example.test/g")),
            );
            writer.write_quad(&quad).expect("write");
            writer.close().expect("close");
        }
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "<http://example.test/bob> <http://example.test/status> \"cool\" <http://example.test/g> .\n"
        );
    }

    #[test]
    fn write_quads_reports_count_on_partial_failure() {
        let mut buf = Vec::new();
        let mut writer = LineQuadWriter::new(&mut buf);
        let quads = vec![Quad::triple(
            Value::iri("http://example.test/a"),
            Value::iri("http://example.test/b"),
            Value::iri("http://example.test/c"),
        )];
        let (written, err) = writer.write_quads(&quads);
        assert_eq!(written, 1);
        assert!(err.is_none());
    }
}
