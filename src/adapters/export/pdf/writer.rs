//! Low-level PDF object serialization.

use std::io::Write;

use crate::ports::ExportError;

/// Writes numbered indirect objects and the cross-reference table.
///
/// Objects must be written with ids `1..=n`, each exactly once.
pub struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<Option<usize>>,
}

impl PdfWriter {
    pub fn new(object_count: usize) -> Result<Self, ExportError> {
        let mut buf = Vec::new();
        buf.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;
        Ok(Self {
            buf,
            offsets: vec![None; object_count],
        })
    }

    fn begin(&mut self, id: usize) -> Result<(), ExportError> {
        let slot = id
            .checked_sub(1)
            .and_then(|i| self.offsets.get_mut(i))
            .ok_or_else(|| ExportError::layout(format!("object id {} out of range", id)))?;
        if slot.is_some() {
            return Err(ExportError::layout(format!("object {} written twice", id)));
        }
        *slot = Some(self.buf.len());
        write!(self.buf, "{} 0 obj\n", id)?;
        Ok(())
    }

    /// Writes a non-stream object.
    pub fn object(&mut self, id: usize, body: &str) -> Result<(), ExportError> {
        self.begin(id)?;
        write!(self.buf, "{}\nendobj\n", body)?;
        Ok(())
    }

    /// Writes a stream object; `/Length` is added to `dict_entries`.
    pub fn stream(&mut self, id: usize, dict_entries: &str, data: &[u8]) -> Result<(), ExportError> {
        self.begin(id)?;
        let entries = dict_entries.trim();
        if entries.is_empty() {
            write!(self.buf, "<< /Length {} >>\nstream\n", data.len())?;
        } else {
            write!(self.buf, "<< {} /Length {} >>\nstream\n", entries, data.len())?;
        }
        self.buf.write_all(data)?;
        self.buf.write_all(b"\nendstream\nendobj\n")?;
        Ok(())
    }

    /// Appends the xref table and trailer.
    pub fn finish(mut self, root_id: usize, info_id: usize) -> Result<Vec<u8>, ExportError> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len();

        write!(self.buf, "xref\n0 {}\n0000000000 65535 f \n", count + 1)?;
        for (i, offset) in self.offsets.iter().enumerate() {
            let offset =
                offset.ok_or_else(|| ExportError::layout(format!("object {} never written", i + 1)))?;
            write!(self.buf, "{:010} 00000 n \n", offset)?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            count + 1,
            root_id,
            info_id,
            xref_offset
        )?;
        Ok(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_xref_for_every_object() {
        let mut writer = PdfWriter::new(2).unwrap();
        writer.object(1, "<< /Type /Catalog >>").unwrap();
        writer.stream(2, "/Filter /None", b"abc").unwrap();
        let bytes = writer.finish(1, 1).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("1 0 obj\n<< /Type /Catalog >>\nendobj"));
        assert!(text.contains("<< /Filter /None /Length 3 >>\nstream\nabc\nendstream"));
        assert!(text.contains("xref\n0 3\n"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn rejects_missing_and_duplicate_objects() {
        let mut writer = PdfWriter::new(2).unwrap();
        writer.object(1, "null").unwrap();
        assert!(writer.object(1, "null").is_err());
        assert!(writer.object(3, "null").is_err());
        assert!(writer.finish(1, 1).is_err());
    }
}
