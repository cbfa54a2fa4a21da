//! Repair for VCF files whose header lacks the sample columns.
//!
//! Some variant callers write the `FORMAT` column into every data line but
//! leave it, and the sample name, out of the `#CHROM` header. The fixer adds
//! the missing header columns and a genotype value to each record.

use crate::transform::ContentTransform;

/// Appends sample columns to the header line and a value to each record.
#[derive(Debug, Clone)]
pub struct VcfFixer {
    header_columns: Vec<String>,
    record_value: String,
}

impl VcfFixer {
    pub fn new(header_columns: Vec<String>, record_value: impl Into<String>) -> Self {
        Self {
            header_columns,
            record_value: record_value.into(),
        }
    }

    fn fix_line(&self, line: &[u8], out: &mut Vec<u8>) {
        out.extend_from_slice(line);
        if line.starts_with(b"##") || line.is_empty() {
            return;
        }
        if line.starts_with(b"#") {
            for column in &self.header_columns {
                out.push(b'\t');
                out.extend_from_slice(column.as_bytes());
            }
        } else {
            out.push(b'\t');
            out.extend_from_slice(self.record_value.as_bytes());
        }
    }
}

impl Default for VcfFixer {
    fn default() -> Self {
        Self::new(vec!["FORMAT".to_string(), "somatic".to_string()], "1/0")
    }
}

impl ContentTransform for VcfFixer {
    fn apply(&self, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(body.len() + body.len() / 8);
        for (i, line) in body.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            self.fix_line(line, &mut out);
        }
        out
    }
}
