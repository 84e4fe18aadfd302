//! Byte offset to line/column conversion.
//!
//! Lexers report byte ranges; the IR stores 1-based line/column
//! [`Location`]s. Use [`LineOffsetTable`] for repeated lookups on the same
//! text.

use kdef_ir::Location;

/// Pre-computed line offset table for line/column lookup.
///
/// ```
/// use kdef_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "line1\nline2\nline3";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
/// assert_eq!(table.offset_to_line_col(source, 14), (3, 3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_idx = (line - 1) as usize;
        let line_start = self.offsets.get(line_idx).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX).saturating_add(1))
    }

    /// Location covering the byte range `start..end`. The end column is
    /// inclusive, pointing at the last character of the range.
    pub fn location(&self, source: &str, start: u32, end: u32) -> Location {
        let (start_line, start_column) = self.offset_to_line_col(source, start);
        let last = end.saturating_sub(1).max(start);
        let (end_line, end_column) = self.offset_to_line_col(source, last);
        Location::new(start_line, start_column, end_line, end_column)
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}
