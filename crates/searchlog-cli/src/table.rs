//! Aligned text tables for reports
//!
//! The first column is left-aligned (it holds the row label, e.g. a day or a
//! bin), every other column is right-aligned. Column widths fit the widest
//! cell.

use std::io::{self, Write};

#[derive(Debug, Clone)]
pub(crate) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: vec![],
        }
    }

    /// Appends a row; missing trailing cells render empty.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = self
            .headers
            .iter()
            .map(|h| h.chars().count())
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    fn write_line<W>(writer: &mut W, widths: &[usize], cells: &[String]) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        let empty = String::new();
        let mut line = String::from(" ");
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).unwrap_or(&empty);
            if i == 0 {
                line.push_str(&format!(" {cell:<width$}"));
            } else {
                line.push_str(&format!(" {cell:>width$}"));
            }
        }
        writeln!(writer, "{}", line.trim_end())
    }

    pub fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        let widths = self.column_widths();
        Self::write_line(writer, &widths, &self.headers)?;
        let total_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        writeln!(writer, "  {}", "-".repeat(total_width))?;
        for row in &self.rows {
            Self::write_line(writer, &widths, row)?;
        }
        Ok(())
    }
}

/// Writes a section title followed by a rule of the same width.
pub(crate) fn write_heading<W>(writer: &mut W, title: &str) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(title.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &Table) -> String {
        let mut buf = vec![];
        table.write_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_alignment() {
        let mut table = Table::new(["Day", "Searches"]);
        table.push_row(["2016-03-01", "7"]);
        table.push_row(["2016-03-02", "1234"]);
        let text = render(&table);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "  Day        Searches");
        assert_eq!(lines[1], "  -------------------");
        assert_eq!(lines[2], "  2016-03-01        7");
        assert_eq!(lines[3], "  2016-03-02     1234");
    }

    #[test]
    fn test_short_and_long_rows() {
        let mut table = Table::new(["Label"]);
        table.push_row(["x", "extra"]);
        table.push_row(Vec::<String>::new());
        let text = render(&table);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "  x     extra");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_heading() {
        let mut buf = vec![];
        write_heading(&mut buf, "Sessions").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Sessions\n========\n");
    }
}
