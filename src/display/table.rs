use crate::core::args::Args;
use crate::core::bisection::{Boundary, Orientation};
use crate::utils::bytes::ByteSize;
use comfy_table::{Attribute, Cell, Color, Table, presets};

/// Formatter for table output
pub struct TableDisplay {
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn base_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

        if self.use_colors {
            table.set_header(headers.iter().map(|header| {
                Cell::new(header)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }));
        } else {
            table.set_header(headers.to_vec());
        }
        table
    }

    fn key_cell(&self, key: &str) -> Cell {
        if self.use_colors {
            Cell::new(key).fg(Color::Cyan)
        } else {
            Cell::new(key)
        }
    }

    /// One row per unit: bytes and bits side by side.
    pub fn render_byte_size(&self, size: &ByteSize) -> String {
        let mut table = self.base_table(&["Unit", "Bytes", "Bits"]);

        let rows = [
            ("B", size.bytes(), size.bits()),
            ("K", size.kbytes(), size.kbits()),
            ("M", size.mbytes(), size.mbits()),
            ("G", size.gbytes(), size.gbits()),
            ("T", size.tbytes(), size.tbits()),
        ];
        for (unit, bytes, bits) in rows {
            table.add_row(vec![
                self.key_cell(unit),
                Cell::new(format!("{:.1}", bytes)),
                Cell::new(format!("{:.1}", bits)),
            ]);
        }

        table.to_string()
    }

    pub fn render_config(&self, entries: &[(&str, String)]) -> String {
        let mut table = self.base_table(&["Key", "Value"]);
        for (key, value) in entries {
            table.add_row(vec![self.key_cell(key), Cell::new(value)]);
        }
        table.to_string()
    }

    /// Summary of a finished search, shown with `-v`.
    pub fn render_boundary(&self, boundary: &Boundary<Args<String>>) -> String {
        let orientation = match boundary.orientation {
            Orientation::LeftToRight => "left to right",
            Orientation::RightToLeft => "right to left",
        };

        let mut table = self.base_table(&["Field", "Value"]);
        table.add_row(vec![self.key_cell("value"), Cell::new(&boundary.value)]);
        table.add_row(vec![self.key_cell("index"), Cell::new(boundary.index)]);
        table.add_row(vec![self.key_cell("probes"), Cell::new(boundary.probes)]);
        table.add_row(vec![self.key_cell("orientation"), Cell::new(orientation)]);
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_byte_size() {
        let display = TableDisplay::new().with_colors(false);
        let output = display.render_byte_size(&ByteSize::from_bytes(1024));

        assert!(output.contains("Unit"));
        assert!(output.contains("1024.0"));
        assert!(output.contains("8192.0"));
        assert!(output.contains("1.0"));
    }

    #[test]
    fn test_render_config() {
        let display = TableDisplay::new().with_colors(false);
        let output = display.render_config(&[("bisect.expect", "success".to_string())]);

        assert!(output.contains("bisect.expect"));
        assert!(output.contains("success"));
    }

    #[test]
    fn test_render_boundary() {
        let boundary = Boundary {
            index: 1386,
            value: Args::Scalar("1386".to_string()),
            probes: 12,
            orientation: Orientation::RightToLeft,
        };

        let output = TableDisplay::new()
            .with_colors(false)
            .render_boundary(&boundary);
        assert!(output.contains("1386"));
        assert!(output.contains("12"));
        assert!(output.contains("right to left"));
    }
}
