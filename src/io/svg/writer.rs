use std::io::Write;

use anyhow::{Ok, Result};

use super::Rgb;

/// Streams an SVG document into any writer.
pub(crate) struct SvgWriter<W: Write> {
    writer: W,
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl<W: Write> Write for SvgWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl<W: Write> SvgWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the SVG header, including the XML declaration and opening <svg> tag.
    pub(crate) fn write_header(&mut self, width: f64, height: f64) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##)?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    /// Write SVG styles for map features.
    pub(crate) fn write_styles(&mut self, no_data: Rgb) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .state {{ fill: {no_data}; stroke: #000000; cursor: pointer; }}
    .county {{ fill: {no_data}; stroke: #000000; }}
    .hover {{ stroke: #111827; }}
</style>
</defs>"##)?;
        Ok(())
    }

    /// Open the group carrying the current pan/zoom transform.
    pub(crate) fn open_group(&mut self, translate_x: f64, translate_y: f64, scale: f64) -> Result<()> {
        writeln!(self, r#"<g transform="translate({translate_x:.3},{translate_y:.3}) scale({scale:.6})">"#)?;
        Ok(())
    }

    pub(crate) fn close_group(&mut self) -> Result<()> {
        writeln!(self, "</g>")?;
        Ok(())
    }

    /// Write the closing </svg> tag.
    pub(crate) fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }

    pub(crate) fn into_inner(self) -> W { self.writer }
}
