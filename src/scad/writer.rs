//! Indented OpenSCAD statement builder

use crate::types::{fmt_num, Point};

const INDENT: &str = "    ";

/// Accumulates OpenSCAD statements with block indentation
#[derive(Debug, Default)]
pub struct ScadWriter {
    lines: Vec<String>,
    depth: usize,
}

impl ScadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single statement or comment line
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.depth), text.as_ref()));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Open a block: `head {`
    pub fn open(&mut self, head: impl AsRef<str>) {
        self.line(format!("{} {{", head.as_ref()));
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    pub fn polygon(&mut self, points: &[Point]) {
        self.line(format!("polygon({});", points_list(points)));
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// `[[x, y], ...]`
pub fn points_list(points: &[Point]) -> String {
    let inner = points
        .iter()
        .map(|p| format!("[{}, {}]", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}

/// Escape a string for an OpenSCAD string literal
pub fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
