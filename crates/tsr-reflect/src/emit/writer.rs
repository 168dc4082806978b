//! Indenting text writer for script output.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLine {
    #[default]
    Lf,
    Crlf,
}

impl NewLine {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

const INDENT: &str = "    ";

pub struct TextWriter {
    out: String,
    indent: usize,
    new_line: NewLine,
    line_start: bool,
}

impl TextWriter {
    pub fn new(new_line: NewLine) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            new_line,
            line_start: true,
        }
    }

    pub fn write(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if self.line_start {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.line_start = false;
        }
        self.out.push_str(text);
        self
    }

    pub fn write_line(&mut self) -> &mut Self {
        self.out.push_str(self.new_line.as_str());
        self.line_start = true;
        self
    }

    pub fn line(&mut self, text: &str) -> &mut Self {
        self.write(text).write_line()
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    /// JavaScript single-quoted string literal.
    pub fn write_string(&mut self, value: &str) -> &mut Self {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('\'');
        for c in value.chars() {
            match c {
                '\'' => quoted.push_str("\\'"),
                '\\' => quoted.push_str("\\\\"),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\t' => quoted.push_str("\\t"),
                '\u{2028}' => quoted.push_str("\\u2028"),
                '\u{2029}' => quoted.push_str("\\u2029"),
                c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
                c => quoted.push(c),
            }
        }
        quoted.push('\'');
        self.write(&quoted)
    }

    pub fn finish(self) -> String {
        self.out
    }
}
