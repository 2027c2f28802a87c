//! PGN export.

use serde::{Deserialize, Serialize};

use crate::{GameTags, Graph};

/// Layout settings for PGN output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgnWriterOptions {
    /// Longest movetext line. Lines only break between tokens, so a single
    /// token longer than this still gets a line of its own.
    #[serde(default = "default_line_width")]
    pub line_width: usize,
}

fn default_line_width() -> usize {
    79
}

impl Default for PgnWriterOptions {
    fn default() -> Self {
        PgnWriterOptions {
            line_width: default_line_width(),
        }
    }
}

/// Greedy word wrap over movetext tokens.
struct Movetext {
    out: String,
    width: usize,
    column: usize,
}

impl Movetext {
    fn push(&mut self, token: &str) {
        let len = token.chars().count();
        if self.column > 0 {
            if self.column + 1 + len <= self.width {
                self.out.push(' ');
                self.column += 1;
            } else {
                self.out.push('\n');
                self.column = 0;
            }
        }
        self.out.push_str(token);
        self.column += len;
    }
}

pub(crate) fn write(graph: &Graph, options: &PgnWriterOptions, tags: Option<&GameTags>) -> String {
    let mut movetext = Movetext {
        out: String::new(),
        width: options.line_width,
        column: 0,
    };
    if let Some(tags) = tags {
        movetext.out.push_str(&tags.inspect());
        movetext.out.push('\n');
    }

    // Games set up with Black to move open with "1...".
    let offset = usize::from(!graph.root().is_white_to_move());
    for (index, (_, san)) in graph.replay().enumerate() {
        let ply = index + offset;
        if ply % 2 == 0 {
            movetext.push(&format!("{}.", ply / 2 + 1));
        } else if index == 0 {
            movetext.push("1...");
        }
        movetext.push(&san);
    }

    let result = tags.and_then(|t| t.get("Result").ok()).unwrap_or("*");
    movetext.push(result);
    movetext.out.push('\n');
    movetext.out
}
