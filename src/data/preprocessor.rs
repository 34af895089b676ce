// ============================================================
// Layer 4 - Question Text Preprocessor
// ============================================================
// Cleans raw question text before featurization.
//
// Questions come from a CSV typed by people and from the console,
// so they often contain:
//   - Non-breaking and zero-width spaces
//   - A byte order mark on the very first line of the file
//   - Full-width spaces (U+3000) from CJK input methods
//   - Tabs, stray control characters and repeated spaces
//
// None of these carry meaning, and leaving them in would create
// n-grams that never match at query time.
//
// Reference: Rust Book §8 (Strings in Rust)

#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a question into a single line with single spaces.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true; // drops leading whitespace

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' | '\u{3000}' => ' ',
                c if c.is_control() || c.is_whitespace() => ' ',
                c => c,
            };
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}
