//! The scanning rule shared by every processor: only Han ideographs outside ASCII count.

use crate::config::ASCII_LIMIT;
use tracing::trace;
use unicode_script::{Script, UnicodeScript};

pub fn is_qualifying(c: char) -> bool {
    (c as u32) >= ASCII_LIMIT && c.script() == Script::Han
}

/// Qualifying code points of `text`, in order, repeats included.
pub fn qualifying(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|&c| is_qualifying(c)).inspect(|&c| {
        if c as u32 > 0xFFFF {
            trace!("Rare codepoint U+{:X} = {} '{}'", c as u32, c as u32, c);
        }
    })
}
