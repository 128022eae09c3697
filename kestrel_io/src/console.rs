//! ANSI terminal color and cursor control.
//!
//! Cosmetic output helpers for server consoles. All functions write escape
//! sequences to a caller-supplied writer; there is no process-global state,
//! so concurrent use on distinct writers is safe.
//!
//! A color value packs the foreground in the low 3 bits, the bold flag in
//! bit 3, and the background in bits 4-6:
//! <http://en.wikipedia.org/wiki/ANSI_escape_code>

use std::io::{self, Write};

pub const TEXT_BLACK: u8 = 0;
pub const TEXT_RED: u8 = 1;
pub const TEXT_GREEN: u8 = 2;
pub const TEXT_YELLOW: u8 = 3;
pub const TEXT_BLUE: u8 = 4;
pub const TEXT_MAGENTA: u8 = 5;
pub const TEXT_CYAN: u8 = 6;
pub const TEXT_WHITE: u8 = 7;
pub const TEXT_BOLD: u8 = 8;

pub const BG_BLACK: u8 = 0;
pub const BG_RED: u8 = 1 << 4;
pub const BG_GREEN: u8 = 2 << 4;
pub const BG_YELLOW: u8 = 3 << 4;
pub const BG_BLUE: u8 = 4 << 4;
pub const BG_MAGENTA: u8 = 5 << 4;
pub const BG_CYAN: u8 = 6 << 4;
pub const BG_WHITE: u8 = 7 << 4;

/// Sets the foreground/background color from a packed color value.
pub fn set_color<W: Write>(out: &mut W, color: u8) -> io::Result<()> {
    let foreground = color & 7;
    let background = (color >> 4) & 7;
    if color & TEXT_BOLD != 0 {
        write!(out, "\x1b[01;3{foreground};4{background}m")
    } else {
        write!(out, "\x1b[3{foreground};4{background}m")
    }
}

/// Moves the cursor; the top-left corner is row 1, column 1.
pub fn cursor<W: Write>(out: &mut W, row: u32, col: u32) -> io::Result<()> {
    write!(out, "\x1b[{row};{col}H")
}

/// Restores the terminal's default colors.
pub fn reset<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[0m")
}

/// Clears the whole screen.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[2J")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_colors_render_expected_sequences() {
        let mut out = Vec::new();
        set_color(&mut out, TEXT_GREEN | BG_BLACK).unwrap();
        assert_eq!(out, b"\x1b[32;40m");

        out.clear();
        set_color(&mut out, TEXT_RED | TEXT_BOLD | BG_WHITE).unwrap();
        assert_eq!(out, b"\x1b[01;31;47m");
    }

    #[test]
    fn cursor_and_reset_sequences() {
        let mut out = Vec::new();
        cursor(&mut out, 1, 1).unwrap();
        reset(&mut out).unwrap();
        clear_screen(&mut out).unwrap();
        assert_eq!(out, b"\x1b[1;1H\x1b[0m\x1b[2J");
    }
}
