//! Key code to display token mapping.
//!
//! Key codes are macOS virtual key codes (`CGKeyCode`). Tokens are either the
//! literal character a key produces on a US layout or a bracketed name for
//! non-printing keys. The table is read by log consumers, so every entry is
//! part of the log format: changing one is a breaking change.

use std::collections::HashMap;

use crate::event::KeyCode;

/// Token logged for key codes missing from the table.
pub const UNKNOWN_TOKEN: &str = "<unknown>";

/// Every known key code and its token.
///
/// Code 41 maps to the empty string on purpose; that is a known key, distinct
/// from [`UNKNOWN_TOKEN`].
pub const KEY_SYMBOLS: &[(u16, &str)] = &[
    (0, "a"),
    (1, "s"),
    (2, "d"),
    (3, "f"),
    (4, "h"),
    (5, "g"),
    (6, "z"),
    (7, "x"),
    (8, "c"),
    (9, "v"),
    (11, "b"),
    (12, "q"),
    (13, "w"),
    (14, "e"),
    (15, "r"),
    (16, "y"),
    (17, "t"),
    (18, "1"),
    (19, "2"),
    (20, "3"),
    (21, "4"),
    (22, "6"),
    (23, "5"),
    (24, "="),
    (25, "9"),
    (26, "7"),
    (27, "-"),
    (28, "8"),
    (29, "0"),
    (30, "]"),
    (31, "o"),
    (32, "u"),
    (33, "["),
    (34, "i"),
    (35, "p"),
    (36, "<>"),
    (37, "l"),
    (38, "j"),
    (39, "\""),
    (40, "k"),
    (41, ""),
    (42, "\\"),
    (43, ","),
    (44, "/"),
    (45, "n"),
    (46, "m"),
    (47, "."),
    (48, "<tab>"),
    (49, "<space>"),
    (50, "`"),
    (51, "<delete>"),
    (53, "<escape>"),
    (55, "<command>"),
    (56, "<shift>"),
    (57, "<capslock>"),
    (58, "<option>"),
    (59, "<control>"),
    (60, "<right-shift>"),
    (61, "<right-option>"),
    (62, "<right-control>"),
    (63, "<function>"),
    (64, "<f17>"),
    (65, "<keypad-decimal>"),
    (67, "<keypad-multiply>"),
    (69, "<keypad-plus>"),
    (71, "<keypad-clear>"),
    (72, "<volume-up>"),
    (73, "<volume-down>"),
    (74, "<mute>"),
    (75, "<keypad-divide>"),
    (76, "<keypad-enter>"),
    (78, "<keypad-minus>"),
    (79, "<f18>"),
    (80, "<f19>"),
    (81, "<keypad-equals>"),
    (82, "<keypad-0>"),
    (83, "<keypad-1>"),
    (84, "<keypad-2>"),
    (85, "<keypad-3>"),
    (86, "<keypad-4>"),
    (87, "<keypad-5>"),
    (88, "<keypad-6>"),
    (89, "<keypad-7>"),
    (90, "<f20>"),
    (91, "<keypad-8>"),
    (92, "<keypad-9>"),
    (96, "<f5>"),
    (97, "<f6>"),
    (98, "<f7>"),
    (99, "<f3>"),
    (100, "<f8>"),
    (101, "<f9>"),
    (103, "<f11>"),
    (105, "<f13>"),
    (106, "<f16>"),
    (107, "<f14>"),
    (109, "<f10>"),
    (111, "<f12>"),
    (113, "<f15>"),
    (114, "<help>"),
    (115, "<home>"),
    (116, "<pageup>"),
    (117, "<forward-delete>"),
    (118, "<f4>"),
    (119, "<end>"),
    (120, "<f2>"),
    (121, "<page-down>"),
    (122, "<f1>"),
    (123, "<left>"),
    (124, "<right>"),
    (125, "<down>"),
    (126, "<up>"),
];

/// Read-only lookup from key code to display token.
///
/// Built once at startup; [`SymbolTable::translate`] is total.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<KeyCode, &'static str>,
}

impl SymbolTable {
    /// Build the table from [`KEY_SYMBOLS`].
    #[must_use]
    pub fn new() -> Self {
        let symbols = KEY_SYMBOLS
            .iter()
            .map(|&(code, token)| (KeyCode(code), token))
            .collect();
        Self { symbols }
    }

    /// Look up a key code, returning `None` if it is not in the table.
    #[must_use]
    pub fn get(&self, code: KeyCode) -> Option<&'static str> {
        self.symbols.get(&code).copied()
    }

    /// Translate a key code into its display token.
    ///
    /// Unknown codes yield [`UNKNOWN_TOKEN`].
    #[must_use]
    pub fn translate(&self, code: KeyCode) -> &'static str {
        self.get(code).unwrap_or(UNKNOWN_TOKEN)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
