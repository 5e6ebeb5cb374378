//! X11 KeySym name table used by the key half of the definition registry.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # Why names and not codes in the config? (for beginners)
//!
//! Remote display servers speaking RFB take X11 KeySyms on the wire, so the
//! KeySym is the natural code for a key.  Users, however, write remaps as
//! `Alt_L+Tab`, which is the name X11 itself gives the KeySym (minus the
//! `XK_` prefix).  This table is the bridge between the two.
//!
//! Letters appear in both cases: the shifted KeySym (`A`, 0x0041) is a
//! different code from the unshifted one (`a`, 0x0061), and the capture side
//! reports whichever one the keyboard produced.
//!
//! Every value in this table is unique, so a code always maps back to exactly
//! one name.

/// `(name, keysym)` pairs.
pub const KEYSYMS: &[(&str, u32)] = &[
    // Latin-1 printable range (0x20-0x7E)
    ("space", 0x0020),        // XK_space
    ("exclam", 0x0021),       // XK_exclam
    ("quotedbl", 0x0022),     // XK_quotedbl
    ("numbersign", 0x0023),   // XK_numbersign
    ("dollar", 0x0024),       // XK_dollar
    ("percent", 0x0025),      // XK_percent
    ("ampersand", 0x0026),    // XK_ampersand
    ("apostrophe", 0x0027),   // XK_apostrophe
    ("parenleft", 0x0028),    // XK_parenleft
    ("parenright", 0x0029),   // XK_parenright
    ("asterisk", 0x002A),     // XK_asterisk
    ("plus", 0x002B),         // XK_plus
    ("comma", 0x002C),        // XK_comma
    ("minus", 0x002D),        // XK_minus
    ("period", 0x002E),       // XK_period
    ("slash", 0x002F),        // XK_slash
    ("0", 0x0030),            // XK_0
    ("1", 0x0031),            // XK_1
    ("2", 0x0032),            // XK_2
    ("3", 0x0033),            // XK_3
    ("4", 0x0034),            // XK_4
    ("5", 0x0035),            // XK_5
    ("6", 0x0036),            // XK_6
    ("7", 0x0037),            // XK_7
    ("8", 0x0038),            // XK_8
    ("9", 0x0039),            // XK_9
    ("colon", 0x003A),        // XK_colon
    ("semicolon", 0x003B),    // XK_semicolon
    ("less", 0x003C),         // XK_less
    ("equal", 0x003D),        // XK_equal
    ("greater", 0x003E),      // XK_greater
    ("question", 0x003F),     // XK_question
    ("at", 0x0040),           // XK_at
    ("A", 0x0041),            // XK_A
    ("B", 0x0042),            // XK_B
    ("C", 0x0043),            // XK_C
    ("D", 0x0044),            // XK_D
    ("E", 0x0045),            // XK_E
    ("F", 0x0046),            // XK_F
    ("G", 0x0047),            // XK_G
    ("H", 0x0048),            // XK_H
    ("I", 0x0049),            // XK_I
    ("J", 0x004A),            // XK_J
    ("K", 0x004B),            // XK_K
    ("L", 0x004C),            // XK_L
    ("M", 0x004D),            // XK_M
    ("N", 0x004E),            // XK_N
    ("O", 0x004F),            // XK_O
    ("P", 0x0050),            // XK_P
    ("Q", 0x0051),            // XK_Q
    ("R", 0x0052),            // XK_R
    ("S", 0x0053),            // XK_S
    ("T", 0x0054),            // XK_T
    ("U", 0x0055),            // XK_U
    ("V", 0x0056),            // XK_V
    ("W", 0x0057),            // XK_W
    ("X", 0x0058),            // XK_X
    ("Y", 0x0059),            // XK_Y
    ("Z", 0x005A),            // XK_Z
    ("bracketleft", 0x005B),  // XK_bracketleft
    ("backslash", 0x005C),    // XK_backslash
    ("bracketright", 0x005D), // XK_bracketright
    ("asciicircum", 0x005E),  // XK_asciicircum
    ("underscore", 0x005F),   // XK_underscore
    ("grave", 0x0060),        // XK_grave
    ("a", 0x0061),            // XK_a
    ("b", 0x0062),            // XK_b
    ("c", 0x0063),            // XK_c
    ("d", 0x0064),            // XK_d
    ("e", 0x0065),            // XK_e
    ("f", 0x0066),            // XK_f
    ("g", 0x0067),            // XK_g
    ("h", 0x0068),            // XK_h
    ("i", 0x0069),            // XK_i
    ("j", 0x006A),            // XK_j
    ("k", 0x006B),            // XK_k
    ("l", 0x006C),            // XK_l
    ("m", 0x006D),            // XK_m
    ("n", 0x006E),            // XK_n
    ("o", 0x006F),            // XK_o
    ("p", 0x0070),            // XK_p
    ("q", 0x0071),            // XK_q
    ("r", 0x0072),            // XK_r
    ("s", 0x0073),            // XK_s
    ("t", 0x0074),            // XK_t
    ("u", 0x0075),            // XK_u
    ("v", 0x0076),            // XK_v
    ("w", 0x0077),            // XK_w
    ("x", 0x0078),            // XK_x
    ("y", 0x0079),            // XK_y
    ("z", 0x007A),            // XK_z
    ("braceleft", 0x007B),    // XK_braceleft
    ("bar", 0x007C),          // XK_bar
    ("braceright", 0x007D),   // XK_braceright
    ("asciitilde", 0x007E),   // XK_asciitilde

    // TTY function keys
    ("BackSpace", 0xFF08),   // XK_BackSpace
    ("Tab", 0xFF09),         // XK_Tab
    ("Return", 0xFF0D),      // XK_Return
    ("Pause", 0xFF13),       // XK_Pause
    ("Scroll_Lock", 0xFF14), // XK_Scroll_Lock
    ("Sys_Req", 0xFF15),     // XK_Sys_Req
    ("Escape", 0xFF1B),      // XK_Escape
    ("Delete", 0xFFFF),      // XK_Delete

    // Cursor control
    ("Home", 0xFF50),      // XK_Home
    ("Left", 0xFF51),      // XK_Left
    ("Up", 0xFF52),        // XK_Up
    ("Right", 0xFF53),     // XK_Right
    ("Down", 0xFF54),      // XK_Down
    ("Page_Up", 0xFF55),   // XK_Page_Up
    ("Page_Down", 0xFF56), // XK_Page_Down
    ("End", 0xFF57),       // XK_End

    // Misc functions
    ("Print", 0xFF61),    // XK_Print
    ("Insert", 0xFF63),   // XK_Insert
    ("Menu", 0xFF67),     // XK_Menu
    ("Num_Lock", 0xFF7F), // XK_Num_Lock

    // Keypad
    ("KP_Enter", 0xFF8D),    // XK_KP_Enter
    ("KP_Multiply", 0xFFAA), // XK_KP_Multiply
    ("KP_Add", 0xFFAB),      // XK_KP_Add
    ("KP_Subtract", 0xFFAD), // XK_KP_Subtract
    ("KP_Decimal", 0xFFAE),  // XK_KP_Decimal
    ("KP_Divide", 0xFFAF),   // XK_KP_Divide
    ("KP_0", 0xFFB0),        // XK_KP_0
    ("KP_1", 0xFFB1),        // XK_KP_1
    ("KP_2", 0xFFB2),        // XK_KP_2
    ("KP_3", 0xFFB3),        // XK_KP_3
    ("KP_4", 0xFFB4),        // XK_KP_4
    ("KP_5", 0xFFB5),        // XK_KP_5
    ("KP_6", 0xFFB6),        // XK_KP_6
    ("KP_7", 0xFFB7),        // XK_KP_7
    ("KP_8", 0xFFB8),        // XK_KP_8
    ("KP_9", 0xFFB9),        // XK_KP_9

    // Function keys
    ("F1", 0xFFBE),  // XK_F1
    ("F2", 0xFFBF),  // XK_F2
    ("F3", 0xFFC0),  // XK_F3
    ("F4", 0xFFC1),  // XK_F4
    ("F5", 0xFFC2),  // XK_F5
    ("F6", 0xFFC3),  // XK_F6
    ("F7", 0xFFC4),  // XK_F7
    ("F8", 0xFFC5),  // XK_F8
    ("F9", 0xFFC6),  // XK_F9
    ("F10", 0xFFC7), // XK_F10
    ("F11", 0xFFC8), // XK_F11
    ("F12", 0xFFC9), // XK_F12

    // Modifiers
    ("Shift_L", 0xFFE1),   // XK_Shift_L
    ("Shift_R", 0xFFE2),   // XK_Shift_R
    ("Control_L", 0xFFE3), // XK_Control_L
    ("Control_R", 0xFFE4), // XK_Control_R
    ("Caps_Lock", 0xFFE5), // XK_Caps_Lock
    ("Meta_L", 0xFFE7),    // XK_Meta_L
    ("Meta_R", 0xFFE8),    // XK_Meta_R
    ("Alt_L", 0xFFE9),     // XK_Alt_L
    ("Alt_R", 0xFFEA),     // XK_Alt_R
    ("Super_L", 0xFFEB),   // XK_Super_L
    ("Super_R", 0xFFEC),   // XK_Super_R
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keysym_names_are_unique() {
        let names: HashSet<&str> = KEYSYMS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), KEYSYMS.len());
    }

    #[test]
    fn test_keysym_values_are_unique() {
        let codes: HashSet<u32> = KEYSYMS.iter().map(|(_, c)| *c).collect();
        assert_eq!(codes.len(), KEYSYMS.len(), "duplicate keysym breaks code lookup");
    }

    #[test]
    fn test_letter_keysyms_match_ascii() {
        assert!(KEYSYMS.contains(&("a", 'a' as u32)));
        assert!(KEYSYMS.contains(&("Z", 'Z' as u32)));
    }
}
