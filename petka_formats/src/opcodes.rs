/// Metadata for one script instruction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub name: &'static str,
    /// Operand-count class; operand meaning is opcode-dependent and left to
    /// an interpreter layer.
    pub operand_class: u8,
}

/// Advisory name table for the script instruction set.
///
/// Codes absent from the table are still legal data: the loaders store
/// operations verbatim and never gate on this lookup, so unknown codes
/// round-trip untouched. The table exists for tooling and debug output.
pub fn opcode_info(code: u16) -> Option<OpcodeInfo> {
    let (name, operand_class) = match code {
        1 => ("USE", 0),
        2 => ("SETPOS", 2),
        3 => ("GOTO", 0),
        4 => ("LOOK", 0),
        5 => ("SAY", 0),
        6 => ("TAKE", 0),
        9 => ("WALK", 2),
        10 => ("TALK", 0),
        11 => ("END", 0),
        14 => ("SET", 1),
        15 => ("SHOW", 1),
        16 => ("HIDE", 0),
        17 => ("DIALOG", 1),
        18 => ("ZBUFFER", 0),
        19 => ("TOTALINIT", 1),
        20 => ("ANIMATE", 1),
        21 => ("STATUS", 1),
        22 => ("ADDINV", 0),
        23 => ("DELINV", 0),
        24 => ("STOP", 1),
        25 => ("CURSOR", 1),
        26 => ("OBJECTUSE", 0),
        27 => ("ACTIVE", 1),
        28 => ("SAID", 0),
        29 => ("SETSEQ", 0),
        30 => ("ENDSEQ", 0),
        31 => ("CHECK", 0),
        32 => ("IF", 0),
        33 => ("DESCRIPTION", 0),
        34 => ("HALF", 0),
        36 => ("WALKTO", 0),
        37 => ("WALKVICH", 0),
        38 => ("INITBG", 0),
        39 => ("USERMSG", 0),
        40 => ("SYSTEM", 0),
        41 => ("SETZBUFFER", 0),
        42 => ("CONTINUE", 0),
        43 => ("MAP", 1),
        44 => ("PASSIVE", 1),
        45 => ("NOMAP", 1),
        46 => ("SETINV", 1),
        47 => ("BGSFX", 1),
        48 => ("MUSIC", 1),
        49 => ("IMAGE", 1),
        50 => ("STAND", 1),
        51 => ("ON", 1),
        52 => ("OFF", 1),
        53 => ("PLAY", 1),
        54 => ("LEAVEBG", 0),
        55 => ("SHAKE", 1),
        56 => ("SP", 2),
        57 => ("RANDOM", 1),
        58 => ("JUMP", 0),
        59 => ("JUMPVICH", 0),
        60 => ("PART", 2),
        61 => ("CHAPTER", 2),
        62 => ("AVI", 1),
        63 => ("TOMAP", 0),
        _ => return None,
    };
    Some(OpcodeInfo {
        name,
        operand_class,
    })
}

/// Convenience lookup returning just the symbolic name.
pub fn opcode_name(code: u16) -> Option<&'static str> {
    opcode_info(code).map(|info| info.name)
}
