/// The eight classic Brainfuck instructions.
///
/// Every other byte value is a comment and executes as a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Right,
    Left,
    Increment,
    Decrement,
    Output,
    Input,
    LoopStart,
    LoopEnd,
}

pub const GREATER: u8 = b'>';
pub const LESS: u8 = b'<';
pub const PLUS: u8 = b'+';
pub const MINUS: u8 = b'-';
pub const DOT: u8 = b'.';
pub const COMMA: u8 = b',';
pub const LBRACKET: u8 = b'[';
pub const RBRACKET: u8 = b']';

impl Instruction {
    pub const ALL: [Instruction; 8] = [
        Instruction::Right,
        Instruction::Left,
        Instruction::Increment,
        Instruction::Decrement,
        Instruction::Output,
        Instruction::Input,
        Instruction::LoopStart,
        Instruction::LoopEnd,
    ];

    pub fn decode(byte: u8) -> Option<Self> {
        match byte {
            GREATER => Some(Instruction::Right),
            LESS => Some(Instruction::Left),
            PLUS => Some(Instruction::Increment),
            MINUS => Some(Instruction::Decrement),
            DOT => Some(Instruction::Output),
            COMMA => Some(Instruction::Input),
            LBRACKET => Some(Instruction::LoopStart),
            RBRACKET => Some(Instruction::LoopEnd),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Instruction::Right => GREATER,
            Instruction::Left => LESS,
            Instruction::Increment => PLUS,
            Instruction::Decrement => MINUS,
            Instruction::Output => DOT,
            Instruction::Input => COMMA,
            Instruction::LoopStart => LBRACKET,
            Instruction::LoopEnd => RBRACKET,
        }
    }

    /// Short assembly-style name used in listings.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Instruction::Right => "NEXT",
            Instruction::Left => "PREV",
            Instruction::Increment => "INC",
            Instruction::Decrement => "DEC",
            Instruction::Output => "PUT",
            Instruction::Input => "GET",
            Instruction::LoopStart => "BEGIN",
            Instruction::LoopEnd => "END",
        }
    }

    /// Position of this instruction in [`Instruction::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Returns true if the byte is one of the eight instructions rather than a comment.
pub fn is_instruction(byte: u8) -> bool {
    Instruction::decode(byte).is_some()
}
