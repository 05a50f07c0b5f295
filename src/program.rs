use std::fmt::Write as _;
use std::io::Read;

use tracing::debug;

use crate::error::{Imbalance, LoadError};
use crate::instruction::{Instruction, LBRACKET, RBRACKET, is_instruction};

/// Historical program and tape size.
pub const DEFAULT_CAPACITY: usize = 30_000;

/// A loaded, bracket-balanced instruction sequence.
///
/// Bytes are kept verbatim, comments included. The only way to build one is
/// through [`Program::load`] or [`Program::from_bytes`], so every `Program`
/// has balanced brackets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    code: Box<[u8]>,
}

impl Program {
    /// Read `source` to end-of-stream and validate the result.
    ///
    /// At most `capacity + 1` bytes are pulled from the source, so an
    /// oversized or endless stream is rejected without being buffered whole.
    pub fn load<R: Read>(source: R, capacity: usize) -> Result<Self, LoadError> {
        let mut code = Vec::new();
        source
            .take((capacity as u64).saturating_add(1))
            .read_to_end(&mut code)?;
        Self::from_bytes(code, capacity)
    }

    pub fn from_bytes(code: impl Into<Vec<u8>>, capacity: usize) -> Result<Self, LoadError> {
        let code = code.into();
        if code.len() > capacity {
            return Err(LoadError::TooLarge { capacity });
        }
        check_balance(&code).map_err(LoadError::UnbalancedBrackets)?;

        let program = Self {
            code: code.into_boxed_slice(),
        };
        debug!(
            len = program.len(),
            instructions = program.instruction_count(),
            "program loaded"
        );
        Ok(program)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Number of bytes that are real instructions (not comments).
    pub fn instruction_count(&self) -> usize {
        self.code
            .iter()
            .filter(|&&b| is_instruction(b))
            .count()
    }

    /// Pretty-print a disassembly for human inspection.
    ///
    /// One line per instruction, indented by loop depth. Comment bytes are
    /// skipped but keep their indices, so the left column is always the ip.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for (ip, &byte) in self.code.iter().enumerate() {
            let Some(instr) = Instruction::decode(byte) else {
                continue;
            };
            if instr == Instruction::LoopEnd {
                depth -= 1;
            }
            let _ = writeln!(
                out,
                "{ip:05}: {}{}  {}",
                "  ".repeat(depth),
                byte as char,
                instr.mnemonic()
            );
            if instr == Instruction::LoopStart {
                depth += 1;
            }
        }
        out
    }
}

/// Single pass with a nesting counter.
fn check_balance(code: &[u8]) -> Result<(), Imbalance> {
    let mut depth = 0usize;
    for (index, &byte) in code.iter().enumerate() {
        match byte {
            LBRACKET => depth += 1,
            RBRACKET => {
                if depth == 0 {
                    return Err(Imbalance::UnmatchedClose { index });
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(Imbalance::UnclosedOpen { open: depth });
    }
    Ok(())
}
