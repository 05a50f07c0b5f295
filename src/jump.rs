use crate::instruction::{LBRACKET, RBRACKET};
use crate::program::Program;

/// How the engine resolves the target of a taken `[` or `]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum JumpStrategy {
    /// Rescan the program on every taken jump.
    #[default]
    Rescan,
    /// Build a [`JumpTable`] once before execution starts.
    Table,
}

/// Index of the `]` matching the `[` at `ip`.
///
/// Scans forward with a depth counter; the first `]` seen at depth 0 is the
/// match. The program's brackets are balanced, so the scan always ends
/// inside the buffer.
pub fn forward_match(program: &Program, ip: usize) -> usize {
    let code = program.as_bytes();
    debug_assert_eq!(code[ip], LBRACKET);
    let mut depth = 0usize;
    let mut i = ip;
    loop {
        i += 1;
        match code[i] {
            LBRACKET => depth += 1,
            RBRACKET if depth == 0 => return i,
            RBRACKET => depth -= 1,
            _ => {}
        }
    }
}

/// Index of the `[` matching the `]` at `ip`. Mirror image of [`forward_match`].
pub fn backward_match(program: &Program, ip: usize) -> usize {
    let code = program.as_bytes();
    debug_assert_eq!(code[ip], RBRACKET);
    let mut depth = 0usize;
    let mut i = ip;
    loop {
        i -= 1;
        match code[i] {
            RBRACKET => depth += 1,
            LBRACKET if depth == 0 => return i,
            LBRACKET => depth -= 1,
            _ => {}
        }
    }
}

/// Precomputed bracket partners for every position in a program.
#[derive(Clone, Debug)]
pub struct JumpTable {
    /// `targets[i]` is the matching bracket for a bracket at `i`, or
    /// `usize::MAX` if position `i` is not a bracket.
    targets: Vec<usize>,
}

impl JumpTable {
    pub fn build(program: &Program) -> Self {
        let code = program.as_bytes();
        let mut targets = vec![usize::MAX; code.len()];
        let mut stack = Vec::new();

        for (i, &byte) in code.iter().enumerate() {
            match byte {
                LBRACKET => stack.push(i),
                RBRACKET => {
                    if let Some(open) = stack.pop() {
                        targets[open] = i;
                        targets[i] = open;
                    }
                }
                _ => {}
            }
        }

        Self { targets }
    }

    /// Matching bracket for the bracket at `ip`.
    pub fn target(&self, ip: usize) -> usize {
        self.targets[ip]
    }
}

/// Jump resolver selected by a [`JumpStrategy`], owned by the engine.
#[derive(Clone, Debug)]
pub(crate) enum Jumps {
    Rescan,
    Table(JumpTable),
}

impl Jumps {
    pub(crate) fn new(program: &Program, strategy: JumpStrategy) -> Self {
        match strategy {
            JumpStrategy::Rescan => Jumps::Rescan,
            JumpStrategy::Table => Jumps::Table(JumpTable::build(program)),
        }
    }

    pub(crate) fn forward(&self, program: &Program, ip: usize) -> usize {
        match self {
            Jumps::Rescan => forward_match(program, ip),
            Jumps::Table(table) => table.target(ip),
        }
    }

    pub(crate) fn backward(&self, program: &Program, ip: usize) -> usize {
        match self {
            Jumps::Rescan => backward_match(program, ip),
            Jumps::Table(table) => table.target(ip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::DEFAULT_CAPACITY;

    fn program(code: &[u8]) -> Program {
        Program::from_bytes(code, DEFAULT_CAPACITY).unwrap()
    }

    #[test]
    fn test_adjacent_pair() {
        let p = program(b"[]");
        assert_eq!(forward_match(&p, 0), 1);
        assert_eq!(backward_match(&p, 1), 0);
    }

    #[test]
    fn test_nested_brackets() {
        let p = program(b"[[]]");
        assert_eq!(forward_match(&p, 0), 3);
        assert_eq!(forward_match(&p, 1), 2);
        assert_eq!(backward_match(&p, 3), 0);
        assert_eq!(backward_match(&p, 2), 1);
    }

    #[test]
    fn test_siblings_and_comments() {
        let p = program(b"a[b[c]d[e]f]g[]");
        assert_eq!(forward_match(&p, 1), 11);
        assert_eq!(forward_match(&p, 3), 5);
        assert_eq!(forward_match(&p, 7), 9);
        assert_eq!(forward_match(&p, 13), 14);
        assert_eq!(backward_match(&p, 11), 1);
        assert_eq!(backward_match(&p, 9), 7);
    }

    #[test]
    fn test_table_nested() {
        let table = JumpTable::build(&program(b"[[]]"));
        assert_eq!(table.target(0), 3);
        assert_eq!(table.target(1), 2);
        assert_eq!(table.target(2), 1);
        assert_eq!(table.target(3), 0);
    }

    #[test]
    fn test_table_non_bracket_positions() {
        let table = JumpTable::build(&program(b"+[-]"));
        assert_eq!(table.target(0), usize::MAX);
        assert_eq!(table.target(2), usize::MAX);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::program::DEFAULT_CAPACITY;
    use proptest::prelude::*;

    /// Balanced bracket programs with some filler between brackets.
    fn balanced() -> impl Strategy<Value = Vec<u8>> {
        let leaf = prop::collection::vec(prop::sample::select(vec![b'+', b'-', b'x']), 0..4);
        leaf.prop_recursive(4, 64, 4, |inner| {
            prop::collection::vec(inner, 1..4).prop_map(|parts| {
                let mut out = vec![b'['];
                for part in parts {
                    out.extend(part);
                }
                out.push(b']');
                out
            })
        })
    }

    proptest! {
        #[test]
        fn rescan_agrees_with_table(parts in prop::collection::vec(balanced(), 1..6)) {
            let code: Vec<u8> = parts.concat();
            let p = Program::from_bytes(code, DEFAULT_CAPACITY).unwrap();
            let table = JumpTable::build(&p);
            for (ip, &b) in p.as_bytes().iter().enumerate() {
                if b == LBRACKET {
                    let close = forward_match(&p, ip);
                    prop_assert_eq!(close, table.target(ip));
                    prop_assert_eq!(backward_match(&p, close), ip);
                }
            }
        }
    }
}
