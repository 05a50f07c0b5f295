use crate::instruction::Instruction;

/// Counters collected while a program runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Bytes executed, comments included.
    pub steps: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Highest data pointer value reached.
    pub max_dp: usize,
    /// Execution count per instruction, indexed by [`Instruction::index`].
    pub histogram: [u64; 8],
}

impl RunStats {
    pub(crate) fn record(&mut self, instr: Option<Instruction>) {
        self.steps += 1;
        if let Some(instr) = instr {
            self.histogram[instr.index()] += 1;
        }
    }

    pub fn count(&self, instr: Instruction) -> u64 {
        self.histogram[instr.index()]
    }

    /// Steps that executed comment bytes.
    pub fn noops(&self) -> u64 {
        self.steps - self.histogram.iter().sum::<u64>()
    }

    /// The most executed instruction, if any instruction ran at all.
    pub fn hottest(&self) -> Option<Instruction> {
        Instruction::ALL
            .into_iter()
            .filter(|&i| self.count(i) > 0)
            .max_by_key(|&i| self.count(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_instructions_and_noops() {
        let mut stats = RunStats::default();
        stats.record(Some(Instruction::Increment));
        stats.record(Some(Instruction::Increment));
        stats.record(None);
        stats.record(Some(Instruction::Output));
        assert_eq!(stats.steps, 4);
        assert_eq!(stats.count(Instruction::Increment), 2);
        assert_eq!(stats.count(Instruction::Output), 1);
        assert_eq!(stats.count(Instruction::Input), 0);
        assert_eq!(stats.noops(), 1);
    }

    #[test]
    fn test_hottest() {
        let mut stats = RunStats::default();
        assert_eq!(stats.hottest(), None);
        stats.record(Some(Instruction::Left));
        stats.record(Some(Instruction::Decrement));
        stats.record(Some(Instruction::Decrement));
        assert_eq!(stats.hottest(), Some(Instruction::Decrement));
    }

    #[test]
    fn test_only_noops_has_no_hottest() {
        let mut stats = RunStats::default();
        stats.record(None);
        assert_eq!(stats.hottest(), None);
        assert_eq!(stats.noops(), 1);
    }
}
