use std::io::{self, Read, Write};

use tracing::{debug, trace};

use crate::config::VmConfig;
use crate::error::{Direction, ExecError, TapeBoundsError};
use crate::instruction::Instruction;
use crate::jump::Jumps;
use crate::program::Program;
use crate::stats::RunStats;
use crate::tape::Tape;

/// Control state of an [`Engine`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    /// The instruction pointer ran off the end of the program.
    Halted,
    /// A bounds violation or stream failure stopped execution.
    Faulted,
}

/// The interpreter: a program, a tape, two cursors and an I/O pair.
///
/// Operates on a byte tape with two pointers:
/// - ip (instruction pointer): index into the program, starts at 0
/// - dp (data pointer): index into the tape, starts at 0
///
/// Cell arithmetic wraps modulo 256. The data pointer never wraps: moving it
/// off either end of the tape faults the engine with a [`TapeBoundsError`].
#[derive(Debug)]
pub struct Engine<R, W> {
    program: Program,
    jumps: Jumps,
    tape: Tape,
    ip: usize,
    dp: usize,
    state: State,
    input: R,
    output: W,
    stats: RunStats,
}

impl<R: Read, W: Write> Engine<R, W> {
    pub fn new(program: Program, input: R, output: W, config: &VmConfig) -> Self {
        let jumps = Jumps::new(&program, config.jumps);
        Self {
            program,
            jumps,
            tape: Tape::new(config.tape_len.max(1)),
            ip: 0,
            dp: 0,
            state: State::Running,
            input,
            output,
            stats: RunStats::default(),
        }
    }

    /// Execute one instruction and return the resulting state.
    ///
    /// Stepping a halted engine does nothing. Stepping a faulted engine
    /// returns [`ExecError::Faulted`].
    pub fn step(&mut self) -> Result<State, ExecError> {
        match self.state {
            State::Running => {}
            State::Halted => return Ok(State::Halted),
            State::Faulted => return Err(ExecError::Faulted { ip: self.ip }),
        }

        let Some(&byte) = self.program.as_bytes().get(self.ip) else {
            self.halt()?;
            return Ok(self.state);
        };
        let instr = Instruction::decode(byte);
        self.stats.record(instr);

        let mut next = self.ip + 1;
        match instr {
            Some(Instruction::Right) => {
                if self.dp + 1 >= self.tape.len() {
                    return Err(self.out_of_bounds(Direction::Right));
                }
                self.dp += 1;
                self.stats.max_dp = self.stats.max_dp.max(self.dp);
            }
            Some(Instruction::Left) => {
                if self.dp == 0 {
                    return Err(self.out_of_bounds(Direction::Left));
                }
                self.dp -= 1;
            }
            Some(Instruction::Increment) => self.tape.increment(self.dp),
            Some(Instruction::Decrement) => self.tape.decrement(self.dp),
            Some(Instruction::Output) => {
                let value = self.tape.get(self.dp);
                if let Err(e) = self.output.write_all(&[value]) {
                    return Err(self.io_fault(e));
                }
                self.stats.bytes_written += 1;
            }
            Some(Instruction::Input) => {
                // Let a prompt reach the user before blocking on input.
                if let Err(e) = self.output.flush() {
                    return Err(self.io_fault(e));
                }
                let value = match self.read_byte() {
                    Ok(Some(value)) => {
                        self.stats.bytes_read += 1;
                        value
                    }
                    Ok(None) => 0,
                    Err(e) => return Err(self.io_fault(e)),
                };
                self.tape.set(self.dp, value);
            }
            Some(Instruction::LoopStart) => {
                if self.tape.get(self.dp) == 0 {
                    let target = self.jumps.forward(&self.program, self.ip);
                    trace!(from = self.ip, to = target, "skip loop");
                    next = target + 1;
                }
            }
            Some(Instruction::LoopEnd) => {
                if self.tape.get(self.dp) != 0 {
                    let target = self.jumps.backward(&self.program, self.ip);
                    trace!(from = self.ip, to = target, "repeat loop");
                    next = target + 1;
                }
            }
            None => {}
        }

        self.ip = next;
        if self.ip >= self.program.len() {
            self.halt()?;
        }
        Ok(self.state)
    }

    /// Step until the program halts, then return the collected statistics.
    pub fn run(&mut self) -> Result<RunStats, ExecError> {
        while self.step()? == State::Running {}
        Ok(self.stats.clone())
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn dp(&self) -> usize {
        self.dp
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Give back the input and output streams.
    pub fn into_io(self) -> (R, W) {
        (self.input, self.output)
    }

    /// One byte from the input stream, or `None` at end-of-stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn halt(&mut self) -> Result<(), ExecError> {
        if let Err(e) = self.output.flush() {
            return Err(self.io_fault(e));
        }
        self.state = State::Halted;
        debug!(steps = self.stats.steps, dp = self.dp, "halted");
        Ok(())
    }

    fn out_of_bounds(&mut self, direction: Direction) -> ExecError {
        self.state = State::Faulted;
        let err = TapeBoundsError {
            ip: self.ip,
            dp: self.dp,
            direction,
        };
        debug!(ip = self.ip, dp = self.dp, %direction, "tape bounds fault");
        err.into()
    }

    fn io_fault(&mut self, source: io::Error) -> ExecError {
        self.state = State::Faulted;
        debug!(ip = self.ip, error = %source, "i/o fault");
        ExecError::Io {
            ip: self.ip,
            source,
        }
    }
}
