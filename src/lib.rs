pub mod config;
pub mod engine;
pub mod error;
pub mod instruction;
pub mod jump;
pub mod program;
pub mod stats;
pub mod tape;

use std::io::{Read, Write};

pub use config::VmConfig;
pub use engine::{Engine, State};
pub use error::{Error, ExecError, LoadError, Result, TapeBoundsError};
pub use program::{DEFAULT_CAPACITY, Program};
pub use stats::RunStats;

/// Load a program from `source` and run it to completion against `input`
/// and `output`.
///
/// `source` is read to end-of-stream before the first instruction runs.
pub fn run_program<P, R, W>(source: P, input: R, output: W, config: &VmConfig) -> Result<RunStats>
where
    P: Read,
    R: Read,
    W: Write,
{
    let program = Program::load(source, config.program_capacity)?;
    let mut engine = Engine::new(program, input, output, config);
    Ok(engine.run()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_program_separate_streams() {
        let mut out = Vec::new();
        let stats = run_program(&b",+."[..], &b"A"[..], &mut out, &VmConfig::default()).unwrap();
        assert_eq!(out, b"B");
        assert_eq!(stats.bytes_read, 1);
    }

    #[test]
    fn test_run_program_shared_stream_sees_eof() {
        // Program text and runtime input come from one stream: by the time
        // `,` executes, the loader has drained it, so the cell reads as 0.
        let mut shared: &[u8] = b"+++,.";
        let program = Program::load(&mut shared, DEFAULT_CAPACITY).unwrap();
        let mut out = Vec::new();
        let mut engine = Engine::new(program, &mut shared, &mut out, &VmConfig::default());
        engine.run().unwrap();
        drop(engine);
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn test_run_program_reports_load_errors() {
        let err = run_program(&b"[["[..], std::io::empty(), Vec::new(), &VmConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::UnbalancedBrackets(_))));
    }

    #[test]
    fn test_run_program_reports_bounds_errors() {
        let err = run_program(&b"<"[..], std::io::empty(), Vec::new(), &VmConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Exec(ExecError::TapeBounds(_))));
    }
}
