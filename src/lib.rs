//! Interpreter for a subset of EVM bytecode.
//!
//! Given an [`ExecutionContext`] and a byte string of opcodes, [`evaluate`]
//! runs the code against a fresh 256-bit operand stack, a zero-initialised
//! scratch memory, and a key/value storage map, and reports either success
//! with return bytes or failure with revert or diagnostic bytes.
//!
//! The interpreter is bit-exact with EVM semantics for the opcodes it
//! supports: wrapping 256-bit arithmetic, two's complement signed ops,
//! KECCAK-256, jumpdest-validated control flow, and zero-fill data copies.
//! It performs no gas metering and has no contract-call machinery; each
//! invocation is independent and strictly synchronous.
//!
//! ```
//! use evmlite::{evaluate, ExecutionContext};
//!
//! // PUSH1 1; PUSH1 3; MUL; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
//! let code = [
//!     0x60, 0x01, 0x60, 0x03, 0x02, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3,
//! ];
//! let result = evaluate(&ExecutionContext::default(), &code);
//! assert!(result.success);
//! assert_eq!(result.output[31], 3);
//! ```

mod interpreter;
mod types;
mod utils;

pub use interpreter::{Interpreter, RunResult, GAS_PLACEHOLDER};
pub use types::{
    u256, Address, CodeReader, ExecStatus, ExecutionContext, FailStatus, Memory, Opcode, Stack,
    Storage,
};

/// Pre-sizing for the working state of one invocation.
///
/// Purely an allocation hint; none of the values limit what the code may use.
#[derive(Debug, Clone, Copy)]
pub struct SizeHints {
    pub stack_slots: usize,
    pub storage_slots: usize,
    pub memory_words: usize,
}

impl Default for SizeHints {
    fn default() -> Self {
        Self {
            stack_slots: 32,
            storage_slots: 10,
            memory_words: 32,
        }
    }
}

/// Run `code` against `context` with default sizing and a fresh storage map.
pub fn evaluate(context: &ExecutionContext, code: &[u8]) -> RunResult {
    evaluate_with_hints(context, code, SizeHints::default())
}

/// Run `code` against `context` with explicit sizing hints.
pub fn evaluate_with_hints(context: &ExecutionContext, code: &[u8], hints: SizeHints) -> RunResult {
    let mut storage = Storage::with_capacity(hints.storage_slots);
    evaluate_with_storage(context, code, hints, &mut storage)
}

/// Run `code` against `context`, reading and writing the caller's storage.
///
/// This is how a host shares one storage map across several invocations;
/// `evaluate` wires a fresh map instead.
pub fn evaluate_with_storage(
    context: &ExecutionContext,
    code: &[u8],
    hints: SizeHints,
    storage: &mut Storage,
) -> RunResult {
    tracing::trace!(code_len = code.len(), "evaluating bytecode");
    let interpreter = Interpreter::new(context, code, storage, hints);
    let result = match interpreter.run() {
        Ok(interpreter) => RunResult::from(interpreter),
        Err(fail_status) => {
            tracing::debug!(reason = %fail_status, "evaluation failed");
            RunResult::from(fail_status)
        }
    };
    tracing::trace!(
        success = result.success,
        output_len = result.output.len(),
        "evaluation finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use crate::{evaluate, evaluate_with_storage, u256, ExecutionContext, SizeHints, Storage};

    #[test]
    fn stop_yields_empty_success() {
        let result = evaluate(&ExecutionContext::default(), &[0x00]);
        assert!(result.success);
        assert!(result.output.is_empty());
    }

    #[test]
    fn failure_reasons_are_ascii() {
        let context = ExecutionContext::default();
        assert_eq!(evaluate(&context, &[0x0c]).output, b"invalid op");
        assert_eq!(
            evaluate(&context, &[0x60, 0x00, 0x56]).output,
            b"invalid jump"
        );
        assert_eq!(evaluate(&context, &[0x01]).output, b"stack underflow");
    }

    #[test]
    fn shared_storage_survives_invocations() {
        let context = ExecutionContext::default();
        let mut storage = Storage::default();

        // PUSH1 7; PUSH1 1; SSTORE
        let write = [0x60, 0x07, 0x60, 0x01, 0x55];
        // PUSH1 1; SLOAD; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
        let read = [
            0x60, 0x01, 0x54, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3,
        ];

        let result = evaluate_with_storage(&context, &write, SizeHints::default(), &mut storage);
        assert!(result.success);
        assert_eq!(storage.load(&u256::ONE), u256::from(7u8));

        let result = evaluate_with_storage(&context, &read, SizeHints::default(), &mut storage);
        assert!(result.success);
        assert_eq!(result.output, u256::from(7u8).to_be_bytes());

        // a fresh map does not see the write
        let result = evaluate(&context, &read);
        assert!(result.success);
        assert_eq!(result.output, u256::ZERO.to_be_bytes());
    }
}
