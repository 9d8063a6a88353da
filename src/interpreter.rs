use std::cmp::min;

use crate::{
    types::{
        hash::keccak256, u256, CodeReader, ExecStatus, ExecutionContext, FailStatus,
        GetOpcodeError, Memory, Opcode, Stack, Storage,
    },
    utils::SliceExt,
    SizeHints,
};

/// Value pushed by the `GAS` opcode.
///
/// This interpreter does not meter gas, so `GAS` pushes this fixed
/// placeholder (2^63 - 1). It is the same for every invocation.
pub const GAS_PLACEHOLDER: u64 = i64::MAX as u64;

/// One bytecode invocation: borrowed context and code, owned working state.
///
/// Dispatch is a match on the validated [`Opcode`] rather than a table of
/// function pointers; the contract is the same, every assigned byte routes
/// to exactly one handler that mutates stack, memory, or storage in place.
#[derive(Debug)]
pub struct Interpreter<'a> {
    pub exec_status: ExecStatus,
    pub context: &'a ExecutionContext,
    pub code_reader: CodeReader<'a>,
    pub stack: Stack,
    pub memory: Memory,
    pub storage: &'a mut Storage,
    pub output: Option<Vec<u8>>,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        context: &'a ExecutionContext,
        code: &'a [u8],
        storage: &'a mut Storage,
        hints: SizeHints,
    ) -> Self {
        Self {
            exec_status: ExecStatus::Running,
            context,
            code_reader: CodeReader::new(code),
            stack: Stack::with_capacity(hints.stack_slots),
            memory: Memory::with_capacity(hints.memory_words),
            storage,
            output: None,
        }
    }

    pub fn run(mut self) -> Result<Self, FailStatus> {
        loop {
            let op = match self.code_reader.get() {
                Ok(op) => op,
                Err(GetOpcodeError::OutOfRange) => {
                    self.exec_status = ExecStatus::Stopped;
                    break;
                }
                Err(GetOpcodeError::Invalid) => {
                    tracing::debug!(
                        pc = self.code_reader.pc(),
                        byte = self.code_reader[self.code_reader.pc()],
                        "unassigned opcode"
                    );
                    return Err(FailStatus::InvalidOpcode);
                }
            };
            match op {
                Opcode::Stop => {
                    self.exec_status = ExecStatus::Stopped;
                    break;
                }
                Opcode::Add => {
                    let [value1, value2] = self.stack.pop()?;
                    self.stack.push(value1 + value2)?;
                }
                Opcode::Mul => {
                    let [fac1, fac2] = self.stack.pop()?;
                    self.stack.push(fac1 * fac2)?;
                }
                Opcode::Sub => {
                    let [value1, value2] = self.stack.pop()?;
                    self.stack.push(value1 - value2)?;
                }
                Opcode::Div => {
                    let [value, denominator] = self.stack.pop()?;
                    self.stack.push(value / denominator)?;
                }
                Opcode::SDiv => {
                    let [value, denominator] = self.stack.pop()?;
                    self.stack.push(value.sdiv(denominator))?;
                }
                Opcode::Mod => {
                    let [value, denominator] = self.stack.pop()?;
                    self.stack.push(value % denominator)?;
                }
                Opcode::SMod => {
                    let [value, denominator] = self.stack.pop()?;
                    self.stack.push(value.smod(denominator))?;
                }
                Opcode::AddMod => {
                    let [value1, value2, denominator] = self.stack.pop()?;
                    self.stack.push(u256::addmod(value1, value2, denominator))?;
                }
                Opcode::MulMod => {
                    let [fac1, fac2, denominator] = self.stack.pop()?;
                    self.stack.push(u256::mulmod(fac1, fac2, denominator))?;
                }
                Opcode::Exp => {
                    let [base, exponent] = self.stack.pop()?;
                    self.stack.push(base.exp(exponent))?;
                }
                Opcode::SignExtend => {
                    let [position, value] = self.stack.pop()?;
                    self.stack.push(position.signextend(value))?;
                }
                Opcode::Lt => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs < rhs)?;
                }
                Opcode::Gt => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs > rhs)?;
                }
                Opcode::SLt => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs.slt(&rhs))?;
                }
                Opcode::SGt => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs.sgt(&rhs))?;
                }
                Opcode::Eq => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs == rhs)?;
                }
                Opcode::IsZero => {
                    let [value] = self.stack.pop()?;
                    self.stack.push(value == u256::ZERO)?;
                }
                Opcode::And => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs & rhs)?;
                }
                Opcode::Or => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs | rhs)?;
                }
                Opcode::Xor => {
                    let [lhs, rhs] = self.stack.pop()?;
                    self.stack.push(lhs ^ rhs)?;
                }
                Opcode::Not => {
                    let [value] = self.stack.pop()?;
                    self.stack.push(!value)?;
                }
                Opcode::Byte => {
                    let [index, value] = self.stack.pop()?;
                    self.stack.push(value.byte_at(index))?;
                }
                Opcode::Shl => {
                    let [shift, value] = self.stack.pop()?;
                    self.stack.push(value << shift)?;
                }
                Opcode::Shr => {
                    let [shift, value] = self.stack.pop()?;
                    self.stack.push(value >> shift)?;
                }
                Opcode::Sar => {
                    let [shift, value] = self.stack.pop()?;
                    self.stack.push(value.sar(shift))?;
                }
                Opcode::Sha3 => {
                    let [offset, len] = self.stack.pop()?;
                    let len = u64::try_from(len).map_err(|_| FailStatus::InvalidMemoryAccess)?;
                    let data = self.memory.get_mut_slice(offset, len)?;
                    let hash = keccak256(data);
                    self.stack.push(hash)?;
                }
                Opcode::Address => {
                    self.stack.push(self.context.address)?;
                }
                Opcode::Balance => {
                    let [address] = self.stack.pop()?;
                    self.stack.push(self.context.balance(&address.into()))?;
                }
                Opcode::Origin => {
                    self.stack.push(self.context.origin)?;
                }
                Opcode::Caller => {
                    self.stack.push(self.context.caller)?;
                }
                Opcode::CallValue => {
                    self.stack.push(self.context.call_value)?;
                }
                Opcode::CallDataLoad => {
                    let [offset] = self.stack.pop()?;
                    let (offset, overflow) = offset.into_u64_with_overflow();
                    let offset = offset as usize;
                    let call_data = self.context.call_data.as_slice();
                    if overflow || offset >= call_data.len() {
                        self.stack.push(u256::ZERO)?;
                    } else {
                        let end = min(call_data.len(), offset + 32);
                        let mut bytes = [0; 32];
                        bytes[..end - offset].copy_from_slice(&call_data[offset..end]);
                        self.stack.push(bytes)?;
                    }
                }
                Opcode::CallDataSize => {
                    self.stack.push(self.context.call_data.len())?;
                }
                Opcode::CallDataCopy => {
                    let [dest_offset, offset, len] = self.stack.pop()?;
                    if len != u256::ZERO {
                        let len =
                            u64::try_from(len).map_err(|_| FailStatus::InvalidMemoryAccess)?;
                        let src = self.context.call_data.get_within_bounds(offset, len);
                        let dest = self.memory.get_mut_slice(dest_offset, len)?;
                        dest.copy_padded(src);
                    }
                }
                Opcode::CodeSize => {
                    self.stack.push(self.code_reader.len())?;
                }
                Opcode::CodeCopy => {
                    let [dest_offset, offset, len] = self.stack.pop()?;
                    if len != u256::ZERO {
                        let len =
                            u64::try_from(len).map_err(|_| FailStatus::InvalidMemoryAccess)?;
                        let src = self.code_reader.get_within_bounds(offset, len);
                        let dest = self.memory.get_mut_slice(dest_offset, len)?;
                        dest.copy_padded(src);
                    }
                }
                Opcode::Coinbase => {
                    self.stack.push(self.context.coinbase)?;
                }
                Opcode::Timestamp => {
                    self.stack.push(self.context.timestamp)?;
                }
                Opcode::Number => {
                    self.stack.push(self.context.number)?;
                }
                Opcode::Difficulty => {
                    self.stack.push(self.context.difficulty)?;
                }
                Opcode::GasLimit => {
                    self.stack.push(self.context.gas_limit)?;
                }
                Opcode::ChainId => {
                    self.stack.push(self.context.chain_id)?;
                }
                Opcode::SelfBalance => {
                    self.stack.push(self.context.self_balance())?;
                }
                Opcode::BaseFee => {
                    self.stack.push(self.context.base_fee)?;
                }
                Opcode::Pop => {
                    let [_] = self.stack.pop()?;
                }
                Opcode::MLoad => {
                    let [offset] = self.stack.pop()?;
                    let word = self.memory.get_word(offset)?;
                    self.stack.push(word)?;
                }
                Opcode::MStore => {
                    let [offset, value] = self.stack.pop()?;
                    let dest = self.memory.get_mut_slice(offset, 32)?;
                    dest.copy_from_slice(&value.to_be_bytes());
                }
                Opcode::MStore8 => {
                    let [offset, value] = self.stack.pop()?;
                    let dest = self.memory.get_mut_byte(offset)?;
                    *dest = value[31];
                }
                Opcode::SLoad => {
                    let [key] = self.stack.pop()?;
                    self.stack.push(self.storage.load(&key))?;
                }
                Opcode::SStore => {
                    let [key, value] = self.stack.pop()?;
                    self.storage.store(key, value);
                }
                Opcode::Jump => {
                    let [dest] = self.stack.pop()?;
                    self.code_reader.try_jump(dest)?;
                }
                Opcode::JumpI => {
                    let [dest, cond] = self.stack.pop()?;
                    if cond == u256::ZERO {
                        self.code_reader.next();
                    } else {
                        self.code_reader.try_jump(dest)?;
                    }
                }
                Opcode::Pc => {
                    self.stack.push(self.code_reader.pc())?;
                }
                Opcode::MSize => {
                    self.stack.push(self.memory.len())?;
                }
                Opcode::Gas => {
                    self.stack.push(GAS_PLACEHOLDER)?;
                }
                Opcode::JumpDest => {}
                Opcode::Push1 => self.push(1)?,
                Opcode::Push2 => self.push(2)?,
                Opcode::Push3 => self.push(3)?,
                Opcode::Push4 => self.push(4)?,
                Opcode::Push5 => self.push(5)?,
                Opcode::Push6 => self.push(6)?,
                Opcode::Push7 => self.push(7)?,
                Opcode::Push8 => self.push(8)?,
                Opcode::Push9 => self.push(9)?,
                Opcode::Push10 => self.push(10)?,
                Opcode::Push11 => self.push(11)?,
                Opcode::Push12 => self.push(12)?,
                Opcode::Push13 => self.push(13)?,
                Opcode::Push14 => self.push(14)?,
                Opcode::Push15 => self.push(15)?,
                Opcode::Push16 => self.push(16)?,
                Opcode::Push17 => self.push(17)?,
                Opcode::Push18 => self.push(18)?,
                Opcode::Push19 => self.push(19)?,
                Opcode::Push20 => self.push(20)?,
                Opcode::Push21 => self.push(21)?,
                Opcode::Push22 => self.push(22)?,
                Opcode::Push23 => self.push(23)?,
                Opcode::Push24 => self.push(24)?,
                Opcode::Push25 => self.push(25)?,
                Opcode::Push26 => self.push(26)?,
                Opcode::Push27 => self.push(27)?,
                Opcode::Push28 => self.push(28)?,
                Opcode::Push29 => self.push(29)?,
                Opcode::Push30 => self.push(30)?,
                Opcode::Push31 => self.push(31)?,
                Opcode::Push32 => self.push(32)?,
                Opcode::Dup1 => self.dup(1)?,
                Opcode::Dup2 => self.dup(2)?,
                Opcode::Dup3 => self.dup(3)?,
                Opcode::Dup4 => self.dup(4)?,
                Opcode::Dup5 => self.dup(5)?,
                Opcode::Dup6 => self.dup(6)?,
                Opcode::Dup7 => self.dup(7)?,
                Opcode::Dup8 => self.dup(8)?,
                Opcode::Dup9 => self.dup(9)?,
                Opcode::Dup10 => self.dup(10)?,
                Opcode::Dup11 => self.dup(11)?,
                Opcode::Dup12 => self.dup(12)?,
                Opcode::Dup13 => self.dup(13)?,
                Opcode::Dup14 => self.dup(14)?,
                Opcode::Dup15 => self.dup(15)?,
                Opcode::Dup16 => self.dup(16)?,
                Opcode::Swap1 => self.swap(1)?,
                Opcode::Swap2 => self.swap(2)?,
                Opcode::Swap3 => self.swap(3)?,
                Opcode::Swap4 => self.swap(4)?,
                Opcode::Swap5 => self.swap(5)?,
                Opcode::Swap6 => self.swap(6)?,
                Opcode::Swap7 => self.swap(7)?,
                Opcode::Swap8 => self.swap(8)?,
                Opcode::Swap9 => self.swap(9)?,
                Opcode::Swap10 => self.swap(10)?,
                Opcode::Swap11 => self.swap(11)?,
                Opcode::Swap12 => self.swap(12)?,
                Opcode::Swap13 => self.swap(13)?,
                Opcode::Swap14 => self.swap(14)?,
                Opcode::Swap15 => self.swap(15)?,
                Opcode::Swap16 => self.swap(16)?,
                Opcode::Return => {
                    self.output = Some(self.copy_return_data()?);
                    self.exec_status = ExecStatus::Returned;
                    break;
                }
                Opcode::Revert => {
                    self.output = Some(self.copy_return_data()?);
                    self.exec_status = ExecStatus::Reverted;
                    break;
                }
            }

            // PUSH advances past its immediate on its own; a taken JUMP must
            // leave the pc on the JUMPDEST so it executes next step.
            if !(Opcode::Push1 as u8..=Opcode::Push32 as u8).contains(&(op as u8))
                && op != Opcode::Jump
                && op != Opcode::JumpI
            {
                self.code_reader.next();
            }
        }

        Ok(self)
    }

    fn push(&mut self, len: usize) -> Result<(), FailStatus> {
        self.code_reader.next();
        let data = self.code_reader.get_push_data(len);
        self.stack.push(data)?;
        Ok(())
    }

    fn dup(&mut self, nth: usize) -> Result<(), FailStatus> {
        let value = self.stack.nth(nth - 1)?;
        self.stack.push(value)?;
        Ok(())
    }

    fn swap(&mut self, nth: usize) -> Result<(), FailStatus> {
        self.stack.swap_with_top(nth)?;
        Ok(())
    }

    fn copy_return_data(&mut self) -> Result<Vec<u8>, FailStatus> {
        let [offset, len] = self.stack.pop()?;
        let len = u64::try_from(len).map_err(|_| FailStatus::BadReturnBounds)?;
        let data = self
            .memory
            .get_mut_slice(offset, len)
            .map_err(|_| FailStatus::BadReturnBounds)?;
        Ok(data.to_owned())
    }
}

/// What `evaluate` hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    pub output: Vec<u8>,
}

impl From<Interpreter<'_>> for RunResult {
    fn from(interpreter: Interpreter) -> Self {
        Self {
            success: interpreter.exec_status != ExecStatus::Reverted,
            output: interpreter.output.unwrap_or_default(),
        }
    }
}

impl From<FailStatus> for RunResult {
    fn from(fail_status: FailStatus) -> Self {
        Self {
            success: false,
            output: fail_status.reason_bytes(),
        }
    }
}
