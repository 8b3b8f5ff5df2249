//! Virtual machine for executing cvm programs.

use cvm_bytecode::{
    CODE_MEMORY, Comparison, Instruction, InstructionSet, LoadError, Opcode, Operand, Program,
    StoreOperands,
};

use super::error::{Fault, RuntimeError};
use super::trace::{NoopTracer, Tracer};
use crate::stack::{STACK_CAPACITY, ValueStack};

/// Runtime limits for program execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct FuelLimits {
    /// Maximum executed instructions (default: unlimited).
    pub(crate) exec_fuel: Option<u32>,
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u32> {
        self.exec_fuel
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Execution {
    /// Residual stack, top first.
    pub values: Vec<i32>,
    /// Value discarded by the most recent `pop`.
    pub last_popped: Option<i32>,
    /// Executed instructions, including a final `hlt`.
    pub steps: u64,
}

/// Configured virtual machine. Each run starts from a fresh stack.
#[derive(Clone, Copy, Debug)]
pub struct Vm {
    set: InstructionSet,
    stack_capacity: usize,
    code_memory: usize,
    limits: FuelLimits,
}

impl Default for Vm {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for VM instances.
#[derive(Clone, Copy, Debug)]
pub struct VmBuilder {
    set: InstructionSet,
    stack_capacity: usize,
    code_memory: usize,
    limits: FuelLimits,
}

impl Default for VmBuilder {
    fn default() -> Self {
        Self {
            set: InstructionSet::default(),
            stack_capacity: STACK_CAPACITY,
            code_memory: CODE_MEMORY,
            limits: FuelLimits::default(),
        }
    }
}

impl VmBuilder {
    /// Create a new VM builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instruction_set(mut self, set: InstructionSet) -> Self {
        self.set = set;
        self
    }

    pub fn stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    pub fn code_memory(mut self, bytes: usize) -> Self {
        self.code_memory = bytes;
        self
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Build the VM.
    pub fn build(self) -> Vm {
        Vm {
            set: self.set,
            stack_capacity: self.stack_capacity,
            code_memory: self.code_memory,
            limits: self.limits,
        }
    }
}

impl Vm {
    /// Create a builder for configuring a VM.
    pub fn builder() -> VmBuilder {
        VmBuilder::new()
    }

    pub fn instruction_set(&self) -> InstructionSet {
        self.set
    }

    /// Load raw bytecode into this VM's code memory.
    pub fn load(&self, bytes: &[u8]) -> Result<Program, LoadError> {
        Program::load_with_limit(bytes, self.code_memory)
    }

    /// Run `program` with `args` pre-loaded onto the stack, bottom first.
    ///
    /// This is a convenience method that uses `NoopTracer`, which gets
    /// completely optimized away at compile time.
    pub fn run(&self, program: &Program, args: &[i32]) -> Result<Execution, RuntimeError> {
        self.run_with(program, args, &mut NoopTracer)
    }

    /// Run `program` with a tracer for debugging.
    pub fn run_with<T: Tracer>(
        &self,
        program: &Program,
        args: &[i32],
        tracer: &mut T,
    ) -> Result<Execution, RuntimeError> {
        let mut machine = Machine {
            code: program,
            set: self.set,
            stack: ValueStack::new(self.stack_capacity),
            mi: 0,
            last_popped: None,
            steps: 0,
            fuel: self.limits.exec_fuel,
        };

        for &arg in args {
            machine
                .stack
                .push(arg)
                .map_err(|e| machine.fail(None, e.into(), 0))?;
        }

        machine.execute(tracer)
    }
}

/// Control transfer requested by one instruction.
enum Flow {
    Next,
    Jump(usize),
    Call { target: usize, return_to: usize },
    Return(usize),
    Halt,
}

/// State of a single run.
struct Machine<'p> {
    code: &'p Program,
    set: InstructionSet,
    stack: ValueStack,
    /// Instruction pointer, in `[0, code.len()]`.
    mi: usize,
    last_popped: Option<i32>,
    steps: u64,
    fuel: Option<u32>,
}

impl Machine<'_> {
    fn execute<T: Tracer>(mut self, tracer: &mut T) -> Result<Execution, RuntimeError> {
        while self.mi < self.code.len() {
            let offset = self.mi;

            if let Some(fuel) = &mut self.fuel {
                if *fuel == 0 {
                    return Err(self.fault(None, Fault::FuelExhausted, offset, tracer));
                }
                *fuel -= 1;
            }

            let instr = match self.code.decode_at(offset, self.set) {
                Ok(instr) => instr,
                Err(e) => return Err(self.fault(None, e.into(), offset, tracer)),
            };
            tracer.trace_instruction(offset, &instr, self.stack.len());
            self.steps += 1;

            let next = offset + instr.size();
            match self.exec(instr, next) {
                Ok(Flow::Next) => self.mi = next,
                Ok(Flow::Jump(target)) => {
                    tracer.trace_jump(target);
                    self.mi = target;
                }
                Ok(Flow::Call { target, return_to }) => {
                    tracer.trace_call(target, return_to);
                    self.mi = target;
                }
                Ok(Flow::Return(target)) => {
                    tracer.trace_return(target);
                    self.mi = target;
                }
                Ok(Flow::Halt) => {
                    tracer.trace_halt();
                    break;
                }
                Err(fault) => {
                    return Err(self.fault(Some(instr.opcode()), fault, offset, tracer));
                }
            }
        }

        Ok(Execution {
            values: self.stack.drain_top_first(),
            last_popped: self.last_popped,
            steps: self.steps,
        })
    }

    fn fault<T: Tracer>(
        &mut self,
        opcode: Option<Opcode>,
        fault: Fault,
        offset: usize,
        tracer: &mut T,
    ) -> RuntimeError {
        let err = self.fail(opcode, fault, offset);
        tracer.trace_fault(&err);
        err
    }

    fn fail(&mut self, opcode: Option<Opcode>, fault: Fault, offset: usize) -> RuntimeError {
        RuntimeError {
            opcode,
            fault,
            offset,
            stack: self.stack.drain_top_first(),
        }
    }

    /// Execute one instruction. Every check runs before the stack changes.
    fn exec(&mut self, instr: Instruction, next: usize) -> Result<Flow, Fault> {
        match instr {
            Instruction::Push(value) => self.stack.push(value)?,
            Instruction::Pop => self.last_popped = Some(self.stack.pop()?),
            Instruction::Binary(op) => {
                let x = self.stack.peek(0)?;
                let y = self.stack.peek(1)?;
                let value = op.apply(y, x).ok_or(Fault::DivisionByZero)?;
                self.stack.discard(2)?;
                self.stack.push(value)?;
            }
            Instruction::Not => {
                let top = self.stack.len().checked_sub(1).ok_or(Fault::Underflow)?;
                let value = self.stack.get(top)?;
                self.stack.set(top, !value)?;
            }
            Instruction::Store(operands) => self.store(operands)?,
            Instruction::Load(operand) => self.load(operand)?,
            Instruction::Jump(operand) => {
                let (target, popped) = self.target(operand, 0)?;
                self.stack.discard(popped)?;
                return Ok(Flow::Jump(target));
            }
            Instruction::Branch(cmp, operand) => return self.branch(cmp, operand),
            Instruction::Alloc => {
                let count = self.stack.peek(0)?;
                let count = usize::try_from(count).map_err(|_| Fault::NegativeCount)?;
                if count > self.stack.remaining() + 1 {
                    return Err(Fault::InsufficientCapacity);
                }
                self.stack.discard(1)?;
                for _ in 0..count {
                    self.stack.push(0)?;
                }
            }
            Instruction::Call(operand) => {
                let (target, popped) = self.target(operand, 0)?;
                let return_to = i32::try_from(next).map_err(|_| Fault::TargetOutOfBounds)?;
                if popped == 0 && self.stack.remaining() == 0 {
                    return Err(Fault::Overflow);
                }
                self.stack.discard(popped)?;
                self.stack.push(return_to)?;
                return Ok(Flow::Call { target, return_to: next });
            }
            Instruction::Ret => {
                let addr = self.stack.peek(0)?;
                let target = usize::try_from(addr)
                    .ok()
                    .filter(|&t| t <= self.code.len())
                    .ok_or(Fault::BadReturnAddress)?;
                self.stack.discard(1)?;
                return Ok(Flow::Return(target));
            }
            Instruction::Halt => return Ok(Flow::Halt),
        }
        Ok(Flow::Next)
    }

    fn store(&mut self, operands: StoreOperands) -> Result<(), Fault> {
        let (dst, src, popped) = match operands {
            StoreOperands::Stack => (self.stack.peek(0)?, self.stack.peek(1)?, 2),
            StoreOperands::Imm { dst, src } => (dst, src, 0),
        };
        let size = self.stack.len() - popped;
        let dst = stack_index(dst, size)?;
        let src = stack_index(src, size).map_err(Fault::for_source)?;

        let value = self.stack.get(src)?;
        self.stack.discard(popped)?;
        self.stack.set(dst, value)?;
        Ok(())
    }

    fn load(&mut self, operand: Operand) -> Result<(), Fault> {
        let (index, popped) = match operand {
            Operand::Stack => (self.stack.peek(0)?, 1),
            Operand::Imm(index) => (index, 0),
        };
        let index = stack_index(index, self.stack.len() - popped)?;

        let value = self.stack.get(index)?;
        if popped == 0 && self.stack.remaining() == 0 {
            return Err(Fault::Overflow);
        }
        self.stack.discard(popped)?;
        self.stack.push(value)?;
        Ok(())
    }

    fn branch(&mut self, cmp: Comparison, operand: Operand) -> Result<Flow, Fault> {
        let (target, popped) = self.target(operand, 2)?;
        let x = self.stack.peek(popped)?;
        let y = self.stack.peek(popped + 1)?;
        self.stack.discard(popped + 2)?;

        if cmp.holds(y, x) {
            Ok(Flow::Jump(target))
        } else {
            Ok(Flow::Next)
        }
    }

    /// Resolve a jump target, returning it with the number of values the
    /// target itself occupies on the stack (1 for the stack form, 0 otherwise).
    ///
    /// `operands` counts the values the instruction consumes besides the
    /// target. A negative target selects the stack slot at `size + target`,
    /// where `size` excludes the target, and the value stored there is used.
    fn target(&self, operand: Operand, operands: usize) -> Result<(usize, usize), Fault> {
        let popped = usize::from(operand == Operand::Stack);
        if self.stack.len() < popped + operands {
            return Err(Fault::Underflow);
        }

        let raw = match operand {
            Operand::Stack => self.stack.peek(0)?,
            Operand::Imm(target) => target,
        };
        let size = self.stack.len() - popped;
        let target = if raw < 0 {
            let slot = size
                .checked_sub(raw.unsigned_abs() as usize)
                .ok_or(Fault::BelowZero)?;
            self.stack.get(slot)?
        } else {
            raw
        };

        usize::try_from(target)
            .ok()
            .filter(|&t| t < self.code.len())
            .map(|t| (t, popped))
            .ok_or(Fault::TargetOutOfBounds)
    }
}

/// Translate a stack index against `size`: negative indices count back from
/// the top, so `-1` is `size - 1`.
fn stack_index(index: i32, size: usize) -> Result<usize, Fault> {
    if index < 0 {
        return size
            .checked_sub(index.unsigned_abs() as usize)
            .ok_or(Fault::BelowZero);
    }
    let index = index as usize;
    if index < size {
        Ok(index)
    } else {
        Err(Fault::OutOfRange)
    }
}
