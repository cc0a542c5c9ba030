//! Instruction handlers, grouped by family.
//!
//! Every handler has the [`Handler`](super::Handler) shape so it can sit in
//! the dispatch table: it receives the opcode that selected it, decodes its
//! operands from the opcode bits and returns the cycles it took.

mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;
