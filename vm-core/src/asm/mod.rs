//! The assembler's text front end: a scanner that tokenizes source lines
//! (`scanner`) and a two-pass assembler that resolves those tokens to the
//! instruction encoding defined in `opcodes`/`cpu::dispatch` (`assembler`).
//!
//! The scanner's token model is the in-scope part of this spec; everything
//! past it — resolving operand shapes to addressing-mode bits and patching
//! label references — was explicitly left undesigned upstream and is
//! completed here (see the design doc's Open Questions resolution).

pub mod assembler;
pub mod scanner;

pub use assembler::{assemble, ParseError};
pub use scanner::{Scanner, Token, TokenKind};
