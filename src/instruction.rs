//! Opcode decoding.
//!
//! Raw opcodes are 16-bit big-endian words. The high nibble selects the
//! instruction family; the remaining fields are, by convention:
//!
//! * `X`   - second nibble, a register index
//! * `Y`   - third nibble, a register index
//! * `N`   - low nibble, a 4-bit immediate
//! * `NN`  - low byte, an 8-bit immediate
//! * `NNN` - low 12 bits, an address
//!
//! Decoding is a pure function from the raw word to a tagged variant, kept
//! separate from execution so each can be tested on its own.

/// A decoded instruction with its operand fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: zero the framebuffer
    ClearScreen,
    /// 00EE: return from subroutine
    Return,
    /// 1NNN: jump to NNN
    Jump(u16),
    /// 2NNN: call subroutine at NNN
    Call(u16),
    /// 3XNN: skip next instruction if VX == NN
    SkipEqImm { x: u8, nn: u8 },
    /// 4XNN: skip next instruction if VX != NN
    SkipNeqImm { x: u8, nn: u8 },
    /// 5XY0: skip next instruction if VX == VY
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN: VX = NN
    SetImm { x: u8, nn: u8 },
    /// 7XNN: VX += NN, wrapping, VF untouched
    AddImm { x: u8, nn: u8 },
    /// 8XY0: VX = VY
    SetReg { x: u8, y: u8 },
    /// 8XY1: VX |= VY
    Or { x: u8, y: u8 },
    /// 8XY2: VX &= VY
    And { x: u8, y: u8 },
    /// 8XY3: VX ^= VY
    Xor { x: u8, y: u8 },
    /// 8XY4: VX += VY, VF = carry
    AddReg { x: u8, y: u8 },
    /// 8XY5: VX -= VY, VF = no-borrow
    SubReg { x: u8, y: u8 },
    /// 8XY6: VF = VX & 1, VX >>= 1
    ShiftRight { x: u8 },
    /// 8XY7: VX = VY - VX, VF = no-borrow
    SubRegReversed { x: u8, y: u8 },
    /// 8XYE: VF = VX >> 7, VX <<= 1
    ShiftLeft { x: u8 },
    /// 9XY0: skip next instruction if VX != VY
    SkipNeqReg { x: u8, y: u8 },
    /// ANNN: I = NNN
    SetIndex(u16),
    /// BNNN: jump to NNN + V0
    JumpOffset(u16),
    /// CXNN: VX = random byte & NN
    RandMask { x: u8, nn: u8 },
    /// DXYN: draw the N-row sprite at memory[I] at (VX, VY)
    DrawSprite { x: u8, y: u8, n: u8 },
    /// EX9E: skip next instruction if key VX is pressed
    SkipKeyPressed { x: u8 },
    /// EXA1: skip next instruction if key VX is not pressed
    SkipKeyNotPressed { x: u8 },
    /// FX07: VX = delay timer
    GetDelay { x: u8 },
    /// FX0A: block until a key is pressed, then VX = that key
    WaitKey { x: u8 },
    /// FX15: delay timer = VX
    SetDelay { x: u8 },
    /// FX18: sound timer = VX
    SetSound { x: u8 },
    /// FX1E: I += VX, VF = 1 if the sum leaves the 12-bit address space
    AddToIndex { x: u8 },
    /// FX29: I = address of the font glyph for VX
    FontCharAddress { x: u8 },
    /// FX33: memory[I..I+3] = BCD digits of VX
    StoreBcd { x: u8 },
    /// FX55: memory[I..=I+X] = V0..=VX, then I += X + 1
    RegDump { x: u8 },
    /// FX65: V0..=VX = memory[I..=I+X], then I += X + 1
    RegLoad { x: u8 },
}

impl Instruction {
    /// Decode one raw opcode word, or `None` if it matches no family.
    pub fn decode(opcode: u16) -> Option<Instruction> {
        let x = ((opcode >> 8) & 0x0f) as u8;
        let y = ((opcode >> 4) & 0x0f) as u8;
        let n = (opcode & 0x000f) as u8;
        let nn = (opcode & 0x00ff) as u8;
        let nnn = opcode & 0x0fff;

        use Instruction::*;
        match opcode & 0xf000 {
            0x0000 => match opcode {
                0x00e0 => Some(ClearScreen),
                0x00ee => Some(Return),
                // 0NNN (call native routine) is not supported
                _ => None,
            },
            0x1000 => Some(Jump(nnn)),
            0x2000 => Some(Call(nnn)),
            0x3000 => Some(SkipEqImm { x, nn }),
            0x4000 => Some(SkipNeqImm { x, nn }),
            0x5000 if n == 0 => Some(SkipEqReg { x, y }),
            0x6000 => Some(SetImm { x, nn }),
            0x7000 => Some(AddImm { x, nn }),
            0x8000 => match n {
                0x0 => Some(SetReg { x, y }),
                0x1 => Some(Or { x, y }),
                0x2 => Some(And { x, y }),
                0x3 => Some(Xor { x, y }),
                0x4 => Some(AddReg { x, y }),
                0x5 => Some(SubReg { x, y }),
                0x6 => Some(ShiftRight { x }),
                0x7 => Some(SubRegReversed { x, y }),
                0xe => Some(ShiftLeft { x }),
                _ => None,
            },
            0x9000 if n == 0 => Some(SkipNeqReg { x, y }),
            0xa000 => Some(SetIndex(nnn)),
            0xb000 => Some(JumpOffset(nnn)),
            0xc000 => Some(RandMask { x, nn }),
            0xd000 => Some(DrawSprite { x, y, n }),
            0xe000 => match nn {
                0x9e => Some(SkipKeyPressed { x }),
                0xa1 => Some(SkipKeyNotPressed { x }),
                _ => None,
            },
            0xf000 => match nn {
                0x07 => Some(GetDelay { x }),
                0x0a => Some(WaitKey { x }),
                0x15 => Some(SetDelay { x }),
                0x18 => Some(SetSound { x }),
                0x1e => Some(AddToIndex { x }),
                0x29 => Some(FontCharAddress { x }),
                0x33 => Some(StoreBcd { x }),
                0x55 => Some(RegDump { x }),
                0x65 => Some(RegLoad { x }),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_screen_and_flow() {
        assert_eq!(Instruction::decode(0x00e0), Some(Instruction::ClearScreen));
        assert_eq!(Instruction::decode(0x00ee), Some(Instruction::Return));
        assert_eq!(Instruction::decode(0x1abc), Some(Instruction::Jump(0xabc)));
        assert_eq!(Instruction::decode(0x2def), Some(Instruction::Call(0xdef)));
        assert_eq!(
            Instruction::decode(0xb123),
            Some(Instruction::JumpOffset(0x123))
        );
    }

    #[test]
    fn test_decode_operand_fields() {
        assert_eq!(
            Instruction::decode(0x3a55),
            Some(Instruction::SkipEqImm { x: 0xa, nn: 0x55 })
        );
        assert_eq!(
            Instruction::decode(0x8ab4),
            Some(Instruction::AddReg { x: 0xa, y: 0xb })
        );
        assert_eq!(
            Instruction::decode(0xd12f),
            Some(Instruction::DrawSprite { x: 1, y: 2, n: 0xf })
        );
        assert_eq!(
            Instruction::decode(0xf533),
            Some(Instruction::StoreBcd { x: 5 })
        );
    }

    #[test]
    fn test_decode_key_family() {
        assert_eq!(
            Instruction::decode(0xe29e),
            Some(Instruction::SkipKeyPressed { x: 2 })
        );
        assert_eq!(
            Instruction::decode(0xe3a1),
            Some(Instruction::SkipKeyNotPressed { x: 3 })
        );
        assert_eq!(
            Instruction::decode(0xf40a),
            Some(Instruction::WaitKey { x: 4 })
        );
    }

    #[test]
    fn test_decode_rejects_unknown() {
        assert_eq!(Instruction::decode(0x0123), None); // native routine call
        assert_eq!(Instruction::decode(0x5ab1), None); // 5XYN with N != 0
        assert_eq!(Instruction::decode(0x8ab8), None);
        assert_eq!(Instruction::decode(0xe2ff), None);
        assert_eq!(Instruction::decode(0xf4ff), None);
    }
}
