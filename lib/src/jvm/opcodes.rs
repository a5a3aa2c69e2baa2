//! Opcode values for the instructions the IR knows about
//!
//! Raw instruction records carry plain `u8` opcodes. The typed instruction variants map to and from
//! these when materializing and dumping.
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se18/html/jvms-6.html#jvms-6.5

pub const NOP: u8 = 0x00;
pub const ACONST_NULL: u8 = 0x01;
pub const ICONST_M1: u8 = 0x02;
pub const DCONST_1: u8 = 0x0f;
pub const BIPUSH: u8 = 0x10;
pub const SIPUSH: u8 = 0x11;
pub const LDC: u8 = 0x12;
pub const ILOAD: u8 = 0x15;
pub const LLOAD: u8 = 0x16;
pub const FLOAD: u8 = 0x17;
pub const DLOAD: u8 = 0x18;
pub const ALOAD: u8 = 0x19;
pub const ILOAD_0: u8 = 0x1a;
pub const ALOAD_3: u8 = 0x2d;
pub const IALOAD: u8 = 0x2e;
pub const SALOAD: u8 = 0x35;
pub const ISTORE: u8 = 0x36;
pub const LSTORE: u8 = 0x37;
pub const FSTORE: u8 = 0x38;
pub const DSTORE: u8 = 0x39;
pub const ASTORE: u8 = 0x3a;
pub const IASTORE: u8 = 0x4f;
pub const SASTORE: u8 = 0x56;
pub const POP: u8 = 0x57;
pub const DUP: u8 = 0x59;
pub const SWAP: u8 = 0x5f;
pub const IADD: u8 = 0x60;
pub const LADD: u8 = 0x61;
pub const FADD: u8 = 0x62;
pub const DADD: u8 = 0x63;
pub const ISUB: u8 = 0x64;
pub const DSUB: u8 = 0x67;
pub const IMUL: u8 = 0x68;
pub const IDIV: u8 = 0x6c;
pub const IREM: u8 = 0x70;
pub const INEG: u8 = 0x74;
pub const DNEG: u8 = 0x77;
pub const ISHL: u8 = 0x78;
pub const ISHR: u8 = 0x7a;
pub const IUSHR: u8 = 0x7c;
pub const IAND: u8 = 0x7e;
pub const LAND: u8 = 0x7f;
pub const IOR: u8 = 0x80;
pub const LOR: u8 = 0x81;
pub const IXOR: u8 = 0x82;
pub const LXOR: u8 = 0x83;
pub const IINC: u8 = 0x84;
pub const I2L: u8 = 0x85;
pub const I2S: u8 = 0x93;
pub const LCMP: u8 = 0x94;
pub const DCMPG: u8 = 0x98;
pub const IFEQ: u8 = 0x99;
pub const IFNE: u8 = 0x9a;
pub const IFLT: u8 = 0x9b;
pub const IFGE: u8 = 0x9c;
pub const IF_ICMPEQ: u8 = 0x9f;
pub const IF_ACMPNE: u8 = 0xa6;
pub const GOTO: u8 = 0xa7;
pub const JSR: u8 = 0xa8;
pub const RET: u8 = 0xa9;
pub const TABLESWITCH: u8 = 0xaa;
pub const LOOKUPSWITCH: u8 = 0xab;
pub const IRETURN: u8 = 0xac;
pub const ARETURN: u8 = 0xb0;
pub const RETURN: u8 = 0xb1;
pub const GETSTATIC: u8 = 0xb2;
pub const PUTSTATIC: u8 = 0xb3;
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const INVOKEINTERFACE: u8 = 0xb9;
pub const INVOKEDYNAMIC: u8 = 0xba;
pub const NEW: u8 = 0xbb;
pub const NEWARRAY: u8 = 0xbc;
pub const ANEWARRAY: u8 = 0xbd;
pub const ARRAYLENGTH: u8 = 0xbe;
pub const ATHROW: u8 = 0xbf;
pub const CHECKCAST: u8 = 0xc0;
pub const INSTANCEOF: u8 = 0xc1;
pub const MONITORENTER: u8 = 0xc2;
pub const MONITOREXIT: u8 = 0xc3;
pub const MULTIANEWARRAY: u8 = 0xc5;
pub const IFNULL: u8 = 0xc6;
pub const IFNONNULL: u8 = 0xc7;

/// Arithmetic and bitwise instructions (`iadd` through `lxor`)
pub const fn is_arithmetic(opcode: u8) -> bool {
    matches!(opcode, IADD..=LXOR)
}

/// Instructions without operands that are not arithmetic: constants, array access, stack
/// manipulation, conversions, comparisons, returns, and monitors
///
/// Short forms with an implicit operand (`iload_0` through `aload_3`) are none of these.
pub const fn is_simple(opcode: u8) -> bool {
    matches!(
        opcode,
        NOP..=DCONST_1
            | IALOAD..=SALOAD
            | IASTORE..=SWAP
            | I2L..=DCMPG
            | IRETURN..=RETURN
            | ARRAYLENGTH
            | ATHROW
            | MONITORENTER
            | MONITOREXIT
    )
}

/// Branches to a single label: the `if*` family and `goto`
///
/// Subroutines (`jsr` and `ret`) are not supported, and `goto_w` is chosen by the class writer.
pub const fn is_jump(opcode: u8) -> bool {
    matches!(opcode, IFEQ..=GOTO | IFNULL | IFNONNULL)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifications_are_disjoint() {
        for opcode in 0..=u8::MAX {
            assert!(
                [is_arithmetic(opcode), is_simple(opcode), is_jump(opcode)]
                    .iter()
                    .filter(|matched| **matched)
                    .count()
                    <= 1,
                "opcode {:#04x} has overlapping classifications",
                opcode
            );
        }
    }

    #[test]
    fn operand_carrying_opcodes_are_not_simple() {
        let operand_carrying = [
            BIPUSH,
            SIPUSH,
            LDC,
            ILOAD,
            ASTORE,
            IINC,
            IFEQ,
            GOTO,
            NEW,
            INVOKEVIRTUAL,
            IFNULL,
            RET,
            TABLESWITCH,
        ];
        for opcode in operand_carrying {
            assert!(!is_simple(opcode), "{:#04x}", opcode);
        }
    }

    #[test]
    fn jumps() {
        for opcode in [IFEQ, IFGE, IF_ICMPEQ, IF_ACMPNE, GOTO, IFNULL, IFNONNULL] {
            assert!(is_jump(opcode), "{:#04x}", opcode);
        }
        for opcode in [JSR, RET, TABLESWITCH, LOOKUPSWITCH, DCMPG, IRETURN] {
            assert!(!is_jump(opcode), "{:#04x}", opcode);
        }
    }

    #[test]
    fn short_forms_are_unclassified() {
        for opcode in ILOAD_0..=ALOAD_3 {
            assert!(!is_simple(opcode) && !is_arithmetic(opcode), "{:#04x}", opcode);
        }
    }
}
