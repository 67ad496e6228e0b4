//! Z80 flag register.

/// Z80 flag register, one field per bit.
///
/// Bits 5 and 3 (`y` and `x`) are undocumented copies of result bits. They are
/// kept so that `F` survives `PUSH AF`/`POP AF` and `set_f` unchanged.
///
/// # Examples
///
/// ```
/// use replay_cpu::Flags;
///
/// let flags = Flags::from_byte(0b1100_0101);
/// assert!(flags.s && flags.z && flags.pv && flags.c);
/// assert!(!flags.h && !flags.n);
/// assert_eq!(flags.to_byte(), 0b1100_0101);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Sign (bit 7)
    pub s: bool,
    /// Zero (bit 6)
    pub z: bool,
    /// Undocumented bit 5
    pub y: bool,
    /// Half carry (bit 4)
    pub h: bool,
    /// Undocumented bit 3
    pub x: bool,
    /// Parity/Overflow (bit 2)
    pub pv: bool,
    /// Add/Subtract (bit 1)
    pub n: bool,
    /// Carry (bit 0)
    pub c: bool,
}

impl Flags {
    pub const S: u8 = 0x80;
    pub const Z: u8 = 0x40;
    pub const Y: u8 = 0x20;
    pub const H: u8 = 0x10;
    pub const X: u8 = 0x08;
    pub const PV: u8 = 0x04;
    pub const N: u8 = 0x02;
    pub const C: u8 = 0x01;

    /// Packs the flags into an `F` register byte.
    pub fn to_byte(&self) -> u8 {
        let mut f = 0u8;
        if self.s {
            f |= Self::S;
        }
        if self.z {
            f |= Self::Z;
        }
        if self.y {
            f |= Self::Y;
        }
        if self.h {
            f |= Self::H;
        }
        if self.x {
            f |= Self::X;
        }
        if self.pv {
            f |= Self::PV;
        }
        if self.n {
            f |= Self::N;
        }
        if self.c {
            f |= Self::C;
        }
        f
    }

    /// Unpacks an `F` register byte.
    pub fn from_byte(b: u8) -> Self {
        Self {
            s: b & Self::S != 0,
            z: b & Self::Z != 0,
            y: b & Self::Y != 0,
            h: b & Self::H != 0,
            x: b & Self::X != 0,
            pv: b & Self::PV != 0,
            n: b & Self::N != 0,
            c: b & Self::C != 0,
        }
    }

    /// Sets S and Z from `value`, and copies its bits 5 and 3 into Y and X.
    pub(crate) fn set_sz_xy(&mut self, value: u8) {
        self.s = value & 0x80 != 0;
        self.z = value == 0;
        self.set_xy(value);
    }

    /// Copies bits 5 and 3 of `value` into Y and X.
    pub(crate) fn set_xy(&mut self, value: u8) {
        self.y = value & Self::Y != 0;
        self.x = value & Self::X != 0;
    }
}
