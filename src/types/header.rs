//! Header constants

/// Value of the markers bracketing a binary header record
pub const HEADER_MARKER: i32 = 16;

/// Binary header size in bytes (marker + name + count + type + marker)
pub const HEADER_SIZE: usize = 24;

/// Fixed width of array names and CHAR elements
pub const NAME_LEN: usize = 8;

/// Binary encoding of a true logical
pub const TRUE_VALUE: u32 = 0xFFFF_FFFF;

/// Binary encoding of a false logical
pub const FALSE_VALUE: u32 = 0x0000_0000;
