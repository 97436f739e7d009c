use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a class file was rejected. Offsets are byte positions within the
/// structure being read (the whole file, or one attribute's body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `wanted` more bytes were needed at `offset`.
    UnexpectedEof { offset: usize, wanted: usize },
    TrailingBytes(usize),
    InvalidMagic(u32),
    InvalidConstantPoolIndex(u16),
    InvalidConstantPoolTag { index: u16, tag: u8 },
    ConstantPoolTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    InvalidModifiedUtf8,
    /// A field or method descriptor that does not follow JVMS §4.3.
    InvalidDescriptor(String),
    MalformedAttribute {
        attribute: &'static str,
        detail: String,
    },
}

impl Error {
    pub(crate) fn malformed(attribute: &'static str, detail: impl Into<String>) -> Self {
        Error::MalformedAttribute {
            attribute,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof { offset, wanted } => {
                write!(f, "class file truncated: needed {wanted} bytes at offset {offset}")
            }
            Error::TrailingBytes(count) => write!(f, "{count} unread bytes after class structure"),
            Error::InvalidMagic(magic) => {
                write!(f, "not a class file: magic 0x{magic:08x}, expected 0xcafebabe")
            }
            Error::InvalidConstantPoolIndex(index) => {
                write!(f, "constant pool index {index} is out of range or unusable")
            }
            Error::InvalidConstantPoolTag { index, tag } => {
                write!(f, "unknown constant pool tag {tag} at index {index}")
            }
            Error::ConstantPoolTypeMismatch {
                index,
                expected,
                found,
            } => write!(
                f,
                "constant pool entry {index} is {found}, expected {expected}"
            ),
            Error::InvalidModifiedUtf8 => write!(f, "constant pool string is not modified UTF-8"),
            Error::InvalidDescriptor(desc) => write!(f, "invalid type descriptor {desc:?}"),
            Error::MalformedAttribute { attribute, detail } => {
                write!(f, "malformed {attribute} attribute: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {}
