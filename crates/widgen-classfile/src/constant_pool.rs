use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CpInfo {
    Utf8(String),
    Integer,
    Float,
    Long,
    Double,
    Class { name_index: u16 },
    String,
    MemberRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    Module,
    Package,
    /// Second slot of an 8-byte constant, and index 0.
    Unusable,
}

impl CpInfo {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            CpInfo::Utf8(_) => "Utf8",
            CpInfo::Integer => "Integer",
            CpInfo::Float => "Float",
            CpInfo::Long => "Long",
            CpInfo::Double => "Double",
            CpInfo::Class { .. } => "Class",
            CpInfo::String => "String",
            CpInfo::MemberRef => "MemberRef",
            CpInfo::NameAndType => "NameAndType",
            CpInfo::MethodHandle => "MethodHandle",
            CpInfo::MethodType => "MethodType",
            CpInfo::Dynamic => "Dynamic",
            CpInfo::Module => "Module",
            CpInfo::Package => "Package",
            CpInfo::Unusable => "Unusable",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<CpInfo>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(CpInfo::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    CpInfo::Utf8(decode_modified_utf8(reader.read_bytes(len)?)?)
                }
                3 => {
                    reader.read_u4()?;
                    CpInfo::Integer
                }
                4 => {
                    reader.read_u4()?;
                    CpInfo::Float
                }
                5 => {
                    reader.read_u8()?;
                    CpInfo::Long
                }
                6 => {
                    reader.read_u8()?;
                    CpInfo::Double
                }
                7 => CpInfo::Class {
                    name_index: reader.read_u2()?,
                },
                8 => {
                    reader.read_u2()?;
                    CpInfo::String
                }
                9..=11 => {
                    reader.read_u2()?;
                    reader.read_u2()?;
                    CpInfo::MemberRef
                }
                12 => {
                    reader.read_u2()?;
                    reader.read_u2()?;
                    CpInfo::NameAndType
                }
                15 => {
                    reader.read_u1()?;
                    reader.read_u2()?;
                    CpInfo::MethodHandle
                }
                16 => {
                    reader.read_u2()?;
                    CpInfo::MethodType
                }
                17 | 18 => {
                    reader.read_u2()?;
                    reader.read_u2()?;
                    CpInfo::Dynamic
                }
                19 => {
                    reader.read_u2()?;
                    CpInfo::Module
                }
                20 => {
                    reader.read_u2()?;
                    CpInfo::Package
                }
                other => {
                    return Err(Error::InvalidConstantPoolTag {
                        index: entries.len() as u16,
                        tag: other,
                    })
                }
            };

            let wide = matches!(entry, CpInfo::Long | CpInfo::Double);
            entries.push(entry);
            if wide {
                entries.push(CpInfo::Unusable);
            }
        }

        if entries.len() != count {
            // An 8-byte constant in the last slot overflows the declared count.
            return Err(Error::InvalidConstantPoolIndex(count as u16));
        }

        Ok(Self { entries })
    }

    pub(crate) fn get(&self, index: u16) -> Result<&CpInfo> {
        match self.entries.get(index as usize) {
            None | Some(CpInfo::Unusable) => Err(Error::InvalidConstantPoolIndex(index)),
            Some(entry) => Ok(entry),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            CpInfo::Utf8(value) => Ok(value),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Utf8",
                found: other.kind(),
            }),
        }
    }

    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            CpInfo::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::ConstantPoolTypeMismatch {
                index,
                expected: "Class",
                found: other.kind(),
            }),
        }
    }
}

/// Decode the JVM's "modified UTF-8": `\0` is encoded as `C0 80` and
/// supplementary characters as surrogate pairs of 3-byte sequences.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        if !s.contains('\0') {
            return Ok(s.to_string());
        }
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i] as u16;
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(b0);
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)? as u16;
            if b1 & 0xC0 != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(((b0 & 0x1F) << 6) | (b1 & 0x3F));
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)? as u16;
            let b2 = *bytes.get(i + 2).ok_or(Error::InvalidModifiedUtf8)? as u16;
            if b1 & 0xC0 != 0x80 || b2 & 0xC0 != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push(((b0 & 0x0F) << 12) | ((b1 & 0x3F) << 6) | (b2 & 0x3F));
            i += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidModifiedUtf8)
}
