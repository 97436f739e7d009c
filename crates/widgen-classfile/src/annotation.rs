use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

/// An annotation reference. Element values are validated and skipped; only the
/// annotation type is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub type_descriptor: String,
}

impl Annotation {
    /// Binary (dotted) name of the annotation type, e.g. `java.lang.Deprecated`.
    #[must_use]
    pub fn binary_name(&self) -> Option<String> {
        self.type_descriptor
            .strip_prefix('L')
            .and_then(|rest| rest.strip_suffix(';'))
            .map(|internal| internal.replace('/', "."))
    }

    /// The unqualified type name (`Nullable` for `androidx.annotation.Nullable`).
    #[must_use]
    pub fn simple_name(&self) -> Option<String> {
        let binary = self.binary_name()?;
        let simple = binary.rsplit(['.', '$']).next().unwrap_or(&binary);
        Some(simple.to_string())
    }

    pub(crate) fn parse(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Self> {
        let type_descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
        let pairs = reader.read_u2()? as usize;
        for _ in 0..pairs {
            cp.get_utf8(reader.read_u2()?)?;
            skip_element_value(reader)?;
        }
        Ok(Self { type_descriptor })
    }

    pub(crate) fn parse_list(info: &[u8], cp: &ConstantPool) -> Result<Vec<Self>> {
        let mut sub = Reader::new(info);
        let count = sub.read_u2()? as usize;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(Self::parse(&mut sub, cp)?);
        }
        sub.ensure_empty()?;
        Ok(out)
    }

    /// Parse a `Runtime{Visible,Invisible}ParameterAnnotations` payload.
    pub(crate) fn parse_parameter_lists(
        info: &[u8],
        cp: &ConstantPool,
    ) -> Result<Vec<Vec<Self>>> {
        let mut sub = Reader::new(info);
        let params = sub.read_u1()? as usize;
        let mut out = Vec::with_capacity(params);
        for _ in 0..params {
            let count = sub.read_u2()? as usize;
            let mut anns = Vec::with_capacity(count);
            for _ in 0..count {
                anns.push(Self::parse(&mut sub, cp)?);
            }
            out.push(anns);
        }
        sub.ensure_empty()?;
        Ok(out)
    }
}

fn skip_element_value(reader: &mut Reader<'_>) -> Result<()> {
    let tag = reader.read_u1()?;
    match tag {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => {
            reader.read_u2()?;
        }
        b'e' => {
            reader.read_u2()?;
            reader.read_u2()?;
        }
        b'@' => {
            reader.read_u2()?;
            let pairs = reader.read_u2()? as usize;
            for _ in 0..pairs {
                reader.read_u2()?;
                skip_element_value(reader)?;
            }
        }
        b'[' => {
            let values = reader.read_u2()? as usize;
            for _ in 0..values {
                skip_element_value(reader)?;
            }
        }
        other => {
            return Err(Error::malformed(
                "annotation",
                format!("unknown element_value tag {:?}", other as char),
            ))
        }
    }
    Ok(())
}
