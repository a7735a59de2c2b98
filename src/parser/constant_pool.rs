//! Constant-pool decoding.

use super::{mutf8, ParseError, Reader};

/// One constant-pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class {
        name_index: u16,
    },
    String {
        string_index: u16,
    },
    FieldRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    MethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    MethodType {
        descriptor_index: u16,
    },
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
}

impl Constant {
    /// LONG and DOUBLE occupy a second pool slot.
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }
}

/// The 1-indexed constant pool. Index 0 and the trailing slot of each
/// 8-byte constant are vacant.
#[derive(Debug, Default)]
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, ParseError> {
        let count = reader.read_u16()? as usize;
        let mut entries = vec![None; count.max(1)];
        let mut index = 1;
        while index < count {
            let constant = read_constant(reader)?;
            let wide = constant.is_wide();
            entries[index] = Some(constant);
            index += if wide { 2 } else { 1 };
        }
        Ok(Self { entries })
    }

    /// Entry lookup; the reserved index 0 and vacant wide slots resolve to
    /// `None`.
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(index as usize).and_then(Option::as_ref)
    }

    /// Occupied entries with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|constant| (index as u16, constant)))
    }

    /// The UTF8 string at `index`.
    pub fn utf8(&self, index: u16) -> Result<&str, ParseError> {
        match self.entries.get(index as usize) {
            Some(Some(Constant::Utf8(value))) => Ok(value),
            Some(Some(_)) => Err(ParseError::NotUtf8(index)),
            _ => Err(ParseError::ConstantPoolIndexOutOfRange(index)),
        }
    }

    /// The dotted class name behind a CLASS entry. An unoccupied index
    /// resolves to the empty name; a zero super-class index lands here.
    pub fn class_name(&self, index: u16) -> Result<String, ParseError> {
        match self.get(index) {
            None => Ok(String::new()),
            Some(Constant::Class { name_index }) => {
                Ok(self.utf8(*name_index)?.replace('/', "."))
            }
            Some(_) => Err(ParseError::ConstantPoolIndexOutOfRange(index)),
        }
    }
}

fn read_constant(reader: &mut Reader<'_>) -> Result<Constant, ParseError> {
    let tag = reader.read_u8()?;
    let constant = match tag {
        1 => {
            let length = reader.read_u16()? as usize;
            let bytes = reader.read_bytes(length)?;
            Constant::Utf8(mutf8::decode(bytes).ok_or(ParseError::MalformedUtf8)?)
        }
        3 => Constant::Integer(reader.read_u32()? as i32),
        4 => Constant::Float(f32::from_bits(reader.read_u32()?)),
        5 => Constant::Long(reader.read_u64()? as i64),
        6 => Constant::Double(f64::from_bits(reader.read_u64()?)),
        7 => Constant::Class {
            name_index: reader.read_u16()?,
        },
        8 => Constant::String {
            string_index: reader.read_u16()?,
        },
        9 => Constant::FieldRef {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        10 => Constant::MethodRef {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        11 => Constant::InterfaceMethodRef {
            class_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        12 => Constant::NameAndType {
            name_index: reader.read_u16()?,
            descriptor_index: reader.read_u16()?,
        },
        15 => Constant::MethodHandle {
            reference_kind: reader.read_u8()?,
            reference_index: reader.read_u16()?,
        },
        16 => Constant::MethodType {
            descriptor_index: reader.read_u16()?,
        },
        18 => Constant::InvokeDynamic {
            bootstrap_method_attr_index: reader.read_u16()?,
            name_and_type_index: reader.read_u16()?,
        },
        other => return Err(ParseError::UnknownConstant(other)),
    };
    Ok(constant)
}
