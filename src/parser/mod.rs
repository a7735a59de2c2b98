//! Class-file parsing.
//!
//! A bit-exact reader of the JVM class-file format, extracting the class
//! name, abstractness, source file, and every referenced package: super
//! class, interfaces, field and method descriptor types, all CLASS
//! constants in the pool, and types named by runtime-visible annotations.

pub mod annotations;
pub mod constant_pool;
mod descriptor;
mod mutf8;

use thiserror::Error;
use tracing::trace;

use crate::filter::PackageFilter;
use crate::graph::{JavaClass, UNNAMED_PACKAGE};
use constant_pool::{Constant, ConstantPool};

const CLASS_MAGIC: u32 = 0xCAFE_BABE;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

const SOURCE_FILE_ATTRIBUTE: &str = "SourceFile";
const RUNTIME_VISIBLE_ANNOTATIONS_ATTRIBUTE: &str = "RuntimeVisibleAnnotations";

/// Per-class parse failures. Non-fatal to the enclosing analysis: the
/// analyzer skips the offending class and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid class file: bad magic number")]
    InvalidClassFile,

    #[error("unknown constant pool tag: {0}")]
    UnknownConstant(u8),

    #[error("unexpected end of class file")]
    TruncatedInput,

    #[error("constant pool index out of range: {0}")]
    ConstantPoolIndexOutOfRange(u16),

    #[error("constant pool entry {0} is not a UTF8 string")]
    NotUtf8(u16),

    #[error("malformed modified-UTF-8 string")]
    MalformedUtf8,

    #[error("malformed annotation attribute")]
    MalformedAnnotation,
}

/// Big-endian byte cursor over a class file.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        let end = self.pos.checked_add(len).ok_or(ParseError::TruncatedInput)?;
        if end > self.data.len() {
            return Err(ParseError::TruncatedInput);
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ParseError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, ParseError> {
        let bytes = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buf))
    }
}

/// Parses one class file into a [`JavaClass`].
pub struct ClassFileParser {
    filter: PackageFilter,
}

impl ClassFileParser {
    pub fn new(filter: PackageFilter) -> Self {
        Self { filter }
    }

    /// Parse a class file from raw bytes.
    pub fn parse(&self, bytes: &[u8]) -> Result<JavaClass, ParseError> {
        let mut reader = Reader::new(bytes);

        if reader.read_u32()? != CLASS_MAGIC {
            return Err(ParseError::InvalidClassFile);
        }
        let _minor_version = reader.read_u16()?;
        let _major_version = reader.read_u16()?;

        let pool = ConstantPool::read(&mut reader)?;

        let access_flags = reader.read_u16()?;
        let is_abstract = access_flags & (ACC_ABSTRACT | ACC_INTERFACE) != 0;

        let this_class = reader.read_u16()?;
        let class_name = pool.class_name(this_class)?;
        let mut class = JavaClass::new(class_name.as_str());
        class.is_abstract = is_abstract;
        class.package_name =
            package_name(&class_name).unwrap_or_else(|| UNNAMED_PACKAGE.to_string());
        trace!(class = %class.name, package = %class.package_name, "parsing");

        let super_class = reader.read_u16()?;
        let super_name = pool.class_name(super_class)?;
        self.add_import(&mut class, package_name(&super_name));

        let interface_count = reader.read_u16()?;
        for _ in 0..interface_count {
            let interface_name = pool.class_name(reader.read_u16()?)?;
            self.add_import(&mut class, package_name(&interface_name));
        }

        let field_annotations = self.read_members(&mut reader, &pool, &mut class)?;
        let method_annotations = self.read_members(&mut reader, &pool, &mut class)?;
        let class_annotations = self.read_class_attributes(&mut reader, &pool, &mut class)?;

        // References buried in the bytecode surface as CLASS constants.
        for (_, constant) in pool.iter() {
            if let Constant::Class { name_index } = constant {
                let referenced = pool.utf8(*name_index)?;
                self.add_import(&mut class, package_name(referenced));
            }
        }

        let mut referenced_types = Vec::new();
        for body in class_annotations
            .iter()
            .chain(&field_annotations)
            .chain(&method_annotations)
        {
            annotations::collect_type_references(body, &pool, &mut |type_name| {
                referenced_types.push(type_name.to_string());
            })?;
        }
        for type_name in referenced_types {
            let class_name = annotation_type_name(&type_name);
            self.add_import(&mut class, package_name(class_name));
        }

        Ok(class)
    }

    /// Reads a field or method table: per member, access flags, name,
    /// descriptor, and attributes. Descriptor types become imports;
    /// retained annotation attribute bodies are returned for the
    /// annotation post-pass.
    fn read_members(
        &self,
        reader: &mut Reader<'_>,
        pool: &ConstantPool,
        class: &mut JavaClass,
    ) -> Result<Vec<Vec<u8>>, ParseError> {
        let mut retained = Vec::new();
        let member_count = reader.read_u16()?;
        for _ in 0..member_count {
            let _access_flags = reader.read_u16()?;
            let _name_index = reader.read_u16()?;
            let descriptor_index = reader.read_u16()?;
            let descriptor = pool.utf8(descriptor_index)?;
            for type_name in descriptor::object_types(descriptor) {
                if !type_name.is_empty() {
                    self.add_import(class, package_name(type_name));
                }
            }

            let attribute_count = reader.read_u16()?;
            for _ in 0..attribute_count {
                let (name, body) = read_attribute(reader, pool)?;
                if name == RUNTIME_VISIBLE_ANNOTATIONS_ATTRIBUTE {
                    retained.push(body.to_vec());
                }
            }
        }
        Ok(retained)
    }

    fn read_class_attributes(
        &self,
        reader: &mut Reader<'_>,
        pool: &ConstantPool,
        class: &mut JavaClass,
    ) -> Result<Vec<Vec<u8>>, ParseError> {
        let mut retained = Vec::new();
        let attribute_count = reader.read_u16()?;
        for _ in 0..attribute_count {
            let (name, body) = read_attribute(reader, pool)?;
            if name == SOURCE_FILE_ATTRIBUTE {
                let mut body_reader = Reader::new(body);
                let source_index = body_reader.read_u16()?;
                class.source_file = pool.utf8(source_index)?.to_string();
            } else if name == RUNTIME_VISIBLE_ANNOTATIONS_ATTRIBUTE {
                retained.push(body.to_vec());
            }
        }
        Ok(retained)
    }

    fn add_import(&self, class: &mut JavaClass, package: Option<String>) {
        if let Some(package) = package {
            if self.filter.accept(&package) {
                class.add_imported_package(package);
            }
        }
    }
}

fn read_attribute<'a>(
    reader: &mut Reader<'a>,
    pool: &ConstantPool,
) -> Result<(String, &'a [u8]), ParseError> {
    let name_index = reader.read_u16()?;
    let name = pool.utf8(name_index)?.to_string();
    let length = reader.read_u32()? as usize;
    let body = reader.read_bytes(length)?;
    Ok((name, body))
}

/// The package portion of a class name or descriptor token, accepting
/// both internal (`/`) and dotted form.
///
/// Array descriptors are unwrapped to their element type; primitive
/// arrays contribute nothing. A name with no dot lives in the unnamed
/// package.
fn package_name(name: &str) -> Option<String> {
    let mut name = name;
    let types;
    if name.starts_with('[') {
        types = descriptor::object_types(name);
        name = types.first().copied()?;
    }
    let dotted = name.replace('/', ".");
    match dotted.rfind('.') {
        Some(split) if split > 0 => Some(dotted[..split].to_string()),
        _ => Some(UNNAMED_PACKAGE.to_string()),
    }
}

/// Strips the `L`/`;` delimiters from an annotation type descriptor.
/// Array-typed class values keep their `[` prefix for [`package_name`] to
/// unwrap.
fn annotation_type_name(descriptor: &str) -> &str {
    match descriptor.strip_prefix('L') {
        Some(stripped) => stripped.strip_suffix(';').unwrap_or(stripped),
        None => descriptor,
    }
}
