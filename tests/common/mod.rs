// Test utility module for classdep integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;

enum PoolEntry {
    Utf8(String),
    Class(u16),
    Long(i64),
}

/// Minimal constant-pool assembler with 1-based indexing and double-wide
/// LONG slots, mirroring the class-file layout.
struct PoolBuilder {
    entries: Vec<PoolEntry>,
    next_index: u16,
}

impl PoolBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_index: 1,
        }
    }

    fn push(&mut self, entry: PoolEntry) -> u16 {
        let index = self.next_index;
        self.next_index += if matches!(entry, PoolEntry::Long(_)) {
            2
        } else {
            1
        };
        self.entries.push(entry);
        index
    }

    fn utf8(&mut self, value: &str) -> u16 {
        let mut index = 1;
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(existing) if existing == value => return index,
                PoolEntry::Long(_) => index += 2,
                _ => index += 1,
            }
        }
        self.push(PoolEntry::Utf8(value.to_string()))
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        let name_index = self.utf8(internal_name);
        let mut index = 1;
        for entry in &self.entries {
            match entry {
                PoolEntry::Class(existing) if *existing == name_index => return index,
                PoolEntry::Long(_) => index += 2,
                _ => index += 1,
            }
        }
        self.push(PoolEntry::Class(name_index))
    }

    fn long(&mut self, value: i64) -> u16 {
        self.push(PoolEntry::Long(value))
    }

    fn serialize(&self, out: &mut Vec<u8>) {
        push_u16(out, self.next_index);
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(value) => {
                    out.push(1);
                    push_u16(out, value.len() as u16);
                    out.extend_from_slice(value.as_bytes());
                }
                PoolEntry::Class(name_index) => {
                    out.push(7);
                    push_u16(out, *name_index);
                }
                PoolEntry::Long(value) => {
                    out.push(5);
                    out.extend_from_slice(&value.to_be_bytes());
                }
            }
        }
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Fabricates minimal, well-formed class files for end-to-end scenarios.
///
/// Class names are given in internal form (`a/X`).
pub struct ClassFileBuilder {
    name: String,
    super_name: String,
    access_flags: u16,
    interfaces: Vec<String>,
    field_descriptors: Vec<String>,
    method_descriptors: Vec<String>,
    class_references: Vec<String>,
    annotations: Vec<String>,
    source_file: Option<String>,
    long_constant: Option<i64>,
}

impl ClassFileBuilder {
    pub fn new(internal_name: &str) -> Self {
        Self {
            name: internal_name.to_string(),
            super_name: "java/lang/Object".to_string(),
            access_flags: 0x0021, // ACC_PUBLIC | ACC_SUPER
            interfaces: Vec::new(),
            field_descriptors: Vec::new(),
            method_descriptors: Vec::new(),
            class_references: Vec::new(),
            annotations: Vec::new(),
            source_file: None,
            long_constant: None,
        }
    }

    pub fn super_class(mut self, internal_name: &str) -> Self {
        self.super_name = internal_name.to_string();
        self
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn abstract_class(self) -> Self {
        let flags = self.access_flags | ACC_ABSTRACT;
        self.access_flags(flags)
    }

    pub fn interface_type(self) -> Self {
        let flags = self.access_flags | ACC_INTERFACE | ACC_ABSTRACT;
        self.access_flags(flags)
    }

    pub fn implements(mut self, internal_name: &str) -> Self {
        self.interfaces.push(internal_name.to_string());
        self
    }

    pub fn field(mut self, descriptor: &str) -> Self {
        self.field_descriptors.push(descriptor.to_string());
        self
    }

    pub fn method(mut self, descriptor: &str) -> Self {
        self.method_descriptors.push(descriptor.to_string());
        self
    }

    /// Forces a CLASS constant into the pool, like a bytecode-only
    /// reference would.
    pub fn references_class(mut self, internal_name: &str) -> Self {
        self.class_references.push(internal_name.to_string());
        self
    }

    /// Adds a class-level runtime-visible annotation by type descriptor
    /// (`La/Marker;`).
    pub fn annotation(mut self, type_descriptor: &str) -> Self {
        self.annotations.push(type_descriptor.to_string());
        self
    }

    pub fn source_file(mut self, name: &str) -> Self {
        self.source_file = Some(name.to_string());
        self
    }

    /// Inserts a LONG constant ahead of the class entries, shifting every
    /// later pool index past its reserved slot.
    pub fn long_constant(mut self, value: i64) -> Self {
        self.long_constant = Some(value);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = PoolBuilder::new();
        if let Some(value) = self.long_constant {
            pool.long(value);
        }
        let this_index = pool.class(&self.name);
        let super_index = pool.class(&self.super_name);
        let interface_indices: Vec<u16> = self
            .interfaces
            .iter()
            .map(|name| pool.class(name))
            .collect();
        for reference in &self.class_references {
            pool.class(reference);
        }
        let field_infos: Vec<(u16, u16)> = self
            .field_descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (pool.utf8(&format!("field{i}")), pool.utf8(descriptor)))
            .collect();
        let method_infos: Vec<(u16, u16)> = self
            .method_descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (pool.utf8(&format!("method{i}")), pool.utf8(descriptor)))
            .collect();
        let source_info = self
            .source_file
            .as_deref()
            .map(|name| (pool.utf8("SourceFile"), pool.utf8(name)));
        let annotation_info = if self.annotations.is_empty() {
            None
        } else {
            let attribute_name = pool.utf8("RuntimeVisibleAnnotations");
            let type_indices: Vec<u16> = self
                .annotations
                .iter()
                .map(|descriptor| pool.utf8(descriptor))
                .collect();
            Some((attribute_name, type_indices))
        };

        let mut out = Vec::new();
        push_u32(&mut out, 0xCAFE_BABE);
        push_u16(&mut out, 0); // minor version
        push_u16(&mut out, 52); // major version (Java 8)
        pool.serialize(&mut out);
        push_u16(&mut out, self.access_flags);
        push_u16(&mut out, this_index);
        push_u16(&mut out, super_index);

        push_u16(&mut out, interface_indices.len() as u16);
        for index in interface_indices {
            push_u16(&mut out, index);
        }

        for member_infos in [field_infos, method_infos] {
            push_u16(&mut out, member_infos.len() as u16);
            for (name_index, descriptor_index) in member_infos {
                push_u16(&mut out, 0); // access flags
                push_u16(&mut out, name_index);
                push_u16(&mut out, descriptor_index);
                push_u16(&mut out, 0); // no attributes
            }
        }

        let attribute_count =
            usize::from(source_info.is_some()) + usize::from(annotation_info.is_some());
        push_u16(&mut out, attribute_count as u16);
        if let Some((attribute_name, value_index)) = source_info {
            push_u16(&mut out, attribute_name);
            push_u32(&mut out, 2);
            push_u16(&mut out, value_index);
        }
        if let Some((attribute_name, type_indices)) = annotation_info {
            push_u16(&mut out, attribute_name);
            push_u32(&mut out, 2 + 4 * type_indices.len() as u32);
            push_u16(&mut out, type_indices.len() as u16);
            for type_index in type_indices {
                push_u16(&mut out, type_index);
                push_u16(&mut out, 0); // no element-value pairs
            }
        }

        out
    }
}

/// Writes class bytes under `dir`, creating parent directories.
pub fn write_class(dir: &Path, relative_path: &str, bytes: &[u8]) {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// A plain concrete class in `package` (internal form) with no references
/// beyond its super class.
pub fn simple_class(internal_name: &str) -> Vec<u8> {
    ClassFileBuilder::new(internal_name).build()
}
