//! `RuntimeVisibleAnnotations` traversal.
//!
//! The annotation element-value structure nests (annotations inside
//! annotations, arrays of element values); nesting depth is bounded
//! explicitly rather than trusting the host stack.

use super::constant_pool::ConstantPool;
use super::{ParseError, Reader};

const MAX_NESTING: usize = 64;

/// Walks an attribute body and feeds every referenced type descriptor
/// (as stored, e.g. `Lcom/example/Widget;`) to `sink`.
pub(crate) fn collect_type_references(
    data: &[u8],
    pool: &ConstantPool,
    sink: &mut dyn FnMut(&str),
) -> Result<(), ParseError> {
    let mut reader = Reader::new(data);
    let count = reader.read_u16()?;
    read_annotations(&mut reader, pool, count, 0, sink)
}

fn read_annotations(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
    count: u16,
    depth: usize,
    sink: &mut dyn FnMut(&str),
) -> Result<(), ParseError> {
    if depth > MAX_NESTING {
        return Err(ParseError::MalformedAnnotation);
    }
    for _ in 0..count {
        let type_index = reader.read_u16()?;
        let pair_count = reader.read_u16()?;
        sink(pool.utf8(type_index)?);
        for _ in 0..pair_count {
            let _name_index = reader.read_u16()?;
            read_element_value(reader, pool, depth + 1, sink)?;
        }
    }
    Ok(())
}

fn read_element_value(
    reader: &mut Reader<'_>,
    pool: &ConstantPool,
    depth: usize,
    sink: &mut dyn FnMut(&str),
) -> Result<(), ParseError> {
    if depth > MAX_NESTING {
        return Err(ParseError::MalformedAnnotation);
    }
    let tag = reader.read_u8()?;
    match tag {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => {
            reader.read_u16()?;
        }
        b'e' => {
            let type_name_index = reader.read_u16()?;
            let _const_name_index = reader.read_u16()?;
            sink(pool.utf8(type_name_index)?);
        }
        b'c' => {
            let class_info_index = reader.read_u16()?;
            sink(pool.utf8(class_info_index)?);
        }
        b'@' => read_annotations(reader, pool, 1, depth + 1, sink)?,
        b'[' => {
            let value_count = reader.read_u16()?;
            for _ in 0..value_count {
                read_element_value(reader, pool, depth + 1, sink)?;
            }
        }
        _ => return Err(ParseError::MalformedAnnotation),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_pool(strings: &[&str]) -> ConstantPool {
        let mut bytes = vec![0u8; 2];
        let count = strings.len() as u16 + 1;
        bytes[..2].copy_from_slice(&count.to_be_bytes());
        for s in strings {
            bytes.push(1);
            bytes.extend_from_slice(&(s.len() as u16).to_be_bytes());
            bytes.extend_from_slice(s.as_bytes());
        }
        let mut reader = Reader::new(&bytes);
        ConstantPool::read(&mut reader).unwrap()
    }

    fn collect(data: &[u8], pool: &ConstantPool) -> Result<Vec<String>, ParseError> {
        let mut seen = Vec::new();
        collect_type_references(data, pool, &mut |name| seen.push(name.to_string()))?;
        Ok(seen)
    }

    #[test]
    fn reports_annotation_type() {
        let pool = utf8_pool(&["Lcom/example/Marker;"]);
        // one annotation, type index 1, no pairs
        let data = [0x00, 0x01, 0x00, 0x01, 0x00, 0x00];
        assert_eq!(collect(&data, &pool).unwrap(), ["Lcom/example/Marker;"]);
    }

    #[test]
    fn reports_enum_and_class_element_values() {
        let pool = utf8_pool(&["Lcom/example/Marker;", "Lcom/example/Color;", "Lcom/example/Widget;"]);
        let data = [
            0x00, 0x01, // one annotation
            0x00, 0x01, // type index 1
            0x00, 0x02, // two element-value pairs
            0x00, 0x01, // pair name (unchecked)
            b'e', 0x00, 0x02, 0x00, 0x01, // enum: type index 2, const index (ignored)
            0x00, 0x01, // pair name
            b'c', 0x00, 0x03, // class info index 3
        ];
        assert_eq!(
            collect(&data, &pool).unwrap(),
            ["Lcom/example/Marker;", "Lcom/example/Color;", "Lcom/example/Widget;"]
        );
    }

    #[test]
    fn recurses_into_nested_annotations_and_arrays() {
        let pool = utf8_pool(&["Lcom/example/Outer;", "Lcom/example/Inner;"]);
        let data = [
            0x00, 0x01, // one annotation
            0x00, 0x01, // Outer
            0x00, 0x01, // one pair
            0x00, 0x01, // pair name
            b'[', 0x00, 0x02, // array of two values
            b'@', 0x00, 0x02, 0x00, 0x00, // nested annotation Inner, no pairs
            b's', 0x00, 0x01, // string constant, skipped
        ];
        assert_eq!(
            collect(&data, &pool).unwrap(),
            ["Lcom/example/Outer;", "Lcom/example/Inner;"]
        );
    }

    #[test]
    fn truncated_attribute_is_rejected() {
        let pool = utf8_pool(&["Lcom/example/Marker;"]);
        let data = [0x00, 0x01, 0x00];
        assert_eq!(collect(&data, &pool).unwrap_err(), ParseError::TruncatedInput);
    }

    #[test]
    fn unknown_element_tag_is_rejected() {
        let pool = utf8_pool(&["Lcom/example/Marker;"]);
        let data = [
            0x00, 0x01, 0x00, 0x01, 0x00, 0x01, // one annotation, one pair
            0x00, 0x01, // pair name
            b'?', 0x00, 0x00,
        ];
        assert_eq!(
            collect(&data, &pool).unwrap_err(),
            ParseError::MalformedAnnotation
        );
    }
}
