//! Network-NBT writer: unlike on-disk NBT, the root compound carries no name at all. Every
//! other named tag is `<type id><u16 name length><name bytes><payload>`; compounds and the
//! root are closed with a single `TAG_End` (`0x00`) byte.
//!
//! Compounds are written as a flat sequence of calls rather than built as a tree: `compound`
//! opens a nested compound in place and `end` closes whichever compound was opened most
//! recently, mirroring how the reference implementation's `nbt_begin`/`nbt_compound`/`nbt_end`
//! calls read at each registry call site.

use crate::frame::ByteSink;

const TAG_BYTE: u8 = 1;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_LONG_ARRAY: u8 = 12;
const TAG_END: u8 = 0;

pub struct NbtWriter<'a, S: ByteSink> {
    sink: &'a mut S,
}

impl<'a, S: ByteSink> NbtWriter<'a, S> {
    /// Opens the unnamed root compound. Callers must balance this with a final `end()`.
    pub fn root_compound(sink: &'a mut S) -> Self {
        sink.push_bytes(&[TAG_COMPOUND]);
        Self { sink }
    }

    fn write_name(&mut self, name: &str) {
        self.sink.push_bytes(&(name.len() as u16).to_be_bytes());
        self.sink.push_bytes(name.as_bytes());
    }

    pub fn byte(&mut self, name: &str, value: i8) {
        self.sink.push_bytes(&[TAG_BYTE]);
        self.write_name(name);
        self.sink.push_bytes(&[value as u8]);
    }

    pub fn bool(&mut self, name: &str, value: bool) {
        self.byte(name, value as i8);
    }

    pub fn int(&mut self, name: &str, value: i32) {
        self.sink.push_bytes(&[TAG_INT]);
        self.write_name(name);
        self.sink.push_bytes(&value.to_be_bytes());
    }

    pub fn long(&mut self, name: &str, value: i64) {
        self.sink.push_bytes(&[TAG_LONG]);
        self.write_name(name);
        self.sink.push_bytes(&value.to_be_bytes());
    }

    pub fn float(&mut self, name: &str, value: f32) {
        self.sink.push_bytes(&[TAG_FLOAT]);
        self.write_name(name);
        self.sink.push_bytes(&value.to_be_bytes());
    }

    pub fn double(&mut self, name: &str, value: f64) {
        self.sink.push_bytes(&[TAG_DOUBLE]);
        self.write_name(name);
        self.sink.push_bytes(&value.to_be_bytes());
    }

    pub fn string(&mut self, name: &str, value: &str) {
        self.sink.push_bytes(&[TAG_STRING]);
        self.write_name(name);
        self.sink.push_bytes(&(value.len() as u16).to_be_bytes());
        self.sink.push_bytes(value.as_bytes());
    }

    pub fn string_list(&mut self, name: &str, items: &[&str]) {
        self.sink.push_bytes(&[TAG_LIST]);
        self.write_name(name);
        self.sink.push_bytes(&[TAG_STRING]);
        self.sink.push_bytes(&(items.len() as i32).to_be_bytes());
        for item in items {
            self.sink.push_bytes(&(item.len() as u16).to_be_bytes());
            self.sink.push_bytes(item.as_bytes());
        }
    }

    pub fn long_array(&mut self, name: &str, values: &[i64]) {
        self.sink.push_bytes(&[TAG_LONG_ARRAY]);
        self.write_name(name);
        self.sink.push_bytes(&(values.len() as i32).to_be_bytes());
        for value in values {
            self.sink.push_bytes(&value.to_be_bytes());
        }
    }

    /// Opens a nested, named compound; must be balanced with a matching `end()`.
    pub fn compound(&mut self, name: &str) {
        self.sink.push_bytes(&[TAG_COMPOUND]);
        self.write_name(name);
    }

    pub fn end(&mut self) {
        self.sink.push_bytes(&[TAG_END]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_root_compound_is_two_bytes() {
        let mut out = Vec::new();
        let mut nbt = NbtWriter::root_compound(&mut out);
        nbt.end();
        assert_eq!(out, vec![TAG_COMPOUND, TAG_END]);
    }

    #[test]
    fn nested_compound_layout() {
        let mut out = Vec::new();
        let mut nbt = NbtWriter::root_compound(&mut out);
        nbt.int("min_y", -64);
        nbt.compound("effects");
        nbt.int("sky_color", 7907327);
        nbt.end();
        nbt.end();

        let mut expected = vec![TAG_COMPOUND];
        expected.push(TAG_INT);
        expected.extend_from_slice(&5u16.to_be_bytes());
        expected.extend_from_slice(b"min_y");
        expected.extend_from_slice(&(-64i32).to_be_bytes());
        expected.push(TAG_COMPOUND);
        expected.extend_from_slice(&7u16.to_be_bytes());
        expected.extend_from_slice(b"effects");
        expected.push(TAG_INT);
        expected.extend_from_slice(&9u16.to_be_bytes());
        expected.extend_from_slice(b"sky_color");
        expected.extend_from_slice(&7907327i32.to_be_bytes());
        expected.push(TAG_END);
        expected.push(TAG_END);

        assert_eq!(out, expected);
    }
}
