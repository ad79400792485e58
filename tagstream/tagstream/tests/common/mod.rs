#![allow(dead_code)]

/// Builds BSON documents element by element.
#[derive(Debug, Default, Clone)]
pub struct Doc {
    body: Vec<u8>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with a raw, unchecked payload.
    pub fn raw(mut self, element_type: u8, key: &str, payload: &[u8]) -> Self {
        self.body.push(element_type);
        self.body.extend_from_slice(key.as_bytes());
        self.body.push(0);
        self.body.extend_from_slice(payload);
        self
    }

    pub fn double(self, key: &str, v: f64) -> Self {
        self.raw(0x01, key, &v.to_le_bytes())
    }

    pub fn string(self, key: &str, v: &str) -> Self {
        self.raw(0x02, key, &string_payload(v))
    }

    pub fn document(self, key: &str, doc: Doc) -> Self {
        self.raw(0x03, key, &doc.finish())
    }

    /// Array from a document whose keys are `"0"`, `"1"`, ...
    pub fn array(self, key: &str, items: Doc) -> Self {
        self.raw(0x04, key, &items.finish())
    }

    pub fn binary(self, key: &str, subtype: u8, data: &[u8]) -> Self {
        let mut payload = len_prefix(data.len());
        payload.push(subtype);
        payload.extend_from_slice(data);
        self.raw(0x05, key, &payload)
    }

    pub fn bool(self, key: &str, v: bool) -> Self {
        self.raw(0x08, key, &[u8::from(v)])
    }

    pub fn datetime(self, key: &str, millis: i64) -> Self {
        self.raw(0x09, key, &millis.to_le_bytes())
    }

    pub fn null(self, key: &str) -> Self {
        self.raw(0x0a, key, &[])
    }

    pub fn int32(self, key: &str, v: i32) -> Self {
        self.raw(0x10, key, &v.to_le_bytes())
    }

    pub fn timestamp(self, key: &str, v: u64) -> Self {
        self.raw(0x11, key, &v.to_le_bytes())
    }

    pub fn int64(self, key: &str, v: i64) -> Self {
        self.raw(0x12, key, &v.to_le_bytes())
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = len_prefix(self.body.len() + 5);
        out.extend_from_slice(&self.body);
        out.push(0);
        out
    }
}

pub fn len_prefix(len: usize) -> Vec<u8> {
    (len as i32).to_le_bytes().to_vec()
}

pub fn string_payload(v: &str) -> Vec<u8> {
    let mut payload = len_prefix(v.len() + 1);
    payload.extend_from_slice(v.as_bytes());
    payload.push(0);
    payload
}
