//! `serde` deserializer over a pull event cursor.

use serde::de::{
    self, DeserializeSeed, IntoDeserializer,
    value::{BorrowedStrDeserializer, SeqDeserializer},
};
use tagstream_core::{
    ErrorCode, Event, EventCursor, SerContext, SerError, TypedArrayView, decode_half,
};

use crate::error::DecodeError;

/// Builds `Deserialize` values directly from the events of an
/// [`EventCursor`], without materializing a document first.
///
/// Typed arrays deserialize as sequences (half floats widened to `f64`).
/// Multi-dimensional arrays are rejected with `UnsupportedMultiDim`. Flush
/// events are skipped.
pub struct Deserializer<'de, C> {
    cursor: C,
    peeked: Option<Event<'de>>,
}

impl<'de, C: EventCursor<'de>> Deserializer<'de, C> {
    pub fn new(cursor: C) -> Self {
        Self {
            cursor,
            peeked: None,
        }
    }

    pub fn into_cursor(self) -> C {
        self.cursor
    }

    /// Deserialize one root value and check that nothing follows it.
    pub fn read_value<T: de::Deserialize<'de>>(&mut self) -> Result<T, DecodeError> {
        let value = T::deserialize(&mut *self).map_err(|err| self.located(err))?;
        self.end()?;
        Ok(value)
    }

    /// Fail with `TrailingData` unless the cursor is exhausted.
    pub fn end(&mut self) -> Result<(), DecodeError> {
        match self.next()? {
            None => Ok(()),
            Some(_) => Err(self.error(ErrorCode::TrailingData)),
        }
    }

    fn context(&self) -> SerContext {
        self.cursor.context()
    }

    fn error(&self, code: ErrorCode) -> DecodeError {
        SerError::new(code, &self.context()).into()
    }

    fn located(&self, err: DecodeError) -> DecodeError {
        err.locate(&self.context())
    }

    fn next(&mut self) -> Result<Option<Event<'de>>, DecodeError> {
        if let Some(event) = self.peeked.take() {
            return Ok(Some(event));
        }
        loop {
            match self.cursor.next_event() {
                Ok(Some(Event::Flush)) => continue,
                Ok(event) => return Ok(event),
                Err(code) => return Err(self.error(code)),
            }
        }
    }

    fn peek(&mut self) -> Result<Option<&Event<'de>>, DecodeError> {
        if self.peeked.is_none() {
            self.peeked = self.next()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn expect_event(&mut self) -> Result<Event<'de>, DecodeError> {
        match self.next()? {
            Some(event) => Ok(event),
            None => Err(self.error(ErrorCode::UnexpectedEof)),
        }
    }

    fn visit_array<V: de::Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value, DecodeError> {
        let mut access = SeqAccess {
            de: &mut *self,
            done: false,
        };
        let value = visitor.visit_seq(&mut access)?;
        access.finish()?;
        Ok(value)
    }

    fn visit_object<V: de::Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value, DecodeError> {
        let mut access = MapAccess {
            de: &mut *self,
            done: false,
        };
        let value = visitor.visit_map(&mut access)?;
        access.finish()?;
        Ok(value)
    }

    /// `{ "Variant": value }` form of an enum.
    fn visit_variant_object<V: de::Visitor<'de>>(
        &mut self,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let value = visitor.visit_enum(VariantAccess { de: &mut *self })?;
        match self.expect_event()? {
            Event::EndObject => Ok(value),
            _ => Err(self.error(ErrorCode::TrailingData)),
        }
    }
}

/// Deserialize a `T` from all events of `cursor`.
pub fn from_cursor<'de, C, T>(cursor: C) -> Result<T, DecodeError>
where
    C: EventCursor<'de>,
    T: de::Deserialize<'de>,
{
    Deserializer::new(cursor).read_value()
}

fn visit_elements<'de, V, I>(visitor: V, elements: I) -> Result<V::Value, DecodeError>
where
    V: de::Visitor<'de>,
    I: Iterator,
    I::Item: IntoDeserializer<'de, DecodeError>,
{
    let mut seq = SeqDeserializer::<_, DecodeError>::new(elements);
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_typed_array<'de, V: de::Visitor<'de>>(
    data: TypedArrayView<'_>,
    visitor: V,
) -> Result<V::Value, DecodeError> {
    match data {
        TypedArrayView::U8(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::U16(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::U32(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::U64(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::I8(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::I16(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::I32(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::I64(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::Half(v) => visit_elements(visitor, v.iter().map(|&bits| decode_half(bits))),
        TypedArrayView::F32(v) => visit_elements(visitor, v.iter().copied()),
        TypedArrayView::F64(v) => visit_elements(visitor, v.iter().copied()),
    }
}

impl<'de, C: EventCursor<'de>> de::Deserializer<'de> for &mut Deserializer<'de, C> {
    type Error = DecodeError;

    fn deserialize_any<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let result = match self.expect_event()? {
            Event::BeginObject { .. } => self.visit_object(visitor),
            Event::BeginArray { .. } => self.visit_array(visitor),
            Event::Null(_) => visitor.visit_unit(),
            Event::Bool(v, _) => visitor.visit_bool(v),
            Event::String(v, _) => visitor.visit_borrowed_str(v),
            Event::ByteString(v, _) => visitor.visit_borrowed_bytes(v),
            Event::UInt64(v, _) => visitor.visit_u64(v),
            Event::Int64(v, _) => visitor.visit_i64(v),
            Event::Half(bits, _) => visitor.visit_f64(decode_half(bits)),
            Event::Double(v, _) => visitor.visit_f64(v),
            Event::TypedArray(data, _) => visit_typed_array(data, visitor),
            Event::BeginMultiDim { .. } => return Err(self.error(ErrorCode::UnsupportedMultiDim)),
            Event::Key(_)
            | Event::EndObject
            | Event::EndArray
            | Event::EndMultiDim
            | Event::Flush => return Err(self.error(ErrorCode::UnexpectedEvent)),
        };
        result.map_err(|err| self.located(err))
    }

    fn deserialize_option<V: de::Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let is_null = matches!(self.peek()?, Some(Event::Null(_)));
        let result = if is_null {
            self.next()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(&mut *self)
        };
        result.map_err(|err| self.located(err))
    }

    fn deserialize_newtype_struct<V: de::Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: de::Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let result = match self.expect_event()? {
            Event::String(v, _) => visitor.visit_enum(BorrowedStrDeserializer::new(v)),
            Event::BeginObject { .. } => self.visit_variant_object(visitor),
            _ => return Err(self.error(ErrorCode::UnexpectedEvent)),
        };
        result.map_err(|err| self.located(err))
    }

    fn deserialize_ignored_any<V: de::Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_any(visitor)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct identifier
    }
}

struct SeqAccess<'a, 'de, C> {
    de: &'a mut Deserializer<'de, C>,
    done: bool,
}

impl<'de, C: EventCursor<'de>> SeqAccess<'_, 'de, C> {
    /// Consume the closing event if the visitor stopped before it.
    fn finish(self) -> Result<(), DecodeError> {
        if self.done {
            return Ok(());
        }
        match self.de.expect_event()? {
            Event::EndArray => Ok(()),
            _ => Err(self.de.error(ErrorCode::TrailingData)),
        }
    }
}

impl<'de, C: EventCursor<'de>> de::SeqAccess<'de> for SeqAccess<'_, 'de, C> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        if matches!(self.de.peek()?, Some(Event::EndArray)) {
            self.de.next()?;
            self.done = true;
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }
}

struct MapAccess<'a, 'de, C> {
    de: &'a mut Deserializer<'de, C>,
    done: bool,
}

impl<'de, C: EventCursor<'de>> MapAccess<'_, 'de, C> {
    fn finish(self) -> Result<(), DecodeError> {
        if self.done {
            return Ok(());
        }
        match self.de.expect_event()? {
            Event::EndObject => Ok(()),
            _ => Err(self.de.error(ErrorCode::TrailingData)),
        }
    }
}

impl<'de, C: EventCursor<'de>> de::MapAccess<'de> for MapAccess<'_, 'de, C> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        match self.de.expect_event()? {
            Event::EndObject => {
                self.done = true;
                Ok(None)
            }
            Event::Key(name) => seed.deserialize(BorrowedStrDeserializer::new(name)).map(Some),
            _ => Err(self.de.error(ErrorCode::UnexpectedEvent)),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, DecodeError> {
        seed.deserialize(&mut *self.de)
    }
}

struct VariantAccess<'a, 'de, C> {
    de: &'a mut Deserializer<'de, C>,
}

impl<'de, C: EventCursor<'de>> de::EnumAccess<'de> for VariantAccess<'_, 'de, C> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self), DecodeError> {
        match self.de.expect_event()? {
            Event::Key(name) => {
                let variant =
                    seed.deserialize(BorrowedStrDeserializer::<DecodeError>::new(name))?;
                Ok((variant, self))
            }
            _ => Err(self.de.error(ErrorCode::UnexpectedEvent)),
        }
    }
}

impl<'de, C: EventCursor<'de>> de::VariantAccess<'de> for VariantAccess<'_, 'de, C> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        de::Deserialize::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<T::Value, DecodeError> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: de::Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V: de::Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}
