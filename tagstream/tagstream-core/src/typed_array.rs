/// Borrowed view over a homogeneous numeric array.
///
/// Half-precision data is carried as raw IEEE-754 binary16 bit patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedArrayView<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),
    U64(&'a [u64]),
    I8(&'a [i8]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    I64(&'a [i64]),
    Half(&'a [u16]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

impl TypedArrayView<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::U16(s) | Self::Half(s) => s.len(),
            Self::U32(s) => s.len(),
            Self::U64(s) => s.len(),
            Self::I8(s) => s.len(),
            Self::I16(s) => s.len(),
            Self::I32(s) => s.len(),
            Self::I64(s) => s.len(),
            Self::F32(s) => s.len(),
            Self::F64(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_from_slice {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a [$ty]> for TypedArrayView<'a> {
                fn from(data: &'a [$ty]) -> Self {
                    Self::$variant(data)
                }
            }
        )*
    };
}

// `&[u16]` maps to `U16`; half data must be wrapped in `TypedArrayView::Half` explicitly.
impl_from_slice! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}
