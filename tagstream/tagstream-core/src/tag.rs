use std::fmt;

/// Refinement label attached to scalar and container events.
///
/// Tags are advisory: a consumer that does not understand a tag processes the
/// event by its base kind (a `Bigint` string is still a string).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SemanticTag {
    #[default]
    None,
    Undefined,
    /// RFC 3339 date-time string.
    Datetime,
    EpochSecond,
    EpochMilli,
    EpochNano,
    /// Arbitrary-precision integer carried as decimal digits.
    Bigint,
    /// Arbitrary-precision decimal carried as a string.
    Bigdec,
    Bigfloat,
    Float128,
    Base16,
    Base64,
    Base64Url,
    Uri,
    Clamped,
    MultiDimRowMajor,
    MultiDimColumnMajor,
    Ext,
    Id,
    Regex,
    Code,
}

impl SemanticTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "n/a",
            Self::Undefined => "undefined",
            Self::Datetime => "datetime",
            Self::EpochSecond => "epoch-second",
            Self::EpochMilli => "epoch-milli",
            Self::EpochNano => "epoch-nano",
            Self::Bigint => "bigint",
            Self::Bigdec => "bigdec",
            Self::Bigfloat => "bigfloat",
            Self::Float128 => "float128",
            Self::Base16 => "base16",
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
            Self::Uri => "uri",
            Self::Clamped => "clamped",
            Self::MultiDimRowMajor => "multi-dim-row-major",
            Self::MultiDimColumnMajor => "multi-dim-column-major",
            Self::Ext => "ext",
            Self::Id => "id",
            Self::Regex => "regex",
            Self::Code => "code",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// True for the epoch timestamp family.
    pub fn is_epoch_time(&self) -> bool {
        matches!(self, Self::EpochSecond | Self::EpochMilli | Self::EpochNano)
    }

    pub fn is_multi_dim(&self) -> bool {
        matches!(self, Self::MultiDimRowMajor | Self::MultiDimColumnMajor)
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
