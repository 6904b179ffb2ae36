//! Primitive type tags reported by the engine.
//!
//! The numeric codes are the engine's own. Codes the engine may add later are
//! not representable here: [`TypeId::from_raw`] returns `None` for them and
//! they render as `UNKNOWN`.

use std::fmt;

macro_rules! type_ids {
    ($($variant:ident = $code:literal => $name:literal, $symbol:literal;)*) => {
        /// Primitive type tag of a column or logical type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TypeId {
            $($variant,)*
        }

        impl TypeId {
            /// Every known tag, in declaration order.
            pub const ALL: &'static [TypeId] = &[$(TypeId::$variant,)*];

            /// Map a raw engine code to a tag.
            pub fn from_raw(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(TypeId::$variant),)*
                    _ => None,
                }
            }

            /// Raw engine code.
            pub fn code(self) -> i32 {
                match self {
                    $(TypeId::$variant => $code,)*
                }
            }

            /// Uppercase SQL literal, e.g. `TIMESTAMP_NS`.
            pub fn name(self) -> &'static str {
                match self {
                    $(TypeId::$variant => $name,)*
                }
            }

            /// Lowercase host symbol, e.g. `timestamp_ns`.
            pub fn symbol(self) -> &'static str {
                match self {
                    $(TypeId::$variant => $symbol,)*
                }
            }
        }
    };
}

type_ids! {
    Invalid = 0 => "INVALID", "invalid";
    Boolean = 1 => "BOOLEAN", "boolean";
    TinyInt = 2 => "TINYINT", "tinyint";
    SmallInt = 3 => "SMALLINT", "smallint";
    Integer = 4 => "INTEGER", "integer";
    BigInt = 5 => "BIGINT", "bigint";
    UTinyInt = 6 => "UTINYINT", "utinyint";
    USmallInt = 7 => "USMALLINT", "usmallint";
    UInteger = 8 => "UINTEGER", "uinteger";
    UBigInt = 9 => "UBIGINT", "ubigint";
    Float = 10 => "FLOAT", "float";
    Double = 11 => "DOUBLE", "double";
    Timestamp = 12 => "TIMESTAMP", "timestamp";
    Date = 13 => "DATE", "date";
    Time = 14 => "TIME", "time";
    Interval = 15 => "INTERVAL", "interval";
    HugeInt = 16 => "HUGEINT", "hugeint";
    Varchar = 17 => "VARCHAR", "varchar";
    Blob = 18 => "BLOB", "blob";
    Decimal = 19 => "DECIMAL", "decimal";
    TimestampS = 20 => "TIMESTAMP_S", "timestamp_s";
    TimestampMs = 21 => "TIMESTAMP_MS", "timestamp_ms";
    TimestampNs = 22 => "TIMESTAMP_NS", "timestamp_ns";
    Enum = 23 => "ENUM", "enum";
    List = 24 => "LIST", "list";
    Struct = 25 => "STRUCT", "struct";
    Map = 26 => "MAP", "map";
    Uuid = 27 => "UUID", "uuid";
    Union = 28 => "UNION", "union";
    Bit = 29 => "BIT", "bit";
    TimeTz = 30 => "TIME_TZ", "time_tz";
    TimestampTz = 31 => "TIMESTAMP_TZ", "timestamp_tz";
    UHugeInt = 32 => "UHUGEINT", "uhugeint";
    Array = 33 => "ARRAY", "array";
    Any = 34 => "ANY", "any";
    VarInt = 35 => "VARINT", "varint";
    SqlNull = 36 => "SQLNULL", "sqlnull";
}

/// Literal used for codes outside the known set.
pub const UNKNOWN_TYPE_NAME: &str = "UNKNOWN";

/// Symbol used for codes outside the known set.
pub const UNKNOWN_TYPE_SYMBOL: &str = "unknown";

/// Uppercase literal for a raw code, `UNKNOWN` if the code is not known.
pub fn raw_type_name(code: i32) -> &'static str {
    TypeId::from_raw(code).map_or(UNKNOWN_TYPE_NAME, TypeId::name)
}

/// Lowercase symbol for a raw code, `unknown` if the code is not known.
pub fn raw_type_symbol(code: i32) -> &'static str {
    TypeId::from_raw(code).map_or(UNKNOWN_TYPE_SYMBOL, TypeId::symbol)
}

impl TypeId {
    /// Whether the tag describes a type with nested children.
    pub fn is_nested(self) -> bool {
        matches!(
            self,
            TypeId::List | TypeId::Struct | TypeId::Map | TypeId::Array | TypeId::Union
        )
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_raw() {
        for &id in TypeId::ALL {
            assert_eq!(TypeId::from_raw(id.code()), Some(id));
        }
        assert_eq!(TypeId::ALL.len(), 37);
    }

    #[test]
    fn test_engine_codes() {
        assert_eq!(TypeId::Invalid.code(), 0);
        assert_eq!(TypeId::Varchar.code(), 17);
        assert_eq!(TypeId::Decimal.code(), 19);
        assert_eq!(TypeId::UHugeInt.code(), 32);
        assert_eq!(TypeId::Array.code(), 33);
        assert_eq!(TypeId::SqlNull.code(), 36);
    }

    #[test]
    fn test_names_and_symbols() {
        assert_eq!(TypeId::TimestampNs.name(), "TIMESTAMP_NS");
        assert_eq!(TypeId::TimestampNs.symbol(), "timestamp_ns");
        assert_eq!(TypeId::BigInt.to_string(), "BIGINT");
        for &id in TypeId::ALL {
            assert_eq!(id.symbol(), id.name().to_lowercase());
        }
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(TypeId::from_raw(37), None);
        assert_eq!(TypeId::from_raw(-1), None);
        assert_eq!(raw_type_name(999), "UNKNOWN");
        assert_eq!(raw_type_symbol(999), "unknown");
        assert_eq!(raw_type_name(4), "INTEGER");
    }

    #[test]
    fn test_is_nested() {
        assert!(TypeId::List.is_nested());
        assert!(TypeId::Union.is_nested());
        assert!(!TypeId::Decimal.is_nested());
        assert!(!TypeId::Enum.is_nested());
    }
}
