use std::{fmt, str};

use fstr::FStr;

/// Represents a 12-byte ObjectId.
///
/// The four fields are kept as given at construction. Only their low bits are packed into the
/// binary and textual forms: 32 bits of `timestamp`, 24 of `machine`, 16 of `pid`, and 24 of
/// `increment`. Identifiers produced by a generator or decoded from a string always fit in those
/// widths, so they survive an encode-decode cycle unchanged.
///
/// Equality, ordering, and hashing use the stored fields, so two hand-built objects that differ
/// only above those widths compare unequal even though they encode to the same string.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct ObjectId {
    timestamp: i64,
    machine: i32,
    pid: i32,
    increment: i32,
}

const MASK_24: i32 = 0xff_ffff;

impl ObjectId {
    /// Nil ObjectId (000000000000000000000000)
    pub const NIL: Self = Self::from_fields(0, 0, 0, 0);

    /// Max ObjectId (ffffffffffffffffffffffff)
    pub const MAX: Self = Self::from_fields(0xffff_ffff, MASK_24, 0xffff, MASK_24);

    /// Creates an object from field values.
    ///
    /// Values wider than their slot in the 12-byte layout are accepted as is and silently
    /// truncated when the object is encoded.
    pub const fn from_fields(timestamp: i64, machine: i32, pid: i32, increment: i32) -> Self {
        Self {
            timestamp,
            machine,
            pid,
            increment,
        }
    }

    /// Returns the creation time in seconds since the Unix epoch.
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the machine identifier. Only the low 24 bits are meaningful.
    pub const fn machine(&self) -> i32 {
        self.machine
    }

    /// Returns the process identifier. Only the low 16 bits are meaningful.
    pub const fn pid(&self) -> i32 {
        self.pid
    }

    /// Returns the counter value masked to 24 bits.
    pub const fn increment(&self) -> i32 {
        self.increment & MASK_24
    }

    /// Returns the 12-byte big-endian binary representation.
    pub const fn to_bytes(&self) -> [u8; 12] {
        let ts = self.timestamp as u32;
        let machine = self.machine as u32;
        let pid = self.pid as u16;
        let increment = (self.increment & MASK_24) as u32;
        [
            (ts >> 24) as u8,
            (ts >> 16) as u8,
            (ts >> 8) as u8,
            ts as u8,
            (machine >> 16) as u8,
            (machine >> 8) as u8,
            machine as u8,
            (pid >> 8) as u8,
            pid as u8,
            (increment >> 16) as u8,
            (increment >> 8) as u8,
            increment as u8,
        ]
    }

    /// Creates an object from the 12-byte big-endian binary representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self {
            timestamp: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
            machine: i32::from_be_bytes([0, bytes[4], bytes[5], bytes[6]]),
            pid: i32::from_be_bytes([0, 0, bytes[7], bytes[8]]),
            increment: i32::from_be_bytes([0, bytes[9], bytes[10], bytes[11]]),
        }
    }

    /// Returns the 24-digit lowercase hexadecimal string representation stored in a
    /// stack-allocated string type.
    ///
    /// Use the [`fmt::Display`] trait usually to get the canonical string representation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::ObjectId;
    ///
    /// let x = "5f2a3b011020304050607080".parse::<ObjectId>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "5f2a3b011020304050607080");
    /// assert_eq!(format!("{}", y), "5f2a3b011020304050607080");
    /// # Ok::<(), objectid::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<24> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 24];
        for (src, dst) in self.to_bytes().iter().zip(buffer.chunks_exact_mut(2)) {
            let e = *src as usize;
            dst[0] = DIGITS[e >> 4];
            dst[1] = DIGITS[e & 15];
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte is taken from the ASCII digit table
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Creates an object from the 24-digit hexadecimal string representation.
    ///
    /// Both letter cases are accepted; [`fmt::Display`] always produces lowercase.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::ObjectId;
    ///
    /// let x = ObjectId::parse("5f2a3b011020304050607080")?;
    /// assert_eq!(x.timestamp(), 0x5f2a3b01);
    /// assert_eq!(x.machine(), 0x102030);
    /// assert_eq!(x.pid(), 0x4050);
    /// assert_eq!(x.increment(), 0x607080);
    ///
    /// assert!(ObjectId::parse("too-short").is_err());
    /// # Ok::<(), objectid::ParseError>(())
    /// ```
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        if src.len() != 24 {
            return Err(ParseError::InvalidLength {
                input: src.to_owned(),
                len: src.len(),
            });
        }

        let mut dst = [0u8; 12];
        let digits = src.as_bytes();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = hex_digit(src, digits, i * 2)?;
            let lo = hex_digit(src, digits, i * 2 + 1)?;
            *e = (hi << 4) | lo;
        }
        Ok(Self::from_bytes(dst))
    }
}

fn hex_digit(src: &str, digits: &[u8], position: usize) -> Result<u8, ParseError> {
    (digits[position] as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| ParseError::InvalidDigit {
            input: src.to_owned(),
            position,
        })
}

impl fmt::Display for ObjectId {
    /// Returns the 24-digit canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for ObjectId {
    type Err = ParseError;

    /// Creates an object from the 24-digit hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl From<ObjectId> for [u8; 12] {
    fn from(src: ObjectId) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(src: [u8; 12]) -> Self {
        Self::from_bytes(src)
    }
}

impl From<ObjectId> for String {
    fn from(src: ObjectId) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<&str> for ObjectId {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Error parsing an invalid string representation of ObjectId.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ParseError {
    /// The input is not exactly 24 bytes long.
    #[error("\"{input}\" is not a valid 24 digit hex string: expected 24 characters, got {len}")]
    InvalidLength { input: String, len: usize },

    /// The input contains a character that is not a hexadecimal digit.
    #[error("\"{input}\" is not a valid 24 digit hex string: invalid digit at position {position}")]
    InvalidDigit { input: String, position: usize },
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, ObjectId};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for ObjectId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for ObjectId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = ObjectId;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "an ObjectId representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 12]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{ObjectId, ParseError};

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((i64, i32, i32, i32), &'static str)] {
        &[
            ((0, 0, 0, 0), "000000000000000000000000"),
            ((0xffff_ffff, 0, 0, 0), "ffffffff0000000000000000"),
            ((0, 0xff_ffff, 0, 0), "00000000ffffff0000000000"),
            ((0, 0, 0xffff, 0), "00000000000000ffff000000"),
            ((0, 0, 0, 0xff_ffff), "000000000000000000ffffff"),
            ((1, 0xaabbcc, 1, 42), "00000001aabbcc000100002a"),
            (
                (0x5f2a_3b01, 0x10_2030, 0x4050, 0x60_7080),
                "5f2a3b011020304050607080",
            ),
            (
                (0x65a1_f0c2, 0xe3_b7a9, 0x1f4c, 0x00_0001),
                "65a1f0c2e3b7a91f4c000001",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (fs, text) in prepare_cases() {
            let from_fields = ObjectId::from_fields(fs.0, fs.1, fs.2, fs.3);
            assert_eq!(Ok(from_fields), text.parse());
            assert_eq!(Ok(from_fields), text.to_uppercase().parse());
            assert_eq!(&from_fields.encode() as &str, *text);
            assert_eq!(&from_fields.to_string(), text);
            assert_eq!(&String::from(from_fields), text);
        }
    }

    /// Unpacks fields from the documented byte layout
    #[test]
    fn unpacks_fields_from_the_documented_byte_layout() {
        let bytes = [
            0x5f, 0x2a, 0x3b, 0x01, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80,
        ];
        let text = ObjectId::from(bytes).to_string();
        assert_eq!(text, "5f2a3b011020304050607080");

        let e = ObjectId::parse(&text).unwrap();
        assert_eq!(e.timestamp(), 0x5f2a3b01);
        assert_eq!(e.machine(), 0x102030);
        assert_eq!(e.pid(), 0x4050);
        assert_eq!(e.increment(), 0x607080);
        assert_eq!(e.to_bytes(), bytes);
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            "too-short",
            "5f2a3b01102030405060708",
            "5f2a3b0110203040506070800",
            " 5f2a3b01102030405060708",
            "5f2a3b01102030405060708 ",
            "+5f2a3b01102030405060708",
            "-5f2a3b01102030405060708",
            "5f2a3b01-1020-3040-5060708",
            "5f2a3b0110203g4050607080",
            "zzzzzzzzzzzzzzzzzzzzzzzz",
            "0x5f2a3b0110203040506070",
            "5f2a3b0110203040506070é",
        ];

        for e in cases {
            assert!(e.parse::<ObjectId>().is_err(), "{:?}", e);
            assert!(ObjectId::try_from(e).is_err(), "{:?}", e);
        }
    }

    /// Reports the offending input and the expected format
    #[test]
    fn reports_the_offending_input_and_the_expected_format() {
        let err = ObjectId::parse("too-short").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidLength {
                input: "too-short".to_owned(),
                len: 9
            }
        );
        let message = err.to_string();
        assert!(message.contains("\"too-short\""));
        assert!(message.contains("24 digit hex string"));

        let err = ObjectId::parse("5f2a3b0110203g4050607080").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidDigit {
                input: "5f2a3b0110203g4050607080".to_owned(),
                position: 13
            }
        );
        assert!(err.to_string().contains("\"5f2a3b0110203g4050607080\""));
    }

    /// Returns Nil and Max ObjectIds
    #[test]
    fn returns_nil_and_max_object_ids() {
        assert_eq!(&ObjectId::NIL.encode() as &str, "000000000000000000000000");
        assert_eq!(&ObjectId::MAX.encode() as &str, "ffffffffffffffffffffffff");
        assert_eq!(ObjectId::NIL, ObjectId::default());
        assert_eq!(ObjectId::from([0xffu8; 12]), ObjectId::MAX);
    }

    /// Masks out-of-range field values on encoding
    #[test]
    fn masks_out_of_range_field_values_on_encoding() {
        let e = ObjectId::from_fields(0x1_0000_0001, 0x7f00_0001, 0x0012_0034, -1);
        assert_eq!(e.timestamp(), 0x1_0000_0001);
        assert_eq!(e.machine(), 0x7f00_0001);
        assert_eq!(e.pid(), 0x0012_0034);
        assert_eq!(e.increment(), 0xff_ffff);
        assert_eq!(e.to_string(), "000000010000010034ffffff");

        let decoded = ObjectId::parse(&e.to_string()).unwrap();
        assert_eq!(decoded, ObjectId::from_fields(1, 1, 0x34, 0xff_ffff));
    }

    /// Places each field in its own slot of the string
    #[test]
    fn places_each_field_in_its_own_slot_of_the_string() {
        let slots = [
            (ObjectId::from_fields(0xffff_ffff, 0, 0, 0), 0..8),
            (ObjectId::from_fields(0, 0xff_ffff, 0, 0), 8..14),
            (ObjectId::from_fields(0, 0, 0xffff, 0), 14..18),
            (ObjectId::from_fields(0, 0, 0, 0xff_ffff), 18..24),
        ];
        for (e, range) in slots {
            let text = e.to_string();
            for (i, c) in text.char_indices() {
                let expected = if range.contains(&i) { 'f' } else { '0' };
                assert_eq!(c, expected, "{} at {}", text, i);
            }
        }
    }

    /// Compares stored fields rather than encoded bits
    #[test]
    fn compares_stored_fields_rather_than_encoded_bits() {
        let wide = ObjectId::from_fields(0, 0, 0, -1);
        let narrow = ObjectId::from_fields(0, 0, 0, 0xff_ffff);
        assert_eq!(wide.increment(), narrow.increment());
        assert_eq!(wide.to_string(), narrow.to_string());
        assert_ne!(wide, narrow);
        assert_eq!(ObjectId::parse(&wide.to_string()), Ok(narrow));
    }

    /// Compares by all four fields
    #[test]
    fn compares_by_all_four_fields() {
        let base = ObjectId::from_fields(1, 2, 3, 4);
        assert_eq!(base, ObjectId::from_fields(1, 2, 3, 4));
        assert_ne!(base, ObjectId::from_fields(9, 2, 3, 4));
        assert_ne!(base, ObjectId::from_fields(1, 9, 3, 4));
        assert_ne!(base, ObjectId::from_fields(1, 2, 9, 4));
        assert_ne!(base, ObjectId::from_fields(1, 2, 3, 9));
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (fs, _) in prepare_cases() {
            let e = ObjectId::from_fields(fs.0, fs.1, fs.2, fs.3);
            assert_eq!(ObjectId::from(<[u8; 12]>::from(e)), e);
            assert_eq!(e.encode().parse(), Ok(e));
            assert_eq!(e.encode().to_uppercase().parse(), Ok(e));
            assert_eq!(ObjectId::try_from(e.to_string()), Ok(e));
            assert_eq!(ObjectId::try_from(e.to_string().to_uppercase()), Ok(e));
        }
    }
}
