use core::fmt;
use core::marker::PhantomData;

use alloc::format;
use alloc::vec::Vec;

use serde_core::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::SerializeStruct,
};

use crate::DynArray;

impl<const N: usize> Serialize for DynArray<N> {
    /// Serialize a `DynArray` as a struct of `elem_size` and the raw bytes.
    ///
    /// The element width travels with the data, so deserialization restores
    /// the exact element boundaries. The format is identical whether the data
    /// is stored inline or on the heap.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DynArray", 2)?;
        state.serialize_field("elem_size", &self.elem_size())?;
        state.serialize_field("data", self.as_slice())?;
        state.end()
    }
}

impl<'de, const N: usize> Deserialize<'de> for DynArray<N> {
    /// Deserialize a `DynArray` from its `elem_size`/`data` struct form.
    ///
    /// Fails if the element width is zero or the byte payload is not a whole
    /// number of elements. Whether the result is inline or heap-resident
    /// depends only on the payload size and `N`, not on how the source was
    /// stored.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        enum Field {
            ElemSize,
            Data,
        }

        impl<'de> Deserialize<'de> for Field {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct FieldVisitor;

                impl Visitor<'_> for FieldVisitor {
                    type Value = Field;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str("`elem_size` or `data`")
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Field, E>
                    where
                        E: de::Error,
                    {
                        match value {
                            "elem_size" => Ok(Field::ElemSize),
                            "data" => Ok(Field::Data),
                            _ => Err(de::Error::unknown_field(value, FIELDS)),
                        }
                    }
                }

                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct DynArrayVisitor<const N: usize> {
            _marker: PhantomData<[u8; N]>,
        }

        impl<'de, const N: usize> Visitor<'de> for DynArrayVisitor<N> {
            type Value = DynArray<N>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("struct DynArray")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let elem_size: usize = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let data: Vec<u8> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                build(elem_size, &data)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut elem_size: Option<usize> = None;
                let mut data: Option<Vec<u8>> = None;
                while let Some(key) = map.next_key()? {
                    match key {
                        Field::ElemSize => {
                            if elem_size.is_some() {
                                return Err(de::Error::duplicate_field("elem_size"));
                            }
                            elem_size = Some(map.next_value()?);
                        }
                        Field::Data => {
                            if data.is_some() {
                                return Err(de::Error::duplicate_field("data"));
                            }
                            data = Some(map.next_value()?);
                        }
                    }
                }
                let elem_size = elem_size.ok_or_else(|| de::Error::missing_field("elem_size"))?;
                let data = data.ok_or_else(|| de::Error::missing_field("data"))?;
                build(elem_size, &data)
            }
        }

        fn build<const N: usize, E: de::Error>(
            elem_size: usize,
            data: &[u8],
        ) -> Result<DynArray<N>, E> {
            if elem_size != 0 && data.len() % elem_size != 0 {
                return Err(de::Error::custom(format!(
                    "data length {} is not a multiple of elem_size {}",
                    data.len(),
                    elem_size
                )));
            }
            let mut arr = DynArray::with_capacity(elem_size, data.len() / elem_size.max(1))
                .map_err(de::Error::custom)?;
            arr.extend_from_slice(data).map_err(de::Error::custom)?;
            Ok(arr)
        }

        const FIELDS: &[&str] = &["elem_size", "data"];
        deserializer.deserialize_struct(
            "DynArray",
            FIELDS,
            DynArrayVisitor {
                _marker: PhantomData,
            },
        )
    }
}
