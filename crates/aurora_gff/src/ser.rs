use serde::{
    ser::{Error, SerializeMap, SerializeSeq},
    Serialize, Serializer,
};

use crate::list::GffList;
use crate::structure::GffStruct;
use crate::value::FieldValue;

impl Serialize for GffStruct<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.field_count()))?;
        for (label, value) in self.values() {
            map.serialize_entry(label, &value.map_err(S::Error::custom)?)?;
        }
        map.end()
    }
}

impl Serialize for GffList<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(&element)?;
        }
        seq.end()
    }
}

impl Serialize for FieldValue<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::None(_) => serializer.serialize_unit(),
            FieldValue::Byte(v) => serializer.serialize_u8(*v),
            FieldValue::Char(v) => serializer.serialize_i8(*v),
            FieldValue::Uint16(v) => serializer.serialize_u16(*v),
            FieldValue::Sint16(v) => serializer.serialize_i16(*v),
            FieldValue::Uint32(v) => serializer.serialize_u32(*v),
            FieldValue::Sint32(v) => serializer.serialize_i32(*v),
            FieldValue::Uint64(v) => serializer.serialize_u64(*v),
            FieldValue::Sint64(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) => serializer.serialize_f32(*v),
            FieldValue::Double(v) => serializer.serialize_f64(*v),
            FieldValue::ExoString(v) | FieldValue::ResRef(v) => serializer.serialize_str(v),
            FieldValue::LocString(v) => v.serialize(serializer),
            FieldValue::Void(v) => serializer.serialize_bytes(v),
            FieldValue::Struct(v) => v.serialize(serializer),
            FieldValue::List(v) => v.serialize(serializer),
            FieldValue::Orientation(v) => v.serialize(serializer),
            FieldValue::Vector(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod test {
    use serde::Serialize;

    use crate::locstring::{Gender, Language, LocString, LocSubString};

    #[test]
    fn serialize_loc_string() {
        #[derive(Serialize)]
        struct Wrapper {
            name: LocString,
        }

        let value = serde_json::to_value(Wrapper {
            name: LocString::default(),
        })
        .unwrap();

        assert_eq!(value["name"]["strings"], serde_json::json!([]));

        let sub = serde_json::to_value(LocSubString {
            language: Language::French,
            gender: Gender::Feminine,
            text: "Bonjour".into(),
        })
        .unwrap();
        assert_eq!(sub["language"], "French");
        assert_eq!(sub["text"], "Bonjour");
    }
}
