use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

/// Node properties stored as a serialized JSON object in a TEXT column
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct DProperties(Map<String, Value>);

impl From<DProperties> for Map<String, Value> {
    fn from(val: DProperties) -> Self {
        val.0
    }
}

impl From<Map<String, Value>> for DProperties {
    fn from(properties: Map<String, Value>) -> Self {
        Self(properties)
    }
}

impl Decode<'_, Sqlite> for DProperties {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let db_val = <String as Decode<Sqlite>>::decode(value)?;
        let properties = serde_json::from_str(&db_val).map_err(DPropertiesError::InvalidJson)?;
        Ok(Self(properties))
    }
}

impl Encode<'_, Sqlite> for DProperties {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        let encoded = Value::Object(self.0.clone()).to_string();
        args.push(SqliteArgumentValue::Text(encoded.into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DProperties {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DPropertiesError {
    #[error("stored properties are not a JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_properties() -> Result<(), BoxDynError> {
        let mut properties = Map::new();
        properties.insert("title".to_string(), Value::from("Über uns"));
        let dproperties = DProperties::from(properties);

        let mut args = Vec::new();
        let _ = dproperties.encode_by_ref(&mut args)?;

        if let SqliteArgumentValue::Text(encoded) = &args[0] {
            assert_eq!(&**encoded, r#"{"title":"Über uns"}"#);
        } else {
            panic!("Expected Text variant");
        }

        Ok(())
    }
}
