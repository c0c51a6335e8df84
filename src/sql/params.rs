//! Convert serde_json::Value to types that sqlx can bind.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::mysql::{MySql, MySqlTypeInfo};
use sqlx::Database;

/// A value bound to one MySQL placeholder, tagged at JSON decode time.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
    Json(Value),
}

impl BindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else {
                    BindValue::F64(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::Json(v.clone()),
        }
    }
}

impl<'q> Encode<'q, MySql> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <MySql as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => IsNull::Yes,
            BindValue::Bool(b) => <bool as Encode<MySql>>::encode_by_ref(b, buf)?,
            BindValue::I64(n) => <i64 as Encode<MySql>>::encode_by_ref(n, buf)?,
            BindValue::F64(n) => <f64 as Encode<MySql>>::encode_by_ref(n, buf)?,
            BindValue::Text(s) => <String as Encode<MySql>>::encode_by_ref(s, buf)?,
            BindValue::Json(v) => <serde_json::Value as Encode<MySql>>::encode_by_ref(v, buf)?,
        })
    }

    // The binary protocol tags every parameter, so each variant must report
    // its real wire type rather than the blanket one from Type::type_info.
    fn produces(&self) -> Option<MySqlTypeInfo> {
        Some(match self {
            BindValue::Null => <i64 as sqlx::Type<MySql>>::type_info(),
            BindValue::Bool(_) => <bool as sqlx::Type<MySql>>::type_info(),
            BindValue::I64(_) => <i64 as sqlx::Type<MySql>>::type_info(),
            BindValue::F64(_) => <f64 as sqlx::Type<MySql>>::type_info(),
            BindValue::Text(_) => <str as sqlx::Type<MySql>>::type_info(),
            BindValue::Json(_) => <serde_json::Value as sqlx::Type<MySql>>::type_info(),
        })
    }
}

impl sqlx::Type<MySql> for BindValue {
    fn type_info() -> MySqlTypeInfo {
        <str as sqlx::Type<MySql>>::type_info()
    }
}
